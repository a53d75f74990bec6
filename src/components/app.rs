use super::grid_view::GridView;
use crate::config::ViewConfig;
use yew::prelude::*;

#[function_component(App)]
pub fn app() -> Html {
    // Read once; the session is built from it on mount.
    let config = use_memo((), |_| ViewConfig::load());

    html! {
        <div id="root">
            <GridView config={(*config).clone()} />
        </div>
    }
}
