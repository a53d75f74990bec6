mod components;
mod config;
mod error;
mod model;
mod render;
mod state;
mod util;

use components::app::App;

fn main() {
    util::init_logging();
    yew::Renderer::<App>::new().render();
}
