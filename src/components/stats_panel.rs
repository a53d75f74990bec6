use crate::util::format_zoom;
use yew::prelude::*;

#[derive(Properties, PartialEq, Clone)]
pub struct StatsPanelProps {
    pub zoom: f64,
    pub stones: usize,
}

#[function_component]
pub fn StatsPanel(props: &StatsPanelProps) -> Html {
    let row_style = "display:flex; align-items:center; gap:8px;"; // label | value
    let label_style = "flex:1; font-weight:500;";
    let value_style =
        "min-width:60px; text-align:right; font-variant-numeric:tabular-nums; font-weight:600;";
    html! {
        <div style="position:absolute; top:12px; left:12px; background:rgba(255,255,255,0.92); border:1px solid #d0d7de; border-radius:8px; padding:10px 14px; min-width:160px; display:flex; flex-direction:column; gap:8px; font-size:14px; pointer-events:none;">
            <div style={row_style}>
                <span style={format!("{} color:#8c1c84;", label_style)}>{"Zoom"}</span>
                <span style={format!("{} color:#8c1c84;", value_style)}>{ format_zoom(props.zoom) }</span>
            </div>
            <div style={row_style}>
                <span style={format!("{} color:#45a2f8;", label_style)}>{"Stones"}</span>
                <span style={format!("{} color:#45a2f8;", value_style)}>{ props.stones }</span>
            </div>
        </div>
    }
}
