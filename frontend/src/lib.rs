use leptos::*;
use wasm_bindgen::prelude::wasm_bindgen;

pub mod api;
mod components;
pub mod format;
#[cfg(target_arch = "wasm32")]
mod live;
mod logging;

pub use components::dashboard::Dashboard;
pub use components::price_chart::{ChartGeometry, ChartLine, compute_chart_geometry};
pub use logging::init_logging;

/// Root component bootstrapping the dashboard.
#[component]
pub fn App() -> impl IntoView {
    view! {
        <main class="app-root">
            <Dashboard />
        </main>
    }
}

/// WASM entry point called automatically by `trunk`.
#[wasm_bindgen(start)]
pub fn main() -> Result<(), wasm_bindgen::JsValue> {
    init_logging();
    console_error_panic_hook::set_once();

    leptos::mount_to_body(|| view! { <App /> });
    Ok(())
}
