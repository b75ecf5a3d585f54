mod app;
mod renderer;
mod theme;

pub use app::LanesApp;

// WASM entry point
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsCast;

/// Id of the canvas element the web build mounts into.
#[cfg(target_arch = "wasm32")]
const CANVAS_ID: &str = "tps_lanes_canvas";

/// Mount the app on the page's canvas. A missing canvas is reported once,
/// here, as an error to the page.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let canvas = document
        .get_element_by_id(CANVAS_ID)
        .ok_or_else(|| JsValue::from_str(&format!("no canvas element with id '{CANVAS_ID}'")))?
        .dyn_into::<web_sys::HtmlCanvasElement>()
        .map_err(|_| JsValue::from_str(&format!("element '{CANVAS_ID}' is not a canvas")))?;

    let web_options = eframe::WebOptions::default();
    wasm_bindgen_futures::spawn_local(async {
        let start_result = eframe::WebRunner::new()
            .start(
                canvas,
                web_options,
                Box::new(|cc| {
                    Ok(Box::new(LanesApp::new(
                        cc,
                        tps_lanes_core::SimulationConfig::default(),
                    )))
                }),
            )
            .await;
        if let Err(e) = start_result {
            web_sys::console::error_1(&format!("Failed to start eframe: {e:?}").into());
        }
    });
    Ok(())
}
