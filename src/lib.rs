//! Dynamic array visualizer.
//!
//! The array model, pseudo-code text, scene layout, and click/frame session
//! are plain Rust and build on every target; the WebGL front-end is only
//! compiled for wasm32.

pub mod config;
pub mod error;
pub mod model;
pub mod pseudo_code;
pub mod scene;
pub mod session;

#[cfg(target_arch = "wasm32")]
mod logging;

pub use config::VizConfig;
pub use error::{EmptyError, VizError};
pub use model::{Change, ChangeKind, DynamicArray, Element, SubscriptionId};

// Only compile wasm-specific code when targeting wasm32.

#[cfg(target_arch = "wasm32")]
mod wasm {
    use std::cell::RefCell;
    use std::rc::Rc;

    use log::info;
    use wasm_bindgen::prelude::*;

    use crate::config::QUERY_KEYS;
    use crate::error::VizError;
    use crate::VizConfig;

    mod render;
    mod ui;

    pub(crate) use ui::App;

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        crate::logging::init(log::LevelFilter::Debug);

        let window = web_sys::window().ok_or(VizError::Dom("window"))?;
        let document = window.document().ok_or(VizError::Dom("document"))?;
        let search = window.location().search().unwrap_or_default();
        let params = web_sys::UrlSearchParams::new_with_str(&search)?;
        let cfg = VizConfig::from_pairs(
            QUERY_KEYS
                .iter()
                .filter_map(|key| params.get(key).map(|value| (*key, value))),
        )?;
        info!("starting with {cfg:?}");

        let canvas = document
            .get_element_by_id(cfg.canvas_id)
            .ok_or(VizError::Dom("canvas"))?
            .dyn_into::<web_sys::HtmlCanvasElement>()?;

        let renderer = render::Renderer::new(canvas)?;
        let app = Rc::new(RefCell::new(App::new(&document, cfg)?));
        ui::wire_buttons(&document, &app)?;

        render::start(renderer, app)?;
        Ok(())
    }
}
