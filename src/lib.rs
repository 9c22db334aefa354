//! Animated multi-scene birthday greeting.
//!
//! The scene machine, curve math, particle fields and timed scripts are
//! plain Rust and build on any target. Everything that touches the DOM
//! lives in [`wasm`] and only compiles for `wasm32`.

pub mod animation;
pub mod clock;
pub mod config;
pub mod curve;
pub mod error;
pub mod media;
pub mod palette;
pub mod particles;
pub mod scene;
pub mod sequencer;
pub mod state;

pub use config::GreetingConfig;
pub use error::{GreetingError, GreetingResult};

// Only compile wasm-specific code when targeting wasm32.

#[cfg(target_arch = "wasm32")]
pub mod wasm {
    use wasm_bindgen::prelude::*;

    use crate::config::{GreetingConfig, CONFIG_ELEMENT_ID};

    mod app;
    pub mod dom;
    pub mod frames;
    mod media;
    pub mod render;

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        // a second init (tests, hot reload) keeps the first logger
        let _ = console_log::init_with_level(log::Level::Info);

        let document = dom::document()?;
        let override_json = document
            .get_element_by_id(CONFIG_ELEMENT_ID)
            .and_then(|el| el.text_content());
        let config = GreetingConfig::load_or_default(override_json.as_deref());

        let started = dom::Elements::collect(document)
            .and_then(|elements| app::App::start(config, elements));
        if let Err(err) = started {
            log::error!("greeting failed to start: {err}");
            return Err(err.into());
        }
        Ok(())
    }
}
