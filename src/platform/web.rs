//! Browser bindings
//!
//! JavaScript calls `tick` from `requestAnimationFrame`, forwards button presses,
//! and reads flat float buffers for its instanced meshes.

use wasm_bindgen::prelude::*;

use crate::config::SceneConfig;
use crate::sim::SceneController;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

/// Scene handle owned by the page
#[wasm_bindgen]
pub struct WebScene {
    scene: SceneController,
}

#[wasm_bindgen]
impl WebScene {
    /// Create a scene from an optional JSON config
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> WebScene {
        let config = config_json
            .as_deref()
            .map(SceneConfig::from_json_or_default)
            .unwrap_or_default();
        WebScene {
            scene: SceneController::new(config),
        }
    }

    pub fn tick(&mut self, elapsed_ms: f64, delta_ms: f64) -> bool {
        self.scene.tick(elapsed_ms, delta_ms)
    }

    pub fn blow(&mut self) -> bool {
        self.scene.blow()
    }

    #[wasm_bindgen(js_name = skipIntro)]
    pub fn skip_intro(&mut self) -> bool {
        self.scene.skip_intro()
    }

    /// Call from the page's unload/unmount path
    pub fn dispose(&mut self) {
        self.scene.dispose();
    }

    pub fn phase(&self) -> String {
        self.scene.phase().as_str().to_string()
    }

    #[wasm_bindgen(js_name = countdownSeconds)]
    pub fn countdown_seconds(&self) -> u32 {
        self.scene.state().countdown.remaining_seconds
    }

    /// `[eye.x, eye.y, eye.z, target.x, target.y, target.z]`
    pub fn camera(&self) -> js_sys::Float32Array {
        let view = self.scene.state().camera;
        let mut out = [0.0f32; 6];
        out[..3].copy_from_slice(&view.position.to_array());
        out[3..].copy_from_slice(&view.look_at.to_array());
        js_sys::Float32Array::from(&out[..])
    }

    /// One byte per candle, 1 = lit
    #[wasm_bindgen(js_name = candlesLit)]
    pub fn candles_lit(&self) -> Vec<u8> {
        self.scene
            .state()
            .candles
            .iter()
            .map(|c| u8::from(c.lit))
            .collect()
    }

    /// 12 floats per confetti piece (see `ConfettiInstance`)
    #[wasm_bindgen(js_name = confettiBuffer)]
    pub fn confetti_buffer(&self) -> js_sys::Float32Array {
        let snapshot = self.scene.snapshot();
        js_sys::Float32Array::from(snapshot.confetti_floats())
    }

    /// 5 floats per visible smoke puff (see `SmokeInstance`)
    #[wasm_bindgen(js_name = smokeBuffer)]
    pub fn smoke_buffer(&self) -> js_sys::Float32Array {
        let snapshot = self.scene.snapshot();
        js_sys::Float32Array::from(snapshot.smoke_floats())
    }

    /// Pending events as a JSON array
    #[wasm_bindgen(js_name = drainEvents)]
    pub fn drain_events(&mut self) -> String {
        let events = self.scene.drain_events();
        serde_json::to_string(&events).unwrap_or_else(|_| "[]".to_string())
    }
}
