//! JS bindings for the browser app
//!
//! `loadAppState()`, `saveAppState(state)` and `clearAppState()` never throw.

use wasm_bindgen::prelude::*;

use crate::config::Config;
use crate::persistence::{AppStatePersistence, SaveRequest};
use crate::platform::LocalStorage;

fn persistence() -> AppStatePersistence<LocalStorage> {
    AppStatePersistence::open(&Config::default())
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    // A second init (module re-instantiated) is harmless
    let _ = console_log::init_with_level(log::Level::Info);
}

/// Stored app state as a JS object, or `null`
#[wasm_bindgen(js_name = loadAppState)]
pub fn load_app_state() -> JsValue {
    let Some(record) = persistence().load_json() else {
        return JsValue::NULL;
    };
    let Ok(json) = serde_json::to_string(&record) else {
        return JsValue::NULL;
    };
    js_sys::JSON::parse(&json).unwrap_or(JsValue::NULL)
}

/// Save `{ events, selectedDate?, role? }`
#[wasm_bindgen(js_name = saveAppState)]
pub fn save_app_state(state: JsValue) {
    let json = match js_sys::JSON::stringify(&state) {
        Ok(json) => String::from(json),
        Err(_) => {
            log::warn!("App state not saved: value is not serializable");
            return;
        }
    };
    match serde_json::from_str::<SaveRequest>(&json) {
        Ok(request) => persistence().save(&request),
        Err(e) => log::warn!("App state not saved: {e}"),
    }
}

#[wasm_bindgen(js_name = clearAppState)]
pub fn clear_app_state() {
    persistence().clear();
}
