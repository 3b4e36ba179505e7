//! Staff roster native entry point
//!
//! Reports the app state persisted in the native store. The browser build
//! runs from the library's `wasm_bindgen(start)` instead.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use staff_roster::{AppStatePersistence, Config, LoadOutcome};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::default();
    let store = AppStatePersistence::open(&config);
    if !store.is_available() {
        log::warn!("No local data directory, nothing to inspect");
        return;
    }

    match store.load_outcome() {
        LoadOutcome::Loaded(state) => {
            match state.saved_at {
                Some(ts) => log::info!("Saved at: {}", ts.to_rfc3339()),
                None => log::info!("Saved at: unknown"),
            }
            log::info!("Events: {}", state.events.len());
            log::info!(
                "Selected date: {}",
                state.selected_date.as_deref().unwrap_or("-")
            );
            log::info!(
                "Role: {}",
                state.role.as_ref().map_or("-", |r| r.as_str())
            );
        }
        LoadOutcome::Absent(reason) => {
            log::info!("No usable app state under {}: {reason:?}", store.key());
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is web::start, this is just to satisfy the compiler
}
