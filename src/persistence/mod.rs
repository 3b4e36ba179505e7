//! Versioned app-state persistence
//!
//! Stores the app's top-level state (events, selected date, role) as one JSON
//! record under a fixed key. Persistence is best-effort:
//! - `load` turns every failure (no storage, no record, corrupt JSON, other
//!   version, wrong shape) into "absent", meaning start fresh
//! - `save` and `clear` swallow storage failures after logging them
//!
//! Records written by another schema version are ignored, not migrated.

mod state;

pub use state::{OperationalEvent, PersistedState, SaveRequest, UserRole};

use chrono::Utc;
use serde_json::Value;

use crate::config::Config;
use crate::platform::{self, PlatformStorage, StorageError, StoragePort};
use state::RecordRef;

/// Key the app state is stored under
pub const STORAGE_KEY: &str = "vdfmi.appState.v1";
/// The one schema version `load` accepts
pub const STORAGE_VERSION: u32 = 1;

/// Why `load` came back empty
#[derive(Debug, Clone, PartialEq)]
pub enum AbsentReason {
    /// No storage mechanism, or it refused the read
    StorageUnavailable,
    /// Nothing stored under the key
    Missing,
    /// Stored text is not JSON
    Malformed,
    /// Record carries another `version` (`None` if the field is missing)
    VersionMismatch { found: Option<Value> },
    /// JSON is fine but the record doesn't have the expected fields
    ShapeMismatch,
}

/// Result of reading the stored record
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Loaded(PersistedState),
    Absent(AbsentReason),
}

impl LoadOutcome {
    pub fn into_option(self) -> Option<PersistedState> {
        match self {
            LoadOutcome::Loaded(state) => Some(state),
            LoadOutcome::Absent(_) => None,
        }
    }
}

/// Failure on the write path. Never escapes `save`.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("failed to serialize app state: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Load/save/clear the app state in a [`StoragePort`]
#[derive(Debug, Clone)]
pub struct AppStatePersistence<S> {
    storage: Option<S>,
    key: String,
}

impl<S: StoragePort> AppStatePersistence<S> {
    pub fn new(storage: S) -> Self {
        Self::with_key(storage, STORAGE_KEY)
    }

    pub fn with_key(storage: S, key: impl Into<String>) -> Self {
        Self {
            storage: Some(storage),
            key: key.into(),
        }
    }

    /// No storage mechanism (non-browser environment); every call is a no-op
    pub fn unavailable() -> Self {
        Self {
            storage: None,
            key: STORAGE_KEY.to_string(),
        }
    }

    pub fn from_option(storage: Option<S>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn is_available(&self) -> bool {
        self.storage.is_some()
    }

    /// Read the stored record, `None` whenever it can't be used
    pub fn load(&self) -> Option<PersistedState> {
        self.load_outcome().into_option()
    }

    /// Read the stored record, saying why when it can't be used
    pub fn load_outcome(&self) -> LoadOutcome {
        match self.read_record() {
            Ok((_, state)) => LoadOutcome::Loaded(state),
            Err(reason) => LoadOutcome::Absent(reason),
        }
    }

    /// The stored record exactly as written, once it passes the same checks
    /// as `load`. Unknown fields and the original `savedAt` text are kept.
    pub fn load_json(&self) -> Option<Value> {
        self.read_record().ok().map(|(raw, _)| raw)
    }

    fn read_record(&self) -> Result<(Value, PersistedState), AbsentReason> {
        let Some(storage) = &self.storage else {
            log::debug!("No storage available, starting fresh");
            return Err(AbsentReason::StorageUnavailable);
        };

        let raw = match storage.get_item(&self.key) {
            Ok(Some(raw)) if !raw.is_empty() => raw,
            Ok(_) => {
                log::debug!("No saved app state, starting fresh");
                return Err(AbsentReason::Missing);
            }
            Err(e) => {
                log::warn!("App state unreadable ({e}), starting fresh");
                return Err(AbsentReason::StorageUnavailable);
            }
        };

        let decoded = decode(&raw);
        match &decoded {
            Ok((_, state)) => log::info!("Loaded app state ({} events)", state.events.len()),
            Err(reason) => log::info!("Ignoring saved app state: {reason:?}"),
        }
        decoded
    }

    /// Replace the stored record with `request`, stamped with the current
    /// version and time. Failures are logged and dropped.
    pub fn save(&self, request: &SaveRequest) {
        match self.try_save(request) {
            Ok(()) => log::debug!("App state saved ({} events)", request.events.len()),
            Err(PersistError::Storage(StorageError::Unavailable)) => {
                log::debug!("No storage available, app state not saved")
            }
            Err(e) => log::warn!("App state not saved: {e}"),
        }
    }

    fn try_save(&self, request: &SaveRequest) -> Result<(), PersistError> {
        let storage = self.storage.as_ref().ok_or(StorageError::Unavailable)?;
        let record = RecordRef::stamp(request, STORAGE_VERSION, Utc::now());
        let json = serde_json::to_string(&record)?;
        storage.set_item(&self.key, &json)?;
        Ok(())
    }

    /// Remove the stored record. Failures are logged and dropped.
    pub fn clear(&self) {
        let Some(storage) = &self.storage else {
            return;
        };
        match storage.remove_item(&self.key) {
            Ok(()) => log::debug!("App state cleared"),
            Err(e) => log::warn!("App state not cleared: {e}"),
        }
    }
}

impl AppStatePersistence<PlatformStorage> {
    /// Persistence backed by the current target's storage, if any
    pub fn open(config: &Config) -> Self {
        Self::from_option(platform::detect(config), config.storage_key.clone())
    }
}

/// Classify stored text. Checks run in the order the record is trusted:
/// JSON, then version, then shape. On success returns the parsed JSON
/// untouched alongside the typed record.
fn decode(raw: &str) -> Result<(Value, PersistedState), AbsentReason> {
    let value = serde_json::from_str::<Value>(raw).map_err(|_| AbsentReason::Malformed)?;
    let Some(record) = value.as_object() else {
        return Err(AbsentReason::ShapeMismatch);
    };

    // 1.0 is the same number as 1 once parsed by the browser
    let version = record.get("version");
    if version.and_then(Value::as_f64) != Some(f64::from(STORAGE_VERSION)) {
        return Err(AbsentReason::VersionMismatch {
            found: version.cloned(),
        });
    }

    if !record.get("events").is_some_and(Value::is_array) {
        return Err(AbsentReason::ShapeMismatch);
    }

    let mut typed = record.clone();
    typed.insert("version".to_string(), Value::from(STORAGE_VERSION));
    match serde_json::from_value(Value::Object(typed)) {
        Ok(state) => Ok((value, state)),
        Err(e) => {
            log::debug!("App state shape mismatch: {e}");
            Err(AbsentReason::ShapeMismatch)
        }
    }
}
