//! Staff roster - personnel roster for a shift-scheduling webapp
//!
//! Core modules:
//! - `persistence`: Versioned app-state record (load/save/clear, never fails)
//! - `platform`: Storage ports (LocalStorage on web, files on native, memory)
//! - `config`: Storage key and data directory
//! - `roster`: Operators, filtering, unavailability
//! - `web`: JS bindings (wasm32 only)

pub mod config;
pub mod persistence;
pub mod platform;
pub mod roster;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::Config;
pub use persistence::{
    AbsentReason, AppStatePersistence, LoadOutcome, OperationalEvent, PersistedState, SaveRequest,
    UserRole,
};
pub use platform::{MemoryStorage, StorageError, StoragePort};
pub use roster::{Operator, Roster, RosterFilter, Unavailability, UnavailabilityReason};
