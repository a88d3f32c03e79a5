// === PUBLIC CONTRACT ===
pub mod contract;
pub use contract::model;

// === MODULE DEFINITION ===
pub mod config;
pub mod module;
pub use config::CardsConfig;
pub use module::{CardsModule, StoreKind};

// === INTERNAL MODULES ===
// Exposed for the binary wiring and for tests; the contract module is the stable surface.
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
