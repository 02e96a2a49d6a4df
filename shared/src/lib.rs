//! Shared core of the Stone Inventory Visual service
//!
//! Pure, synchronous computation over stock unit snapshots: quantity
//! reconciliation, filter compilation, the price post-filter and per-unit
//! projections. Used by the backend and, through WASM, by the browser grid.

pub mod detail;
pub mod error;
pub mod filter;
pub mod models;
pub mod reconcile;
pub mod types;
pub mod validation;

pub use detail::*;
pub use error::*;
pub use filter::*;
pub use models::*;
pub use reconcile::*;
pub use types::*;
pub use validation::*;
