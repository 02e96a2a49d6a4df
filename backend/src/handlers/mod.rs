//! HTTP request handlers

pub mod health;
pub mod hold;
pub mod inventory;
pub mod lot;
pub mod partner;

pub use health::*;
pub use hold::*;
pub use inventory::*;
pub use lot::*;
pub use partner::*;
