//! Domain models for the inventory views

mod aggregate;
mod authorization;
mod category;
mod history;
mod hold;
mod lot;
mod partner;
mod price;
mod stock;

pub use aggregate::*;
pub use authorization::*;
pub use category::*;
pub use history::*;
pub use hold::*;
pub use lot::*;
pub use partner::*;
pub use price::*;
pub use stock::*;
