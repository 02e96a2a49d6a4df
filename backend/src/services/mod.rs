//! Business logic services for the Stone Inventory Visual server

pub mod authorization;
pub mod hold;
pub mod inventory;
pub mod lot;
pub mod partner;

pub use authorization::AuthorizationService;
pub use hold::HoldService;
pub use inventory::InventoryService;
pub use lot::LotService;
pub use partner::PartnerService;
