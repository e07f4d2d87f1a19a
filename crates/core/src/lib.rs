//! `campusgate-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no transport concerns).

pub mod error;
pub mod id;

pub use error::{DomainError, DomainResult};
pub use id::{
    AssetId, BpGroupId, BusinessPartnerId, ErpUserId, InvoiceId, LocationId, PaymentId, RecordId,
    RoleId,
};
