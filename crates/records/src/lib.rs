//! `campusgate-records` — document-entity view models and screen configs.
//!
//! Invoices, payments, and assets are owned by the ERP; this crate holds
//! the read-side view models the dashboard lists and inspects, plus the
//! tagged-variant screen configuration (table columns and action menus)
//! selected per entity kind at construction time.

pub mod document;
pub mod screen;

pub use document::{Asset, DocStatus, Invoice, Payment};
pub use screen::{Column, DocAction, EntityScreen};
