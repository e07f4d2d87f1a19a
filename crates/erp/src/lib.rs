//! `campusgate-erp` — iDempiere REST client adapter.
//!
//! Translates typed requests into authenticated REST calls against the
//! ERP's model API and maps raw payloads back into the dashboard's view
//! models. Wire-format structs (iDempiere column names, OData envelopes)
//! stay private to this crate.
//!
//! No retry policy lives here: every operation is a single attempt and the
//! caller decides whether to retry.

pub mod client;
pub mod config;
pub mod error;
pub mod gateway;
mod models;
pub mod session;

pub use client::{ErpClient, ListQuery, Page};
pub use config::ErpConfig;
pub use error::ErpError;
pub use gateway::ErpEnrollmentGateway;
pub use session::ErpSession;
