//! Strongly-typed ERP record identifiers.
//!
//! iDempiere rows are addressed by positive integer ids. Each entity kind
//! gets its own newtype so a location id can never be passed where a
//! business-partner id is expected.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// A raw ERP row id. Always positive.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(i32);

impl RecordId {
    /// Wrap a raw row id, rejecting zero and negative values.
    pub fn new(raw: i32) -> Result<Self, DomainError> {
        if raw <= 0 {
            return Err(DomainError::invalid_id(format!(
                "record id must be positive, got {raw}"
            )));
        }
        Ok(Self(raw))
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

impl core::fmt::Display for RecordId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for RecordId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw: i32 = s
            .parse()
            .map_err(|e| DomainError::invalid_id(format!("RecordId: {e}")))?;
        Self::new(raw)
    }
}

macro_rules! impl_record_id_newtype {
    ($t:ident, $name:literal) => {
        /// Typed ERP record id.
        #[derive(
            Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $t(RecordId);

        impl $t {
            pub fn new(id: RecordId) -> Self {
                Self(id)
            }

            /// Wrap a raw row id, rejecting zero and negative values.
            pub fn from_raw(raw: i32) -> Result<Self, DomainError> {
                Ok(Self(RecordId::new(raw)?))
            }

            pub fn record_id(self) -> RecordId {
                self.0
            }

            pub fn get(self) -> i32 {
                self.0.get()
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let raw: i32 = s
                    .parse()
                    .map_err(|e| DomainError::invalid_id(format!("{}: {e}", $name)))?;
                Self::from_raw(raw)
            }
        }
    };
}

impl_record_id_newtype!(BusinessPartnerId, "BusinessPartnerId");
impl_record_id_newtype!(LocationId, "LocationId");
impl_record_id_newtype!(ErpUserId, "ErpUserId");
impl_record_id_newtype!(RoleId, "RoleId");
impl_record_id_newtype!(BpGroupId, "BpGroupId");
impl_record_id_newtype!(InvoiceId, "InvoiceId");
impl_record_id_newtype!(PaymentId, "PaymentId");
impl_record_id_newtype!(AssetId, "AssetId");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_id_rejects_zero_and_negative() {
        assert!(RecordId::new(0).is_err());
        assert!(RecordId::new(-7).is_err());
        assert_eq!(RecordId::new(42).unwrap().get(), 42);
    }

    #[test]
    fn record_id_parses_from_string() {
        let id: RecordId = "1000001".parse().unwrap();
        assert_eq!(id.get(), 1_000_001);

        let err: Result<RecordId, _> = "not-a-number".parse();
        match err {
            Err(DomainError::InvalidId(_)) => {}
            other => panic!("expected InvalidId, got {other:?}"),
        }
    }

    #[test]
    fn typed_ids_round_trip_serde_as_bare_integers() {
        let id = BusinessPartnerId::from_raw(115).unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "115");

        let back: BusinessPartnerId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn typed_id_parse_reports_type_name() {
        let err = "x".parse::<RoleId>().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("RoleId"), "unexpected message: {msg}");
    }
}
