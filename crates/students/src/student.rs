//! Student view model.
//!
//! A student is an ERP business partner flagged as a customer, carrying
//! school-specific attributes. The ERP owns the data; this is a read copy
//! shaped for the dashboard.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use campusgate_core::{BpGroupId, BusinessPartnerId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: BusinessPartnerId,
    /// ERP row UUID.
    pub uid: Uuid,
    /// Student code (ERP search key).
    pub value: String,
    pub name: String,
    pub name2: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub active: bool,
    pub is_customer: bool,
    pub bp_group_id: BpGroupId,
    pub grade_level: Option<String>,
    pub medical_info: Option<String>,
    pub emergency_contact: Option<String>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
}

impl Student {
    /// Display name combining the two name fields the way the ERP does.
    pub fn full_name(&self) -> String {
        match self.name2.as_deref() {
            Some(n2) if !n2.is_empty() => format!("{} {}", self.name, n2),
            _ => self.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use campusgate_core::RecordId;

    fn sample() -> Student {
        Student {
            id: BusinessPartnerId::new(RecordId::new(1000001).unwrap()),
            uid: Uuid::now_v7(),
            value: "STU001".to_string(),
            name: "John".to_string(),
            name2: Some("Doe".to_string()),
            email: None,
            phone: None,
            birthday: None,
            active: true,
            is_customer: true,
            bp_group_id: BpGroupId::from_raw(104).unwrap(),
            grade_level: Some("5".to_string()),
            medical_info: None,
            emergency_contact: None,
            created: Utc::now(),
            updated: Utc::now(),
        }
    }

    #[test]
    fn full_name_joins_both_name_fields() {
        assert_eq!(sample().full_name(), "John Doe");

        let mut s = sample();
        s.name2 = None;
        assert_eq!(s.full_name(), "John");
    }

    #[test]
    fn serializes_typed_ids_as_integers() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["id"], 1000001);
        assert_eq!(json["bp_group_id"], 104);
    }
}
