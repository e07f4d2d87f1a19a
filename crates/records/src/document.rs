//! View models for ERP documents shown on the dashboard.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use campusgate_core::{AssetId, BusinessPartnerId, DomainError, InvoiceId, PaymentId};

/// iDempiere document status, mapped from the two-letter wire codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocStatus {
    Drafted,
    InProgress,
    Completed,
    Voided,
    Reversed,
    Closed,
}

impl DocStatus {
    /// Parse the ERP wire code (`DR`, `IP`, `CO`, `VO`, `RE`, `CL`).
    pub fn from_code(code: &str) -> Result<Self, DomainError> {
        match code {
            "DR" => Ok(DocStatus::Drafted),
            "IP" => Ok(DocStatus::InProgress),
            "CO" => Ok(DocStatus::Completed),
            "VO" => Ok(DocStatus::Voided),
            "RE" => Ok(DocStatus::Reversed),
            "CL" => Ok(DocStatus::Closed),
            other => Err(DomainError::validation(format!(
                "unknown document status code: {other}"
            ))),
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            DocStatus::Drafted => "DR",
            DocStatus::InProgress => "IP",
            DocStatus::Completed => "CO",
            DocStatus::Voided => "VO",
            DocStatus::Reversed => "RE",
            DocStatus::Closed => "CL",
        }
    }

    /// Label shown in list screens.
    pub fn label(self) -> &'static str {
        match self {
            DocStatus::Drafted => "Drafted",
            DocStatus::InProgress => "In Progress",
            DocStatus::Completed => "Completed",
            DocStatus::Voided => "Voided",
            DocStatus::Reversed => "Reversed",
            DocStatus::Closed => "Closed",
        }
    }

    /// Whether the document is still open to workflow actions.
    pub fn is_actionable(self) -> bool {
        matches!(
            self,
            DocStatus::Drafted | DocStatus::InProgress | DocStatus::Completed
        )
    }
}

/// Student fee invoice (AR invoice in the ERP).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: InvoiceId,
    pub document_no: String,
    pub bpartner_id: BusinessPartnerId,
    pub bpartner_name: String,
    pub date_invoiced: NaiveDate,
    pub grand_total: f64,
    pub currency: String,
    pub doc_status: DocStatus,
    pub is_paid: bool,
    pub description: Option<String>,
}

/// Payment received against a partner (receipt) or paid out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub document_no: String,
    pub bpartner_id: BusinessPartnerId,
    pub bpartner_name: String,
    pub date_trx: NaiveDate,
    pub pay_amt: f64,
    pub currency: String,
    pub doc_status: DocStatus,
    pub is_receipt: bool,
}

/// School asset (equipment, devices) tracked in the ERP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: AssetId,
    pub value: String,
    pub name: String,
    pub serial_no: Option<String>,
    pub in_service_date: Option<NaiveDate>,
    pub is_in_posession: bool,
    pub is_disposed: bool,
    pub bpartner_id: Option<BusinessPartnerId>,
    pub updated: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doc_status_round_trips_wire_codes() {
        for status in [
            DocStatus::Drafted,
            DocStatus::InProgress,
            DocStatus::Completed,
            DocStatus::Voided,
            DocStatus::Reversed,
            DocStatus::Closed,
        ] {
            assert_eq!(DocStatus::from_code(status.code()).unwrap(), status);
        }
    }

    #[test]
    fn doc_status_rejects_unknown_codes() {
        let err = DocStatus::from_code("XX").unwrap_err();
        match err {
            DomainError::Validation(msg) => assert!(msg.contains("XX")),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn terminal_statuses_are_not_actionable() {
        assert!(DocStatus::Completed.is_actionable());
        assert!(!DocStatus::Voided.is_actionable());
        assert!(!DocStatus::Reversed.is_actionable());
        assert!(!DocStatus::Closed.is_actionable());
    }
}
