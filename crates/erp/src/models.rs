//! iDempiere wire formats, private to the adapter.
//!
//! The ERP's model API returns PascalCase column names, lookup fields that
//! are either a bare id or an `{id, identifier}` object, and an OData-ish
//! list envelope. Everything here exists to keep that out of the rest of
//! the workspace.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use campusgate_core::{
    AssetId, BpGroupId, BusinessPartnerId, ErpUserId, InvoiceId, PaymentId, RoleId,
};
use campusgate_forms::{ValidAccount, ValidBasicInfo, ValidBasicInfoUpdate, ValidLocation};
use campusgate_records::{Asset, DocStatus, Invoice, Payment};
use campusgate_students::Student;

use crate::error::ErpError;

/// Lookup column: the ERP serializes either `4` or `{"id": 4, ...}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum IdRef {
    Bare(i32),
    Object {
        id: i32,
        #[serde(default)]
        identifier: Option<String>,
    },
}

impl IdRef {
    pub(crate) fn id(&self) -> i32 {
        match self {
            IdRef::Bare(id) => *id,
            IdRef::Object { id, .. } => *id,
        }
    }

    pub(crate) fn identifier(&self) -> Option<&str> {
        match self {
            IdRef::Bare(_) => None,
            IdRef::Object { identifier, .. } => identifier.as_deref(),
        }
    }
}

/// OData-style list envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct PageEnvelope<T> {
    #[serde(default = "Vec::new")]
    pub records: Vec<T>,
    #[serde(rename = "row-count", default)]
    pub row_count: i64,
    #[serde(rename = "page-count", default)]
    pub page_count: i64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(rename = "userId", default)]
    pub user_id: Option<i32>,
}

/// Error body the ERP attaches to non-2xx answers.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

impl ErrorBody {
    pub(crate) fn message_or(self, fallback: String) -> String {
        self.message
            .or(self.detail)
            .or(self.title)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(fallback)
    }
}

/// Record created/updated responses carry at least the row id.
#[derive(Debug, Deserialize)]
pub(crate) struct CreatedRecord {
    pub id: i32,
}

// -------------------------
// Business partner (student)
// -------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct BusinessPartnerRecord {
    pub id: i32,
    pub uid: String,
    #[serde(rename = "Value")]
    pub value: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Name2", default)]
    pub name2: Option<String>,
    #[serde(rename = "EMail", default)]
    pub email: Option<String>,
    #[serde(rename = "Phone", default)]
    pub phone: Option<String>,
    #[serde(rename = "Birthday", default)]
    pub birthday: Option<String>,
    #[serde(rename = "IsActive", default)]
    pub is_active: bool,
    #[serde(rename = "IsCustomer", default)]
    pub is_customer: bool,
    #[serde(rename = "C_BP_Group_ID")]
    pub bp_group: IdRef,
    #[serde(rename = "GradeLevel", default)]
    pub grade_level: Option<String>,
    #[serde(rename = "MedicalInfo", default)]
    pub medical_info: Option<String>,
    #[serde(rename = "EmergencyContact", default)]
    pub emergency_contact: Option<String>,
    #[serde(rename = "Created")]
    pub created: String,
    #[serde(rename = "Updated")]
    pub updated: String,
}

impl BusinessPartnerRecord {
    pub(crate) fn into_student(self) -> Result<Student, ErpError> {
        Ok(Student {
            id: BusinessPartnerId::from_raw(self.id)
                .map_err(|e| ErpError::Decode(e.to_string()))?,
            uid: parse_uid(&self.uid)?,
            value: self.value,
            name: self.name,
            name2: none_if_blank(self.name2),
            email: none_if_blank(self.email),
            phone: none_if_blank(self.phone),
            birthday: self.birthday.as_deref().map(parse_date).transpose()?,
            active: self.is_active,
            is_customer: self.is_customer,
            bp_group_id: BpGroupId::from_raw(self.bp_group.id())
                .map_err(|e| ErpError::Decode(e.to_string()))?,
            grade_level: none_if_blank(self.grade_level),
            medical_info: none_if_blank(self.medical_info),
            emergency_contact: none_if_blank(self.emergency_contact),
            created: parse_timestamp(&self.created)?,
            updated: parse_timestamp(&self.updated)?,
        })
    }
}

pub(crate) fn business_partner_payload(input: &ValidBasicInfo) -> Value {
    let mut body = json!({
        "Value": input.value,
        "Name": input.name,
        "IsCustomer": true,
        "IsActive": true,
        "C_BP_Group_ID": input.bp_group_id.get(),
    });
    set_opt(&mut body, "Name2", input.name2.as_deref());
    set_opt(
        &mut body,
        "Birthday",
        input.birthday.map(|d| d.to_string()).as_deref(),
    );
    set_opt(&mut body, "GradeLevel", input.grade_level.as_deref());
    set_opt(&mut body, "MedicalInfo", input.medical_info.as_deref());
    set_opt(
        &mut body,
        "EmergencyContact",
        input.emergency_contact.as_deref(),
    );
    body
}

pub(crate) fn business_partner_update_payload(input: &ValidBasicInfoUpdate) -> Value {
    let mut body = json!({});
    set_opt(&mut body, "Value", input.value.as_deref());
    set_opt(&mut body, "Name", input.name.as_deref());
    set_opt(&mut body, "Name2", input.name2.as_deref());
    set_opt(
        &mut body,
        "Birthday",
        input.birthday.map(|d| d.to_string()).as_deref(),
    );
    if let Some(group) = input.bp_group_id {
        body["C_BP_Group_ID"] = json!(group.get());
    }
    set_opt(&mut body, "EMail", input.email.as_deref());
    set_opt(&mut body, "Phone", input.phone.as_deref());
    set_opt(&mut body, "GradeLevel", input.grade_level.as_deref());
    set_opt(&mut body, "MedicalInfo", input.medical_info.as_deref());
    set_opt(
        &mut body,
        "EmergencyContact",
        input.emergency_contact.as_deref(),
    );
    body
}

pub(crate) fn location_payload(bp: BusinessPartnerId, input: &ValidLocation) -> Value {
    let mut location = json!({});
    set_opt(&mut location, "Address1", input.address1.as_deref());
    set_opt(&mut location, "City", input.city.as_deref());
    set_opt(&mut location, "Postal", input.postal.as_deref());
    if let Some(region) = input.region_id {
        location["C_Region_ID"] = json!(region);
    }
    if let Some(country) = input.country_id {
        location["C_Country_ID"] = json!(country);
    }
    json!({
        "C_BPartner_ID": bp.get(),
        "Name": "Home",
        "C_Location_ID": location,
    })
}

pub(crate) fn user_payload(bp: BusinessPartnerId, name: &str, input: &ValidAccount) -> Value {
    let mut body = json!({
        "C_BPartner_ID": bp.get(),
        "Name": name,
        "IsActive": true,
    });
    set_opt(&mut body, "EMail", input.email.as_deref());
    set_opt(&mut body, "Phone", input.phone.as_deref());
    set_opt(&mut body, "Password", input.password.as_deref());
    body
}

pub(crate) fn role_payload(user: ErpUserId, role: RoleId) -> Value {
    json!({
        "AD_User_ID": user.get(),
        "AD_Role_ID": role.get(),
    })
}

// -------------------------
// Documents
// -------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct InvoiceRecord {
    pub id: i32,
    #[serde(rename = "DocumentNo")]
    pub document_no: String,
    #[serde(rename = "C_BPartner_ID")]
    pub bpartner: IdRef,
    #[serde(rename = "DateInvoiced")]
    pub date_invoiced: String,
    #[serde(rename = "GrandTotal")]
    pub grand_total: f64,
    #[serde(rename = "C_Currency_ID")]
    pub currency: IdRef,
    #[serde(rename = "DocStatus")]
    pub doc_status: DocStatusRef,
    #[serde(rename = "IsPaid", default)]
    pub is_paid: bool,
    #[serde(rename = "Description", default)]
    pub description: Option<String>,
}

impl InvoiceRecord {
    pub(crate) fn into_invoice(self) -> Result<Invoice, ErpError> {
        Ok(Invoice {
            id: InvoiceId::from_raw(self.id).map_err(|e| ErpError::Decode(e.to_string()))?,
            document_no: self.document_no,
            bpartner_id: BusinessPartnerId::from_raw(self.bpartner.id())
                .map_err(|e| ErpError::Decode(e.to_string()))?,
            bpartner_name: self.bpartner.identifier().unwrap_or_default().to_string(),
            date_invoiced: parse_date(&self.date_invoiced)?,
            grand_total: self.grand_total,
            currency: self.currency.identifier().unwrap_or("USD").to_string(),
            doc_status: self.doc_status.parse()?,
            is_paid: self.is_paid,
            description: none_if_blank(self.description),
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct PaymentRecord {
    pub id: i32,
    #[serde(rename = "DocumentNo")]
    pub document_no: String,
    #[serde(rename = "C_BPartner_ID")]
    pub bpartner: IdRef,
    #[serde(rename = "DateTrx")]
    pub date_trx: String,
    #[serde(rename = "PayAmt")]
    pub pay_amt: f64,
    #[serde(rename = "C_Currency_ID")]
    pub currency: IdRef,
    #[serde(rename = "DocStatus")]
    pub doc_status: DocStatusRef,
    #[serde(rename = "IsReceipt", default)]
    pub is_receipt: bool,
}

impl PaymentRecord {
    pub(crate) fn into_payment(self) -> Result<Payment, ErpError> {
        Ok(Payment {
            id: PaymentId::from_raw(self.id).map_err(|e| ErpError::Decode(e.to_string()))?,
            document_no: self.document_no,
            bpartner_id: BusinessPartnerId::from_raw(self.bpartner.id())
                .map_err(|e| ErpError::Decode(e.to_string()))?,
            bpartner_name: self.bpartner.identifier().unwrap_or_default().to_string(),
            date_trx: parse_date(&self.date_trx)?,
            pay_amt: self.pay_amt,
            currency: self.currency.identifier().unwrap_or("USD").to_string(),
            doc_status: self.doc_status.parse()?,
            is_receipt: self.is_receipt,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct AssetRecord {
    pub id: i32,
    #[serde(rename = "Value")]
    pub value: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "SerNo", default)]
    pub serial_no: Option<String>,
    #[serde(rename = "AssetServiceDate", default)]
    pub in_service_date: Option<String>,
    #[serde(rename = "IsInPosession", default)]
    pub is_in_posession: bool,
    #[serde(rename = "IsDisposed", default)]
    pub is_disposed: bool,
    #[serde(rename = "C_BPartner_ID", default)]
    pub bpartner: Option<IdRef>,
    #[serde(rename = "Updated")]
    pub updated: String,
}

impl AssetRecord {
    pub(crate) fn into_asset(self) -> Result<Asset, ErpError> {
        Ok(Asset {
            id: AssetId::from_raw(self.id).map_err(|e| ErpError::Decode(e.to_string()))?,
            value: self.value,
            name: self.name,
            serial_no: none_if_blank(self.serial_no),
            in_service_date: self
                .in_service_date
                .as_deref()
                .map(parse_date)
                .transpose()?,
            is_in_posession: self.is_in_posession,
            is_disposed: self.is_disposed,
            bpartner_id: match self.bpartner {
                None => None,
                Some(r) => Some(
                    BusinessPartnerId::from_raw(r.id())
                        .map_err(|e| ErpError::Decode(e.to_string()))?,
                ),
            },
            updated: parse_timestamp(&self.updated)?,
        })
    }
}

/// `DocStatus` arrives either as a bare code or as a reference object whose
/// `id` is the code string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum DocStatusRef {
    Code(String),
    Object { id: String },
}

impl DocStatusRef {
    fn parse(&self) -> Result<DocStatus, ErpError> {
        let code = match self {
            DocStatusRef::Code(c) => c,
            DocStatusRef::Object { id } => id,
        };
        DocStatus::from_code(code).map_err(|e| ErpError::Decode(e.to_string()))
    }
}

// -------------------------
// Parsing helpers
// -------------------------

fn parse_uid(raw: &str) -> Result<Uuid, ErpError> {
    raw.parse()
        .map_err(|e| ErpError::Decode(format!("bad record uid {raw:?}: {e}")))
}

/// The ERP emits dates either bare (`2010-04-09`) or as a timestamp; the
/// date portion is always the first ten characters.
pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, ErpError> {
    let prefix = raw.get(..10).unwrap_or(raw);
    prefix
        .parse()
        .map_err(|e| ErpError::Decode(format!("bad date {raw:?}: {e}")))
}

pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, ErpError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    // Older servers drop the zone suffix; treat those as UTC.
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| ErpError::Decode(format!("bad timestamp {raw:?}: {e}")))
}

fn none_if_blank(s: Option<String>) -> Option<String> {
    s.filter(|v| !v.trim().is_empty())
}

fn set_opt(body: &mut Value, key: &str, value: Option<&str>) {
    if let Some(value) = value {
        body[key] = json!(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn business_partner_record_maps_to_student() {
        let raw = serde_json::json!({
            "id": 1000001,
            "uid": "8e2f7d6a-8f30-4d7c-9b68-3c1f1f2ab001",
            "Value": "STU001",
            "Name": "John",
            "Name2": "Doe",
            "EMail": "john@school.edu",
            "Birthday": "2010-04-09T00:00:00Z",
            "IsActive": true,
            "IsCustomer": true,
            "C_BP_Group_ID": { "id": 104, "identifier": "Students" },
            "GradeLevel": "5",
            "Created": "2024-01-05T10:00:00Z",
            "Updated": "2024-02-01T09:30:00Z"
        });
        let record: BusinessPartnerRecord = serde_json::from_value(raw).unwrap();
        let student = record.into_student().unwrap();

        assert_eq!(student.id.get(), 1000001);
        assert_eq!(student.value, "STU001");
        assert_eq!(student.full_name(), "John Doe");
        assert_eq!(student.bp_group_id.get(), 104);
        assert_eq!(student.birthday.unwrap().to_string(), "2010-04-09");
        assert!(student.is_customer);
    }

    #[test]
    fn lookup_fields_accept_bare_integers() {
        let raw = serde_json::json!({
            "id": 5,
            "uid": "8e2f7d6a-8f30-4d7c-9b68-3c1f1f2ab002",
            "Value": "STU002",
            "Name": "Ada",
            "IsActive": true,
            "IsCustomer": true,
            "C_BP_Group_ID": 104,
            "Created": "2024-01-05T10:00:00",
            "Updated": "2024-01-05T10:00:00"
        });
        let record: BusinessPartnerRecord = serde_json::from_value(raw).unwrap();
        let student = record.into_student().unwrap();
        assert_eq!(student.bp_group_id.get(), 104);
    }

    #[test]
    fn invoice_record_maps_status_and_partner_name() {
        let raw = serde_json::json!({
            "id": 77,
            "DocumentNo": "INV-2024-0001",
            "C_BPartner_ID": { "id": 1000001, "identifier": "STU001 - John Doe" },
            "DateInvoiced": "2024-03-01T00:00:00Z",
            "GrandTotal": 350.0,
            "C_Currency_ID": { "id": 100, "identifier": "USD" },
            "DocStatus": { "id": "CO" },
            "IsPaid": false
        });
        let record: InvoiceRecord = serde_json::from_value(raw).unwrap();
        let invoice = record.into_invoice().unwrap();

        assert_eq!(invoice.doc_status, DocStatus::Completed);
        assert_eq!(invoice.bpartner_name, "STU001 - John Doe");
        assert_eq!(invoice.date_invoiced.to_string(), "2024-03-01");
    }

    #[test]
    fn page_envelope_defaults_missing_records() {
        let raw = serde_json::json!({ "row-count": 0 });
        let page: PageEnvelope<InvoiceRecord> = serde_json::from_value(raw).unwrap();
        assert!(page.records.is_empty());
        assert_eq!(page.page_count, 0);
    }

    #[test]
    fn create_payload_skips_absent_optionals() {
        let input = ValidBasicInfo {
            value: "STU001".to_string(),
            name: "John".to_string(),
            name2: None,
            birthday: None,
            bp_group_id: BpGroupId::from_raw(104).unwrap(),
            grade_level: Some("5".to_string()),
            medical_info: None,
            emergency_contact: None,
        };
        let body = business_partner_payload(&input);
        assert_eq!(body["Value"], "STU001");
        assert_eq!(body["IsCustomer"], true);
        assert_eq!(body["GradeLevel"], "5");
        assert!(body.get("Name2").is_none());
        assert!(body.get("Birthday").is_none());
    }

    #[test]
    fn error_body_prefers_message_over_title() {
        let raw = serde_json::json!({ "title": "Error", "message": "duplicate Value" });
        let body: ErrorBody = serde_json::from_value(raw).unwrap();
        assert_eq!(body.message_or("fallback".to_string()), "duplicate Value");

        let body = ErrorBody::default();
        assert_eq!(body.message_or("fallback".to_string()), "fallback");
    }
}
