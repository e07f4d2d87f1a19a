//! Authenticated REST client for the iDempiere model API.

use std::time::Duration;

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use campusgate_core::{
    AssetId, BusinessPartnerId, ErpUserId, InvoiceId, LocationId, PaymentId, RoleId,
};
use campusgate_forms::{ValidAccount, ValidBasicInfo, ValidBasicInfoUpdate, ValidLocation};
use campusgate_records::{Asset, DocAction, Invoice, Payment};
use campusgate_students::Student;

use crate::config::ErpConfig;
use crate::error::ErpError;
use crate::models::{
    self, AssetRecord, BusinessPartnerRecord, CreatedRecord, ErrorBody, InvoiceRecord,
    LoginResponse, PageEnvelope, PaymentRecord,
};
use crate::session::ErpSession;

/// Listing parameters mapped onto the ERP's OData query options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub top: Option<u32>,
    pub skip: Option<u32>,
    pub filter: Option<String>,
    pub order_by: Option<String>,
}

impl ListQuery {
    pub fn top(mut self, top: u32) -> Self {
        self.top = Some(top);
        self
    }

    pub fn skip(mut self, skip: u32) -> Self {
        self.skip = Some(skip);
        self
    }

    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn order_by(mut self, order_by: impl Into<String>) -> Self {
        self.order_by = Some(order_by.into());
        self
    }

    /// Query pairs for the request, merging an endpoint's base filter with
    /// the caller's filter.
    fn to_pairs(&self, base_filter: Option<&str>) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        let filter = match (base_filter, self.filter.as_deref()) {
            (Some(base), Some(extra)) => Some(format!("{base} and ({extra})")),
            (Some(base), None) => Some(base.to_string()),
            (None, Some(extra)) => Some(extra.to_string()),
            (None, None) => None,
        };
        if let Some(filter) = filter {
            pairs.push(("$filter", filter));
        }
        if let Some(top) = self.top {
            pairs.push(("$top", top.to_string()));
        }
        if let Some(skip) = self.skip {
            pairs.push(("$skip", skip.to_string()));
        }
        if let Some(order_by) = &self.order_by {
            pairs.push(("$orderby", order_by.clone()));
        }
        pairs
    }
}

/// One page of a listing.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub row_count: i64,
    pub page_count: i64,
}

/// The adapter proper. Holds one pooled HTTP client and the connection
/// configuration; sessions are passed into every call explicitly.
#[derive(Debug)]
pub struct ErpClient {
    http: reqwest::Client,
    config: ErpConfig,
}

impl ErpClient {
    pub fn new(config: ErpConfig) -> Result<Self, ErpError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ErpConfig {
        &self.config
    }

    /// Authenticate against the ERP and obtain a bearer token.
    pub async fn login(&self, username: &str, password: &str) -> Result<ErpSession, ErpError> {
        let url = self.config.api("auth/tokens");
        tracing::debug!(%url, %username, "logging into ERP");

        let response = self
            .http
            .post(&url)
            .json(&json!({
                "userName": username,
                "password": password,
                "parameters": {
                    "clientId": self.config.client_id,
                    "roleId": self.config.role_id,
                    "organizationId": self.config.organization_id,
                    "warehouseId": self.config.warehouse_id,
                    "language": self.config.language,
                },
            }))
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let body: ErrorBody = response.json().await.unwrap_or_default();
            let message = body.message_or("invalid credentials".to_string());
            tracing::warn!(%username, %status, "ERP login rejected");
            return Err(ErpError::Auth(message));
        }
        if !status.is_success() {
            let body: ErrorBody = response.json().await.unwrap_or_default();
            return Err(ErpError::Server {
                status: status.as_u16(),
                message: body.message_or(format!("login failed with {status}")),
            });
        }

        let login: LoginResponse = response
            .json()
            .await
            .map_err(|e| ErpError::Decode(e.to_string()))?;

        let mut session = ErpSession::new(login.token);
        session.refresh_token = login.refresh_token;
        session.user_id = login.user_id.and_then(|id| ErpUserId::from_raw(id).ok());
        tracing::info!(%username, "ERP login succeeded");
        Ok(session)
    }

    // -------------------------
    // Students (business partners)
    // -------------------------

    pub async fn create_business_partner(
        &self,
        session: &ErpSession,
        input: &ValidBasicInfo,
    ) -> Result<BusinessPartnerId, ErpError> {
        let created: CreatedRecord = self
            .request(
                session,
                Method::POST,
                "models/c_bpartner",
                &[],
                Some(models::business_partner_payload(input)),
            )
            .await?;
        BusinessPartnerId::from_raw(created.id).map_err(|e| ErpError::Decode(e.to_string()))
    }

    pub async fn get_business_partner(
        &self,
        session: &ErpSession,
        id: BusinessPartnerId,
    ) -> Result<Student, ErpError> {
        let record: BusinessPartnerRecord = self
            .request(
                session,
                Method::GET,
                &format!("models/c_bpartner/{}", id.get()),
                &[],
                None,
            )
            .await?;
        record.into_student()
    }

    pub async fn update_business_partner(
        &self,
        session: &ErpSession,
        id: BusinessPartnerId,
        input: &ValidBasicInfoUpdate,
    ) -> Result<Student, ErpError> {
        let record: BusinessPartnerRecord = self
            .request(
                session,
                Method::PUT,
                &format!("models/c_bpartner/{}", id.get()),
                &[],
                Some(models::business_partner_update_payload(input)),
            )
            .await?;
        record.into_student()
    }

    pub async fn deactivate_business_partner(
        &self,
        session: &ErpSession,
        id: BusinessPartnerId,
    ) -> Result<(), ErpError> {
        let _: BusinessPartnerRecord = self
            .request(
                session,
                Method::PUT,
                &format!("models/c_bpartner/{}", id.get()),
                &[],
                Some(json!({ "IsActive": false })),
            )
            .await?;
        Ok(())
    }

    /// Students are the business partners flagged as customers.
    pub async fn list_students(
        &self,
        session: &ErpSession,
        query: &ListQuery,
    ) -> Result<Page<Student>, ErpError> {
        let pairs = query.to_pairs(Some("IsCustomer eq true"));
        let envelope: PageEnvelope<BusinessPartnerRecord> = self
            .request(session, Method::GET, "models/c_bpartner", &pairs, None)
            .await?;
        collect_page(envelope, BusinessPartnerRecord::into_student)
    }

    // -------------------------
    // Enrollment steps 2-4
    // -------------------------

    pub async fn create_partner_location(
        &self,
        session: &ErpSession,
        business_partner_id: BusinessPartnerId,
        input: &ValidLocation,
    ) -> Result<LocationId, ErpError> {
        let created: CreatedRecord = self
            .request(
                session,
                Method::POST,
                "models/c_bpartner_location",
                &[],
                Some(models::location_payload(business_partner_id, input)),
            )
            .await?;
        LocationId::from_raw(created.id).map_err(|e| ErpError::Decode(e.to_string()))
    }

    /// Create the login user for a partner. The ERP requires a user name;
    /// it is taken from the partner record so the two stay consistent.
    pub async fn create_user(
        &self,
        session: &ErpSession,
        business_partner_id: BusinessPartnerId,
        input: &ValidAccount,
    ) -> Result<ErpUserId, ErpError> {
        let partner = self.get_business_partner(session, business_partner_id).await?;
        let created: CreatedRecord = self
            .request(
                session,
                Method::POST,
                "models/ad_user",
                &[],
                Some(models::user_payload(
                    business_partner_id,
                    &partner.full_name(),
                    input,
                )),
            )
            .await?;
        ErpUserId::from_raw(created.id).map_err(|e| ErpError::Decode(e.to_string()))
    }

    pub async fn assign_role(
        &self,
        session: &ErpSession,
        user_id: ErpUserId,
        role_id: RoleId,
    ) -> Result<(), ErpError> {
        let _: Value = self
            .request(
                session,
                Method::POST,
                "models/ad_user_roles",
                &[],
                Some(models::role_payload(user_id, role_id)),
            )
            .await?;
        Ok(())
    }

    // -------------------------
    // Documents
    // -------------------------

    pub async fn list_invoices(
        &self,
        session: &ErpSession,
        query: &ListQuery,
    ) -> Result<Page<Invoice>, ErpError> {
        let pairs = query.to_pairs(Some("IsSOTrx eq true"));
        let envelope: PageEnvelope<InvoiceRecord> = self
            .request(session, Method::GET, "models/c_invoice", &pairs, None)
            .await?;
        collect_page(envelope, InvoiceRecord::into_invoice)
    }

    pub async fn get_invoice(
        &self,
        session: &ErpSession,
        id: InvoiceId,
    ) -> Result<Invoice, ErpError> {
        let record: InvoiceRecord = self
            .request(
                session,
                Method::GET,
                &format!("models/c_invoice/{}", id.get()),
                &[],
                None,
            )
            .await?;
        record.into_invoice()
    }

    pub async fn invoice_action(
        &self,
        session: &ErpSession,
        id: InvoiceId,
        action: DocAction,
    ) -> Result<Invoice, ErpError> {
        let record: InvoiceRecord = self
            .request(
                session,
                Method::PUT,
                &format!("models/c_invoice/{}", id.get()),
                &[],
                Some(json!({ "doc-action": action.code() })),
            )
            .await?;
        record.into_invoice()
    }

    pub async fn list_payments(
        &self,
        session: &ErpSession,
        query: &ListQuery,
    ) -> Result<Page<Payment>, ErpError> {
        let pairs = query.to_pairs(None);
        let envelope: PageEnvelope<PaymentRecord> = self
            .request(session, Method::GET, "models/c_payment", &pairs, None)
            .await?;
        collect_page(envelope, PaymentRecord::into_payment)
    }

    pub async fn get_payment(
        &self,
        session: &ErpSession,
        id: PaymentId,
    ) -> Result<Payment, ErpError> {
        let record: PaymentRecord = self
            .request(
                session,
                Method::GET,
                &format!("models/c_payment/{}", id.get()),
                &[],
                None,
            )
            .await?;
        record.into_payment()
    }

    pub async fn payment_action(
        &self,
        session: &ErpSession,
        id: PaymentId,
        action: DocAction,
    ) -> Result<Payment, ErpError> {
        let record: PaymentRecord = self
            .request(
                session,
                Method::PUT,
                &format!("models/c_payment/{}", id.get()),
                &[],
                Some(json!({ "doc-action": action.code() })),
            )
            .await?;
        record.into_payment()
    }

    pub async fn list_assets(
        &self,
        session: &ErpSession,
        query: &ListQuery,
    ) -> Result<Page<Asset>, ErpError> {
        let pairs = query.to_pairs(None);
        let envelope: PageEnvelope<AssetRecord> = self
            .request(session, Method::GET, "models/a_asset", &pairs, None)
            .await?;
        collect_page(envelope, AssetRecord::into_asset)
    }

    pub async fn get_asset(&self, session: &ErpSession, id: AssetId) -> Result<Asset, ErpError> {
        let record: AssetRecord = self
            .request(
                session,
                Method::GET,
                &format!("models/a_asset/{}", id.get()),
                &[],
                None,
            )
            .await?;
        record.into_asset()
    }

    // -------------------------
    // Plumbing
    // -------------------------

    /// Single attempt, bearer-authenticated, JSON in / JSON out.
    async fn request<T: DeserializeOwned>(
        &self,
        session: &ErpSession,
        method: Method,
        path: &str,
        query: &[(&'static str, String)],
        body: Option<Value>,
    ) -> Result<T, ErpError> {
        let url = self.config.api(path);
        let mut builder = self
            .http
            .request(method.clone(), &url)
            .bearer_auth(&session.token)
            .header("Accept", "application/json");
        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(body) = body {
            builder = builder.json(&body);
        }

        let response = builder.send().await?;
        let status = response.status();
        tracing::debug!(%method, %url, %status, "ERP call");

        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| ErpError::Decode(e.to_string()));
        }

        let body: ErrorBody = response.json().await.unwrap_or_default();
        let err = match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                ErpError::Auth(body.message_or("session rejected".to_string()))
            }
            StatusCode::NOT_FOUND => ErpError::NotFound,
            _ => ErpError::Server {
                status: status.as_u16(),
                message: body.message_or(format!("request failed with {status}")),
            },
        };
        tracing::warn!(%method, %url, %status, error = %err, "ERP call failed");
        Err(err)
    }
}

fn collect_page<R, T>(
    envelope: PageEnvelope<R>,
    map: impl Fn(R) -> Result<T, ErpError>,
) -> Result<Page<T>, ErpError> {
    let items = envelope
        .records
        .into_iter()
        .map(map)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Page {
        items,
        row_count: envelope.row_count,
        page_count: envelope.page_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_query_merges_base_and_caller_filters() {
        let query = ListQuery::default()
            .filter("GradeLevel eq '5'")
            .top(25)
            .skip(50)
            .order_by("Name");
        let pairs = query.to_pairs(Some("IsCustomer eq true"));
        assert_eq!(
            pairs,
            vec![
                ("$filter", "IsCustomer eq true and (GradeLevel eq '5')".to_string()),
                ("$top", "25".to_string()),
                ("$skip", "50".to_string()),
                ("$orderby", "Name".to_string()),
            ]
        );
    }

    #[test]
    fn list_query_without_filters_sends_no_filter_option() {
        let pairs = ListQuery::default().to_pairs(None);
        assert!(pairs.is_empty());
    }
}
