//! [`EnrollmentGateway`] implementation backed by the live ERP.

use std::sync::Arc;

use async_trait::async_trait;

use campusgate_core::{BusinessPartnerId, ErpUserId, LocationId, RoleId};
use campusgate_forms::{ValidAccount, ValidBasicInfo, ValidLocation};
use campusgate_students::EnrollmentGateway;

use crate::client::ErpClient;
use crate::error::ErpError;
use crate::session::ErpSession;

/// Binds a shared client to one dashboard session so the enrollment
/// workflow can issue its step calls without seeing tokens or transport.
#[derive(Debug, Clone)]
pub struct ErpEnrollmentGateway {
    client: Arc<ErpClient>,
    session: ErpSession,
}

impl ErpEnrollmentGateway {
    pub fn new(client: Arc<ErpClient>, session: ErpSession) -> Self {
        Self { client, session }
    }
}

#[async_trait]
impl EnrollmentGateway for ErpEnrollmentGateway {
    type Error = ErpError;

    async fn create_business_partner(
        &self,
        input: &ValidBasicInfo,
    ) -> Result<BusinessPartnerId, ErpError> {
        self.client
            .create_business_partner(&self.session, input)
            .await
    }

    async fn create_partner_location(
        &self,
        business_partner_id: BusinessPartnerId,
        input: &ValidLocation,
    ) -> Result<LocationId, ErpError> {
        self.client
            .create_partner_location(&self.session, business_partner_id, input)
            .await
    }

    async fn create_user(
        &self,
        business_partner_id: BusinessPartnerId,
        input: &ValidAccount,
    ) -> Result<ErpUserId, ErpError> {
        self.client
            .create_user(&self.session, business_partner_id, input)
            .await
    }

    async fn assign_role(&self, user_id: ErpUserId, role_id: RoleId) -> Result<(), ErpError> {
        self.client
            .assign_role(&self.session, user_id, role_id)
            .await
    }
}
