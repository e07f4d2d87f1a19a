//! Remote seam for the enrollment workflow.

use async_trait::async_trait;

use campusgate_core::{BusinessPartnerId, ErpUserId, LocationId, RoleId};
use campusgate_forms::{ValidAccount, ValidBasicInfo, ValidLocation};

/// The four remote calls the enrollment workflow composes, one per step.
///
/// The error type is left to the implementor so this crate stays free of
/// transport concerns; the ERP adapter implements it with its own error,
/// tests with a scripted stub.
#[async_trait]
pub trait EnrollmentGateway: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Step 1 — create the business partner (the student record itself).
    async fn create_business_partner(
        &self,
        input: &ValidBasicInfo,
    ) -> Result<BusinessPartnerId, Self::Error>;

    /// Step 2 — attach a location to the partner created in step 1.
    async fn create_partner_location(
        &self,
        business_partner_id: BusinessPartnerId,
        input: &ValidLocation,
    ) -> Result<LocationId, Self::Error>;

    /// Step 3 — create the login user for the partner created in step 1.
    async fn create_user(
        &self,
        business_partner_id: BusinessPartnerId,
        input: &ValidAccount,
    ) -> Result<ErpUserId, Self::Error>;

    /// Step 4 — grant a role to the user created in step 3.
    async fn assign_role(&self, user_id: ErpUserId, role_id: RoleId)
        -> Result<(), Self::Error>;
}
