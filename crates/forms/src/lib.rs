//! `campusgate-forms` — per-step form validation schemas.
//!
//! Pure functions mapping raw step input to either a validated value or a
//! set of field-level error messages. No IO, fully deterministic, safe to
//! re-run on every keystroke.

pub mod field;
pub mod student;

pub use field::{FieldError, FieldErrors};
pub use student::{
    validate_account, validate_basic_info, validate_basic_info_update, validate_location,
    validate_role, AccountForm, BasicInfoForm, BasicInfoUpdateForm, LocationForm, RoleForm,
    ValidAccount, ValidBasicInfo, ValidBasicInfoUpdate, ValidLocation, ValidRole,
};

#[cfg(test)]
mod tests {
    // Downstream crates import the validators from the crate root.
    use crate::{validate_account, validate_role, AccountForm, RoleForm};

    #[test]
    fn validators_are_reachable_from_the_crate_root() {
        assert!(validate_role(&RoleForm { role_id: 102 }).is_ok());
        assert!(validate_account(&AccountForm {
            email: Some("a@b.example".to_string()),
            phone: None,
            password: None,
        })
        .is_ok());
    }
}
