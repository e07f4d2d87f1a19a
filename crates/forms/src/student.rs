//! Step schemas for the student enrollment and update flows.
//!
//! Each step of the enrollment flow has its own raw form struct and a
//! validator returning a typed, validated value. The update flow relaxes
//! required-ness but keeps every format rule for fields that are present.

use chrono::NaiveDate;
use serde::Deserialize;

use campusgate_core::{BpGroupId, RoleId};

use crate::field::{ErrorBag, FieldErrors};

/// Step 1 — basic info (creates the business partner).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BasicInfoForm {
    /// Student code (iDempiere search key, "Value").
    pub value: String,
    pub name: String,
    pub name2: Option<String>,
    /// ISO date, `YYYY-MM-DD`.
    pub birthday: Option<String>,
    pub bp_group_id: i32,
    pub grade_level: Option<String>,
    pub medical_info: Option<String>,
    pub emergency_contact: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidBasicInfo {
    pub value: String,
    pub name: String,
    pub name2: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub bp_group_id: BpGroupId,
    pub grade_level: Option<String>,
    pub medical_info: Option<String>,
    pub emergency_contact: Option<String>,
}

/// Step 2 — location (creates the business-partner location).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocationForm {
    pub address1: Option<String>,
    pub city: Option<String>,
    pub postal: Option<String>,
    pub region_id: Option<i32>,
    pub country_id: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidLocation {
    pub address1: Option<String>,
    pub city: Option<String>,
    pub postal: Option<String>,
    pub region_id: Option<i32>,
    pub country_id: Option<i32>,
}

/// Step 3 — account (creates the ERP user).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountForm {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidAccount {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
}

/// Step 4 — role assignment.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoleForm {
    pub role_id: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidRole {
    pub role_id: RoleId,
}

/// Update flow — every basic-info field optional, format rules still apply.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BasicInfoUpdateForm {
    pub value: Option<String>,
    pub name: Option<String>,
    pub name2: Option<String>,
    pub birthday: Option<String>,
    pub bp_group_id: Option<i32>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub grade_level: Option<String>,
    pub medical_info: Option<String>,
    pub emergency_contact: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidBasicInfoUpdate {
    pub value: Option<String>,
    pub name: Option<String>,
    pub name2: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub bp_group_id: Option<BpGroupId>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub grade_level: Option<String>,
    pub medical_info: Option<String>,
    pub emergency_contact: Option<String>,
}

pub fn validate_basic_info(form: &BasicInfoForm) -> Result<ValidBasicInfo, FieldErrors> {
    let mut bag = ErrorBag::default();

    let value = form.value.trim();
    if value.is_empty() {
        bag.push("value", "student code is required");
    }

    let name = form.name.trim();
    if name.is_empty() {
        bag.push("name", "name is required");
    }

    let bp_group_id = match BpGroupId::from_raw(form.bp_group_id) {
        Ok(id) => Some(id),
        Err(_) => {
            bag.push("bp_group_id", "group must be a positive id");
            None
        }
    };

    let birthday = match validate_birthday(form.birthday.as_deref()) {
        Ok(d) => d,
        Err(msg) => {
            bag.push("birthday", msg);
            None
        }
    };

    // An empty bag implies every required part parsed; the match keeps that
    // knowledge in the type system instead of unwrapping.
    match (bag.take(), bp_group_id) {
        (Some(errors), _) => Err(errors),
        (None, Some(bp_group_id)) => Ok(ValidBasicInfo {
            value: value.to_string(),
            name: name.to_string(),
            name2: non_empty(form.name2.as_deref()),
            birthday,
            bp_group_id,
            grade_level: non_empty(form.grade_level.as_deref()),
            medical_info: non_empty(form.medical_info.as_deref()),
            emergency_contact: non_empty(form.emergency_contact.as_deref()),
        }),
        (None, None) => unreachable!("missing bp_group_id always pushes a field error"),
    }
}

pub fn validate_location(form: &LocationForm) -> Result<ValidLocation, FieldErrors> {
    let mut bag = ErrorBag::default();

    if let Some(region_id) = form.region_id {
        if region_id <= 0 {
            bag.push("region_id", "region must be a positive id");
        }
    }
    if let Some(country_id) = form.country_id {
        if country_id <= 0 {
            bag.push("country_id", "country must be a positive id");
        }
    }

    let valid = ValidLocation {
        address1: non_empty(form.address1.as_deref()),
        city: non_empty(form.city.as_deref()),
        postal: non_empty(form.postal.as_deref()),
        region_id: form.region_id,
        country_id: form.country_id,
    };
    bag.finish(valid)
}

pub fn validate_account(form: &AccountForm) -> Result<ValidAccount, FieldErrors> {
    let mut bag = ErrorBag::default();

    let email = non_empty(form.email.as_deref());
    if let Some(email) = email.as_deref() {
        if !is_email_shaped(email) {
            bag.push("email", "must be a valid email address");
        }
    }

    let valid = ValidAccount {
        email,
        phone: non_empty(form.phone.as_deref()),
        password: non_empty(form.password.as_deref()),
    };
    bag.finish(valid)
}

pub fn validate_role(form: &RoleForm) -> Result<ValidRole, FieldErrors> {
    let mut bag = ErrorBag::default();

    match RoleId::from_raw(form.role_id) {
        Ok(role_id) => bag.finish(ValidRole { role_id }),
        Err(_) => {
            bag.push("role_id", "role must be a positive id");
            match bag.take() {
                Some(errors) => Err(errors),
                None => unreachable!("a field error was just pushed"),
            }
        }
    }
}

pub fn validate_basic_info_update(
    form: &BasicInfoUpdateForm,
) -> Result<ValidBasicInfoUpdate, FieldErrors> {
    let mut bag = ErrorBag::default();

    // Present-but-blank required fields are rejected: an update may omit the
    // code or name, but cannot blank them out.
    let value = match form.value.as_deref() {
        None => None,
        Some(v) if v.trim().is_empty() => {
            bag.push("value", "student code cannot be blank");
            None
        }
        Some(v) => Some(v.trim().to_string()),
    };
    let name = match form.name.as_deref() {
        None => None,
        Some(v) if v.trim().is_empty() => {
            bag.push("name", "name cannot be blank");
            None
        }
        Some(v) => Some(v.trim().to_string()),
    };

    let bp_group_id = match form.bp_group_id {
        None => None,
        Some(raw) => match BpGroupId::from_raw(raw) {
            Ok(id) => Some(id),
            Err(_) => {
                bag.push("bp_group_id", "group must be a positive id");
                None
            }
        },
    };

    let birthday = match validate_birthday(form.birthday.as_deref()) {
        Ok(d) => d,
        Err(msg) => {
            bag.push("birthday", msg);
            None
        }
    };

    let email = non_empty(form.email.as_deref());
    if let Some(email) = email.as_deref() {
        if !is_email_shaped(email) {
            bag.push("email", "must be a valid email address");
        }
    }

    let valid = ValidBasicInfoUpdate {
        value,
        name,
        name2: non_empty(form.name2.as_deref()),
        birthday,
        bp_group_id,
        email,
        phone: non_empty(form.phone.as_deref()),
        grade_level: non_empty(form.grade_level.as_deref()),
        medical_info: non_empty(form.medical_info.as_deref()),
        emergency_contact: non_empty(form.emergency_contact.as_deref()),
    };
    bag.finish(valid)
}

/// Trim and drop whitespace-only strings.
fn non_empty(s: Option<&str>) -> Option<String> {
    s.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Pragmatic email shape: one `@`, non-empty local part, and a dot in the
/// domain with non-empty labels around it. Not full RFC 5322.
fn is_email_shaped(s: &str) -> bool {
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !host.is_empty() && !tld.is_empty() && !s.contains(char::is_whitespace)
}

/// Empty/missing is fine; a present value must be a real `YYYY-MM-DD` date.
fn validate_birthday(raw: Option<&str>) -> Result<Option<NaiveDate>, &'static str> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    // Strict shape first: chrono would also accept un-padded months/days.
    let bytes = raw.as_bytes();
    let shaped = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && raw
            .chars()
            .enumerate()
            .all(|(i, c)| matches!(i, 4 | 7) || c.is_ascii_digit());
    if !shaped {
        return Err("must be formatted YYYY-MM-DD");
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| "is not a valid calendar date")
}
