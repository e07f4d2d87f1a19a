//! Authenticated ERP session.

use chrono::{DateTime, Utc};

use campusgate_core::ErpUserId;

/// Bearer token plus identity returned by the ERP's auth endpoint.
///
/// Held server-side per dashboard session; the browser only ever sees the
/// opaque authentication cookie, never this token.
#[derive(Debug, Clone)]
pub struct ErpSession {
    pub token: String,
    pub refresh_token: Option<String>,
    pub user_id: Option<ErpUserId>,
    pub logged_in_at: DateTime<Utc>,
}

impl ErpSession {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            refresh_token: None,
            user_id: None,
            logged_in_at: Utc::now(),
        }
    }
}
