use campusgate_erp::ErpSession;

/// Authenticated request context: the opaque cookie key and the ERP
/// session it resolves to.
///
/// Present on every protected route; inserted by the auth gate.
#[derive(Debug, Clone)]
pub struct SessionContext {
    key: String,
    erp: ErpSession,
}

impl SessionContext {
    pub fn new(key: String, erp: ErpSession) -> Self {
        Self { key, erp }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn erp(&self) -> &ErpSession {
        &self.erp
    }
}
