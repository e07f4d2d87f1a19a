//! Entity screen configuration.
//!
//! Each dashboard entity gets an explicit, tagged configuration: master
//! data (students, assets) exposes edit-style actions; workflow documents
//! (invoices, payments) expose document actions filtered by the current
//! status. The variants are chosen at construction time, never inferred
//! from optional fields.

use serde::Serialize;

use crate::document::DocStatus;

/// Document workflow action and its ERP action code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocAction {
    Complete,
    Void,
    Reverse,
    Close,
}

impl DocAction {
    /// Code posted to the ERP's `doc-action` field.
    pub fn code(self) -> &'static str {
        match self {
            DocAction::Complete => "CO",
            DocAction::Void => "VO",
            DocAction::Reverse => "RC",
            DocAction::Close => "CL",
        }
    }

    /// Whether this action is legal from the given status.
    pub fn allowed_from(self, status: DocStatus) -> bool {
        match self {
            DocAction::Complete => {
                matches!(status, DocStatus::Drafted | DocStatus::InProgress)
            }
            DocAction::Void => matches!(
                status,
                DocStatus::Drafted | DocStatus::InProgress | DocStatus::Completed
            ),
            DocAction::Reverse => status == DocStatus::Completed,
            DocAction::Close => status == DocStatus::Completed,
        }
    }
}

/// One column of a list screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Column {
    pub key: &'static str,
    pub label: &'static str,
    pub numeric: bool,
}

impl Column {
    const fn text(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            numeric: false,
        }
    }

    const fn number(key: &'static str, label: &'static str) -> Self {
        Self {
            key,
            label,
            numeric: true,
        }
    }
}

/// Screen configuration per entity kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntityScreen {
    /// Master data: create/edit/deactivate, no document workflow.
    MasterData {
        entity: &'static str,
        columns: Vec<Column>,
        can_edit: bool,
        can_deactivate: bool,
    },
    /// Workflow document: read-only fields plus status-gated actions.
    Document {
        entity: &'static str,
        columns: Vec<Column>,
        workflow_actions: Vec<DocAction>,
    },
}

impl EntityScreen {
    pub fn for_students() -> Self {
        EntityScreen::MasterData {
            entity: "students",
            columns: vec![
                Column::text("value", "Code"),
                Column::text("name", "Name"),
                Column::text("grade_level", "Grade"),
                Column::text("email", "Email"),
                Column::text("active", "Active"),
            ],
            can_edit: true,
            can_deactivate: true,
        }
    }

    pub fn for_assets() -> Self {
        EntityScreen::MasterData {
            entity: "assets",
            columns: vec![
                Column::text("value", "Code"),
                Column::text("name", "Name"),
                Column::text("serial_no", "Serial"),
                Column::text("in_service_date", "In Service"),
            ],
            can_edit: true,
            can_deactivate: false,
        }
    }

    pub fn for_invoices() -> Self {
        EntityScreen::Document {
            entity: "invoices",
            columns: vec![
                Column::text("document_no", "Document"),
                Column::text("bpartner_name", "Student"),
                Column::text("date_invoiced", "Date"),
                Column::number("grand_total", "Total"),
                Column::text("doc_status", "Status"),
            ],
            workflow_actions: vec![DocAction::Complete, DocAction::Void, DocAction::Reverse],
        }
    }

    pub fn for_payments() -> Self {
        EntityScreen::Document {
            entity: "payments",
            columns: vec![
                Column::text("document_no", "Document"),
                Column::text("bpartner_name", "Student"),
                Column::text("date_trx", "Date"),
                Column::number("pay_amt", "Amount"),
                Column::text("doc_status", "Status"),
            ],
            workflow_actions: vec![DocAction::Complete, DocAction::Void],
        }
    }

    pub fn entity(&self) -> &'static str {
        match self {
            EntityScreen::MasterData { entity, .. } | EntityScreen::Document { entity, .. } => {
                entity
            }
        }
    }

    /// Actions legal for a document currently in `status`. Master-data
    /// screens have none.
    pub fn available_actions(&self, status: DocStatus) -> Vec<DocAction> {
        match self {
            EntityScreen::MasterData { .. } => Vec::new(),
            EntityScreen::Document {
                workflow_actions, ..
            } => workflow_actions
                .iter()
                .copied()
                .filter(|a| a.allowed_from(status))
                .collect(),
        }
    }

    /// Whether this screen's action menu offers `action` at all (before
    /// status filtering).
    pub fn offers(&self, action: DocAction) -> bool {
        match self {
            EntityScreen::MasterData { .. } => false,
            EntityScreen::Document {
                workflow_actions, ..
            } => workflow_actions.contains(&action),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn voided_invoice_offers_no_actions() {
        let screen = EntityScreen::for_invoices();
        assert!(screen.available_actions(DocStatus::Voided).is_empty());
    }

    #[test]
    fn completed_invoice_can_be_voided_or_reversed_but_not_completed() {
        let screen = EntityScreen::for_invoices();
        let actions = screen.available_actions(DocStatus::Completed);
        assert!(actions.contains(&DocAction::Void));
        assert!(actions.contains(&DocAction::Reverse));
        assert!(!actions.contains(&DocAction::Complete));
    }

    #[test]
    fn drafted_invoice_can_be_completed() {
        let screen = EntityScreen::for_invoices();
        let actions = screen.available_actions(DocStatus::Drafted);
        assert!(actions.contains(&DocAction::Complete));
        assert!(!actions.contains(&DocAction::Reverse));
    }

    #[test]
    fn master_data_screens_never_offer_document_actions() {
        let screen = EntityScreen::for_students();
        assert!(screen.available_actions(DocStatus::Completed).is_empty());
        assert!(!screen.offers(DocAction::Void));
    }

    #[test]
    fn payments_do_not_offer_reverse() {
        let screen = EntityScreen::for_payments();
        assert!(!screen.offers(DocAction::Reverse));
        assert!(screen.offers(DocAction::Void));
    }

    #[test]
    fn screen_config_serializes_with_kind_tag() {
        let json = serde_json::to_value(EntityScreen::for_invoices()).unwrap();
        assert_eq!(json["kind"], "document");
        assert_eq!(json["entity"], "invoices");

        let json = serde_json::to_value(EntityScreen::for_students()).unwrap();
        assert_eq!(json["kind"], "master_data");
    }
}
