//! Request DTOs and JSON mapping helpers.

use serde::Deserialize;

use campusgate_erp::{ListQuery, Page};
use campusgate_records::DocAction;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Listing query parameters, mapped onto the adapter's OData options.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub top: Option<u32>,
    pub skip: Option<u32>,
    pub filter: Option<String>,
    pub order_by: Option<String>,
}

impl ListParams {
    pub fn into_query(self) -> ListQuery {
        ListQuery {
            top: self.top,
            skip: self.skip,
            filter: self.filter,
            order_by: self.order_by,
        }
    }
}

/// Document workflow action request.
#[derive(Debug, Deserialize)]
pub struct DocActionRequest {
    pub action: String,
}

impl DocActionRequest {
    pub fn parse(&self) -> Option<DocAction> {
        match self.action.as_str() {
            "complete" => Some(DocAction::Complete),
            "void" => Some(DocAction::Void),
            "reverse" => Some(DocAction::Reverse),
            "close" => Some(DocAction::Close),
            _ => None,
        }
    }
}

pub fn page_to_json<T: serde::Serialize>(page: Page<T>) -> serde_json::Value {
    serde_json::json!({
        "items": page.items,
        "row_count": page.row_count,
        "page_count": page.page_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doc_action_request_parses_known_actions() {
        let req = DocActionRequest {
            action: "void".to_string(),
        };
        assert_eq!(req.parse(), Some(DocAction::Void));

        let req = DocActionRequest {
            action: "explode".to_string(),
        };
        assert_eq!(req.parse(), None);
    }
}
