use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use crate::ordering::Ordered;

/// A task item belonging to exactly one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Card {
    pub id: String,
    /// Owning board, denormalized from the column for scoped lookups.
    pub board_id: String,
    pub title: String,
    pub description: Option<String>,
    pub assignee: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
    /// Current column; changes when the card is moved.
    pub column_id: String,
    /// Display position within the column, assigned append-only.
    #[sqlx(rename = "order_num")]
    pub order: i32,
    #[serde(rename = "created")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updated")]
    pub updated_at: DateTime<Utc>,
}

impl Card {
    pub fn new(board_id: &str, input: CreateCardRequest, order: i32) -> Self {
        let now = Utc::now();
        Self {
            id: super::generate_id(),
            board_id: board_id.to_string(),
            title: input.title,
            description: non_empty(input.description),
            assignee: non_empty(input.assignee),
            deadline: input.deadline,
            column_id: input.column_id,
            order,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Ordered for Card {
    fn order(&self) -> i32 {
        self.order
    }
    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
    fn id(&self) -> &str {
        &self.id
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct CreateCardRequest {
    #[validate(length(min = 1, max = 500, message = "Card title is required"))]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    #[validate(length(max = 255))]
    pub assignee: Option<String>,
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
    #[validate(length(min = 1, message = "Column ID is required"))]
    pub column_id: String,
}

/// Partial card update. An absent or empty field means "leave unchanged", so a field
/// cannot be cleared through this request.
#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct UpdateCardRequest {
    #[serde(default)]
    #[validate(length(max = 500))]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    #[validate(length(max = 255))]
    pub assignee: Option<String>,
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
}

/// The subset of card fields an update actually writes.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CardPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub assignee: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
}

impl CardPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.assignee.is_none()
            && self.deadline.is_none()
    }

    /// Applies the supplied fields to `card` in place.
    pub fn apply_to(&self, card: &mut Card, now: DateTime<Utc>) {
        if let Some(title) = &self.title {
            card.title = title.clone();
        }
        if let Some(description) = &self.description {
            card.description = Some(description.clone());
        }
        if let Some(assignee) = &self.assignee {
            card.assignee = Some(assignee.clone());
        }
        if let Some(deadline) = self.deadline {
            card.deadline = Some(deadline);
        }
        card.updated_at = now;
    }
}

impl From<UpdateCardRequest> for CardPatch {
    fn from(req: UpdateCardRequest) -> Self {
        Self {
            title: non_empty(req.title),
            description: non_empty(req.description),
            assignee: non_empty(req.assignee),
            deadline: req.deadline,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct MoveCardRequest {
    #[validate(length(min = 1, message = "Column ID is required"))]
    pub column_id: String,
    /// Accepted for compatibility; moved cards always go last in the target column.
    #[serde(default)]
    pub order: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn create_request(title: &str) -> CreateCardRequest {
        CreateCardRequest {
            title: title.to_string(),
            description: Some("".to_string()),
            assignee: Some("anna".to_string()),
            deadline: None,
            column_id: "col".to_string(),
        }
    }

    #[test]
    fn test_card_creation() {
        let card = Card::new("board", create_request("Fix bug"), 3);

        assert_eq!(card.title, "Fix bug");
        assert_eq!(card.board_id, "board");
        assert_eq!(card.column_id, "col");
        assert_eq!(card.order, 3);
        assert_eq!(card.description, None);
        assert_eq!(card.assignee.as_deref(), Some("anna"));
        assert_eq!(card.id.len(), 32);
    }

    #[test]
    fn test_create_card_validation() {
        assert!(create_request("Fix bug").validate().is_ok());
        assert!(create_request("").validate().is_err());

        let mut missing_column = create_request("Fix bug");
        missing_column.column_id = String::new();
        assert!(missing_column.validate().is_err());
    }

    #[test]
    fn test_patch_treats_empty_as_unchanged() {
        let patch: CardPatch = UpdateCardRequest {
            title: Some("New title".into()),
            description: Some("".into()),
            assignee: None,
            deadline: None,
        }
        .into();

        assert_eq!(patch.title.as_deref(), Some("New title"));
        assert_eq!(patch.description, None);
        assert!(!patch.is_empty());
        assert!(CardPatch::from(UpdateCardRequest::default()).is_empty());
    }

    #[test]
    fn test_patch_apply_only_touches_supplied_fields() {
        let mut card = Card::new("board", create_request("Fix bug"), 1);
        card.description = Some("details".into());
        let before = card.clone();

        let patch = CardPatch {
            title: Some("Fix the bug".into()),
            ..CardPatch::default()
        };
        patch.apply_to(&mut card, Utc::now());

        assert_eq!(card.title, "Fix the bug");
        assert_eq!(card.description, before.description);
        assert_eq!(card.assignee, before.assignee);
        assert_eq!(card.deadline, before.deadline);
        assert_eq!(card.order, before.order);
    }

    #[test]
    fn test_move_request_order_is_optional() {
        let req: MoveCardRequest = serde_json::from_str(r#"{"column_id":"abc"}"#).unwrap();
        assert_eq!(req.order, None);
        assert!(req.validate().is_ok());
    }
}
