use serde::{Deserialize, Serialize};
use shopfront_shared::Timestamps;
use uuid::Uuid;
use validator::Validate;

/// A product review left by a user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: Uuid,
    pub content: String,
    pub rating: f64,
    pub user_id: Uuid,
    pub product_id: Uuid,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CommentInput {
    #[validate(length(min = 1, max = 2000))]
    pub content: String,
    #[validate(range(min = 0.0, max = 5.0))]
    pub rating: f64,
    pub user_id: Uuid,
    pub product_id: Uuid,
}

impl CommentInput {
    pub fn into_comment(self, id: Uuid, timestamps: Timestamps) -> Comment {
        Comment {
            id,
            content: self.content,
            rating: self.rating,
            user_id: self.user_id,
            product_id: self.product_id,
            timestamps,
        }
    }
}

/// Fields a comment's author may change
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct CommentPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 2000))]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 5.0))]
    pub rating: Option<f64>,
}

impl CommentPatch {
    pub fn apply_to(&self, comment: &mut Comment) {
        if let Some(content) = &self.content {
            comment.content = content.clone();
        }
        if let Some(rating) = self.rating {
            comment.rating = rating;
        }
        comment.timestamps.touch();
    }
}

/// Identifies a comment together with the user and product it belongs to.
/// Updates and deletes only match when all three agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CommentKey {
    pub comment_id: Uuid,
    pub user_id: Uuid,
    pub product_id: Uuid,
}

impl CommentKey {
    pub fn matches(&self, comment: &Comment) -> bool {
        comment.id == self.comment_id
            && comment.user_id == self.user_id
            && comment.product_id == self.product_id
    }
}
