use serde::{Deserialize, Serialize};
use shopfront_shared::Timestamps;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

/// Category as submitted for create or replace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct CategoryInput {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl CategoryInput {
    pub fn into_category(self, id: Uuid, timestamps: Timestamps) -> Category {
        Category {
            id,
            name: self.name,
            description: self.description,
            timestamps,
        }
    }
}
