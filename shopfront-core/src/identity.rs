use serde::{Deserialize, Serialize};
use shopfront_shared::{Masked, Timestamps};
use uuid::Uuid;
use validator::Validate;

pub const DEFAULT_ROLE: &str = "member";
pub const ADMIN_ROLE: &str = "admin";

/// A registered customer or administrator.
///
/// The password hash is kept for the store but never serialized into a
/// response; email and hash are masked in debug output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: Masked<String>,
    #[serde(skip_serializing, default = "empty_hash")]
    pub password_hash: Masked<String>,
    pub role: String,
    #[serde(rename = "image_url")]
    pub image_url: String,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

fn empty_hash() -> Masked<String> {
    Masked(String::new())
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }
}

/// Sign-up payload as received from the client
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterUser {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
    #[validate(url)]
    pub image_url: String,
}

/// User ready to be stored: password already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: Masked<String>,
    pub password_hash: Masked<String>,
    pub role: String,
    pub image_url: String,
}

impl NewUser {
    pub fn member(register: RegisterUser, password_hash: String) -> Self {
        Self {
            name: register.name,
            email: Masked(register.email.trim().to_lowercase()),
            password_hash: Masked(password_hash),
            role: DEFAULT_ROLE.to_string(),
            image_url: register.image_url,
        }
    }

    pub fn into_user(self, id: Uuid, timestamps: Timestamps) -> User {
        User {
            id,
            name: self.name,
            email: self.email,
            password_hash: self.password_hash,
            role: self.role,
            image_url: self.image_url,
            timestamps,
        }
    }
}
