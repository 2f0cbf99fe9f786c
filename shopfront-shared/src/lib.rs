pub mod models;
pub mod pii;

pub use models::timestamps::Timestamps;
pub use pii::Masked;
