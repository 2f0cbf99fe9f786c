use async_trait::async_trait;
use shopfront_catalog::{Category, CategoryInput, Product, ProductDraft, ProductPatch};
use uuid::Uuid;

use crate::comment::{Comment, CommentInput, CommentKey, CommentPatch};
use crate::favorite::{FavoriteListing, FavoriteProduct};
use crate::identity::{NewUser, User};
use crate::listing::{ListOptions, ProductListing};
use crate::CoreResult;

/// Repository trait for the product collection.
///
/// Lookups by an id that does not resolve return `Ok(None)`; callers decide
/// whether that is a not-found error.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn create_product(&self, draft: ProductDraft) -> CoreResult<Product>;

    async fn get_product(&self, id: Uuid) -> CoreResult<Option<Product>>;

    /// Products joined with their category, ordered and limited per `options`.
    async fn list_products(&self, options: &ListOptions) -> CoreResult<Vec<ProductListing>>;

    /// Overwrite every field of the stored product, keeping its id and
    /// creation time. Returns the new record.
    async fn replace_product(&self, id: Uuid, draft: ProductDraft) -> CoreResult<Option<Product>>;

    /// Set only the keys present in `patch`. Returns the new record.
    async fn merge_product(&self, id: Uuid, patch: &ProductPatch) -> CoreResult<Option<Product>>;

    /// Returns the removed record.
    async fn delete_product(&self, id: Uuid) -> CoreResult<Option<Product>>;
}

/// Repository trait for product categories
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn create_category(&self, input: CategoryInput) -> CoreResult<Category>;

    async fn get_category(&self, id: Uuid) -> CoreResult<Option<Category>>;

    async fn list_categories(&self) -> CoreResult<Vec<Category>>;

    async fn replace_category(&self, id: Uuid, input: CategoryInput) -> CoreResult<Option<Category>>;

    async fn delete_category(&self, id: Uuid) -> CoreResult<Option<Category>>;
}

/// Repository trait for product comments
#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn create_comment(&self, input: CommentInput) -> CoreResult<Comment>;

    /// All comments, newest first.
    async fn list_comments(&self) -> CoreResult<Vec<Comment>>;

    async fn get_comment(&self, id: Uuid) -> CoreResult<Option<Comment>>;

    /// Update the comment matching all three ids in `key`.
    async fn update_comment(&self, key: CommentKey, patch: &CommentPatch) -> CoreResult<Option<Comment>>;

    /// Delete the comment matching all three ids in `key`.
    async fn delete_comment(&self, key: CommentKey) -> CoreResult<Option<Comment>>;
}

/// Repository trait for user accounts
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fails with `ConflictError` when the email is already registered.
    async fn create_user(&self, user: NewUser) -> CoreResult<User>;

    async fn get_user(&self, id: Uuid) -> CoreResult<Option<User>>;

    async fn find_user_by_email(&self, email: &str) -> CoreResult<Option<User>>;

    async fn list_users(&self) -> CoreResult<Vec<User>>;
}

/// Repository trait for customers' favorite products
#[async_trait]
pub trait FavoriteRepository: Send + Sync {
    /// Fails with `ConflictError` when the product is already a favorite.
    async fn add_favorite(&self, customer_id: Uuid, product_id: Uuid) -> CoreResult<FavoriteProduct>;

    async fn list_favorites(&self, customer_id: Uuid) -> CoreResult<Vec<FavoriteListing>>;

    async fn remove_favorite(&self, customer_id: Uuid, product_id: Uuid) -> CoreResult<Option<FavoriteProduct>>;
}

/// Every collection the API needs, behind one handle.
pub trait CatalogStore:
    ProductRepository + CategoryRepository + CommentRepository + UserRepository + FavoriteRepository
{
}

impl<T> CatalogStore for T where
    T: ProductRepository + CategoryRepository + CommentRepository + UserRepository + FavoriteRepository
{
}
