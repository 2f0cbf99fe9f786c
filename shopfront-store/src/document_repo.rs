use async_trait::async_trait;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use shopfront_catalog::{Category, CategoryInput, Product, ProductDraft, ProductPatch};
use shopfront_core::comment::{Comment, CommentInput, CommentKey, CommentPatch};
use shopfront_core::favorite::{FavoriteListing, FavoriteProduct};
use shopfront_core::identity::{NewUser, User};
use shopfront_core::listing::{ListOptions, ProductListing, SortField, SortOrder};
use shopfront_core::repository::{
    CategoryRepository, CommentRepository, FavoriteRepository, ProductRepository, UserRepository,
};
use shopfront_core::{CoreError, CoreResult};
use shopfront_shared::Timestamps;

const PRODUCTS: &str = "products";
const CATEGORIES: &str = "categories";
const COMMENTS: &str = "comments";
const USERS: &str = "users";
const FAVORITES: &str = "favorites";

/// Document store over a single Postgres JSONB table.
///
/// Each document's `data` holds the full serialized record (id and
/// timestamps included), so reads deserialize it straight back.
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert<T: Serialize>(&self, collection: &str, id: Uuid, record: &T) -> CoreResult<()> {
        self.insert_value(collection, id, encode(record)?).await
    }

    async fn insert_value(&self, collection: &str, id: Uuid, data: Value) -> CoreResult<()> {
        sqlx::query("INSERT INTO documents (collection, id, data) VALUES ($1, $2, $3)")
            .bind(collection)
            .bind(id)
            .bind(data)
            .execute(&self.pool)
            .await
            .map_err(store_error)?;
        Ok(())
    }

    async fn find<T: DeserializeOwned>(&self, collection: &str, id: Uuid) -> CoreResult<Option<T>> {
        let data: Option<Value> =
            sqlx::query_scalar("SELECT data FROM documents WHERE collection = $1 AND id = $2")
                .bind(collection)
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(store_error)?;
        data.map(decode).transpose()
    }

    /// Overwrite the document body, carrying over `id` and `createdAt`.
    async fn replace<T: Serialize, R: DeserializeOwned>(
        &self,
        collection: &str,
        id: Uuid,
        record: &T,
    ) -> CoreResult<Option<R>> {
        let mut data = encode(record)?;
        stamp_updated(&mut data);

        let data: Option<Value> = sqlx::query_scalar(
            r#"
            UPDATE documents
            SET data = $3 || jsonb_build_object('id', data->'id', 'createdAt', data->'createdAt')
            WHERE collection = $1 AND id = $2
            RETURNING data
            "#,
        )
        .bind(collection)
        .bind(id)
        .bind(data)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;
        data.map(decode).transpose()
    }

    /// Top-level `$set`: keys in `patch` overwrite, every other key stays.
    async fn merge<T: Serialize, R: DeserializeOwned>(
        &self,
        collection: &str,
        id: Uuid,
        patch: &T,
    ) -> CoreResult<Option<R>> {
        let mut data = encode(patch)?;
        stamp_updated(&mut data);

        let data: Option<Value> = sqlx::query_scalar(
            "UPDATE documents SET data = data || $3 WHERE collection = $1 AND id = $2 RETURNING data",
        )
        .bind(collection)
        .bind(id)
        .bind(data)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;
        data.map(decode).transpose()
    }

    async fn remove<T: DeserializeOwned>(&self, collection: &str, id: Uuid) -> CoreResult<Option<T>> {
        let data: Option<Value> = sqlx::query_scalar(
            "DELETE FROM documents WHERE collection = $1 AND id = $2 RETURNING data",
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;
        data.map(decode).transpose()
    }

    async fn all<T: DeserializeOwned>(&self, collection: &str, order_by: &str) -> CoreResult<Vec<T>> {
        let sql = format!(
            "SELECT data FROM documents WHERE collection = $1 ORDER BY {}",
            order_by
        );
        let rows: Vec<Value> = sqlx::query_scalar(&sql)
            .bind(collection)
            .fetch_all(&self.pool)
            .await
            .map_err(store_error)?;
        rows.into_iter().map(decode).collect()
    }
}

fn encode<T: Serialize>(record: &T) -> CoreResult<Value> {
    serde_json::to_value(record).map_err(CoreError::internal)
}

fn decode<T: DeserializeOwned>(data: Value) -> CoreResult<T> {
    serde_json::from_value(data).map_err(CoreError::internal)
}

fn stamp_updated(data: &mut Value) {
    if let Value::Object(map) = data {
        map.insert("updatedAt".to_string(), serde_json::json!(Utc::now()));
    }
}

fn store_error(err: sqlx::Error) -> CoreError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return CoreError::ConflictError("Document already exists".to_string());
        }
    }
    CoreError::internal(err)
}

/// ORDER BY expression for a whitelisted sort field on the `p` alias.
fn sort_expression(field: SortField) -> String {
    let key = field.document_key();
    match field {
        SortField::CreatedAt => format!("(p.data->>'{}')::timestamptz", key),
        field if field.is_numeric() => format!("(p.data->>'{}')::float8", key),
        _ => format!("p.data->>'{}'", key),
    }
}

fn product_listing_sql(options: &ListOptions) -> String {
    let direction = match options.order {
        SortOrder::Asc => "ASC",
        SortOrder::Desc => "DESC",
    };
    format!(
        r#"
        SELECT p.data, c.data
        FROM documents p
        LEFT JOIN documents c
            ON c.collection = '{categories}' AND c.id::text = p.data->>'categoryId'
        WHERE p.collection = '{products}'
        ORDER BY {expr} {direction}, (p.data->>'createdAt')::timestamptz, p.id
        LIMIT $1
        "#,
        categories = CATEGORIES,
        products = PRODUCTS,
        expr = sort_expression(options.sort),
        direction = direction,
    )
}

/// The password hash is skipped when a `User` is serialized for a response,
/// so it is written into the stored document explicitly.
fn user_document(user: &User) -> CoreResult<Value> {
    let mut data = encode(user)?;
    if let Value::Object(map) = &mut data {
        map.insert(
            "passwordHash".to_string(),
            Value::String(user.password_hash.expose().clone()),
        );
    }
    Ok(data)
}

#[async_trait]
impl ProductRepository for PgDocumentStore {
    async fn create_product(&self, draft: ProductDraft) -> CoreResult<Product> {
        let product = draft.into_product(Uuid::new_v4(), Timestamps::now());
        self.insert(PRODUCTS, product.id, &product).await?;
        info!("Product created: {}", product.id);
        Ok(product)
    }

    async fn get_product(&self, id: Uuid) -> CoreResult<Option<Product>> {
        self.find(PRODUCTS, id).await
    }

    async fn list_products(&self, options: &ListOptions) -> CoreResult<Vec<ProductListing>> {
        let sql = product_listing_sql(options);
        let rows: Vec<(Value, Option<Value>)> = sqlx::query_as(&sql)
            .bind(options.limit as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(store_error)?;

        rows.into_iter()
            .map(|(product, category)| {
                Ok(ProductListing {
                    product: decode(product)?,
                    category: category.map(decode).transpose()?,
                })
            })
            .collect()
    }

    async fn replace_product(&self, id: Uuid, draft: ProductDraft) -> CoreResult<Option<Product>> {
        self.replace(PRODUCTS, id, &draft).await
    }

    async fn merge_product(&self, id: Uuid, patch: &ProductPatch) -> CoreResult<Option<Product>> {
        self.merge(PRODUCTS, id, patch).await
    }

    async fn delete_product(&self, id: Uuid) -> CoreResult<Option<Product>> {
        self.remove(PRODUCTS, id).await
    }
}

#[async_trait]
impl CategoryRepository for PgDocumentStore {
    async fn create_category(&self, input: CategoryInput) -> CoreResult<Category> {
        let category = input.into_category(Uuid::new_v4(), Timestamps::now());
        self.insert(CATEGORIES, category.id, &category).await?;
        Ok(category)
    }

    async fn get_category(&self, id: Uuid) -> CoreResult<Option<Category>> {
        self.find(CATEGORIES, id).await
    }

    async fn list_categories(&self) -> CoreResult<Vec<Category>> {
        self.all(CATEGORIES, "data->>'name'").await
    }

    async fn replace_category(&self, id: Uuid, input: CategoryInput) -> CoreResult<Option<Category>> {
        self.replace(CATEGORIES, id, &input).await
    }

    async fn delete_category(&self, id: Uuid) -> CoreResult<Option<Category>> {
        self.remove(CATEGORIES, id).await
    }
}

#[async_trait]
impl CommentRepository for PgDocumentStore {
    async fn create_comment(&self, input: CommentInput) -> CoreResult<Comment> {
        let comment = input.into_comment(Uuid::new_v4(), Timestamps::now());
        self.insert(COMMENTS, comment.id, &comment).await?;
        Ok(comment)
    }

    async fn list_comments(&self) -> CoreResult<Vec<Comment>> {
        self.all(COMMENTS, "(data->>'createdAt')::timestamptz DESC").await
    }

    async fn get_comment(&self, id: Uuid) -> CoreResult<Option<Comment>> {
        self.find(COMMENTS, id).await
    }

    async fn update_comment(&self, key: CommentKey, patch: &CommentPatch) -> CoreResult<Option<Comment>> {
        let mut data = encode(patch)?;
        stamp_updated(&mut data);

        let data: Option<Value> = sqlx::query_scalar(
            r#"
            UPDATE documents SET data = data || $5
            WHERE collection = $1 AND id = $2
              AND data->>'userId' = $3 AND data->>'productId' = $4
            RETURNING data
            "#,
        )
        .bind(COMMENTS)
        .bind(key.comment_id)
        .bind(key.user_id.to_string())
        .bind(key.product_id.to_string())
        .bind(data)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;
        data.map(decode).transpose()
    }

    async fn delete_comment(&self, key: CommentKey) -> CoreResult<Option<Comment>> {
        let data: Option<Value> = sqlx::query_scalar(
            r#"
            DELETE FROM documents
            WHERE collection = $1 AND id = $2
              AND data->>'userId' = $3 AND data->>'productId' = $4
            RETURNING data
            "#,
        )
        .bind(COMMENTS)
        .bind(key.comment_id)
        .bind(key.user_id.to_string())
        .bind(key.product_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;
        data.map(decode).transpose()
    }
}

#[async_trait]
impl UserRepository for PgDocumentStore {
    async fn create_user(&self, user: NewUser) -> CoreResult<User> {
        let user = user.into_user(Uuid::new_v4(), Timestamps::now());
        self.insert_value(USERS, user.id, user_document(&user)?)
            .await
            .map_err(|err| match err {
                CoreError::ConflictError(_) => {
                    CoreError::ConflictError("Email is already registered".to_string())
                }
                other => other,
            })?;
        info!("User registered: {}", user.id);
        Ok(user)
    }

    async fn get_user(&self, id: Uuid) -> CoreResult<Option<User>> {
        self.find(USERS, id).await
    }

    async fn find_user_by_email(&self, email: &str) -> CoreResult<Option<User>> {
        let data: Option<Value> = sqlx::query_scalar(
            "SELECT data FROM documents WHERE collection = $1 AND data->>'email' = $2",
        )
        .bind(USERS)
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;
        data.map(decode).transpose()
    }

    async fn list_users(&self) -> CoreResult<Vec<User>> {
        self.all(USERS, "(data->>'createdAt')::timestamptz").await
    }
}

#[async_trait]
impl FavoriteRepository for PgDocumentStore {
    async fn add_favorite(&self, customer_id: Uuid, product_id: Uuid) -> CoreResult<FavoriteProduct> {
        let favorite = FavoriteProduct {
            id: Uuid::new_v4(),
            customer_id,
            product_id,
        };
        self.insert(FAVORITES, favorite.id, &favorite)
            .await
            .map_err(|err| match err {
                CoreError::ConflictError(_) => {
                    CoreError::ConflictError("Product is already a favorite".to_string())
                }
                other => other,
            })?;
        Ok(favorite)
    }

    async fn list_favorites(&self, customer_id: Uuid) -> CoreResult<Vec<FavoriteListing>> {
        let rows: Vec<(Value, Option<Value>)> = sqlx::query_as(
            r#"
            SELECT f.data, p.data
            FROM documents f
            LEFT JOIN documents p
                ON p.collection = $2 AND p.id::text = f.data->>'productId'
            WHERE f.collection = $1 AND f.data->>'customerId' = $3
            ORDER BY f.id
            "#,
        )
        .bind(FAVORITES)
        .bind(PRODUCTS)
        .bind(customer_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)?;

        rows.into_iter()
            .map(|(favorite, product)| {
                Ok(FavoriteListing {
                    favorite: decode(favorite)?,
                    product: product.map(decode).transpose()?,
                })
            })
            .collect()
    }

    async fn remove_favorite(&self, customer_id: Uuid, product_id: Uuid) -> CoreResult<Option<FavoriteProduct>> {
        let data: Option<Value> = sqlx::query_scalar(
            r#"
            DELETE FROM documents
            WHERE collection = $1 AND data->>'customerId' = $2 AND data->>'productId' = $3
            RETURNING data
            "#,
        )
        .bind(FAVORITES)
        .bind(customer_id.to_string())
        .bind(product_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;
        data.map(decode).transpose()
    }
}
