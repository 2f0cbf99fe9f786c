use async_trait::async_trait;
use std::cmp::Ordering;
use std::collections::HashMap;
use tokio::sync::RwLock;
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

#[derive(Default)]
struct Collections {
    products: HashMap<Uuid, Product>,
    categories: HashMap<Uuid, Category>,
    // Insertion order, oldest first
    comments: Vec<Comment>,
    users: HashMap<Uuid, User>,
    favorites: Vec<FavoriteProduct>,
}

/// Process-local document store.
///
/// Each call takes the lock once, so a read-modify-write such as a merge is
/// atomic per document; separate requests still race last-write-wins.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn compare_products(a: &Product, b: &Product, sort: SortField) -> Ordering {
    let primary = match sort {
        SortField::Name => a.name.cmp(&b.name),
        SortField::Price => a.price.total_cmp(&b.price),
        SortField::PriceSale => a.price_sale.total_cmp(&b.price_sale),
        SortField::HotSale => a.hot_sale.cmp(&b.hot_sale),
        SortField::Quantity => a.quantity.cmp(&b.quantity),
        SortField::Rating => a.rating.total_cmp(&b.rating),
        SortField::CreatedAt => a.timestamps.created_at.cmp(&b.timestamps.created_at),
    };
    primary
        .then_with(|| a.timestamps.created_at.cmp(&b.timestamps.created_at))
        .then_with(|| a.id.cmp(&b.id))
}

#[async_trait]
impl ProductRepository for MemoryStore {
    async fn create_product(&self, draft: ProductDraft) -> CoreResult<Product> {
        let product = draft.into_product(Uuid::new_v4(), Timestamps::now());
        let mut inner = self.inner.write().await;
        inner.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn get_product(&self, id: Uuid) -> CoreResult<Option<Product>> {
        Ok(self.inner.read().await.products.get(&id).cloned())
    }

    async fn list_products(&self, options: &ListOptions) -> CoreResult<Vec<ProductListing>> {
        let inner = self.inner.read().await;

        let mut products: Vec<&Product> = inner.products.values().collect();
        products.sort_by(|a, b| {
            let ordering = compare_products(a, b, options.sort);
            match options.order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });

        Ok(products
            .into_iter()
            .take(options.limit)
            .map(|product| ProductListing {
                category: product
                    .category_id
                    .and_then(|id| inner.categories.get(&id).cloned()),
                product: product.clone(),
            })
            .collect())
    }

    async fn replace_product(&self, id: Uuid, draft: ProductDraft) -> CoreResult<Option<Product>> {
        let mut inner = self.inner.write().await;
        let Some(existing) = inner.products.get_mut(&id) else {
            return Ok(None);
        };

        let mut timestamps = existing.timestamps;
        timestamps.touch();
        *existing = draft.into_product(id, timestamps);
        Ok(Some(existing.clone()))
    }

    async fn merge_product(&self, id: Uuid, patch: &ProductPatch) -> CoreResult<Option<Product>> {
        let mut inner = self.inner.write().await;
        Ok(inner.products.get_mut(&id).map(|product| {
            patch.apply_to(product);
            product.clone()
        }))
    }

    async fn delete_product(&self, id: Uuid) -> CoreResult<Option<Product>> {
        Ok(self.inner.write().await.products.remove(&id))
    }
}

#[async_trait]
impl CategoryRepository for MemoryStore {
    async fn create_category(&self, input: CategoryInput) -> CoreResult<Category> {
        let category = input.into_category(Uuid::new_v4(), Timestamps::now());
        let mut inner = self.inner.write().await;
        inner.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn get_category(&self, id: Uuid) -> CoreResult<Option<Category>> {
        Ok(self.inner.read().await.categories.get(&id).cloned())
    }

    async fn list_categories(&self) -> CoreResult<Vec<Category>> {
        let mut categories: Vec<Category> =
            self.inner.read().await.categories.values().cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn replace_category(&self, id: Uuid, input: CategoryInput) -> CoreResult<Option<Category>> {
        let mut inner = self.inner.write().await;
        Ok(inner.categories.get_mut(&id).map(|category| {
            let mut timestamps = category.timestamps;
            timestamps.touch();
            *category = input.into_category(id, timestamps);
            category.clone()
        }))
    }

    async fn delete_category(&self, id: Uuid) -> CoreResult<Option<Category>> {
        Ok(self.inner.write().await.categories.remove(&id))
    }
}

#[async_trait]
impl CommentRepository for MemoryStore {
    async fn create_comment(&self, input: CommentInput) -> CoreResult<Comment> {
        let comment = input.into_comment(Uuid::new_v4(), Timestamps::now());
        self.inner.write().await.comments.push(comment.clone());
        Ok(comment)
    }

    async fn list_comments(&self) -> CoreResult<Vec<Comment>> {
        let mut comments: Vec<Comment> =
            self.inner.read().await.comments.iter().rev().cloned().collect();
        // Stable, so equal timestamps keep newest-inserted first
        comments.sort_by(|a, b| b.timestamps.created_at.cmp(&a.timestamps.created_at));
        Ok(comments)
    }

    async fn get_comment(&self, id: Uuid) -> CoreResult<Option<Comment>> {
        Ok(self
            .inner
            .read()
            .await
            .comments
            .iter()
            .find(|comment| comment.id == id)
            .cloned())
    }

    async fn update_comment(&self, key: CommentKey, patch: &CommentPatch) -> CoreResult<Option<Comment>> {
        let mut inner = self.inner.write().await;
        Ok(inner
            .comments
            .iter_mut()
            .find(|comment| key.matches(comment))
            .map(|comment| {
                patch.apply_to(comment);
                comment.clone()
            }))
    }

    async fn delete_comment(&self, key: CommentKey) -> CoreResult<Option<Comment>> {
        let mut inner = self.inner.write().await;
        let position = inner.comments.iter().position(|comment| key.matches(comment));
        Ok(position.map(|index| inner.comments.remove(index)))
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create_user(&self, user: NewUser) -> CoreResult<User> {
        let mut inner = self.inner.write().await;
        if inner
            .users
            .values()
            .any(|existing| existing.email.expose() == user.email.expose())
        {
            return Err(CoreError::ConflictError("Email is already registered".to_string()));
        }

        let user = user.into_user(Uuid::new_v4(), Timestamps::now());
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: Uuid) -> CoreResult<Option<User>> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> CoreResult<Option<User>> {
        Ok(self
            .inner
            .read()
            .await
            .users
            .values()
            .find(|user| user.email.expose() == email)
            .cloned())
    }

    async fn list_users(&self) -> CoreResult<Vec<User>> {
        let mut users: Vec<User> = self.inner.read().await.users.values().cloned().collect();
        users.sort_by(|a, b| a.timestamps.created_at.cmp(&b.timestamps.created_at));
        Ok(users)
    }
}

#[async_trait]
impl FavoriteRepository for MemoryStore {
    async fn add_favorite(&self, customer_id: Uuid, product_id: Uuid) -> CoreResult<FavoriteProduct> {
        let mut inner = self.inner.write().await;
        if inner
            .favorites
            .iter()
            .any(|f| f.customer_id == customer_id && f.product_id == product_id)
        {
            return Err(CoreError::ConflictError("Product is already a favorite".to_string()));
        }

        let favorite = FavoriteProduct {
            id: Uuid::new_v4(),
            customer_id,
            product_id,
        };
        inner.favorites.push(favorite.clone());
        Ok(favorite)
    }

    async fn list_favorites(&self, customer_id: Uuid) -> CoreResult<Vec<FavoriteListing>> {
        let inner = self.inner.read().await;
        Ok(inner
            .favorites
            .iter()
            .filter(|f| f.customer_id == customer_id)
            .map(|favorite| FavoriteListing {
                product: inner.products.get(&favorite.product_id).cloned(),
                favorite: favorite.clone(),
            })
            .collect())
    }

    async fn remove_favorite(&self, customer_id: Uuid, product_id: Uuid) -> CoreResult<Option<FavoriteProduct>> {
        let mut inner = self.inner.write().await;
        let position = inner
            .favorites
            .iter()
            .position(|f| f.customer_id == customer_id && f.product_id == product_id);
        Ok(position.map(|index| inner.favorites.remove(index)))
    }
}
