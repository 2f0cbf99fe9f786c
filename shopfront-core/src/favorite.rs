use serde::{Deserialize, Serialize};
use shopfront_catalog::Product;
use uuid::Uuid;
use validator::Validate;

/// A product bookmarked by a customer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteProduct {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub product_id: Uuid,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteInput {
    pub product_id: Uuid,
}

/// A favorite with its product resolved. `product` is `None` when the
/// product has since been deleted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FavoriteListing {
    #[serde(flatten)]
    pub favorite: FavoriteProduct,
    pub product: Option<Product>,
}
