use serde::{Deserialize, Deserializer, Serialize};
use shopfront_shared::Timestamps;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::inventory::InventoryStatus;

/// Quantity held for one size of one color
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct SizeQuantity {
    #[validate(length(min = 1))]
    pub size: String,
    #[validate(range(min = 0))]
    pub quantity: i64,
}

/// All sizes stocked for a single color
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ColorSize {
    #[validate(length(min = 1))]
    pub color: String,
    #[validate(nested)]
    pub sizes: Vec<SizeQuantity>,
}

/// Stored product document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub price: f64,
    pub price_sale: f64,
    #[serde(rename = "hot_sale")]
    pub hot_sale: i64,
    pub quantity: i64,
    pub inventory_status: InventoryStatus,
    pub color_sizes: Vec<ColorSize>,
    pub image: Vec<String>,
    pub rating: f64,
    pub description: Option<String>,
    #[serde(rename = "description_short")]
    pub description_short: Option<String>,
    pub is_visible: bool,
    pub featured: bool,
    pub category_id: Option<Uuid>,
    #[serde(flatten)]
    pub timestamps: Timestamps,
}

/// Complete candidate product as submitted for create or full update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_sale_not_above_price"))]
pub struct ProductInput {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub price_sale: Option<f64>,
    #[serde(rename = "hot_sale", default)]
    #[validate(range(min = 0, max = 100))]
    pub hot_sale: i64,
    #[validate(length(min = 1), nested)]
    pub color_sizes: Vec<ColorSize>,
    #[serde(default)]
    pub image: Vec<String>,
    #[serde(default)]
    #[validate(range(min = 0.0, max = 5.0))]
    pub rating: f64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "description_short", default)]
    pub description_short: Option<String>,
    #[serde(default = "default_visible")]
    pub is_visible: bool,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub category_id: Option<Uuid>,
}

fn default_visible() -> bool {
    true
}

pub(crate) const SALE_ABOVE_PRICE: &str = "priceSale must not exceed price while hot_sale is set";

/// A discounted product may not sell above its base price.
pub(crate) fn sale_exceeds_price(price: f64, price_sale: f64, hot_sale: i64) -> bool {
    hot_sale > 0 && price_sale > price
}

fn sale_above_price_error() -> ValidationError {
    let mut error = ValidationError::new("price_sale");
    error.message = Some(SALE_ABOVE_PRICE.into());
    error
}

fn validate_sale_not_above_price(input: &ProductInput) -> Result<(), ValidationError> {
    match input.price_sale {
        Some(price_sale) if sale_exceeds_price(input.price, price_sale, input.hot_sale) => {
            Err(sale_above_price_error())
        }
        _ => Ok(()),
    }
}

// Only decidable here when all three keys are present; otherwise the merged
// record is checked before it is stored.
fn validate_patch_sale_not_above_price(patch: &ProductPatch) -> Result<(), ValidationError> {
    match (patch.price, patch.price_sale, patch.hot_sale) {
        (Some(price), Some(price_sale), Some(hot_sale))
            if sale_exceeds_price(price, price_sale, hot_sale) =>
        {
            Err(sale_above_price_error())
        }
        _ => Ok(()),
    }
}

/// Product fields after derivation, ready to be stored under an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub name: String,
    pub price: f64,
    pub price_sale: f64,
    #[serde(rename = "hot_sale")]
    pub hot_sale: i64,
    pub quantity: i64,
    pub inventory_status: InventoryStatus,
    pub color_sizes: Vec<ColorSize>,
    pub image: Vec<String>,
    pub rating: f64,
    pub description: Option<String>,
    #[serde(rename = "description_short")]
    pub description_short: Option<String>,
    pub is_visible: bool,
    pub featured: bool,
    pub category_id: Option<Uuid>,
}

impl ProductDraft {
    pub fn into_product(self, id: Uuid, timestamps: Timestamps) -> Product {
        Product {
            id,
            name: self.name,
            price: self.price,
            price_sale: self.price_sale,
            hot_sale: self.hot_sale,
            quantity: self.quantity,
            inventory_status: self.inventory_status,
            color_sizes: self.color_sizes,
            image: self.image,
            rating: self.rating,
            description: self.description,
            description_short: self.description_short,
            is_visible: self.is_visible,
            featured: self.featured,
            category_id: self.category_id,
            timestamps,
        }
    }
}

/// Sparse set of changed product fields.
///
/// Absent keys stay `None` and are left untouched by [`ProductPatch::apply_to`].
/// The nullable fields use a double `Option` so an explicit JSON `null`
/// clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_patch_sale_not_above_price"))]
pub struct ProductPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1))]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0))]
    pub price_sale: Option<f64>,
    #[serde(rename = "hot_sale", default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0, max = 100))]
    pub hot_sale: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0))]
    pub quantity: Option<i64>,
    /// Only ever set by derivation, never read from a request body.
    #[serde(skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub inventory_status: Option<InventoryStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(nested)]
    pub color_sizes: Option<Vec<ColorSize>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0, max = 5.0))]
    pub rating: Option<f64>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(
        rename = "description_short",
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub description_short: Option<Option<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_visible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Option<Uuid>>,
}

/// Present-but-null becomes `Some(None)`; absent stays `None` via `default`.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        *self == ProductPatch::default()
    }

    /// Merge only the present keys into `product` (a field-level `$set`).
    pub fn apply_to(&self, product: &mut Product) {
        if let Some(name) = &self.name {
            product.name = name.clone();
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(price_sale) = self.price_sale {
            product.price_sale = price_sale;
        }
        if let Some(hot_sale) = self.hot_sale {
            product.hot_sale = hot_sale;
        }
        if let Some(quantity) = self.quantity {
            product.quantity = quantity;
        }
        if let Some(status) = self.inventory_status {
            product.inventory_status = status;
        }
        if let Some(color_sizes) = &self.color_sizes {
            product.color_sizes = color_sizes.clone();
        }
        if let Some(image) = &self.image {
            product.image = image.clone();
        }
        if let Some(rating) = self.rating {
            product.rating = rating;
        }
        if let Some(description) = &self.description {
            product.description = description.clone();
        }
        if let Some(description_short) = &self.description_short {
            product.description_short = description_short.clone();
        }
        if let Some(is_visible) = self.is_visible {
            product.is_visible = is_visible;
        }
        if let Some(featured) = self.featured {
            product.featured = featured;
        }
        if let Some(category_id) = self.category_id {
            product.category_id = category_id;
        }
        product.timestamps.touch();
    }
}
