use serde::{Deserialize, Serialize};
use shopfront_catalog::{Category, Product};

pub const DEFAULT_LIMIT: usize = 100;
/// Largest page a caller may request.
pub const MAX_LIMIT: usize = 500;

/// Product fields a listing may be sorted by
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum SortField {
    #[serde(rename = "name")]
    Name,
    #[serde(rename = "price")]
    Price,
    #[default]
    #[serde(rename = "priceSale")]
    PriceSale,
    #[serde(rename = "hot_sale")]
    HotSale,
    #[serde(rename = "quantity")]
    Quantity,
    #[serde(rename = "rating")]
    Rating,
    #[serde(rename = "createdAt")]
    CreatedAt,
}

impl SortField {
    /// Key of the field inside a stored product document.
    pub fn document_key(&self) -> &'static str {
        match self {
            SortField::Name => "name",
            SortField::Price => "price",
            SortField::PriceSale => "priceSale",
            SortField::HotSale => "hot_sale",
            SortField::Quantity => "quantity",
            SortField::Rating => "rating",
            SortField::CreatedAt => "createdAt",
        }
    }

    /// Whether the field holds a number (as opposed to text or a timestamp).
    pub fn is_numeric(&self) -> bool {
        !matches!(self, SortField::Name | SortField::CreatedAt)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Pagination and ordering for product listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListOptions {
    pub limit: usize,
    pub sort: SortField,
    pub order: SortOrder,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            sort: SortField::default(),
            order: SortOrder::default(),
        }
    }
}

/// Query string accepted by the product listing (`_sort`, `_limit`, `_order`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    #[serde(rename = "_sort")]
    pub sort: Option<SortField>,
    #[serde(rename = "_limit")]
    pub limit: Option<usize>,
    #[serde(rename = "_order")]
    pub order: Option<SortOrder>,
}

impl ListQuery {
    /// Fill in defaults and cap the page size at `max_limit`.
    pub fn into_options(self, default_limit: usize, max_limit: usize) -> ListOptions {
        ListOptions {
            limit: self.limit.unwrap_or(default_limit).min(max_limit),
            sort: self.sort.unwrap_or_default(),
            order: self.order.unwrap_or_default(),
        }
    }
}

/// A product with its `categoryId` resolved by the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductListing {
    #[serde(flatten)]
    pub product: Product,
    pub category: Option<Category>,
}
