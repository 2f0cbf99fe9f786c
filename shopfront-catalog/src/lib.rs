pub mod category;
pub mod inventory;
pub mod pricing;
pub mod product;
pub mod updater;
pub mod validation;

pub use category::{Category, CategoryInput};
pub use inventory::{total_quantity, InventoryStatus};
pub use pricing::sale_price;
pub use product::{ColorSize, Product, ProductDraft, ProductInput, ProductPatch, SizeQuantity};
pub use updater::{check_merged, prepare_full_update, prepare_partial_update};
pub use validation::CatalogError;
