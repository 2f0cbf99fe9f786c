//! Inventory & pricing derivation applied to a product payload before it is
//! persisted.
//!
//! Both entry points are pure: they validate the submitted fields, fill in
//! the dependent ones and hand the result back to the caller for storage.
//! Nothing here talks to the store, so a failed write simply discards the
//! computed values.

use crate::inventory::{total_quantity, InventoryStatus};
use crate::pricing::sale_price;
use crate::product::{
    sale_exceeds_price, Product, ProductDraft, ProductInput, ProductPatch, SALE_ABOVE_PRICE,
};
use crate::validation::{validate, CatalogError};

/// Full update (and create): recompute `quantity` from every variant and
/// classify `inventoryStatus` from that total. Everything else submitted
/// passes through unchanged.
///
/// `priceSale` is taken as submitted; when the caller leaves it out it is
/// derived from `price` and `hot_sale`.
pub fn prepare_full_update(input: ProductInput) -> Result<ProductDraft, CatalogError> {
    validate(&input)?;

    let quantity = total_quantity(&input.color_sizes).ok_or_else(|| {
        CatalogError::Validation(vec!["colorSizes total quantity is too large".to_string()])
    })?;
    let price_sale = input
        .price_sale
        .unwrap_or_else(|| sale_price(input.price, input.hot_sale));

    Ok(ProductDraft {
        name: input.name,
        price: input.price,
        price_sale,
        hot_sale: input.hot_sale,
        quantity,
        inventory_status: InventoryStatus::classify(quantity),
        color_sizes: input.color_sizes,
        image: input.image,
        rating: input.rating,
        description: input.description,
        description_short: input.description_short,
        is_visible: input.is_visible,
        featured: input.featured,
        category_id: input.category_id,
    })
}

/// Partial update: derive only what the submitted keys allow.
///
/// * `price` and `hot_sale` both present: `priceSale = price * (1 - hot_sale/100)`.
/// * `quantity` present: `inventoryStatus` is classified from that value as
///   submitted, since `colorSizes` may be missing from a sparse payload.
pub fn prepare_partial_update(mut patch: ProductPatch) -> Result<ProductPatch, CatalogError> {
    validate(&patch)?;

    if let (Some(price), Some(hot_sale)) = (patch.price, patch.hot_sale) {
        patch.price_sale = Some(sale_price(price, hot_sale));
    }

    if let Some(quantity) = patch.quantity {
        patch.inventory_status = Some(InventoryStatus::classify(quantity));
    }

    Ok(patch)
}

/// Check a stored product with a patch applied. A sparse patch can pair a
/// new `priceSale` or `hot_sale` with the stored `price`, which field rules
/// on the patch alone cannot see.
pub fn check_merged(product: &Product) -> Result<(), CatalogError> {
    if sale_exceeds_price(product.price, product.price_sale, product.hot_sale) {
        return Err(CatalogError::Validation(vec![SALE_ABOVE_PRICE.to_string()]));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::{ColorSize, Product, SizeQuantity};
    use serde_json::json;
    use shopfront_shared::Timestamps;
    use uuid::Uuid;

    fn input(color_sizes: serde_json::Value) -> ProductInput {
        serde_json::from_value(json!({
            "name": "Wool coat",
            "price": 120.0,
            "colorSizes": color_sizes,
        }))
        .unwrap()
    }

    fn stored() -> Product {
        let draft = prepare_full_update(input(json!([
            { "color": "grey", "sizes": [{ "size": "S", "quantity": 7 }, { "size": "M", "quantity": 9 }] }
        ])))
        .unwrap();
        draft.into_product(Uuid::new_v4(), Timestamps::now())
    }

    #[test]
    fn test_full_update_sums_variants() {
        let draft = prepare_full_update(input(json!([
            { "color": "red", "sizes": [{ "size": "M", "quantity": 3 }, { "size": "L", "quantity": 5 }] }
        ])))
        .unwrap();

        assert_eq!(draft.quantity, 8);
        assert_eq!(draft.inventory_status, InventoryStatus::LowStock);
    }

    #[test]
    fn test_full_update_overwrites_submitted_quantity() {
        let input: ProductInput = serde_json::from_value(json!({
            "name": "Wool coat",
            "price": 120.0,
            "quantity": 999,
            "inventoryStatus": "INSTOCK",
            "colorSizes": [{ "color": "red", "sizes": [{ "size": "M", "quantity": 0 }] }],
        }))
        .unwrap();

        let draft = prepare_full_update(input).unwrap();
        assert_eq!(draft.quantity, 0);
        assert_eq!(draft.inventory_status, InventoryStatus::OutOfStock);
    }

    #[test]
    fn test_full_update_status_follows_total() {
        for (sizes, expected) in [
            (vec![0, 0], InventoryStatus::OutOfStock),
            (vec![1], InventoryStatus::LowStock),
            (vec![6, 4], InventoryStatus::LowStock),
            (vec![6, 5], InventoryStatus::InStock),
        ] {
            let color_sizes: Vec<ColorSize> = vec![ColorSize {
                color: "navy".to_string(),
                sizes: sizes
                    .iter()
                    .enumerate()
                    .map(|(i, q)| SizeQuantity { size: format!("S{}", i), quantity: *q })
                    .collect(),
            }];
            let draft = prepare_full_update(input(serde_json::to_value(&color_sizes).unwrap())).unwrap();
            assert_eq!(draft.quantity, sizes.iter().sum::<i64>());
            assert_eq!(draft.inventory_status, expected);
        }
    }

    #[test]
    fn test_full_update_passes_other_fields_through() {
        let input: ProductInput = serde_json::from_value(json!({
            "name": "Wool coat",
            "price": 120.0,
            "priceSale": 99.0,
            "hot_sale": 5,
            "featured": true,
            "description": "Warm",
            "colorSizes": [{ "color": "red", "sizes": [{ "size": "M", "quantity": 20 }] }],
        }))
        .unwrap();

        let draft = prepare_full_update(input).unwrap();
        assert_eq!(draft.price_sale, 99.0);
        assert_eq!(draft.hot_sale, 5);
        assert!(draft.featured);
        assert_eq!(draft.description.as_deref(), Some("Warm"));
        assert_eq!(draft.inventory_status, InventoryStatus::InStock);
    }

    #[test]
    fn test_full_update_derives_missing_sale_price() {
        let input: ProductInput = serde_json::from_value(json!({
            "name": "Wool coat",
            "price": 200.0,
            "hot_sale": 25,
            "colorSizes": [{ "color": "red", "sizes": [] }],
        }))
        .unwrap();

        assert_eq!(prepare_full_update(input).unwrap().price_sale, 150.0);
    }

    #[test]
    fn test_full_update_requires_color_sizes() {
        let err = prepare_full_update(input(json!([]))).unwrap_err();
        assert!(!err.messages().is_empty());
    }

    #[test]
    fn test_full_update_reports_nested_errors() {
        let err = prepare_full_update(input(json!([
            { "color": "red", "sizes": [{ "size": "M", "quantity": 1 }, { "size": "L", "quantity": -2 }] }
        ])))
        .unwrap_err();

        assert!(err.messages().iter().any(|m| m.contains("sizes[1].quantity")), "{:?}", err.messages());
    }

    #[test]
    fn test_partial_price_and_discount() {
        let patch: ProductPatch = serde_json::from_value(json!({ "price": 100, "hot_sale": 20 })).unwrap();
        let patch = prepare_partial_update(patch).unwrap();

        assert_eq!(patch.price_sale, Some(80.0));
        assert_eq!(patch.inventory_status, None);
    }

    #[test]
    fn test_partial_zero_discount_resets_sale_price() {
        let patch: ProductPatch = serde_json::from_value(json!({ "price": 42.5, "hot_sale": 0 })).unwrap();
        assert_eq!(prepare_partial_update(patch).unwrap().price_sale, Some(42.5));
    }

    #[test]
    fn test_partial_price_alone_leaves_sale_price() {
        let patch: ProductPatch = serde_json::from_value(json!({ "price": 100 })).unwrap();
        assert_eq!(prepare_partial_update(patch).unwrap().price_sale, None);

        let patch: ProductPatch = serde_json::from_value(json!({ "hot_sale": 30 })).unwrap();
        assert_eq!(prepare_partial_update(patch).unwrap().price_sale, None);
    }

    #[test]
    fn test_partial_quantity_zero_only_changes_status() {
        let mut product = stored();
        let before = product.clone();

        let patch: ProductPatch = serde_json::from_value(json!({ "quantity": 0 })).unwrap();
        let patch = prepare_partial_update(patch).unwrap();
        patch.apply_to(&mut product);

        assert_eq!(product.quantity, 0);
        assert_eq!(product.inventory_status, InventoryStatus::OutOfStock);
        assert_eq!(product.name, before.name);
        assert_eq!(product.price, before.price);
        assert_eq!(product.price_sale, before.price_sale);
        assert_eq!(product.color_sizes, before.color_sizes);
    }

    #[test]
    fn test_partial_quantity_ignores_color_sizes() {
        let patch: ProductPatch = serde_json::from_value(json!({
            "quantity": 4,
            "colorSizes": [{ "color": "red", "sizes": [{ "size": "M", "quantity": 50 }] }]
        }))
        .unwrap();

        let patch = prepare_partial_update(patch).unwrap();
        assert_eq!(patch.inventory_status, Some(InventoryStatus::LowStock));
    }

    #[test]
    fn test_partial_without_quantity_keeps_status() {
        let patch: ProductPatch = serde_json::from_value(json!({ "name": "Renamed" })).unwrap();
        let patch = prepare_partial_update(patch).unwrap();
        assert_eq!(patch.inventory_status, None);
    }

    #[test]
    fn test_full_update_rejects_quantity_overflow() {
        let err = prepare_full_update(input(json!([
            { "color": "red", "sizes": [{ "size": "M", "quantity": i64::MAX }, { "size": "L", "quantity": 1 }] }
        ])))
        .unwrap_err();

        assert!(err.messages()[0].contains("too large"), "{:?}", err.messages());
    }

    #[test]
    fn test_merged_sale_above_stored_price_rejected() {
        let mut product = stored();
        let patch: ProductPatch =
            serde_json::from_value(json!({ "priceSale": 500, "hot_sale": 25 })).unwrap();
        let patch = prepare_partial_update(patch).unwrap();
        patch.apply_to(&mut product);

        assert!(check_merged(&product).is_err());
        assert!(check_merged(&stored()).is_ok());
    }

    #[test]
    fn test_partial_rejects_out_of_range_fields() {
        let patch: ProductPatch =
            serde_json::from_value(json!({ "hot_sale": 140, "price": -1 })).unwrap();
        let err = prepare_partial_update(patch).unwrap_err();
        assert_eq!(err.messages().len(), 2, "{:?}", err.messages());
    }
}
