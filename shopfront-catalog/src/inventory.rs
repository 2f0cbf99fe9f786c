use serde::{Deserialize, Serialize};
use std::fmt;

use crate::product::ColorSize;

/// Highest total quantity still reported as low stock.
pub const LOW_STOCK_THRESHOLD: i64 = 10;

/// Stock level classification derived from a product's total quantity
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum InventoryStatus {
    OutOfStock,
    LowStock,
    InStock,
}

impl InventoryStatus {
    /// `<= 0` is out of stock, `1..=10` is low stock, anything above is in stock.
    pub fn classify(quantity: i64) -> Self {
        if quantity <= 0 {
            InventoryStatus::OutOfStock
        } else if quantity <= LOW_STOCK_THRESHOLD {
            InventoryStatus::LowStock
        } else {
            InventoryStatus::InStock
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InventoryStatus::OutOfStock => "OUTOFSTOCK",
            InventoryStatus::LowStock => "LOWSTOCK",
            InventoryStatus::InStock => "INSTOCK",
        }
    }
}

impl fmt::Display for InventoryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sum of every per-variant quantity across all colors, `None` if the
/// total does not fit in an `i64`.
pub fn total_quantity(color_sizes: &[ColorSize]) -> Option<i64> {
    color_sizes
        .iter()
        .flat_map(|color_size| color_size.sizes.iter())
        .try_fold(0i64, |total, size| total.checked_add(size.quantity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::SizeQuantity;

    fn variant(color: &str, sizes: &[(&str, i64)]) -> ColorSize {
        ColorSize {
            color: color.to_string(),
            sizes: sizes
                .iter()
                .map(|(size, quantity)| SizeQuantity {
                    size: size.to_string(),
                    quantity: *quantity,
                })
                .collect(),
        }
    }

    #[test]
    fn test_classify_thresholds() {
        assert_eq!(InventoryStatus::classify(-3), InventoryStatus::OutOfStock);
        assert_eq!(InventoryStatus::classify(0), InventoryStatus::OutOfStock);
        assert_eq!(InventoryStatus::classify(1), InventoryStatus::LowStock);
        assert_eq!(InventoryStatus::classify(10), InventoryStatus::LowStock);
        assert_eq!(InventoryStatus::classify(11), InventoryStatus::InStock);
        assert_eq!(InventoryStatus::classify(5_000), InventoryStatus::InStock);
    }

    #[test]
    fn test_classify_covers_every_quantity() {
        for quantity in -20..=40 {
            let expected = match quantity {
                q if q <= 0 => InventoryStatus::OutOfStock,
                q if q <= 10 => InventoryStatus::LowStock,
                _ => InventoryStatus::InStock,
            };
            assert_eq!(InventoryStatus::classify(quantity), expected, "quantity {}", quantity);
        }
    }

    #[test]
    fn test_status_wire_names() {
        assert_eq!(
            serde_json::to_value(InventoryStatus::OutOfStock).unwrap(),
            serde_json::json!("OUTOFSTOCK")
        );
        assert_eq!(
            serde_json::from_value::<InventoryStatus>(serde_json::json!("LOWSTOCK")).unwrap(),
            InventoryStatus::LowStock
        );
        assert_eq!(InventoryStatus::InStock.to_string(), "INSTOCK");
    }

    #[test]
    fn test_total_quantity_sums_all_variants() {
        let color_sizes = vec![
            variant("red", &[("M", 3), ("L", 5)]),
            variant("blue", &[("S", 2)]),
            variant("black", &[]),
        ];
        assert_eq!(total_quantity(&color_sizes), Some(10));
        assert_eq!(total_quantity(&[]), Some(0));
    }

    #[test]
    fn test_total_quantity_overflow() {
        let color_sizes = vec![
            variant("red", &[("M", i64::MAX)]),
            variant("blue", &[("S", 1)]),
        ];
        assert_eq!(total_quantity(&color_sizes), None);
    }
}
