/// Largest discount a product can carry, in percent.
pub const MAX_HOT_SALE: i64 = 100;

/// Selling price after a `hot_sale` percentage discount:
/// `price * (1 - hot_sale / 100)`.
///
/// The discount is clamped to `0..=100` so the result never exceeds `price`
/// and never goes negative.
pub fn sale_price(price: f64, hot_sale: i64) -> f64 {
    let discount = hot_sale.clamp(0, MAX_HOT_SALE);
    price * ((MAX_HOT_SALE - discount) as f64 / MAX_HOT_SALE as f64)
}
