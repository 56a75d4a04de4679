// src/utils/precision.rs
use rust_decimal::Decimal;

/// Rounds a price to the nearest multiple of `tick_size`.
/// Example: price=100.16, tick=0.1 -> 100.2
pub fn quantize_price(price: Decimal, tick_size: Decimal) -> Decimal {
    if tick_size.is_zero() {
        return price;
    }
    (price / tick_size).round() * tick_size
}

/// Rounds a quantity DOWN to the nearest multiple of `step_size`.
/// Example: amount=10.999, step=1.0 -> 10.0
pub fn quantize_quantity(amount: Decimal, step_size: Decimal) -> Decimal {
    if step_size.is_zero() {
        return amount;
    }
    (amount / step_size).floor() * step_size
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn price_rounds_to_nearest_tick() {
        assert_eq!(quantize_price(dec("100.16"), dec("0.1")), dec("100.2"));
        assert_eq!(quantize_price(dec("100.14"), dec("0.1")), dec("100.1"));
        assert_eq!(quantize_price(dec("100.16"), Decimal::ZERO), dec("100.16"));
    }

    #[test]
    fn quantity_floors_to_step() {
        assert_eq!(quantize_quantity(dec("10.999"), dec("1.0")), dec("10.0"));
        assert_eq!(quantize_quantity(dec("0.00057"), dec("0.0001")), dec("0.0005"));
        assert_eq!(quantize_quantity(dec("5"), Decimal::ZERO), dec("5"));
    }
}
