//! USD package price to native payable amount.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Fixed 2% markup absorbing slippage and transfer fees.
pub const SLIPPAGE_MARKUP: Decimal = dec!(1.02);

/// Decimal places of a payable amount.
pub const PAYABLE_DECIMALS: u32 = 4;

/// `round(usd / unit_price * 1.02, 4)`, or `None` for a non-positive price.
///
/// Midpoints round to even (`round_dp` default).
pub fn payable_amount(usd_price: Decimal, unit_price: Decimal) -> Option<Decimal> {
    if unit_price <= Decimal::ZERO {
        return None;
    }
    let raw = usd_price.checked_div(unit_price)?.checked_mul(SLIPPAGE_MARKUP)?;
    Some(raw.round_dp(PAYABLE_DECIMALS).normalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sol_24h_scenario() {
        // 2500 / 100 * 1.02 = 25.5
        assert_eq!(payable_amount(dec!(2500), dec!(100)), Some(dec!(25.5)));
    }

    #[test]
    fn test_rounds_to_four_places() {
        // 2500 / 172.34 * 1.02 = 14.79633282...
        let amount = payable_amount(dec!(2500), dec!(172.34)).unwrap();
        assert_eq!(amount, dec!(14.7963));
        assert!(amount.scale() <= PAYABLE_DECIMALS);
    }

    #[test]
    fn test_matches_formula_across_prices() {
        let packages = [dec!(2500), dec!(5500), dec!(8000), dec!(18000)];
        let units = [dec!(0.52), dec!(3125.5), dec!(612.07), dec!(1.5)];
        for p in packages {
            for u in units {
                let expected = (p / u * dec!(1.02)).round_dp(4);
                assert_eq!(payable_amount(p, u), Some(expected), "p={p} u={u}");
            }
        }
    }

    #[test]
    fn test_non_positive_unit_price() {
        assert_eq!(payable_amount(dec!(2500), Decimal::ZERO), None);
        assert_eq!(payable_amount(dec!(2500), dec!(-1)), None);
    }
}
