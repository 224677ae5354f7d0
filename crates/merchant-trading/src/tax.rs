//! Tax calculation for shop earnings.
//!
//! The tax is computed exactly in decimal arithmetic and then rounded to a
//! whole item count. The net amount is always clamped to `0..=gross`, so a
//! misconfigured rate above 100 percent can never produce a negative payout
//! or a payout larger than the gross price.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::config::TaxPolicy;

/// Net payout of `gross` after a `rate_percent` tax.
///
/// A zero rate returns `gross` unchanged. Otherwise the tax is
/// `gross * rate / 100`, rounded up when `round_up` is set and down
/// otherwise.
pub fn net_amount(gross: u32, rate_percent: u32, round_up: bool) -> u32 {
    if rate_percent == 0 || gross == 0 {
        return gross;
    }

    let gross_dec = Decimal::from(gross);
    let exact_tax = gross_dec
        .checked_mul(Decimal::from(rate_percent))
        .and_then(|product| product.checked_div(Decimal::ONE_HUNDRED));
    let Some(exact_tax) = exact_tax else {
        // Only reachable for absurd rates; the whole gross is taxed.
        return 0;
    };

    let tax = if round_up {
        exact_tax.ceil()
    } else {
        exact_tax.floor()
    };

    let net = gross_dec
        .checked_sub(tax)
        .unwrap_or(Decimal::ZERO)
        .clamp(Decimal::ZERO, gross_dec);
    net.to_u32().unwrap_or(0)
}

impl TaxPolicy {
    /// Net payout of `gross` under this policy.
    pub fn net_amount(&self, gross: u32) -> u32 {
        net_amount(gross, self.rate_percent, self.round_up)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn zero_rate_is_identity() {
        for gross in [0, 1, 7, 64, 1000] {
            assert_eq!(net_amount(gross, 0, false), gross);
            assert_eq!(net_amount(gross, 0, true), gross);
        }
    }

    #[test]
    fn ten_percent_of_101_rounds_per_policy() {
        // Exact tax is 10.1.
        assert_eq!(net_amount(101, 10, false), 91);
        assert_eq!(net_amount(101, 10, true), 90);
    }

    #[test]
    fn net_never_leaves_bounds() {
        for gross in 0..200 {
            for rate in [1, 5, 33, 50, 99, 100, 150, 1000] {
                for round_up in [false, true] {
                    let net = net_amount(gross, rate, round_up);
                    assert!(net <= gross, "gross {gross} rate {rate} net {net}");
                }
            }
        }
        assert_eq!(net_amount(50, 100, false), 0);
        assert_eq!(net_amount(50, 250, true), 0);
    }

    #[test]
    fn net_is_monotonic_in_gross() {
        for rate in [1, 10, 25, 33, 75] {
            for round_up in [false, true] {
                let mut previous = 0;
                for gross in 0..500 {
                    let net = net_amount(gross, rate, round_up);
                    assert!(net >= previous, "rate {rate} gross {gross}");
                    previous = net;
                }
            }
        }
    }

    #[test]
    fn net_never_grows_with_the_rate() {
        for gross in [1, 3, 7, 64, 101, 999] {
            for round_up in [false, true] {
                let mut previous = gross;
                for rate in 0..=100 {
                    let net = net_amount(gross, rate, round_up);
                    assert!(net <= previous, "gross {gross} rate {rate} round_up {round_up}");
                    previous = net;
                }
                assert_eq!(previous, 0);
            }
        }
    }

    #[test]
    fn rounding_down_favors_the_shop() {
        // 3 * 33% = 0.99 tax: floored to nothing, ceiled to one item.
        assert_eq!(net_amount(3, 33, false), 3);
        assert_eq!(net_amount(3, 33, true), 2);
        let exact = Decimal::from(3) * Decimal::from(33) / Decimal::ONE_HUNDRED;
        assert_eq!(exact, dec!(0.99));
    }

    #[test]
    fn policy_delegates_to_calculator() {
        let policy = TaxPolicy {
            rate_percent: 10,
            round_up: true,
        };
        assert_eq!(policy.net_amount(101), 90);
        assert_eq!(TaxPolicy::default().net_amount(101), 101);
    }
}
