//! Exact proportional splitting of a fixed-point total.
//!
//! A total (in thousandths) is split across weights by truncating each
//! proportional share toward zero, then handing out the truncated
//! remainder one thousandth at a time in list order. Working entirely in
//! integers makes the truncation exact, so for a non-negative total the
//! parts always sum back to the total.

/// Decompose a positive, finite rate into an odd mantissa and a binary
/// exponent, so that `rate == mantissa * 2^exponent` exactly.
fn decompose(rate: f64) -> Option<(u64, i32)> {
    if !(rate.is_finite() && rate > 0.0) {
        return None;
    }
    let bits = rate.to_bits();
    let fraction = bits & ((1 << 52) - 1);
    let (mantissa, exponent) = match ((bits >> 52) & 0x7ff) as i32 {
        0 => (fraction, -1074),
        biased => (fraction | (1 << 52), biased - 1075),
    };
    let zeros = mantissa.trailing_zeros();
    Some((mantissa >> zeros, exponent + zeros as i32))
}

/// Convert rates into integer weights with the same proportions.
///
/// Negative, zero and non-finite rates weigh nothing. The positive rates
/// are expressed as exact multiples of a common power of two, so their
/// ratios survive at any magnitude. Only when the rates span more binary
/// orders of magnitude than an `i128` product can hold are the smallest
/// rounded, and a positive rate never weighs less than one.
pub fn rate_weights(rates: &[f64]) -> Vec<i128> {
    let parts: Vec<Option<(u64, i32)>> = rates.iter().map(|&rate| decompose(rate)).collect();

    let top = |&(mantissa, exponent): &(u64, i32)| {
        (u64::BITS - mantissa.leading_zeros()) as i32 + exponent
    };
    let (Some(high), Some(low)) = (
        parts.iter().flatten().map(top).max(),
        parts.iter().flatten().map(|&(_, exponent)| exponent).min(),
    ) else {
        return vec![0; rates.len()];
    };

    // Every weight fits in `budget` bits, so the weights of all parts sum
    // below 2^62 and any i64 total times that sum fits an i128.
    let budget = 62 - (u64::BITS - (rates.len() as u64).leading_zeros()) as i32;
    let unit = low.max(high - budget);

    parts
        .into_iter()
        .map(|part| match part {
            None => 0,
            Some((mantissa, exponent)) if exponent >= unit => {
                i128::from(mantissa) << (exponent - unit)
            }
            Some((mantissa, exponent)) => {
                let shift = (unit - exponent) as u32;
                let rounded = if shift > 64 {
                    0
                } else {
                    (i128::from(mantissa) + (1 << (shift - 1))) >> shift
                };
                rounded.max(1)
            }
        })
        .collect()
}

/// Split `total` thousandths across `weights`, preserving their order.
///
/// 1. If the weights sum to zero, every part is zero and nothing is fixed up.
/// 2. Each part is `total * weight / Σ weights`, truncated toward zero.
/// 3. If the parts fall short of `total`, the shortfall is distributed as
///    single-thousandth increments starting from the first part. Should the
///    shortfall ever exceed the number of parts, the increments wrap around.
/// 4. If the parts do not fall short (only possible for a negative total),
///    no adjustment is made.
///
/// Weights are expected to be non-negative, as produced by [`rate_weights`].
pub fn split_proportionally(total: i64, weights: &[i128]) -> Vec<i64> {
    let weight_sum: i128 = weights.iter().sum();
    if weight_sum <= 0 {
        return vec![0; weights.len()];
    }

    let total = total as i128;
    let raw: Vec<i64> = weights
        .iter()
        // |total * w / sum| <= |total|, so the share always fits back into i64
        .map(|&weight| (total * weight / weight_sum) as i64)
        .collect();

    let shortfall = total - raw.iter().map(|&part| part as i128).sum::<i128>();
    if shortfall <= 0 {
        return raw;
    }

    let n = raw.len() as i128;
    let (laps, extra) = (shortfall / n, shortfall % n);
    raw.into_iter()
        .enumerate()
        .map(|(index, part)| {
            let bump = laps + i128::from((index as i128) < extra);
            part + bump as i64
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_weights_clamp() {
        let weights = rate_weights(&[-3.0, 0.0, f64::NAN, f64::INFINITY, 1.5]);
        assert_eq!(weights, vec![0, 0, 0, 0, 3]);
        assert_eq!(rate_weights(&[-1.0, 0.0]), vec![0, 0]);
        assert_eq!(rate_weights(&[]), Vec::<i128>::new());
    }

    #[test]
    fn test_rate_weights_are_exact_for_ordinary_rates() {
        assert_eq!(rate_weights(&[60.0, 40.0]), vec![15, 10]);
        assert_eq!(rate_weights(&[3.0, 1.0]), vec![3, 1]);
        assert_eq!(rate_weights(&[0.5, 0.25, 2.0]), vec![2, 1, 8]);
    }

    #[test]
    fn test_rate_weights_keep_proportions_at_any_magnitude() {
        let tiny = rate_weights(&[1e-7, 3e-7]);
        assert!(tiny[0] > 0);
        assert_eq!(split_proportionally(100_000, &tiny), vec![25_000, 75_000]);

        let huge = rate_weights(&[2e12, 1e12]);
        assert_eq!(huge[0], 2 * huge[1]);
        assert_eq!(split_proportionally(300_000, &huge), vec![200_000, 100_000]);

        let subnormal = rate_weights(&[5e-324, 1e-323]);
        assert_eq!(subnormal, vec![1, 2]);
    }

    #[test]
    fn test_rate_weights_never_zero_a_positive_rate() {
        let weights = rate_weights(&[1e-300, 1e12]);
        assert_eq!(weights[0], 1);
        assert!(weights[1] < 1 << 62);
    }

    #[test]
    fn test_exact_split_needs_no_fixup() {
        assert_eq!(
            split_proportionally(100_000, &rate_weights(&[60.0, 40.0])),
            vec![60_000, 40_000]
        );
    }

    #[test]
    fn test_shortfall_goes_to_leading_parts() {
        // 1000 / 3 = 333 r 1 for each of three equal weights: 333 * 3 = 999
        assert_eq!(split_proportionally(1000, &[1, 1, 1]), vec![334, 333, 333]);
        // 1000 / 7 = 142 r 6 -> seven parts of 142 sum to 994
        assert_eq!(
            split_proportionally(1000, &[1; 7]),
            vec![143, 143, 143, 143, 143, 143, 142]
        );
    }

    #[test]
    fn test_fixup_may_land_on_zero_weight() {
        // the increment order is positional, not by share
        assert_eq!(split_proportionally(1000, &[0, 1, 2]), vec![1, 333, 666]);
    }

    #[test]
    fn test_zero_weights_allocate_nothing() {
        assert_eq!(split_proportionally(12_345, &[0, 0]), vec![0, 0]);
        assert_eq!(split_proportionally(12_345, &[]), Vec::<i64>::new());
    }

    #[test]
    fn test_negative_total_is_not_fixed_up() {
        // truncation toward zero overshoots a negative total; no adjustment is applied
        let parts = split_proportionally(-1000, &[1, 2]);
        assert_eq!(parts, vec![-333, -666]);
        assert_eq!(parts.iter().sum::<i64>(), -999);
    }
}
