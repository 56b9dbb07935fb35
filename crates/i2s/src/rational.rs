//! Bounded rational approximation.
//!
//! The fractional clock divider can only multiply by `num / den` with both
//! terms in a small range, so every requested frequency ratio has to be
//! turned into the closest representable fraction.
//!
//! The search walks every denominator once and, for each, only looks at the
//! two numerators that bracket `target × den`. Any other numerator is
//! further from the target, so this finds the same pair an exhaustive
//! `num × den` scan would.

/// Closest `num / den` to `target` with `1 <= num <= max_num` and
/// `1 <= den <= max_den`.
///
/// Ties go to the smaller denominator, then the smaller numerator.
/// Non-finite or non-positive targets give `(1, max_den)`, the smallest
/// representable ratio. Zero bounds are treated as 1.
#[must_use]
pub fn approximate(target: f64, max_num: u32, max_den: u32) -> (u32, u32) {
    let max_num = max_num.max(1);
    let max_den = max_den.max(1);

    if !target.is_finite() || target <= 0.0 {
        return (1, max_den);
    }

    let mut best = (1, 1);
    let mut best_err = f64::INFINITY;

    for den in 1..=max_den {
        let (whole, _) = split_ratio(target * f64::from(den));
        for num in [whole, whole.saturating_add(1)] {
            let num = num.clamp(1, max_num);
            let err = distance(f64::from(num) / f64::from(den), target);
            if err < best_err {
                best = (num, den);
                best_err = err;
            }
        }
        if best_err == 0.0 {
            break;
        }
    }

    best
}

/// Split a ratio into its integer part and the fractional remainder.
///
/// The integer part feeds a coarse divider stage, the remainder (in
/// `[0, 1)`) tells whether a finer stage is needed. NaN and non-positive
/// inputs give `(0, 0.0)`; ratios past `u32::MAX` saturate with no
/// remainder.
#[must_use]
pub fn split_ratio(ratio: f64) -> (u32, f64) {
    if ratio.is_nan() || ratio <= 0.0 {
        return (0, 0.0);
    }
    // `as` saturates for out-of-range floats and truncates toward zero,
    // which is floor for positive values.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let whole = ratio as u32;
    if whole == u32::MAX {
        return (whole, 0.0);
    }
    let frac = ratio - f64::from(whole);
    (whole, frac.clamp(0.0, 1.0 - f64::EPSILON))
}

/// `|a - b|` without `f64::abs`, which lives in `std`.
pub(crate) fn distance(a: f64, b: f64) -> f64 {
    if a >= b {
        a - b
    } else {
        b - a
    }
}
