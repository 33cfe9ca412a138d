/// Trading days in roughly one calendar month.
pub const ONE_MONTH: usize = 21;
/// Trading days in roughly one quarter.
pub const THREE_MONTHS: usize = 63;

/// Return over the trailing `window` samples, measured from the close
/// `window` samples back (inclusive of the latest) to the latest close.
///
/// `None` when fewer than `window` samples exist or the base close is not a
/// usable positive price.
pub fn trailing_return(closes: &[f64], window: usize) -> Option<f64> {
    if window == 0 || closes.len() < window {
        return None;
    }

    let last = *closes.last()?;
    let base = closes[closes.len() - window];
    if base.is_nan() || base <= 0.0 || !last.is_finite() {
        return None;
    }

    Some(last / base - 1.0)
}

/// Largest peak-to-trough decline against the expanding running maximum,
/// as a positive fraction (0.25 = 25% below the prior peak, 1.0 = a close
/// of zero).
///
/// `None` for an empty series or one containing NaN or infinite closes.
/// Samples before the first positive close have no peak to fall from and
/// count as no decline.
pub fn max_drawdown(closes: &[f64]) -> Option<f64> {
    if closes.is_empty() || closes.iter().any(|c| !c.is_finite()) {
        return None;
    }

    let (_, max_dd) = closes
        .iter()
        .fold((f64::MIN, 0.0_f64), |(peak, max_dd), &p| {
            let peak = peak.max(p);
            let dd = if peak > 0.0 { (peak - p) / peak } else { 0.0 };
            (peak, max_dd.max(dd))
        });

    Some(max_dd)
}
