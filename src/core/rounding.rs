/// Rounds to `places` decimal digits, half away from zero.
///
/// Negative zero is folded to `0.0` so that rendered output never shows `-0.00`.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    let rounded = (value * factor).round() / factor;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rounds_to_requested_places() {
        assert_eq!(round_to(12.345678, 2), 12.35);
        assert_eq!(round_to(1.0549, 3), 1.055);
        assert_eq!(round_to(87.04, 1), 87.0);
    }

    #[test]
    fn test_folds_negative_zero() {
        let r = round_to(-0.0001, 2);
        assert_eq!(r, 0.0);
        assert!(r.is_sign_positive());
    }
}
