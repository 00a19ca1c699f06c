//! Price rounding to an instrument's minimum increment.

/// Round `value` to the nearest multiple of `tick`.
///
/// Both numbers are normalised to integers based on the tick's decimal
/// length before rounding, so `round_to_tick(1234.567, 0.005) == 1234.565`.
pub fn round_to_tick(value: f64, tick: f64) -> f64 {
    let multiplier = 10f64.powi(decimal_places(tick));

    let scaled_value = value * multiplier;
    let scaled_tick = tick * multiplier;

    let rounded = (scaled_value / scaled_tick).round() * scaled_tick;
    rounded / multiplier
}

/// Number of significant decimal places in `value`.
fn decimal_places(value: f64) -> i32 {
    let text = format!("{value:.9}");
    match text.split_once('.') {
        Some((_, fraction)) => fraction.trim_end_matches('0').len() as i32,
        None => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_to_half_tick() {
        assert_eq!(round_to_tick(1234.567, 0.005), 1234.565);
    }

    #[test]
    fn rounds_to_quarter_point() {
        assert_eq!(round_to_tick(4501.13, 0.25), 4501.25);
        assert_eq!(round_to_tick(4501.12, 0.25), 4501.0);
    }

    #[test]
    fn exact_multiple_unchanged() {
        assert_eq!(round_to_tick(100.62, 0.01), 100.62);
        assert_eq!(round_to_tick(0.25, 0.25), 0.25);
    }

    #[test]
    fn whole_number_tick() {
        assert_eq!(round_to_tick(1234.4, 1.0), 1234.0);
        assert_eq!(round_to_tick(1234.5, 1.0), 1235.0);
    }

    #[test]
    fn tiny_tick() {
        let rounded = round_to_tick(0.6543217, 0.0000005);
        assert!((rounded - 0.6543215).abs() < 1e-9);
    }

    #[test]
    fn decimal_places_counts_significant_digits() {
        assert_eq!(decimal_places(0.005), 3);
        assert_eq!(decimal_places(0.25), 2);
        assert_eq!(decimal_places(1.0), 0);
        assert_eq!(decimal_places(0.0000005), 7);
    }
}
