//! Continuous color maps sampled on [0, 1]

use plotters::style::RGBColor;

const COOLWARM: &[(f64, [u8; 3])] = &[
    (0.0, [59, 76, 192]),
    (0.25, [124, 159, 249]),
    (0.5, [221, 221, 221]),
    (0.75, [246, 153, 120]),
    (1.0, [180, 4, 38]),
];

const VIRIDIS: &[(f64, [u8; 3])] = &[
    (0.0, [68, 1, 84]),
    (0.25, [59, 82, 139]),
    (0.5, [33, 145, 140]),
    (0.75, [94, 201, 98]),
    (1.0, [253, 231, 37]),
];

/// Color for undefined values
pub const MISSING: RGBColor = RGBColor(200, 200, 200);

/// Diverging blue-white-red map
#[must_use]
pub fn coolwarm(t: f64) -> RGBColor {
    interpolate(COOLWARM, t)
}

/// Perceptually uniform purple-green-yellow map
#[must_use]
pub fn viridis(t: f64) -> RGBColor {
    interpolate(VIRIDIS, t)
}

/// Position of `value` within `lo..=hi`, clamped to [0, 1]
#[must_use]
pub fn normalize(value: f64, lo: f64, hi: f64) -> f64 {
    let span = hi - lo;
    if span <= 0.0 || !span.is_finite() {
        return 0.5;
    }
    ((value - lo) / span).clamp(0.0, 1.0)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn interpolate(stops: &[(f64, [u8; 3])], t: f64) -> RGBColor {
    if t.is_nan() {
        return MISSING;
    }
    let t = t.clamp(0.0, 1.0);

    let upper = stops
        .iter()
        .position(|(pos, _)| *pos >= t)
        .unwrap_or(stops.len() - 1)
        .max(1);
    let (p0, c0) = stops[upper - 1];
    let (p1, c1) = stops[upper];

    let f = if p1 > p0 { (t - p0) / (p1 - p0) } else { 0.0 };
    let mix = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * f).round() as u8;

    RGBColor(mix(c0[0], c1[0]), mix(c0[1], c1[1]), mix(c0[2], c1[2]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        assert_eq!(coolwarm(0.0), RGBColor(59, 76, 192));
        assert_eq!(coolwarm(0.5), RGBColor(221, 221, 221));
        assert_eq!(coolwarm(1.0), RGBColor(180, 4, 38));
        assert_eq!(viridis(0.0), RGBColor(68, 1, 84));
        assert_eq!(viridis(1.0), RGBColor(253, 231, 37));
    }

    #[test]
    fn test_out_of_range_clamps() {
        assert_eq!(viridis(-3.0), viridis(0.0));
        assert_eq!(viridis(7.0), viridis(1.0));
        assert_eq!(coolwarm(f64::NAN), MISSING);
    }

    #[test]
    fn test_interpolates_between_stops() {
        // halfway between the first two viridis stops
        assert_eq!(viridis(0.125), RGBColor(64, 42, 112));
    }

    #[test]
    fn test_normalize() {
        assert!((normalize(75.0, 50.0, 100.0) - 0.5).abs() < 1e-12);
        assert!((normalize(10.0, 50.0, 100.0)).abs() < 1e-12);
        assert!((normalize(3.0, 3.0, 3.0) - 0.5).abs() < 1e-12);
    }
}
