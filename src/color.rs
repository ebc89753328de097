use palette::{Hsl, Srgb};

/// Hue step between successive categories, in degrees.
pub const HUE_STEP: u32 = 137;
pub const SATURATION: f64 = 0.70;
pub const LIGHTNESS: f64 = 0.50;

/// HSL colour of the `index`-th category (0-based).
pub fn category_hsl(index: usize) -> Hsl<palette::encoding::Srgb, f64> {
    let hue = ((index as u64 * HUE_STEP as u64) % 360) as f64;
    Hsl::new(hue, SATURATION, LIGHTNESS)
}

/// Deterministic colour for the `index`-th manufacturer.
pub fn manufacturer_color(index: usize) -> Srgb<u8> {
    hsl_to_rgb(category_hsl(index))
}

/// HSL → 8-bit sRGB with the closed-form channel function
/// `f(n) = l - a * max(-1, min(k - 3, 9 - k, 1))`, `k = (n + h/30) mod 12`.
///
/// Channels are rounded half-up and clamped, so the output is stable across
/// platforms for a given index.
pub fn hsl_to_rgb(hsl: Hsl<palette::encoding::Srgb, f64>) -> Srgb<u8> {
    let h = hsl.hue.into_positive_degrees();
    let s = hsl.saturation;
    let l = hsl.lightness;

    let a = s * l.min(1.0 - l);
    let channel = |n: f64| -> u8 {
        let k = (n + h / 30.0) % 12.0;
        let f = l - a * (k - 3.0).min(9.0 - k).min(1.0).max(-1.0);
        (255.0 * f).round().clamp(0.0, 255.0) as u8
    };

    Srgb::new(channel(0.0), channel(8.0), channel(4.0))
}

/// `#rrggbb`, lower-case.
pub fn to_hex(color: Srgb<u8>) -> String {
    format!("#{:02x}{:02x}{:02x}", color.red, color.green, color.blue)
}

/// The first `n` category colours, in index order.
pub fn generate_palette(n: usize) -> Vec<Srgb<u8>> {
    (0..n).map(manufacturer_color).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hues_step_by_137_degrees() {
        let hues: Vec<f64> = (0..4)
            .map(|i| category_hsl(i).hue.into_positive_degrees())
            .collect();
        assert_eq!(hues, vec![0.0, 137.0, 274.0, 51.0]);
    }

    #[test]
    fn first_colours_match_closed_form() {
        assert_eq!(to_hex(manufacturer_color(0)), "#d92626");
        assert_eq!(to_hex(manufacturer_color(1)), "#26d959");
        assert_eq!(to_hex(manufacturer_color(2)), "#8b26d9");
    }

    #[test]
    fn first_six_colours_are_distinct() {
        let palette = generate_palette(6);
        for i in 0..palette.len() {
            for j in (i + 1)..palette.len() {
                assert_ne!(palette[i], palette[j], "index {i} and {j} collide");
            }
        }
    }

    #[test]
    fn greys_and_extremes_clamp() {
        assert_eq!(hsl_to_rgb(Hsl::new(0.0, 0.0, 0.5)), Srgb::new(128, 128, 128));
        assert_eq!(hsl_to_rgb(Hsl::new(200.0, 0.7, 1.0)), Srgb::new(255, 255, 255));
        assert_eq!(hsl_to_rgb(Hsl::new(200.0, 0.7, 0.0)), Srgb::new(0, 0, 0));
    }
}
