use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Series colour palette
// ---------------------------------------------------------------------------

/// An 8-bit sRGB colour, kept renderer-agnostic so it can live in a ChartSpec.
pub type Rgb = [u8; 3];

/// Generates `n` visually distinct colours using evenly spaced hues, starting
/// at a warm red so a two-series chart reads red vs. teal.
pub fn generate_palette(n: usize) -> Vec<Rgb> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (350.0 + (i as f32 / n as f32) * 360.0) % 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.6);
            let rgb: Srgb = hsl.into_color();
            [
                (rgb.red * 255.0).round() as u8,
                (rgb.green * 255.0).round() as u8,
                (rgb.blue * 255.0).round() as u8,
            ]
        })
        .collect()
}
