use eframe::egui::Color32;
use palette::Srgb;

use crate::error::PlotError;

// ---------------------------------------------------------------------------
// Colour parsing: "red" / "#ff8800" / "ff8800" → Color32
// ---------------------------------------------------------------------------

/// Colour used for sample points in the viewer.
pub const SERIES_COLOR: Color32 = Color32::LIGHT_BLUE;

/// Arrow colour when neither the mask group nor the caller supplies one.
pub const FALLBACK_ARROW_COLOR: Color32 = Color32::BLACK;

/// Parse a CSS colour name or a hex triplet.
pub fn parse_color(s: &str) -> Result<Color32, PlotError> {
    let s = s.trim();
    let rgb: Srgb<u8> = if let Some(named) = palette::named::from_str(&s.to_ascii_lowercase()) {
        named
    } else {
        s.parse::<Srgb<u8>>()
            .map_err(|_| PlotError::invalid(format!("unrecognised colour '{s}'")))?
    };
    Ok(Color32::from_rgb(rgb.red, rgb.green, rgb.blue))
}

/// Format a colour as `#rrggbb` for display.
pub fn to_hex(c: Color32) -> String {
    format!("#{:02x}{:02x}{:02x}", c.r(), c.g(), c.b())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_and_hex() {
        assert_eq!(parse_color("red").unwrap(), Color32::from_rgb(255, 0, 0));
        assert_eq!(parse_color("Black").unwrap(), Color32::from_rgb(0, 0, 0));
        assert_eq!(parse_color("#ff8800").unwrap(), Color32::from_rgb(255, 136, 0));
        assert_eq!(parse_color("00ff00").unwrap(), Color32::from_rgb(0, 255, 0));
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(
            parse_color("not-a-colour"),
            Err(PlotError::InvalidArgument(_))
        ));
    }

    #[test]
    fn hex_display() {
        assert_eq!(to_hex(Color32::from_rgb(255, 136, 0)), "#ff8800");
    }
}
