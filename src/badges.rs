//! Badges
//!
//! Short text and colour annotations displayed next to a promoted product.

use std::ops::Range;

/// Background colour used when a badge does not specify one.
pub const DEFAULT_BADGE_COLOR: &str = "#3b82f6";

/// Text colour for light backgrounds.
pub const DARK_TEXT: &str = "#000000";

/// Text colour for dark backgrounds.
pub const LIGHT_TEXT: &str = "#ffffff";

const AUTO: &str = "auto";

/// How a badge's text colour is chosen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum BadgeTextColor {
    /// Derive a readable colour from the background
    #[default]
    Auto,

    /// Use this hex colour as given
    Explicit(String),
}

impl From<Option<String>> for BadgeTextColor {
    /// Missing values and the `auto` sentinel both mean [`BadgeTextColor::Auto`].
    fn from(value: Option<String>) -> Self {
        match value {
            Some(hex) if !is_auto(&hex) => BadgeTextColor::Explicit(hex),
            _ => BadgeTextColor::Auto,
        }
    }
}

/// Badge display metadata attached to a promotion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    /// Badge text
    pub text: String,

    /// Background colour (hex); defaults to [`DEFAULT_BADGE_COLOR`]
    pub color: Option<String>,

    /// Text colour
    pub text_color: BadgeTextColor,
}

impl Badge {
    /// Create a badge with the default background and automatic text colour.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            color: None,
            text_color: BadgeTextColor::Auto,
        }
    }

    /// Set the background colour.
    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Set an explicit text colour.
    #[must_use]
    pub fn with_text_color(mut self, text_color: impl Into<String>) -> Self {
        self.text_color = BadgeTextColor::from(Some(text_color.into()));
        self
    }

    /// Resolve the colours to display.
    pub fn resolve(&self) -> ResolvedBadge<'_> {
        let color = self.color.as_deref().unwrap_or(DEFAULT_BADGE_COLOR);

        let text_color = match &self.text_color {
            BadgeTextColor::Explicit(hex) => hex.as_str(),
            BadgeTextColor::Auto => contrast_text_color(Some(color)),
        };

        ResolvedBadge {
            text: &self.text,
            color,
            text_color,
        }
    }
}

/// A badge with its colours resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedBadge<'a> {
    /// Badge text
    pub text: &'a str,

    /// Background colour
    pub color: &'a str,

    /// Text colour
    pub text_color: &'a str,
}

/// Pick black or white text for a badge background.
///
/// Missing backgrounds and the `auto` sentinel fall back to
/// [`DEFAULT_BADGE_COLOR`]. The leading `#` is optional. Backgrounds whose
/// weighted luminance is above one half get dark text; everything else,
/// including values that are not six hex digits, gets light text.
pub fn contrast_text_color(background: Option<&str>) -> &'static str {
    let background = match background.map(str::trim) {
        Some(hex) if !is_auto(hex) => hex,
        _ => DEFAULT_BADGE_COLOR,
    };

    let Some([r, g, b]) = hex_rgb(background) else {
        return LIGHT_TEXT;
    };

    let luminance =
        (0.299 * f64::from(r) + 0.587 * f64::from(g) + 0.114 * f64::from(b)) / 255.0;

    if luminance > 0.5 { DARK_TEXT } else { LIGHT_TEXT }
}

fn is_auto(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case(AUTO)
}

/// Split a `#rrggbb` (or `rrggbb`) colour into channels.
pub fn hex_rgb(hex: &str) -> Option<[u8; 3]> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);

    if digits.len() != 6 || !digits.bytes().all(|byte| byte.is_ascii_hexdigit()) {
        return None;
    }

    let channel = |range: Range<usize>| {
        digits
            .get(range)
            .and_then(|pair| u8::from_str_radix(pair, 16).ok())
    };

    Some([channel(0..2)?, channel(2..4)?, channel(4..6)?])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn white_background_gets_dark_text() {
        assert_eq!(contrast_text_color(Some("#ffffff")), DARK_TEXT);
    }

    #[test]
    fn black_background_gets_light_text() {
        assert_eq!(contrast_text_color(Some("#000000")), LIGHT_TEXT);
    }

    #[test]
    fn hash_prefix_is_optional() {
        assert_eq!(contrast_text_color(Some("fde047")), DARK_TEXT);
        assert_eq!(contrast_text_color(Some("#fde047")), DARK_TEXT);
    }

    #[test]
    fn missing_or_auto_background_uses_default_blue() {
        // #3b82f6 has a luminance of roughly 0.47
        assert_eq!(contrast_text_color(None), LIGHT_TEXT);
        assert_eq!(contrast_text_color(Some("auto")), LIGHT_TEXT);
        assert_eq!(
            contrast_text_color(Some(DEFAULT_BADGE_COLOR)),
            contrast_text_color(None)
        );
    }

    #[test]
    fn red_sale_badge_gets_light_text() {
        assert_eq!(contrast_text_color(Some("#ef4444")), LIGHT_TEXT);
    }

    #[test]
    fn mid_grey_sits_just_above_threshold() {
        // 0x80 / 255 = 0.502
        assert_eq!(contrast_text_color(Some("#808080")), DARK_TEXT);
        assert_eq!(contrast_text_color(Some("#7f7f7f")), LIGHT_TEXT);
    }

    #[test]
    fn malformed_background_gets_light_text() {
        assert_eq!(contrast_text_color(Some("#fff")), LIGHT_TEXT);
        assert_eq!(contrast_text_color(Some("#gggggg")), LIGHT_TEXT);
        assert_eq!(contrast_text_color(Some("")), LIGHT_TEXT);
    }

    #[test]
    fn hex_rgb_splits_channels() {
        assert_eq!(hex_rgb("#ef4444"), Some([0xef, 0x44, 0x44]));
        assert_eq!(hex_rgb("0a0B0c"), Some([0x0a, 0x0b, 0x0c]));
        assert_eq!(hex_rgb("#ef444"), None);
    }

    #[test]
    fn text_color_from_option_treats_auto_as_sentinel() {
        assert_eq!(BadgeTextColor::from(None), BadgeTextColor::Auto);
        assert_eq!(
            BadgeTextColor::from(Some("AUTO".to_string())),
            BadgeTextColor::Auto
        );
        assert_eq!(
            BadgeTextColor::from(Some("#111111".to_string())),
            BadgeTextColor::Explicit("#111111".to_string())
        );
    }

    #[test]
    fn resolve_fills_in_default_color_and_contrast() {
        let badge = Badge::new("NEW");
        let resolved = badge.resolve();

        assert_eq!(resolved.text, "NEW");
        assert_eq!(resolved.color, DEFAULT_BADGE_COLOR);
        assert_eq!(resolved.text_color, LIGHT_TEXT);
    }

    #[test]
    fn resolve_keeps_explicit_text_color() {
        let badge = Badge::new("HOT")
            .with_color("#ffffff")
            .with_text_color("#ff0000");

        assert_eq!(badge.resolve().text_color, "#ff0000");
    }
}
