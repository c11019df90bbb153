//! Terminal colours.
//!
//! Role palettes arrive as [`ThemeDescriptor`]s with hex strings; this module
//! turns them into ratatui colours and fills in the neutral text/border/status
//! colours every palette shares. A named terminal theme from the config file
//! can replace the role palette entirely.

use ratatui::style::Color;

use crate::core::ThemeDescriptor;

/// A complete colour set for one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Palette name
    pub name: String,
    /// Active sidebar rows, avatar, primary buttons
    pub primary: Color,
    /// Soft tint behind the active tab
    pub secondary: Color,
    /// Accent text
    pub accent: Color,
    /// Chat affordance and banner gradient
    pub gradient: (Color, Color),
    pub text: Color,
    /// Descriptions, secondary info
    pub text_dim: Color,
    /// Placeholders, hints
    pub text_muted: Color,
    /// Reset uses the terminal default
    pub background: Color,
    pub selected_bg: Color,
    pub border: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_descriptor(&ThemeDescriptor::default_blue())
    }
}

impl Theme {
    /// Build a terminal theme from a role palette.
    ///
    /// Unparseable hex strings fall back to the default blue.
    pub fn from_descriptor(descriptor: &ThemeDescriptor) -> Self {
        let fallback = Color::Rgb(37, 99, 235);
        let color = |hex: &str| parse_hex_color(hex).unwrap_or(fallback);
        Self {
            name: descriptor.name.to_string(),
            primary: color(descriptor.primary),
            secondary: color(descriptor.secondary),
            accent: color(descriptor.accent),
            gradient: (color(descriptor.gradient.0), color(descriptor.gradient.1)),
            ..Self::neutral(descriptor.name)
        }
    }

    /// Neutral colours shared by every role palette.
    fn neutral(name: &str) -> Self {
        Self {
            name: name.to_string(),
            primary: Color::Rgb(37, 99, 235),
            secondary: Color::Rgb(239, 246, 255),
            accent: Color::Rgb(37, 99, 235),
            gradient: (Color::Rgb(59, 130, 246), Color::Rgb(147, 51, 234)),
            text: Color::White,
            text_dim: Color::Rgb(156, 163, 175),   // Gray-400
            text_muted: Color::Rgb(107, 114, 128), // Gray-500
            background: Color::Reset,
            selected_bg: Color::Rgb(55, 65, 81), // Gray-700
            border: Color::Rgb(75, 85, 99),      // Gray-600
            success: Color::Rgb(34, 197, 94),
            warning: Color::Rgb(234, 179, 8),
            error: Color::Rgb(239, 68, 68),
        }
    }

    /// Monochrome for terminals without truecolor.
    pub fn high_contrast() -> Self {
        Self {
            name: "high-contrast".to_string(),
            primary: Color::Cyan,
            secondary: Color::Blue,
            accent: Color::Yellow,
            gradient: (Color::Cyan, Color::Magenta),
            text: Color::White,
            text_dim: Color::LightCyan,
            text_muted: Color::Gray,
            background: Color::Black,
            selected_bg: Color::Blue,
            border: Color::White,
            success: Color::LightGreen,
            warning: Color::LightYellow,
            error: Color::LightRed,
        }
    }

    /// Look up a named theme (case-insensitive).
    ///
    /// Role palettes are addressable by name too, so a config can pin e.g.
    /// the admin palette for every role.
    pub fn by_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "default" | "blue" => Some(Self::from_descriptor(&ThemeDescriptor::default_blue())),
            "student" => Some(Self::from_descriptor(&ThemeDescriptor::student())),
            "teacher" => Some(Self::from_descriptor(&ThemeDescriptor::teacher())),
            "parent" => Some(Self::from_descriptor(&ThemeDescriptor::parent())),
            "admin" => Some(Self::from_descriptor(&ThemeDescriptor::admin())),
            "high-contrast" | "high_contrast" => Some(Self::high_contrast()),
            _ => None,
        }
    }

    /// The role palette, unless the config names an override.
    pub fn resolve(descriptor: &ThemeDescriptor, configured: Option<&str>) -> Self {
        match configured.map(|name| (name, Self::by_name(name))) {
            Some((_, Some(theme))) => theme,
            Some((name, None)) => {
                tracing::warn!(theme = name, "Unknown theme in config, using role palette");
                Self::from_descriptor(descriptor)
            }
            None => Self::from_descriptor(descriptor),
        }
    }

    pub fn available_themes() -> Vec<&'static str> {
        vec!["default", "student", "teacher", "parent", "admin", "high-contrast"]
    }
}

/// Parse a hex colour string (#RRGGBB or RRGGBB).
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

    Some(Color::Rgb(r, g, b))
}
