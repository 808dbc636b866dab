//! Terminal styling and color utilities.
//!
//! ANSI escape code definitions and color detection for the compliance
//! badges printed ahead of text reports.

/// ANSI escape codes for text styling and colors.
pub mod colors {
    /// Reset all styling.
    pub const RESET: &str = "\x1b[0m";

    // Badge colors (bold reverse video for high visibility)
    /// Bold reverse green for compliant voyages.
    pub const TAG_COMPLIANT: &str = "\x1b[1;7;32m";
    /// Bold reverse red for non-compliant voyages.
    pub const TAG_NON_COMPLIANT: &str = "\x1b[1;7;31m";
    /// Bold reverse yellow when no verdict applies.
    pub const TAG_NOT_APPLICABLE: &str = "\x1b[1;7;33m";

    /// Bright bold white for the vessel heading.
    pub const WHITE_BOLD: &str = "\x1b[1;97m";
    /// Gray for secondary details.
    pub const GRAY: &str = "\x1b[90m";
}

/// Resolved color codes, either ANSI sequences or empty strings when color
/// is disabled.
#[derive(Debug, Clone, Copy)]
pub struct ColorPalette {
    pub reset: &'static str,
    pub tag_compliant: &'static str,
    pub tag_non_compliant: &'static str,
    pub tag_not_applicable: &'static str,
    pub white_bold: &'static str,
    pub gray: &'static str,
}

impl ColorPalette {
    #[must_use]
    pub const fn colored() -> Self {
        Self {
            reset: colors::RESET,
            tag_compliant: colors::TAG_COMPLIANT,
            tag_non_compliant: colors::TAG_NON_COMPLIANT,
            tag_not_applicable: colors::TAG_NOT_APPLICABLE,
            white_bold: colors::WHITE_BOLD,
            gray: colors::GRAY,
        }
    }

    #[must_use]
    pub const fn plain() -> Self {
        Self {
            reset: "",
            tag_compliant: "",
            tag_non_compliant: "",
            tag_not_applicable: "",
            white_bold: "",
            gray: "",
        }
    }

    /// `colored()` when the terminal supports ANSI colors, otherwise `plain()`.
    #[must_use]
    pub fn detect() -> Self {
        if supports_color() {
            Self::colored()
        } else {
            Self::plain()
        }
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self::detect()
    }
}

/// Check if the terminal supports ANSI color codes.
///
/// Respects the `NO_COLOR` environment variable (https://no-color.org/) and
/// the `TERM=dumb` convention.
#[must_use]
pub fn supports_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if let Ok(term) = std::env::var("TERM") {
        if term.eq_ignore_ascii_case("dumb") {
            return false;
        }
    }
    true
}

/// Format a whole number with thousand separators (commas).
///
/// # Examples
///
/// ```
/// # use voyage_emissions_cli::terminal::format_with_separators;
/// assert_eq!(format_with_separators(999), "999");
/// assert_eq!(format_with_separators(30968), "30,968");
/// assert_eq!(format_with_separators(1234567), "1,234,567");
/// ```
#[must_use]
pub fn format_with_separators(n: u64) -> String {
    if n < 1000 {
        return n.to_string();
    }
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Round a euro amount to whole euros and add thousand separators.
#[must_use]
pub fn format_euros(amount: f64) -> String {
    let rounded = amount.round();
    if rounded.is_finite() && rounded >= 0.0 {
        format!("EUR {}", format_with_separators(rounded as u64))
    } else {
        format!("EUR {rounded:.0}")
    }
}
