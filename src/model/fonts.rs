//! Embedded-font and theme-font models.

use serde::{Deserialize, Serialize};

/// Theme token resolving to the minor latin font.
pub const MINOR_LATIN_TOKEN: &str = "+mn-lt";

/// Theme token resolving to the major latin font.
pub const MAJOR_LATIN_TOKEN: &str = "+mj-lt";

/// Check whether a typeface string is a theme token rather than a literal
/// face name.
pub fn is_theme_token(typeface: &str) -> bool {
    typeface.starts_with('+')
}

/// One of the four embeddable style variants of a typeface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FontStyle {
    Regular,
    Bold,
    Italic,
    BoldItalic,
}

impl FontStyle {
    /// All style variants in declaration order.
    pub const ALL: [FontStyle; 4] = [
        FontStyle::Regular,
        FontStyle::Bold,
        FontStyle::Italic,
        FontStyle::BoldItalic,
    ];

    /// Stable string form, matching the manifest element names.
    pub fn as_str(&self) -> &'static str {
        match self {
            FontStyle::Regular => "regular",
            FontStyle::Bold => "bold",
            FontStyle::Italic => "italic",
            FontStyle::BoldItalic => "boldItalic",
        }
    }

    /// Parse a manifest element local name into a style variant.
    pub fn from_element_name(name: &[u8]) -> Option<FontStyle> {
        match name {
            b"regular" => Some(FontStyle::Regular),
            b"bold" => Some(FontStyle::Bold),
            b"italic" => Some(FontStyle::Italic),
            b"boldItalic" => Some(FontStyle::BoldItalic),
            _ => None,
        }
    }

    /// The style variant a run requires given its bold/italic flags.
    pub fn required(bold: bool, italic: bool) -> FontStyle {
        match (bold, italic) {
            (true, true) => FontStyle::BoldItalic,
            (true, false) => FontStyle::Bold,
            (false, true) => FontStyle::Italic,
            (false, false) => FontStyle::Regular,
        }
    }
}

impl std::fmt::Display for FontStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Declared availability of the four style variants of an embedded typeface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleFlags {
    pub has_regular: bool,
    pub has_bold: bool,
    pub has_italic: bool,
    #[serde(rename = "has_boldItalic")]
    pub has_bold_italic: bool,
}

impl StyleFlags {
    /// Check whether a style variant is declared.
    pub fn has(&self, style: FontStyle) -> bool {
        match style {
            FontStyle::Regular => self.has_regular,
            FontStyle::Bold => self.has_bold,
            FontStyle::Italic => self.has_italic,
            FontStyle::BoldItalic => self.has_bold_italic,
        }
    }

    /// Mark a style variant as declared.
    pub fn set(&mut self, style: FontStyle) {
        match style {
            FontStyle::Regular => self.has_regular = true,
            FontStyle::Bold => self.has_bold = true,
            FontStyle::Italic => self.has_italic = true,
            FontStyle::BoldItalic => self.has_bold_italic = true,
        }
    }
}

/// One declared embedded-font entry from the presentation manifest.
///
/// Built once during catalog construction; never mutated afterward.
#[derive(Debug, Clone, Default)]
pub struct EmbeddedFontEntry {
    /// Declared typeface name, if the entry carries one.
    pub typeface: Option<String>,
    /// Declared style slots, each with its relationship id when present.
    pub styles: Vec<(FontStyle, Option<String>)>,
}

/// The major/minor latin default typefaces from the theme part.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ThemeFonts {
    pub major_latin: Option<String>,
    pub minor_latin: Option<String>,
}

impl ThemeFonts {
    /// Resolve a theme token to a literal face name.
    ///
    /// Only the minor/major latin tokens resolve, and only when the
    /// corresponding theme slot is present. Any other token stays
    /// unresolved.
    pub fn resolve_token(&self, token: &str) -> Option<&str> {
        match token {
            MINOR_LATIN_TOKEN => self.minor_latin.as_deref(),
            MAJOR_LATIN_TOKEN => self.major_latin.as_deref(),
            _ => None,
        }
    }
}
