//! Capabilities the loader borrows from the host platform.
//!
//! Materials, item flags and fill colors are enumerations owned by the host, and
//! color-code markers are translated into whatever escape the host renders. Each
//! of these is a separate trait so a loader can be assembled from independent
//! pieces, or a single type can implement all of them and be used as a [`Host`].
use std::collections::HashMap;

/// Resolves a material by its uppercased name.
pub trait MaterialLookup {
    /// The host's material identifier
    type Material;

    /// Returns `None` if the host has no material with this name.
    fn material(&self, name: &str) -> Option<Self::Material>;
}

/// Resolves an item flag by name.
pub trait FlagLookup {
    /// The host's item flag identifier
    type Flag;

    /// Returns `None` if the host has no flag with this name.
    fn flag(&self, name: &str) -> Option<Self::Flag>;
}

/// Resolves a fill color by name.
pub trait ColorLookup {
    /// The host's fill color value
    type Color;

    /// Returns `None` if the host has no color with this name.
    fn color(&self, name: &str) -> Option<Self::Color>;
}

/// Translates alternate color-code markers into the host's escape sequence.
pub trait ColorCodes {
    /// Rewrite every `marker` + code pair in `text`.
    fn translate(&self, marker: char, text: &str) -> String;
}

/// Everything a loader needs from the host.
///
/// Implemented automatically for any type providing all four capabilities.
pub trait Host: MaterialLookup + FlagLookup + ColorLookup + ColorCodes {}
impl<T> Host for T where T: MaterialLookup + FlagLookup + ColorLookup + ColorCodes {}

/// The section sign used by legacy chat formatting.
pub const COLOR_CHAR: char = '\u{a7}';

const LEGACY_CODES: &str = "0123456789AaBbCcDdEeFfKkLlMmNnOoRrXx";

/// Translates `^c` style markers into `§c` sequences.
///
/// Only a marker directly followed by a legacy color or format code is replaced,
/// and the code is lowercased. Anything else is left untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlternateColorCodes;
impl ColorCodes for AlternateColorCodes {
    fn translate(&self, marker: char, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut chars = text.chars().peekable();

        while let Some(c) = chars.next() {
            match chars.peek() {
                Some(&code) if c == marker && LEGACY_CODES.contains(code) => {
                    out.push(COLOR_CHAR);
                    out.push(code.to_ascii_lowercase());
                    chars.next();
                }
                _ => out.push(c),
            }
        }

        out
    }
}

/// A host whose enumerations are plain name tables.
///
/// Every lookup resolves to the registered name as an owned `String`. Useful
/// for tests, tooling, and hosts that only forward names to another process.
///
/// ```rust
/// use menuxml::{FlagLookup, MaterialLookup, NameTableHost};
///
/// let host = NameTableHost::new()
///     .with_materials(["DIAMOND_SWORD"])
///     .with_flags(["UNBREAKABLE"]);
///
/// assert_eq!(host.material("DIAMOND_SWORD").as_deref(), Some("DIAMOND_SWORD"));
/// assert_eq!(host.flag("HIDE_DYE"), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct NameTableHost {
    materials: HashMap<String, String>,
    flags: HashMap<String, String>,
    colors: HashMap<String, String>,
    color_codes: AlternateColorCodes,
}
impl NameTableHost {
    /// Creates a host that knows no names.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers material names. Lookups are exact; the loader uppercases first.
    #[must_use]
    pub fn with_materials<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        extend(&mut self.materials, names, |name| name.to_string());
        self
    }

    /// Registers item flag names. Lookups are exact.
    #[must_use]
    pub fn with_flags<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        extend(&mut self.flags, names, |name| name.to_string());
        self
    }

    /// Registers fill color names. Lookups ignore case.
    #[must_use]
    pub fn with_colors<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        extend(&mut self.colors, names, str::to_uppercase);
        self
    }
}

fn extend<I, S>(table: &mut HashMap<String, String>, names: I, key: fn(&str) -> String)
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    for name in names {
        let name = name.into();
        table.insert(key(&name), name);
    }
}

impl MaterialLookup for NameTableHost {
    type Material = String;

    fn material(&self, name: &str) -> Option<String> {
        self.materials.get(name).cloned()
    }
}

impl FlagLookup for NameTableHost {
    type Flag = String;

    fn flag(&self, name: &str) -> Option<String> {
        self.flags.get(name).cloned()
    }
}

impl ColorLookup for NameTableHost {
    type Color = String;

    fn color(&self, name: &str) -> Option<String> {
        self.colors.get(&name.to_uppercase()).cloned()
    }
}

impl ColorCodes for NameTableHost {
    fn translate(&self, marker: char, text: &str) -> String {
        self.color_codes.translate(marker, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_known_codes() {
        let codes = AlternateColorCodes;
        assert_eq!(codes.translate('^', "^aGreen ^LBold"), "\u{a7}aGreen \u{a7}lBold");
    }

    #[test]
    fn test_translate_leaves_other_markers() {
        let codes = AlternateColorCodes;
        assert_eq!(codes.translate('^', "2^3 = 8, x^y"), "2\u{a7}3 = 8, x^y");
        assert_eq!(codes.translate('^', "trailing^"), "trailing^");
        assert_eq!(codes.translate('^', "^^c"), "^\u{a7}c");
    }

    #[test]
    fn test_name_table_lookups() {
        let host = NameTableHost::new()
            .with_materials(["STONE"])
            .with_flags(["HIDE_ENCHANTS"])
            .with_colors(["Red"]);

        assert_eq!(host.material("STONE").as_deref(), Some("STONE"));
        assert_eq!(host.material("stone"), None);
        assert_eq!(host.flag("HIDE_ENCHANTS").as_deref(), Some("HIDE_ENCHANTS"));
        assert_eq!(host.flag("hide_enchants"), None);
        assert_eq!(host.color("RED").as_deref(), Some("Red"));
        assert_eq!(host.color("red").as_deref(), Some("Red"));
        assert_eq!(host.color("BLUE"), None);
    }

    #[test]
    fn test_name_table_is_a_host() {
        fn assert_host<H: Host>(_: &H) {}
        assert_host(&NameTableHost::new());
    }
}
