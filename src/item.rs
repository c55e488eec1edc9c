//! Menu items and their staged builder.

/// The display name state of an item.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DisplayName {
    /// No name was given; the host shows its default
    #[default]
    Unset,

    /// A name with color codes already translated
    Named(String),

    /// The name is explicitly blanked
    Cleared,
}
impl DisplayName {
    /// The visible text, if any. A cleared name is the empty string.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Unset => None,
            Self::Named(name) => Some(name),
            Self::Cleared => Some(""),
        }
    }
}

/// A single item placed in a menu.
///
/// `M` and `F` are the host's material and item flag types.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuItem<M, F> {
    material: Option<M>,
    name: DisplayName,
    amount: i32,
    durability: i16,
    magic: bool,
    flags: Vec<F>,
    lore: Vec<String>,
}
impl<M, F> MenuItem<M, F> {
    /// Starts a builder with default values.
    #[must_use]
    pub fn builder() -> MenuItemBuilder<M, F> {
        MenuItemBuilder::new()
    }

    #[must_use]
    pub fn material(&self) -> Option<&M> {
        self.material.as_ref()
    }

    #[must_use]
    pub fn name(&self) -> &DisplayName {
        &self.name
    }

    /// Stack size.
    #[must_use]
    pub fn amount(&self) -> i32 {
        self.amount
    }

    #[must_use]
    pub fn durability(&self) -> i16 {
        self.durability
    }

    /// Whether the host should apply its "magic" tag treatment (an enchantment glint).
    #[must_use]
    pub fn magic(&self) -> bool {
        self.magic
    }

    /// Flags in first-insertion order, without duplicates.
    #[must_use]
    pub fn flags(&self) -> &[F] {
        &self.flags
    }

    #[must_use]
    pub fn lore(&self) -> &[String] {
        &self.lore
    }
}

/// Accumulates item properties and produces one immutable [`MenuItem`].
///
/// A cleared name always wins over a set name, whichever was applied last.
#[derive(Debug, Clone)]
pub struct MenuItemBuilder<M, F> {
    material: Option<M>,
    name: Option<String>,
    clear_name: bool,
    amount: i32,
    durability: i16,
    magic: bool,
    flags: Vec<F>,
    lore: Vec<String>,
}
impl<M, F> MenuItemBuilder<M, F> {
    /// One unnamed item, undamaged, with no flags or lore.
    #[must_use]
    pub fn new() -> Self {
        Self {
            material: None,
            name: None,
            clear_name: false,
            amount: 1,
            durability: 0,
            magic: false,
            flags: vec![],
            lore: vec![],
        }
    }

    pub fn set_material(&mut self, material: M) -> &mut Self {
        self.material = Some(material);
        self
    }

    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = Some(name.into());
        self
    }

    pub fn clear_name(&mut self) -> &mut Self {
        self.clear_name = true;
        self
    }

    pub fn set_amount(&mut self, amount: i32) -> &mut Self {
        self.amount = amount;
        self
    }

    pub fn set_durability(&mut self, durability: i16) -> &mut Self {
        self.durability = durability;
        self
    }

    pub fn set_magic(&mut self, magic: bool) -> &mut Self {
        self.magic = magic;
        self
    }

    /// Replaces the lore lines.
    pub fn set_lore(&mut self, lore: Vec<String>) -> &mut Self {
        self.lore = lore;
        self
    }

    /// Produces the item.
    #[must_use]
    pub fn build(self) -> MenuItem<M, F> {
        let name = if self.clear_name {
            DisplayName::Cleared
        } else {
            self.name.map_or(DisplayName::Unset, DisplayName::Named)
        };

        MenuItem {
            material: self.material,
            name,
            amount: self.amount,
            durability: self.durability,
            magic: self.magic,
            flags: self.flags,
            lore: self.lore,
        }
    }
}
impl<M, F: PartialEq> MenuItemBuilder<M, F> {
    /// Adds flags, skipping any already present.
    pub fn add_flags(&mut self, flags: impl IntoIterator<Item = F>) -> &mut Self {
        for flag in flags {
            if !self.flags.contains(&flag) {
                self.flags.push(flag);
            }
        }
        self
    }
}
impl<M, F> Default for MenuItemBuilder<M, F> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let item = MenuItem::<&str, &str>::builder().build();
        assert!(item.material().is_none());
        assert_eq!(item.name(), &DisplayName::Unset);
        assert_eq!(item.amount(), 1);
        assert_eq!(item.durability(), 0);
        assert!(!item.magic());
        assert!(item.flags().is_empty());
        assert!(item.lore().is_empty());
    }

    #[test]
    fn test_clear_name_wins_in_any_order() {
        let mut builder = MenuItemBuilder::<&str, &str>::new();
        builder.clear_name().set_name("Later");
        assert_eq!(builder.build().name(), &DisplayName::Cleared);

        let mut builder = MenuItemBuilder::<&str, &str>::new();
        builder.set_name("Earlier").clear_name();
        assert_eq!(builder.build().name().text(), Some(""));
    }

    #[test]
    fn test_flags_are_a_set() {
        let mut builder = MenuItemBuilder::<&str, &str>::new();
        builder
            .add_flags(["HIDE_ENCHANTS", "UNBREAKABLE"])
            .add_flags(["HIDE_ENCHANTS"]);
        assert_eq!(builder.build().flags(), ["HIDE_ENCHANTS", "UNBREAKABLE"]);
    }

    #[test]
    fn test_builder_values() {
        let mut builder = MenuItemBuilder::<&str, &str>::new();
        builder
            .set_material("STONE")
            .set_name("Rock")
            .set_amount(16)
            .set_durability(-1)
            .set_magic(true)
            .set_lore(vec!["Heavy".to_string()]);

        let item = builder.build();
        assert_eq!(item.material(), Some(&"STONE"));
        assert_eq!(item.name().text(), Some("Rock"));
        assert_eq!(item.amount(), 16);
        assert_eq!(item.durability(), -1);
        assert!(item.magic());
        assert_eq!(item.lore(), ["Heavy".to_string()]);
    }
}
