//! Streaming loader for XML menu and item definitions.
//!
//! A definitions document holds any number of `<menu>` and `<item>` elements,
//! anywhere in the tree, each tagged with an `id`:
//!
//! ```xml
//! <gui>
//!     <menu id="shop" title="Shop" rows="3" trifill="RED, GREEN, BLUE"/>
//!     <item id="sword" material="DIAMOND_SWORD" flags="UNBREAKABLE" lore="Sharp, Shiny"/>
//! </gui>
//! ```
//!
//! [`MenuLoader`] scans the document once per call and builds the requested
//! [`Menu`] or [`MenuItem`] from the element's attributes. Materials, flags and
//! colors are resolved through the [`Host`] capabilities, so the crate carries
//! no knowledge of any particular platform's enumerations.
//!
//! ```rust
//! use menuxml::{FillPattern, MemoryLocator, MenuLoader, NameTableHost};
//!
//! const GUI: &str = r#"<gui><menu id="shop" title="Shop" rows="3" bifill="red, blue"/></gui>"#;
//!
//! let host = NameTableHost::new().with_colors(["RED", "BLUE"]);
//! let loader = MenuLoader::new(MemoryLocator::new(), host, "unused.xml");
//!
//! let menu = loader.load_menu_from_str(GUI, "shop").unwrap().unwrap();
//! assert_eq!(menu.title(), "Shop");
//! assert_eq!(menu.fill_pattern(), Some(&FillPattern::Bi("RED".to_string(), "BLUE".to_string())));
//! ```
//!
//! When several elements share an id, the last one in the document wins by
//! default. See [`MatchPolicy`].

pub mod error;
pub use error::{ErrorContext, MenuError, MenuErrorKind, MenuResult};

mod strspan;
pub use strspan::{StrSpan, StringSpan};

pub mod scanner;

mod host;
pub use host::{
    AlternateColorCodes, COLOR_CHAR, ColorCodes, ColorLookup, FlagLookup, Host, MaterialLookup,
    NameTableHost,
};

mod locator;
pub use locator::{DirectoryLocator, MemoryLocator, ResourceLocator};

mod menu;
pub use menu::{FillPattern, Menu};

mod item;
pub use item::{DisplayName, MenuItem, MenuItemBuilder};

mod dispatch;
pub use dispatch::COLOR_MARKER;

mod loader;
pub use loader::{LoaderConfig, MatchPolicy, MenuLoader};
