//! Locating a `<menu>` or `<item>` definition by id and building it.
use crate::{
    Host, Menu, MenuItem, ResourceLocator, StrSpan,
    dispatch::{parse_item, parse_menu},
    error::{ErrorContext, MenuError, MenuErrorKind, MenuResult, bail},
    scanner::{ElementScanner, StartElement},
};
use log::{debug, warn};
use std::{
    io::Read,
    path::{Path, PathBuf},
};

const MENU_ELEMENT: &str = "menu";
const ITEM_ELEMENT: &str = "item";
const ID_ATTRIBUTE: &str = "id";

/// Which element wins when several share the requested id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchPolicy {
    /// Scan the whole document; the last matching element wins.
    ///
    /// Every matching element is still built, so an invalid earlier definition
    /// fails the load even if a later one would replace it.
    #[default]
    LastMatch,

    /// Stop at the first matching element.
    ///
    /// Anything after it, including malformed markup, is never read.
    FirstMatch,
}

/// Where to load definitions from, and how to pick among duplicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    path: PathBuf,
    match_policy: MatchPolicy,
}
impl LoaderConfig {
    /// Creates a configuration for the resource at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            match_policy: MatchPolicy::default(),
        }
    }

    /// Sets the duplicate id policy.
    #[must_use]
    pub fn with_match_policy(mut self, policy: MatchPolicy) -> Self {
        self.match_policy = policy;
        self
    }

    /// Replaces the resource path.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn match_policy(&self) -> MatchPolicy {
        self.match_policy
    }
}

/// Loads menu and item definitions from an XML resource.
///
/// The loader reads the configured resource on every call; nothing is cached.
/// Changing the path requires `&mut self`, so it can never race a load in
/// progress.
///
/// ```rust
/// use menuxml::{MemoryLocator, MenuLoader, NameTableHost};
///
/// let locator = MemoryLocator::new().with_document(
///     "gui.xml",
///     r#"<gui><item id="sword" material="diamond_sword" amount="1"/></gui>"#,
/// );
/// let host = NameTableHost::new().with_materials(["DIAMOND_SWORD"]);
///
/// let loader = MenuLoader::new(locator, host, "gui.xml");
/// let sword = loader.load_item("sword").unwrap().unwrap();
/// assert_eq!(sword.material().map(String::as_str), Some("DIAMOND_SWORD"));
///
/// assert!(loader.load_item("shield").unwrap().is_none());
/// ```
#[derive(Debug, Clone)]
pub struct MenuLoader<L, H> {
    locator: L,
    host: H,
    config: LoaderConfig,
}
impl<L: ResourceLocator, H: Host> MenuLoader<L, H> {
    /// Creates a loader reading `path` through `locator`, resolving names with `host`.
    pub fn new(locator: L, host: H, path: impl Into<PathBuf>) -> Self {
        Self::with_config(locator, host, LoaderConfig::new(path))
    }

    /// Creates a loader with a full configuration.
    pub fn with_config(locator: L, host: H, config: LoaderConfig) -> Self {
        Self {
            locator,
            host,
            config,
        }
    }

    /// Points the loader at a different resource.
    pub fn set_path(&mut self, path: impl Into<PathBuf>) {
        self.config.path = path.into();
    }

    /// Points the loader at a different resource.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.set_path(path);
        self
    }

    /// Sets the duplicate id policy.
    #[must_use]
    pub fn with_match_policy(mut self, policy: MatchPolicy) -> Self {
        self.config.match_policy = policy;
        self
    }

    #[must_use]
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    #[must_use]
    pub fn locator(&self) -> &L {
        &self.locator
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Loads the `<item>` with the given id.
    ///
    /// Returns `Ok(None)` if no item has that id.
    ///
    /// # Errors
    /// Fails if the resource cannot be read, the document is malformed, an
    /// `<item>` lacks an id, or the matching item has an invalid attribute.
    pub fn load_item(&self, id: &str) -> MenuResult<Option<MenuItem<H::Material, H::Flag>>>
    where
        H::Flag: PartialEq,
    {
        let src = self.read_source()?;
        self.load_item_from_str(&src, id)
            .map_err(|e| e.with_path(self.location()))
    }

    /// Loads the `<menu>` with the given id.
    ///
    /// Returns `Ok(None)` if no menu has that id.
    ///
    /// # Errors
    /// Fails if the resource cannot be read, the document is malformed, a
    /// `<menu>` lacks an id, or the matching menu has an invalid attribute.
    pub fn load_menu(&self, id: &str) -> MenuResult<Option<Menu<H::Color>>> {
        let src = self.read_source()?;
        self.load_menu_from_str(&src, id)
            .map_err(|e| e.with_path(self.location()))
    }

    /// Like [`MenuLoader::load_item`], over an in-memory document.
    ///
    /// # Errors
    /// See [`MenuLoader::load_item`].
    pub fn load_item_from_str(
        &self,
        src: &str,
        id: &str,
    ) -> MenuResult<Option<MenuItem<H::Material, H::Flag>>>
    where
        H::Flag: PartialEq,
    {
        self.find(src, ITEM_ELEMENT, id, |element| {
            parse_item(element, &self.host, src)
        })
    }

    /// Like [`MenuLoader::load_menu`], over an in-memory document.
    ///
    /// # Errors
    /// See [`MenuLoader::load_menu`].
    pub fn load_menu_from_str(&self, src: &str, id: &str) -> MenuResult<Option<Menu<H::Color>>> {
        self.find(src, MENU_ELEMENT, id, |element| {
            parse_menu(element, &self.host, src)
        })
    }

    fn find<T>(
        &self,
        src: &str,
        element_name: &str,
        id: &str,
        build: impl Fn(&StartElement<'_>) -> MenuResult<T>,
    ) -> MenuResult<Option<T>> {
        let mut found = None;

        for element in ElementScanner::new(src) {
            let element = element?;
            if !element.is(element_name) {
                continue;
            }

            let Some(element_id) = element.attribute(ID_ATTRIBUTE) else {
                bail!(
                    src,
                    element.span,
                    MenuErrorKind::MissingIdentifier {
                        element: element_name.to_string()
                    }
                );
            };
            if element_id.value() != id {
                continue;
            }

            let value = build(&element)?;
            if found.is_some() {
                let (row, _) = element.span.position(src);
                warn!("<{element_name} id=\"{id}\"> at line {row} replaces an earlier definition");
            } else {
                debug!("Found <{element_name} id=\"{id}\">");
            }
            found = Some(value);

            if self.config.match_policy == MatchPolicy::FirstMatch {
                break;
            }
        }

        if found.is_none() {
            debug!("No <{element_name}> with id \"{id}\"");
        }
        Ok(found)
    }

    fn location(&self) -> PathBuf {
        self.locator.describe(&self.config.path)
    }

    fn read_source(&self) -> MenuResult<String> {
        debug!("Reading {}", self.location().display());

        let mut bytes = vec![];
        self.locator
            .open(&self.config.path)
            .and_then(|mut reader| reader.read_to_end(&mut bytes))
            .map_err(|e| MenuError::from(e).with_path(self.location()))?;

        let mut src = match String::from_utf8(bytes) {
            Ok(src) => src,
            Err(e) => {
                let message = e.utf8_error().to_string();
                let valid_up_to = e.utf8_error().valid_up_to();
                let bytes = e.into_bytes();
                let prefix = std::str::from_utf8(&bytes[..valid_up_to]).unwrap_or_default();
                let span = StrSpan {
                    text: "",
                    start: valid_up_to,
                };

                let kind = MenuErrorKind::MalformedDocument(format!("Invalid UTF-8: {message}"));
                return Err(MenuError::new(kind, ErrorContext::new(prefix, span))
                    .with_path(self.location()));
            }
        };

        if src.starts_with('\u{feff}') {
            src.drain(..'\u{feff}'.len_utf8());
        }

        Ok(src)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FillPattern, MemoryLocator, NameTableHost};

    const GUI: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gui>
    <menu id="shop" title="Shop" rows="3" trifill="RED, GREEN, BLUE"/>
    <item id="sword" material="DIAMOND_SWORD" amount="1" flags="UNBREAKABLE, HIDE_ENCHANTS" lore="Sharp, Shiny"/>
</gui>
"#;

    fn loader(src: &str) -> MenuLoader<MemoryLocator, NameTableHost> {
        let locator = MemoryLocator::new().with_document("gui.xml", src);
        let host = NameTableHost::new()
            .with_materials(["DIAMOND_SWORD", "STONE"])
            .with_flags(["UNBREAKABLE", "HIDE_ENCHANTS"])
            .with_colors(["RED", "GREEN", "BLUE"]);
        MenuLoader::new(locator, host, "gui.xml")
    }

    #[test]
    fn test_load_menu() {
        let menu = loader(GUI).load_menu("shop").unwrap().unwrap();
        assert_eq!(menu.title(), "Shop");
        assert_eq!(menu.rows(), 3);
        assert_eq!(
            menu.fill_pattern(),
            Some(&FillPattern::Tri(
                "RED".to_string(),
                "GREEN".to_string(),
                "BLUE".to_string()
            ))
        );
    }

    #[test]
    fn test_load_item() {
        let item = loader(GUI).load_item("sword").unwrap().unwrap();
        assert_eq!(item.material().map(String::as_str), Some("DIAMOND_SWORD"));
        assert_eq!(item.amount(), 1);
        assert_eq!(item.flags(), ["UNBREAKABLE", "HIDE_ENCHANTS"]);
        assert_eq!(item.lore(), ["Sharp", "Shiny"]);
    }

    #[test]
    fn test_kinds_are_separate() {
        let loader = loader(GUI);
        assert!(loader.load_menu("sword").unwrap().is_none());
        assert!(loader.load_item("shop").unwrap().is_none());
    }

    #[test]
    fn test_set_path() {
        let mut loader = loader(GUI);
        loader.set_path("missing.xml");
        let err = loader.load_menu("shop").unwrap_err();
        assert!(matches!(err.kind, MenuErrorKind::ResourceUnavailable(_)));
        assert_eq!(err.context.path, Some(PathBuf::from("missing.xml")));
    }

    struct BytesLocator(&'static [u8]);
    impl ResourceLocator for BytesLocator {
        fn open(&self, _: &Path) -> std::io::Result<Box<dyn Read + '_>> {
            Ok(Box::new(self.0))
        }
    }

    #[test]
    fn test_invalid_utf8() {
        let locator = BytesLocator(b"<gui>\n<menu id=\"\xff\"/></gui>");
        let loader = MenuLoader::new(locator, NameTableHost::new(), "gui.xml");

        let err = loader.load_menu("shop").unwrap_err();
        assert!(err.is_malformed());
        assert_eq!(err.context.position(), (2, 11));
        assert_eq!(err.context.path, Some(PathBuf::from("gui.xml")));
    }

    #[test]
    fn test_byte_order_mark() {
        let loader = loader("\u{feff}<gui><menu id=\"a\" rows=\"2\"/></gui>");
        let menu = loader.load_menu("a").unwrap().unwrap();
        assert_eq!(menu.rows(), 2);
    }

    #[test]
    fn test_missing_identifier_only_for_requested_kind() {
        let loader = loader(r#"<gui><menu title="x"/><item id="a"/></gui>"#);
        assert!(loader.load_item("a").unwrap().is_some());

        let err = loader.load_menu("a").unwrap_err();
        assert!(matches!(
            err.kind,
            MenuErrorKind::MissingIdentifier { ref element } if element == "menu"
        ));
    }
}
