//! Attribute dispatch for `<item>` and `<menu>` elements.
//!
//! Each element kind has a table mapping attribute names to typed handlers.
//! One driver walks an element's attributes in source order and applies the
//! matching handler; unknown names are skipped.
use crate::{
    FillPattern, Menu, MenuItem, MenuItemBuilder,
    error::{ErrorContext, MenuError, MenuErrorKind, MenuResult},
    host::{ColorLookup, FlagLookup, Host, MaterialLookup},
    scanner::{Attribute, StartElement},
};
use log::trace;

/// Marker introducing a color code in `name` attributes.
pub const COLOR_MARKER: char = '^';

type Handler<T, H> = fn(&mut T, &H, &Attribute<'_>) -> Result<(), MenuErrorKind>;

type ItemBuilderFor<H> = MenuItemBuilder<<H as MaterialLookup>::Material, <H as FlagLookup>::Flag>;
type ItemHandler<H> = Handler<ItemBuilderFor<H>, H>;
type MenuHandler<H> = Handler<Menu<<H as ColorLookup>::Color>, H>;

fn item_table<H>() -> [(&'static str, ItemHandler<H>); 8]
where
    H: Host,
    H::Flag: PartialEq,
{
    [
        ("material", item_material::<H>),
        ("clearName", item_clear_name::<H>),
        ("name", item_name::<H>),
        ("amount", item_amount::<H>),
        ("durability", item_durability::<H>),
        ("magic", item_magic::<H>),
        ("flags", item_flags::<H>),
        ("lore", item_lore::<H>),
    ]
}

fn menu_table<H: Host>() -> [(&'static str, MenuHandler<H>); 6] {
    [
        ("title", menu_title::<H>),
        ("rows", menu_rows::<H>),
        ("unifill", menu_unifill::<H>),
        ("bifill", menu_bifill::<H>),
        ("trifill", menu_trifill::<H>),
        ("quadfill", menu_quadfill::<H>),
    ]
}

/// Build an item from the attributes of an `<item>` element.
pub(crate) fn parse_item<H>(
    element: &StartElement<'_>,
    host: &H,
    src: &str,
) -> MenuResult<MenuItem<H::Material, H::Flag>>
where
    H: Host,
    H::Flag: PartialEq,
{
    let mut builder = MenuItemBuilder::new();
    apply_attributes(&mut builder, host, element, &item_table::<H>(), src)?;
    Ok(builder.build())
}

/// Build a menu from the attributes of a `<menu>` element.
pub(crate) fn parse_menu<H: Host>(
    element: &StartElement<'_>,
    host: &H,
    src: &str,
) -> MenuResult<Menu<H::Color>> {
    let mut menu = Menu::new();
    apply_attributes(&mut menu, host, element, &menu_table::<H>(), src)?;
    Ok(menu)
}

fn apply_attributes<T, H>(
    target: &mut T,
    host: &H,
    element: &StartElement<'_>,
    table: &[(&'static str, Handler<T, H>)],
    src: &str,
) -> MenuResult<()> {
    for attribute in &element.attributes {
        if attribute.is("id") {
            continue;
        }

        let Some((_, handler)) = table.iter().find(|(name, _)| attribute.is(name)) else {
            trace!(
                "Ignoring attribute `{}` on <{}>",
                attribute.local, element.local
            );
            continue;
        };

        handler(target, host, attribute)
            .map_err(|kind| MenuError::new(kind, ErrorContext::new(src, attribute.span)))?;
    }

    Ok(())
}

//
// <item> handlers

fn item_material<H: Host>(
    builder: &mut ItemBuilderFor<H>,
    host: &H,
    attribute: &Attribute<'_>,
) -> Result<(), MenuErrorKind> {
    let name = attribute.value().to_uppercase();
    let Some(material) = host.material(&name) else {
        return Err(MenuErrorKind::UnknownMaterial(name));
    };

    builder.set_material(material);
    Ok(())
}

fn item_clear_name<H: Host>(
    builder: &mut ItemBuilderFor<H>,
    _: &H,
    _: &Attribute<'_>,
) -> Result<(), MenuErrorKind> {
    builder.clear_name();
    Ok(())
}

fn item_name<H: Host>(
    builder: &mut ItemBuilderFor<H>,
    host: &H,
    attribute: &Attribute<'_>,
) -> Result<(), MenuErrorKind> {
    builder.set_name(host.translate(COLOR_MARKER, attribute.value()));
    Ok(())
}

fn item_amount<H: Host>(
    builder: &mut ItemBuilderFor<H>,
    _: &H,
    attribute: &Attribute<'_>,
) -> Result<(), MenuErrorKind> {
    builder.set_amount(parse_number(attribute)?);
    Ok(())
}

fn item_durability<H: Host>(
    builder: &mut ItemBuilderFor<H>,
    _: &H,
    attribute: &Attribute<'_>,
) -> Result<(), MenuErrorKind> {
    builder.set_durability(parse_number(attribute)?);
    Ok(())
}

fn item_magic<H: Host>(
    builder: &mut ItemBuilderFor<H>,
    _: &H,
    attribute: &Attribute<'_>,
) -> Result<(), MenuErrorKind> {
    builder.set_magic(attribute.value().eq_ignore_ascii_case("true"));
    Ok(())
}

fn item_flags<H>(
    builder: &mut ItemBuilderFor<H>,
    host: &H,
    attribute: &Attribute<'_>,
) -> Result<(), MenuErrorKind>
where
    H: Host,
    H::Flag: PartialEq,
{
    let flags = split_list(attribute.value())
        .map(|name| {
            host.flag(name)
                .ok_or_else(|| MenuErrorKind::UnknownFlag(name.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    builder.add_flags(flags);
    Ok(())
}

fn item_lore<H: Host>(
    builder: &mut ItemBuilderFor<H>,
    _: &H,
    attribute: &Attribute<'_>,
) -> Result<(), MenuErrorKind> {
    builder.set_lore(split_list(attribute.value()).map(String::from).collect());
    Ok(())
}

//
// <menu> handlers

fn menu_title<H: Host>(
    menu: &mut Menu<H::Color>,
    _: &H,
    attribute: &Attribute<'_>,
) -> Result<(), MenuErrorKind> {
    menu.set_title(attribute.value());
    Ok(())
}

fn menu_rows<H: Host>(
    menu: &mut Menu<H::Color>,
    _: &H,
    attribute: &Attribute<'_>,
) -> Result<(), MenuErrorKind> {
    menu.set_rows(parse_number(attribute)?);
    Ok(())
}

fn menu_unifill<H: Host>(
    menu: &mut Menu<H::Color>,
    host: &H,
    attribute: &Attribute<'_>,
) -> Result<(), MenuErrorKind> {
    let color = lookup_color(host, attribute.value().trim())?;
    menu.fill(FillPattern::Uni(color));
    Ok(())
}

fn menu_bifill<H: Host>(
    menu: &mut Menu<H::Color>,
    host: &H,
    attribute: &Attribute<'_>,
) -> Result<(), MenuErrorKind> {
    let [a, b] = fill_colors::<H, 2>(host, attribute)?;
    menu.fill(FillPattern::Bi(a, b));
    Ok(())
}

fn menu_trifill<H: Host>(
    menu: &mut Menu<H::Color>,
    host: &H,
    attribute: &Attribute<'_>,
) -> Result<(), MenuErrorKind> {
    let [a, b, c] = fill_colors::<H, 3>(host, attribute)?;
    menu.fill(FillPattern::Tri(a, b, c));
    Ok(())
}

fn menu_quadfill<H: Host>(
    menu: &mut Menu<H::Color>,
    host: &H,
    attribute: &Attribute<'_>,
) -> Result<(), MenuErrorKind> {
    let [a, b, c, d] = fill_colors::<H, 4>(host, attribute)?;
    menu.fill(FillPattern::Quad(a, b, c, d));
    Ok(())
}

//
// Value helpers

/// Comma separated tokens, each trimmed.
///
/// Empty tokens are kept, except trailing ones left by a closing comma. A value
/// without any comma is always a single token, even when empty.
fn split_list(value: &str) -> impl Iterator<Item = &str> {
    let mut tokens: Vec<&str> = value.split(',').collect();
    if tokens.len() > 1 {
        while tokens.last().is_some_and(|t| t.is_empty()) {
            tokens.pop();
        }
    }
    tokens.into_iter().map(str::trim)
}

fn parse_number<T>(attribute: &Attribute<'_>) -> Result<T, MenuErrorKind>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    attribute
        .value()
        .parse()
        .map_err(|e: T::Err| MenuErrorKind::InvalidAttributeValue {
            attribute: attribute.local.to_string(),
            value: attribute.value().to_string(),
            reason: e.to_string(),
        })
}

fn lookup_color<H: ColorLookup>(host: &H, name: &str) -> Result<H::Color, MenuErrorKind> {
    host.color(name)
        .ok_or_else(|| MenuErrorKind::UnknownColor(name.to_string()))
}

/// The first `N` colors of a fill list. Extra tokens are ignored.
fn fill_colors<H: ColorLookup, const N: usize>(
    host: &H,
    attribute: &Attribute<'_>,
) -> Result<[H::Color; N], MenuErrorKind> {
    let arity = |found| MenuErrorKind::FillArity {
        attribute: attribute.local.to_string(),
        expected: N,
        found,
    };

    let names: Vec<&str> = split_list(attribute.value()).collect();
    if names.len() < N {
        return Err(arity(names.len()));
    }

    let colors = names[..N]
        .iter()
        .map(|name| lookup_color(host, name))
        .collect::<Result<Vec<_>, _>>()?;

    colors.try_into().map_err(|c: Vec<_>| arity(c.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DisplayName, NameTableHost, scanner::ElementScanner};

    fn host() -> NameTableHost {
        NameTableHost::new()
            .with_materials(["DIAMOND_SWORD", "STONE"])
            .with_flags(["UNBREAKABLE", "HIDE_ENCHANTS"])
            .with_colors(["RED", "GREEN", "BLUE", "WHITE"])
    }

    fn first(src: &str) -> StartElement<'_> {
        ElementScanner::new(src).next().unwrap().unwrap()
    }

    #[test]
    fn test_item_attributes() {
        let src = r#"<item id="sword" material="diamond_sword" name="^bExcalibur" amount="2" durability="-5" magic="TRUE" flags="UNBREAKABLE, HIDE_ENCHANTS" lore="Sharp, Shiny" extra="ignored"/>"#;
        let item = parse_item(&first(src), &host(), src).unwrap();

        assert_eq!(item.material().map(String::as_str), Some("DIAMOND_SWORD"));
        assert_eq!(item.name(), &DisplayName::Named("\u{a7}bExcalibur".to_string()));
        assert_eq!(item.amount(), 2);
        assert_eq!(item.durability(), -5);
        assert!(item.magic());
        assert_eq!(item.flags(), ["UNBREAKABLE", "HIDE_ENCHANTS"]);
        assert_eq!(item.lore(), ["Sharp", "Shiny"]);
    }

    #[test]
    fn test_magic_is_lenient() {
        let src = r#"<item id="a" magic="yes"/>"#;
        let item = parse_item(&first(src), &host(), src).unwrap();
        assert!(!item.magic());
    }

    #[test]
    fn test_clear_name_before_name() {
        let src = r#"<item id="a" clearName="" name="Ignored"/>"#;
        let item = parse_item(&first(src), &host(), src).unwrap();
        assert_eq!(item.name(), &DisplayName::Cleared);
    }

    #[test]
    fn test_durability_out_of_range() {
        let src = r#"<item id="a" durability="40000"/>"#;
        let err = parse_item(&first(src), &host(), src).unwrap_err();
        assert!(matches!(
            err.kind,
            MenuErrorKind::InvalidAttributeValue { ref attribute, .. } if attribute == "durability"
        ));
        assert!(err.to_string().contains("| durability=\"40000\""));
    }

    #[test]
    fn test_amount_not_numeric() {
        let src = r#"<item id="a" amount="lots"/>"#;
        let err = parse_item(&first(src), &host(), src).unwrap_err();
        assert!(matches!(err.kind, MenuErrorKind::InvalidAttributeValue { .. }));
    }

    #[test]
    fn test_unknown_material_and_flag() {
        let src = r#"<item id="a" material="bedrockish"/>"#;
        let err = parse_item(&first(src), &host(), src).unwrap_err();
        assert!(matches!(err.kind, MenuErrorKind::UnknownMaterial(ref m) if m == "BEDROCKISH"));

        let src = r#"<item id="a" flags="UNBREAKABLE, HIDE_DYE"/>"#;
        let err = parse_item(&first(src), &host(), src).unwrap_err();
        assert!(matches!(err.kind, MenuErrorKind::UnknownFlag(ref f) if f == "HIDE_DYE"));
    }

    #[test]
    fn test_menu_attributes() {
        let src = r#"<menu id="shop" title="^aShop" rows="3" trifill="RED, GREEN, BLUE"/>"#;
        let menu = parse_menu(&first(src), &host(), src).unwrap();

        assert_eq!(menu.title(), "^aShop");
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
    fn test_last_fill_wins() {
        let src = r#"<menu id="a" quadfill="red,green,blue,white" unifill=" white "/>"#;
        let menu = parse_menu(&first(src), &host(), src).unwrap();
        assert_eq!(menu.fill_pattern(), Some(&FillPattern::Uni("WHITE".to_string())));
    }

    #[test]
    fn test_fill_arity() {
        let src = r#"<menu id="a" bifill="RED"/>"#;
        let err = parse_menu(&first(src), &host(), src).unwrap_err();
        assert!(matches!(
            err.kind,
            MenuErrorKind::FillArity { expected: 2, found: 1, .. }
        ));

        let src = r#"<menu id="a" bifill="RED, GREEN, BLUE"/>"#;
        let menu = parse_menu(&first(src), &host(), src).unwrap();
        assert_eq!(menu.fill_pattern().map(FillPattern::arity), Some(2));
    }

    #[test]
    fn test_trailing_comma_is_dropped() {
        let src = r#"<menu id="a" bifill="RED,"/>"#;
        let err = parse_menu(&first(src), &host(), src).unwrap_err();
        assert!(matches!(
            err.kind,
            MenuErrorKind::FillArity { expected: 2, found: 1, .. }
        ));

        let src = r#"<item id="a" lore="a,b," flags="UNBREAKABLE,,"/>"#;
        let item = parse_item(&first(src), &host(), src).unwrap();
        assert_eq!(item.lore(), ["a", "b"]);
        assert_eq!(item.flags(), ["UNBREAKABLE"]);
    }

    #[test]
    fn test_split_list() {
        assert_eq!(split_list("a,,b").collect::<Vec<_>>(), ["a", "", "b"]);
        assert_eq!(split_list("a, ").collect::<Vec<_>>(), ["a", ""]);
        assert_eq!(split_list("").collect::<Vec<_>>(), [""]);
        assert!(split_list(",,").next().is_none());
    }

    #[test]
    fn test_unknown_color() {
        let src = r#"<menu id="a" bifill="RED, MAUVE"/>"#;
        let err = parse_menu(&first(src), &host(), src).unwrap_err();
        assert!(matches!(err.kind, MenuErrorKind::UnknownColor(ref c) if c == "MAUVE"));
    }

    #[test]
    fn test_rows_not_numeric() {
        let src = r#"<menu id="a" rows="three"/>"#;
        let err = parse_menu(&first(src), &host(), src).unwrap_err();
        assert!(matches!(err.kind, MenuErrorKind::InvalidAttributeValue { .. }));
    }
}
