//! Streaming scan over the start elements of a document.
//!
//! The scanner never builds a tree. It walks the `xmlparser` token stream once,
//! checks that the document is well formed as it goes, and yields each start
//! element together with its entity-decoded attributes as soon as the tag is
//! complete.
use crate::{
    StrSpan,
    error::{MenuResult, bail},
};
use htmlentity::entity::{ICodedDataTrait, decode};
use std::borrow::Cow;
use xmlparser::{ElementEnd, Token};

/// A start tag and its attributes: `<local attr="value">`
#[derive(Debug, Clone, PartialEq)]
pub struct StartElement<'src> {
    /// The span of the element name in the source.
    pub span: StrSpan<'src>,

    /// The namespace prefix, if any.
    pub prefix: Option<StrSpan<'src>>,

    /// The local portion of the name.
    pub local: StrSpan<'src>,

    /// Attributes in source order.
    pub attributes: Vec<Attribute<'src>>,
}
impl<'src> StartElement<'src> {
    /// True for an unprefixed element with the given local name.
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.prefix.is_none() && self.local == name
    }

    /// Get an unprefixed attribute by name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&Attribute<'src>> {
        self.attributes.iter().find(|a| a.is(name))
    }
}

/// An attribute on a start element: `name="value"`
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute<'src> {
    /// The span of the whole attribute in the source.
    pub span: StrSpan<'src>,

    /// The namespace prefix, if any.
    pub prefix: Option<StrSpan<'src>>,

    /// The local portion of the name.
    pub local: StrSpan<'src>,

    /// The normalized value with character and entity references resolved.
    pub value: Cow<'src, str>,
}
impl Attribute<'_> {
    /// True for an unprefixed attribute with the given local name.
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.prefix.is_none() && self.local == name
    }

    /// The decoded value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// Between tags
    Content,

    /// Collecting attributes for a start tag
    TagAttributes,

    /// The document ended or an error was returned
    Done,
}

/// Yields every start element of a document, in document order.
///
/// Errors are returned once, after which the scanner is exhausted.
pub struct ElementScanner<'src> {
    src: &'src str,
    tokenizer: xmlparser::Tokenizer<'src>,
    state: ScanState,
    open: Vec<(Option<&'src str>, &'src str, StrSpan<'src>)>,
    pending: Option<StartElement<'src>>,
    seen_root: bool,
}
impl<'src> ElementScanner<'src> {
    /// Creates a scanner over the given document.
    #[must_use]
    pub fn new(src: &'src str) -> Self {
        Self {
            src,
            tokenizer: xmlparser::Tokenizer::from(src),
            state: ScanState::Content,
            open: vec![],
            pending: None,
            seen_root: false,
        }
    }

    fn next_element(&mut self) -> MenuResult<Option<StartElement<'src>>> {
        let src = self.src;

        loop {
            let Some(next) = self.tokenizer.next() else {
                if let Some((prefix, local, span)) = self.open.pop() {
                    let name = qualified(prefix, local);
                    bail!(src, span, msg = "Unclosed tag: {name}");
                }
                if !self.seen_root {
                    bail!(src, StrSpan::end(src), msg = "Document has no root element");
                }
                return Ok(None);
            };

            let next = match next {
                Ok(token) => token,
                Err(e) => {
                    let span = span_at(src, e.pos());
                    bail!(src, span, msg = "{e}");
                }
            };

            match self.state {
                ScanState::Content => match next {
                    Token::ElementStart {
                        prefix,
                        local,
                        span,
                    } => {
                        self.seen_root = true;
                        self.pending = Some(StartElement {
                            span: span.into(),
                            prefix: non_empty(prefix),
                            local: local.into(),
                            attributes: vec![],
                        });
                        self.state = ScanState::TagAttributes;
                    }

                    Token::ElementEnd {
                        end: ElementEnd::Close(prefix, local),
                        span,
                    } => {
                        let Some((open_prefix, open_local, open_span)) = self.open.pop() else {
                            bail!(src, span, msg = "Closing tag without a matching start tag");
                        };

                        let prefix = non_empty(prefix).map(|p| p.as_str());
                        if open_prefix != prefix || open_local != local.as_str() {
                            let name = qualified(open_prefix, open_local);
                            bail!(src, open_span, msg = "Unclosed tag: {name}");
                        }
                    }

                    // Declarations, comments, text, cdata, processing
                    // instructions and DTD content carry nothing we read
                    _ => {}
                },

                ScanState::TagAttributes => match next {
                    Token::Attribute {
                        prefix,
                        local,
                        value,
                        span,
                        ..
                    } => {
                        let Some(element) = self.pending.as_mut() else {
                            bail!(src, span, msg = "Bug; Cannot apply attribute; no open tag!");
                        };

                        let prefix = non_empty(prefix);
                        let duplicate = element.attributes.iter().any(|a| {
                            a.prefix.map(|p| p.as_str()) == prefix.map(|p| p.as_str())
                                && a.local == local.as_str()
                        });
                        if duplicate {
                            bail!(
                                src,
                                span,
                                msg = "Duplicate attribute `{}` on <{}>",
                                local.as_str(),
                                element.local
                            );
                        }

                        let value = match decode_value(value.as_str()) {
                            Ok(value) => value,
                            Err(reason) => bail!(
                                src,
                                value,
                                msg = "Invalid entity in attribute `{}`: {reason}",
                                local.as_str()
                            ),
                        };

                        element.attributes.push(Attribute {
                            span: span.into(),
                            prefix,
                            local: local.into(),
                            value,
                        });
                    }

                    Token::ElementEnd { end, span } => {
                        let Some(element) = self.pending.take() else {
                            bail!(src, span, msg = "Bug; Cannot close tag; no open tag!");
                        };

                        match end {
                            ElementEnd::Open => {
                                self.open.push((
                                    element.prefix.map(|p| p.as_str()),
                                    element.local.as_str(),
                                    element.span,
                                ));
                            }
                            ElementEnd::Empty => (),
                            ElementEnd::Close(..) => {
                                bail!(src, span, msg = "Unexpected closing tag inside <{}>", element.local);
                            }
                        }

                        self.state = ScanState::Content;
                        return Ok(Some(element));
                    }

                    _ => {
                        bail!(src, self.pending_span(), msg = "Unexpected token in tag attributes");
                    }
                },

                ScanState::Done => return Ok(None),
            }
        }
    }

    fn pending_span(&self) -> StrSpan<'src> {
        self.pending.as_ref().map(|e| e.span).unwrap_or_default()
    }
}

impl<'src> Iterator for ElementScanner<'src> {
    type Item = MenuResult<StartElement<'src>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.state == ScanState::Done {
            return None;
        }

        match self.next_element() {
            Ok(Some(element)) => Some(Ok(element)),
            Ok(None) => {
                self.state = ScanState::Done;
                None
            }
            Err(e) => {
                self.state = ScanState::Done;
                Some(Err(e))
            }
        }
    }
}

const PREDEFINED_ENTITIES: [&str; 5] = ["amp", "lt", "gt", "quot", "apos"];

/// Normalize whitespace, then resolve character and entity references in a raw
/// attribute value.
///
/// Only the predefined XML entities and numeric character references are
/// accepted; anything else makes the document malformed.
fn decode_value(raw: &str) -> Result<Cow<'_, str>, String> {
    let value = normalize_whitespace(raw);
    if !value.contains('&') {
        return Ok(value);
    }

    let mut rest: &str = &value;
    while let Some(start) = rest.find('&') {
        rest = &rest[start + 1..];
        let Some(end) = rest.find(';') else {
            return Err(format!("unterminated reference `&{rest}`"));
        };

        let name = &rest[..end];
        if !is_valid_reference(name) {
            return Err(format!("undefined reference `&{name};`"));
        }
        rest = &rest[end + 1..];
    }

    ICodedDataTrait::to_string(&decode(value.as_bytes()))
        .map(Cow::Owned)
        .map_err(|e| e.to_string())
}

/// Literal tabs and line breaks become spaces; `\r\n` counts as one break.
fn normalize_whitespace(raw: &str) -> Cow<'_, str> {
    if !raw.contains(['\t', '\n', '\r']) {
        return Cow::Borrowed(raw);
    }

    Cow::Owned(raw.replace("\r\n", " ").replace(['\t', '\n', '\r'], " "))
}

fn is_valid_reference(name: &str) -> bool {
    let code = match name.strip_prefix("#x") {
        Some(hex) => parse_code(hex, 16),
        None => match name.strip_prefix('#') {
            Some(dec) => parse_code(dec, 10),
            None => return PREDEFINED_ENTITIES.contains(&name),
        },
    };

    code.and_then(char::from_u32).is_some_and(is_xml_char)
}

fn parse_code(digits: &str, radix: u32) -> Option<u32> {
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    u32::from_str_radix(digits, radix).ok()
}

fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n'
            | '\r'
            | '\u{20}'..='\u{d7ff}'
            | '\u{e000}'..='\u{fffd}'
            | '\u{10000}'..='\u{10ffff}'
    )
}

fn non_empty(span: xmlparser::StrSpan<'_>) -> Option<StrSpan<'_>> {
    if span.as_str().is_empty() {
        None
    } else {
        Some(span.into())
    }
}

fn qualified(prefix: Option<&str>, local: &str) -> String {
    match prefix {
        Some(prefix) => format!("{prefix}:{local}"),
        None => local.to_string(),
    }
}

/// Translates a tokenizer row/col back into a span of the source.
fn span_at(src: &str, pos: xmlparser::TextPos) -> StrSpan<'_> {
    let mut row = 1;
    let mut col = 1;
    for (i, c) in src.char_indices() {
        if row == pos.row && col == pos.col {
            return StrSpan {
                text: &src[i..],
                start: i,
            };
        }
        if c == '\n' {
            row += 1;
            col = 1;
        } else {
            col += 1;
        }
    }

    StrSpan::end(src)
}
