//! Error handling for menu loading
use super::{StrSpan, StringSpan};
use std::path::PathBuf;

/// A result type for menu loading, which can be either a successful value or an error.
pub type MenuResult<T> = std::result::Result<T, MenuError>;

/// An error that occurred while loading a menu or item definition.
#[derive(Debug)]
pub struct MenuError {
    /// The context of the error
    pub context: Box<ErrorContext>,

    /// The kind of error that occurred
    pub kind: MenuErrorKind,
}
impl MenuError {
    /// Creates a new `MenuError`
    #[must_use]
    pub fn new(kind: MenuErrorKind, context: ErrorContext) -> Self {
        Self {
            context: Box::new(context),
            kind,
        }
    }

    /// Adds a path to the error context.
    #[must_use]
    pub fn with_path(mut self, path: PathBuf) -> Self {
        self.context.path = Some(path);
        self
    }

    /// True if the document itself could not be read as XML.
    #[must_use]
    pub fn is_malformed(&self) -> bool {
        matches!(self.kind, MenuErrorKind::MalformedDocument(_))
    }
}
impl std::fmt::Display for MenuError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.context)?;

        for line in self.kind.to_string().lines() {
            writeln!(f, "= {line}")?;
        }
        Ok(())
    }
}
impl std::error::Error for MenuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(&self.kind)
    }
}
impl From<std::io::Error> for MenuError {
    fn from(err: std::io::Error) -> Self {
        Self::new(
            MenuErrorKind::ResourceUnavailable(err),
            ErrorContext::new("", StrSpan::default()),
        )
    }
}

/// The kind of error that occurred while loading a definition.
#[derive(Debug, thiserror::Error)]
pub enum MenuErrorKind {
    /// The resource could not be opened or read
    #[error("Resource unavailable: {0}")]
    ResourceUnavailable(#[source] std::io::Error),

    /// The document is not well-formed XML
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    /// A `<menu>` or `<item>` element has no `id` attribute
    #[error("<{element}> element is missing the required `id` attribute")]
    MissingIdentifier {
        /// Name of the offending element
        element: String,
    },

    /// An attribute value could not be converted to the expected type
    #[error("Invalid value `{value}` for attribute `{attribute}`: {reason}")]
    InvalidAttributeValue {
        /// Attribute name
        attribute: String,

        /// Raw attribute value
        value: String,

        /// Why the conversion failed
        reason: String,
    },

    /// The host does not know the material
    #[error("Unknown material: {0}")]
    UnknownMaterial(String),

    /// The host does not know the item flag
    #[error("Unknown item flag: {0}")]
    UnknownFlag(String),

    /// The host does not know the fill color
    #[error("Unknown fill color: {0}")]
    UnknownColor(String),

    /// A fill attribute listed fewer colors than its pattern needs
    #[error("`{attribute}` needs {expected} colors, found {found}")]
    FillArity {
        /// Attribute name
        attribute: String,

        /// Colors required by the pattern
        expected: usize,

        /// Colors present in the value
        found: usize,
    },
}

/// Context describing the error location in the source document.
#[derive(Debug, Clone)]
pub struct ErrorContext {
    /// The path of the resource that was loaded, if available.
    pub path: Option<PathBuf>,

    /// Full source of the document, for row/col calculation.
    pub source: String,

    /// Position of the error in the source.
    pub span: StringSpan,
}
impl ErrorContext {
    /// Creates a new `ErrorContext` with the given source, and span.
    #[must_use]
    pub fn new(source: &str, span: StrSpan) -> Self {
        Self {
            path: None,
            source: source.to_string(),
            span: span.into(),
        }
    }

    /// Returns the row and column of the error in the source.
    #[must_use]
    pub fn position(&self) -> (usize, usize) {
        self.span.position(&self.source)
    }
}
impl std::fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let path = self.path.as_ref().map(|p| p.display());

        let span = self.span.as_str();
        let line = span.split('\n').next().unwrap_or(span);

        if !line.is_empty() {
            writeln!(f, "| {line}")?;
        }

        if self.span.start() > 0 {
            let (row, col) = self.position();
            write!(f, "= At ")?;

            if let Some(path) = path {
                write!(f, "{path}:")?;
            }

            writeln!(f, "{row}:{col}")?;
        } else if let Some(path) = path {
            writeln!(f, "= In {path}")?;
        }
        Ok(())
    }
}

/// Return early with a `MenuError` located in `src`.
///
/// - `bail!(src, span, kind)` points at `span`
/// - `bail!(src, span, msg = "...", args..)` raises a malformed document error
macro_rules! bail {
    ($src:expr, $span:expr, msg = $($fmt:tt)+) => {
        return Err($crate::error::MenuError::new(
            $crate::error::MenuErrorKind::MalformedDocument(format!($($fmt)+)),
            $crate::error::ErrorContext::new($src, $span.into()),
        ))
    };
    ($src:expr, $span:expr, $kind:expr) => {
        return Err($crate::error::MenuError::new(
            $kind,
            $crate::error::ErrorContext::new($src, $span.into()),
        ))
    };
}
pub(crate) use bail;
