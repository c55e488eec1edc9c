/// A background fill for a menu, cycling through one to four colors.
///
/// Colors are host values resolved by name through [`crate::ColorLookup`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FillPattern<C> {
    /// One color everywhere
    Uni(C),

    /// Two alternating colors
    Bi(C, C),

    /// Three alternating colors
    Tri(C, C, C),

    /// Four alternating colors
    Quad(C, C, C, C),
}
impl<C> FillPattern<C> {
    /// Number of colors in the pattern.
    #[must_use]
    pub fn arity(&self) -> usize {
        match self {
            Self::Uni(..) => 1,
            Self::Bi(..) => 2,
            Self::Tri(..) => 3,
            Self::Quad(..) => 4,
        }
    }

    /// The colors in declaration order.
    #[must_use]
    pub fn colors(&self) -> Vec<&C> {
        match self {
            Self::Uni(a) => vec![a],
            Self::Bi(a, b) => vec![a, b],
            Self::Tri(a, b, c) => vec![a, b, c],
            Self::Quad(a, b, c, d) => vec![a, b, c, d],
        }
    }
}

/// A menu definition: a titled grid of `rows` rows with an optional fill.
#[derive(Debug, Clone, PartialEq)]
pub struct Menu<C> {
    title: String,
    rows: i32,
    fill: Option<FillPattern<C>>,
}
impl<C> Menu<C> {
    /// Creates an untitled single-row menu with no fill.
    #[must_use]
    pub fn new() -> Self {
        Self {
            title: String::new(),
            rows: 1,
            fill: None,
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// The host expects 1 to 6; no range check is made here.
    pub fn set_rows(&mut self, rows: i32) {
        self.rows = rows;
    }

    /// Replaces any previous fill.
    pub fn fill(&mut self, pattern: FillPattern<C>) {
        self.fill = Some(pattern);
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn rows(&self) -> i32 {
        self.rows
    }

    #[must_use]
    pub fn fill_pattern(&self) -> Option<&FillPattern<C>> {
        self.fill.as_ref()
    }
}
impl<C> Default for Menu<C> {
    fn default() -> Self {
        Self::new()
    }
}
