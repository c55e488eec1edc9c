//! Resolving resource paths to document text.
use std::{
    collections::HashMap,
    io::Read,
    path::{Path, PathBuf},
};

/// Opens resources by path, relative to some base context.
pub trait ResourceLocator {
    /// Open a reader over the resource at `path`.
    ///
    /// # Errors
    /// Returns an error if the resource does not exist or cannot be opened.
    fn open(&self, path: &Path) -> std::io::Result<Box<dyn Read + '_>>;

    /// A displayable location for error messages.
    fn describe(&self, path: &Path) -> PathBuf {
        path.to_path_buf()
    }
}

/// Resolves paths against a base directory on disk.
///
/// A leading `/` is stripped, so `"/menus.xml"` and `"menus.xml"` both refer to
/// a file directly inside the base directory.
#[derive(Debug, Clone)]
pub struct DirectoryLocator {
    base: PathBuf,
}
impl DirectoryLocator {
    /// Creates a locator rooted at `base`.
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// The base directory.
    #[must_use]
    pub fn base(&self) -> &Path {
        &self.base
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        let relative = path.strip_prefix("/").unwrap_or(path);
        self.base.join(relative)
    }
}
impl ResourceLocator for DirectoryLocator {
    fn open(&self, path: &Path) -> std::io::Result<Box<dyn Read + '_>> {
        let file = std::fs::File::open(self.resolve(path))?;
        Ok(Box::new(std::io::BufReader::new(file)))
    }

    fn describe(&self, path: &Path) -> PathBuf {
        self.resolve(path)
    }
}

/// Serves documents held in memory, such as those embedded with `include_str!`.
#[derive(Debug, Clone, Default)]
pub struct MemoryLocator {
    documents: HashMap<PathBuf, String>,
}
impl MemoryLocator {
    /// Creates an empty locator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a document under the given path.
    #[must_use]
    pub fn with_document(mut self, path: impl Into<PathBuf>, source: impl Into<String>) -> Self {
        self.insert(path, source);
        self
    }

    /// Adds or replaces a document under the given path.
    pub fn insert(&mut self, path: impl Into<PathBuf>, source: impl Into<String>) {
        self.documents.insert(path.into(), source.into());
    }
}
impl ResourceLocator for MemoryLocator {
    fn open(&self, path: &Path) -> std::io::Result<Box<dyn Read + '_>> {
        let Some(source) = self.documents.get(path) else {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("No document registered at {}", path.display()),
            ));
        };

        Ok(Box::new(source.as_bytes()))
    }
}

impl<L: ResourceLocator + ?Sized> ResourceLocator for &L {
    fn open(&self, path: &Path) -> std::io::Result<Box<dyn Read + '_>> {
        (**self).open(path)
    }

    fn describe(&self, path: &Path) -> PathBuf {
        (**self).describe(path)
    }
}
