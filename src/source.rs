//! Provides the asset source abstraction the import pipeline reads through.
//!
//! Every descriptor and texture read goes through [`AssetSource::fetch`],
//! which returns a boxed future. Futures are not `Send`: the pipeline runs on
//! a single-threaded executor, so providers are free to hold `Rc` state.
//!
//! Two providers ship with the crate:
//! - [`MemorySource`] for tests and embedded assets
//! - [`DirectorySource`] for an unpacked asset folder on disk
//!
//! Archive-backed or network providers implement the trait in the host.
//!
//! # Examples
//! ```
//! use legends_import::source::{normalize, MemorySource};
//!
//! let source = MemorySource::new();
//! source.insert("models/entity/pig.model.json", b"{}".to_vec());
//! assert_eq!(normalize("./models//entity/pig.model.json").unwrap(), "models/entity/pig.model.json");
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::rc::Rc;

use thiserror::Error;

/// A boxed, single-threaded future returning a source `Result`.
pub type SourceFuture<T> = Pin<Box<dyn Future<Output = Result<T, SourceError>>>>;

/// Errors raised by asset sources.
///
/// # Examples
/// ```
/// use legends_import::source::SourceError;
///
/// let err = SourceError::NotFound("a.png".to_string());
/// assert_eq!(err.to_string(), "not found: a.png");
/// ```
#[derive(Debug, Error)]
pub enum SourceError {
    /// No asset exists at the logical path.
    #[error("not found: {0}")]
    NotFound(String),
    /// The logical path is empty or escapes the source root.
    #[error("invalid path: {0}")]
    InvalidPath(String),
    /// The underlying storage failed.
    #[error("IO error: {0}")]
    Io(std::io::Error),
}

impl SourceError {
    /// Maps an I/O error raised while reading `path`.
    ///
    /// # Examples
    /// ```
    /// use std::io::{Error, ErrorKind};
    ///
    /// use legends_import::source::SourceError;
    ///
    /// let err = SourceError::from_io(Error::from(ErrorKind::NotFound), "textures/pig.png");
    /// assert_eq!(err.to_string(), "not found: textures/pig.png");
    /// ```
    pub fn from_io(err: std::io::Error, path: impl Into<String>) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            SourceError::NotFound(path.into())
        } else {
            SourceError::Io(err)
        }
    }
}

/// Resolves logical asset paths to bytes.
///
/// Paths are forward-slash separated and relative to the source root, e.g.
/// `materials/meta_materials/pig_body.json`.
pub trait AssetSource {
    /// Reads the full contents of the asset at `path`.
    fn fetch(&self, path: &str) -> SourceFuture<Vec<u8>>;
}

impl<S: AssetSource + ?Sized> AssetSource for Rc<S> {
    fn fetch(&self, path: &str) -> SourceFuture<Vec<u8>> {
        (**self).fetch(path)
    }
}

/// Normalizes a logical asset path.
///
/// Backslashes become forward slashes, empty and `.` segments are dropped,
/// and `..` segments are rejected.
///
/// # Errors
/// Returns [`SourceError::InvalidPath`] for empty paths or path traversal.
///
/// # Examples
/// ```
/// use legends_import::source::normalize;
///
/// assert_eq!(normalize("textures\\pig.png").unwrap(), "textures/pig.png");
/// assert!(normalize("../secret").is_err());
/// ```
pub fn normalize(path: &str) -> Result<String, SourceError> {
    let replaced = path.replace('\\', "/");
    let mut segments = Vec::new();

    for segment in replaced.split('/') {
        if segment.is_empty() || segment == "." {
            continue;
        }
        if segment == ".." {
            return Err(SourceError::InvalidPath(format!(
                "path traversal not allowed: {path}"
            )));
        }
        segments.push(segment);
    }

    if segments.is_empty() {
        return Err(SourceError::InvalidPath("empty path".to_string()));
    }

    Ok(segments.join("/"))
}

/// In-memory asset source.
///
/// Cloning shares the same storage, so assets inserted after the source was
/// handed to a resolver are still visible to it.
///
/// # Examples
/// ```
/// use legends_import::source::MemorySource;
///
/// let source = MemorySource::new();
/// source.insert("a.json", b"{}".to_vec());
/// assert!(source.contains("a.json"));
/// assert_eq!(source.len(), 1);
/// ```
#[derive(Clone, Default)]
pub struct MemorySource {
    files: Rc<RefCell<HashMap<String, Vec<u8>>>>,
}

impl MemorySource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the asset at `path`.
    pub fn insert(&self, path: impl Into<String>, data: Vec<u8>) {
        self.files.borrow_mut().insert(path.into(), data);
    }

    /// Removes the asset at `path`, returning its bytes if present.
    pub fn remove(&self, path: &str) -> Option<Vec<u8>> {
        self.files.borrow_mut().remove(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.borrow().contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.files.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.borrow().is_empty()
    }
}

impl AssetSource for MemorySource {
    fn fetch(&self, path: &str) -> SourceFuture<Vec<u8>> {
        let files = self.files.clone();
        let path = normalize(path);
        Box::pin(async move {
            let path = path?;
            let map = files.borrow();
            map.get(&path).cloned().ok_or(SourceError::NotFound(path))
        })
    }
}

/// Asset source rooted at a directory on disk.
///
/// Reads are blocking `std::fs` calls inside the returned future. Errors
/// name the logical path, not the location on disk.
///
/// # Examples
/// ```no_run
/// use legends_import::source::DirectorySource;
///
/// let source = DirectorySource::new("./resource_packs/legends");
/// let _ = source.root();
/// ```
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    /// Creates a source rooted at `root`. The directory is checked lazily.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }
}

impl AssetSource for DirectorySource {
    fn fetch(&self, path: &str) -> SourceFuture<Vec<u8>> {
        let logical = normalize(path);
        let root = self.root.clone();
        Box::pin(async move {
            let logical = logical?;
            std::fs::read(root.join(&logical)).map_err(|e| SourceError::from_io(e, logical))
        })
    }
}
