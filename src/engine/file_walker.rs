//! File discovery under a migration root
//!
//! Walks the root lazily with the `ignore` crate. Directories whose name is
//! listed in the filter's exclusions are pruned together with everything
//! below them; remaining files are yielded when their extension is included.
//! `.git` directories are always pruned, and individual files (such as the
//! configuration file itself) can be left out of a walk.
//! Symbolic links are neither followed nor yielded, since an atomic rename
//! would replace the link with a regular file.

use crate::error::DiscoveryError;
use crate::types::RelPath;
use ignore::{DirEntry, WalkBuilder};
use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Directory names pruned from every walk
const ALWAYS_PRUNED: &[&str] = &[".git"];

/// Inclusion and exclusion policy for a walk
///
/// Directory exclusion matches whole path segments: excluding `build`
/// prunes `lib/build/` but not `lib/rebuild/`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraversalFilter {
    include_extensions: BTreeSet<String>,
    exclude_dir_names: BTreeSet<String>,
    skip_files: BTreeSet<PathBuf>,
    respect_gitignore: bool,
}

impl TraversalFilter {
    /// Creates a filter that includes every file and excludes nothing
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a filter from configuration lists
    pub fn from_lists<E, D>(extensions: E, exclude_dirs: D) -> Self
    where
        E: IntoIterator,
        E::Item: AsRef<str>,
        D: IntoIterator,
        D::Item: AsRef<str>,
    {
        let filter = extensions
            .into_iter()
            .fold(Self::new(), |f, ext| f.include_extension(ext.as_ref()));
        exclude_dirs
            .into_iter()
            .fold(filter, |f, dir| f.exclude_dir(dir.as_ref()))
    }

    /// Include files with this extension; a leading dot is ignored
    pub fn include_extension(mut self, ext: &str) -> Self {
        let ext = ext.trim_start_matches('.');
        if !ext.is_empty() {
            self.include_extensions.insert(ext.to_string());
        }
        self
    }

    /// Prune directories with exactly this name
    pub fn exclude_dir(mut self, name: &str) -> Self {
        let name = name.trim_matches(|c| c == '/' || c == '\\');
        if !name.is_empty() {
            self.exclude_dir_names.insert(name.to_string());
        }
        self
    }

    /// Never yield this file, wherever it sits under the root
    ///
    /// Paths are compared after canonicalization, so `path` does not need
    /// to be spelled the way the walk reaches it.
    pub fn skip_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.skip_files.insert(path.into());
        self
    }

    /// Honor `.gitignore` files found during the walk
    pub fn respect_gitignore(mut self, enabled: bool) -> Self {
        self.respect_gitignore = enabled;
        self
    }

    /// Included extensions (empty means every file)
    pub fn include_extensions(&self) -> &BTreeSet<String> {
        &self.include_extensions
    }

    /// Excluded directory names
    pub fn exclude_dir_names(&self) -> &BTreeSet<String> {
        &self.exclude_dir_names
    }

    /// Files left out of the walk
    pub fn skip_files(&self) -> &BTreeSet<PathBuf> {
        &self.skip_files
    }

    /// Check if a file path passes the extension filter
    pub fn includes_file(&self, path: &Path) -> bool {
        if self.include_extensions.is_empty() {
            return true;
        }
        path.extension()
            .and_then(OsStr::to_str)
            .is_some_and(|ext| self.include_extensions.contains(ext))
    }

    /// Check if a directory name is excluded
    pub fn excludes_dir(&self, name: &OsStr) -> bool {
        name.to_str().is_some_and(|name| {
            ALWAYS_PRUNED.contains(&name) || self.exclude_dir_names.contains(name)
        })
    }
}

/// Reason why a walked entry was not yielded as a file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Extension is not in the include set
    ExtensionNotIncluded,
    /// Entry is a directory, symlink or special file
    NotAFile,
    /// File was explicitly left out of the walk
    SkipListed,
}

/// Result of file walking - either a file to rewrite or a skipped entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkResult {
    /// File to be rewritten
    File(FileEntry),
    /// Entry that was skipped with reason
    Skipped { path: PathBuf, reason: SkipReason },
}

/// A discovered file
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct FileEntry {
    /// Path used for reading and writing
    pub path: PathBuf,
    /// Path relative to the walk root, used for scope matching and reports
    pub relative: RelPath,
}

impl FileEntry {
    /// Creates an entry for `path`, computing its path relative to `root`
    pub fn new(root: &Path, path: PathBuf) -> Self {
        let relative = RelPath::relative_to(root, &path);
        Self { path, relative }
    }
}

/// Lazy walker over the files under a root
pub struct FileWalker {
    root: PathBuf,
    walker: ignore::Walk,
    filter: TraversalFilter,
    skipped: BTreeSet<RelPath>,
}

impl std::fmt::Debug for FileWalker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileWalker")
            .field("root", &self.root)
            .field("filter", &self.filter)
            .field("skipped", &self.skipped)
            .finish()
    }
}

impl FileWalker {
    /// Creates a walker over `root`
    ///
    /// # Errors
    ///
    /// Returns `DiscoveryError` if the root does not exist, is not a
    /// directory, or cannot be listed. Nothing is yielded in that case.
    pub fn new(root: &Path, filter: TraversalFilter) -> Result<Self, DiscoveryError> {
        let metadata = fs::metadata(root).map_err(|e| match e.kind() {
            ErrorKind::NotFound => DiscoveryError::RootNotFound(root.to_path_buf()),
            _ => DiscoveryError::Unreadable {
                path: root.to_path_buf(),
                source: e,
            },
        })?;

        if !metadata.is_dir() {
            return Err(DiscoveryError::NotADirectory(root.to_path_buf()));
        }

        fs::read_dir(root).map_err(|e| DiscoveryError::Unreadable {
            path: root.to_path_buf(),
            source: e,
        })?;

        let skipped = skip_list(root, &filter);
        let pruning = Arc::new(filter.clone());

        let mut builder = WalkBuilder::new(root);
        builder
            .standard_filters(false)
            .hidden(false)
            .follow_links(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .filter_entry(move |entry| !is_pruned(entry, &pruning));

        if filter.respect_gitignore {
            builder.git_ignore(true).git_exclude(true).require_git(false);
        }

        Ok(Self {
            root: root.to_path_buf(),
            walker: builder.build(),
            filter,
            skipped,
        })
    }

    /// Root directory of the walk
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walks the tree, yielding matching files and walk errors
    pub fn walk(self) -> impl Iterator<Item = Result<FileEntry, DiscoveryError>> {
        self.walk_with_skip_info()
            .filter_map(|result| match result {
                Ok(WalkResult::File(file)) => Some(Ok(file)),
                Ok(WalkResult::Skipped { path, reason }) => {
                    tracing::trace!(path = %path.display(), ?reason, "skipped");
                    None
                }
                Err(e) => Some(Err(e)),
            })
    }

    /// Walks the tree, also reporting entries that were skipped
    pub fn walk_with_skip_info(self) -> impl Iterator<Item = Result<WalkResult, DiscoveryError>> {
        let root = self.root;
        let filter = self.filter;
        let skipped = self.skipped;

        self.walker.map(move |result| {
            let entry = result.map_err(|e| DiscoveryError::Walk {
                path: error_path(&e),
                source: e,
            })?;

            let path = entry.path();
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                return Ok(WalkResult::Skipped {
                    path: path.to_path_buf(),
                    reason: SkipReason::NotAFile,
                });
            }

            if !filter.includes_file(path) {
                return Ok(WalkResult::Skipped {
                    path: path.to_path_buf(),
                    reason: SkipReason::ExtensionNotIncluded,
                });
            }

            let file = FileEntry::new(&root, path.to_path_buf());
            if skipped.contains(&file.relative) {
                return Ok(WalkResult::Skipped {
                    path: file.path,
                    reason: SkipReason::SkipListed,
                });
            }

            Ok(WalkResult::File(file))
        })
    }
}

/// Root-relative paths of the filter's skipped files that live under `root`
///
/// Files that do not exist cannot be walked and are dropped here.
fn skip_list(root: &Path, filter: &TraversalFilter) -> BTreeSet<RelPath> {
    let Ok(canonical_root) = fs::canonicalize(root) else {
        return BTreeSet::new();
    };
    filter
        .skip_files
        .iter()
        .filter_map(|path| fs::canonicalize(path).ok())
        .filter_map(|path| {
            path.strip_prefix(&canonical_root)
                .ok()
                .map(|rel| RelPath::new(rel.to_string_lossy().into_owned()))
        })
        .collect()
}

/// The root itself is never pruned, even if its own name is excluded
fn is_pruned(entry: &DirEntry, filter: &TraversalFilter) -> bool {
    entry.depth() > 0
        && entry.file_type().is_some_and(|ft| ft.is_dir())
        && filter.excludes_dir(entry.file_name())
}

/// Dig the offending path out of an `ignore` error, if it carries one
fn error_path(err: &ignore::Error) -> Option<PathBuf> {
    match err {
        ignore::Error::WithPath { path, .. } => Some(path.clone()),
        ignore::Error::WithDepth { err, .. } | ignore::Error::WithLineNumber { err, .. } => {
            error_path(err)
        }
        ignore::Error::Loop { child, .. } => Some(child.clone()),
        ignore::Error::Partial(errs) => errs.iter().find_map(error_path),
        _ => None,
    }
}
