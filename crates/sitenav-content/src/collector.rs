//! Content collection.
//!
//! Walks the content directory and collects every Markdown document into a
//! route-indexed tree.

use std::{
    collections::{BTreeMap, HashMap},
    fs,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use sitenav_core::{
    CoreError, Frontmatter,
    frontmatter::parse_frontmatter,
    route::{document_candidates, route_for_document, route_has_prefix},
};
use thiserror::Error;
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::markdown::{DocLink, Heading, scan_markdown};

/// Content collection errors.
#[derive(Debug, Error)]
pub enum CollectorError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory traversal error.
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// The content directory does not exist.
    #[error("content directory not found: {0}")]
    MissingDir(PathBuf),
}

/// Result type for collector operations.
pub type Result<T> = std::result::Result<T, CollectorError>;

/// A collected Markdown document.
#[derive(Debug, Clone)]
pub struct Document {
    /// Path relative to the content directory, `/`-separated.
    pub path: String,

    /// Route the document is served at.
    pub route: String,

    /// Display title.
    pub title: String,

    /// Parsed frontmatter.
    pub frontmatter: Frontmatter,

    /// Headings in document order.
    pub headings: Vec<Heading>,

    /// Links in the body, in document order.
    pub links: Vec<DocLink>,

    /// File modification time.
    pub last_modified: Option<DateTime<Utc>>,
}

impl Document {
    /// Whether this is a directory index (`index.md`).
    pub fn is_index(&self) -> bool {
        self.route.ends_with('/')
    }

    /// Parse a document from its content-relative path and source text.
    pub fn parse(path: &str, source: &str) -> sitenav_core::Result<Self> {
        let relative = Path::new(path);
        let route = route_for_document(relative).ok_or_else(|| CoreError::NotMarkdown {
            path: relative.to_path_buf(),
        })?;

        let (frontmatter, body) = parse_frontmatter(source, relative)?;
        let mut scan = scan_markdown(body);

        // link lines are counted from the body; report them as file lines
        let skipped = source
            .get(..source.len() - body.len())
            .map_or(0, |head| head.matches('\n').count());
        for link in &mut scan.links {
            link.line += skipped;
        }

        let title = frontmatter
            .title
            .clone()
            .filter(|t| !t.trim().is_empty())
            .or(scan.title)
            .unwrap_or_else(|| fallback_title(relative));

        Ok(Self {
            path: path.to_string(),
            route,
            title,
            frontmatter,
            headings: scan.headings,
            links: scan.links,
            last_modified: None,
        })
    }
}

/// Title derived from the file name: `net/tcp-overhead.md` → `tcp overhead`,
/// `net/index.md` → `net`.
fn fallback_title(relative: &Path) -> String {
    let stem = relative
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("untitled");

    let name = if stem == "index" {
        relative
            .parent()
            .and_then(|p| p.file_name())
            .and_then(|s| s.to_str())
            .unwrap_or("index")
    } else {
        stem
    };

    name.replace(['-', '_'], " ")
}

/// A file that could not be collected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionProblem {
    /// Path relative to the content directory.
    pub path: String,

    /// What went wrong.
    pub message: String,
}

/// Collected content, indexed by route.
#[derive(Debug, Default)]
pub struct ContentTree {
    documents: BTreeMap<String, Document>,
    by_path: HashMap<String, String>,
    problems: Vec<CollectionProblem>,
}

impl ContentTree {
    /// Build a tree from already parsed documents.
    pub fn from_documents(documents: impl IntoIterator<Item = Document>) -> Self {
        let mut tree = Self::default();
        for doc in documents {
            tree.insert(doc);
        }
        tree
    }

    fn insert(&mut self, doc: Document) {
        self.by_path.insert(path_key(&doc.path), doc.route.clone());
        if let Some(previous) = self.documents.insert(doc.route.clone(), doc) {
            warn!(path = %previous.path, route = %previous.route, "route served by more than one file");
        }
    }

    /// Number of documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the tree has no documents.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Documents in route order.
    pub fn documents(&self) -> impl Iterator<Item = &Document> {
        self.documents.values()
    }

    /// Files that failed to collect.
    pub fn problems(&self) -> &[CollectionProblem] {
        &self.problems
    }

    /// Document backing a link or route, if any.
    pub fn lookup(&self, link: &str) -> Option<&Document> {
        document_candidates(link)
            .iter()
            .find_map(|candidate| self.by_path.get(candidate))
            .and_then(|route| self.documents.get(route))
    }

    /// Whether at least one document lives under a sidebar prefix.
    pub fn has_documents_under(&self, prefix: &str) -> bool {
        self.documents
            .keys()
            .any(|route| route_has_prefix(route, prefix))
    }
}

/// Lookup key of a content path; `Foo.MD` is found as `Foo.md`.
fn path_key(path: &str) -> String {
    match path.rsplit_once('.') {
        Some((stem, ext)) if ext.eq_ignore_ascii_case("md") => format!("{stem}.md"),
        _ => path.to_string(),
    }
}

/// Content collector that walks the content directory and parses documents.
#[derive(Debug)]
pub struct ContentCollector {
    content_dir: PathBuf,
    exclude: Vec<String>,
}

impl ContentCollector {
    /// Create a new content collector.
    #[must_use]
    pub fn new(content_dir: impl Into<PathBuf>) -> Self {
        Self {
            content_dir: content_dir.into(),
            exclude: Vec::new(),
        }
    }

    /// Skip directories with these names.
    #[must_use]
    pub fn with_exclude(mut self, exclude: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.exclude = exclude.into_iter().map(Into::into).collect();
        self
    }

    /// Collect all content from the content directory.
    pub fn collect(&self) -> Result<ContentTree> {
        if !self.content_dir.is_dir() {
            return Err(CollectorError::MissingDir(self.content_dir.clone()));
        }

        info!(dir = %self.content_dir.display(), "collecting content");

        let files = self.find_content_files()?;
        info!(count = files.len(), "found content files");

        let results: Vec<_> = files
            .par_iter()
            .map(|path| (path, self.collect_file(path)))
            .collect();

        let mut tree = ContentTree::default();
        for (path, result) in results {
            match result {
                Ok(doc) => {
                    debug!(route = %doc.route, title = %doc.title, "collected document");
                    tree.insert(doc);
                }
                Err(message) => {
                    warn!(path = %path.display(), error = %message, "failed to collect file");
                    tree.problems.push(CollectionProblem {
                        path: self.relative(path),
                        message,
                    });
                }
            }
        }

        tree.problems.sort_by(|a, b| a.path.cmp(&b.path));

        info!(
            documents = tree.len(),
            problems = tree.problems.len(),
            "content collection complete"
        );

        Ok(tree)
    }

    /// Find all Markdown files, sorted by path.
    fn find_content_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();

        let walker = WalkDir::new(&self.content_dir)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !self.is_skipped(entry));

        for entry in walker {
            let entry = entry?;
            if entry.file_type().is_file()
                && entry
                    .path()
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("md"))
            {
                files.push(entry.into_path());
            }
        }

        Ok(files)
    }

    /// Hidden entries and excluded directories are not collected.
    fn is_skipped(&self, entry: &DirEntry) -> bool {
        let name = entry.file_name().to_string_lossy();
        if name.starts_with('.') {
            return true;
        }
        entry.file_type().is_dir() && self.exclude.iter().any(|ex| *ex == name)
    }

    fn relative(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.content_dir).unwrap_or(path);
        relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }

    fn collect_file(&self, path: &Path) -> std::result::Result<Document, String> {
        let source = fs::read_to_string(path).map_err(|e| format!("failed to read file: {e}"))?;
        let mut doc = Document::parse(&self.relative(path), &source).map_err(|e| e.to_string())?;

        doc.last_modified = fs::metadata(path)
            .and_then(|meta| meta.modified())
            .ok()
            .map(DateTime::<Utc>::from);

        Ok(doc)
    }
}
