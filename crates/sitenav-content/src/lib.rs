//! sitenav Content Library
//!
//! Walks the content directory and extracts what the navigation checks and
//! renderers need from each Markdown document.
//!
//! # Modules
//!
//! - [`markdown`] - Title, heading and link extraction from Markdown bodies
//! - [`collector`] - Content tree collection

pub mod collector;
pub mod markdown;

pub use collector::{CollectionProblem, CollectorError, ContentCollector, ContentTree, Document};
pub use markdown::{DocLink, Heading, MarkdownScan, scan_markdown, slugify};
