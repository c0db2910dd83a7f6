//! sitenav Render Library
//!
//! Turns the navigation model into what an external page renderer consumes.
//!
//! # Modules
//!
//! - [`template`] - Small template system with variable interpolation
//! - [`html`] - Nav bar, sidebar and doc footer HTML fragments
//! - [`manifest`] - JSON navigation manifest
//! - [`build`] - Build orchestration

pub mod build;
pub mod html;
pub mod manifest;
pub mod template;

pub use build::{BuildError, BuildStats, Builder};
pub use html::{HtmlError, NavRenderer, format_timestamp};
pub use manifest::{Manifest, ManifestError, PageEntry, SiteData};
pub use template::{Template, TemplateContext, TemplateRegistry};
