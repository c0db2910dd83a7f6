//! sitenav Core Library
//!
//! Navigation model, configuration, routing and error handling for the
//! sitenav documentation toolchain.

pub mod config;
pub mod error;
pub mod frontmatter;
pub mod nav;
pub mod route;

pub use config::{Config, SiteConfig, ThemeConfig};
pub use error::{CoreError, Result};
pub use frontmatter::Frontmatter;
pub use nav::{LinkOrigin, NavGroup, NavLink, PrevNext, ResolvedSidebar, SidebarMap, SocialLink};
