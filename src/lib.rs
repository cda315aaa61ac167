#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod catalog;
pub mod config;
pub mod contacts;
pub mod error;
pub mod logger;
pub mod pages;
pub mod repair;
pub mod rewriter;
pub mod runner;

pub use catalog::{Catalog, ImageFile};
pub use config::SiteConfig;
pub use error::ConfigError;
pub use repair::{LinkRepairer, RepairOutcome};
pub use rewriter::{FileRewriter, RewriteOutcome};
