//! linktree-scraper: Linktree profile scraping
//!
//! Pulls the account and its links out of a profile page's embedded
//! `__NEXT_DATA__` JSON, unlocking links hidden behind the sensitive-content
//! gate with one extra request.

pub mod client;
pub mod error;
pub mod fetch;
pub mod links;
pub mod output;
pub mod profile;
pub mod schema;

pub use client::{Linktree, LinktreeConfig, Target};
pub use error::{LinktreeError, Result};
pub use links::{partition_links, GateIds, Partition};
pub use schema::{Link, LinktreeUser, PageProps, RawLink};
