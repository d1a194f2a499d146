//! Core library for subfeed
//!
//! This crate implements the **Functional Core** of the subfeed application,
//! following the Functional Core - Imperative Shell architectural pattern.
//!
//! # Architecture Overview
//!
//! - **`subfeed_core`** (this crate): Pure transformation functions with zero I/O
//! - **`subfeed`**: HTTP calls, the refresh loop and terminal rendering (the Imperative Shell)
//!
//! All functions in this crate are pure: the same listing payload and
//! configuration always produce the same posts, and they can be tested with
//! fixture data, no mocking required.
//!
//! # Module Organization
//!
//! - [`reddit`]: Configuration, request construction, token response parsing and
//!   listing normalization for the Reddit API
//! - [`engagement`]: Pluggable engagement scoring and ranking of a post batch
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use subfeed_core::reddit::listing::{parse_listing, NormalizeOptions};
//!
//! let options = NormalizeOptions {
//!     subreddit: "rust",
//!     comments_url_template: "",
//!     show_flairs: true,
//! };
//!
//! // Transform a fixture payload (no HTTP required)
//! let posts = parse_listing(include_str!("listing.json"), &options)?;
//! assert!(posts.iter().all(|p| !p.discussion_url.is_empty()));
//! ```

pub mod engagement;
pub mod reddit;
