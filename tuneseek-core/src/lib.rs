//! TuneSeek Core - domain model for cross-platform metadata resolution
//!
//! This crate provides the foundational primitives:
//! - Metadata records emitted by the extractors
//! - Platform catalog types and the platform registry
//! - Text/URL normalization helpers
//! - A generic JSON tree visitor for extractors that read embedded JSON

pub mod metadata;
pub mod normalize;
pub mod platforms;
pub mod tree;

pub use metadata::*;
pub use platforms::*;

/// Origin used to complete relative YouTube links
pub const YOUTUBE_ORIGIN: &str = "https://www.youtube.com";

/// Origin used to complete relative NicoVideo links
pub const NICOVIDEO_ORIGIN: &str = "https://www.nicovideo.jp";

/// Origin used to complete relative Bilibili links
pub const BILIBILI_ORIGIN: &str = "https://www.bilibili.com";

/// Origin used to complete relative Amazon links
pub const AMAZON_ORIGIN: &str = "https://www.amazon.co.jp";
