//! TuneSeek network layer
//!
//! Outbound HTTP for the resolution engine:
//! - Client construction (user agent, timeout, proxy, TLS policy)
//! - Single-attempt page fetching behind the [`Fetch`] trait
//! - Image relay for hotlinked artwork

pub mod client;
pub mod fetcher;
pub mod relay;

pub use client::*;
pub use fetcher::*;
pub use relay::*;

pub use reqwest::Url;
