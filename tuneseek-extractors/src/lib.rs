//! TuneSeek Extractors
//!
//! Purpose-built parsers, one per supported platform:
//! - **YouTube**: embedded `ytInitialData` JSON, walked at any depth
//! - **NicoVideo**: DOM list items, artist inferred from title conventions
//! - **Bilibili**: DOM video cards with protocol-relative links
//! - **Amazon**: DOM result rows keyed by `data-asin`
//!
//! Every extractor is a pure function of the page content.

pub mod amazon;
pub mod bilibili;
mod dom;
pub mod inference;
pub mod nicovideo;
pub mod traits;
pub mod youtube;

pub use amazon::*;
pub use bilibili::*;
pub use nicovideo::*;
pub use traits::*;
pub use youtube::*;
