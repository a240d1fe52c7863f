pub mod error;
pub mod fetcher;
pub mod generic_rss;
pub mod normalize;
pub mod pr_wire;
pub mod registry;
pub mod sec_edgar;

pub use error::FeedError;
pub use fetcher::{fetch_with_timeout, FeedFetcher};
pub use generic_rss::GenericRssFetcher;
pub use normalize::{fallback_canonical_id, normalize_link, normalize_title};
pub use pr_wire::PrWireFetcher;
pub use registry::{FetchOutcome, FetcherRegistry};
pub use sec_edgar::SecEdgarFetcher;
