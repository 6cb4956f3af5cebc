pub mod store;
pub mod types;

pub use store::{MemoryStore, ScrapeStore, StoreError};
pub use types::{movie_key, tv_key, ContentType, RequestStatus, ScrapedResult};
