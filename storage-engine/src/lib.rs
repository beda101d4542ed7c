mod moka_cache;

pub use moka_cache::{CacheEntry, Cached, TtlCache};
