mod fix_cache;
mod position_cache;

pub use fix_cache::{CacheMiss, CachePolicy, CachedFix, FixCache, LastLiveFix};
pub use position_cache::PositionCache;
