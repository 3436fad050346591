pub mod candidate;
pub mod duration;
pub mod filters;
pub mod ranking;

pub use candidate::VideoCandidate;
pub use filters::{DateBucket, SearchFilters, SearchOrder};
