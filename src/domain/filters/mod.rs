//! Event filters.

mod filter_trait;
mod retry_filter;

pub use filter_trait::Filter;
pub use retry_filter::RetryOccurrencesFilter;
#[allow(unused_imports)]
pub use retry_filter::{FILTER_DESCRIPTION, FILTER_NAME};
