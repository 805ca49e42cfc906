//! Service layer wiring stdin/stdout to the filter.

mod adapter;
mod filter_service;

pub use filter_service::FilterService;
