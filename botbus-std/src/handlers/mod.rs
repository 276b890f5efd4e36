//! Standard handler implementations.

pub mod filter;
pub mod logging;

pub use filter::KindFilter;
pub use logging::LoggingHandler;
