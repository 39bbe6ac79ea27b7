//! Market data admission: validated, merged event streams.

mod source;

pub use source::MarketEventSource;
