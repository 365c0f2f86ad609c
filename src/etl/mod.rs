//! Stage abstractions for the sync pipeline
//!
//! A run extracts one dataset, transforms it, and loads the result to a
//! destination. Every stage runs to completion before the next starts.

mod extract;
mod load;
mod pipeline;
mod transform;

pub use extract::Extractor;
pub use load::Loader;
pub use pipeline::Pipeline;
pub use transform::Transformer;
