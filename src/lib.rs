//! Extract per-depth amplitude and per-trace dominant-frequency features from
//! SEG-Y surveys into one CSV table per file.

pub mod batch;
pub mod data;
pub mod error;
pub mod export;
pub mod features;
pub mod pipeline;

pub use batch::{BatchOptions, BatchReport};
pub use error::ExtractError;
pub use pipeline::extract;
