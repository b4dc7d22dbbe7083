pub mod error;
pub mod migrate;
pub mod model;
pub mod snapshot;
pub mod tracing_ext;

mod file_util;
