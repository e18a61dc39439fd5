pub mod model;

pub use model::{LoggingConfig, StreamSettings};
