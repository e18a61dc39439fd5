pub mod compression;
pub mod errors;
pub mod logging;
pub mod read;
pub mod shared;
pub mod stream;
