pub mod boolean_rle;
pub mod byte_rle;
pub mod checkpoint;
pub mod descriptor;
pub mod output_buffer;
pub mod presence;

pub use boolean_rle::BooleanRleStream;
pub use byte_rle::ByteRleStream;
pub use checkpoint::{BooleanRleCheckpoint, BufferCheckpoint, ByteRleCheckpoint};
pub use descriptor::{ColumnId, StreamDataOutput, StreamDescriptor, StreamKind};
pub use output_buffer::{CompressedOutputBuffer, DEFAULT_BLOCK_SIZE, MAX_BLOCK_SIZE};
pub use presence::PresenceStream;

#[cfg(test)]
mod boolean_rle_test;
#[cfg(test)]
mod byte_rle_test;
