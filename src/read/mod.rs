pub mod block_reader;
pub mod boolean_rle_reader;
pub mod byte_rle_reader;

pub use block_reader::CompressedBlockReader;
pub use boolean_rle_reader::BooleanRleReader;
pub use byte_rle_reader::ByteRleReader;
