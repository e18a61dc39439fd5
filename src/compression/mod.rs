pub mod codec;

pub use codec::{CompressionCodec, CompressionKind, Lz4Codec, NoneCodec, ZstdCodec, codec_for};
