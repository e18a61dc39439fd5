use serde::Deserialize;

use crate::errors::CodecError;

use lz4_flex::block::{
    compress_prepend_size as lz4_compress, decompress_size_prepended as lz4_decompress,
};

/// Zstd level used for column streams. Kept low: blocks are small and the
/// writer sits on the ingest path.
const ZSTD_LEVEL: i32 = 3;

/// Compression applied to column stream blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionKind {
    #[default]
    None,
    Lz4,
    Zstd,
}

/// A block codec. Codecs are stateless; one instance may serve any number of
/// streams concurrently.
pub trait CompressionCodec {
    fn kind(&self) -> CompressionKind;
    fn compress(&self, input: &[u8]) -> Result<Vec<u8>, CodecError>;
    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>, CodecError>;
}

pub fn codec_for(kind: CompressionKind) -> Box<dyn CompressionCodec> {
    match kind {
        CompressionKind::None => Box::new(NoneCodec),
        CompressionKind::Lz4 => Box::new(Lz4Codec),
        CompressionKind::Zstd => Box::new(ZstdCodec),
    }
}

pub struct NoneCodec;

impl CompressionCodec for NoneCodec {
    fn kind(&self) -> CompressionKind {
        CompressionKind::None
    }
    fn compress(&self, input: &[u8]) -> Result<Vec<u8>, CodecError> {
        Ok(input.to_vec())
    }
    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>, CodecError> {
        Ok(input.to_vec())
    }
}

pub struct Lz4Codec;

impl CompressionCodec for Lz4Codec {
    fn kind(&self) -> CompressionKind {
        CompressionKind::Lz4
    }
    fn compress(&self, input: &[u8]) -> Result<Vec<u8>, CodecError> {
        Ok(lz4_compress(input))
    }
    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>, CodecError> {
        lz4_decompress(input).map_err(|e| CodecError::Lz4(e.to_string()))
    }
}

pub struct ZstdCodec;

impl CompressionCodec for ZstdCodec {
    fn kind(&self) -> CompressionKind {
        CompressionKind::Zstd
    }
    fn compress(&self, input: &[u8]) -> Result<Vec<u8>, CodecError> {
        zstd::stream::encode_all(input, ZSTD_LEVEL).map_err(|e| CodecError::Zstd(e.to_string()))
    }
    fn decompress(&self, input: &[u8]) -> Result<Vec<u8>, CodecError> {
        zstd::stream::decode_all(input).map_err(|e| CodecError::Zstd(e.to_string()))
    }
}
