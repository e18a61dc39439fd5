/// Position inside a `CompressedOutputBuffer`: bytes of framed output already
/// emitted, plus bytes sitting in the block that has not been flushed yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BufferCheckpoint {
    pub compressed_offset: u64,
    pub uncompressed_offset: u64,
}

/// Resume point for the byte-RLE decoder. `pending_bytes` counts logical
/// bytes that were still held in the encoder's sequence buffer when the
/// checkpoint was taken; a reader seeks `buffer` and then decodes and
/// discards that many bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ByteRleCheckpoint {
    pub buffer: BufferCheckpoint,
    pub pending_bytes: u64,
}

/// Resume point for the boolean decoder: a byte-level checkpoint plus the
/// number of bits already consumed from the byte that follows it (0..=7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BooleanRleCheckpoint {
    pub byte: ByteRleCheckpoint,
    pub offset_in_bit: u8,
}
