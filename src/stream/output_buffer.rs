use tracing::debug;

use crate::compression::{CompressionCodec, CompressionKind, codec_for};
use crate::errors::StreamError;
use crate::stream::checkpoint::BufferCheckpoint;

/// ORC chunk headers carry the block length in 23 bits.
pub const MAX_BLOCK_SIZE: usize = (1 << 23) - 1;

/// Default block size, matching the ORC writer default.
pub const DEFAULT_BLOCK_SIZE: usize = 256 * 1024;

const INSTANCE_SIZE: usize = std::mem::size_of::<CompressedOutputBuffer>();

/// Accumulates raw encoded bytes and flushes them through the codec one
/// fixed-size block at a time.
///
/// With a real codec every flushed block is framed with the 3-byte ORC chunk
/// header `(length << 1) | is_original`; a block that the codec fails to
/// shrink is stored raw with the original bit set. With `CompressionKind::None`
/// bytes pass through unframed.
pub struct CompressedOutputBuffer {
    kind: CompressionKind,
    codec: Box<dyn CompressionCodec>,
    block_size: usize,
    /// Uncompressed bytes of the block currently being filled.
    block: Vec<u8>,
    /// Framed output produced so far.
    output: Vec<u8>,
}

impl CompressedOutputBuffer {
    pub fn new(kind: CompressionKind, block_size: usize) -> Self {
        assert!(
            block_size > 0 && block_size <= MAX_BLOCK_SIZE,
            "block size must be within 1..={MAX_BLOCK_SIZE}"
        );
        Self {
            kind,
            codec: codec_for(kind),
            block_size,
            block: Vec::new(),
            output: Vec::new(),
        }
    }

    pub fn write_u8(&mut self, byte: u8) -> Result<(), StreamError> {
        self.block.push(byte);
        if self.block.len() == self.block_size {
            self.flush_block()?;
        }
        Ok(())
    }

    pub fn write_all(&mut self, mut bytes: &[u8]) -> Result<(), StreamError> {
        while !bytes.is_empty() {
            let room = self.block_size - self.block.len();
            let take = room.min(bytes.len());
            self.block.extend_from_slice(&bytes[..take]);
            bytes = &bytes[take..];
            if self.block.len() == self.block_size {
                self.flush_block()?;
            }
        }
        Ok(())
    }

    /// Current position, valid as a seek target once the stream is sealed.
    pub fn checkpoint(&self) -> BufferCheckpoint {
        BufferCheckpoint {
            compressed_offset: self.output.len() as u64,
            uncompressed_offset: self.block.len() as u64,
        }
    }

    /// Flushes the partial final block. The buffer stays writable; callers
    /// seal at a higher level.
    pub fn finish(&mut self) -> Result<(), StreamError> {
        self.flush_block()
    }

    pub fn output(&self) -> &[u8] {
        &self.output
    }

    /// Uncompressed bytes not yet pushed through the codec.
    pub fn buffered_bytes(&self) -> u64 {
        self.block.len() as u64
    }

    /// Total memory held, including framed output already produced.
    pub fn retained_bytes(&self) -> u64 {
        (INSTANCE_SIZE + self.block.capacity() + self.output.capacity()) as u64
    }

    /// Discards all content but keeps the backing allocations for reuse.
    pub fn reset(&mut self) {
        self.block.clear();
        self.output.clear();
    }

    fn flush_block(&mut self) -> Result<(), StreamError> {
        if self.block.is_empty() {
            return Ok(());
        }
        if self.kind == CompressionKind::None {
            self.output.extend_from_slice(&self.block);
            self.block.clear();
            return Ok(());
        }

        let compressed = self.codec.compress(&self.block)?;
        if compressed.len() < self.block.len() {
            self.write_chunk_header(compressed.len(), false);
            self.output.extend_from_slice(&compressed);
        } else {
            // Codec did not shrink the block; store it raw, tagged original.
            self.write_chunk_header(self.block.len(), true);
            self.output.extend_from_slice(&self.block);
        }
        debug!(
            target: "stream::buffer",
            raw = self.block.len(),
            compressed = compressed.len(),
            original = compressed.len() >= self.block.len(),
            "Flushed block"
        );
        self.block.clear();
        Ok(())
    }

    fn write_chunk_header(&mut self, length: usize, original: bool) {
        let header = (length << 1) | original as usize;
        self.output.push(header as u8);
        self.output.push((header >> 8) as u8);
        self.output.push((header >> 16) as u8);
    }
}
