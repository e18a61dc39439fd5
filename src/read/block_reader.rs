use tracing::debug;

use crate::compression::{CompressionCodec, CompressionKind, codec_for};
use crate::errors::ReadError;
use crate::stream::checkpoint::BufferCheckpoint;

const CHUNK_HEADER_LEN: usize = 3;

/// Walks the framed blocks of one compressed stream, exposing the
/// decompressed bytes in order. With `CompressionKind::None` the input has no
/// framing and is read in place.
pub struct CompressedBlockReader<'a> {
    input: &'a [u8],
    kind: CompressionKind,
    codec: Box<dyn CompressionCodec>,
    /// Decompressed bytes of the current block (framed mode only).
    current: Vec<u8>,
    /// Position within `current`, or within `input` for NONE.
    pos: usize,
    /// Input offset of the next frame header (framed mode only).
    next_block: usize,
}

impl<'a> CompressedBlockReader<'a> {
    pub fn new(input: &'a [u8], kind: CompressionKind) -> Self {
        Self {
            input,
            kind,
            codec: codec_for(kind),
            current: Vec::new(),
            pos: 0,
            next_block: 0,
        }
    }

    pub fn read_u8(&mut self) -> Result<u8, ReadError> {
        if self.kind == CompressionKind::None {
            let byte = *self.input.get(self.pos).ok_or(ReadError::UnexpectedEof)?;
            self.pos += 1;
            return Ok(byte);
        }
        while self.pos == self.current.len() {
            self.load_next_block()?;
        }
        let byte = self.current[self.pos];
        self.pos += 1;
        Ok(byte)
    }

    /// Positions the reader at a checkpoint taken by the writer.
    pub fn seek(&mut self, checkpoint: &BufferCheckpoint) -> Result<(), ReadError> {
        debug!(
            target: "read::block",
            compressed = checkpoint.compressed_offset,
            uncompressed = checkpoint.uncompressed_offset,
            "Seeking block stream"
        );
        if self.kind == CompressionKind::None {
            // Unframed stream: the two offsets address contiguous bytes.
            let pos = (checkpoint.compressed_offset + checkpoint.uncompressed_offset) as usize;
            if pos > self.input.len() {
                return Err(ReadError::Corrupt(format!(
                    "checkpoint beyond stream end: {} > {}",
                    pos,
                    self.input.len()
                )));
            }
            self.pos = pos;
            return Ok(());
        }
        self.next_block = checkpoint.compressed_offset as usize;
        self.current.clear();
        self.pos = 0;
        let skip = checkpoint.uncompressed_offset as usize;
        if skip > 0 {
            self.load_next_block()?;
            if skip > self.current.len() {
                return Err(ReadError::Corrupt(format!(
                    "checkpoint bit offset {} beyond block of {} bytes",
                    skip,
                    self.current.len()
                )));
            }
            self.pos = skip;
        }
        Ok(())
    }

    fn load_next_block(&mut self) -> Result<(), ReadError> {
        if self.next_block >= self.input.len() {
            return Err(ReadError::UnexpectedEof);
        }
        if self.next_block + CHUNK_HEADER_LEN > self.input.len() {
            return Err(ReadError::Corrupt("truncated chunk header".to_string()));
        }
        let h = &self.input[self.next_block..self.next_block + CHUNK_HEADER_LEN];
        let header = h[0] as usize | (h[1] as usize) << 8 | (h[2] as usize) << 16;
        let length = header >> 1;
        let original = header & 1 == 1;
        let start = self.next_block + CHUNK_HEADER_LEN;
        let end = start + length;
        if end > self.input.len() {
            return Err(ReadError::Corrupt(format!(
                "chunk of {} bytes overruns stream of {}",
                length,
                self.input.len()
            )));
        }
        let payload = &self.input[start..end];
        self.current = if original {
            payload.to_vec()
        } else {
            self.codec.decompress(payload)?
        };
        self.pos = 0;
        self.next_block = end;
        Ok(())
    }
}
