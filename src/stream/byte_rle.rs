use crate::errors::StreamError;
use crate::stream::checkpoint::ByteRleCheckpoint;
use crate::stream::output_buffer::CompressedOutputBuffer;

/// Shortest repeat worth encoding as a run.
pub const MIN_REPEAT: usize = 3;
/// Longest literal group a single control byte can describe.
pub const MAX_LITERAL: usize = 128;

const INSTANCE_SIZE: usize = std::mem::size_of::<ByteRleStream>();

/// ORC byte run-length encoder.
///
/// Control byte 0..=127 introduces a run of `control + 3` copies of the next
/// byte; control 128..=255 (i.e. negative i8) introduces `256 - control`
/// literal bytes. Bytes sit in `sequence` until a group is decided; the
/// trailing `run_count` identical bytes of `sequence` are the run candidate.
///
/// Invariant: `run_count >= MIN_REPEAT` implies `sequence` is one pure run,
/// because literals ahead of a forming run are flushed the moment the run
/// reaches `MIN_REPEAT`.
pub struct ByteRleStream {
    buffer: CompressedOutputBuffer,
    sequence: Vec<u8>,
    run_count: usize,
    closed: bool,
}

impl ByteRleStream {
    pub fn new(buffer: CompressedOutputBuffer) -> Self {
        Self {
            buffer,
            sequence: Vec::with_capacity(MAX_LITERAL),
            run_count: 0,
            closed: false,
        }
    }

    pub fn write_byte(&mut self, value: u8) -> Result<(), StreamError> {
        if self.closed {
            return Err(StreamError::UsageViolation(
                "write_byte called on closed byte-RLE stream",
            ));
        }
        if self.sequence.len() == MAX_LITERAL {
            self.flush_sequence()?;
        }
        if self.sequence.last() == Some(&value) {
            self.run_count += 1;
        } else {
            if self.run_count >= MIN_REPEAT {
                // A run just broke; emit it before starting over.
                self.flush_sequence()?;
            }
            self.run_count = 1;
        }
        self.sequence.push(value);
        if self.run_count == MIN_REPEAT && self.sequence.len() > MIN_REPEAT {
            // A run has formed behind buffered literals; emit the literals so
            // the run can keep growing.
            let literal_len = self.sequence.len() - MIN_REPEAT;
            self.flush_literals(literal_len)?;
        }
        Ok(())
    }

    /// Position marker for the start of the next logical byte.
    pub fn checkpoint(&self) -> ByteRleCheckpoint {
        ByteRleCheckpoint {
            buffer: self.buffer.checkpoint(),
            pending_bytes: self.sequence.len() as u64,
        }
    }

    /// Flushes the pending sequence and the final partial block.
    pub fn close(&mut self) -> Result<(), StreamError> {
        if self.closed {
            return Ok(());
        }
        self.flush_sequence()?;
        self.buffer.finish()?;
        self.closed = true;
        Ok(())
    }

    pub fn output(&self) -> &[u8] {
        self.buffer.output()
    }

    pub fn buffered_bytes(&self) -> u64 {
        self.buffer.buffered_bytes() + self.sequence.len() as u64
    }

    pub fn retained_bytes(&self) -> u64 {
        (INSTANCE_SIZE + self.sequence.capacity()) as u64 + self.buffer.retained_bytes()
    }

    pub fn reset(&mut self) {
        self.buffer.reset();
        self.sequence.clear();
        self.run_count = 0;
        self.closed = false;
    }

    pub fn into_buffer(self) -> CompressedOutputBuffer {
        self.buffer
    }

    fn flush_sequence(&mut self) -> Result<(), StreamError> {
        if self.sequence.is_empty() {
            return Ok(());
        }
        if self.run_count >= MIN_REPEAT {
            debug_assert_eq!(self.run_count, self.sequence.len());
            self.buffer.write_u8((self.run_count - MIN_REPEAT) as u8)?;
            self.buffer.write_u8(self.sequence[0])?;
        } else {
            self.buffer
                .write_u8(0u8.wrapping_sub(self.sequence.len() as u8))?;
            self.buffer.write_all(&self.sequence)?;
        }
        self.sequence.clear();
        self.run_count = 0;
        Ok(())
    }

    /// Emits the first `count` bytes of `sequence` as a literal group,
    /// leaving the trailing run candidate in place.
    fn flush_literals(&mut self, count: usize) -> Result<(), StreamError> {
        debug_assert!(count >= 1 && count <= MAX_LITERAL);
        self.buffer.write_u8(0u8.wrapping_sub(count as u8))?;
        self.buffer.write_all(&self.sequence[..count])?;
        self.sequence.drain(..count);
        Ok(())
    }
}
