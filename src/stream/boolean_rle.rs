use crate::errors::StreamError;
use crate::stream::byte_rle::ByteRleStream;
use crate::stream::checkpoint::BooleanRleCheckpoint;
use crate::stream::descriptor::{ColumnId, StreamDataOutput, StreamDescriptor, StreamKind};
use crate::stream::output_buffer::CompressedOutputBuffer;

const INSTANCE_SIZE: usize = std::mem::size_of::<BooleanRleStream>();

/// Boolean stream encoder: packs bits MSB-first into bytes and feeds them to
/// the byte-RLE layer, so long stretches of identical booleans collapse into
/// byte runs.
pub struct BooleanRleStream {
    byte_stream: ByteRleStream,
    /// Bits collected toward the next byte, first value in the high bit.
    data: u8,
    bits_in_data: u8,
    checkpoints: Vec<BooleanRleCheckpoint>,
    closed: bool,
}

impl BooleanRleStream {
    pub fn new(buffer: CompressedOutputBuffer) -> Self {
        Self {
            byte_stream: ByteRleStream::new(buffer),
            data: 0,
            bits_in_data: 0,
            checkpoints: Vec::new(),
            closed: false,
        }
    }

    pub fn record(&mut self, value: bool) -> Result<(), StreamError> {
        if self.closed {
            return Err(StreamError::UsageViolation(
                "record called on closed boolean stream",
            ));
        }
        self.push_bit(value)
    }

    /// Bulk append of `count` copies of `value`. Whole bytes go straight to
    /// the byte layer, which is what makes presence backfill cheap.
    pub fn record_repeated(&mut self, mut count: u64, value: bool) -> Result<(), StreamError> {
        if self.closed {
            return Err(StreamError::UsageViolation(
                "record_repeated called on closed boolean stream",
            ));
        }
        while self.bits_in_data != 0 && count > 0 {
            self.push_bit(value)?;
            count -= 1;
        }
        let fill = if value { 0xFF } else { 0x00 };
        while count >= 8 {
            self.byte_stream.write_byte(fill)?;
            count -= 8;
        }
        for _ in 0..count {
            self.push_bit(value)?;
        }
        Ok(())
    }

    /// Captures the resume state for the current position: the byte-layer
    /// checkpoint plus the bits already packed into the partial byte.
    pub fn record_checkpoint(&mut self) -> Result<(), StreamError> {
        if self.closed {
            return Err(StreamError::UsageViolation(
                "record_checkpoint called on closed boolean stream",
            ));
        }
        self.checkpoints.push(BooleanRleCheckpoint {
            byte: self.byte_stream.checkpoint(),
            offset_in_bit: self.bits_in_data,
        });
        Ok(())
    }

    pub fn checkpoints(&self) -> &[BooleanRleCheckpoint] {
        &self.checkpoints
    }

    /// Pads the final partial byte with zero bits and seals the stream.
    pub fn close(&mut self) -> Result<(), StreamError> {
        if self.closed {
            return Ok(());
        }
        if self.bits_in_data > 0 {
            self.data <<= 8 - self.bits_in_data;
            self.byte_stream.write_byte(self.data)?;
            self.data = 0;
            self.bits_in_data = 0;
        }
        self.byte_stream.close()?;
        self.closed = true;
        Ok(())
    }

    pub fn output(&self) -> &[u8] {
        self.byte_stream.output()
    }

    /// The sealed stream, labeled DATA; callers that use this encoder for a
    /// different role relabel the descriptor.
    pub fn stream_data_output(&self, column: ColumnId) -> Result<StreamDataOutput, StreamError> {
        if !self.closed {
            return Err(StreamError::UsageViolation(
                "stream_data_output requested before close",
            ));
        }
        let data = self.byte_stream.output().to_vec();
        let descriptor = StreamDescriptor::new(column, StreamKind::Data, data.len() as u64, false);
        Ok(StreamDataOutput::new(descriptor, data))
    }

    pub fn buffered_bytes(&self) -> u64 {
        self.byte_stream.buffered_bytes()
    }

    // Checkpoints are excluded: they stay small and are dropped on reset.
    pub fn retained_bytes(&self) -> u64 {
        INSTANCE_SIZE as u64 + self.byte_stream.retained_bytes()
    }

    pub fn reset(&mut self) {
        self.byte_stream.reset();
        self.data = 0;
        self.bits_in_data = 0;
        self.checkpoints.clear();
        self.closed = false;
    }

    pub fn into_buffer(self) -> CompressedOutputBuffer {
        self.byte_stream.into_buffer()
    }

    fn push_bit(&mut self, value: bool) -> Result<(), StreamError> {
        self.data = (self.data << 1) | value as u8;
        self.bits_in_data += 1;
        if self.bits_in_data == 8 {
            self.byte_stream.write_byte(self.data)?;
            self.data = 0;
            self.bits_in_data = 0;
        }
        Ok(())
    }
}
