use crate::errors::ReadError;
use crate::read::block_reader::CompressedBlockReader;
use crate::stream::byte_rle::MIN_REPEAT;
use crate::stream::checkpoint::ByteRleCheckpoint;

/// Decodes the byte-RLE groups produced by `ByteRleStream`.
pub struct ByteRleReader<'a> {
    input: CompressedBlockReader<'a>,
    run_value: u8,
    run_remaining: u64,
    literal_remaining: u64,
}

impl<'a> ByteRleReader<'a> {
    pub fn new(input: CompressedBlockReader<'a>) -> Self {
        Self {
            input,
            run_value: 0,
            run_remaining: 0,
            literal_remaining: 0,
        }
    }

    pub fn read_byte(&mut self) -> Result<u8, ReadError> {
        loop {
            if self.run_remaining > 0 {
                self.run_remaining -= 1;
                return Ok(self.run_value);
            }
            if self.literal_remaining > 0 {
                self.literal_remaining -= 1;
                return self.input.read_u8();
            }
            self.read_group_header()?;
        }
    }

    pub fn skip(&mut self, count: u64) -> Result<(), ReadError> {
        for _ in 0..count {
            self.read_byte()?;
        }
        Ok(())
    }

    /// Seeks the underlying stream, then decodes and discards the bytes that
    /// were pending in the encoder when the checkpoint was taken.
    pub fn seek(&mut self, checkpoint: &ByteRleCheckpoint) -> Result<(), ReadError> {
        self.input.seek(&checkpoint.buffer)?;
        self.run_remaining = 0;
        self.literal_remaining = 0;
        self.skip(checkpoint.pending_bytes)
    }

    fn read_group_header(&mut self) -> Result<(), ReadError> {
        let control = self.input.read_u8()?;
        if control < 0x80 {
            self.run_remaining = control as u64 + MIN_REPEAT as u64;
            self.run_value = self.input.read_u8()?;
        } else {
            self.literal_remaining = 256 - control as u64;
        }
        Ok(())
    }
}
