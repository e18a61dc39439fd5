use crate::compression::CompressionKind;
use crate::errors::ReadError;
use crate::read::block_reader::CompressedBlockReader;
use crate::read::byte_rle_reader::ByteRleReader;
use crate::stream::checkpoint::BooleanRleCheckpoint;

/// Decodes the boolean stream produced by `BooleanRleStream`: MSB-first bits
/// over byte RLE.
pub struct BooleanRleReader<'a> {
    bytes: ByteRleReader<'a>,
    data: u8,
    bits_remaining: u8,
}

impl<'a> BooleanRleReader<'a> {
    pub fn new(input: &'a [u8], kind: CompressionKind) -> Self {
        Self {
            bytes: ByteRleReader::new(CompressedBlockReader::new(input, kind)),
            data: 0,
            bits_remaining: 0,
        }
    }

    pub fn read_bool(&mut self) -> Result<bool, ReadError> {
        if self.bits_remaining == 0 {
            self.data = self.bytes.read_byte()?;
            self.bits_remaining = 8;
        }
        let value = self.data & 0x80 != 0;
        self.data <<= 1;
        self.bits_remaining -= 1;
        Ok(value)
    }

    pub fn read_all(&mut self, count: u64) -> Result<Vec<bool>, ReadError> {
        let mut values = Vec::with_capacity(count as usize);
        for _ in 0..count {
            values.push(self.read_bool()?);
        }
        Ok(values)
    }

    /// Resumes decoding at a writer checkpoint: seek the byte layer, then
    /// burn the bits already consumed from the checkpointed byte.
    pub fn seek(&mut self, checkpoint: &BooleanRleCheckpoint) -> Result<(), ReadError> {
        self.bytes.seek(&checkpoint.byte)?;
        self.bits_remaining = 0;
        for _ in 0..checkpoint.offset_in_bit {
            self.read_bool()?;
        }
        Ok(())
    }
}
