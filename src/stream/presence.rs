use tracing::debug;

use crate::compression::CompressionKind;
use crate::errors::StreamError;
use crate::shared::config::StreamSettings;
use crate::stream::boolean_rle::BooleanRleStream;
use crate::stream::checkpoint::BooleanRleCheckpoint;
use crate::stream::descriptor::{ColumnId, StreamDataOutput, StreamKind};
use crate::stream::output_buffer::{CompressedOutputBuffer, DEFAULT_BLOCK_SIZE, MAX_BLOCK_SIZE};

const INSTANCE_SIZE: usize = std::mem::size_of::<PresenceStream>();

/// Encoder state. While every row so far has been present nothing is encoded;
/// the stream only counts rows per group, because an absent PRESENT stream
/// already means "all rows present" to a reader. The first absent row forces
/// the transition to `Encoded`, replaying history into the bit stream.
enum PresenceState {
    AllPresent {
        /// Idle output buffer, handed to the bit stream on materialization
        /// and recovered on reset.
        buffer: CompressedOutputBuffer,
        /// Row count of each group already closed by a checkpoint.
        group_counts: Vec<u64>,
        /// Rows recorded in the group currently open.
        current_count: u64,
    },
    Encoded(BooleanRleStream),
}

impl Default for PresenceState {
    fn default() -> Self {
        PresenceState::AllPresent {
            buffer: CompressedOutputBuffer::new(CompressionKind::None, DEFAULT_BLOCK_SIZE),
            group_counts: Vec::new(),
            current_count: 0,
        }
    }
}

/// Per-column is-value-present stream for one stripe.
///
/// The column writer feeds one boolean per row, closes each row group with
/// `record_checkpoint`, seals the stripe with `close`, then collects the
/// checkpoint list and the PRESENT stream (both empty if no row was absent).
/// `reset` returns the instance to its unwritten state for the next stripe,
/// keeping the buffer allocation.
pub struct PresenceStream {
    state: PresenceState,
    closed: bool,
}

impl PresenceStream {
    pub fn new(compression: CompressionKind, block_size: usize) -> Self {
        Self {
            state: PresenceState::AllPresent {
                buffer: CompressedOutputBuffer::new(compression, block_size),
                group_counts: Vec::new(),
                current_count: 0,
            },
            closed: false,
        }
    }

    /// Builds a stream from deserialized settings. Unlike `new`, an
    /// out-of-range block size is a data error here, not a caller bug, so it
    /// surfaces as an `Err` instead of a panic.
    pub fn from_settings(settings: &StreamSettings) -> Result<Self, StreamError> {
        if settings.block_size == 0 || settings.block_size > MAX_BLOCK_SIZE {
            return Err(StreamError::UsageViolation(
                "configured block size out of range",
            ));
        }
        Ok(Self::new(settings.compression, settings.block_size))
    }

    pub fn record(&mut self, present: bool) -> Result<(), StreamError> {
        if self.closed {
            return Err(StreamError::UsageViolation(
                "record called on closed presence stream",
            ));
        }
        if !present && matches!(self.state, PresenceState::AllPresent { .. }) {
            self.materialize()?;
        }
        match &mut self.state {
            PresenceState::AllPresent { current_count, .. } => *current_count += 1,
            PresenceState::Encoded(stream) => stream.record(present)?,
        }
        Ok(())
    }

    /// Closes the current row group. Exactly one checkpoint exists per group
    /// regardless of when (or whether) the bit stream materialized.
    pub fn record_checkpoint(&mut self) -> Result<(), StreamError> {
        if self.closed {
            return Err(StreamError::UsageViolation(
                "record_checkpoint called on closed presence stream",
            ));
        }
        match &mut self.state {
            PresenceState::AllPresent {
                group_counts,
                current_count,
                ..
            } => {
                group_counts.push(*current_count);
                *current_count = 0;
            }
            PresenceState::Encoded(stream) => stream.record_checkpoint()?,
        }
        Ok(())
    }

    pub fn close(&mut self) -> Result<(), StreamError> {
        if self.closed {
            return Ok(());
        }
        if let PresenceState::Encoded(stream) = &mut self.state {
            stream.close()?;
        }
        self.closed = true;
        debug!(
            target: "stream::presence",
            encoded = matches!(self.state, PresenceState::Encoded(_)),
            "Closed presence stream"
        );
        Ok(())
    }

    /// One checkpoint per recorded group, in group order; `None` when no row
    /// was absent, telling the reader to assume all rows present.
    pub fn get_checkpoints(&self) -> Result<Option<Vec<BooleanRleCheckpoint>>, StreamError> {
        if !self.closed {
            return Err(StreamError::UsageViolation(
                "checkpoints requested before close",
            ));
        }
        match &self.state {
            PresenceState::AllPresent { .. } => Ok(None),
            PresenceState::Encoded(stream) => Ok(Some(stream.checkpoints().to_vec())),
        }
    }

    /// The sealed PRESENT stream, or `None` when no row was absent. The bit
    /// stream labels its output DATA; the relabeling to PRESENT happens here
    /// because only this layer knows the stream's role.
    pub fn get_stream_data_output(
        &self,
        column: ColumnId,
    ) -> Result<Option<StreamDataOutput>, StreamError> {
        if !self.closed {
            return Err(StreamError::UsageViolation(
                "stream data output requested before close",
            ));
        }
        match &self.state {
            PresenceState::AllPresent { .. } => Ok(None),
            PresenceState::Encoded(stream) => Ok(Some(
                stream
                    .stream_data_output(column)?
                    .with_kind(StreamKind::Present),
            )),
        }
    }

    pub fn buffered_bytes(&self) -> u64 {
        match &self.state {
            PresenceState::AllPresent { .. } => 0,
            PresenceState::Encoded(stream) => stream.buffered_bytes(),
        }
    }

    pub fn retained_bytes(&self) -> u64 {
        match &self.state {
            PresenceState::AllPresent { buffer, .. } => {
                INSTANCE_SIZE as u64 + buffer.retained_bytes()
            }
            PresenceState::Encoded(stream) => INSTANCE_SIZE as u64 + stream.retained_bytes(),
        }
    }

    /// Returns the stream to its unwritten state for the next stripe. Only
    /// the buffer allocation survives.
    pub fn reset(&mut self) -> Result<(), StreamError> {
        if !self.closed {
            return Err(StreamError::UsageViolation(
                "reset called on a stream that was not closed",
            ));
        }
        let mut buffer = match std::mem::take(&mut self.state) {
            PresenceState::AllPresent { buffer, .. } => buffer,
            PresenceState::Encoded(stream) => stream.into_buffer(),
        };
        buffer.reset();
        self.state = PresenceState::AllPresent {
            buffer,
            group_counts: Vec::new(),
            current_count: 0,
        };
        self.closed = false;
        Ok(())
    }

    /// The one transition from counting to encoding. Every row seen so far
    /// was present, so the bit stream is rebuilt as all-true: each closed
    /// group is replayed followed by its checkpoint, keeping the checkpoint
    /// list aligned 1:1 with groups, then the open group's rows are written.
    /// The triggering absent row is recorded by the caller afterwards.
    fn materialize(&mut self) -> Result<(), StreamError> {
        self.state = match std::mem::take(&mut self.state) {
            PresenceState::AllPresent {
                buffer,
                group_counts,
                current_count,
            } => {
                debug!(
                    target: "stream::presence",
                    groups = group_counts.len(),
                    rows = group_counts.iter().sum::<u64>() + current_count,
                    "Materializing presence bit stream after first absent row"
                );
                let mut stream = BooleanRleStream::new(buffer);
                for count in group_counts {
                    stream.record_repeated(count, true)?;
                    stream.record_checkpoint()?;
                }
                stream.record_repeated(current_count, true)?;
                PresenceState::Encoded(stream)
            }
            encoded => encoded,
        };
        Ok(())
    }
}
