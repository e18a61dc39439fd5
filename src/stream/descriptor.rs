use std::io::Write;

use crate::errors::StreamError;

/// Identifier of a column within the file schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ColumnId(pub u32);

/// Role of a stream within a stripe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    /// Per-row is-value-present bitmap.
    Present,
    /// Encoded column values.
    Data,
}

/// Addressing record for one finalized stream, as written into the stripe
/// footer: which column, what role, how long, and whether the payload uses
/// variable-length integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamDescriptor {
    column: ColumnId,
    kind: StreamKind,
    length: u64,
    use_vints: bool,
}

impl StreamDescriptor {
    pub fn new(column: ColumnId, kind: StreamKind, length: u64, use_vints: bool) -> Self {
        Self {
            column,
            kind,
            length,
            use_vints,
        }
    }

    pub fn column(&self) -> ColumnId {
        self.column
    }

    pub fn kind(&self) -> StreamKind {
        self.kind
    }

    pub fn length(&self) -> u64 {
        self.length
    }

    pub fn use_vints(&self) -> bool {
        self.use_vints
    }
}

/// A sealed stream: its descriptor plus the bytes to hand to the stripe
/// data section.
pub struct StreamDataOutput {
    descriptor: StreamDescriptor,
    data: Vec<u8>,
}

impl StreamDataOutput {
    pub fn new(descriptor: StreamDescriptor, data: Vec<u8>) -> Self {
        debug_assert_eq!(descriptor.length(), data.len() as u64);
        Self { descriptor, data }
    }

    pub fn descriptor(&self) -> &StreamDescriptor {
        &self.descriptor
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Writes the stream bytes into `sink`, returning the byte count.
    pub fn write_to<W: Write>(&self, sink: &mut W) -> Result<u64, StreamError> {
        sink.write_all(&self.data)?;
        Ok(self.data.len() as u64)
    }

    /// Relabels the stream role, keeping column, length and payload intact.
    /// The byte-RLE layer always emits DATA; the presence layer rewrites it
    /// to PRESENT.
    pub fn with_kind(self, kind: StreamKind) -> Self {
        Self {
            descriptor: StreamDescriptor::new(
                self.descriptor.column,
                kind,
                self.descriptor.length,
                self.descriptor.use_vints,
            ),
            data: self.data,
        }
    }
}
