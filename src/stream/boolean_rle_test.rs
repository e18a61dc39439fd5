use crate::compression::CompressionKind;
use crate::errors::StreamError;
use crate::read::BooleanRleReader;
use crate::stream::boolean_rle::BooleanRleStream;
use crate::stream::descriptor::{ColumnId, StreamKind};
use crate::stream::output_buffer::CompressedOutputBuffer;

fn plain_stream() -> BooleanRleStream {
    BooleanRleStream::new(CompressedOutputBuffer::new(CompressionKind::None, 1024))
}

#[test]
fn bits_pack_msb_first() {
    let mut stream = plain_stream();
    for v in [true, false, true, true, false, false, false, true] {
        stream.record(v).expect("record");
    }
    stream.close().expect("close");
    // one literal byte 0b1011_0001
    assert_eq!(stream.output(), &[0xFF, 0xB1]);
}

#[test]
fn final_partial_byte_is_zero_padded() {
    let mut stream = plain_stream();
    for v in [true, true, false] {
        stream.record(v).expect("record");
    }
    stream.close().expect("close");
    assert_eq!(stream.output(), &[0xFF, 0xC0]);
}

#[test]
fn repeated_true_collapses_into_byte_runs() {
    let mut stream = plain_stream();
    stream.record_repeated(800, true).expect("record");
    stream.close().expect("close");
    // 100 bytes of 0xFF: run control 97
    assert_eq!(stream.output(), &[97, 0xFF]);
}

#[test]
fn bulk_and_single_records_mix() {
    let mut expected = Vec::new();
    let mut stream = plain_stream();

    for _ in 0..5 {
        expected.push(true);
        stream.record(true).expect("record");
    }
    stream.record_repeated(20, false).expect("record");
    expected.extend(std::iter::repeat(false).take(20));
    for _ in 0..3 {
        expected.push(true);
        stream.record(true).expect("record");
    }
    stream.close().expect("close");

    let mut reader = BooleanRleReader::new(stream.output(), CompressionKind::None);
    assert_eq!(reader.read_all(28).expect("decode"), expected);
}

#[test]
fn checkpoints_resume_at_exact_bit_positions() {
    let values: Vec<bool> = (0..40u32).map(|i| i % 3 == 0).collect();
    let mut stream = plain_stream();
    let mut checkpoint_rows = Vec::new();

    for (i, &v) in values.iter().enumerate() {
        stream.record(v).expect("record");
        if (i + 1) % 10 == 0 && i + 1 < values.len() {
            stream.record_checkpoint().expect("checkpoint");
            checkpoint_rows.push(i + 1);
        }
    }
    stream.close().expect("close");

    let checkpoints = stream.checkpoints().to_vec();
    assert_eq!(checkpoints.len(), checkpoint_rows.len());

    for (cp, &row) in checkpoints.iter().zip(&checkpoint_rows) {
        let mut reader = BooleanRleReader::new(stream.output(), CompressionKind::None);
        reader.seek(cp).expect("seek");
        let tail = reader.read_all((values.len() - row) as u64).expect("read");
        assert_eq!(tail, values[row..]);
    }
}

#[test]
fn checkpoints_survive_tiny_compressed_blocks() {
    // 8-byte blocks force checkpoints to land inside many different frames
    let values: Vec<bool> = (0..500u32).map(|i| (i / 11) % 2 == 0).collect();
    let mut stream =
        BooleanRleStream::new(CompressedOutputBuffer::new(CompressionKind::Zstd, 8));
    let mut checkpoint_rows = Vec::new();

    for (i, &v) in values.iter().enumerate() {
        stream.record(v).expect("record");
        if (i + 1) % 50 == 0 {
            stream.record_checkpoint().expect("checkpoint");
            checkpoint_rows.push(i + 1);
        }
    }
    stream.close().expect("close");

    for (cp, &row) in stream.checkpoints().iter().zip(&checkpoint_rows) {
        let mut reader = BooleanRleReader::new(stream.output(), CompressionKind::Zstd);
        reader.seek(cp).expect("seek");
        let tail = reader.read_all((values.len() - row) as u64).expect("read");
        assert_eq!(tail, values[row..], "resume from row {row}");
    }
}

#[test]
fn data_output_is_labeled_data() {
    let mut stream = plain_stream();
    stream.record(false).expect("record");
    stream.close().expect("close");

    let output = stream
        .stream_data_output(ColumnId(9))
        .expect("data output");
    assert_eq!(output.descriptor().column(), ColumnId(9));
    assert_eq!(output.descriptor().kind(), StreamKind::Data);
    assert_eq!(output.descriptor().length(), stream.output().len() as u64);
    assert!(!output.descriptor().use_vints());
}

#[test]
fn data_output_before_close_is_a_usage_violation() {
    let mut stream = plain_stream();
    stream.record(true).expect("record");
    assert!(matches!(
        stream.stream_data_output(ColumnId(0)),
        Err(StreamError::UsageViolation(_))
    ));
}

#[test]
fn record_after_close_is_a_usage_violation() {
    let mut stream = plain_stream();
    stream.close().expect("close");
    assert!(matches!(
        stream.record(true),
        Err(StreamError::UsageViolation(_))
    ));
    assert!(matches!(
        stream.record_checkpoint(),
        Err(StreamError::UsageViolation(_))
    ));
}

#[test]
fn reset_reproduces_identical_output_and_clears_checkpoints() {
    let values: Vec<bool> = (0..100u32).map(|i| i % 7 != 0).collect();

    let mut stream = plain_stream();
    for &v in &values {
        stream.record(v).expect("record");
    }
    stream.record_checkpoint().expect("checkpoint");
    stream.close().expect("close");
    let first = stream.output().to_vec();

    stream.reset();
    assert!(stream.checkpoints().is_empty());
    for &v in &values {
        stream.record(v).expect("record");
    }
    stream.close().expect("close");
    assert_eq!(stream.output(), first);
}
