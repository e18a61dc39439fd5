use crate::compression::CompressionKind;
use crate::errors::StreamError;
use crate::read::{ByteRleReader, CompressedBlockReader};
use crate::stream::byte_rle::ByteRleStream;
use crate::stream::output_buffer::CompressedOutputBuffer;

fn plain_stream() -> ByteRleStream {
    ByteRleStream::new(CompressedOutputBuffer::new(CompressionKind::None, 1024))
}

fn decode(encoded: &[u8], count: usize) -> Vec<u8> {
    let mut reader = ByteRleReader::new(CompressedBlockReader::new(
        encoded,
        CompressionKind::None,
    ));
    (0..count).map(|_| reader.read_byte().expect("decode")).collect()
}

#[test]
fn distinct_bytes_become_one_literal_group() {
    let mut stream = plain_stream();
    for b in [1u8, 2, 3] {
        stream.write_byte(b).expect("write");
    }
    stream.close().expect("close");
    assert_eq!(stream.output(), &[0xFD, 1, 2, 3]);
}

#[test]
fn repeats_become_a_run() {
    let mut stream = plain_stream();
    for _ in 0..10 {
        stream.write_byte(7).expect("write");
    }
    stream.close().expect("close");
    // run of 10 = control 7, value 7
    assert_eq!(stream.output(), &[7, 7]);
}

#[test]
fn broken_run_flushes_before_new_byte() {
    let mut stream = plain_stream();
    for b in [b'a', b'a', b'a', b'b'] {
        stream.write_byte(b).expect("write");
    }
    stream.close().expect("close");
    assert_eq!(stream.output(), &[0x00, b'a', 0xFF, b'b']);
}

#[test]
fn literals_flush_when_a_run_forms_behind_them() {
    let mut stream = plain_stream();
    for b in [b'a', b'b', b'c', b'c', b'c', b'c'] {
        stream.write_byte(b).expect("write");
    }
    stream.close().expect("close");
    // literals [a, b], then a run of 4 c's
    assert_eq!(stream.output(), &[0xFE, b'a', b'b', 0x01, b'c']);
}

#[test]
fn long_runs_split_at_sequence_capacity() {
    let mut stream = plain_stream();
    for _ in 0..300 {
        stream.write_byte(5).expect("write");
    }
    stream.close().expect("close");
    // two 128-byte runs and one 44-byte run
    assert_eq!(stream.output(), &[125, 5, 125, 5, 41, 5]);
    assert_eq!(decode(stream.output(), 300), vec![5u8; 300]);
}

#[test]
fn mixed_sequence_roundtrips() {
    let mut expected = Vec::new();
    for i in 0..1000u32 {
        // stretches of repeats broken up by noise
        let byte = if i % 37 < 30 { 0xAA } else { (i % 251) as u8 };
        expected.push(byte);
    }
    let mut stream = plain_stream();
    for &b in &expected {
        stream.write_byte(b).expect("write");
    }
    stream.close().expect("close");
    assert_eq!(decode(stream.output(), expected.len()), expected);
}

#[test]
fn checkpoint_resumes_mid_stream() {
    let mut expected = Vec::new();
    let mut stream = plain_stream();
    for i in 0..200u32 {
        let byte = (i / 9) as u8;
        expected.push(byte);
        stream.write_byte(byte).expect("write");
    }
    let cp = stream.checkpoint();
    for i in 0..100u32 {
        let byte = (i % 7) as u8;
        expected.push(byte);
        stream.write_byte(byte).expect("write");
    }
    stream.close().expect("close");

    let mut reader = ByteRleReader::new(CompressedBlockReader::new(
        stream.output(),
        CompressionKind::None,
    ));
    reader.seek(&cp).expect("seek");
    let tail: Vec<u8> = (0..100)
        .map(|_| reader.read_byte().expect("read"))
        .collect();
    assert_eq!(tail, expected[200..]);
}

#[test]
fn reset_reproduces_identical_output() {
    let payload: Vec<u8> = (0..500u32).map(|i| (i % 13) as u8).collect();

    let mut stream = plain_stream();
    for &b in &payload {
        stream.write_byte(b).expect("write");
    }
    stream.close().expect("close");
    let first = stream.output().to_vec();

    stream.reset();
    for &b in &payload {
        stream.write_byte(b).expect("write");
    }
    stream.close().expect("close");
    assert_eq!(stream.output(), first);
}

#[test]
fn write_after_close_is_a_usage_violation() {
    let mut stream = plain_stream();
    stream.write_byte(1).expect("write");
    stream.close().expect("close");
    assert!(matches!(
        stream.write_byte(2),
        Err(StreamError::UsageViolation(_))
    ));
}
