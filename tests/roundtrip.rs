use std::fs;
use std::io::Cursor;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rstest::*;
use tempfile::TempDir;

use huffcode::{decode, decode_file, encode, encode_file, HuffmanError, HEADER_LEN, SYMBOLS};

fn random_bytes(len: usize, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len).map(|_| rng.gen()).collect()
}

/// Skewed towards small values, so codes have very different lengths.
fn skewed_bytes(len: usize, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len)
        .map(|_| (rng.gen::<f64>().powi(4) * 256.0) as u8)
        .collect()
}

const HUGE: u64 = u64::MAX;

/// Hand-built artifact: `HUF1`, the given nonzero counts, then `payload`.
fn artifact_with_counts(counts: &[(usize, u64)], payload: &[u8]) -> Vec<u8> {
    let mut all = [0u64; SYMBOLS];
    for &(symbol, count) in counts {
        all[symbol] = count;
    }
    let mut artifact = b"HUF1".to_vec();
    for count in all {
        artifact.extend_from_slice(&count.to_le_bytes());
    }
    artifact.extend_from_slice(payload);
    artifact
}

fn compress(data: &[u8]) -> Vec<u8> {
    let mut artifact = Vec::new();
    encode(Cursor::new(data), &mut artifact).unwrap();
    artifact
}

fn decompress(artifact: &[u8]) -> Result<Vec<u8>, HuffmanError> {
    let mut out = Vec::new();
    decode(artifact, &mut out)?;
    Ok(out)
}

#[fixture]
fn dir() -> TempDir {
    tempfile::Builder::new().prefix("huffcode").tempdir().unwrap()
}

#[rstest]
#[case::empty(Vec::new())]
#[case::single_byte(vec![0x00])]
#[case::repeated_byte(vec![0x41; 1000])]
#[case::two_symbols(b"abababababbbbbbbbbbbbbbbbbbbbbb".to_vec())]
#[case::text(b"The quick brown fox jumps over the lazy dog.\n".repeat(50))]
#[case::all_bytes((0..=255u8).collect())]
#[case::all_bytes_twice((0..=255u8).chain((0..=255u8).rev()).collect())]
#[case::random(random_bytes(10_000, 7))]
#[case::skewed(skewed_bytes(20_000, 11))]
fn roundtrip_in_memory(#[case] data: Vec<u8>) {
    let artifact = compress(&data);
    assert!(artifact.len() > HEADER_LEN);
    assert_eq!(decompress(&artifact).unwrap(), data);
}

#[rstest]
#[case::empty(Vec::new())]
#[case::repeated_byte(vec![0x41; 1000])]
#[case::text(b"It is a truth universally acknowledged".repeat(20))]
#[case::random(random_bytes(50_000, 3))]
fn roundtrip_files(dir: TempDir, #[case] data: Vec<u8>) {
    let original = dir.path().join("original");
    let compressed = dir.path().join("compressed.huff");
    let restored = dir.path().join("restored");
    fs::write(&original, &data).unwrap();

    let encoded = encode_file(&original, &compressed).unwrap();
    assert_eq!(encoded.input_bytes, data.len() as u64);
    assert_eq!(encoded.output_bytes, fs::metadata(&compressed).unwrap().len());

    let decoded = decode_file(&compressed, &restored).unwrap();
    assert_eq!(decoded.output_bytes, data.len() as u64);
    assert_eq!(fs::read(&restored).unwrap(), data);
}

#[rstest]
fn text_gets_smaller() {
    let data =
        b"Huffman encoding is a greedy algorithm that builds optimal prefix codes. ".repeat(100);
    assert!(compress(&data).len() < data.len());
}

#[rstest]
fn encoding_is_deterministic() {
    let data = skewed_bytes(5_000, 42);
    let first = compress(&data);
    for _ in 0..3 {
        assert_eq!(compress(&data), first);
    }
}

#[rstest]
fn header_matches_frequencies() {
    let artifact = compress(b"aab");
    assert_eq!(&artifact[..4], b"HUF1");
    let count = |symbol: usize| {
        let at = 4 + symbol * 8;
        u64::from_le_bytes(artifact[at..at + 8].try_into().unwrap())
    };
    assert_eq!(count(b'a' as usize), 2);
    assert_eq!(count(b'b' as usize), 1);
    assert_eq!(count(b'c' as usize), 0);
    assert_eq!(count(256), 1);
}

#[rstest]
#[case::no_header(Vec::new())]
#[case::bad_magic(b"NOPE and then some more bytes".to_vec())]
#[case::short_header(b"HUF1\x01\x00".to_vec())]
#[case::no_sentinel(artifact_with_counts(&[(0, 5)], &[0x00]))]
#[case::overflowing_counts(artifact_with_counts(&[(0, HUGE), (1, HUGE), (256, 1)], &[0]))]
fn malformed_header(#[case] artifact: Vec<u8>) {
    assert!(matches!(decompress(&artifact), Err(HuffmanError::Header(_))));
}

#[rstest]
fn large_counts_within_range_decode() {
    // 'a' and 'b' weigh about half of u64::MAX each, so the root weight is
    // close to the limit
    let half = HUGE / 2 - 1;
    let counts = [(b'a' as usize, half), (b'b' as usize, half), (256, 1)];
    // b = 0, EOF = 10, a = 11: "ab" then EOF is 11 0 10
    let artifact = artifact_with_counts(&counts, &[0xd0]);
    assert_eq!(decompress(&artifact).unwrap(), b"ab");
}

#[rstest]
fn sentinel_count_is_checked() {
    let mut artifact = compress(b"hello");
    // the sentinel count is the last u64 of the header
    artifact[HEADER_LEN - 8] = 2;
    assert!(matches!(decompress(&artifact), Err(HuffmanError::Header(_))));
}

#[rstest]
fn malformed_header_writes_nothing(dir: TempDir) {
    let compressed = dir.path().join("garbage.huff");
    let restored = dir.path().join("restored");
    fs::write(&compressed, b"definitely not an artifact").unwrap();

    let err = decode_file(&compressed, &restored).unwrap_err();
    assert!(matches!(err, HuffmanError::Header(_)));
    assert!(err.is_corrupt());
    assert!(!restored.exists());
}

#[rstest]
fn truncated_payload(dir: TempDir) {
    let data = random_bytes(4_000, 9);
    let compressed = dir.path().join("compressed.huff");
    let mut artifact = compress(&data);
    artifact.truncate(artifact.len() - 10);
    fs::write(&compressed, &artifact).unwrap();

    let err = decode_file(&compressed, dir.path().join("restored")).unwrap_err();
    assert!(matches!(err, HuffmanError::Truncated));
}

#[rstest]
fn missing_source(dir: TempDir) {
    let err = encode_file(dir.path().join("nothing here"), dir.path().join("out")).unwrap_err();
    assert!(matches!(err, HuffmanError::Io(_)));
    assert!(!err.is_corrupt());

    let err = decode_file(dir.path().join("nothing here"), dir.path().join("out")).unwrap_err();
    assert!(matches!(err, HuffmanError::Io(_)));
}

#[rstest]
fn trailing_bytes_after_sentinel_are_ignored() {
    let data = b"abcabcabc".to_vec();
    let mut artifact = compress(&data);
    artifact.extend_from_slice(&[0xff, 0x00, 0xaa]);
    assert_eq!(decompress(&artifact).unwrap(), data);
}
