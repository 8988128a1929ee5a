//! End-to-end decoding of small index streams.

use bzip2::write::BzEncoder;
use multistream_index::{
    record::Field,
    signal::{Signal, Signaler},
    source::{Compression, Config},
    DecodeResult, Decoder, Error, Record, State, Termination,
};
use std::io::{Cursor, Write};

const TWO_ENTRIES: &str = "540:10:AccessibleComputing\n540:12:Anarchism\n";

/// Decode `data` to completion, returning every result and the final offsets.
fn decode_all(data: Vec<u8>, cfg: Config, signal: &Signal) -> (Vec<DecodeResult>, Vec<u64>) {
    let mut decoder =
        Decoder::init(Some(Cursor::new(data)), cfg).expect("failed to create decoder");
    let results = decoder.decode(signal).collect();
    (results, decoder.into_offsets().into())
}

fn bzip2(data: &str) -> Vec<u8> {
    let mut encoder = BzEncoder::new(Vec::new(), bzip2::Compression::best());
    encoder.write_all(data.as_bytes()).unwrap();
    encoder.finish().unwrap()
}

#[test]
fn test_shared_offset() {
    let (results, offsets) = decode_all(TWO_ENTRIES.into(), Config::default(), &Signal::Never);
    let records: Vec<Record> = results.into_iter().map(Result::unwrap).collect();
    assert_eq!(
        records,
        vec![
            Record::new(540, 10, "AccessibleComputing"),
            Record::new(540, 12, "Anarchism"),
        ]
    );
    assert_eq!(offsets, vec![540]);
}

#[test]
fn test_distinct_offsets_in_order() {
    let data = "540:10:AccessibleComputing\n706858:23:AssistiveTechnology\n";
    let (results, offsets) = decode_all(data.into(), Config::default(), &Signal::Never);
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(Result::is_ok));
    assert_eq!(offsets, vec![540, 706858]);
}

#[test]
fn test_offsets_revisited() {
    let data = "706858:23:AssistiveTechnology\n540:10:AccessibleComputing\n706858:25:Autism\n";
    let (results, offsets) = decode_all(data.into(), Config::default(), &Signal::Never);
    assert_eq!(results.len(), 3);
    assert_eq!(offsets, vec![706858, 540]);
}

#[test]
fn test_invalid_offset() {
    let (results, offsets) = decode_all(
        "notanumber:10:Title\n540:12:Anarchism\n".into(),
        Config::default(),
        &Signal::Never,
    );
    assert_eq!(results.len(), 1);
    match &results[0] {
        Err(Error::InvalidField { line, field, value }) => {
            assert_eq!(*line, 1);
            assert_eq!(*field, Field::Offset);
            assert_eq!(value, "notanumber");
        }
        other => panic!("unexpected result: {other:?}"),
    }
    assert!(offsets.is_empty());
}

#[test]
fn test_missing_field() {
    let (results, offsets) = decode_all("540:10\n".into(), Config::default(), &Signal::Never);
    assert_eq!(results.len(), 1);
    assert!(matches!(
        results[0],
        Err(Error::MalformedLine { line: 1, fields: 2 })
    ));
    assert!(offsets.is_empty());
}

#[test]
fn test_canceled_before_start() {
    let (signaler, signal) = Signaler::new();
    signaler.signal(15);
    let (results, offsets) = decode_all(TWO_ENTRIES.into(), Config::default(), &signal);
    assert_eq!(results.len(), 1);
    assert!(matches!(results[0], Err(Error::Canceled(15))));
    assert!(offsets.is_empty());
}

#[test]
fn test_bzip2_matches_plain() {
    let (plain, plain_offsets) =
        decode_all(TWO_ENTRIES.into(), Config::compressed(false), &Signal::Never);
    let (compressed, compressed_offsets) =
        decode_all(bzip2(TWO_ENTRIES), Config::compressed(true), &Signal::Never);

    let plain: Vec<Record> = plain.into_iter().map(Result::unwrap).collect();
    let compressed: Vec<Record> = compressed.into_iter().map(Result::unwrap).collect();
    assert_eq!(plain, compressed);
    assert_eq!(plain_offsets, compressed_offsets);
}

#[test]
fn test_zstd_matches_plain() {
    let data = zstd::encode_all(TWO_ENTRIES.as_bytes(), 3).unwrap();
    let cfg = Config {
        compression: Compression::Zstd,
    };
    let (results, offsets) = decode_all(data, cfg, &Signal::Never);
    let records: Vec<Record> = results.into_iter().map(Result::unwrap).collect();
    assert_eq!(records[1], Record::new(540, 12, "Anarchism"));
    assert_eq!(offsets, vec![540]);
}

#[test]
fn test_truncated_bzip2() {
    let mut data = bzip2(TWO_ENTRIES);
    data.truncate(data.len() / 2);
    let (results, offsets) = decode_all(data, Config::compressed(true), &Signal::Never);

    // Whatever was decoded before the failure is kept, and the pass ends on an error
    let last = results.last().expect("missing results");
    assert!(matches!(last, Err(Error::Read(_))));
    let decoded = results.iter().filter(|result| result.is_ok()).count();
    assert_eq!(decoded + 1, results.len());
    assert!(offsets.len() <= 1);
}

#[test]
fn test_large_index() {
    // Emulate a dump: 100 entries per segment, segments 1KB apart
    let mut data = String::new();
    for id in 0..1_000u64 {
        let offset = 540 + (id / 100) * 1_024;
        let record = Record::new(offset, id, format!("Title {id}: part {}", id % 7));
        data.push_str(&record.to_string());
    }

    let mut decoder = Decoder::init(Some(Cursor::new(data)), Config::default()).unwrap();
    let mut count = 0;
    for result in decoder.decode(&Signal::Never) {
        let record = result.unwrap();
        assert_eq!(record.id(), count);
        count += 1;
    }
    assert_eq!(count, 1_000);
    assert_eq!(decoder.state(), State::Terminated(Termination::Clean));

    let expected: Vec<u64> = (0..10).map(|segment| 540 + segment * 1_024).collect();
    assert_eq!(decoder.offsets().as_slice(), expected.as_slice());
}

#[test]
fn test_empty_input() {
    let result = Decoder::<Cursor<Vec<u8>>>::init(None, Config::default());
    assert!(matches!(result, Err(Error::EmptyInput)));
}
