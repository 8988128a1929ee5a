//! Drive a decode pass over an index stream.

use multistream_index::{signal::Signal, source::Config, Decoder, Error, Offsets};
use std::io::Read;
use tracing::{debug, info};

/// Outcome of a successful (possibly limited) pass.
#[derive(Debug)]
pub struct Summary {
    /// Number of entries read.
    pub entries: u64,
    /// Distinct segment offsets of the entries read, in first-seen order.
    pub offsets: Offsets,
}

/// Decode `reader`, logging every entry, until the stream ends or `limit` entries were read
/// (a `limit` of 0 reads everything).
///
/// The first decode failure (including cancellation through `signal`) is returned as an error.
pub fn run<R: Read>(
    reader: R,
    cfg: Config,
    signal: &Signal,
    limit: u64,
) -> Result<Summary, Error> {
    let mut decoder = Decoder::init(Some(reader), cfg)?;
    let mut entries = 0;
    for result in decoder.decode(signal) {
        let record = result?;
        info!(
            offset = record.offset(),
            id = record.id(),
            label = record.label(),
            "entry"
        );
        entries += 1;
        if limit > 0 && entries >= limit {
            debug!(limit, "reached entry limit");
            break;
        }
    }
    Ok(Summary {
        entries,
        offsets: decoder.into_offsets(),
    })
}
