//! Decode an index stream line by line while collecting segment offsets.

use crate::{
    signal::Signal,
    source::{Config, Source},
    Error, Offsets, Record,
};
use futures::{channel::mpsc, executor::block_on, SinkExt};
use std::{
    io::{BufRead, Read},
    iter::FusedIterator,
    thread,
};
use tracing::{debug, warn};

/// The outcome of decoding a single line.
pub type DecodeResult = Result<Record, Error>;

/// Why a decode pass ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Termination {
    /// The stream was exhausted.
    Clean,
    /// A cancellation request was observed between lines.
    Canceled,
    /// A line could not be read or decoded.
    Errored,
}

/// Progress of the (single) decode pass of a [Decoder].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    /// No line has been requested yet.
    Idle,
    /// Lines are being read.
    Reading,
    /// The pass has ended. No further line will be read.
    Terminated(Termination),
}

/// Strip the line terminator (`\n` or `\r\n`) from a line.
fn trim_terminator(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

/// Decodes an index stream into [Record]s.
///
/// A [Decoder] performs exactly one pass over its [Source]. Once the pass has terminated
/// (cleanly, on error, or on cancellation), [Decoder::decode] yields nothing.
///
/// # Offsets
///
/// Every successfully decoded record contributes its offset to [Decoder::offsets] (if not
/// already present). When a pass terminates early, the offsets reflect only the lines
/// decoded before termination.
pub struct Decoder<R: Read> {
    source: Source<R>,
    offsets: Offsets,
    state: State,

    /// Number of lines read so far (the 1-based number of the last line).
    line: u64,
    buf: String,
}

impl<R: Read> Decoder<R> {
    /// Create a new [Decoder] over an adapted stream.
    pub fn new(source: Source<R>) -> Self {
        Self {
            source,
            offsets: Offsets::new(),
            state: State::Idle,
            line: 0,
            buf: String::new(),
        }
    }

    /// Adapt `reader` according to `cfg` and create a [Decoder] over it.
    ///
    /// Returns [Error::EmptyInput] if no reader is provided.
    pub fn init(reader: Option<R>, cfg: Config) -> Result<Self, Error> {
        Ok(Self::new(Source::new(reader, cfg)?))
    }

    /// Returns a lazy iterator over the remaining lines of the stream.
    ///
    /// Before each line is read, `signal` is checked. If it has resolved, a single
    /// [Error::Canceled] is yielded and the pass ends. The first line that cannot be read or
    /// decoded is yielded as an error and also ends the pass.
    pub fn decode(&mut self, signal: &Signal) -> Records<'_, R> {
        Records {
            decoder: self,
            signal: signal.clone(),
        }
    }

    /// The distinct offsets decoded so far, in first-seen order.
    ///
    /// This is a partial result until the pass has terminated.
    pub fn offsets(&self) -> &Offsets {
        &self.offsets
    }

    /// Consume the decoder, returning the distinct offsets decoded.
    pub fn into_offsets(self) -> Offsets {
        self.offsets
    }

    /// Progress of the decode pass.
    pub fn state(&self) -> State {
        self.state
    }

    /// Number of lines read so far.
    pub fn line(&self) -> u64 {
        self.line
    }

    fn terminate(&mut self, termination: Termination) {
        debug!(
            line = self.line,
            offsets = self.offsets.len(),
            ?termination,
            "decode pass terminated"
        );
        self.state = State::Terminated(termination);
    }

    fn next_result(&mut self, signal: &mut Signal) -> Option<DecodeResult> {
        match self.state {
            State::Terminated(_) => return None,
            State::Idle => self.state = State::Reading,
            State::Reading => {}
        }

        // Only check for cancellation at line boundaries
        if let Some(value) = signal.resolved() {
            self.terminate(Termination::Canceled);
            return Some(Err(Error::Canceled(value)));
        }

        self.buf.clear();
        match self.source.read_line(&mut self.buf) {
            Ok(0) => {
                self.terminate(Termination::Clean);
                None
            }
            Ok(_) => {
                self.line += 1;
                match trim_terminator(&self.buf).parse::<Record>() {
                    Ok(record) => {
                        self.offsets.insert(record.offset());
                        Some(Ok(record))
                    }
                    Err(err) => {
                        self.terminate(Termination::Errored);
                        Some(Err(err.at(self.line)))
                    }
                }
            }
            Err(err) => {
                self.terminate(Termination::Errored);
                Some(Err(Error::Read(err)))
            }
        }
    }
}

impl<R: Read + Send + 'static> Decoder<R> {
    /// Run the decode pass on a dedicated thread, delivering results over a bounded channel.
    ///
    /// The worker blocks whenever `capacity` results are waiting to be received, so the
    /// consumer drives the pace of the pass. Dropping the receiver stops the worker at the
    /// next line boundary. The returned handle resolves to the offsets decoded.
    pub fn spawn(
        mut self,
        mut signal: Signal,
        capacity: usize,
    ) -> (mpsc::Receiver<DecodeResult>, thread::JoinHandle<Offsets>) {
        let (mut sender, receiver) = mpsc::channel(capacity);
        let handle = thread::spawn(move || {
            while let Some(result) = self.next_result(&mut signal) {
                if let Err(e) = &result {
                    warn!(line = self.line, error = ?e, "decode pass failed");
                }
                if block_on(sender.send(result)).is_err() {
                    debug!(line = self.line, "receiver dropped");
                    break;
                }
            }
            self.into_offsets()
        });
        (receiver, handle)
    }
}

/// Iterator over the results of a decode pass, created by [Decoder::decode].
pub struct Records<'a, R: Read> {
    decoder: &'a mut Decoder<R>,
    signal: Signal,
}

impl<R: Read> Records<'_, R> {
    /// The distinct offsets decoded so far, in first-seen order.
    pub fn offsets(&self) -> &Offsets {
        self.decoder.offsets()
    }

    /// Progress of the decode pass.
    pub fn state(&self) -> State {
        self.decoder.state()
    }
}

impl<R: Read> Iterator for Records<'_, R> {
    type Item = DecodeResult;

    fn next(&mut self) -> Option<Self::Item> {
        self.decoder.next_result(&mut self.signal)
    }
}

impl<R: Read> FusedIterator for Records<'_, R> {}
