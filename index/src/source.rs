//! Normalize an input byte stream into a plain, buffered stream of index lines.

use crate::Error;
use bzip2::read::MultiBzDecoder;
use std::io::{self, BufRead, BufReader, Read};

/// Compression envelope of an index stream.
///
/// The envelope is chosen by the caller and never detected from the stream contents.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Compression {
    /// The stream is plain text.
    #[default]
    None,
    /// The stream is one or more concatenated bzip2 streams.
    Bzip2,
    /// The stream is zstd compressed.
    Zstd,
}

/// Configuration for a [Source].
#[derive(Clone, Debug, Default)]
pub struct Config {
    /// Decompression stage inserted in front of the line reader.
    pub compression: Compression,
}

impl Config {
    /// Configuration for a stream that is (or is not) bzip2 compressed.
    pub fn compressed(compressed: bool) -> Self {
        Self {
            compression: if compressed {
                Compression::Bzip2
            } else {
                Compression::None
            },
        }
    }
}

enum Inner<R: Read> {
    Plain(BufReader<R>),
    Bzip2(BufReader<MultiBzDecoder<R>>),
    Zstd(BufReader<zstd::stream::read::Decoder<'static, BufReader<R>>>),
}

/// A buffered, decompressed view of an index stream.
///
/// Construction never reads from the underlying stream. Errors raised by a
/// decompression stage (corrupt or truncated input) surface as read errors.
pub struct Source<R: Read> {
    inner: Inner<R>,
    compression: Compression,
}

impl<R: Read> Source<R> {
    /// Wrap `reader` according to `cfg`.
    ///
    /// Returns [Error::EmptyInput] if no reader is provided.
    pub fn new(reader: Option<R>, cfg: Config) -> Result<Self, Error> {
        let reader = reader.ok_or(Error::EmptyInput)?;
        let inner = match cfg.compression {
            Compression::None => Inner::Plain(BufReader::new(reader)),
            Compression::Bzip2 => Inner::Bzip2(BufReader::new(MultiBzDecoder::new(reader))),
            Compression::Zstd => {
                Inner::Zstd(BufReader::new(zstd::stream::read::Decoder::new(reader)?))
            }
        };
        Ok(Self {
            inner,
            compression: cfg.compression,
        })
    }

    /// The decompression stage applied to the underlying stream.
    pub fn compression(&self) -> Compression {
        self.compression
    }
}

impl<R: Read> Read for Source<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match &mut self.inner {
            Inner::Plain(r) => r.read(buf),
            Inner::Bzip2(r) => r.read(buf),
            Inner::Zstd(r) => r.read(buf),
        }
    }
}

impl<R: Read> BufRead for Source<R> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        match &mut self.inner {
            Inner::Plain(r) => r.fill_buf(),
            Inner::Bzip2(r) => r.fill_buf(),
            Inner::Zstd(r) => r.fill_buf(),
        }
    }

    fn consume(&mut self, amt: usize) {
        match &mut self.inner {
            Inner::Plain(r) => r.consume(amt),
            Inner::Bzip2(r) => r.consume(amt),
            Inner::Zstd(r) => r.consume(amt),
        }
    }
}
