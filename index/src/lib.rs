//! Decode the offset index of a segmented multistream archive.
//!
//! # Overview
//!
//! A multistream archive (such as a Wikipedia `pages-articles-multistream` dump) is a
//! concatenation of independently compressed segments. It ships with an index stream in
//! which every line maps the byte offset of a segment to an entity stored inside it:
//!
//! ```txt
//! 540:10:AccessibleComputing
//! 540:12:Anarchism
//! 706858:23:AssistiveTechnology
//! ```
//!
//! The three fields are the segment offset, the record identifier, and a label (the rest of
//! the line, which may itself contain colons).
//!
//! This crate turns an index stream (optionally compressed, see [source::Compression]) into
//! an ordered sequence of [Record]s. Each element of the sequence is a [DecodeResult]: a
//! malformed line, a read failure, or a cancellation request is yielded as an error element
//! and ends the pass. While iterating, the [Decoder] collects the distinct segment offsets it
//! has seen (in first-seen order), available through [Decoder::offsets].
//!
//! # Example
//!
//! ```rust
//! use multistream_index::{signal::Signal, source::Config, Decoder};
//! use std::io::Cursor;
//!
//! let data = "540:10:AccessibleComputing\n540:12:Anarchism\n706858:23:AssistiveTechnology\n";
//! let mut decoder = Decoder::init(Some(Cursor::new(data)), Config::default()).unwrap();
//! for result in decoder.decode(&Signal::Never) {
//!     let record = result.unwrap();
//!     println!("{} -> {}", record.offset(), record.label());
//! }
//! assert_eq!(decoder.offsets().as_slice(), &[540, 706858]);
//! ```
//!
//! # Status
//!
//! `multistream-index` is **ALPHA** software and is not yet recommended for production use. Developers should
//! expect breaking changes and occasional instability.

mod decoder;
pub use decoder::{DecodeResult, Decoder, Records, State, Termination};
mod error;
pub use error::Error;
mod offsets;
pub use offsets::Offsets;
pub mod record;
pub use record::Record;
pub mod signal;
pub mod source;
