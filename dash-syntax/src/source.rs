// This file is part of dash-syntax, a parser for the POSIX shell command language.
// Copyright (C) 2026 the dash-syntax authors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Character sources feeding the tokeniser.
//!
//! The parser reads its input from a stack of [`Source`]s. Callers push named
//! files or in-memory strings onto the stack; the tokeniser itself pushes
//! synthetic string sources while matching here-document delimiters and while
//! parsing command substitutions. Reading is byte-oriented: the zero byte
//! serves as the end-of-input marker ([`PEOF`](crate::syntax::PEOF)), so a
//! literal NUL in the input terminates it.
//!
//! When the source on top of the stack runs out of data it is popped and
//! reading continues with the source below, so a script may be split over any
//! number of pushed sources. Sources pushed for command substitution are
//! *self-delimiting* instead: they keep yielding the end-of-input byte once
//! exhausted, which bounds the nested parse to exactly the substituted text.
//!
//! Every source carries a small unget ring so the tokeniser can push back the
//! bytes it has peeked at. A context-level ring covers the case where the
//! stack is empty. Both rings hold at most [`MAX_UNGET`] bytes; overflowing
//! one records [`InternalError::NoUnget`].

use crate::syntax::PEOF;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, trace};

/// Capacity of the unget rings, in bytes.
pub const MAX_UNGET: usize = 4;

/// Structural faults of the character stream machinery.
///
/// These are not errors in the user's shell program; they indicate that the
/// parser was driven without input or beyond the unget capacity, or that the
/// underlying file read failed.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum InternalError {
    /// A character was requested while the source stack was empty.
    #[error("No source available")]
    NoSource,
    /// An unget ring overflowed.
    #[error("No unget space available")]
    NoUnget,
    /// The underlying file read failed.
    #[error("No character available")]
    NoGetChar,
}

/// Fixed-capacity LIFO buffer of pushed-back bytes.
#[derive(Clone, Copy, Debug, Default)]
struct UngetRing {
    data: [u8; MAX_UNGET],
    len: usize,
}

impl UngetRing {
    fn push(&mut self, byte: u8) -> Result<(), ()> {
        if self.len >= MAX_UNGET {
            return Err(());
        }
        self.data[self.len] = byte;
        self.len += 1;
        Ok(())
    }

    fn pop(&mut self) -> Option<u8> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        Some(self.data[self.len])
    }
}

/// Outcome of reading one byte from a single source.
enum ReadChar {
    Byte(u8),
    NoData,
    Error,
}

/// The two concrete kinds of source.
///
/// This is a closed sum rather than a trait object: the set of source kinds
/// is finite and enumerated by design.
enum SourceKind {
    /// In-memory bytes with a read cursor.
    String { bytes: Vec<u8>, pos: usize },
    /// An open file streamed forward one byte at a time.
    ///
    /// The length is determined once when the file is opened; reading stops
    /// after that many bytes.
    File {
        reader: BufReader<File>,
        remaining: u64,
    },
}

/// One open byte source on the stack.
pub struct Source {
    kind: SourceKind,
    unget: UngetRing,
    line: u64,
    /// Keep yielding `PEOF` when exhausted instead of popping through to the
    /// source below.
    self_delimiting: bool,
}

impl Source {
    fn from_bytes(bytes: Vec<u8>) -> Self {
        Source {
            kind: SourceKind::String { bytes, pos: 0 },
            unget: UngetRing::default(),
            line: 1,
            self_delimiting: false,
        }
    }

    fn open_file(path: &Path) -> std::io::Result<Self> {
        let file = File::open(path)?;
        let remaining = file.metadata()?.len();
        Ok(Source {
            kind: SourceKind::File {
                reader: BufReader::new(file),
                remaining,
            },
            unget: UngetRing::default(),
            line: 1,
            self_delimiting: false,
        })
    }

    fn read_char(&mut self) -> ReadChar {
        if let Some(byte) = self.unget.pop() {
            return ReadChar::Byte(byte);
        }
        match &mut self.kind {
            SourceKind::String { bytes, pos } => match bytes.get(*pos) {
                Some(&byte) => {
                    *pos += 1;
                    ReadChar::Byte(byte)
                }
                None => ReadChar::NoData,
            },
            SourceKind::File { reader, remaining } => {
                if *remaining == 0 {
                    return ReadChar::NoData;
                }
                let mut buf = [0; 1];
                match reader.read(&mut buf) {
                    Ok(0) => ReadChar::NoData,
                    Ok(_) => {
                        *remaining -= 1;
                        ReadChar::Byte(buf[0])
                    }
                    Err(error) => {
                        debug!(?error, "file source read failed");
                        ReadChar::Error
                    }
                }
            }
        }
    }

    /// Pushes one byte back into this source.
    ///
    /// A string source rewinds its cursor when the pushed-back byte is the
    /// one in front of it; otherwise, and always for file sources, the byte
    /// goes into the unget ring.
    fn unget_char(&mut self, byte: u8) -> Result<(), ()> {
        match &mut self.kind {
            SourceKind::String { bytes, pos }
                if self.unget.len == 0 && *pos > 0 && bytes[*pos - 1] == byte =>
            {
                *pos -= 1;
                Ok(())
            }
            _ => self.unget.push(byte),
        }
    }
}

impl std::fmt::Debug for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = match &self.kind {
            SourceKind::String { .. } => "String",
            SourceKind::File { .. } => "File",
        };
        f.debug_struct("Source")
            .field("kind", &kind)
            .field("line", &self.line)
            .finish()
    }
}

/// LIFO of open sources plus the context-level unget ring.
///
/// All reading goes through [`next_char`](Self::next_char), which hides the
/// stack discipline from the tokeniser: exhausted sources pop automatically
/// and the next byte comes from the source below.
#[derive(Debug, Default)]
pub struct SourceStack {
    sources: Vec<Source>,
    /// Bytes ungot while the stack was empty; drained before any source.
    pending: UngetRing,
    /// Line counter of the most recently popped source, for diagnostics
    /// after the input has run dry.
    last_line: u64,
    error: Option<InternalError>,
}

impl SourceStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes an in-memory source. The bytes are copied.
    pub fn push_str(&mut self, text: &str) {
        self.push_bytes(text.as_bytes().to_vec());
    }

    pub fn push_bytes(&mut self, bytes: Vec<u8>) {
        trace!(len = bytes.len(), "push string source");
        self.sources.push(Source::from_bytes(bytes));
    }

    /// Pushes a self-delimiting string source for a command substitution.
    ///
    /// Unlike an ordinary source, it yields `PEOF` forever once exhausted and
    /// must be removed with [`pop`](Self::pop) by the code that pushed it.
    pub fn push_substitution(&mut self, bytes: Vec<u8>) {
        trace!(len = bytes.len(), "push substitution source");
        let mut source = Source::from_bytes(bytes);
        source.self_delimiting = true;
        self.sources.push(source);
    }

    /// Opens the named file and pushes it as a source.
    pub fn push_file(&mut self, path: &Path) -> std::io::Result<()> {
        debug!(path = %path.display(), "push file source");
        let source = Source::open_file(path)?;
        self.sources.push(source);
        Ok(())
    }

    /// Removes the top source, closing any underlying file handle.
    pub fn pop(&mut self) {
        if let Some(source) = self.sources.pop() {
            trace!(?source, "pop source");
            self.last_line = source.line;
        }
    }

    /// Returns the next byte of input.
    ///
    /// Bytes ungot while the stack was empty come first. Otherwise the top
    /// source is read; when it has no more data it is popped and reading
    /// continues with the next source, until a byte is produced or the stack
    /// runs dry. An empty stack records [`InternalError::NoSource`] and
    /// yields `PEOF`.
    pub fn next_char(&mut self) -> u8 {
        if let Some(byte) = self.pending.pop() {
            return byte;
        }
        loop {
            let Some(source) = self.sources.last_mut() else {
                self.error = Some(InternalError::NoSource);
                return PEOF;
            };
            match source.read_char() {
                ReadChar::Byte(byte) => {
                    if byte == b'\n' {
                        source.line += 1;
                    }
                    return byte;
                }
                ReadChar::NoData => {
                    if source.self_delimiting {
                        return PEOF;
                    }
                    self.pop();
                }
                ReadChar::Error => {
                    self.error = Some(InternalError::NoGetChar);
                    return PEOF;
                }
            }
        }
    }

    /// Pushes one byte back onto the stream.
    ///
    /// The byte goes to the top source, or to the context-level ring when the
    /// stack is empty. Overflowing either ring records
    /// [`InternalError::NoUnget`].
    pub fn unget_char(&mut self, byte: u8) {
        let result = match self.sources.last_mut() {
            Some(source) => source.unget_char(byte),
            None => self.pending.push(byte),
        };
        if result.is_err() {
            self.error = Some(InternalError::NoUnget);
        }
    }

    /// Current line number of the top source; with the stack empty, the
    /// final line of the last exhausted source.
    pub fn line(&self) -> u64 {
        self.sources.last().map_or(self.last_line, |src| src.line)
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// The first internal error recorded on this stack, if any.
    pub fn error(&self) -> Option<InternalError> {
        self.error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn drain(stack: &mut SourceStack, n: usize) -> Vec<u8> {
        (0..n).map(|_| stack.next_char()).collect()
    }

    #[test]
    fn empty_stack_yields_peof_and_records_no_source() {
        let mut stack = SourceStack::new();
        assert_eq!(stack.next_char(), PEOF);
        assert_eq!(stack.error(), Some(InternalError::NoSource));
    }

    #[test]
    fn string_source_reads_in_order() {
        let mut stack = SourceStack::new();
        stack.push_str("ab");
        assert_eq!(drain(&mut stack, 3), [b'a', b'b', PEOF]);
    }

    #[test]
    fn later_source_is_read_first() {
        let mut stack = SourceStack::new();
        stack.push_str("first");
        stack.push_str("second");
        assert_eq!(drain(&mut stack, 11), b"secondfirst");
        assert_eq!(stack.next_char(), PEOF);
        assert!(stack.is_empty());
    }

    #[test]
    fn eof_is_idempotent() {
        let mut stack = SourceStack::new();
        stack.push_str("x");
        assert_eq!(stack.next_char(), b'x');
        assert_eq!(stack.next_char(), PEOF);
        assert_eq!(stack.next_char(), PEOF);
    }

    #[test]
    fn unget_rewinds_string_source() {
        let mut stack = SourceStack::new();
        stack.push_str("xy");
        assert_eq!(stack.next_char(), b'x');
        stack.unget_char(b'x');
        assert_eq!(stack.next_char(), b'x');
        assert_eq!(stack.next_char(), b'y');
        assert_eq!(stack.error(), None);
    }

    #[test]
    fn unget_capacity_is_four() {
        let mut stack = SourceStack::new();
        for byte in *b"abcd" {
            stack.unget_char(byte);
        }
        assert_eq!(stack.error(), None);
        stack.unget_char(b'e');
        assert_eq!(stack.error(), Some(InternalError::NoUnget));
    }

    #[test]
    fn pending_ring_is_read_before_sources() {
        let mut stack = SourceStack::new();
        stack.unget_char(b'p');
        stack.push_str("q");
        assert_eq!(stack.next_char(), b'p');
        assert_eq!(stack.next_char(), b'q');
    }

    #[test]
    fn unget_at_start_of_source_uses_the_ring() {
        let mut stack = SourceStack::new();
        stack.push_str("z");
        stack.unget_char(b'a');
        assert_eq!(stack.next_char(), b'a');
        assert_eq!(stack.next_char(), b'z');
        assert_eq!(stack.error(), None);
    }

    #[test]
    fn substitution_source_does_not_pop_through() {
        let mut stack = SourceStack::new();
        stack.push_str("outer");
        stack.push_substitution(b"in".to_vec());
        assert_eq!(drain(&mut stack, 4), [b'i', b'n', PEOF, PEOF]);
        stack.pop();
        assert_eq!(drain(&mut stack, 5), b"outer");
    }

    #[test]
    fn newlines_bump_the_line_counter() {
        let mut stack = SourceStack::new();
        stack.push_str("a\nb\nc");
        assert_eq!(stack.line(), 1);
        drain(&mut stack, 2);
        assert_eq!(stack.line(), 2);
        drain(&mut stack, 2);
        assert_eq!(stack.line(), 3);
    }

    #[test]
    fn file_source_reads_and_ungets() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"echo hi\n").unwrap();

        let mut stack = SourceStack::new();
        stack.push_file(file.path()).unwrap();
        assert_eq!(stack.next_char(), b'e');
        stack.unget_char(b'e');
        assert_eq!(drain(&mut stack, 8), b"echo hi\n");
        assert_eq!(stack.next_char(), PEOF);
        assert_eq!(stack.error(), None);
    }

    #[test]
    fn missing_file_reports_the_io_error() {
        let mut stack = SourceStack::new();
        let result = stack.push_file(Path::new("/no/such/file"));
        assert!(result.is_err());
        assert!(stack.is_empty());
    }
}
