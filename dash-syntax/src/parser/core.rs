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

//! The parsing context and its public surface.
//!
//! A [`Parser`] owns everything one parse needs: the stack of character
//! sources, the tokeniser state (syntax frames, token flags, the last token
//! and its pushback slot), and the queues of pending here-documents. Distinct
//! parsers are fully independent; a single parser must not be shared between
//! threads.
//!
//! Typical use: create a parser, push one or more sources, and call
//! [`next_command`](Parser::next_command) until it returns [`Node::Eof`].
//!
//! ```
//! use dash_syntax::parser::Parser;
//! use dash_syntax::syntax::Node;
//!
//! let mut parser = Parser::new();
//! parser.push_str("echo hello\n");
//! let command = parser.next_command().unwrap();
//! assert!(matches!(command, Node::Cmd { .. }));
//! let end = parser.next_command().unwrap();
//! assert!(end.is_eof());
//! ```

use super::error::{Error, InternalError, Result, SyntaxError};
use super::lex::{PendingHereDoc, PendingRedir, SyntaxFrame, Token, TokenFlags, TokenId};
use crate::source::SourceStack;
use crate::syntax::Node;
use std::path::Path;
use tracing::debug;

/// The shell command parser.
///
/// All state is per-parser; there are no process-wide tables. Dropping the
/// parser releases every source and all trees not yet handed to the caller in
/// one sweep.
pub struct Parser {
    /// Stack of open character sources.
    pub(crate) src: SourceStack,
    /// Flags steering the next `read_token` call.
    pub(crate) flags: TokenFlags,
    /// The last token returned by the tokeniser.
    pub(crate) token: Token,
    /// When set, the next `read_token` re-delivers the last token.
    pub(crate) pushback: bool,
    /// Whether the last word token contained any quoting.
    pub(crate) quote_flag: bool,
    /// Last character read, for diagnostics.
    pub(crate) cur_char: u8,
    /// The two characters read before `cur_char`, oldest first.
    pub(crate) prev_chars: [u8; 2],
    /// Tokeniser syntax mode stack.
    pub(crate) frames: Vec<SyntaxFrame>,
    /// Redirection recognised by the tokeniser, awaiting its operand.
    pub(crate) pending_redir: Option<PendingRedir>,
    /// Here-documents whose bodies have not been read yet.
    pub(crate) heredocs: Vec<PendingHereDoc>,
    /// Here-doc queues saved across nested command-substitution parses.
    pub(crate) saved_heredocs: Vec<Vec<PendingHereDoc>>,
}

impl Parser {
    /// Creates a parser with no sources.
    ///
    /// Until a source is pushed, [`next_command`](Self::next_command) reports
    /// end of input.
    #[must_use]
    pub fn new() -> Self {
        Parser {
            src: SourceStack::new(),
            flags: TokenFlags::empty(),
            token: Token::default(),
            pushback: false,
            quote_flag: false,
            cur_char: 0,
            prev_chars: [0; 2],
            frames: Vec::new(),
            pending_redir: None,
            heredocs: Vec::new(),
            saved_heredocs: Vec::new(),
        }
    }

    /// Pushes an in-memory source on top of the source stack.
    ///
    /// The new source is read before any source pushed earlier; sources pop
    /// automatically once exhausted.
    pub fn push_str(&mut self, code: &str) {
        self.src.push_str(code);
    }

    /// Like [`push_str`](Self::push_str), taking ownership of the bytes.
    pub fn push_string(&mut self, code: String) {
        self.src.push_bytes(code.into_bytes());
    }

    /// Opens the named file and pushes it as a source.
    pub fn push_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.src.push_file(path.as_ref()).map_err(|e| Error {
            cause: e.into(),
            line: 0,
        })
    }

    /// Reads and parses the next top-level command.
    ///
    /// Empty lines and lone separators are skipped; the first non-empty
    /// command tree is returned. At the end of input the result is
    /// [`Node::Eof`], idempotently, until another source is pushed. A syntax
    /// error aborts only the current command: no partial tree is returned and
    /// the parser stays usable.
    pub fn next_command(&mut self) -> Result<Node> {
        self.pushback = false;
        self.heredocs.clear();
        loop {
            self.flags = TokenFlags::empty();
            match self.list() {
                Ok(Some(node)) => {
                    debug!(eof = node.is_eof(), "parsed command");
                    return Ok(node);
                }
                Ok(None) => {}
                Err(error) => {
                    debug!(%error, "parse failed");
                    return Err(error);
                }
            }
        }
    }

    /// The last internal error recorded on this parser, if any.
    ///
    /// [`InternalError::NoSource`] is recorded whenever input runs dry and is
    /// benign; the other codes accompany an `Err` from
    /// [`next_command`](Self::next_command).
    #[must_use]
    pub fn internal_error(&self) -> Option<InternalError> {
        self.src.error()
    }

    /// Builds a syntax error at the current source line.
    pub(crate) fn syntax_error(&self, cause: SyntaxError) -> Error {
        Error {
            cause: cause.into(),
            line: self.src.line(),
        }
    }

    /// Builds an `Expected` error for a required token that did not appear.
    pub(crate) fn expected(&self, token: TokenId) -> Error {
        self.syntax_error(SyntaxError::Expected(token))
    }

    /// Fails on internal errors that make further tokenising meaningless.
    pub(crate) fn check_internal(&self) -> Result<()> {
        match self.src.error() {
            Some(error @ (InternalError::NoUnget | InternalError::NoGetChar)) => Err(Error {
                cause: error.into(),
                line: self.src.line(),
            }),
            _ => Ok(()),
        }
    }

    /// Saves the pending here-doc queue before a nested command parse.
    pub(crate) fn push_heredoc_list(&mut self) {
        let saved = std::mem::take(&mut self.heredocs);
        self.saved_heredocs.push(saved);
    }

    /// Restores the here-doc queue saved by
    /// [`push_heredoc_list`](Self::push_heredoc_list).
    pub(crate) fn pop_heredoc_list(&mut self) {
        self.heredocs = self.saved_heredocs.pop().unwrap_or_default();
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Parser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Parser")
            .field("flags", &self.flags)
            .field("token", &self.token.id)
            .field("pushback", &self.pushback)
            .field("cur_char", &self.cur_char)
            .field("prev_chars", &self.prev_chars)
            .field("line", &self.src.line())
            .finish_non_exhaustive()
    }
}
