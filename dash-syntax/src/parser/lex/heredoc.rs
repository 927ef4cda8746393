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

//! Here-document body collection.
//!
//! A `<<` redirection only records its delimiter when parsed; the document
//! body lies further down the input, after the newline that ends the current
//! command line. The parser queues each document and drains the queue here
//! when that newline is reached, re-entering the word builder in
//! single-quote mode (quoted delimiter, literal body) or double-quote mode
//! (unquoted delimiter, expandable body).

use super::word::{HereDocMode, SyntaxKind};
use crate::parser::core::Parser;
use crate::parser::error::Result;
use crate::syntax::HereDoc;
use std::rc::Rc;

/// A here-document whose body has not been read yet.
#[derive(Clone, Debug)]
pub(crate) struct PendingHereDoc {
    pub doc: Rc<HereDoc>,
    /// Unquoted delimiter: the body is read in double-quote mode.
    pub expand: bool,
}

impl Parser {
    /// Reads the bodies of all pending here-documents, in queue order.
    pub(crate) fn parse_heredocs(&mut self) -> Result<()> {
        let pending = std::mem::take(&mut self.heredocs);
        for heredoc in pending {
            let (first, kind) = if heredoc.expand {
                (self.pgetc_eatbnl(), SyntaxKind::DoubleQuote)
            } else {
                (self.pgetc(), SyntaxKind::SingleQuote)
            };
            let mode = HereDocMode {
                eofmark: &heredoc.doc.delimiter,
                strip_tabs: heredoc.doc.strip_tabs,
            };
            self.read_word(first, kind, Some(&mode))?;
            let body = self.token.take_word();
            heredoc
                .doc
                .body
                .set(body)
                .expect("here-document body must be read just once");
        }
        Ok(())
    }
}
