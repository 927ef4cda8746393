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

//! Fundamental building blocks of the tokeniser.
//!
//! This module holds the token-flag record that steers each
//! [`read_token`](crate::parser::core::Parser::read_token) call, the
//! character-level readers (with and without escaped-newline folding), and
//! the operator-recognition loop that dispatches into word building.

use super::token::{TokenId, keyword};
use crate::parser::core::Parser;
use crate::parser::error::Result;
use crate::syntax::PEOF;
use bitflags::bitflags;

bitflags! {
    /// Flags steering a single `read_token` call.
    ///
    /// Callers set the flags they need before reading a token; the tokeniser
    /// consumes them. `CHKEOFMARK` survives the read (it covers the whole
    /// here-document delimiter word and is cleared by the redirection
    /// parser); `CHKENDTOK` is interpreted by the list parser itself.
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub(crate) struct TokenFlags: u8 {
        /// Check words for alias substitution. Recognised but a no-op: alias
        /// resolution is delegated to the embedding application.
        const CHKALIAS = 1 << 0;
        /// Check unquoted words against the reserved-word table.
        const CHKKWD = 1 << 1;
        /// Treat newlines as token separators: eat them, reading pending
        /// here-document bodies at each one.
        const CHKNL = 1 << 2;
        /// A here-document delimiter is being read; `$` and backquotes are
        /// literal.
        const CHKEOFMARK = 1 << 3;
        /// Stop the current list on any end-of-block token.
        const CHKENDTOK = 1 << 4;
    }
}

impl Parser {
    /// Reads one byte, remembering it for diagnostics.
    pub(crate) fn pgetc(&mut self) -> u8 {
        let c = self.src.next_char();
        self.note_char(c);
        c
    }

    /// Reads one byte, folding `\<newline>` line continuations.
    ///
    /// Any number of consecutive escaped newlines is invisible to the caller.
    /// A backslash followed by anything else yields the backslash, with the
    /// peeked byte pushed back.
    pub(crate) fn pgetc_eatbnl(&mut self) -> u8 {
        loop {
            let c = self.src.next_char();
            if c == b'\\' {
                let peeked = self.src.next_char();
                if peeked == b'\n' {
                    continue;
                }
                self.src.unget_char(peeked);
            }
            self.note_char(c);
            return c;
        }
    }

    /// Pushes one byte back onto the character stream.
    pub(crate) fn pungetc(&mut self, c: u8) {
        self.src.unget_char(c);
    }

    fn note_char(&mut self, c: u8) {
        self.prev_chars = [self.prev_chars[1], self.cur_char];
        self.cur_char = c;
    }

    /// Returns the identifier of the next token.
    ///
    /// The token's contents are left in the parser's token slot. The current
    /// [`TokenFlags`] are consumed: newlines are eaten under `CHKNL` (reading
    /// pending here-document bodies at each), and an unquoted word is
    /// reclassified as a reserved word under `CHKKWD`. The keyword check also
    /// applies to a token re-delivered after pushback, so a word pushed back
    /// in one context can become a keyword in the next.
    pub(crate) fn read_token(&mut self) -> Result<TokenId> {
        let saved = self.flags;
        let mut id = self.next_token()?;
        if saved.contains(TokenFlags::CHKNL) {
            while id == TokenId::Newline {
                self.parse_heredocs()?;
                id = self.next_token()?;
            }
        }
        self.flags &= TokenFlags::CHKEOFMARK;

        if id == TokenId::Word && !self.quote_flag && saved.contains(TokenFlags::CHKKWD) {
            if let Some(kwd) = keyword(&self.token.text) {
                self.token.id = kwd;
                id = kwd;
            }
        }
        // CHKALIAS is recognised here, but alias lookup is delegated.
        self.check_internal()?;
        Ok(id)
    }

    /// Recognises one raw token: an operator, a newline, end of input, or a
    /// word/redirection via the word builder.
    fn next_token(&mut self) -> Result<TokenId> {
        use TokenId::*;

        if self.pushback {
            self.pushback = false;
            return Ok(self.token.id);
        }

        loop {
            let c = self.pgetc_eatbnl();
            let id = match c {
                b' ' | b'\t' => continue,
                b'#' => {
                    let mut c = self.pgetc();
                    while c != b'\n' && c != PEOF {
                        c = self.pgetc();
                    }
                    self.pungetc(c);
                    continue;
                }
                b'\n' => Newline,
                PEOF => Eof,
                b'&' => self.two_char_operator(b'&', AndAnd, Background),
                b'|' => self.two_char_operator(b'|', OrOr, Pipe),
                b';' => self.two_char_operator(b';', EndCase, Semi),
                b'(' => OpenParen,
                b')' => CloseParen,
                _ => return self.read_word(c, super::word::SyntaxKind::Base, None),
            };
            self.token.id = id;
            return Ok(id);
        }
    }

    /// Distinguishes `xx` from `x` for the doubled operators.
    fn two_char_operator(&mut self, second: u8, double: TokenId, single: TokenId) -> TokenId {
        let c = self.pgetc_eatbnl();
        if c == second {
            double
        } else {
            self.pungetc(c);
            single
        }
    }
}
