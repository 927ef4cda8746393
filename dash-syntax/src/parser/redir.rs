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

//! Redirection operands.
//!
//! After the tokeniser recognises a redirection operator, the grammar reads
//! the word that follows it here and completes the redirection: a file name,
//! a duplication target, or a here-document delimiter. Here-documents are
//! additionally queued so their bodies can be read at the end of the command
//! line.

use super::core::Parser;
use super::error::{Result, SyntaxError};
use super::lex::{PendingHereDoc, PendingRedir, TokenFlags, TokenId};
use crate::syntax::{DupTarget, HereDoc, Redir};
use std::cell::OnceCell;
use std::rc::Rc;

impl Parser {
    /// Reads the operand of the pending redirection and completes it.
    pub(crate) fn parse_fname(&mut self) -> Result<Redir> {
        let pending = self
            .pending_redir
            .take()
            .expect("redirection token without a pending operator");

        if matches!(pending, PendingRedir::Here { .. }) {
            self.flags = TokenFlags::CHKEOFMARK;
        }
        let tok = self.read_token()?;
        self.flags.remove(TokenFlags::CHKEOFMARK);
        if tok != TokenId::Word {
            return Err(self.syntax_error(SyntaxError::Unexpected(tok)));
        }

        match pending {
            PendingRedir::Here { fd, strip_tabs } => {
                // An unquoted delimiter leaves the body subject to expansion.
                let expand = !self.quote_flag;
                let delimiter = self.token.take_word().unquoted_text();
                let doc = Rc::new(HereDoc {
                    delimiter,
                    strip_tabs,
                    body: OnceCell::new(),
                });
                self.heredocs.push(PendingHereDoc {
                    doc: Rc::clone(&doc),
                    expand,
                });
                Ok(Redir::Here { fd, expand, doc })
            }
            PendingRedir::Dup { op, fd } => {
                let target = if self.token.text.len() == 1 && self.token.text[0].is_ascii_digit()
                {
                    DupTarget::Fd(u32::from(self.token.text[0] - b'0'))
                } else if self.token.text == *b"-" {
                    DupTarget::Close
                } else {
                    DupTarget::Var(self.token.take_word())
                };
                Ok(Redir::Dup { op, fd, target })
            }
            PendingRedir::File { op, fd } => Ok(Redir::File {
                op,
                fd,
                fname: self.token.take_word(),
            }),
        }
    }
}
