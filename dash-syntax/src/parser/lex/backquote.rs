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

//! Command substitution, old style and new.
//!
//! Both styles leave a [`CTLBACKQ`] placeholder in the word text and the
//! parsed commands in the word's backquote list. The old style collects the
//! `` `…` `` body first, applying the historical backslash rules, then
//! re-parses it from a synthetic source; `$(…)` simply parses commands in
//! place up to the closing parenthesis. Either way the nested parse runs
//! with a fresh here-document queue so documents pending in the enclosing
//! command keep their order.

use super::core::TokenFlags;
use super::token::TokenId;
use super::word::{SyntaxKind, WordBuilder};
use crate::parser::core::Parser;
use crate::parser::error::{Result, SyntaxError};
use crate::syntax::{CTLBACKQ, Node, PEOF};

impl Parser {
    /// Parses `` `…` ``: collect the body, then parse it as a command list.
    pub(crate) fn parse_backquote_old(&mut self, word: &mut WordBuilder) -> Result<()> {
        let body = self.backquote_body()?;
        self.src.push_substitution(body);
        let commands = self.nested_command_list(None);
        self.src.pop();
        word.backquote.push(commands?);
        word.text.push(CTLBACKQ);
        Ok(())
    }

    /// Parses `$(…)`, the opening parenthesis already consumed.
    pub(crate) fn parse_backquote_new(&mut self, word: &mut WordBuilder) -> Result<()> {
        let commands = self.nested_command_list(Some(TokenId::CloseParen))?;
        word.backquote.push(commands);
        word.text.push(CTLBACKQ);
        Ok(())
    }

    /// Collects the raw body of an old-style substitution up to the closing
    /// backquote.
    fn backquote_body(&mut self) -> Result<Vec<u8>> {
        let dblquote = self.top().dblquote;
        self.push_frame(SyntaxKind::Backquote).dblquote = dblquote;
        let result = self.backquote_body_chars();
        self.frames.pop();
        result
    }

    fn backquote_body_chars(&mut self) -> Result<Vec<u8>> {
        let mut body = Vec::new();
        loop {
            let c = self.pgetc_eatbnl();
            match c {
                b'`' => return Ok(body),
                b'\\' => {
                    let c2 = self.pgetc();
                    if c2 == PEOF {
                        return Err(self.syntax_error(SyntaxError::BackquoteEof));
                    }
                    // `\\`, `` \` `` and `\$` collapse; inside double quotes
                    // `\"` does too. Any other escape keeps its backslash for
                    // the nested tokeniser.
                    if c2 != b'\\'
                        && c2 != b'`'
                        && c2 != b'$'
                        && !(self.top().dblquote && c2 == b'"')
                    {
                        body.push(b'\\');
                    }
                    body.push(c2);
                }
                PEOF => return Err(self.syntax_error(SyntaxError::BackquoteEof)),
                _ => body.push(c),
            }
        }
    }

    /// Parses the commands of a substitution with a fresh here-doc queue.
    ///
    /// With `end` set the list is read in place and must be closed by that
    /// token; without it the list runs to the end of the (self-delimiting)
    /// source pushed by the caller.
    fn nested_command_list(&mut self, end: Option<TokenId>) -> Result<Option<Node>> {
        self.push_heredoc_list();
        let saved_flags = self.flags;
        let saved_quote = self.quote_flag;
        self.flags = TokenFlags::empty();
        self.pushback = false;

        let result = match end {
            Some(end) => self.list_et().and_then(|commands| {
                if self.read_token()? == end {
                    Ok(commands)
                } else {
                    Err(self.expected(end))
                }
            }),
            None => self.list_nl(),
        };

        self.pop_heredoc_list();
        self.flags = saved_flags;
        self.quote_flag = saved_quote;
        self.pushback = false;
        result
    }
}
