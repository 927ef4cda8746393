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

//! Command lists and and-or lists.

use super::core::Parser;
use super::error::{Result, SyntaxError};
use super::lex::{TokenFlags, TokenId};
use crate::syntax::Node;

impl Parser {
    /// Parses a command list in which newlines separate items.
    ///
    /// Used for the bodies of compound commands; the list ends at the
    /// block-closing keyword, which is left for the caller.
    pub(crate) fn list_nl(&mut self) -> Result<Option<Node>> {
        self.flags.insert(TokenFlags::CHKNL);
        self.flags.remove(TokenFlags::CHKENDTOK);
        self.list()
    }

    /// Like [`list_nl`](Self::list_nl), but an end-of-block token may also
    /// appear first (an empty `case` body, for example).
    pub(crate) fn list_et(&mut self) -> Result<Option<Node>> {
        self.flags.insert(TokenFlags::CHKNL | TokenFlags::CHKENDTOK);
        self.list()
    }

    /// Parses a list of and-or items separated by `;`, `&`, or newlines.
    ///
    /// Consecutive items become left-leaning [`Semi`](Node::Semi) binaries; a
    /// trailing `&` puts its item in the background. Without `CHKNL` the
    /// list ends at the first newline; with it, the list runs on until an
    /// end-of-block token or the end of input. `Ok(None)` means the list was
    /// empty.
    pub(crate) fn list(&mut self) -> Result<Option<Node>> {
        let chknl = self.flags.contains(TokenFlags::CHKNL);
        let mut check_end = self.flags.contains(TokenFlags::CHKENDTOK);
        let mut n1: Option<Node> = None;
        loop {
            self.flags.insert(TokenFlags::CHKALIAS | TokenFlags::CHKKWD);
            self.flags.set(TokenFlags::CHKNL, chknl);
            let tok = self.read_token()?;
            match tok {
                TokenId::Newline => {
                    self.parse_heredocs()?;
                    return Ok(n1);
                }
                TokenId::Eof => {
                    if n1.is_none() && !chknl {
                        n1 = Some(Node::Eof);
                    }
                    self.parse_heredocs()?;
                    self.pushback = true;
                    return Ok(n1);
                }
                // An item may be empty; a lone `;` makes an empty list.
                TokenId::Semi => continue,
                _ => {}
            }
            self.pushback = true;
            if check_end && tok.is_end_of_list() {
                return Ok(n1);
            }
            check_end = chknl;

            let mut n2 = self.and_or()?;
            let tok = self.read_token()?;
            if tok == TokenId::Background {
                n2 = self.into_background(n2);
            }
            n1 = Some(match n1 {
                None => n2,
                Some(n1) => Node::Semi(Box::new(n1), Box::new(n2)),
            });
            match tok {
                TokenId::Eof => {
                    self.parse_heredocs()?;
                    self.pushback = true;
                    return Ok(n1);
                }
                TokenId::Newline => {
                    // Replayed at the top of the loop, where pending
                    // here-documents are read.
                    self.pushback = true;
                }
                TokenId::Background | TokenId::Semi => {}
                _ => {
                    if !chknl {
                        return Err(self.syntax_error(SyntaxError::Unexpected(tok)));
                    }
                    self.pushback = true;
                    return Ok(n1);
                }
            }
        }
    }

    /// Parses `pipeline (&& pipeline | "||" pipeline)*`, left-leaning.
    pub(crate) fn and_or(&mut self) -> Result<Node> {
        let mut n1 = self.pipeline()?;
        loop {
            let make = match self.read_token()? {
                TokenId::AndAnd => Node::And,
                TokenId::OrOr => Node::Or,
                _ => {
                    self.pushback = true;
                    return Ok(n1);
                }
            };
            self.flags
                .insert(TokenFlags::CHKALIAS | TokenFlags::CHKKWD | TokenFlags::CHKNL);
            let n2 = self.pipeline()?;
            n1 = make(Box::new(n1), Box::new(n2));
        }
    }

    /// Converts a finished list item into its background form.
    fn into_background(&self, node: Node) -> Node {
        match node {
            Node::Pipe { commands, .. } => Node::Pipe {
                background: true,
                commands,
            },
            Node::Redir { line, body, redirs } => Node::Background { line, body, redirs },
            other => Node::Background {
                line: self.src.line(),
                body: Box::new(other),
                redirs: Vec::new(),
            },
        }
    }
}
