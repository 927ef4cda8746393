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

//! Pipeline parsing.

use super::core::Parser;
use super::error::Result;
use super::lex::{TokenFlags, TokenId};
use crate::syntax::Node;

impl Parser {
    /// Parses `[!] command (| command)*`.
    ///
    /// A single command stays bare; two or more become a
    /// [`Pipe`](Node::Pipe). A leading `!` wraps the result in
    /// [`Not`](Node::Not).
    pub(crate) fn pipeline(&mut self) -> Result<Node> {
        let mut negate = false;
        if self.read_token()? == TokenId::Bang {
            negate = true;
            self.flags.insert(TokenFlags::CHKALIAS | TokenFlags::CHKKWD);
            self.flags.remove(TokenFlags::CHKNL);
        } else {
            self.pushback = true;
        }

        let mut n1 = self.command()?;
        if self.read_token()? == TokenId::Pipe {
            let mut commands = vec![n1];
            loop {
                self.flags
                    .insert(TokenFlags::CHKALIAS | TokenFlags::CHKKWD | TokenFlags::CHKNL);
                commands.push(self.command()?);
                if self.read_token()? != TokenId::Pipe {
                    break;
                }
            }
            n1 = Node::Pipe {
                background: false,
                commands,
            };
        }
        self.pushback = true;

        if negate {
            Ok(Node::Not(Box::new(n1)))
        } else {
            Ok(n1)
        }
    }
}
