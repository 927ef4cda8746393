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

//! Simple command and function definition parsing.

use super::command::good_name;
use super::core::Parser;
use super::error::{Result, SyntaxError};
use super::lex::{TokenFlags, TokenId, is_name_cont, is_name_start};
use crate::builtin::find_builtin;
use crate::syntax::{Node, Word};

/// Tests if the bytes have the form `name=…`.
fn is_assignment(text: &[u8]) -> bool {
    let mut len = 0;
    if text.first().is_some_and(|&c| is_name_start(c)) {
        len = 1;
        while text.get(len).is_some_and(|&c| is_name_cont(c)) {
            len += 1;
        }
    }
    len > 0 && text.get(len) == Some(&b'=')
}

impl Parser {
    /// Parses a simple command: assignment words, arguments, and
    /// redirections in any order.
    ///
    /// Assignments are only recognised before the first ordinary argument.
    /// When the first argument is directly followed by `(`, the command
    /// turns into a function definition instead.
    pub(crate) fn simple_command(&mut self) -> Result<Node> {
        let line = self.src.line();
        let mut assigns = Vec::new();
        let mut args = Vec::new();
        let mut redirs = Vec::new();
        let mut accept_assign = true;

        loop {
            self.flags = if accept_assign {
                TokenFlags::CHKALIAS
            } else {
                TokenFlags::empty()
            };
            match self.read_token()? {
                TokenId::Word => {
                    if accept_assign && is_assignment(&self.token.text) {
                        assigns.push(self.token.take_word());
                    } else {
                        args.push(self.token.take_word());
                        accept_assign = false;
                    }
                }
                TokenId::Redirect => redirs.push(self.parse_fname()?),
                TokenId::OpenParen
                    if args.len() == 1 && assigns.is_empty() && redirs.is_empty() =>
                {
                    return self.function_definition(args);
                }
                _ => {
                    self.pushback = true;
                    break;
                }
            }
        }

        let cmd = Node::Cmd {
            line,
            assigns,
            args,
            redirs: Vec::new(),
        };
        if redirs.is_empty() {
            Ok(cmd)
        } else {
            Ok(Node::Redir {
                line,
                body: Box::new(cmd),
                redirs,
            })
        }
    }

    /// Parses a function definition; the name word and the `(` have been
    /// consumed.
    fn function_definition(&mut self, mut args: Vec<Word>) -> Result<Node> {
        if self.read_token()? != TokenId::CloseParen {
            return Err(self.expected(TokenId::CloseParen));
        }
        let name = args.remove(0).text;
        if !good_name(&name) {
            return Err(self.syntax_error(SyntaxError::BadFuncName));
        }
        let name = String::from_utf8_lossy(&name).into_owned();
        if find_builtin(&name).is_some_and(|builtin| builtin.is_special()) {
            return Err(self.syntax_error(SyntaxError::BadFuncName));
        }

        self.flags
            .insert(TokenFlags::CHKALIAS | TokenFlags::CHKKWD | TokenFlags::CHKNL);
        let line = self.src.line();
        let body = self.command()?;
        Ok(Node::FunctionDef {
            line,
            name,
            body: Box::new(body),
        })
    }
}
