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

//! Recognition of redirection operators.
//!
//! The word builder routes here when a word consisting of at most two digits
//! ends at an unquoted `<` or `>`. The operator is classified and stored as
//! the pending redirection; its operand (file name, here-doc delimiter, or
//! duplication target) is read later by the grammar.

use crate::parser::core::Parser;
use crate::syntax::{DupOp, FileOp};

/// A redirection recognised by the tokeniser, waiting for its operand.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum PendingRedir {
    File { op: FileOp, fd: u32 },
    Dup { op: DupOp, fd: u32 },
    Here { fd: u32, strip_tabs: bool },
}

impl Parser {
    /// Classifies a redirection operator starting with `first` (`<` or `>`).
    ///
    /// `fd` is the explicit descriptor number parsed from the digits before
    /// the operator, if any; input operators default to 0 and output
    /// operators to 1.
    pub(crate) fn parse_redir(&mut self, first: u8, fd: Option<u32>) {
        let pending = if first == b'>' {
            let fd = fd.unwrap_or(1);
            let c = self.pgetc_eatbnl();
            match c {
                b'>' => PendingRedir::File {
                    op: FileOp::Append,
                    fd,
                },
                b'|' => PendingRedir::File {
                    op: FileOp::Clobber,
                    fd,
                },
                b'&' => PendingRedir::Dup { op: DupOp::ToFd, fd },
                _ => {
                    self.pungetc(c);
                    PendingRedir::File { op: FileOp::To, fd }
                }
            }
        } else {
            let fd = fd.unwrap_or(0);
            let c = self.pgetc_eatbnl();
            match c {
                b'<' => {
                    let c2 = self.pgetc_eatbnl();
                    let strip_tabs = c2 == b'-';
                    if !strip_tabs {
                        self.pungetc(c2);
                    }
                    PendingRedir::Here { fd, strip_tabs }
                }
                b'&' => PendingRedir::Dup {
                    op: DupOp::FromFd,
                    fd,
                },
                b'>' => PendingRedir::File {
                    op: FileOp::FromTo,
                    fd,
                },
                _ => {
                    self.pungetc(c);
                    PendingRedir::File { op: FileOp::From, fd }
                }
            }
        };
        self.pending_redir = Some(pending);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lex::TokenId;

    fn pending(code: &str) -> PendingRedir {
        let mut parser = Parser::new();
        parser.push_str(code);
        assert_eq!(parser.read_token().unwrap(), TokenId::Redirect);
        parser.pending_redir.unwrap()
    }

    #[test]
    fn output_operators() {
        assert_eq!(
            pending("> x"),
            PendingRedir::File {
                op: FileOp::To,
                fd: 1
            }
        );
        assert_eq!(
            pending(">> x"),
            PendingRedir::File {
                op: FileOp::Append,
                fd: 1
            }
        );
        assert_eq!(
            pending(">| x"),
            PendingRedir::File {
                op: FileOp::Clobber,
                fd: 1
            }
        );
        assert_eq!(
            pending(">& 2"),
            PendingRedir::Dup {
                op: DupOp::ToFd,
                fd: 1
            }
        );
    }

    #[test]
    fn input_operators() {
        assert_eq!(
            pending("< x"),
            PendingRedir::File {
                op: FileOp::From,
                fd: 0
            }
        );
        assert_eq!(
            pending("<> x"),
            PendingRedir::File {
                op: FileOp::FromTo,
                fd: 0
            }
        );
        assert_eq!(
            pending("<& 2"),
            PendingRedir::Dup {
                op: DupOp::FromFd,
                fd: 0
            }
        );
    }

    #[test]
    fn here_doc_operators() {
        assert_eq!(
            pending("<< E"),
            PendingRedir::Here {
                fd: 0,
                strip_tabs: false
            }
        );
        assert_eq!(
            pending("<<- E"),
            PendingRedir::Here {
                fd: 0,
                strip_tabs: true
            }
        );
    }

    #[test]
    fn explicit_descriptor_numbers() {
        assert_eq!(
            pending("2> x"),
            PendingRedir::File {
                op: FileOp::To,
                fd: 2
            }
        );
        assert_eq!(
            pending("12> x"),
            PendingRedir::File {
                op: FileOp::To,
                fd: 12
            }
        );
        assert_eq!(
            pending("0<& 1"),
            PendingRedir::Dup {
                op: DupOp::FromFd,
                fd: 0
            }
        );
    }

    #[test]
    fn quoted_digits_are_a_word_not_a_descriptor() {
        let mut parser = Parser::new();
        parser.push_str("'2'> x");
        assert_eq!(parser.read_token().unwrap(), TokenId::Word);
        assert_eq!(parser.read_token().unwrap(), TokenId::Redirect);
        assert_eq!(
            parser.pending_redir.unwrap(),
            PendingRedir::File {
                op: FileOp::To,
                fd: 1
            }
        );
    }

    #[test]
    fn long_numbers_are_words() {
        let mut parser = Parser::new();
        parser.push_str("123> x");
        assert_eq!(parser.read_token().unwrap(), TokenId::Word);
        assert_eq!(parser.token.text, b"123");
        assert_eq!(parser.read_token().unwrap(), TokenId::Redirect);
    }
}
