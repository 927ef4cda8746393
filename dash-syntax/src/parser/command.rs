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

//! Parsing of single commands, compound commands in particular.

use super::core::Parser;
use super::error::{Result, SyntaxError};
use super::lex::{TokenFlags, TokenId};
use crate::syntax::{CTLQUOTEMARK, CTLVAR, CaseItem, Node, VarSubst, Word};

fn boxed(node: Option<Node>) -> Option<Box<Node>> {
    node.map(Box::new)
}

impl Parser {
    /// Parses one command: a compound command with optional trailing
    /// redirections, or a simple command.
    pub(crate) fn command(&mut self) -> Result<Node> {
        let line = self.src.line();

        let (mut n1, closing) = match self.read_token()? {
            TokenId::If => (self.if_command()?, Some(TokenId::Fi)),
            TokenId::While => {
                let (condition, body) = self.loop_clauses()?;
                (Node::While { condition, body }, Some(TokenId::Done))
            }
            TokenId::Until => {
                let (condition, body) = self.loop_clauses()?;
                (Node::Until { condition, body }, Some(TokenId::Done))
            }
            TokenId::For => (self.for_command(line)?, Some(TokenId::Done)),
            TokenId::Case => (self.case_command(line)?, None),
            TokenId::OpenParen => {
                let body = self.list_nl()?;
                let subshell = Node::Subshell {
                    line,
                    body: boxed(body),
                    redirs: Vec::new(),
                };
                (subshell, Some(TokenId::CloseParen))
            }
            TokenId::OpenBrace => match self.list_nl()? {
                // A brace group adds no node of its own; its list is the
                // command.
                Some(body) => (body, Some(TokenId::CloseBrace)),
                None => return Err(self.expected(TokenId::CloseBrace)),
            },
            TokenId::Word | TokenId::Redirect => {
                self.pushback = true;
                return self.simple_command();
            }
            tok => return Err(self.syntax_error(SyntaxError::Unexpected(tok))),
        };

        if let Some(closing) = closing {
            if self.read_token()? != closing {
                return Err(self.expected(closing));
            }
        }

        // Trailing redirections apply to the whole compound command.
        self.flags.insert(TokenFlags::CHKALIAS | TokenFlags::CHKKWD);
        let mut redirs = Vec::new();
        while self.read_token()? == TokenId::Redirect {
            redirs.push(self.parse_fname()?);
            self.flags.insert(TokenFlags::CHKALIAS | TokenFlags::CHKKWD);
        }
        self.pushback = true;

        if !redirs.is_empty() {
            n1 = match n1 {
                Node::Subshell { line, body, .. } => Node::Subshell { line, body, redirs },
                other => Node::Redir {
                    line,
                    body: Box::new(other),
                    redirs,
                },
            };
        }
        Ok(n1)
    }

    /// Parses from after `if` up to (but not including) the `fi`.
    fn if_command(&mut self) -> Result<Node> {
        let test = self.list_nl()?;
        if self.read_token()? != TokenId::Then {
            return Err(self.expected(TokenId::Then));
        }
        let then_part = self.list_nl()?;

        let mut elifs = Vec::new();
        let tail;
        loop {
            match self.read_token()? {
                TokenId::Elif => {
                    let test = self.list_nl()?;
                    if self.read_token()? != TokenId::Then {
                        return Err(self.expected(TokenId::Then));
                    }
                    elifs.push((test, self.list_nl()?));
                }
                TokenId::Else => {
                    tail = boxed(self.list_nl()?);
                    break;
                }
                _ => {
                    self.pushback = true;
                    tail = None;
                    break;
                }
            }
        }

        let mut else_part = tail;
        for (test, then_part) in elifs.into_iter().rev() {
            else_part = Some(Box::new(Node::If {
                test: boxed(test),
                then_part: boxed(then_part),
                else_part,
            }));
        }
        Ok(Node::If {
            test: boxed(test),
            then_part: boxed(then_part),
            else_part,
        })
    }

    /// Parses the `cond; do body` clauses shared by `while` and `until`.
    #[allow(clippy::type_complexity)]
    fn loop_clauses(&mut self) -> Result<(Option<Box<Node>>, Option<Box<Node>>)> {
        let condition = self.list_nl()?;
        if self.read_token()? != TokenId::Do {
            return Err(self.expected(TokenId::Do));
        }
        let body = self.list_nl()?;
        Ok((boxed(condition), boxed(body)))
    }

    /// Parses from after `for` up to (but not including) the `done`.
    fn for_command(&mut self, line: u64) -> Result<Node> {
        if self.read_token()? != TokenId::Word
            || self.quote_flag
            || !good_name(&self.token.text)
        {
            return Err(self.syntax_error(SyntaxError::BadForVar));
        }
        let var = String::from_utf8_lossy(&self.token.text).into_owned();

        self.flags
            .insert(TokenFlags::CHKALIAS | TokenFlags::CHKKWD | TokenFlags::CHKNL);
        let words = if self.read_token()? == TokenId::In {
            let mut words = Vec::new();
            while self.read_token()? == TokenId::Word {
                words.push(self.token.take_word());
            }
            if self.token.id != TokenId::Newline && self.token.id != TokenId::Semi {
                return Err(self.syntax_error(SyntaxError::Unexpected(self.token.id)));
            }
            words
        } else {
            // No `in` clause: iterate over the positional parameters, as if
            // `in "$@"` had been written.
            let text = vec![
                CTLQUOTEMARK,
                CTLVAR,
                VarSubst::Normal.type_byte(false),
                b'@',
                b'=',
                CTLQUOTEMARK,
            ];
            if self.token.id != TokenId::Semi {
                self.pushback = true;
            }
            vec![Word {
                text,
                backquote: Vec::new(),
            }]
        };

        self.flags
            .insert(TokenFlags::CHKALIAS | TokenFlags::CHKKWD | TokenFlags::CHKNL);
        if self.read_token()? != TokenId::Do {
            return Err(self.expected(TokenId::Do));
        }
        let body = self.list_nl()?;
        Ok(Node::For {
            line,
            var,
            words,
            body: boxed(body),
        })
    }

    /// Parses from after `case` through the closing `esac`.
    fn case_command(&mut self, line: u64) -> Result<Node> {
        if self.read_token()? != TokenId::Word {
            return Err(self.expected(TokenId::Word));
        }
        let subject = self.token.take_word();

        self.flags
            .insert(TokenFlags::CHKALIAS | TokenFlags::CHKKWD | TokenFlags::CHKNL);
        if self.read_token()? != TokenId::In {
            return Err(self.expected(TokenId::In));
        }

        let mut items = Vec::new();
        self.flags.insert(TokenFlags::CHKKWD | TokenFlags::CHKNL);
        let mut tok = self.read_token()?;
        while tok != TokenId::Esac {
            if tok == TokenId::OpenParen {
                self.read_token()?;
            }
            let mut patterns = Vec::new();
            loop {
                if self.token.id != TokenId::Word {
                    return Err(self.syntax_error(SyntaxError::Unexpected(self.token.id)));
                }
                patterns.push(self.token.take_word());
                if self.read_token()? != TokenId::Pipe {
                    break;
                }
                self.read_token()?;
            }
            if self.token.id != TokenId::CloseParen {
                return Err(self.expected(TokenId::CloseParen));
            }
            let body = self.list_et()?;
            items.push(CaseItem { patterns, body });

            self.flags.insert(TokenFlags::CHKKWD | TokenFlags::CHKNL);
            tok = self.read_token()?;
            if tok != TokenId::Esac {
                if tok != TokenId::EndCase {
                    return Err(self.expected(TokenId::EndCase));
                }
                self.flags.insert(TokenFlags::CHKKWD | TokenFlags::CHKNL);
                tok = self.read_token()?;
            }
        }
        Ok(Node::Case {
            line,
            subject,
            items,
        })
    }
}

/// Tests if the bytes form a valid name for a variable or function.
pub(crate) fn good_name(text: &[u8]) -> bool {
    let Some((&first, rest)) = text.split_first() else {
        return false;
    };
    super::lex::is_name_start(first) && rest.iter().all(|&c| super::lex::is_name_cont(c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{FileOp, Redir};
    use assert_matches::assert_matches;

    fn parse_one(code: &str) -> Node {
        let mut parser = Parser::new();
        parser.push_str(code);
        parser.next_command().unwrap()
    }

    fn parse_err(code: &str) -> SyntaxError {
        let mut parser = Parser::new();
        parser.push_str(code);
        match parser.next_command().unwrap_err().cause {
            super::super::error::ErrorCause::Syntax(e) => e,
            other => panic!("not a syntax error: {other:?}"),
        }
    }

    fn cmd_name(node: &Node) -> &[u8] {
        match node {
            Node::Cmd { args, .. } => &args[0].text,
            other => panic!("not a simple command: {other:?}"),
        }
    }

    #[test]
    fn if_then_fi() {
        assert_matches!(parse_one("if true; then echo ok; fi"), Node::If { test, then_part, else_part } => {
            assert_eq!(cmd_name(&test.unwrap()), b"true");
            assert_eq!(cmd_name(&then_part.unwrap()), b"echo");
            assert_eq!(else_part, None);
        });
    }

    #[test]
    fn if_with_else() {
        assert_matches!(parse_one("if a; then b; else c; fi"), Node::If { else_part, .. } => {
            assert_eq!(cmd_name(&else_part.unwrap()), b"c");
        });
    }

    #[test]
    fn elif_chains_nest_in_the_else_branch() {
        let node = parse_one("if a; then b; elif c; then d; else e; fi");
        assert_matches!(node, Node::If { test, else_part, .. } => {
            assert_eq!(cmd_name(&test.unwrap()), b"a");
            assert_matches!(*else_part.unwrap(), Node::If { test, then_part, else_part } => {
                assert_eq!(cmd_name(&test.unwrap()), b"c");
                assert_eq!(cmd_name(&then_part.unwrap()), b"d");
                assert_eq!(cmd_name(&else_part.unwrap()), b"e");
            });
        });
    }

    #[test]
    fn if_missing_then_is_an_error() {
        assert_eq!(
            parse_err("if true; echo ok; fi"),
            SyntaxError::Expected(TokenId::Then)
        );
    }

    #[test]
    fn if_missing_fi_is_an_error() {
        assert_eq!(
            parse_err("if a; then b; done"),
            SyntaxError::Expected(TokenId::Fi)
        );
    }

    #[test]
    fn while_loop() {
        assert_matches!(parse_one("while a; do b; done"), Node::While { condition, body } => {
            assert_eq!(cmd_name(&condition.unwrap()), b"a");
            assert_eq!(cmd_name(&body.unwrap()), b"b");
        });
    }

    #[test]
    fn until_loop() {
        assert_matches!(parse_one("until a\ndo b\ndone"), Node::Until { .. });
    }

    #[test]
    fn while_missing_do_is_an_error() {
        assert_eq!(
            parse_err("while a; b; done"),
            SyntaxError::Expected(TokenId::Do)
        );
    }

    #[test]
    fn for_loop_with_word_list() {
        let node = parse_one("for a in 1 3 5; do f $a; done");
        assert_matches!(node, Node::For { var, words, body, .. } => {
            assert_eq!(var, "a");
            assert_eq!(words, [
                Word::from_text(*b"1"),
                Word::from_text(*b"3"),
                Word::from_text(*b"5"),
            ]);
            assert_matches!(*body.unwrap(), Node::Cmd { ref args, .. } => {
                assert_eq!(args[0].text, b"f");
                assert_eq!(args[1].text, [CTLVAR, 0x21, b'a', b'=']);
            });
        });
    }

    #[test]
    fn for_loop_without_in_iterates_over_positionals() {
        assert_matches!(parse_one("for x; do y; done"), Node::For { words, .. } => {
            assert_eq!(words.len(), 1);
            assert_eq!(
                words[0].text,
                [CTLQUOTEMARK, CTLVAR, 0x21, b'@', b'=', CTLQUOTEMARK]
            );
        });
        assert_matches!(parse_one("for x do y; done"), Node::For { .. });
    }

    #[test]
    fn for_loop_with_newline_separated_word_list() {
        assert_matches!(parse_one("for a in 1 2\ndo b; done"), Node::For { words, .. } => {
            assert_eq!(words.len(), 2);
        });
    }

    #[test]
    fn bad_for_variable_is_an_error() {
        assert_eq!(parse_err("for 1x in a; do b; done"), SyntaxError::BadForVar);
        assert_eq!(parse_err("for 'a' in b; do c; done"), SyntaxError::BadForVar);
    }

    #[test]
    fn case_with_two_items() {
        let node = parse_one("case $x in a) f;; b|c) g;; esac");
        assert_matches!(node, Node::Case { subject, items, .. } => {
            assert_eq!(subject.text[0], CTLVAR);
            assert_eq!(items.len(), 2);
            assert_eq!(items[0].patterns, [Word::from_text(*b"a")]);
            assert_eq!(cmd_name(items[0].body.as_ref().unwrap()), b"f");
            assert_eq!(items[1].patterns.len(), 2);
        });
    }

    #[test]
    fn case_item_with_open_paren_prefix() {
        let node = parse_one("case x in (a) f;; esac");
        assert_matches!(node, Node::Case { items, .. } => {
            assert_eq!(items[0].patterns, [Word::from_text(*b"a")]);
        });
    }

    #[test]
    fn case_last_item_may_omit_the_separator() {
        let node = parse_one("case x in a) f ;; b) g esac");
        assert_matches!(node, Node::Case { items, .. } => {
            assert_eq!(items.len(), 2);
        });
    }

    #[test]
    fn case_item_with_empty_body() {
        let node = parse_one("case x in a) ;; esac");
        assert_matches!(node, Node::Case { items, .. } => {
            assert_eq!(items[0].body, None);
        });
    }

    #[test]
    fn case_missing_in_is_an_error() {
        assert_eq!(parse_err("case x a) f;; esac"), SyntaxError::Expected(TokenId::In));
    }

    #[test]
    fn subshell() {
        assert_matches!(parse_one("(a; b)"), Node::Subshell { body, redirs, .. } => {
            assert_matches!(*body.unwrap(), Node::Semi(_, _));
            assert_eq!(redirs, []);
        });
    }

    #[test]
    fn subshell_keeps_redirections_on_itself() {
        assert_matches!(parse_one("(a) > f"), Node::Subshell { redirs, .. } => {
            assert_matches!(&redirs[0], Redir::File { op: FileOp::To, fd: 1, fname } => {
                assert_eq!(fname.text, b"f");
            });
        });
    }

    #[test]
    fn brace_group_is_transparent() {
        assert_matches!(parse_one("{ a; b; }"), Node::Semi(_, _));
    }

    #[test]
    fn redirected_compound_gets_a_redir_wrapper() {
        let node = parse_one("if a; then b; fi < in > out");
        assert_matches!(node, Node::Redir { body, redirs, .. } => {
            assert_matches!(*body, Node::If { .. });
            assert_eq!(redirs.len(), 2);
        });
    }

    #[test]
    fn unclosed_subshell_is_an_error() {
        assert_eq!(
            parse_err("(a; b"),
            SyntaxError::Expected(TokenId::CloseParen)
        );
    }

    #[test]
    fn keywords_lose_their_meaning_in_argument_position() {
        assert_matches!(parse_one("echo if then fi"), Node::Cmd { args, .. } => {
            assert_eq!(args.len(), 4);
            assert_eq!(args[1].text, b"if");
        });
    }

    #[test]
    fn good_name_accepts_names_only() {
        assert!(good_name(b"a"));
        assert!(good_name(b"_private"));
        assert!(good_name(b"var2"));
        assert!(!good_name(b""));
        assert!(!good_name(b"2var"));
        assert!(!good_name(b"a-b"));
        assert!(!good_name(b"a=b"));
    }
}
