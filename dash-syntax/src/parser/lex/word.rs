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

//! The word builder.
//!
//! [`read_word`](crate::parser::core::Parser::read_word) assembles a word (or
//! recognises a redirection operator) one character at a time. Each character
//! is classified against the syntax mode on top of the mode stack; quoting
//! constructs flip the mode of the current frame, while substitutions push
//! and pop whole frames. The same routine reads here-document bodies, where a
//! delimiter check runs at the start of every physical line.

use super::core::TokenFlags;
use super::token::TokenId;
use crate::parser::core::Parser;
use crate::parser::error::{Result, SyntaxError};
use crate::syntax::{CTLENDARI, CTLENDVAR, CTLESC, CTLQUOTEMARK, Node, PEOF};

/// Tokeniser syntax modes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum SyntaxKind {
    /// Ordinary command text
    Base,
    /// Inside `'…'`
    SingleQuote,
    /// Inside `"…"`
    DoubleQuote,
    /// Inside `` `…` ``
    Backquote,
    /// Inside `$((…))`
    Arith,
}

/// One entry of the syntax mode stack.
#[derive(Clone, Copy, Debug)]
pub(crate) struct SyntaxFrame {
    pub kind: SyntaxKind,
    /// Open `${` substitutions awaiting their `}`.
    pub varnest: u32,
    /// Open parentheses inside arithmetic.
    pub parenlevel: u32,
    /// How many of the open substitutions began inside double quotes.
    pub dqvarnest: u32,
    /// A double quote opened inside the current substitution.
    pub innerdq: bool,
    /// This frame was pushed for a substitution and pops with its `}`.
    pub varpushed: bool,
    /// Double-quote context for backslash handling.
    pub dblquote: bool,
}

impl SyntaxFrame {
    pub(crate) fn new(kind: SyntaxKind) -> Self {
        SyntaxFrame {
            kind,
            varnest: 0,
            parenlevel: 0,
            dqvarnest: 0,
            innerdq: false,
            varpushed: false,
            dblquote: false,
        }
    }
}

/// Classification of one character under a syntax mode.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum CharClass {
    Word,
    Nl,
    Back,
    SQuote,
    DQuote,
    EndQuote,
    BQuote,
    Var,
    EndVar,
    Lp,
    Rp,
    Eof,
    Ctl,
    Spcl,
}

/// Returns the class of `c` under the given syntax mode.
fn syn_lookup(kind: SyntaxKind, c: u8) -> CharClass {
    use CharClass::*;
    use SyntaxKind::*;
    match c {
        PEOF => Eof,
        1..=7 => Ctl,
        b'\n' => match kind {
            Base | SingleQuote | DoubleQuote | Arith => Nl,
            Backquote => Word,
        },
        b'\\' => match kind {
            Base | DoubleQuote | Arith => Back,
            SingleQuote => Ctl,
            Backquote => Word,
        },
        b'\'' => match kind {
            Base => SQuote,
            SingleQuote => EndQuote,
            _ => Word,
        },
        b'"' => match kind {
            Base => DQuote,
            DoubleQuote => EndQuote,
            _ => Word,
        },
        b'`' => match kind {
            Base | DoubleQuote | Arith => BQuote,
            _ => Word,
        },
        b'$' => match kind {
            Base | DoubleQuote | Arith => Var,
            _ => Word,
        },
        b'}' => match kind {
            Base | DoubleQuote | Arith => EndVar,
            _ => Word,
        },
        b'(' => match kind {
            Base => Spcl,
            Arith => Lp,
            _ => Word,
        },
        b')' => match kind {
            Base => Spcl,
            Arith => Rp,
            _ => Word,
        },
        b'<' | b'>' | b';' | b'&' | b'|' | b' ' | b'\t' => match kind {
            Base => Spcl,
            _ => Word,
        },
        b'!' | b'*' | b'?' | b'[' | b'=' | b'~' | b':' | b'/' | b'-' | b']' => match kind {
            SingleQuote | DoubleQuote => Ctl,
            _ => Word,
        },
        _ => Word,
    }
}

/// First character of a variable name.
pub(crate) fn is_name_start(c: u8) -> bool {
    c == b'_' || c.is_ascii_alphabetic()
}

/// Subsequent character of a variable name.
pub(crate) fn is_name_cont(c: u8) -> bool {
    c == b'_' || c.is_ascii_alphanumeric()
}

/// Single-character special parameters (plus digits).
pub(crate) fn is_special(c: u8) -> bool {
    c.is_ascii_digit() || b"#?$!-*@".contains(&c)
}

/// A word under construction.
///
/// The text grows one byte at a time and is finished into the token when the
/// word ends; commands substituted within the word collect alongside, one
/// entry per `CTLBACKQ` placeholder (`None` for an empty substitution).
#[derive(Debug, Default)]
pub(crate) struct WordBuilder {
    pub(crate) text: Vec<u8>,
    pub(crate) backquote: Vec<Option<Node>>,
}

/// Here-document body mode for [`read_word`](Parser::read_word).
pub(crate) struct HereDocMode<'a> {
    pub eofmark: &'a [u8],
    pub strip_tabs: bool,
}

impl Parser {
    /// Returns the top syntax frame.
    pub(crate) fn top(&self) -> &SyntaxFrame {
        self.frames.last().expect("syntax stack must not be empty")
    }

    pub(crate) fn top_mut(&mut self) -> &mut SyntaxFrame {
        self.frames
            .last_mut()
            .expect("syntax stack must not be empty")
    }

    pub(crate) fn push_frame(&mut self, kind: SyntaxKind) -> &mut SyntaxFrame {
        self.frames.push(SyntaxFrame::new(kind));
        self.top_mut()
    }

    /// Reads a word token (or a redirection operator) starting at `first`.
    ///
    /// On success the token slot holds the result and the returned identifier
    /// is [`Word`](TokenId::Word) or [`Redirect`](TokenId::Redirect). With
    /// `heredoc` set, the call reads a here-document body instead: quote
    /// marks are not emitted, the delimiter is checked at each line start,
    /// and the accumulated lines form the resulting word.
    pub(crate) fn read_word(
        &mut self,
        first: u8,
        kind: SyntaxKind,
        heredoc: Option<&HereDocMode<'_>>,
    ) -> Result<TokenId> {
        let base_depth = self.frames.len();
        let result = self.read_word_in_frame(first, kind, heredoc);
        self.frames.truncate(base_depth);
        result
    }

    fn read_word_in_frame(
        &mut self,
        first: u8,
        kind: SyntaxKind,
        heredoc: Option<&HereDocMode<'_>>,
    ) -> Result<TokenId> {
        self.frames.push(SyntaxFrame::new(kind));
        self.quote_flag = false;
        let mut word = WordBuilder::default();
        let mut c = first;

        // Each iteration handles one physical line, so that here-document
        // delimiter matching reruns at every line start.
        loop {
            if let Some(hd) = heredoc {
                c = self.check_heredoc_end(hd, c);
            }

            let mut end_of_word = false;
            let mut next_line = false;
            while !end_of_word && !next_line {
                match syn_lookup(self.top().kind, c) {
                    CharClass::Nl => {
                        if self.top().kind == SyntaxKind::Base && self.top().varnest == 0 {
                            end_of_word = true;
                        } else {
                            word.text.push(b'\n');
                            c = if self.top().kind == SyntaxKind::SingleQuote {
                                self.pgetc()
                            } else {
                                self.pgetc_eatbnl()
                            };
                            next_line = true;
                        }
                    }
                    CharClass::Word => word.text.push(c),
                    CharClass::Ctl => {
                        if heredoc.is_none() || self.top().dblquote || self.top().varnest > 0 {
                            word.text.push(CTLESC);
                        }
                        word.text.push(c);
                    }
                    CharClass::Back => {
                        let c2 = self.pgetc();
                        if c2 == PEOF {
                            word.text.push(CTLESC);
                            word.text.push(b'\\');
                            self.pungetc(c2);
                        } else {
                            let top = self.top();
                            if top.dblquote
                                && c2 != b'\\'
                                && c2 != b'`'
                                && c2 != b'$'
                                && (c2 != b'"' || (heredoc.is_some() && top.varnest == 0))
                                && (c2 != b'}' || top.varnest == 0)
                            {
                                word.text.push(CTLESC);
                                word.text.push(b'\\');
                            }
                            word.text.push(CTLESC);
                            word.text.push(c2);
                            self.quote_flag = true;
                        }
                    }
                    CharClass::SQuote => {
                        self.top_mut().kind = SyntaxKind::SingleQuote;
                        if heredoc.is_none() {
                            word.text.push(CTLQUOTEMARK);
                        }
                    }
                    CharClass::DQuote => {
                        let top = self.top_mut();
                        top.kind = SyntaxKind::DoubleQuote;
                        top.dblquote = true;
                        if top.varnest > 0 {
                            top.innerdq = !top.innerdq;
                        }
                        if heredoc.is_none() {
                            word.text.push(CTLQUOTEMARK);
                        }
                    }
                    CharClass::EndQuote => {
                        if heredoc.is_some() && self.top().varnest == 0 {
                            word.text.push(c);
                        } else {
                            let top = self.top_mut();
                            if top.dqvarnest == 0 {
                                top.kind = SyntaxKind::Base;
                                top.dblquote = false;
                            }
                            if c == b'"' && top.varnest > 0 {
                                top.innerdq = !top.innerdq;
                            }
                            self.quote_flag = true;
                            if heredoc.is_none() {
                                word.text.push(CTLQUOTEMARK);
                            }
                        }
                    }
                    CharClass::Var => self.parse_sub(&mut word)?,
                    CharClass::EndVar => {
                        if !self.top().innerdq && self.top().varnest > 0 {
                            let (varnest, varpushed) = {
                                let top = self.top_mut();
                                top.varnest -= 1;
                                (top.varnest, top.varpushed)
                            };
                            if varnest == 0 && varpushed {
                                self.frames.pop();
                            } else if self.top().dqvarnest > 0 {
                                self.top_mut().dqvarnest -= 1;
                            }
                            word.text.push(CTLENDVAR);
                        } else {
                            word.text.push(c);
                        }
                    }
                    CharClass::Lp => {
                        self.top_mut().parenlevel += 1;
                        word.text.push(c);
                    }
                    CharClass::Rp => {
                        if self.top().parenlevel > 0 {
                            word.text.push(c);
                            self.top_mut().parenlevel -= 1;
                        } else {
                            let c2 = self.pgetc_eatbnl();
                            if c2 == b')' {
                                word.text.push(CTLENDARI);
                                self.frames.pop();
                            } else {
                                word.text.push(b')');
                                self.pungetc(c2);
                            }
                        }
                    }
                    CharClass::BQuote => {
                        if self.flags.contains(TokenFlags::CHKEOFMARK) {
                            word.text.push(b'`');
                        } else {
                            self.parse_backquote_old(&mut word)?;
                        }
                    }
                    CharClass::Eof => end_of_word = true,
                    CharClass::Spcl => {
                        if self.top().varnest > 0 {
                            word.text.push(c);
                        } else {
                            end_of_word = true;
                        }
                    }
                }
                if !end_of_word && !next_line {
                    c = if self.top().kind == SyntaxKind::SingleQuote {
                        self.pgetc()
                    } else {
                        self.pgetc_eatbnl()
                    };
                }
            }
            if end_of_word {
                break;
            }
        }

        let top = self.top();
        if top.kind == SyntaxKind::Arith {
            return Err(self.syntax_error(SyntaxError::Missing("))")));
        }
        if top.kind != SyntaxKind::Base && heredoc.is_none() {
            return Err(self.syntax_error(SyntaxError::UnterminatedString));
        }
        if top.varnest > 0 {
            return Err(self.syntax_error(SyntaxError::Missing("}")));
        }

        if heredoc.is_none()
            && (c == b'<' || c == b'>')
            && !self.quote_flag
            && word.text.len() <= 2
            && word.text.iter().all(u8::is_ascii_digit)
        {
            let fd = if word.text.is_empty() {
                None
            } else {
                Some(
                    word.text
                        .iter()
                        .fold(0, |fd, &d| fd * 10 + u32::from(d - b'0')),
                )
            };
            self.parse_redir(c, fd);
            self.token.id = TokenId::Redirect;
            self.token.text.clear();
            self.token.backquote.clear();
            return Ok(TokenId::Redirect);
        }

        if c != PEOF {
            self.pungetc(c);
        }
        self.token.id = TokenId::Word;
        self.token.text = word.text;
        self.token.backquote = word.backquote;
        Ok(TokenId::Word)
    }

    /// Runs the here-document delimiter check at a line start.
    ///
    /// Consumes the delimiter line and returns `PEOF` when the line matches.
    /// Otherwise the staged bytes are pushed back as a synthetic source so
    /// they are re-read as body content, and the first of them is returned.
    fn check_heredoc_end(&mut self, hd: &HereDocMode<'_>, mut c: u8) -> u8 {
        if hd.strip_tabs {
            while c == b'\t' {
                c = self.pgetc();
            }
        }
        let mut staged = Vec::new();
        let mut pos = 0;
        let matched = loop {
            if pos == hd.eofmark.len() {
                break true;
            }
            staged.push(c);
            if c != hd.eofmark[pos] {
                break false;
            }
            pos += 1;
            c = self.pgetc();
        };
        if matched && (c == b'\n' || c == PEOF) {
            return PEOF;
        }
        if matched {
            staged.push(c);
        }
        if !staged.is_empty() {
            self.src.push_bytes(staged);
            c = self.pgetc();
        }
        c
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::error::SyntaxError;
    use crate::syntax::CTLVAR;

    fn word_text(code: &str) -> Vec<u8> {
        let mut parser = Parser::new();
        parser.push_str(code);
        assert_eq!(parser.read_token().unwrap(), TokenId::Word);
        parser.token.text.clone()
    }

    fn word_error(code: &str) -> SyntaxError {
        let mut parser = Parser::new();
        parser.push_str(code);
        let error = parser.read_token().unwrap_err();
        match error.cause {
            crate::parser::ErrorCause::Syntax(e) => e,
            other => panic!("not a syntax error: {other:?}"),
        }
    }

    #[test]
    fn plain_word() {
        assert_eq!(word_text("hello"), b"hello");
        assert_eq!(word_text("a,b.c{d"), b"a,b.c{d");
    }

    #[test]
    fn word_ends_at_operator_characters() {
        for code in ["ab|x", "ab&x", "ab;x", "ab<x", "ab>x", "ab x", "ab\tx", "ab(x", "ab)x"] {
            assert_eq!(word_text(code), b"ab", "{code}");
        }
    }

    #[test]
    fn word_ends_at_newline() {
        let mut parser = Parser::new();
        parser.push_str("ab\ncd");
        assert_eq!(parser.read_token().unwrap(), TokenId::Word);
        assert_eq!(parser.token.text, b"ab");
        assert_eq!(parser.read_token().unwrap(), TokenId::Newline);
    }

    #[test]
    fn single_quotes_mark_and_preserve() {
        assert_eq!(
            word_text("'a b'"),
            [CTLQUOTEMARK, b'a', b' ', b'b', CTLQUOTEMARK]
        );
    }

    #[test]
    fn double_quotes_mark_and_preserve() {
        assert_eq!(
            word_text("\"a b\""),
            [CTLQUOTEMARK, b'a', b' ', b'b', CTLQUOTEMARK]
        );
    }

    #[test]
    fn pattern_characters_are_escaped_inside_quotes() {
        assert_eq!(
            word_text("'*'"),
            [CTLQUOTEMARK, CTLESC, b'*', CTLQUOTEMARK]
        );
        assert_eq!(word_text("a*b"), *b"a*b");
    }

    #[test]
    fn backslash_escapes_in_base_mode() {
        assert_eq!(word_text(r"a\*b"), [b'a', CTLESC, b'*', b'b']);
        assert_eq!(word_text(r"\'"), [CTLESC, b'\'']);
    }

    #[test]
    fn backslash_in_double_quotes_keeps_nonspecial_backslash() {
        // `\$` escapes; `\x` keeps the backslash.
        assert_eq!(
            word_text("\"\\$\""),
            [CTLQUOTEMARK, CTLESC, b'$', CTLQUOTEMARK]
        );
        assert_eq!(
            word_text("\"\\x\""),
            [CTLQUOTEMARK, CTLESC, b'\\', CTLESC, b'x', CTLQUOTEMARK]
        );
    }

    #[test]
    fn single_quotes_disable_backslash() {
        assert_eq!(
            word_text(r"'\'"),
            [CTLQUOTEMARK, CTLESC, b'\\', CTLQUOTEMARK]
        );
    }

    #[test]
    fn newline_inside_quotes_is_literal() {
        assert_eq!(
            word_text("'a\nb'"),
            [CTLQUOTEMARK, b'a', b'\n', b'b', CTLQUOTEMARK]
        );
    }

    #[test]
    fn line_continuation_is_preserved_inside_single_quotes() {
        assert_eq!(
            word_text("'a\\\nb'"),
            [CTLQUOTEMARK, CTLESC, b'\\', b'\n', b'b', CTLQUOTEMARK]
        );
        assert_eq!(
            word_text("\"a\\\nb\""),
            [CTLQUOTEMARK, b'a', b'b', CTLQUOTEMARK]
        );
    }

    #[test]
    fn control_bytes_are_escaped() {
        for byte in 1..=7u8 {
            let code = format!("a{}b", byte as char);
            assert_eq!(
                word_text(&code),
                [b'a', CTLESC, byte, b'b'],
                "byte {byte}"
            );
        }
    }

    #[test]
    fn quoted_control_byte_is_escaped_once() {
        let code = format!("'{}'", CTLVAR as char);
        assert_eq!(
            word_text(&code),
            [CTLQUOTEMARK, CTLESC, CTLVAR, CTLQUOTEMARK]
        );
    }

    #[test]
    fn backslash_at_end_of_input() {
        assert_eq!(word_text("a\\"), [b'a', CTLESC, b'\\']);
    }

    #[test]
    fn unterminated_quotes_are_errors() {
        assert_eq!(word_error("'abc"), SyntaxError::UnterminatedString);
        assert_eq!(word_error("\"abc"), SyntaxError::UnterminatedString);
        assert_eq!(word_error("${a"), SyntaxError::Missing("}"));
        assert_eq!(word_error("$((1+2"), SyntaxError::Missing("))"));
    }

    #[test]
    fn quote_flag_tracks_quoting() {
        let mut parser = Parser::new();
        parser.push_str("plain 'quoted'");
        parser.read_token().unwrap();
        assert!(!parser.quote_flag);
        parser.read_token().unwrap();
        assert!(parser.quote_flag);
    }
}
