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

//! Parsing of `$`-prefixed substitutions.
//!
//! A `$` inside a word dispatches here: `$((…))` enters arithmetic mode,
//! `$(…)` is a command substitution, and everything else is a variable
//! substitution encoded as `CTLVAR`, a type byte, the parameter name, and
//! `=`. Substitutions other than the plain `$var`/`${var}` form leave their
//! embedded word to be collected by the ordinary word loop, which emits the
//! closing `CTLENDVAR` when the matching `}` arrives.

use super::core::TokenFlags;
use super::word::{SyntaxKind, WordBuilder, is_name_cont, is_name_start, is_special};
use crate::parser::core::Parser;
use crate::parser::error::Result;
use crate::syntax::{CTLARI, CTLVAR, VarSubst};

impl Parser {
    /// Parses the text following a `$`.
    ///
    /// While a here-document delimiter is being read, `$` is a literal.
    pub(crate) fn parse_sub(&mut self, word: &mut WordBuilder) -> Result<()> {
        if self.flags.contains(TokenFlags::CHKEOFMARK) {
            word.text.push(b'$');
            return Ok(());
        }
        let c = self.pgetc_eatbnl();
        if c == b'(' {
            // $(command) or $((arithmetic))
            let c2 = self.pgetc_eatbnl();
            if c2 == b'(' {
                let frame = self.push_frame(SyntaxKind::Arith);
                frame.dblquote = true;
                word.text.push(CTLARI);
            } else {
                self.pungetc(c2);
                self.parse_backquote_new(word)?;
            }
        } else if c != b'{' && !is_name_start(c) && !is_special(c) {
            word.text.push(b'$');
            self.pungetc(c);
        } else {
            self.parse_var_sub(word, c);
        }
        Ok(())
    }

    /// Parses a variable substitution, `c` being the byte after the `$`.
    fn parse_var_sub(&mut self, word: &mut WordBuilder, c: u8) {
        let mut newsyn = self.top().kind;
        word.text.push(CTLVAR);
        let typeloc = word.text.len();
        word.text.push(0); // patched below once the subtype is known

        let braced = c == b'{';
        let mut c = if braced { self.pgetc_eatbnl() } else { c };
        let mut subtype = if braced {
            VarSubst::None
        } else {
            VarSubst::Normal
        };
        let mut colon = false;
        let mut badsub = false;

        // Parameter name: a name, digits, or one special character. The `#`
        // needs lookahead to tell `${#var}` from `${#}` and `${#-modifier}`.
        loop {
            if is_name_start(c) {
                loop {
                    word.text.push(c);
                    c = self.pgetc_eatbnl();
                    if !is_name_cont(c) {
                        break;
                    }
                }
            } else if c.is_ascii_digit() {
                loop {
                    word.text.push(c);
                    c = self.pgetc_eatbnl();
                    let multi = subtype <= VarSubst::None || subtype >= VarSubst::Length;
                    if !(multi && c.is_ascii_digit()) {
                        break;
                    }
                }
            } else if c != b'}' {
                let mut cc = c;
                c = self.pgetc_eatbnl();
                if subtype == VarSubst::None && cc == b'#' {
                    subtype = VarSubst::Length;
                    if c == b'_' || c.is_ascii_alphanumeric() {
                        continue;
                    }
                    cc = c;
                    c = self.pgetc_eatbnl();
                    if cc == b'}' || c == b'}' {
                        self.pungetc(c);
                        subtype = VarSubst::None;
                        c = cc;
                        cc = b'#';
                    }
                }
                if !is_special(cc) {
                    if subtype == VarSubst::Length {
                        subtype = VarSubst::None;
                    }
                    badsub = true;
                    break;
                }
                word.text.push(cc);
            } else {
                badsub = true; // `${}`
            }
            break;
        }

        if badsub {
            self.pungetc(c);
        } else if subtype == VarSubst::None {
            // Braced substitution: c holds the byte after the name.
            match c {
                b'}' => subtype = VarSubst::Normal,
                b'-' => subtype = VarSubst::Minus,
                b'+' => subtype = VarSubst::Plus,
                b'?' => subtype = VarSubst::Question,
                b'=' => subtype = VarSubst::Assign,
                b':' => {
                    colon = true;
                    let c2 = self.pgetc_eatbnl();
                    match c2 {
                        b'}' => subtype = VarSubst::Normal,
                        b'-' => subtype = VarSubst::Minus,
                        b'+' => subtype = VarSubst::Plus,
                        b'?' => subtype = VarSubst::Question,
                        b'=' => subtype = VarSubst::Assign,
                        _ => {
                            // Unknown operator after the colon: leave the
                            // substitution typeless and re-read the byte.
                            colon = false;
                            self.pungetc(c2);
                        }
                    }
                }
                b'%' | b'#' => {
                    let cc = c;
                    let c2 = self.pgetc_eatbnl();
                    let max = c2 == cc;
                    if !max {
                        self.pungetc(c2);
                    }
                    subtype = match (cc, max) {
                        (b'%', false) => VarSubst::TrimRight,
                        (b'%', true) => VarSubst::TrimRightMax,
                        (_, false) => VarSubst::TrimLeft,
                        (_, true) => VarSubst::TrimLeftMax,
                    };
                    // Trim patterns are read in base syntax, not double-quoted.
                    newsyn = SyntaxKind::Base;
                }
                _ => self.pungetc(c),
            }
        } else {
            if subtype == VarSubst::Length && c != b'}' {
                subtype = VarSubst::None;
            }
            self.pungetc(c);
        }

        if newsyn == SyntaxKind::Arith {
            newsyn = SyntaxKind::DoubleQuote;
        }
        if (newsyn != self.top().kind || self.top().innerdq) && subtype != VarSubst::Normal {
            let frame = self.push_frame(newsyn);
            frame.varpushed = true;
            frame.dblquote = newsyn != SyntaxKind::Base;
        }
        word.text.push(b'=');
        word.text[typeloc] = subtype.type_byte(colon);
        if subtype != VarSubst::Normal {
            let top = self.top_mut();
            top.varnest += 1;
            if top.dblquote {
                top.dqvarnest += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lex::TokenId;
    use crate::syntax::{CTLENDARI, CTLENDVAR, CTLESC, CTLQUOTEMARK, VSBIT, VSNUL};

    fn word_text(code: &str) -> Vec<u8> {
        let mut parser = Parser::new();
        parser.push_str(code);
        assert_eq!(parser.read_token().unwrap(), TokenId::Word);
        parser.token.text.clone()
    }

    fn ty(subtype: VarSubst) -> u8 {
        subtype.type_byte(false)
    }

    #[test]
    fn normal_variable() {
        assert_eq!(
            word_text("$foo"),
            [CTLVAR, ty(VarSubst::Normal), b'f', b'o', b'o', b'=']
        );
    }

    #[test]
    fn normal_variable_ends_at_non_name_character() {
        assert_eq!(
            word_text("$foo.x"),
            [CTLVAR, ty(VarSubst::Normal), b'f', b'o', b'o', b'=', b'.', b'x']
        );
    }

    #[test]
    fn braced_variable() {
        assert_eq!(
            word_text("${foo}"),
            [CTLVAR, ty(VarSubst::Normal), b'f', b'o', b'o', b'=']
        );
    }

    #[test]
    fn special_parameters() {
        assert_eq!(word_text("$@"), [CTLVAR, ty(VarSubst::Normal), b'@', b'=']);
        assert_eq!(word_text("$?"), [CTLVAR, ty(VarSubst::Normal), b'?', b'=']);
        assert_eq!(word_text("$#"), [CTLVAR, ty(VarSubst::Normal), b'#', b'=']);
    }

    #[test]
    fn positional_parameters_take_one_digit_unbraced() {
        // `$12` is `${1}` followed by a literal `2`.
        assert_eq!(
            word_text("$12"),
            [CTLVAR, ty(VarSubst::Normal), b'1', b'=', b'2']
        );
        assert_eq!(
            word_text("${12}"),
            [CTLVAR, ty(VarSubst::Normal), b'1', b'2', b'=']
        );
    }

    #[test]
    fn dollar_without_a_name_is_literal() {
        assert_eq!(word_text("$%x"), [b'$', b'%', b'x']);
        assert_eq!(word_text("a$"), [b'a', b'$']);
    }

    #[test]
    fn minus_default_modifier() {
        assert_eq!(
            word_text("${a-b}"),
            [
                CTLVAR,
                ty(VarSubst::Minus),
                b'a',
                b'=',
                b'b',
                CTLENDVAR
            ]
        );
    }

    #[test]
    fn colon_modifiers_set_the_nul_bit() {
        assert_eq!(
            word_text("${a:-b}"),
            [
                CTLVAR,
                VSBIT | VSNUL | VarSubst::Minus as u8,
                b'a',
                b'=',
                b'b',
                CTLENDVAR
            ]
        );
        assert_eq!(
            word_text("${a:=b}")[1],
            VSBIT | VSNUL | VarSubst::Assign as u8
        );
        assert_eq!(
            word_text("${a:+b}")[1],
            VSBIT | VSNUL | VarSubst::Plus as u8
        );
        assert_eq!(
            word_text("${a:?m}")[1],
            VSBIT | VSNUL | VarSubst::Question as u8
        );
    }

    #[test]
    fn plain_modifiers() {
        assert_eq!(word_text("${a+b}")[1], ty(VarSubst::Plus));
        assert_eq!(word_text("${a=b}")[1], ty(VarSubst::Assign));
        assert_eq!(word_text("${a?}")[1], ty(VarSubst::Question));
    }

    #[test]
    fn trim_modifiers() {
        assert_eq!(
            word_text("${a%b}"),
            [CTLVAR, ty(VarSubst::TrimRight), b'a', b'=', b'b', CTLENDVAR]
        );
        assert_eq!(word_text("${a%%b}")[1], ty(VarSubst::TrimRightMax));
        assert_eq!(word_text("${a#b}")[1], ty(VarSubst::TrimLeft));
        assert_eq!(word_text("${a##b}")[1], ty(VarSubst::TrimLeftMax));
    }

    #[test]
    fn trim_pattern_quotes_are_plain_quoting() {
        // The pattern is tokenised in base syntax, so quotes mark as usual.
        assert_eq!(
            word_text("${a%'*'}"),
            [
                CTLVAR,
                ty(VarSubst::TrimRight),
                b'a',
                b'=',
                CTLQUOTEMARK,
                CTLESC,
                b'*',
                CTLQUOTEMARK,
                CTLENDVAR
            ]
        );
    }

    #[test]
    fn length_substitution() {
        assert_eq!(
            word_text("${#foo}"),
            [CTLVAR, ty(VarSubst::Length), b'f', b'o', b'o', b'=', CTLENDVAR]
        );
        assert_eq!(word_text("${#}"), [CTLVAR, ty(VarSubst::Normal), b'#', b'=']);
    }

    #[test]
    fn variable_inside_double_quotes() {
        assert_eq!(
            word_text("\"$a\""),
            [
                CTLQUOTEMARK,
                CTLVAR,
                ty(VarSubst::Normal),
                b'a',
                b'=',
                CTLQUOTEMARK
            ]
        );
    }

    #[test]
    fn modifier_word_may_contain_spaces_and_quotes() {
        assert_eq!(
            word_text("${a:-b c}"),
            [
                CTLVAR,
                VSBIT | VSNUL | VarSubst::Minus as u8,
                b'a',
                b'=',
                b'b',
                b' ',
                b'c',
                CTLENDVAR
            ]
        );
        assert_eq!(
            word_text("${a-\"b\"}"),
            [
                CTLVAR,
                ty(VarSubst::Minus),
                b'a',
                b'=',
                CTLQUOTEMARK,
                b'b',
                CTLQUOTEMARK,
                CTLENDVAR
            ]
        );
    }

    #[test]
    fn nested_substitution_in_modifier() {
        assert_eq!(
            word_text("${a-$b}"),
            [
                CTLVAR,
                ty(VarSubst::Minus),
                b'a',
                b'=',
                CTLVAR,
                ty(VarSubst::Normal),
                b'b',
                b'=',
                CTLENDVAR
            ]
        );
    }

    #[test]
    fn arithmetic_expansion_brackets() {
        assert_eq!(
            word_text("$((1+2))"),
            [CTLARI, b'1', b'+', b'2', CTLENDARI]
        );
    }

    #[test]
    fn arithmetic_with_nested_parens() {
        assert_eq!(
            word_text("$(((1+2)*3))"),
            [CTLARI, b'(', b'1', b'+', b'2', b')', b'*', b'3', CTLENDARI]
        );
    }

    #[test]
    fn arithmetic_with_lone_close_paren() {
        // A single `)` inside arithmetic stays literal; only `))` ends it.
        assert_eq!(
            word_text("$((1)\n+2))"),
            [CTLARI, b'1', b')', b'\n', b'+', b'2', CTLENDARI]
        );
    }

    #[test]
    fn arithmetic_keeps_names_literal() {
        assert_eq!(word_text("$((a+1))"), [CTLARI, b'a', b'+', b'1', CTLENDARI]);
    }
}
