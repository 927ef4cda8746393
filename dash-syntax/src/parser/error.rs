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

//! Definition of errors that happen in the parser

use super::lex::TokenId;
pub use crate::source::InternalError;
use std::borrow::Cow;
use std::rc::Rc;
use thiserror::Error;

/// Types of syntax errors
///
/// A syntax error reports malformed input, as opposed to an
/// [`InternalError`], which reports a structural fault of the parsing
/// machinery itself.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[error("{}", self.message())]
#[non_exhaustive]
pub enum SyntaxError {
    /// A token appeared where no command can start or continue.
    Unexpected(TokenId),
    /// A specific token was required but something else appeared.
    Expected(TokenId),
    /// The word after `for` is not a valid variable name.
    BadForVar,
    /// A function is being defined with an invalid name or the name of a
    /// special built-in.
    BadFuncName,
    /// The digits before a redirection operator do not form a usable file
    /// descriptor number.
    BadFdNum,
    /// Closing punctuation is missing; the text names what was expected.
    Missing(&'static str),
    /// A quoted string was not terminated before the end of the word.
    UnterminatedString,
    /// The input ended inside a backquote substitution.
    BackquoteEof,
}

impl SyntaxError {
    /// Returns an error message describing the error.
    #[must_use]
    pub fn message(&self) -> Cow<'static, str> {
        use SyntaxError::*;
        match self {
            Unexpected(token) => format!("{token} unexpected").into(),
            Expected(token) => format!("{token} expected").into(),
            BadForVar => "bad for loop variable".into(),
            BadFuncName => "bad function name".into(),
            BadFdNum => "invalid file descriptor number".into(),
            Missing(text) => format!("missing \"{text}\"").into(),
            UnterminatedString => "unterminated quoted string".into(),
            BackquoteEof => "EOF in backquote substitution".into(),
        }
    }
}

/// Types of errors that may happen in parsing
#[derive(Clone, Debug, Error)]
#[error("{}", self.message())]
pub enum ErrorCause {
    /// Error in the underlying character source
    Io(#[from] Rc<std::io::Error>),
    /// Structural fault of the parsing machinery
    Internal(#[from] InternalError),
    /// Syntax error
    Syntax(#[from] SyntaxError),
}

impl PartialEq for ErrorCause {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ErrorCause::Syntax(e1), ErrorCause::Syntax(e2)) => e1 == e2,
            (ErrorCause::Internal(e1), ErrorCause::Internal(e2)) => e1 == e2,
            _ => false,
        }
    }
}

impl ErrorCause {
    /// Returns an error message describing the error cause.
    #[must_use]
    pub fn message(&self) -> Cow<'static, str> {
        use ErrorCause::*;
        match self {
            Io(e) => format!("cannot read commands: {e}").into(),
            Internal(e) => e.to_string().into(),
            Syntax(e) => e.message(),
        }
    }
}

impl From<std::io::Error> for ErrorCause {
    fn from(e: std::io::Error) -> ErrorCause {
        ErrorCause::from(Rc::new(e))
    }
}

/// Explanation of a failure in parsing
#[derive(Clone, Debug, Error, PartialEq)]
#[error("{cause}")]
pub struct Error {
    pub cause: ErrorCause,
    /// Line number of the source being read when the error was detected.
    pub line: u64,
}

/// Entire result of parsing
pub type Result<T> = std::result::Result<T, Error>;
