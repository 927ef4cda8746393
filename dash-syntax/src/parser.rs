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

//! Syntax parser for the shell language.
//!
//! The [`Parser`] reads source text one top-level command at a time,
//! producing a [`Node`](crate::syntax::Node) tree per command. Parsing is
//! recursive descent with a single token of lookahead; the token stream
//! comes from the context-sensitive tokeniser in [`lex`].

mod command;
mod core;
mod error;
mod list;
mod pipeline;
mod redir;
mod simple_command;

pub mod lex;

pub use self::core::Parser;
pub use self::error::{Error, ErrorCause, InternalError, Result, SyntaxError};
