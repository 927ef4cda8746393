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

//! Lexical analysis for the shell language.
//!
//! The tokeniser turns the character stream into operator tokens and
//! composite word tokens. It is context-sensitive: the grammar configures
//! each call through the token flags (keyword recognition on or off,
//! newline eating, here-document delimiter mode), and word building runs
//! under a stack of syntax modes tracking quoting and substitution nesting.

mod backquote;
mod core;
mod dollar;
mod heredoc;
mod redir;
mod token;
mod word;

pub use self::token::{Token, TokenId};

pub(crate) use self::core::TokenFlags;
pub(crate) use self::heredoc::PendingHereDoc;
pub(crate) use self::redir::PendingRedir;
pub(crate) use self::word::{SyntaxFrame, is_name_cont, is_name_start};
