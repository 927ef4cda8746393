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

//! Parser for the POSIX shell command language, dash dialect.
//!
//! This crate parses shell source text one top-level command at a time,
//! producing an abstract syntax tree suitable for analysis, rewriting, or
//! code generation. It does not execute anything: word expansion, arithmetic
//! evaluation, and alias resolution are left to the embedding application.
//!
//! Create a [`Parser`](parser::Parser), push one or more sources onto it
//! ([`push_str`](parser::Parser::push_str) or
//! [`push_file`](parser::Parser::push_file)), and call
//! [`next_command`](parser::Parser::next_command) until it returns the
//! [`Eof`](syntax::Node::Eof) node. See the [`syntax`] module for the tree
//! data types and the in-band word encoding, and the [`source`] module for
//! how input is stacked and read.

pub mod builtin;
pub mod parser;
pub mod source;
pub mod syntax;
