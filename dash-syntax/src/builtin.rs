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

//! Classification of built-in utility names.
//!
//! The parser consults this table for one purpose only: a function
//! definition whose name is a *special* built-in is a syntax error. The
//! remaining flags are provided for downstream consumers classifying command
//! words.

use bitflags::bitflags;

bitflags! {
    /// Attributes of a built-in utility.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub struct BuiltinFlags: u8 {
        /// Special built-in: not overridable by a function definition.
        const SPECIAL = 1 << 0;
        /// Regular built-in found without a path search.
        const REGULAR = 1 << 1;
        /// Variable assignments preceding the name keep their effect.
        const ASSIGN = 1 << 2;
    }
}

/// One entry of the built-in table.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Builtin {
    pub name: &'static str,
    pub flags: BuiltinFlags,
}

impl Builtin {
    pub fn is_special(&self) -> bool {
        self.flags.contains(BuiltinFlags::SPECIAL)
    }

    pub fn is_regular(&self) -> bool {
        self.flags.contains(BuiltinFlags::REGULAR)
    }

    pub fn preserves_assignments(&self) -> bool {
        self.flags.contains(BuiltinFlags::ASSIGN)
    }
}

const fn flags(bits: u8) -> BuiltinFlags {
    match BuiltinFlags::from_bits(bits) {
        Some(flags) => flags,
        None => panic!("invalid builtin flag bits"),
    }
}

const fn builtin(name: &'static str, bits: u8) -> Builtin {
    Builtin {
        name,
        flags: flags(bits),
    }
}

/// All built-in utilities, sorted by name.
static BUILTINS: &[Builtin] = &[
    builtin(".", 3),
    builtin(":", 3),
    builtin("[", 0),
    builtin("alias", 6),
    builtin("bg", 2),
    builtin("break", 3),
    builtin("cd", 2),
    builtin("chdir", 0),
    builtin("command", 2),
    builtin("continue", 3),
    builtin("echo", 0),
    builtin("eval", 3),
    builtin("exec", 3),
    builtin("exit", 3),
    builtin("export", 7),
    builtin("false", 2),
    builtin("fg", 2),
    builtin("getopts", 2),
    builtin("hash", 2),
    builtin("jobs", 2),
    builtin("kill", 2),
    builtin("local", 7),
    builtin("printf", 0),
    builtin("pwd", 2),
    builtin("read", 2),
    builtin("readonly", 7),
    builtin("return", 3),
    builtin("set", 3),
    builtin("shift", 3),
    builtin("test", 0),
    builtin("times", 3),
    builtin("trap", 3),
    builtin("true", 2),
    builtin("type", 2),
    builtin("ulimit", 2),
    builtin("umask", 2),
    builtin("unalias", 2),
    builtin("unset", 3),
    builtin("wait", 2),
];

/// Looks up a built-in by name, ignoring ASCII case.
#[must_use]
pub fn find_builtin(name: &str) -> Option<&'static Builtin> {
    BUILTINS
        .binary_search_by(|entry| {
            entry
                .name
                .bytes()
                .map(|b| b.to_ascii_lowercase())
                .cmp(name.bytes().map(|b| b.to_ascii_lowercase()))
        })
        .ok()
        .map(|index| &BUILTINS[index])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_sorted_case_insensitively() {
        for pair in BUILTINS.windows(2) {
            assert!(
                pair[0].name.to_ascii_lowercase() < pair[1].name.to_ascii_lowercase(),
                "{} is not before {}",
                pair[0].name,
                pair[1].name,
            );
        }
    }

    #[test]
    fn lookup_hits_and_misses() {
        assert_eq!(find_builtin("echo").unwrap().name, "echo");
        assert_eq!(find_builtin("EXEC").unwrap().name, "exec");
        assert!(find_builtin(".").is_some());
        assert!(find_builtin("not-a-builtin").is_none());
        assert!(find_builtin("").is_none());
    }

    #[test]
    fn special_classification() {
        assert!(find_builtin("exec").unwrap().is_special());
        assert!(find_builtin(":").unwrap().is_special());
        assert!(find_builtin("export").unwrap().is_special());
        assert!(!find_builtin("true").unwrap().is_special());
        assert!(!find_builtin("echo").unwrap().is_special());
    }

    #[test]
    fn regular_and_assignment_classification() {
        assert!(find_builtin("true").unwrap().is_regular());
        assert!(!find_builtin("echo").unwrap().is_regular());
        assert!(find_builtin("local").unwrap().preserves_assignments());
        assert!(find_builtin("alias").unwrap().preserves_assignments());
        assert!(!find_builtin("cd").unwrap().preserves_assignments());
    }
}
