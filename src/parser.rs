//! Reader for arenalisp.
//!
//! Syntax is plain s-expressions:
//!   number   ::= any token that parses completely as an f64
//!   symbol   ::= any other token
//!   list     ::= '(' expr* ')'
//!   dotted   ::= '(' expr+ '.' expr ')'
//!   quoted   ::= '\'' expr
//!
//! The reader works one character at a time with a single character of
//! lookahead, pulling more input a line at a time from a [`LineSource`] only
//! when the lookahead runs dry. Parsing is recursive descent straight into
//! arena pairs.

use tracing::warn;

use crate::arena::Arena;
use crate::error::{LispError, Result};
use crate::symbol::SymbolTable;
use crate::value::Val;

/// Somewhere to pull lines of program text from.
pub trait LineSource {
    /// The next line without its terminator, or `None` once input is over.
    fn next_line(&mut self) -> Option<String>;
}

/// Lines of an in-memory string.
pub struct StrSource<'a> {
    lines: std::str::Lines<'a>,
}

impl<'a> StrSource<'a> {
    pub fn new(text: &'a str) -> Self {
        StrSource { lines: text.lines() }
    }
}

impl LineSource for StrSource<'_> {
    fn next_line(&mut self) -> Option<String> {
        self.lines.next().map(str::to_string)
    }
}

pub struct Reader<S> {
    source: S,
    line: Vec<u8>,
    pos: usize,
    exhausted: bool,
    token: Vec<u8>,
    token_max: usize,
}

impl<S: LineSource> Reader<S> {
    pub fn new(source: S, token_max: usize) -> Self {
        Reader {
            source,
            line: Vec::new(),
            pos: 0,
            exhausted: false,
            token: Vec::with_capacity(token_max),
            token_max: token_max.max(1),
        }
    }

    // ── Characters ──

    /// The lookahead character, refilling from the source when needed.
    fn see(&mut self) -> Option<u8> {
        while self.pos >= self.line.len() {
            if self.exhausted {
                return None;
            }
            match self.source.next_line() {
                Some(line) => {
                    self.line = line.into_bytes();
                    self.line.push(b'\n');
                    self.pos = 0;
                }
                None => {
                    self.exhausted = true;
                    return None;
                }
            }
        }
        Some(self.line[self.pos])
    }

    fn get(&mut self) -> Option<u8> {
        let c = self.see()?;
        self.pos += 1;
        Some(c)
    }

    fn is_space(c: u8) -> bool {
        c <= b' '
    }

    fn is_delimiter(c: u8) -> bool {
        matches!(c, b'(' | b')' | b'\'') || Self::is_space(c)
    }

    // ── Tokens ──

    /// Collect the next token into the token buffer and return its first byte.
    fn scan(&mut self) -> Result<u8> {
        self.token.clear();
        while self.see().is_some_and(Self::is_space) {
            self.pos += 1;
        }
        let first = self.get().ok_or(LispError::EndOfInput)?;
        self.token.push(first);
        if !matches!(first, b'(' | b')' | b'\'') {
            while self.token.len() < self.token_max {
                match self.see() {
                    Some(c) if !Self::is_delimiter(c) => {
                        self.token.push(c);
                        self.pos += 1;
                    }
                    _ => break,
                }
            }
        }
        Ok(first)
    }

    // ── Expressions ──

    /// Read one complete expression.
    pub fn read(&mut self, arena: &mut Arena, syms: &mut SymbolTable) -> Result<Val> {
        self.scan()?;
        self.parse(arena, syms)
    }

    /// Parse the expression starting at the current token.
    fn parse(&mut self, arena: &mut Arena, syms: &mut SymbolTable) -> Result<Val> {
        match self.token[0] {
            b'(' => self.list(arena, syms),
            b'\'' => {
                let quote = Val::Symbol(syms.intern("quote")?);
                let quoted = self.read(arena, syms)?;
                arena.list(&[quote, quoted])
            }
            _ => self.atomic(syms),
        }
    }

    fn list(&mut self, arena: &mut Arena, syms: &mut SymbolTable) -> Result<Val> {
        if self.scan()? == b')' {
            return Ok(Val::Nil);
        }
        if self.token == b"." {
            let tail = self.read(arena, syms)?;
            if self.scan()? != b')' {
                warn!(
                    token = %String::from_utf8_lossy(&self.token),
                    "dotted list not closed after its tail; token dropped"
                );
            }
            return Ok(tail);
        }
        let head = self.parse(arena, syms)?;
        let tail = self.list(arena, syms)?;
        arena.cons(head, tail)
    }

    fn atomic(&mut self, syms: &mut SymbolTable) -> Result<Val> {
        let text = String::from_utf8_lossy(&self.token);
        match text.parse::<f64>() {
            Ok(n) => Ok(Val::Number(n)),
            Err(_) => Ok(Val::Symbol(syms.intern(&text)?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_TOKEN_MAX;

    struct Fixture {
        arena: Arena,
        syms: SymbolTable,
    }

    impl Fixture {
        fn new() -> Self {
            Fixture {
                arena: Arena::new(256),
                syms: SymbolTable::new(256),
            }
        }

        fn read_all(&mut self, text: &str) -> Vec<Val> {
            let mut reader = Reader::new(StrSource::new(text), DEFAULT_TOKEN_MAX);
            let mut out = Vec::new();
            loop {
                match reader.read(&mut self.arena, &mut self.syms) {
                    Ok(v) => out.push(v),
                    Err(LispError::EndOfInput) => return out,
                    Err(e) => panic!("unexpected error: {e}"),
                }
            }
        }

        fn name(&self, v: Val) -> &str {
            self.syms.name(v.as_symbol().expect("symbol"))
        }
    }

    #[test]
    fn numbers_need_the_whole_token() {
        let mut fx = Fixture::new();
        let vals = fx.read_all("42 -1.5e3 .5 12abc - +");
        assert_eq!(vals[0].as_number(), Some(42.0));
        assert_eq!(vals[1].as_number(), Some(-1500.0));
        assert_eq!(vals[2].as_number(), Some(0.5));
        assert_eq!(fx.name(vals[3]), "12abc");
        assert_eq!(fx.name(vals[4]), "-");
        assert_eq!(fx.name(vals[5]), "+");
    }

    #[test]
    fn lists_span_lines() {
        let mut fx = Fixture::new();
        let vals = fx.read_all("(a\n  (b c)\n d)");
        assert_eq!(vals.len(), 1);
        let items = fx.arena.list_to_vec(vals[0]);
        assert_eq!(items.len(), 3);
        assert_eq!(fx.name(items[0]), "a");
        assert_eq!(fx.arena.list_to_vec(items[1]).len(), 2);
    }

    #[test]
    fn dotted_tail() {
        let mut fx = Fixture::new();
        let v = fx.read_all("(1 2 . 3)")[0];
        assert_eq!(fx.arena.car(v).as_number(), Some(1.0));
        let rest = fx.arena.cdr(v);
        assert_eq!(fx.arena.car(rest).as_number(), Some(2.0));
        assert_eq!(fx.arena.cdr(rest).as_number(), Some(3.0));
    }

    #[test]
    fn quote_marker_expands() {
        let mut fx = Fixture::new();
        let v = fx.read_all("'(x)")[0];
        assert_eq!(fx.name(fx.arena.car(v)), "quote");
        let quoted = fx.arena.car(fx.arena.cdr(v));
        assert!(fx.arena.car(quoted).as_symbol().is_some());
        assert!(fx.arena.cdr(fx.arena.cdr(v)).is_nil());
    }

    #[test]
    fn quote_marker_delimits_atoms() {
        let mut fx = Fixture::new();
        let vals = fx.read_all("a'b");
        assert_eq!(vals.len(), 2);
        assert_eq!(fx.name(vals[0]), "a");
        assert_eq!(fx.name(fx.arena.car(vals[1])), "quote");
    }

    #[test]
    fn empty_list_is_nil() {
        let mut fx = Fixture::new();
        assert!(fx.read_all("()")[0].is_nil());
        assert!(fx.read_all("(   )")[0].is_nil());
    }

    #[test]
    fn long_tokens_are_split() {
        let mut fx = Fixture::new();
        let long = "a".repeat(DEFAULT_TOKEN_MAX + 5);
        let vals = fx.read_all(&long);
        assert_eq!(vals.len(), 2);
        assert_eq!(fx.name(vals[0]).len(), DEFAULT_TOKEN_MAX);
        assert_eq!(fx.name(vals[1]), "aaaaa");
    }

    #[test]
    fn final_atom_without_newline() {
        let mut fx = Fixture::new();
        let mut reader = Reader::new(StrSource::new("7"), DEFAULT_TOKEN_MAX);
        let v = reader.read(&mut fx.arena, &mut fx.syms).unwrap();
        assert_eq!(v.as_number(), Some(7.0));
        assert!(matches!(
            reader.read(&mut fx.arena, &mut fx.syms),
            Err(LispError::EndOfInput)
        ));
    }

    #[test]
    fn unclosed_list_is_end_of_input() {
        let mut fx = Fixture::new();
        let mut reader = Reader::new(StrSource::new("(1 2"), DEFAULT_TOKEN_MAX);
        assert!(matches!(
            reader.read(&mut fx.arena, &mut fx.syms),
            Err(LispError::EndOfInput)
        ));
    }
}
