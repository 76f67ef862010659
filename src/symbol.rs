//! Symbol table: interned names packed into one flat byte buffer.
//!
//! Each name is stored once, followed by a NUL terminator. A symbol is the
//! byte offset of its first character, so two symbols are the same exactly
//! when their offsets are. Nothing is ever removed.

use tracing::trace;

use crate::error::{LispError, Result};
use crate::value::SymRef;

pub struct SymbolTable {
    bytes: Vec<u8>,
    capacity: usize,
}

impl SymbolTable {
    pub fn new(capacity: usize) -> Self {
        SymbolTable {
            bytes: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Intern a name, returning the offset of its single stored copy.
    ///
    /// Earlier entries are scanned linearly; an unseen name is appended.
    /// Names must not contain NUL bytes.
    pub fn intern(&mut self, name: &str) -> Result<SymRef> {
        debug_assert!(!name.as_bytes().contains(&0), "symbol names are NUL-terminated");
        let mut ptr = 0;
        while ptr < self.bytes.len() {
            let entry = self.entry_at(ptr);
            if entry == name.as_bytes() {
                return Ok(SymRef(ptr as u32));
            }
            ptr += entry.len() + 1;
        }
        if self.bytes.len() + name.len() + 1 > self.capacity {
            return Err(LispError::SymbolTableExhausted {
                capacity: self.capacity,
            });
        }
        self.bytes.extend_from_slice(name.as_bytes());
        self.bytes.push(0);
        trace!(symbol = name, offset = ptr, "interned symbol");
        Ok(SymRef(ptr as u32))
    }

    /// Look up a name by reference.
    pub fn name(&self, sym: SymRef) -> &str {
        std::str::from_utf8(self.entry_at(sym.offset())).unwrap_or_default()
    }

    /// Bytes in use, terminators included.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    fn entry_at(&self, ptr: usize) -> &[u8] {
        let rest = self.bytes.get(ptr..).unwrap_or_default();
        let end = rest.iter().position(|&b| b == 0).unwrap_or(rest.len());
        &rest[..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_text_same_slot() {
        let mut syms = SymbolTable::new(64);
        let a = syms.intern("lambda").unwrap();
        let b = syms.intern("define").unwrap();
        let c = syms.intern("lambda").unwrap();
        assert_eq!(a, c);
        assert_ne!(a, b);
        assert_eq!(syms.name(b), "define");
    }

    #[test]
    fn prefixes_are_distinct_symbols() {
        let mut syms = SymbolTable::new(64);
        let long = syms.intern("car").unwrap();
        let short = syms.intern("ca").unwrap();
        assert_ne!(long, short);
        assert_eq!(syms.name(short), "ca");
        assert_eq!(syms.intern("ca").unwrap(), short);
    }

    #[test]
    fn offsets_follow_terminators() {
        let mut syms = SymbolTable::new(64);
        assert_eq!(syms.intern("ab").unwrap().offset(), 0);
        assert_eq!(syms.intern("cde").unwrap().offset(), 3);
        assert_eq!(syms.len(), 7);
    }

    #[test]
    fn exhaustion_is_reported() {
        let mut syms = SymbolTable::new(8);
        syms.intern("abc").unwrap();
        syms.intern("abc").unwrap();
        assert_eq!(
            syms.intern("defgh"),
            Err(LispError::SymbolTableExhausted { capacity: 8 })
        );
        // a name that fits exactly is still accepted
        assert!(syms.intern("xyz").is_ok());
        assert_eq!(syms.len(), 8);
    }
}
