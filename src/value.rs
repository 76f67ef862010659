//! Value representation for arenalisp.
//!
//! Every value is a small `Copy` enum. Compound values never live inside the
//! enum itself: a `Pair` or `Closure` carries an index into the arena, where
//! two consecutive slots hold its head and tail.
//!
//!   Number    f64, self-evaluating
//!   Symbol    offset into the symbol table (identity is equality)
//!   Str       reserved; the reader never builds one
//!   Primitive index into the primitive table
//!   Pair      arena index of (head, tail)
//!   Closure   arena index of ((params . body), captured-env-or-nil)
//!   Nil       empty list and false
//!   Fault     the shared error sentinel

use std::fmt;

/// Offset of an interned name inside the symbol table's byte buffer.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymRef(pub(crate) u32);

impl SymRef {
    #[inline]
    pub fn offset(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for SymRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "SymRef({})", self.0)
    }
}

/// Index of the first of two consecutive arena slots.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PairRef(pub(crate) u32);

impl PairRef {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for PairRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "PairRef({})", self.0)
    }
}

/// Position of a native operation in the primitive table.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct PrimId(pub(crate) u8);

impl PrimId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// An arenalisp value.
#[derive(Clone, Copy, Debug)]
pub enum Val {
    Number(f64),
    Symbol(SymRef),
    Str(SymRef),
    Primitive(PrimId),
    Pair(PairRef),
    Closure(PairRef),
    Nil,
    Fault,
}

impl Val {
    // ── Queries ──

    #[inline]
    pub fn is_nil(self) -> bool {
        matches!(self, Val::Nil)
    }

    #[inline]
    pub fn is_pair(self) -> bool {
        matches!(self, Val::Pair(_))
    }

    #[inline]
    pub fn is_fault(self) -> bool {
        matches!(self, Val::Fault)
    }

    // ── Extractors ──

    #[inline]
    pub fn as_number(self) -> Option<f64> {
        match self {
            Val::Number(n) => Some(n),
            _ => None,
        }
    }

    #[inline]
    pub fn as_symbol(self) -> Option<SymRef> {
        match self {
            Val::Symbol(s) => Some(s),
            _ => None,
        }
    }

    /// Arena reference behind a pair or a closure.
    #[inline]
    pub fn as_cell(self) -> Option<PairRef> {
        match self {
            Val::Pair(r) | Val::Closure(r) => Some(r),
            _ => None,
        }
    }

    /// The identity comparison behind `eq?` and environment lookup.
    ///
    /// Numbers compare by value, symbols by interned slot, pairs and closures
    /// by arena index. Two distinct pairs with equal contents are not `same`.
    pub fn same(self, other: Val) -> bool {
        match (self, other) {
            (Val::Number(a), Val::Number(b)) => a == b,
            (Val::Symbol(a), Val::Symbol(b)) => a == b,
            (Val::Str(a), Val::Str(b)) => a == b,
            (Val::Primitive(a), Val::Primitive(b)) => a == b,
            (Val::Pair(a), Val::Pair(b)) => a == b,
            (Val::Closure(a), Val::Closure(b)) => a == b,
            (Val::Nil, Val::Nil) => true,
            (Val::Fault, Val::Fault) => true,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbers_compare_by_value() {
        assert!(Val::Number(1.5).same(Val::Number(1.5)));
        assert!(!Val::Number(1.5).same(Val::Number(2.0)));
        assert!(!Val::Number(f64::NAN).same(Val::Number(f64::NAN)));
    }

    #[test]
    fn pairs_and_closures_never_alias() {
        let r = PairRef(4);
        assert!(Val::Pair(r).same(Val::Pair(r)));
        assert!(!Val::Pair(r).same(Val::Closure(r)));
        assert!(!Val::Pair(r).same(Val::Pair(PairRef(6))));
    }

    #[test]
    fn fault_is_not_a_symbol() {
        assert!(!Val::Fault.same(Val::Symbol(SymRef(0))));
        assert!(Val::Fault.same(Val::Fault));
        assert!(Val::Nil.same(Val::Nil));
    }

    #[test]
    fn cell_covers_pair_and_closure() {
        assert_eq!(Val::Pair(PairRef(2)).as_cell(), Some(PairRef(2)));
        assert_eq!(Val::Closure(PairRef(8)).as_cell(), Some(PairRef(8)));
        assert_eq!(Val::Nil.as_cell(), None);
    }
}
