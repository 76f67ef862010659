//! Bump-allocated pair arena.
//!
//! Every compound value (pair, closure) is two consecutive slots in one
//! vector of values. Allocation appends at the top; the only way memory comes
//! back is [`Arena::truncate`], which lowers the top and frees every slot at
//! or above it. No marking, no compaction.
//!
//! A reference at or above the current top is dangling. Reading one is a
//! defined fault here: [`Arena::deref`] answers `None` and `car`/`cdr` answer
//! the fault sentinel. Once the slots are handed out again, an old reference
//! reads whatever now lives there.

use crate::error::{LispError, Result};
use crate::value::{PairRef, Val};

pub struct Arena {
    slots: Vec<Val>,
    capacity: usize,
}

impl Arena {
    pub fn new(capacity: usize) -> Self {
        Arena {
            slots: Vec::with_capacity(capacity),
            capacity,
        }
    }

    // ── Allocation ──

    /// Store `head` and `tail` at the top and return the first slot's index.
    pub fn alloc_pair(&mut self, head: Val, tail: Val) -> Result<PairRef> {
        let index = self.slots.len();
        if index + 2 > self.capacity {
            return Err(LispError::ArenaExhausted {
                capacity: self.capacity,
            });
        }
        self.slots.push(head);
        self.slots.push(tail);
        Ok(PairRef(index as u32))
    }

    /// Allocate a pair and wrap it as a list value.
    pub fn cons(&mut self, head: Val, tail: Val) -> Result<Val> {
        Ok(Val::Pair(self.alloc_pair(head, tail)?))
    }

    /// Build a proper list from a slice.
    pub fn list(&mut self, vals: &[Val]) -> Result<Val> {
        let mut result = Val::Nil;
        for v in vals.iter().rev() {
            result = self.cons(*v, result)?;
        }
        Ok(result)
    }

    // ── Access ──

    pub fn deref(&self, r: PairRef) -> Option<(Val, Val)> {
        let i = r.index();
        if i + 1 < self.slots.len() {
            Some((self.slots[i], self.slots[i + 1]))
        } else {
            None
        }
    }

    /// Head of a pair or closure; the fault sentinel for anything else.
    pub fn car(&self, val: Val) -> Val {
        val.as_cell()
            .and_then(|r| self.deref(r))
            .map_or(Val::Fault, |(head, _)| head)
    }

    /// Tail of a pair or closure; the fault sentinel for anything else.
    pub fn cdr(&self, val: Val) -> Val {
        val.as_cell()
            .and_then(|r| self.deref(r))
            .map_or(Val::Fault, |(_, tail)| tail)
    }

    /// Collect the heads of a pair chain, stopping at the first non-pair tail.
    pub fn list_to_vec(&self, mut val: Val) -> Vec<Val> {
        let mut result = Vec::new();
        while let Val::Pair(r) = val {
            match self.deref(r) {
                Some((head, tail)) => {
                    result.push(head);
                    val = tail;
                }
                None => break,
            }
        }
        result
    }

    // ── Reclamation ──

    /// Index of the next free slot.
    pub fn top(&self) -> usize {
        self.slots.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Free every slot at or above `new_top`. Returns the number of slots freed.
    pub fn truncate(&mut self, new_top: usize) -> usize {
        let freed = self.slots.len().saturating_sub(new_top);
        self.slots.truncate(new_top);
        freed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_take_two_consecutive_slots() {
        let mut arena = Arena::new(16);
        let a = arena.alloc_pair(Val::Number(1.0), Val::Nil).unwrap();
        let b = arena.alloc_pair(Val::Number(2.0), Val::Pair(a)).unwrap();
        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 2);
        assert_eq!(arena.top(), 4);
        let (head, tail) = arena.deref(b).unwrap();
        assert_eq!(head.as_number(), Some(2.0));
        assert!(tail.same(Val::Pair(a)));
    }

    #[test]
    fn car_and_cdr_of_atoms_fault() {
        let arena = Arena::new(4);
        assert!(arena.car(Val::Number(3.0)).is_fault());
        assert!(arena.cdr(Val::Nil).is_fault());
    }

    #[test]
    fn closures_read_like_pairs() {
        let mut arena = Arena::new(8);
        let r = arena.alloc_pair(Val::Number(7.0), Val::Nil).unwrap();
        assert_eq!(arena.car(Val::Closure(r)).as_number(), Some(7.0));
        assert!(arena.cdr(Val::Closure(r)).is_nil());
    }

    #[test]
    fn exhaustion_is_reported() {
        let mut arena = Arena::new(4);
        arena.cons(Val::Nil, Val::Nil).unwrap();
        arena.cons(Val::Nil, Val::Nil).unwrap();
        assert_eq!(
            arena.cons(Val::Nil, Val::Nil).unwrap_err(),
            LispError::ArenaExhausted { capacity: 4 }
        );
    }

    #[test]
    fn truncation_frees_and_reuses() {
        let mut arena = Arena::new(8);
        arena.cons(Val::Number(1.0), Val::Nil).unwrap();
        let stale = arena.alloc_pair(Val::Number(2.0), Val::Nil).unwrap();
        assert_eq!(arena.truncate(2), 2);
        assert!(arena.deref(stale).is_none());
        assert!(arena.car(Val::Pair(stale)).is_fault());

        let fresh = arena.alloc_pair(Val::Number(3.0), Val::Nil).unwrap();
        assert_eq!(fresh, stale);
        assert_eq!(arena.car(Val::Pair(stale)).as_number(), Some(3.0));
    }

    #[test]
    fn list_helpers() {
        let mut arena = Arena::new(16);
        let l = arena
            .list(&[Val::Number(1.0), Val::Number(2.0), Val::Number(3.0)])
            .unwrap();
        let items: Vec<f64> = arena
            .list_to_vec(l)
            .into_iter()
            .filter_map(Val::as_number)
            .collect();
        assert_eq!(items, vec![1.0, 2.0, 3.0]);
    }
}
