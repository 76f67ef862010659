//! Environments for arenalisp.
//!
//! An environment is an association list built from arena pairs:
//!
//!   ((name . value) (name . value) ... )
//!
//! searched front to back, first match wins. New bindings are prepended, so
//! older ones stay reachable underneath and shadowing costs nothing.

use crate::arena::Arena;
use crate::error::Result;
use crate::value::Val;

/// Prepend `(key . val)` to `env`.
pub fn append_pair(arena: &mut Arena, key: Val, val: Val, env: Val) -> Result<Val> {
    let binding = arena.cons(key, val)?;
    arena.cons(binding, env)
}

/// Find the value bound to `key`, or the fault sentinel when nothing matches.
pub fn assoc(arena: &Arena, key: Val, mut env: Val) -> Val {
    while env.is_pair() {
        let binding = arena.car(env);
        if key.same(arena.car(binding)) {
            return arena.cdr(binding);
        }
        env = arena.cdr(env);
    }
    Val::Fault
}

/// Bind a parameter list against argument values on top of `env`.
///
/// `()` binds nothing (surplus arguments are dropped), a pair binds its head
/// to the next argument and continues with the tails, and a bare symbol takes
/// all remaining arguments as a list. Missing arguments bind to the fault
/// sentinel.
pub fn bind(arena: &mut Arena, mut params: Val, mut args: Val, mut env: Val) -> Result<Val> {
    loop {
        match params {
            Val::Nil => return Ok(env),
            Val::Pair(_) => {
                let (name, value) = (arena.car(params), arena.car(args));
                env = append_pair(arena, name, value, env)?;
                params = arena.cdr(params);
                args = arena.cdr(args);
            }
            _ => return append_pair(arena, params, args, env),
        }
    }
}

/// The process-wide global environment.
///
/// `head` is the newest binding pair. `base` is the arena top right after
/// the startup bindings were made; reclamation never goes below it.
#[derive(Debug, Clone, Copy)]
pub struct GlobalEnv {
    head: Val,
    base: usize,
}

impl GlobalEnv {
    /// Create the root binding `(key . val)`. Must be the first allocation.
    pub fn root(arena: &mut Arena, key: Val, val: Val) -> Result<Self> {
        let head = append_pair(arena, key, val, Val::Nil)?;
        Ok(GlobalEnv {
            head,
            base: arena.top(),
        })
    }

    pub fn head(&self) -> Val {
        self.head
    }

    pub fn base(&self) -> usize {
        self.base
    }

    /// Prepend a global binding.
    pub fn define(&mut self, arena: &mut Arena, key: Val, val: Val) -> Result<()> {
        self.head = append_pair(arena, key, val, self.head)?;
        Ok(())
    }

    /// Freeze the current bindings as the floor for reclamation.
    pub fn seal(&mut self, arena: &Arena) {
        self.base = arena.top();
    }

    /// True when `env` is the global environment itself.
    pub fn is_global(&self, env: Val) -> bool {
        env.same(self.head)
    }

    /// First slot past the head binding pair: everything above it is garbage
    /// once a top-level evaluation has finished.
    pub fn reclaim_point(&self) -> usize {
        self.head.as_cell().map_or(self.base, |r| r.index() + 2)
    }
}
