//! Fatal conditions.
//!
//! Recoverable faults (unbound symbols, `car` of an atom, applying a number)
//! are not errors at all: they evaluate to [`Val::Fault`](crate::value::Val)
//! and evaluation carries on. Only the conditions below stop a session.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LispError {
    #[error("out of memory: arena capacity of {capacity} slots exhausted")]
    ArenaExhausted { capacity: usize },

    #[error("out of memory: symbol table capacity of {capacity} bytes exhausted")]
    SymbolTableExhausted { capacity: usize },

    #[error("end of input")]
    EndOfInput,

    #[error("recursion limit of {limit} nested evaluations exceeded")]
    RecursionLimit { limit: usize },

    #[error("console: {0}")]
    Console(String),
}

pub type Result<T> = std::result::Result<T, LispError>;
