//! arenalisp: a small Lisp whose pairs and closures live in a bump-allocated
//! arena, with symbols interned in a flat byte table and environments built
//! as association lists.
//!
//! ```
//! use arenalisp::{Config, Evaluator};
//!
//! let mut ev = Evaluator::new(&Config::default()).unwrap();
//! let out = ev.run_str("(define sq (lambda (x) (* x x)))\n(sq 12)").unwrap();
//! assert_eq!(out, vec!["sq", "144"]);
//! ```

pub mod arena;
pub mod builtins;
pub mod config;
pub mod env;
pub mod error;
pub mod eval;
pub mod parser;
pub mod printer;
pub mod repl;
pub mod symbol;
pub mod value;

pub use config::Config;
pub use error::LispError;
pub use eval::Evaluator;
pub use parser::{LineSource, Reader, StrSource};
pub use value::Val;
