//! Evaluator for arenalisp: eval/apply over association-list environments.
//!
//! `eval` never evaluates the arguments of a call itself. It evaluates the
//! operator, then hands the raw argument expressions to `apply`; each
//! primitive decides for itself whether to run them through `eval_list`.
//! That is what lets `quote`, `if`, `lambda` and `define` be ordinary
//! table entries.

use tracing::{debug, trace};

use crate::arena::Arena;
use crate::builtins::PRIMITIVES;
use crate::config::Config;
use crate::env::{self, GlobalEnv};
use crate::error::{LispError, Result};
use crate::parser::{LineSource, Reader, StrSource};
use crate::printer;
use crate::symbol::SymbolTable;
use crate::value::{PrimId, Val};

pub struct Evaluator {
    pub arena: Arena,
    pub syms: SymbolTable,
    pub globals: GlobalEnv,
    /// The true value: the symbol `#t`, bound to itself at the root.
    pub tru: Val,
    token_max: usize,
    max_depth: usize,
    depth: usize,
}

impl Evaluator {
    /// Build the root binding and register every primitive.
    pub fn new(config: &Config) -> Result<Self> {
        let mut arena = Arena::new(config.arena_slots);
        let mut syms = SymbolTable::new(config.symbol_bytes);
        let tru = Val::Symbol(syms.intern("#t")?);
        let globals = GlobalEnv::root(&mut arena, tru, tru)?;

        let mut eval = Evaluator {
            arena,
            syms,
            globals,
            tru,
            token_max: config.token_max,
            max_depth: config.max_depth,
            depth: 0,
        };
        eval.register_builtins()?;
        Ok(eval)
    }

    fn register_builtins(&mut self) -> Result<()> {
        for (i, prim) in PRIMITIVES.iter().enumerate() {
            let name = Val::Symbol(self.syms.intern(prim.name)?);
            self.globals
                .define(&mut self.arena, name, Val::Primitive(PrimId(i as u8)))?;
        }
        self.globals.seal(&self.arena);
        debug!(
            primitives = PRIMITIVES.len(),
            slots = self.arena.top(),
            "global environment ready"
        );
        Ok(())
    }

    /// The current head of the global environment.
    pub fn global_env(&self) -> Val {
        self.globals.head()
    }

    // ── REPL cycle ──

    /// One read-eval-print cycle: read an expression, evaluate it in the
    /// global environment, render the result and reclaim the arena.
    pub fn rep<S: LineSource>(&mut self, reader: &mut Reader<S>) -> Result<String> {
        let expr = reader.read(&mut self.arena, &mut self.syms)?;
        let val = self.eval(expr, self.global_env())?;
        let text = printer::print_val(val, &self.arena, &self.syms);
        self.reclaim();
        Ok(text)
    }

    /// Run cycles over `text` until it is used up, collecting each printed
    /// result.
    pub fn run_str(&mut self, text: &str) -> Result<Vec<String>> {
        let mut reader = self.reader(StrSource::new(text));
        let mut results = Vec::new();
        loop {
            match self.rep(&mut reader) {
                Ok(out) => results.push(out),
                Err(LispError::EndOfInput) => return Ok(results),
                Err(e) => return Err(e),
            }
        }
    }

    /// A reader using this session's token limit.
    pub fn reader<S: LineSource>(&self, source: S) -> Reader<S> {
        Reader::new(source, self.token_max)
    }

    /// Render a value with this session's arena and symbols.
    pub fn print(&self, val: Val) -> String {
        printer::print_val(val, &self.arena, &self.syms)
    }

    /// Truncate the arena to just above the newest global binding.
    ///
    /// Global bindings are only ever prepended, so the chain read from its
    /// head runs through strictly lower indices down to the root; everything
    /// above the head pair belongs to the finished top-level evaluation.
    /// Returns the number of slots freed.
    pub fn reclaim(&mut self) -> usize {
        let new_top = self.globals.reclaim_point();
        assert!(
            new_top >= self.globals.base() && new_top <= self.arena.top(),
            "reclaim point {new_top} outside [{}, {}]",
            self.globals.base(),
            self.arena.top()
        );
        debug_assert!(self.global_chain_descends(), "global bindings out of order");
        let freed = self.arena.truncate(new_top);
        debug!(freed, top = new_top, "reclaimed arena");
        freed
    }

    fn global_chain_descends(&self) -> bool {
        let mut env = self.globals.head();
        let mut last = usize::MAX;
        while let Val::Pair(r) = env {
            if r.index() >= last {
                return false;
            }
            last = r.index();
            env = self.arena.cdr(env);
        }
        true
    }

    // ── Core ──

    pub fn eval(&mut self, expr: Val, env: Val) -> Result<Val> {
        if self.depth >= self.max_depth {
            return Err(LispError::RecursionLimit {
                limit: self.max_depth,
            });
        }
        self.depth += 1;
        let result = self.eval_inner(expr, env);
        self.depth -= 1;
        result
    }

    fn eval_inner(&mut self, expr: Val, env: Val) -> Result<Val> {
        match expr {
            Val::Number(_) => Ok(expr),
            Val::Symbol(_) => Ok(env::assoc(&self.arena, expr, env)),
            Val::Pair(_) => {
                let op = self.eval(self.arena.car(expr), env)?;
                self.apply(op, self.arena.cdr(expr), env)
            }
            // the sentinel stays the sentinel, like an unbound name would
            Val::Fault => Ok(Val::Fault),
            _ => Ok(Val::Nil),
        }
    }

    /// Evaluate each element of a list, producing a fresh list.
    ///
    /// A symbol in tail position is looked up instead, so `(f . args)`
    /// passes the list bound to `args`.
    pub fn eval_list(&mut self, exprs: Val, env: Val) -> Result<Val> {
        match exprs {
            Val::Pair(_) => {
                let head = self.eval(self.arena.car(exprs), env)?;
                let tail = self.eval_list(self.arena.cdr(exprs), env)?;
                self.arena.cons(head, tail)
            }
            Val::Symbol(_) => Ok(env::assoc(&self.arena, exprs, env)),
            _ => Ok(Val::Nil),
        }
    }

    pub fn apply(&mut self, op: Val, args: Val, env: Val) -> Result<Val> {
        match op {
            Val::Primitive(id) => match PRIMITIVES.get(id.index()) {
                Some(prim) => (prim.func)(self, args, env),
                None => Ok(Val::Fault),
            },
            Val::Closure(_) => self.reduce(op, args, env),
            _ => {
                trace!(operator = %self.print(op), "applied a non-function");
                Ok(Val::Fault)
            }
        }
    }

    /// Call a closure: bind its parameters to the arguments (evaluated in
    /// the caller's environment) over its captured environment, or over the
    /// global one when it captured none, then evaluate the body.
    fn reduce(&mut self, closure: Val, args: Val, env: Val) -> Result<Val> {
        let lambda = self.arena.car(closure);
        let params = self.arena.car(lambda);
        let body = self.arena.cdr(lambda);
        let captured = match self.arena.cdr(closure) {
            Val::Nil => self.global_env(),
            frame => frame,
        };
        let values = self.eval_list(args, env)?;
        let frame = env::bind(&mut self.arena, params, values, captured)?;
        self.eval(body, frame)
    }

    /// Build a closure over `env`. A closure made directly in the global
    /// environment stores `()` and sees later global definitions.
    pub fn closure(&mut self, params: Val, body: Val, env: Val) -> Result<Val> {
        let captured = if self.globals.is_global(env) {
            Val::Nil
        } else {
            env
        };
        let lambda = self.arena.cons(params, body)?;
        let cell = self.arena.alloc_pair(lambda, captured)?;
        Ok(Val::Closure(cell))
    }

    /// Prepend a binding to the global environment.
    pub fn define(&mut self, name: Val, val: Val) -> Result<()> {
        debug!(binding = %self.print(name), "define");
        self.globals.define(&mut self.arena, name, val)
    }

    /// `#t` or `()`.
    pub fn truth(&self, b: bool) -> Val {
        if b {
            self.tru
        } else {
            Val::Nil
        }
    }
}
