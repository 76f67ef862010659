//! Primitive library.
//!
//! Each primitive receives its argument expressions exactly as written plus
//! the calling environment. Whether those expressions get evaluated is the
//! primitive's own business:
//!
//!   evaluated     + - * / < eq? not eval car cdr cons
//!   unevaluated   quote if cond and or lambda define

use crate::error::Result;
use crate::eval::Evaluator;
use crate::value::Val;

pub type PrimFn = fn(&mut Evaluator, Val, Val) -> Result<Val>;

pub struct Primitive {
    pub name: &'static str,
    pub func: PrimFn,
}

/// Registration order is also the order of the global bindings.
pub static PRIMITIVES: &[Primitive] = &[
    Primitive { name: "+", func: prim_add },
    Primitive { name: "-", func: prim_sub },
    Primitive { name: "*", func: prim_mul },
    Primitive { name: "/", func: prim_div },
    Primitive { name: "quote", func: prim_quote },
    Primitive { name: "eval", func: prim_eval },
    Primitive { name: "cons", func: prim_cons },
    Primitive { name: "car", func: prim_car },
    Primitive { name: "cdr", func: prim_cdr },
    Primitive { name: "<", func: prim_less_than },
    Primitive { name: "eq?", func: prim_eq },
    Primitive { name: "not", func: prim_not },
    Primitive { name: "or", func: prim_or },
    Primitive { name: "and", func: prim_and },
    Primitive { name: "cond", func: prim_cond },
    Primitive { name: "if", func: prim_if },
    Primitive { name: "lambda", func: prim_lambda },
    Primitive { name: "define", func: prim_define },
];

// ── Arithmetic ──

/// Fold `op` left to right over the evaluated operands. A single operand
/// comes back unchanged; any non-number operand faults.
fn numeric_fold(
    ev: &mut Evaluator,
    args: Val,
    env: Val,
    op: fn(f64, f64) -> f64,
) -> Result<Val> {
    let vals = ev.eval_list(args, env)?;
    let Val::Number(mut acc) = ev.arena.car(vals) else {
        return Ok(Val::Fault);
    };
    let mut rest = ev.arena.cdr(vals);
    while rest.is_pair() {
        match ev.arena.car(rest) {
            Val::Number(n) => acc = op(acc, n),
            _ => return Ok(Val::Fault),
        }
        rest = ev.arena.cdr(rest);
    }
    Ok(Val::Number(acc))
}

fn prim_add(ev: &mut Evaluator, args: Val, env: Val) -> Result<Val> {
    numeric_fold(ev, args, env, |a, b| a + b)
}

fn prim_sub(ev: &mut Evaluator, args: Val, env: Val) -> Result<Val> {
    numeric_fold(ev, args, env, |a, b| a - b)
}

fn prim_mul(ev: &mut Evaluator, args: Val, env: Val) -> Result<Val> {
    numeric_fold(ev, args, env, |a, b| a * b)
}

fn prim_div(ev: &mut Evaluator, args: Val, env: Val) -> Result<Val> {
    numeric_fold(ev, args, env, |a, b| a / b)
}

fn prim_less_than(ev: &mut Evaluator, args: Val, env: Val) -> Result<Val> {
    let vals = ev.eval_list(args, env)?;
    let first = ev.arena.car(vals);
    let second = ev.arena.car(ev.arena.cdr(vals));
    match (first.as_number(), second.as_number()) {
        (Some(a), Some(b)) => Ok(ev.truth(a < b)),
        _ => Ok(Val::Fault),
    }
}

// ── Lists ──

fn prim_cons(ev: &mut Evaluator, args: Val, env: Val) -> Result<Val> {
    let vals = ev.eval_list(args, env)?;
    let head = ev.arena.car(vals);
    let tail = ev.arena.car(ev.arena.cdr(vals));
    ev.arena.cons(head, tail)
}

fn prim_car(ev: &mut Evaluator, args: Val, env: Val) -> Result<Val> {
    let vals = ev.eval_list(args, env)?;
    Ok(ev.arena.car(ev.arena.car(vals)))
}

fn prim_cdr(ev: &mut Evaluator, args: Val, env: Val) -> Result<Val> {
    let vals = ev.eval_list(args, env)?;
    Ok(ev.arena.cdr(ev.arena.car(vals)))
}

// ── Predicates and logic ──

fn prim_eq(ev: &mut Evaluator, args: Val, env: Val) -> Result<Val> {
    let vals = ev.eval_list(args, env)?;
    let a = ev.arena.car(vals);
    let b = ev.arena.car(ev.arena.cdr(vals));
    Ok(ev.truth(a.same(b)))
}

fn prim_not(ev: &mut Evaluator, args: Val, env: Val) -> Result<Val> {
    let vals = ev.eval_list(args, env)?;
    Ok(ev.truth(ev.arena.car(vals).is_nil()))
}

/// First non-`()` operand, or `()`.
fn prim_or(ev: &mut Evaluator, mut args: Val, env: Val) -> Result<Val> {
    let mut x = Val::Nil;
    while args.is_pair() {
        x = ev.eval(ev.arena.car(args), env)?;
        if !x.is_nil() {
            break;
        }
        args = ev.arena.cdr(args);
    }
    Ok(x)
}

/// First `()` operand, or the last value.
fn prim_and(ev: &mut Evaluator, mut args: Val, env: Val) -> Result<Val> {
    let mut x = Val::Nil;
    while args.is_pair() {
        x = ev.eval(ev.arena.car(args), env)?;
        if x.is_nil() {
            break;
        }
        args = ev.arena.cdr(args);
    }
    Ok(x)
}

// ── Control ──

fn prim_quote(ev: &mut Evaluator, args: Val, _env: Val) -> Result<Val> {
    Ok(ev.arena.car(args))
}

fn prim_eval(ev: &mut Evaluator, args: Val, env: Val) -> Result<Val> {
    let vals = ev.eval_list(args, env)?;
    ev.eval(ev.arena.car(vals), env)
}

fn prim_if(ev: &mut Evaluator, args: Val, env: Val) -> Result<Val> {
    let test = ev.eval(ev.arena.car(args), env)?;
    let branches = ev.arena.cdr(args);
    let chosen = if test.is_nil() {
        ev.arena.car(ev.arena.cdr(branches))
    } else {
        ev.arena.car(branches)
    };
    ev.eval(chosen, env)
}

/// Evaluate the consequent of the first clause whose test is not `()`.
/// Running out of clauses is a fault.
fn prim_cond(ev: &mut Evaluator, mut clauses: Val, env: Val) -> Result<Val> {
    while clauses.is_pair() {
        let clause = ev.arena.car(clauses);
        let test = ev.eval(ev.arena.car(clause), env)?;
        if !test.is_nil() {
            return ev.eval(ev.arena.car(ev.arena.cdr(clause)), env);
        }
        clauses = ev.arena.cdr(clauses);
    }
    Ok(Val::Fault)
}

fn prim_lambda(ev: &mut Evaluator, args: Val, env: Val) -> Result<Val> {
    let params = ev.arena.car(args);
    let body = ev.arena.car(ev.arena.cdr(args));
    ev.closure(params, body, env)
}

/// Bind a name in the global environment, whatever the lexical nesting.
fn prim_define(ev: &mut Evaluator, args: Val, env: Val) -> Result<Val> {
    let name = ev.arena.car(args);
    let val = ev.eval(ev.arena.car(ev.arena.cdr(args)), env)?;
    ev.define(name, val)?;
    Ok(name)
}
