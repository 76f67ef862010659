//! Printer for arenalisp values.

use crate::arena::Arena;
use crate::builtins::PRIMITIVES;
use crate::symbol::SymbolTable;
use crate::value::Val;

/// Significant digits used when printing numbers.
const NUMBER_DIGITS: i32 = 16;

/// Render a value as text.
pub fn print_val(val: Val, arena: &Arena, syms: &SymbolTable) -> String {
    let mut buf = String::new();
    write_val(val, arena, syms, &mut buf);
    buf
}

fn write_val(val: Val, arena: &Arena, syms: &SymbolTable, buf: &mut String) {
    match val {
        Val::Nil => buf.push_str("()"),
        Val::Number(n) => buf.push_str(&format_number(n)),
        Val::Symbol(s) | Val::Str(s) => buf.push_str(syms.name(s)),
        Val::Pair(_) => write_list(val, arena, syms, buf),
        Val::Closure(r) => buf.push_str(&format!("{{lambda at #{}}}", r.index())),
        Val::Primitive(id) => {
            let name = PRIMITIVES.get(id.index()).map_or("?", |p| p.name);
            buf.push_str(&format!("<compiled function {name} at #{}>", id.index()));
        }
        Val::Fault => buf.push_str("ERR"),
    }
}

fn write_list(val: Val, arena: &Arena, syms: &SymbolTable, buf: &mut String) {
    buf.push('(');
    let mut current = val;
    while current.is_pair() {
        write_val(arena.car(current), arena, syms, buf);
        current = arena.cdr(current);
        match current {
            Val::Nil => break,
            Val::Pair(_) => buf.push(' '),
            tail => {
                buf.push_str(" . ");
                write_val(tail, arena, syms, buf);
                break;
            }
        }
    }
    buf.push(')');
}

/// Format a number like C's `%.16g`: up to 16 significant digits, trailing
/// zeros dropped, scientific notation for very large or very small values.
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "nan".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    // Round to the target precision first; the exponent of the rounded value
    // decides between fixed and scientific notation.
    let sci = format!("{:.*e}", (NUMBER_DIGITS - 1) as usize, n);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };

    if (-4..NUMBER_DIGITS).contains(&exp) {
        let fixed = format!("{:.*}", (NUMBER_DIGITS - 1 - exp) as usize, n);
        trim_fraction(&fixed).to_string()
    } else {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_fraction(mantissa), sign, exp.abs())
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}
