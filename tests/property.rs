// Property tests for reading, printing and symbol identity.

use arenalisp::printer::format_number;
use arenalisp::symbol::SymbolTable;
use arenalisp::{Config, Evaluator};
use proptest::prelude::*;

fn session() -> Evaluator {
    Evaluator::new(&Config::default()).unwrap()
}

/// Symbol-safe names: never numbers, never delimiters.
fn arb_name() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9?!*-]{0,12}".prop_filter("not a float literal", |s| {
        s.parse::<f64>().is_err()
    })
}

proptest! {
    #[test]
    fn integers_round_trip(n in -1_000_000_000i64..1_000_000_000) {
        let mut ev = session();
        let text = n.to_string();
        let out = ev.run_str(&text).unwrap();
        prop_assert_eq!(out, vec![text]);
    }

    #[test]
    fn printed_numbers_are_fixed_points(x in any::<f64>().prop_filter("finite", |x| x.is_finite())) {
        let mut ev = session();
        let printed = format_number(x);
        let out = ev.run_str(&printed).unwrap();
        prop_assert_eq!(out, vec![printed]);
    }

    #[test]
    fn interning_is_identity(a in arb_name(), b in arb_name()) {
        let mut syms = SymbolTable::new(1024);
        let ra = syms.intern(&a).unwrap();
        let rb = syms.intern(&b).unwrap();
        prop_assert_eq!(ra == rb, a == b);
        prop_assert_eq!(syms.intern(&a).unwrap(), ra);
        prop_assert_eq!(syms.name(rb), b.as_str());
    }

    #[test]
    fn freshly_read_symbols_are_eq(name in arb_name()) {
        let mut ev = session();
        let src = format!("(eq? '{name} '{name})");
        let out = ev.run_str(&src).unwrap();
        prop_assert_eq!(out, vec!["#t".to_string()]);
    }

    #[test]
    fn quoted_lists_print_as_read(items in prop::collection::vec(-1000i32..1000, 0..12)) {
        let mut ev = session();
        let body: Vec<String> = items.iter().map(|n| n.to_string()).collect();
        let text = format!("({})", body.join(" "));
        let out = ev.run_str(&format!("'{text}")).unwrap();
        prop_assert_eq!(out, vec![text]);
    }
}
