//! Cross-module tests for the boolean composite algebra.
//!
//! Covers parse/display round-trips, the laws the canonical composites
//! must satisfy (De Morgan, involution, idempotence), DNF/CNF agreement,
//! algebraic division, and the rule-tree bridge via truth assignments.

use std::collections::HashMap;

use halfrule::acomp::Acomp;
use halfrule::parser;
use halfrule::rcomp::Rcomp;

fn acomp(expr: &str) -> Acomp {
    let mut a = Acomp::intersection();
    a.set_string(expr).unwrap();
    a
}

fn rcomp(expr: &str) -> Rcomp {
    let mut r = Rcomp::new();
    r.set_string(expr).unwrap();
    r
}

// ─── Parse / Display ───────────────────────────────────────────────────────────

#[test]
fn letters_display_reparses_equivalent() {
    for expr in [
        "a(b+c')",
        "ab+a'c",
        "#(ab)c",
        "a'b'c'+abc",
        "x(y+z(p+q))",
    ] {
        let a = acomp(expr);
        let again = acomp(&a.to_string());
        assert!(a.logical_equal(&again), "display broke {}", expr);
    }
}

#[test]
fn numbers_display_reparses_equal() {
    for expr in ["7 -17 111 -121", "1 ( 2 : -3 )", "#( 4 5 ) 6", "%2 1"] {
        let rule = parser::parse(expr).unwrap();
        let again = parser::parse(&rule.to_string()).unwrap();
        assert_eq!(rule, again, "display broke {}", expr);
    }
}

// ─── Algebraic laws ────────────────────────────────────────────────────────────

#[test]
fn de_morgan() {
    // #(ab) == a' + b'
    let mut lhs = acomp("ab");
    lhs.complement();
    assert!(lhs.logical_equal(&acomp("a'+b'")));

    // #(a+b) == a'b'
    let mut lhs = acomp("a+b");
    lhs.complement();
    assert!(lhs.logical_equal(&acomp("a'b'")));
}

#[test]
fn complement_involution() {
    for expr in ["a(b+c')", "ab+a'c", "#(ab)c", "a+b+c"] {
        let a = acomp(expr);
        let mut twice = a.clone();
        twice.complement();
        twice.complement();
        assert!(a.logical_equal(&twice), "involution broke {}", expr);
    }
}

#[test]
fn idempotent_operators() {
    let a = acomp("ab+c");
    let mut doubled = a.clone();
    doubled += acomp("ab+c");
    assert!(doubled.logical_equal(&a));

    let b = acomp("a(b+c)");
    let mut squared = b.clone();
    squared *= acomp("a(b+c)");
    assert!(squared.logical_equal(&b));
}

#[test]
fn absorption_via_dnf() {
    // a + ab == a
    let mut f = acomp("a+ab");
    f.make_dnf().unwrap();
    assert_eq!(f.to_string(), "a");
}

// ─── DNF / CNF agreement ───────────────────────────────────────────────────────

#[test]
fn dnf_and_cnf_stay_equivalent() {
    for expr in ["ab+c", "a(b+c')", "ab+a'c+bc", "(a+b)(c+d)"] {
        let original = acomp(expr);

        let mut dnf = original.clone();
        dnf.make_dnf().unwrap();
        assert!(dnf.is_dnf(), "{} not DNF-shaped", expr);
        assert!(dnf.logical_equal(&original), "DNF changed {}", expr);

        let mut cnf = Rcomp::from(&original);
        cnf.make_cnf().unwrap();
        assert!(cnf.is_cnf(), "{} not CNF-shaped", expr);
        assert!(cnf.logical_equal(&rcomp(expr)), "CNF changed {}", expr);
    }
}

#[test]
fn consensus_term_is_dropped() {
    // ab + a'c + bc: the bc term is redundant.
    let mut f = acomp("ab+a'c+bc");
    let terms = f.make_dnf().unwrap();
    assert_eq!(terms, 2);
    assert!(f.logical_equal(&acomp("ab+a'c")));
}

#[test]
fn contradiction_minimizes_to_null() {
    let mut f = acomp("aa'");
    assert_eq!(f.make_dnf(), Ok(0));
    assert!(f.is_null());
}

#[test]
fn model_count_survives_minimization() {
    // ab + a'c + bc minimizes to ab + a'c, which keeps all three
    // literals, so the model count over the same universe is unchanged.
    let f = acomp("ab+a'c+bc");
    let before = f.count_true();
    let mut g = f.clone();
    g.make_dnf().unwrap();
    assert_eq!(g.keys(), f.keys());
    assert_eq!(g.count_true(), before);
}

// ─── Algebraic division ────────────────────────────────────────────────────────

#[test]
fn division_identity_holds() {
    // f = ab + ac + d, g = a: f == g * (b + c) + d.
    let f = acomp("ab+ac+d");
    let g = acomp("a");
    let (quotient, remainder) = f.alg_div(&g);
    assert!(quotient.logical_equal(&acomp("b+c")));

    let mut rebuilt = g.clone();
    rebuilt *= quotient;
    rebuilt += remainder;
    assert!(rebuilt.logical_equal(&f));
}

#[test]
fn division_by_foreign_literal_leaves_remainder() {
    let f = acomp("ab+c");
    let g = acomp("x");
    let (quotient, remainder) = f.alg_div(&g);
    assert!(quotient.is_null());
    assert!(remainder.logical_equal(&f));
}

// ─── Composite vs rule tree ────────────────────────────────────────────────────

#[test]
fn composite_and_tree_agree_on_assignments() {
    // Same function written in both grammars: a(b + c') over surfaces
    // 1, 2, 3 versus `1 (2 : -3)`.
    let a = acomp("a(b+c')");
    let rule = parser::parse("1 (2 : -3)").unwrap();

    for bits in 0u32..8 {
        let mut assignment: HashMap<i32, i32> = HashMap::new();
        let mut map: HashMap<i32, bool> = HashMap::new();
        for (i, key) in [1, 2, 3].into_iter().enumerate() {
            let v = (bits >> i) & 1 == 1;
            assignment.insert(key, if v { 1 } else { -1 });
            map.insert(key, v);
        }
        assert_eq!(
            a.is_true(&assignment).unwrap(),
            rule.is_valid_map(&map).unwrap(),
            "disagreement at bits {:03b}",
            bits
        );
    }
}
