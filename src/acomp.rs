//! The canonical n-ary boolean composite, oriented toward DNF.
//!
//! An [`Acomp`] node is either an AND (`intersect == true`) or an OR over
//! its direct literals (`units`) and nested composites (`comp`). The
//! structure is kept in a normalized shape at all times:
//!
//! # Invariants
//!
//! - `units` is sorted and duplicate-free (binary-search insertion);
//! - `comp` is sorted and duplicate-free, and no child shares the
//!   parent's join type (such children are transient and flattened
//!   immediately by [`join_depth`](Acomp::join_depth));
//! - singular nodes (one unit or one child in total) are promoted into
//!   their parent;
//! - a node with no units and no children is "null", an error state for
//!   most operations.
//!
//! Every public mutator re-establishes these invariants before
//! returning. Canonicalization to DNF/CNF goes through brute-force truth
//! table enumeration and the Quine-McCluskey machinery in
//! [`minimize`][crate::minimize]; both are exponential in the literal
//! count and intended for the small expressions cell rules produce.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::ops::{AddAssign, MulAssign, SubAssign};

use log::debug;
use num_bigint::BigUint;

use crate::bnid::{BnId, Tri};
use crate::error::{EvalError, ParseError};
use crate::minimize::{make_epi, make_pi};
use crate::token::{letter, scan_letters, Token};

/// A canonical boolean composite over signed literals.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Acomp {
    intersect: bool,
    units: Vec<i32>,
    comp: Vec<Acomp>,
}

impl Default for Acomp {
    /// An empty intersection node.
    fn default() -> Self {
        Acomp::intersection()
    }
}

impl Acomp {
    /// An empty AND node.
    pub fn intersection() -> Self {
        Self {
            intersect: true,
            units: Vec::new(),
            comp: Vec::new(),
        }
    }

    /// An empty OR node.
    pub fn union() -> Self {
        Self {
            intersect: false,
            units: Vec::new(),
            comp: Vec::new(),
        }
    }

    /// A node of the given join type over the given literals.
    ///
    /// # Panics
    ///
    /// Panics if any literal is zero.
    pub fn from_units(intersect: bool, units: &[i32]) -> Self {
        let mut node = Self {
            intersect,
            units: Vec::new(),
            comp: Vec::new(),
        };
        for &u in units {
            node.insert_unit(u);
        }
        node
    }

    /// Parses an expression in the letters grammar into `self`.
    ///
    /// `#(...)` is resolved by building the inner composite and
    /// complementing it in place before it joins the enclosing term.
    pub fn set_string(&mut self, expr: &str) -> Result<(), ParseError> {
        let tokens = scan_letters(expr)?;
        if tokens.is_empty() {
            return Err(ParseError::Empty);
        }
        let mut pos = 0;
        let parsed = parse_expr(&tokens, &mut pos)?;
        if pos != tokens.len() {
            // A stray `)` is the only way to stop early.
            return Err(ParseError::UnbalancedBrackets {
                pos: tokens[pos].1,
            });
        }
        *self = parsed;
        self.normalize();
        Ok(())
    }

    /// True when this node is an AND.
    pub fn is_intersect(&self) -> bool {
        self.intersect
    }

    /// Direct literals, sorted.
    pub fn units(&self) -> &[i32] {
        &self.units
    }

    /// Nested composites, sorted.
    pub fn components(&self) -> &[Acomp] {
        &self.comp
    }

    /// No units and no components.
    pub fn is_null(&self) -> bool {
        self.units.is_empty() && self.comp.is_empty()
    }

    /// Exactly one unit or child in total. Singular nodes are unstable
    /// and get promoted into their parent by `join_depth`.
    pub fn is_singular(&self) -> bool {
        self.units.len() + self.comp.len() == 1
    }

    /// True when this is a union whose children are all plain products.
    pub fn is_dnf(&self) -> bool {
        !self.intersect && self.comp.iter().all(|c| c.comp.is_empty())
    }

    /// True when this is an intersection whose children are all plain
    /// sums.
    pub fn is_cnf(&self) -> bool {
        self.intersect && self.comp.iter().all(|c| c.comp.is_empty())
    }

    /// Inserts a literal keeping `units` sorted and duplicate-free.
    ///
    /// # Panics
    ///
    /// Panics if `unit == 0`.
    fn insert_unit(&mut self, unit: i32) {
        assert_ne!(unit, 0, "Literal 0 is reserved");
        if let Err(idx) = self.units.binary_search(&unit) {
            self.units.insert(idx, unit);
        }
    }

    /// Inserts a child composite keeping `comp` sorted and
    /// duplicate-free. Null children are dropped.
    fn insert_comp(&mut self, child: Acomp) {
        if child.is_null() {
            return;
        }
        if let Err(idx) = self.comp.binary_search(&child) {
            self.comp.insert(idx, child);
        }
    }

    /// Drops duplicate units and components.
    fn remove_eq_comp(&mut self) {
        self.units.dedup();
        self.comp.dedup();
    }

    /// Flattens same-type children and promotes singular nodes until the
    /// structural invariants hold again.
    fn join_depth(&mut self) {
        for c in &mut self.comp {
            c.join_depth();
        }
        loop {
            let mut changed = false;
            let old = std::mem::take(&mut self.comp);
            let mut keep: Vec<Acomp> = Vec::new();
            for c in old {
                if c.is_null() {
                    changed = true;
                } else if c.intersect == self.intersect || c.is_singular() {
                    for u in c.units {
                        self.insert_unit(u);
                    }
                    keep.extend(c.comp);
                    changed = true;
                } else {
                    keep.push(c);
                }
            }
            keep.sort();
            keep.dedup();
            self.comp = keep;
            if !changed {
                break;
            }
        }
        if self.units.is_empty() && self.comp.len() == 1 {
            let child = self.comp.pop().unwrap();
            *self = child;
        }
    }

    /// Re-establishes all structural invariants.
    fn normalize(&mut self) {
        self.units.sort_unstable();
        self.comp.sort();
        self.remove_eq_comp();
        self.join_depth();
    }

    /// De Morgan push: flips the join type, negates every literal, and
    /// complements every child.
    pub fn complement(&mut self) {
        self.intersect = !self.intersect;
        for u in &mut self.units {
            *u = -*u;
        }
        self.units.sort_unstable();
        for c in &mut self.comp {
            c.complement();
        }
        self.comp.sort();
    }

    /// Evaluates against an assignment of `+1` (true) / `-1` (false) per
    /// absolute literal id.
    ///
    /// A singular composite evaluates as a plain literal test regardless
    /// of its nominal join type. A required literal missing from the
    /// assignment is an error; so is evaluating a null composite.
    pub fn is_true(&self, assignment: &HashMap<i32, i32>) -> Result<bool, EvalError> {
        if self.is_null() {
            return Err(EvalError::NullComposite);
        }
        let unit_results = self.units.iter().map(|&u| {
            let v = assignment
                .get(&u.abs())
                .copied()
                .ok_or(EvalError::MissingLiteral(u.abs()))?;
            Ok((v > 0) == (u > 0))
        });
        let comp_results = self.comp.iter().map(|c| c.is_true(assignment));
        if self.intersect {
            for r in unit_results.chain(comp_results) {
                if !r? {
                    return Ok(false);
                }
            }
            Ok(true)
        } else {
            for r in unit_results.chain(comp_results) {
                if r? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
    }

    /// Accumulates signed literal frequencies, recursing through
    /// children.
    pub fn get_literals(&self, map: &mut HashMap<i32, usize>) {
        for &u in &self.units {
            *map.entry(u).or_insert(0) += 1;
        }
        for c in &self.comp {
            c.get_literals(map);
        }
    }

    /// Accumulates the absolute literal ids, recursing through children.
    pub fn get_abs_literals(&self, set: &mut BTreeSet<i32>) {
        for &u in &self.units {
            set.insert(u.abs());
        }
        for c in &self.comp {
            c.get_abs_literals(set);
        }
    }

    /// Sorted absolute literal ids of the whole composite.
    pub fn keys(&self) -> Vec<i32> {
        let mut set = BTreeSet::new();
        self.get_abs_literals(&mut set);
        set.into_iter().collect()
    }

    /// Builds the full truth table and returns the key vector plus one
    /// minterm cube per satisfying assignment.
    ///
    /// Exponential in the literal count. A literal-free composite is an
    /// error (`NullComposite`), matching the original's `-1` sentinel.
    ///
    /// # Panics
    ///
    /// Panics if the composite has 63 or more distinct literals.
    pub fn get_dnf_object(&self) -> Result<(Vec<i32>, Vec<BnId>), EvalError> {
        let keys = self.keys();
        if keys.is_empty() {
            return Err(EvalError::NullComposite);
        }
        let n = keys.len();
        assert!(n < 63, "Truth-table enumeration over {} literals", n);

        let mut cubes = Vec::new();
        let mut assignment: HashMap<i32, i32> = HashMap::with_capacity(n);
        for index in 0..(1u64 << n) {
            assignment.clear();
            for (i, &k) in keys.iter().enumerate() {
                assignment.insert(k, if (index >> i) & 1 == 1 { 1 } else { -1 });
            }
            if self.is_true(&assignment)? {
                cubes.push(BnId::from_index(n, index));
            }
        }
        debug!("get_dnf_object: {} minterms over {} literals", cubes.len(), n);
        Ok((keys, cubes))
    }

    /// The falsifying assignments, as cubes: the minterms of the
    /// complement.
    pub fn get_cnf_object(&self) -> Result<(Vec<i32>, Vec<BnId>), EvalError> {
        let keys = self.keys();
        if keys.is_empty() {
            return Err(EvalError::NullComposite);
        }
        let n = keys.len();
        assert!(n < 63, "Truth-table enumeration over {} literals", n);

        let mut cubes = Vec::new();
        let mut assignment: HashMap<i32, i32> = HashMap::with_capacity(n);
        for index in 0..(1u64 << n) {
            assignment.clear();
            for (i, &k) in keys.iter().enumerate() {
                assignment.insert(k, if (index >> i) & 1 == 1 { 1 } else { -1 });
            }
            if !self.is_true(&assignment)? {
                cubes.push(BnId::from_index(n, index));
            }
        }
        debug!("get_cnf_object: {} maxterms over {} literals", cubes.len(), n);
        Ok((keys, cubes))
    }

    /// Rebuilds `self` as a union of products from the covering cubes.
    /// An empty cube list leaves a null composite (constant false).
    pub fn assign_dnf(&mut self, keys: &[i32], cubes: &[BnId]) {
        *self = Acomp::union();
        for cube in cubes {
            let mut product = Acomp::intersection();
            for (i, &k) in keys.iter().enumerate() {
                match cube.get(i) {
                    Tri::One => product.insert_unit(k),
                    Tri::Zero => product.insert_unit(-k),
                    Tri::DontCare => {}
                }
            }
            self.insert_comp(product);
        }
        self.normalize();
    }

    /// Rebuilds `self` as an intersection of sums from cubes covering
    /// the *falsifying* assignments: each cube becomes the clause that
    /// excludes it. An empty cube list leaves a null composite
    /// (constant true).
    pub fn assign_cnf(&mut self, keys: &[i32], cubes: &[BnId]) {
        *self = Acomp::intersection();
        for cube in cubes {
            let mut clause = Acomp::union();
            for (i, &k) in keys.iter().enumerate() {
                match cube.get(i) {
                    Tri::One => clause.insert_unit(-k),
                    Tri::Zero => clause.insert_unit(k),
                    Tri::DontCare => {}
                }
            }
            self.insert_comp(clause);
        }
        self.normalize();
    }

    /// Canonicalizes `self` to a minimal sum of products.
    ///
    /// Returns the number of product terms in the cover; `0` means the
    /// composite was unsatisfiable and is now null.
    pub fn make_dnf(&mut self) -> Result<usize, EvalError> {
        let (keys, dnf) = self.get_dnf_object()?;
        let pis = make_pi(&dnf);
        let cover = make_epi(&dnf, &pis);
        debug!(
            "make_dnf: {} minterms -> {} PIs -> {} in cover",
            dnf.len(),
            pis.len(),
            cover.len()
        );
        self.assign_dnf(&keys, &cover);
        Ok(cover.len())
    }

    /// Canonicalizes `self` to a minimal product of sums.
    ///
    /// Returns the number of clauses; `0` means the composite was a
    /// tautology and is now null.
    pub fn make_cnf(&mut self) -> Result<usize, EvalError> {
        let (keys, maxterms) = self.get_cnf_object()?;
        let pis = make_pi(&maxterms);
        let cover = make_epi(&maxterms, &pis);
        debug!(
            "make_cnf: {} maxterms -> {} PIs -> {} in cover",
            maxterms.len(),
            pis.len(),
            cover.len()
        );
        self.assign_cnf(&keys, &cover);
        Ok(cover.len())
    }

    /// Algebraic (weak) division of this DNF expression by `divisor`.
    ///
    /// Each product term of `self` is split into the literals shared
    /// with `divisor` and the rest; terms whose shared part exactly
    /// matches a complete term of `divisor` contribute their remaining
    /// literals to the quotient `H`. The remainder is `self - H*divisor`
    /// (set subtraction), so `self == H*divisor + remainder` holds
    /// whenever `H*divisor` implies `self`. A quotient formed from only
    /// part of the divisor's terms can overshoot `self`; the surplus is
    /// then missing from the remainder and only
    /// `self implies H*divisor + remainder` survives.
    pub fn alg_div(&self, divisor: &Acomp) -> (Acomp, Acomp) {
        let g_terms = divisor.product_terms();
        let g_lits: BTreeSet<i32> = g_terms.iter().flatten().copied().collect();

        let mut quotient = Acomp::union();
        for term in self.product_terms() {
            let (tg, th): (Vec<i32>, Vec<i32>) =
                term.iter().copied().partition(|l| g_lits.contains(l));
            if th.is_empty() {
                continue;
            }
            if g_terms.iter().any(|g| *g == tg) {
                quotient.insert_comp(Acomp::from_units(true, &th));
            }
        }
        quotient.normalize();

        if quotient.is_null() {
            return (quotient, self.clone());
        }

        let mut product = quotient.clone();
        product *= divisor.clone();
        let mut remainder = self.clone();
        remainder -= product;
        if remainder.make_dnf().is_err() {
            remainder = Acomp::union();
        }
        (quotient, remainder)
    }

    /// The top-level product terms of a DNF-shaped composite: each
    /// direct unit is a one-literal term, each child contributes its
    /// units as one term.
    fn product_terms(&self) -> Vec<Vec<i32>> {
        // A flat AND node is a single product, not a union of literals.
        if self.intersect && self.comp.is_empty() {
            return vec![self.units.clone()];
        }
        let mut terms: Vec<Vec<i32>> = self.units.iter().map(|&u| vec![u]).collect();
        for c in &self.comp {
            terms.push(c.units.clone());
        }
        terms
    }

    /// Truth-table equivalence over the union of both literal
    /// universes. A null composite compares as its join type's
    /// constant: an empty intersection is true, an empty union false,
    /// matching what [`make_cnf`](Acomp::make_cnf) and
    /// [`make_dnf`](Acomp::make_dnf) leave behind. Exponential;
    /// intended for small expressions.
    pub fn logical_equal(&self, other: &Acomp) -> bool {
        let mut keys = BTreeSet::new();
        self.get_abs_literals(&mut keys);
        other.get_abs_literals(&mut keys);
        if keys.is_empty() {
            // Both sides are literal-free, so both are constants.
            return self.intersect == other.intersect;
        }
        let keys: Vec<i32> = keys.into_iter().collect();
        let n = keys.len();
        assert!(n < 63, "Truth-table enumeration over {} literals", n);

        let mut assignment: HashMap<i32, i32> = HashMap::with_capacity(n);
        for index in 0..(1u64 << n) {
            assignment.clear();
            for (i, &k) in keys.iter().enumerate() {
                assignment.insert(k, if (index >> i) & 1 == 1 { 1 } else { -1 });
            }
            let a = self.is_true(&assignment).unwrap_or(self.intersect);
            let b = other.is_true(&assignment).unwrap_or(other.intersect);
            if a != b {
                return false;
            }
        }
        true
    }

    /// Structural subset test on the flat top level: every direct
    /// literal of `other` also appears as a direct literal of `self`.
    /// Not full logical implication; nested components are ignored.
    pub fn contains(&self, other: &Acomp) -> bool {
        let mut it = self.units.iter().peekable();
        'outer: for u in &other.units {
            while let Some(&&v) = it.peek() {
                if v == *u {
                    continue 'outer;
                }
                if v > *u {
                    return false;
                }
                it.next();
            }
            return false;
        }
        true
    }

    /// Number of satisfying assignments over the composite's literal
    /// universe. A literal-free composite has zero.
    pub fn count_true(&self) -> BigUint {
        let keys = self.keys();
        if keys.is_empty() {
            return BigUint::ZERO;
        }
        let n = keys.len();
        assert!(n < 63, "Truth-table enumeration over {} literals", n);

        let mut count = BigUint::ZERO;
        let mut assignment: HashMap<i32, i32> = HashMap::with_capacity(n);
        for index in 0..(1u64 << n) {
            assignment.clear();
            for (i, &k) in keys.iter().enumerate() {
                assignment.insert(k, if (index >> i) & 1 == 1 { 1 } else { -1 });
            }
            if self.is_true(&assignment).unwrap_or(false) {
                count += 1u32;
            }
        }
        count
    }
}

/// Union join: `A += B` makes `A` the union of both.
impl AddAssign for Acomp {
    fn add_assign(&mut self, rhs: Acomp) {
        if self.is_null() {
            *self = rhs;
            return;
        }
        if rhs.is_null() {
            return;
        }
        if self.intersect {
            let inner = std::mem::replace(self, Acomp::union());
            self.insert_comp(inner);
        }
        if !rhs.intersect {
            for u in rhs.units {
                self.insert_unit(u);
            }
            for c in rhs.comp {
                self.insert_comp(c);
            }
        } else {
            self.insert_comp(rhs);
        }
        self.normalize();
    }
}

/// Intersection join: `A *= B` makes `A` the intersection of both.
impl MulAssign for Acomp {
    fn mul_assign(&mut self, rhs: Acomp) {
        if self.is_null() {
            *self = rhs;
            return;
        }
        if rhs.is_null() {
            return;
        }
        if !self.intersect {
            let inner = std::mem::replace(self, Acomp::intersection());
            self.insert_comp(inner);
        }
        if rhs.intersect {
            for u in rhs.units {
                self.insert_unit(u);
            }
            for c in rhs.comp {
                self.insert_comp(c);
            }
        } else {
            self.insert_comp(rhs);
        }
        self.normalize();
    }
}

/// Set subtraction: `A -= B` is `A *= complement(B)`.
impl SubAssign for Acomp {
    fn sub_assign(&mut self, rhs: Acomp) {
        let mut negated = rhs;
        negated.complement();
        *self *= negated;
    }
}

impl fmt::Display for Acomp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.intersect {
            for &u in &self.units {
                write!(f, "{}", letter(u))?;
            }
            for c in &self.comp {
                write!(f, "({})", c)?;
            }
        } else {
            let mut first = true;
            for &u in &self.units {
                if !first {
                    write!(f, "+")?;
                }
                write!(f, "{}", letter(u))?;
                first = false;
            }
            for c in &self.comp {
                if !first {
                    write!(f, "+")?;
                }
                write!(f, "({})", c)?;
                first = false;
            }
        }
        Ok(())
    }
}

/// Recursive-descent parser over letters-grammar tokens.
///
/// ```text
/// expr   := term ('+' term)*
/// term   := factor+
/// factor := literal | '(' expr ')' | '#' '(' expr ')'
/// ```
fn parse_expr(tokens: &[(Token, usize)], pos: &mut usize) -> Result<Acomp, ParseError> {
    // parse_term rejects an empty term, so at least one child lands.
    let mut expr = Acomp::union();
    loop {
        let term = parse_term(tokens, pos)?;
        expr.insert_comp(term);
        match tokens.get(*pos) {
            Some(&(Token::Union, _)) => {
                *pos += 1;
            }
            _ => break,
        }
    }
    expr.normalize();
    Ok(expr)
}

fn parse_term(tokens: &[(Token, usize)], pos: &mut usize) -> Result<Acomp, ParseError> {
    let mut term = Acomp::intersection();
    let mut any = false;
    while let Some(&(tok, tpos)) = tokens.get(*pos) {
        match tok {
            Token::Literal(v) => {
                *pos += 1;
                term.insert_unit(v);
                any = true;
            }
            Token::Open => {
                *pos += 1;
                let inner = parse_expr(tokens, pos)?;
                expect_close(tokens, pos, tpos)?;
                term.insert_comp(inner);
                any = true;
            }
            Token::Complement => {
                *pos += 1;
                match tokens.get(*pos) {
                    Some(&(Token::Open, opos)) => {
                        *pos += 1;
                        let mut inner = parse_expr(tokens, pos)?;
                        expect_close(tokens, pos, opos)?;
                        inner.complement();
                        term.insert_comp(inner);
                        any = true;
                    }
                    _ => return Err(ParseError::DanglingOperator { pos: tpos }),
                }
            }
            Token::Close | Token::Union => break,
            Token::Container => {
                return Err(ParseError::IllegalChar { ch: '%', pos: tpos })
            }
        }
    }
    if !any {
        let at = tokens
            .get(*pos)
            .map(|&(_, p)| p)
            .unwrap_or_else(|| tokens.last().map(|&(_, p)| p + 1).unwrap_or(0));
        return Err(ParseError::DanglingOperator { pos: at });
    }
    term.normalize();
    Ok(term)
}

fn expect_close(
    tokens: &[(Token, usize)],
    pos: &mut usize,
    open_pos: usize,
) -> Result<(), ParseError> {
    match tokens.get(*pos) {
        Some(&(Token::Close, _)) => {
            *pos += 1;
            Ok(())
        }
        _ => Err(ParseError::UnbalancedBrackets { pos: open_pos }),
    }
}
