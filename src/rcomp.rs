//! The CNF-oriented canonical composite.
//!
//! [`Rcomp`] carries the same normalized union/intersection structure as
//! [`Acomp`][crate::acomp::Acomp] but canonicalizes toward a product of
//! sums: [`make_cnf`](Rcomp::make_cnf) enumerates the falsifying
//! assignments, minimizes them with the shared Quine-McCluskey
//! machinery, and rebuilds the composite as a minimal intersection of
//! clauses. Structural invariants match `Acomp`: sorted duplicate-free
//! units and components, no same-type nesting, no singular nodes.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use log::debug;

use crate::acomp::Acomp;
use crate::bnid::{BnId, Tri};
use crate::error::{EvalError, ParseError};
use crate::minimize::{make_epi, make_pi};
use crate::token::letter;

/// A canonical boolean composite kept in (or driven toward) CNF.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Rcomp {
    intersect: bool,
    units: Vec<i32>,
    comp: Vec<Rcomp>,
}

impl Default for Rcomp {
    fn default() -> Self {
        Self {
            intersect: true,
            units: Vec::new(),
            comp: Vec::new(),
        }
    }
}

impl From<&Acomp> for Rcomp {
    fn from(a: &Acomp) -> Self {
        Self {
            intersect: a.is_intersect(),
            units: a.units().to_vec(),
            comp: a.components().iter().map(Rcomp::from).collect(),
        }
    }
}

impl Rcomp {
    /// An empty AND node.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses an expression in the letters grammar into `self`.
    ///
    /// The grammar and error reporting are shared with
    /// [`Acomp::set_string`]; the parsed tree is carried over
    /// structurally.
    pub fn set_string(&mut self, expr: &str) -> Result<(), ParseError> {
        let mut a = Acomp::intersection();
        a.set_string(expr)?;
        *self = Rcomp::from(&a);
        Ok(())
    }

    pub fn is_intersect(&self) -> bool {
        self.intersect
    }

    pub fn units(&self) -> &[i32] {
        &self.units
    }

    pub fn components(&self) -> &[Rcomp] {
        &self.comp
    }

    pub fn is_null(&self) -> bool {
        self.units.is_empty() && self.comp.is_empty()
    }

    /// True when this is an intersection whose children are all plain
    /// sums.
    pub fn is_cnf(&self) -> bool {
        self.intersect && self.comp.iter().all(|c| c.comp.is_empty())
    }

    /// De Morgan push, mirroring [`Acomp::complement`].
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

    /// Evaluates against an assignment of `+1` / `-1` per absolute
    /// literal id. Same contract as [`Acomp::is_true`].
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

    /// Sorted absolute literal ids.
    pub fn keys(&self) -> Vec<i32> {
        let mut set = BTreeSet::new();
        self.get_abs_literals(&mut set);
        set.into_iter().collect()
    }

    fn get_abs_literals(&self, set: &mut BTreeSet<i32>) {
        for &u in &self.units {
            set.insert(u.abs());
        }
        for c in &self.comp {
            c.get_abs_literals(set);
        }
    }

    /// Enumerates the falsifying assignments as cubes (the maxterm set).
    ///
    /// A literal-free composite is an error, matching the DNF side.
    ///
    /// # Panics
    ///
    /// Panics if the composite has 63 or more distinct literals.
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

    /// Rebuilds `self` as an intersection of clauses, one per cube of
    /// falsifying assignments. An empty cube list leaves a null
    /// composite (constant true).
    pub fn assign_cnf(&mut self, keys: &[i32], cubes: &[BnId]) {
        self.intersect = true;
        self.units.clear();
        self.comp.clear();
        for cube in cubes {
            let mut units = Vec::new();
            for (i, &k) in keys.iter().enumerate() {
                match cube.get(i) {
                    Tri::One => units.push(-k),
                    Tri::Zero => units.push(k),
                    Tri::DontCare => {}
                }
            }
            units.sort_unstable();
            if units.len() == 1 {
                if let Err(idx) = self.units.binary_search(&units[0]) {
                    self.units.insert(idx, units[0]);
                }
            } else if !units.is_empty() {
                let clause = Rcomp {
                    intersect: false,
                    units,
                    comp: Vec::new(),
                };
                if let Err(idx) = self.comp.binary_search(&clause) {
                    self.comp.insert(idx, clause);
                }
            }
        }
        // Single clause: promote it, mirroring the DNF side.
        if self.units.is_empty() && self.comp.len() == 1 {
            let clause = self.comp.pop().unwrap();
            *self = clause;
        }
    }

    /// Canonicalizes `self` to a minimal product of sums.
    ///
    /// Returns the clause count; `0` means the composite was a
    /// tautology and is now null.
    pub fn make_cnf(&mut self) -> Result<usize, EvalError> {
        let (keys, maxterms) = self.get_cnf_object()?;
        let pis = make_pi(&maxterms);
        let cover = make_epi(&maxterms, &pis);
        debug!(
            "make_cnf: {} maxterms -> {} PIs -> {} clauses",
            maxterms.len(),
            pis.len(),
            cover.len()
        );
        self.assign_cnf(&keys, &cover);
        Ok(cover.len())
    }

    /// Truth-table equivalence over the union of both literal
    /// universes. A null composite compares as its join type's
    /// constant: an empty intersection is true (what a tautology
    /// collapses to under [`make_cnf`](Rcomp::make_cnf)), an empty
    /// union false.
    pub fn logical_equal(&self, other: &Rcomp) -> bool {
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
}

impl fmt::Display for Rcomp {
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
