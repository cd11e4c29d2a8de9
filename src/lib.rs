//! # halfrule: boolean half-space algebra for CSG cells
//!
//! **`halfrule`** represents, simplifies, and converts the signed-surface
//! boolean expressions that constructive-solid-geometry cell descriptions
//! are made of. A cell's boundary logic arrives as text (either the
//! compact letters grammar or a signed-surface-number cell body), becomes
//! a normalized expression, and can be canonicalized to a minimal
//! DNF/CNF, complemented, divided, or evaluated against points and truth
//! assignments.
//!
//! ## Two representations
//!
//! - **[`Rule`][crate::rule::Rule]** is the expression *tree*: a closed
//!   set of node kinds (surface leaves, intersections, unions,
//!   complement and container forms) that cell storage keeps and
//!   evaluates geometrically via attached [`Surface`][crate::surface::Surface]s.
//! - **[`Acomp`][crate::acomp::Acomp]** / **[`Rcomp`][crate::rcomp::Rcomp]**
//!   are the *canonical composites*: n-ary union/intersection nodes kept
//!   in a normalized shape at all times, with Quine-McCluskey
//!   minimization toward DNF or CNF.
//!
//! ## Quick start
//!
//! ```rust
//! use halfrule::acomp::Acomp;
//!
//! // Parse a sum of products and minimize it.
//! let mut f = Acomp::intersection();
//! f.set_string("a'bc'+a'bc+abc'+abc").unwrap();
//! f.make_dnf().unwrap();
//! assert_eq!(f.to_string(), "b");
//! ```
//!
//! Cell bodies use surface numbers instead of letters:
//!
//! ```rust
//! use halfrule::parser::parse;
//!
//! let cell = parse("7 -17 (111 : -121)").unwrap();
//! assert_eq!(cell.surfaces(), vec![-121, -17, 7, 111]);
//! ```
//!
//! ## Costs worth knowing
//!
//! Canonicalization enumerates the full truth table of an expression and
//! the minimal-cover search is a set-cover problem: both are exponential
//! in the number of distinct literals. Cell boundary expressions are
//! small in practice (a handful of literals); there is no internal cap.
//!
//! ## Core components
//!
//! - **[`acomp`]**: the DNF-oriented canonical composite and its algebra.
//! - **[`rcomp`]**: the CNF-oriented dual.
//! - **[`minimize`]**: shared prime-implicant and minimal-cover search.
//! - **[`rule`]** / **[`parser`]**: the cell rule tree and its grammar.
//! - **[`counter`]** / **[`bnid`]**: combination enumeration and ternary
//!   cubes underneath the minimizer.

pub mod acomp;
pub mod bnid;
pub mod counter;
pub mod error;
pub mod minimize;
pub mod parser;
pub mod rcomp;
pub mod rule;
pub mod surface;
pub mod token;

pub use acomp::Acomp;
pub use error::{EvalError, ParseError, RuleError};
pub use rcomp::Rcomp;
pub use rule::Rule;
