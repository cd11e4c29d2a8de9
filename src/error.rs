//! Error types for expression parsing, tree surgery, and evaluation.
//!
//! Parse failures carry the byte offset of the offending character so the
//! caller can point at the bad spot in a cell definition. Evaluation errors
//! are programmer errors (missing assignment entries, unresolved surface
//! handles) and carry no retry semantics.

use thiserror::Error;

/// Errors raised while scanning or parsing a half-space expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The expression was empty or reduced to nothing.
    #[error("empty expression")]
    Empty,

    /// A character outside the expression alphabet.
    #[error("illegal character {ch:?} at position {pos}")]
    IllegalChar { ch: char, pos: usize },

    /// Brackets did not balance.
    #[error("unbalanced brackets at position {pos}")]
    UnbalancedBrackets { pos: usize },

    /// A `%` escape not followed by a decimal run.
    #[error("'%' escape without digits at position {pos}")]
    BadEscape { pos: usize },

    /// An operator with a missing operand, e.g. a trailing `+`.
    #[error("dangling operator at position {pos}")]
    DanglingOperator { pos: usize },

    /// A literal that encodes to zero (surface number 0 is reserved).
    #[error("zero surface literal at position {pos}")]
    ZeroLiteral { pos: usize },

    /// A literal too large for the surface number range.
    #[error("surface literal out of range at position {pos}")]
    LiteralOverflow { pos: usize },
}

/// Errors raised while evaluating a composite or rule tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// A literal required by the expression is absent from the assignment.
    #[error("literal {0} missing from assignment")]
    MissingLiteral(i32),

    /// A `Surf` leaf has no attached surface, so geometric evaluation is
    /// impossible.
    #[error("surface {0} has no attached geometry")]
    UnresolvedSurface(u32),

    /// A `#N` / `%N` reference whose object rule was never resolved.
    #[error("object {0} is not resolved")]
    UnresolvedObject(u32),

    /// Operation on a composite with no units and no components.
    #[error("operation on a null composite")]
    NullComposite,
}

/// Errors raised by structural operations on the rule tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    /// Child replacement was requested on a node without child slots.
    #[error("node has no child slots")]
    NotBinary,
}

/// Crate-wide result alias for parse operations.
pub type ParseResult<T> = std::result::Result<T, ParseError>;
