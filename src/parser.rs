//! Parsing cell definitions in the numbers grammar into [`Rule`] trees.
//!
//! The grammar is the one cell bodies are written in: signed surface
//! numbers joined by juxtaposition (intersection) and `:` (union),
//! parentheses for grouping, `#N`/`#(...)` for object/group complement
//! and `%N`/`%(...)` for containers. Complement groups become
//! [`CompGrp`][Rule::CompGrp] nodes directly; there is no textual
//! re-substitution step.
//!
//! ```
//! use halfrule::parser::parse;
//!
//! let rule = parse("7 -17 (111 : -121)").unwrap();
//! assert_eq!(rule.leaf_count(), 4);
//! ```

use crate::error::ParseError;
use crate::rule::Rule;
use crate::token::{scan_numbers, Token};

/// Parses a numbers-grammar expression into a rule tree.
pub fn parse(expr: &str) -> Result<Rule, ParseError> {
    let tokens = scan_numbers(expr)?;
    if tokens.is_empty() {
        return Err(ParseError::Empty);
    }
    let mut pos = 0;
    let rule = parse_union(&tokens, &mut pos)?;
    if pos != tokens.len() {
        return Err(ParseError::UnbalancedBrackets {
            pos: tokens[pos].1,
        });
    }
    Ok(rule)
}

/// `expr := term (':' term)*`, left-associated.
fn parse_union(tokens: &[(Token, usize)], pos: &mut usize) -> Result<Rule, ParseError> {
    let mut rule = parse_term(tokens, pos)?;
    while let Some(&(Token::Union, _)) = tokens.get(*pos) {
        *pos += 1;
        let rhs = parse_term(tokens, pos)?;
        rule = Rule::union_of(rule, rhs);
    }
    Ok(rule)
}

/// `term := factor+`, left-associated intersection.
fn parse_term(tokens: &[(Token, usize)], pos: &mut usize) -> Result<Rule, ParseError> {
    let mut rule: Option<Rule> = None;
    while let Some(factor) = parse_factor(tokens, pos)? {
        rule = Some(match rule {
            Some(lhs) => Rule::inter(lhs, factor),
            None => factor,
        });
    }
    rule.ok_or_else(|| {
        let at = tokens
            .get(*pos)
            .map(|&(_, p)| p)
            .unwrap_or_else(|| tokens.last().map(|&(_, p)| p + 1).unwrap_or(0));
        ParseError::DanglingOperator { pos: at }
    })
}

/// One factor, or `None` at a term boundary (`:`, `)`, end of input).
fn parse_factor(
    tokens: &[(Token, usize)],
    pos: &mut usize,
) -> Result<Option<Rule>, ParseError> {
    let Some(&(tok, tpos)) = tokens.get(*pos) else {
        return Ok(None);
    };
    match tok {
        Token::Literal(v) => {
            *pos += 1;
            Ok(Some(Rule::surf(v)))
        }
        Token::Open => {
            *pos += 1;
            let inner = parse_union(tokens, pos)?;
            expect_close(tokens, pos, tpos)?;
            Ok(Some(inner))
        }
        Token::Complement => {
            *pos += 1;
            match tokens.get(*pos) {
                Some(&(Token::Literal(v), lpos)) => {
                    *pos += 1;
                    if v < 0 {
                        return Err(ParseError::IllegalChar { ch: '-', pos: lpos });
                    }
                    Ok(Some(Rule::comp_obj(v as u32)))
                }
                Some(&(Token::Open, opos)) => {
                    *pos += 1;
                    let inner = parse_union(tokens, pos)?;
                    expect_close(tokens, pos, opos)?;
                    Ok(Some(Rule::comp_grp(inner)))
                }
                _ => Err(ParseError::DanglingOperator { pos: tpos }),
            }
        }
        Token::Container => {
            *pos += 1;
            match tokens.get(*pos) {
                Some(&(Token::Literal(v), lpos)) => {
                    *pos += 1;
                    if v < 0 {
                        return Err(ParseError::IllegalChar { ch: '-', pos: lpos });
                    }
                    Ok(Some(Rule::cont_obj(v as u32)))
                }
                Some(&(Token::Open, opos)) => {
                    *pos += 1;
                    let inner = parse_union(tokens, pos)?;
                    expect_close(tokens, pos, opos)?;
                    Ok(Some(Rule::cont_grp(inner)))
                }
                _ => Err(ParseError::DanglingOperator { pos: tpos }),
            }
        }
        Token::Union | Token::Close => Ok(None),
    }
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
