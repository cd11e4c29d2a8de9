//! Lexical scanning of half-space boolean expressions.
//!
//! Two textual conventions are in use and both are supported:
//!
//! - the **letters grammar** used by the composite algebra
//!   ([`Acomp`][crate::acomp::Acomp]): `a..z` encode literals 1-26,
//!   `A..Z` encode 27-52, `%<n>` encodes `52+n`, a trailing `'`
//!   complements the literal, `+`/`:` is union, juxtaposition is
//!   intersection, and `#(...)` complements a group;
//! - the **numbers grammar** used by cell definitions: signed decimal
//!   surface numbers, `:` for union, implicit intersection, `#N`/`#(...)`
//!   for object/group complement and `%N`/`%(...)` for containers.
//!
//! Scanning performs character classification only; structural validation
//! (bracket balance, operand placement) happens in the parsers.

use crate::error::ParseError;

/// One lexical unit of a half-space expression.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Token {
    /// A signed surface literal. Never zero.
    Literal(i32),
    /// `(`
    Open,
    /// `)`
    Close,
    /// `+` or `:`
    Union,
    /// `#`
    Complement,
    /// `%` in the numbers grammar (container marker)
    Container,
}

/// Scans an expression in the letters grammar.
///
/// Returns each token with the byte offset it started at.
pub fn scan_letters(expr: &str) -> Result<Vec<(Token, usize)>, ParseError> {
    let mut out: Vec<(Token, usize)> = Vec::new();
    let mut chars = expr.char_indices().peekable();

    while let Some((pos, ch)) = chars.next() {
        match ch {
            'a'..='z' => out.push((Token::Literal(ch as i32 - 'a' as i32 + 1), pos)),
            'A'..='Z' => out.push((Token::Literal(ch as i32 - 'A' as i32 + 27), pos)),
            '%' => {
                let mut value: i32 = 0;
                let mut digits = 0;
                while let Some(&(_, d)) = chars.peek() {
                    if let Some(v) = d.to_digit(10) {
                        value = value
                            .checked_mul(10)
                            .and_then(|x| x.checked_add(v as i32))
                            .ok_or(ParseError::LiteralOverflow { pos })?;
                        digits += 1;
                        chars.next();
                    } else {
                        break;
                    }
                }
                if digits == 0 {
                    return Err(ParseError::BadEscape { pos });
                }
                let literal = value
                    .checked_add(52)
                    .ok_or(ParseError::LiteralOverflow { pos })?;
                out.push((Token::Literal(literal), pos));
            }
            '\'' => match out.last_mut() {
                Some((Token::Literal(v), _)) => *v = -*v,
                _ => return Err(ParseError::DanglingOperator { pos }),
            },
            '+' | ':' => out.push((Token::Union, pos)),
            '(' => out.push((Token::Open, pos)),
            ')' => out.push((Token::Close, pos)),
            '#' => out.push((Token::Complement, pos)),
            c if c.is_whitespace() => {}
            c => return Err(ParseError::IllegalChar { ch: c, pos }),
        }
    }
    Ok(out)
}

/// Scans an expression in the numbers grammar.
///
/// `-` is only legal as a literal sign. A literal of value zero is
/// rejected here since surface number 0 is reserved, and a number that
/// does not fit the `i32` literal range is an error, never a wrapped
/// value.
pub fn scan_numbers(expr: &str) -> Result<Vec<(Token, usize)>, ParseError> {
    let mut out: Vec<(Token, usize)> = Vec::new();
    let mut chars = expr.char_indices().peekable();

    while let Some((pos, ch)) = chars.next() {
        match ch {
            '0'..='9' | '-' => {
                let negative = ch == '-';
                let mut value: i32 = if negative { 0 } else { ch as i32 - '0' as i32 };
                let mut digits = usize::from(!negative);
                while let Some(&(_, d)) = chars.peek() {
                    if let Some(v) = d.to_digit(10) {
                        value = value
                            .checked_mul(10)
                            .and_then(|x| x.checked_add(v as i32))
                            .ok_or(ParseError::LiteralOverflow { pos })?;
                        digits += 1;
                        chars.next();
                    } else {
                        break;
                    }
                }
                if digits == 0 {
                    return Err(ParseError::DanglingOperator { pos });
                }
                if value == 0 {
                    return Err(ParseError::ZeroLiteral { pos });
                }
                out.push((Token::Literal(if negative { -value } else { value }), pos));
            }
            ':' => out.push((Token::Union, pos)),
            '(' => out.push((Token::Open, pos)),
            ')' => out.push((Token::Close, pos)),
            '#' => out.push((Token::Complement, pos)),
            '%' => out.push((Token::Container, pos)),
            c if c.is_whitespace() => {}
            c => return Err(ParseError::IllegalChar { ch: c, pos }),
        }
    }
    Ok(out)
}

/// Renders a letters-grammar literal back to text: `1 -> "a"`,
/// `27 -> "A"`, `53 -> "%1"`, negatives with a trailing `'`.
///
/// # Panics
///
/// Panics if `literal == 0`.
pub fn letter(literal: i32) -> String {
    assert_ne!(literal, 0, "Literal 0 is reserved");
    let v = literal.abs();
    let mut s = match v {
        1..=26 => char::from(b'a' + (v - 1) as u8).to_string(),
        27..=52 => char::from(b'A' + (v - 27) as u8).to_string(),
        _ => format!("%{}", v - 52),
    };
    if literal < 0 {
        s.push('\'');
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_letters_simple() {
        let toks = scan_letters("abc").unwrap();
        let toks: Vec<Token> = toks.into_iter().map(|(t, _)| t).collect();
        assert_eq!(
            toks,
            vec![Token::Literal(1), Token::Literal(2), Token::Literal(3)]
        );
    }

    #[test]
    fn test_scan_letters_prime_and_union() {
        let toks = scan_letters("a'+b").unwrap();
        let toks: Vec<Token> = toks.into_iter().map(|(t, _)| t).collect();
        assert_eq!(
            toks,
            vec![Token::Literal(-1), Token::Union, Token::Literal(2)]
        );
    }

    #[test]
    fn test_scan_letters_escape() {
        let toks = scan_letters("%3b'").unwrap();
        let toks: Vec<Token> = toks.into_iter().map(|(t, _)| t).collect();
        assert_eq!(toks, vec![Token::Literal(55), Token::Literal(-2)]);
    }

    #[test]
    fn test_scan_letters_upper() {
        let toks = scan_letters("Az").unwrap();
        let toks: Vec<Token> = toks.into_iter().map(|(t, _)| t).collect();
        assert_eq!(toks, vec![Token::Literal(27), Token::Literal(26)]);
    }

    #[test]
    fn test_scan_letters_bad_escape() {
        assert_eq!(
            scan_letters("a%x"),
            Err(ParseError::BadEscape { pos: 1 })
        );
    }

    #[test]
    fn test_scan_letters_illegal_char() {
        assert_eq!(
            scan_letters("ab?c"),
            Err(ParseError::IllegalChar { ch: '?', pos: 2 })
        );
    }

    #[test]
    fn test_scan_letters_dangling_prime() {
        assert_eq!(
            scan_letters("'a"),
            Err(ParseError::DanglingOperator { pos: 0 })
        );
    }

    #[test]
    fn test_scan_numbers_cell() {
        let toks = scan_numbers("7 -17 111 -121").unwrap();
        let toks: Vec<Token> = toks.into_iter().map(|(t, _)| t).collect();
        assert_eq!(
            toks,
            vec![
                Token::Literal(7),
                Token::Literal(-17),
                Token::Literal(111),
                Token::Literal(-121),
            ]
        );
    }

    #[test]
    fn test_scan_numbers_structured() {
        let toks = scan_numbers("1 (2 : -3) #(4 5)").unwrap();
        let toks: Vec<Token> = toks.into_iter().map(|(t, _)| t).collect();
        assert_eq!(
            toks,
            vec![
                Token::Literal(1),
                Token::Open,
                Token::Literal(2),
                Token::Union,
                Token::Literal(-3),
                Token::Close,
                Token::Complement,
                Token::Open,
                Token::Literal(4),
                Token::Literal(5),
                Token::Close,
            ]
        );
    }

    #[test]
    fn test_scan_numbers_zero_rejected() {
        assert_eq!(scan_numbers("1 0 2"), Err(ParseError::ZeroLiteral { pos: 2 }));
    }

    #[test]
    fn test_scan_numbers_overflow_rejected() {
        // 2^32 + 1 must not wrap around to literal 1.
        assert_eq!(
            scan_numbers("4294967297"),
            Err(ParseError::LiteralOverflow { pos: 0 })
        );
        assert_eq!(
            scan_numbers("1 -4294967297"),
            Err(ParseError::LiteralOverflow { pos: 2 })
        );
        assert_eq!(
            scan_numbers("99999999999999999999"),
            Err(ParseError::LiteralOverflow { pos: 0 })
        );
    }

    #[test]
    fn test_scan_letters_escape_overflow_rejected() {
        assert_eq!(
            scan_letters("%4294967297"),
            Err(ParseError::LiteralOverflow { pos: 0 })
        );
        // Fits the accumulator but overflows the +52 offset.
        assert_eq!(
            scan_letters("%2147483647"),
            Err(ParseError::LiteralOverflow { pos: 0 })
        );
    }

    #[test]
    fn test_letter_rendering() {
        assert_eq!(letter(1), "a");
        assert_eq!(letter(26), "z");
        assert_eq!(letter(27), "A");
        assert_eq!(letter(52), "Z");
        assert_eq!(letter(53), "%1");
        assert_eq!(letter(-2), "b'");
        assert_eq!(letter(-60), "%8'");
    }
}
