//! A multi-digit combination counter.
//!
//! [`RotaryCounter`] enumerates the strictly-increasing `n`-digit
//! combinations over `0..rmax` in lexicographic order. It starts "dense"
//! at `{0, 1, .., n-1}` rather than all-zero: it is a subset enumerator,
//! not a plain odometer. The prime-implicant cover search walks it to try
//! every subset of a given size, smallest combinations first.

use std::cmp::Ordering;
use std::fmt;
use std::ops::Index;

/// Odometer-style counter over strictly-increasing digit combinations.
///
/// # Invariants
///
/// - digits are strictly increasing: `digit[i] < digit[i+1]`
/// - every digit is in `0..rmax`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotaryCounter {
    digits: Vec<usize>,
    rmax: usize,
}

impl RotaryCounter {
    /// Creates a counter with `n` digits ranging over `0..rmax`,
    /// initialized to the first combination `{0, 1, .., n-1}`.
    ///
    /// # Panics
    ///
    /// Panics if `rmax < n` (no valid combination exists).
    pub fn new(n: usize, rmax: usize) -> Self {
        assert!(rmax >= n, "Counter range {} cannot hold {} digits", rmax, n);
        Self {
            digits: (0..n).collect(),
            rmax,
        }
    }

    /// Number of digits.
    pub fn len(&self) -> usize {
        self.digits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    /// Read-only view of the digits.
    pub fn digits(&self) -> &[usize] {
        &self.digits
    }

    /// Advances to the next combination in lexicographic order.
    ///
    /// Returns `true` exactly when the counter wrapped from the final
    /// combination `{rmax-n, .., rmax-1}` back to the initial one.
    pub fn increment(&mut self) -> bool {
        let n = self.digits.len();
        if n == 0 {
            return true;
        }
        // Rightmost digit with headroom below its personal maximum.
        let mut i = n;
        while i > 0 {
            i -= 1;
            if self.digits[i] != self.rmax - n + i {
                self.digits[i] += 1;
                for j in i + 1..n {
                    self.digits[j] = self.digits[j - 1] + 1;
                }
                return false;
            }
        }
        for (j, d) in self.digits.iter_mut().enumerate() {
            *d = j;
        }
        true
    }

    /// Steps back to the previous combination in lexicographic order.
    ///
    /// Returns `true` exactly when the counter wrapped from the initial
    /// combination back to the final one `{rmax-n, .., rmax-1}`.
    pub fn decrement(&mut self) -> bool {
        let n = self.digits.len();
        if n == 0 {
            return true;
        }
        // Rightmost digit that can still move down without colliding
        // with its left neighbour.
        let mut i = n;
        while i > 0 {
            i -= 1;
            let floor = if i == 0 { 0 } else { self.digits[i - 1] + 1 };
            if self.digits[i] > floor {
                self.digits[i] -= 1;
                for j in i + 1..n {
                    self.digits[j] = self.rmax - n + j;
                }
                return false;
            }
        }
        for (j, d) in self.digits.iter_mut().enumerate() {
            *d = self.rmax - n + j;
        }
        true
    }
}

impl Index<usize> for RotaryCounter {
    type Output = usize;

    fn index(&self, index: usize) -> &usize {
        &self.digits[index]
    }
}

impl PartialOrd for RotaryCounter {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RotaryCounter {
    /// Lexicographic over the digit vector; with an equal prefix the
    /// shorter counter compares as smaller.
    fn cmp(&self, other: &Self) -> Ordering {
        self.digits.cmp(&other.digits)
    }
}

impl fmt::Display for RotaryCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, d) in self.digits.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", d)?;
        }
        write!(f, "]")
    }
}
