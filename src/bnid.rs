//! Ternary cubes for prime-implicant computation.
//!
//! A [`BnId`] is a fixed-width vector of tri-state values over the literal
//! index space: one fully- or partially-specified truth assignment. Two
//! cubes that differ in exactly one defined position merge into a wider
//! cube with that position left as don't-care; repeating that merge to a
//! fixpoint yields the prime implicants of a function.

use std::fmt;

/// One position of a cube.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tri {
    Zero,
    One,
    DontCare,
}

/// A fixed-width ternary cube.
///
/// Position `i` corresponds to entry `i` of the key vector the cube was
/// built against (lowest literal first). [`fmt::Display`] prints the
/// highest position first, matching truth-table convention.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BnId {
    bits: Vec<Tri>,
}

impl BnId {
    /// An all-zero cube of the given width.
    pub fn new(width: usize) -> Self {
        Self {
            bits: vec![Tri::Zero; width],
        }
    }

    /// A fully-specified cube taken from the binary digits of `index`
    /// (bit `i` of `index` becomes position `i`).
    ///
    /// # Panics
    ///
    /// Panics if `index` does not fit in `width` bits.
    pub fn from_index(width: usize, index: u64) -> Self {
        assert!(
            width >= 64 || index < (1u64 << width),
            "Index {} does not fit in {} bits",
            index,
            width
        );
        let bits = (0..width)
            .map(|i| {
                if (index >> i) & 1 == 1 {
                    Tri::One
                } else {
                    Tri::Zero
                }
            })
            .collect();
        Self { bits }
    }

    /// Builds a cube directly from tri-state values, position 0 first.
    pub fn from_bits(bits: Vec<Tri>) -> Self {
        Self { bits }
    }

    pub fn width(&self) -> usize {
        self.bits.len()
    }

    pub fn get(&self, pos: usize) -> Tri {
        self.bits[pos]
    }

    pub fn set(&mut self, pos: usize, value: Tri) {
        self.bits[pos] = value;
    }

    /// Number of positions set to `One`. Used to group cubes during the
    /// merge pass: only counts differing by one can combine.
    pub fn num_true(&self) -> usize {
        self.bits.iter().filter(|&&b| b == Tri::One).count()
    }

    /// Number of defined (non-don't-care) positions.
    pub fn num_defined(&self) -> usize {
        self.bits.iter().filter(|&&b| b != Tri::DontCare).count()
    }

    /// Merges two cubes that share a don't-care mask and differ in
    /// exactly one defined position. Returns `None` when the cubes are
    /// not adjacent in that sense.
    pub fn combine(&self, other: &BnId) -> Option<BnId> {
        if self.width() != other.width() {
            return None;
        }
        let mut diff = None;
        for (i, (&a, &b)) in self.bits.iter().zip(&other.bits).enumerate() {
            match (a, b) {
                (Tri::DontCare, Tri::DontCare) => {}
                (Tri::DontCare, _) | (_, Tri::DontCare) => return None,
                _ if a == b => {}
                _ => {
                    if diff.is_some() {
                        return None;
                    }
                    diff = Some(i);
                }
            }
        }
        let pos = diff?;
        let mut merged = self.clone();
        merged.bits[pos] = Tri::DontCare;
        Some(merged)
    }

    /// True when every defined position of `self` agrees with the
    /// (fully-specified) `minterm`.
    pub fn covers(&self, minterm: &BnId) -> bool {
        self.bits
            .iter()
            .zip(&minterm.bits)
            .all(|(&a, &b)| a == Tri::DontCare || a == b)
    }

    /// Iterates positions lowest-first.
    pub fn iter(&self) -> impl Iterator<Item = Tri> + '_ {
        self.bits.iter().copied()
    }
}

impl fmt::Display for BnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in self.bits.iter().rev() {
            let c = match b {
                Tri::Zero => '0',
                Tri::One => '1',
                Tri::DontCare => '-',
            };
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_index() {
        let c = BnId::from_index(3, 0b101);
        assert_eq!(c.get(0), Tri::One);
        assert_eq!(c.get(1), Tri::Zero);
        assert_eq!(c.get(2), Tri::One);
        assert_eq!(c.to_string(), "101");
        assert_eq!(c.num_true(), 2);
    }

    #[test]
    fn test_combine_adjacent() {
        let a = BnId::from_index(3, 0b101);
        let b = BnId::from_index(3, 0b111);
        let m = a.combine(&b).unwrap();
        assert_eq!(m.to_string(), "1-1");
        assert_eq!(m.num_defined(), 2);
        // Merge is symmetric.
        assert_eq!(b.combine(&a).unwrap(), m);
    }

    #[test]
    fn test_combine_rejects_distance_two() {
        let a = BnId::from_index(3, 0b000);
        let b = BnId::from_index(3, 0b011);
        assert_eq!(a.combine(&b), None);
    }

    #[test]
    fn test_combine_rejects_mask_mismatch() {
        let a = BnId::from_bits(vec![Tri::One, Tri::DontCare, Tri::One]);
        let b = BnId::from_index(3, 0b111);
        assert_eq!(a.combine(&b), None);
    }

    #[test]
    fn test_combine_second_level() {
        let a = BnId::from_bits(vec![Tri::DontCare, Tri::Zero, Tri::One]);
        let b = BnId::from_bits(vec![Tri::DontCare, Tri::One, Tri::One]);
        let m = a.combine(&b).unwrap();
        assert_eq!(m.to_string(), "1--");
    }

    #[test]
    fn test_covers() {
        let pi = BnId::from_bits(vec![Tri::DontCare, Tri::One, Tri::DontCare]);
        assert!(pi.covers(&BnId::from_index(3, 0b010)));
        assert!(pi.covers(&BnId::from_index(3, 0b111)));
        assert!(!pi.covers(&BnId::from_index(3, 0b101)));
    }

    #[test]
    fn test_display_order() {
        // Position 0 is the least significant printed character.
        let c = BnId::from_index(4, 0b0001);
        assert_eq!(c.to_string(), "0001");
    }
}
