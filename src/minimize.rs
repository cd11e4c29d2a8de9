//! Quine-McCluskey prime implicants and minimal cover selection.
//!
//! These routines operate on plain cube lists so that both canonical
//! composites ([`Acomp`][crate::acomp::Acomp] toward DNF and
//! [`Rcomp`][crate::rcomp::Rcomp] toward CNF) share one implementation.
//!
//! Both passes are exponential in the worst case: [`make_pi`] in the
//! number of cubes, [`make_epi`] in the number of non-essential prime
//! implicants. No internal cap is applied; callers keep expressions small
//! (cell boundary rules rarely exceed a handful of literals).

use std::collections::{BTreeMap, BTreeSet};

use log::debug;

use crate::bnid::BnId;
use crate::counter::RotaryCounter;

/// Computes all prime implicants of the function given by its minterms.
///
/// Cubes are grouped by true-count; adjacent cubes (same don't-care mask,
/// exactly one differing defined position) merge into a generalized cube
/// and both parents are marked non-prime. The pass repeats on the merged
/// cubes until no merge applies. Returns the surviving cubes,
/// deduplicated, in sorted order.
pub fn make_pi(minterms: &[BnId]) -> Vec<BnId> {
    if minterms.is_empty() {
        return Vec::new();
    }

    let mut current: Vec<BnId> = minterms.iter().cloned().collect::<BTreeSet<_>>().into_iter().collect();
    let mut primes: BTreeSet<BnId> = BTreeSet::new();

    let mut round = 0;
    loop {
        round += 1;
        let mut groups: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for (i, cube) in current.iter().enumerate() {
            groups.entry(cube.num_true()).or_default().push(i);
        }

        let mut merged = vec![false; current.len()];
        let mut next: BTreeSet<BnId> = BTreeSet::new();

        // Adjacent cubes always sit in consecutive true-count groups.
        for (&count, lower) in &groups {
            if let Some(upper) = groups.get(&(count + 1)) {
                for &i in lower {
                    for &j in upper {
                        if let Some(m) = current[i].combine(&current[j]) {
                            merged[i] = true;
                            merged[j] = true;
                            next.insert(m);
                        }
                    }
                }
            }
        }

        for (i, cube) in current.iter().enumerate() {
            if !merged[i] {
                primes.insert(cube.clone());
            }
        }

        debug!(
            "make_pi: round {} merged {} cubes into {}",
            round,
            merged.iter().filter(|&&m| m).count(),
            next.len()
        );

        if next.is_empty() {
            break;
        }
        current = next.into_iter().collect();
    }

    primes.into_iter().collect()
}

/// Selects a minimal subset of `pis` covering every cube in `minterms`.
///
/// Essential prime implicants (the sole cover of some minterm) are taken
/// first: they appear in every minimal cover, so this step is exact, not
/// heuristic. The residual minterms are then covered by brute-force
/// enumeration of PI subsets of increasing size via [`RotaryCounter`].
///
/// Empty input yields an empty cover.
pub fn make_epi(minterms: &[BnId], pis: &[BnId]) -> Vec<BnId> {
    if minterms.is_empty() || pis.is_empty() {
        return Vec::new();
    }

    // Coverage matrix: PI rows x minterm columns.
    let cover: Vec<Vec<usize>> = minterms
        .iter()
        .map(|m| {
            (0..pis.len())
                .filter(|&i| pis[i].covers(m))
                .collect()
        })
        .collect();

    let mut essential: BTreeSet<usize> = BTreeSet::new();
    for (j, rows) in cover.iter().enumerate() {
        if rows.len() == 1 {
            essential.insert(rows[0]);
        } else if rows.is_empty() {
            debug!("make_epi: minterm {} covered by no PI", minterms[j]);
        }
    }

    let residual: Vec<usize> = (0..minterms.len())
        .filter(|&j| !cover[j].iter().any(|i| essential.contains(i)))
        .collect();

    debug!(
        "make_epi: {} essential PIs, {} residual minterms",
        essential.len(),
        residual.len()
    );

    if residual.is_empty() {
        return essential.into_iter().map(|i| pis[i].clone()).collect();
    }

    // PIs still useful for the residual minterms.
    let candidates: Vec<usize> = (0..pis.len())
        .filter(|i| !essential.contains(i))
        .filter(|&i| residual.iter().any(|&j| cover[j].contains(&i)))
        .collect();

    let mut chosen: Vec<usize> = Vec::new();
    'size: for size in 1..=candidates.len() {
        let mut counter = RotaryCounter::new(size, candidates.len());
        loop {
            let subset: Vec<usize> =
                (0..size).map(|d| candidates[counter[d]]).collect();
            let full = residual
                .iter()
                .all(|&j| cover[j].iter().any(|i| subset.contains(i)));
            if full {
                debug!("make_epi: residual cover found with {} PIs", size);
                chosen = subset;
                break 'size;
            }
            if counter.increment() {
                break;
            }
        }
    }

    let mut result: Vec<usize> = essential.into_iter().collect();
    result.extend(chosen);
    result.sort_unstable();
    result.dedup();
    result.into_iter().map(|i| pis[i].clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minterms(width: usize, indices: &[u64]) -> Vec<BnId> {
        indices.iter().map(|&i| BnId::from_index(width, i)).collect()
    }

    #[test]
    fn test_make_pi_textbook_b() {
        // f = a'bc' + a'bc + abc' + abc over (a,b,c) = positions (2,1,0)... here
        // position 0 = a, 1 = b, 2 = c: minterms where b=1: {2,3,6,7}.
        let terms = minterms(3, &[0b010, 0b011, 0b110, 0b111]);
        let pis = make_pi(&terms);
        assert_eq!(pis.len(), 1);
        assert_eq!(pis[0].to_string(), "-1-");
    }

    #[test]
    fn test_make_pi_no_merge() {
        // f = a'b' + ab: two isolated minterms, both prime.
        let terms = minterms(2, &[0b00, 0b11]);
        let pis = make_pi(&terms);
        assert_eq!(pis.len(), 2);
    }

    #[test]
    fn test_make_pi_empty() {
        assert!(make_pi(&[]).is_empty());
    }

    #[test]
    fn test_epi_minimal_single() {
        let terms = minterms(3, &[0b010, 0b011, 0b110, 0b111]);
        let pis = make_pi(&terms);
        let cover = make_epi(&terms, &pis);
        assert_eq!(cover.len(), 1);
        assert_eq!(cover[0].to_string(), "-1-");
    }

    #[test]
    fn test_epi_classic_four_variable() {
        // Four-variable example with minterms {4,8,10,11,12,15}: the
        // essentials -100 and 1-11 plus 10-0 cover everything, so the
        // minimal cover has exactly 3 PIs.
        let terms = minterms(4, &[4, 8, 10, 11, 12, 15]);
        let pis = make_pi(&terms);
        assert_eq!(pis.len(), 5);
        let cover = make_epi(&terms, &pis);
        assert_eq!(cover.len(), 3);
        for m in &terms {
            assert!(cover.iter().any(|pi| pi.covers(m)));
        }
    }

    #[test]
    fn test_epi_brute_force_fallback() {
        // Cyclic cover (no essential PI): f over 3 vars with minterms
        // {1,2,3,4,5,6} - every minterm has two covering PIs.
        let terms = minterms(3, &[1, 2, 3, 4, 5, 6]);
        let pis = make_pi(&terms);
        let cover = make_epi(&terms, &pis);
        assert_eq!(cover.len(), 3);
        for m in &terms {
            assert!(cover.iter().any(|pi| pi.covers(m)));
        }
    }

    #[test]
    fn test_epi_empty() {
        assert!(make_epi(&[], &[]).is_empty());
        let terms = minterms(2, &[0b01]);
        assert!(make_epi(&terms, &[]).is_empty());
    }
}
