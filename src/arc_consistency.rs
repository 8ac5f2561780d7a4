//! This module contains a crossword-specific implementation of the AC-3 algorithm. A domain store
//! is arc-consistent when every remaining candidate for a variable agrees, at the shared letter,
//! with at least one candidate in each crossing variable's domain. We keep revising overlapping
//! pairs until no more removals are possible.
//!
//! Two distinct variables holding the same word is NOT a violation at this stage; global word
//! uniqueness is the validator's job during search.

use std::collections::VecDeque;
use std::mem;

use crate::domains::DomainStore;
use crate::puzzle::Puzzle;
use crate::types::VariableId;
use crate::word_list::WordList;
use crate::CHECK_INVARIANTS;

/// An ordered pair of overlapping variables whose constraint still needs to be checked, in the
/// direction "prune the first against the second".
pub type Arc = (VariableId, VariableId);

/// Result from a failed propagation run, identifying the variable whose domain was wiped out.
/// This is definitive: a wiped-out domain means the puzzle has no solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DomainWipeout {
    pub variable: VariableId,
}

/// The default work queue: every ordered pair of variables with a defined overlap, each direction
/// once, in ascending (x, y) order.
#[must_use]
pub fn all_arcs(puzzle: &Puzzle) -> Vec<Arc> {
    (0..puzzle.variable_count())
        .flat_map(|x| puzzle.neighbors(x).iter().map(move |&y| (x, y)))
        .collect()
}

/// Prune `domains` until every remaining candidate has at least one supporting candidate in each
/// neighboring domain. Domains only ever shrink. If a revision empties a domain, propagation
/// stops immediately and reports the wipeout; an empty queue with no wipeout means arc
/// consistency holds (which is necessary for a solution, not sufficient).
pub fn enforce_arc_consistency(
    puzzle: &Puzzle,
    word_list: &WordList,
    domains: &mut DomainStore,
    arcs: Option<Vec<Arc>>,
) -> Result<(), DomainWipeout> {
    let mut queue: VecDeque<Arc> = arcs.unwrap_or_else(|| all_arcs(puzzle)).into();

    while let Some((x, y)) = queue.pop_front() {
        if !revise(puzzle, word_list, domains, x, y) {
            continue;
        }

        if domains.is_empty(x) {
            return Err(DomainWipeout { variable: x });
        }

        // x shrank, so pairs that were consistent against its old domain may no longer be.
        for &z in puzzle.neighbors(x) {
            if z != y && !queue.contains(&(z, x)) {
                queue.push_back((z, x));
            }
        }
    }

    if CHECK_INVARIANTS {
        assert_arc_consistent(puzzle, word_list, domains);
    }

    Ok(())
}

/// Remove from domain(x) every word with no supporting word in domain(y) at the recorded overlap.
/// Returns whether anything was removed; a no-overlap pair is never revised.
fn revise(
    puzzle: &Puzzle,
    word_list: &WordList,
    domains: &mut DomainStore,
    x: VariableId,
    y: VariableId,
) -> bool {
    let Some((x_idx, y_idx)) = puzzle.overlap(x, y) else {
        return false;
    };

    let candidates = mem::take(domains.options_mut(x));
    let before = candidates.len();

    let retained: Vec<_> = candidates
        .into_iter()
        .filter(|&w1| {
            let letter = word_list.word(w1).chars[x_idx];
            domains
                .options(y)
                .iter()
                .any(|&w2| word_list.word(w2).chars[y_idx] == letter)
        })
        .collect();

    let revised = retained.len() < before;
    *domains.options_mut(x) = retained;
    revised
}

/// Verify that every remaining candidate has support across every overlap. Only run under the
/// `check_invariants` feature.
fn assert_arc_consistent(puzzle: &Puzzle, word_list: &WordList, domains: &DomainStore) {
    for (x, y) in all_arcs(puzzle) {
        let (x_idx, y_idx) = puzzle
            .overlap(x, y)
            .expect("arc must connect overlapping variables");

        for &w1 in domains.options(x) {
            let letter = word_list.word(w1).chars[x_idx];
            assert!(
                domains
                    .options(y)
                    .iter()
                    .any(|&w2| word_list.word(w2).chars[y_idx] == letter),
                "candidate {w1} for variable {x} has no support in variable {y}"
            );
        }
    }
}
