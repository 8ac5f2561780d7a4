//! This module implements word placement as a depth-first backtracking search over partial
//! assignments, after pruning the domains once with node consistency and AC-3. Variables are
//! chosen by minimum-remaining-values with degree and lowest-id tie-breaks, and candidate words
//! by least-constraining-value with a stable id tie-break, so repeated runs on identical inputs
//! produce identical assignments.

use std::time::{Duration, Instant};

use crate::arc_consistency::enforce_arc_consistency;
use crate::domains::DomainStore;
use crate::puzzle::{Assignment, Puzzle};
use crate::types::{VariableId, WordId};
use crate::validator::is_consistent;
use crate::word_list::WordList;

/// A struct tracking stats about the solving process.
#[derive(Debug, Clone, Default)]
pub struct Statistics {
    /// Number of search states visited (calls into the recursive step).
    pub states: usize,

    /// Number of tentative word placements that were undone.
    pub backtracks: usize,

    pub total_time: Duration,
}

/// A struct representing the results of a successful solve.
#[derive(Debug, Clone)]
pub struct SolveSuccess {
    pub statistics: Statistics,
    pub assignment: Assignment,
}

/// Returned when propagation or search has proven that no complete assignment exists. This is a
/// normal outcome, and it's definitive: the search is exhaustive and deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoSolution;

/// Find a word for every variable such that lengths match, all words are distinct, and crossing
/// words agree at their shared cells. Returns the first complete consistent assignment under the
/// deterministic ordering, or `NoSolution` once every branch is exhausted.
pub fn solve(puzzle: &Puzzle, word_list: &WordList) -> Result<SolveSuccess, NoSolution> {
    let start = Instant::now();

    let mut domains = DomainStore::node_consistent(puzzle, word_list);

    // A domain emptied by the length filter can't be repaired by propagation or search, and a
    // variable without neighbors would never be caught by AC-3.
    if domains.first_empty().is_some() {
        return Err(NoSolution);
    }

    enforce_arc_consistency(puzzle, word_list, &mut domains, None).map_err(|_| NoSolution)?;

    let mut statistics = Statistics::default();
    let mut assignment = Assignment::new(puzzle.variable_count());

    if backtrack(puzzle, word_list, &domains, &mut assignment, &mut statistics) {
        statistics.total_time = start.elapsed();
        Ok(SolveSuccess {
            statistics,
            assignment,
        })
    } else {
        Err(NoSolution)
    }
}

/// One step of the search: extend the assignment with a word for one more variable, recursing on
/// success and undoing the extension on a dead end. The first complete assignment wins.
fn backtrack(
    puzzle: &Puzzle,
    word_list: &WordList,
    domains: &DomainStore,
    assignment: &mut Assignment,
    statistics: &mut Statistics,
) -> bool {
    statistics.states += 1;

    if assignment.is_complete() {
        return true;
    }

    let variable = select_unassigned_variable(puzzle, domains, assignment);

    for word_id in order_domain_values(puzzle, word_list, domains, assignment, variable) {
        assignment.set(variable, word_id);

        if is_consistent(puzzle, word_list, assignment)
            && backtrack(puzzle, word_list, domains, assignment, statistics)
        {
            return true;
        }

        assignment.clear(variable);
        statistics.backtracks += 1;
    }

    false
}

/// Choose the unassigned variable with the smallest domain (minimum remaining values), breaking
/// ties by most overlap constraints and then by lowest id. Scanning in ascending id order with
/// strict-improvement comparisons makes the final tie-break fall out for free.
fn select_unassigned_variable(
    puzzle: &Puzzle,
    domains: &DomainStore,
    assignment: &Assignment,
) -> VariableId {
    let mut best: Option<VariableId> = None;

    for variable in 0..puzzle.variable_count() {
        if assignment.get(variable).is_some() {
            continue;
        }

        let better = match best {
            None => true,
            Some(current) => {
                domains.size(variable) < domains.size(current)
                    || (domains.size(variable) == domains.size(current)
                        && puzzle.degree(variable) > puzzle.degree(current))
            }
        };

        if better {
            best = Some(variable);
        }
    }

    best.expect("an incomplete assignment must have an unassigned variable")
}

/// Order the variable's candidates ascending by the number of words they would eliminate from
/// unassigned neighbors' domains (least-constraining-value). The sort is stable over the
/// ascending-id domain, so ties keep id order.
fn order_domain_values(
    puzzle: &Puzzle,
    word_list: &WordList,
    domains: &DomainStore,
    assignment: &Assignment,
    variable: VariableId,
) -> Vec<WordId> {
    let mut candidates: Vec<WordId> = domains.options(variable).to_vec();

    candidates.sort_by_cached_key(|&word_id| {
        let chars = &word_list.word(word_id).chars;

        puzzle
            .neighbors(variable)
            .iter()
            .filter(|&&neighbor| assignment.get(neighbor).is_none())
            .map(|&neighbor| {
                let (our_idx, their_idx) = puzzle
                    .overlap(variable, neighbor)
                    .expect("neighboring variables must have an overlap");

                domains
                    .options(neighbor)
                    .iter()
                    .filter(|&&other| word_list.word(other).chars[their_idx] != chars[our_idx])
                    .count()
            })
            .sum::<usize>()
    });

    candidates
}

#[cfg(test)]
mod tests {
    use crate::backtracking_search::{solve, NoSolution};
    use crate::puzzle::{render_grid, Grid, Puzzle};
    use crate::validator::is_consistent;
    use crate::word_list::WordList;

    fn build_puzzle(template: &str) -> Puzzle {
        Puzzle::build(Grid::from_template_string(template).unwrap())
    }

    /// An across variable of length 3 crossing a down variable of length 4 at the across
    /// variable's index 1 and the down variable's index 0.
    fn crossing_puzzle() -> Puzzle {
        build_puzzle(
            "
            ...
            #.#
            #.#
            #.#
            ",
        )
    }

    #[test]
    fn test_single_variable_picks_first_word_on_tie() {
        let puzzle = build_puzzle("...");
        let word_list = WordList::new(&["cat", "dog"], None).unwrap();

        let result = solve(&puzzle, &word_list).expect("Failed to place a word");

        // Both words eliminate nothing, so the id-order tie-break selects "cat".
        assert_eq!(result.assignment.get(0), Some(0));
        assert_eq!(render_grid(&puzzle, &word_list, &result.assignment), "cat");
    }

    #[test]
    fn test_reports_no_solution_when_no_length_matches() {
        let puzzle = build_puzzle("...");
        let word_list = WordList::new(&["toad"], None).unwrap();

        assert_eq!(solve(&puzzle, &word_list).err(), Some(NoSolution));
    }

    #[test]
    fn test_crossing_mismatch_reports_no_solution() {
        let puzzle = crossing_puzzle();
        // cat[1] is 'a' but toad[0] is 't', so the only length-3 word loses its only possible
        // crossing and propagation wipes the across domain out.
        let word_list = WordList::new(&["cat", "toad"], None).unwrap();

        solve(&puzzle, &word_list).expect_err("Placed words across a letter mismatch??");
    }

    #[test]
    fn test_crossing_finds_rescuing_alternative() {
        let puzzle = crossing_puzzle();
        let word_list = WordList::new(&["cat", "toad", "acid"], None).unwrap();

        let result = solve(&puzzle, &word_list).expect("Failed to place words");

        assert_eq!(result.assignment.get(0), Some(0)); // cat
        assert_eq!(result.assignment.get(1), Some(2)); // acid
    }

    #[test]
    fn test_single_option_per_slot_returns_exact_assignment() {
        let puzzle = build_puzzle(
            "
            ....
            .#.#
            .#.#
            ",
        );
        let word_list = WordList::new(&["toad", "tin", "ant"], None).unwrap();

        let result = solve(&puzzle, &word_list).expect("Failed to place words");

        assert_eq!(result.assignment.get(0), Some(0)); // toad across the top
        assert_eq!(result.assignment.get(1), Some(1)); // tin down the left
        assert_eq!(result.assignment.get(2), Some(2)); // ant down the middle
        assert_eq!(
            render_grid(&puzzle, &word_list, &result.assignment),
            "toad\ni#n#\nn#t#"
        );
    }

    #[test]
    fn test_parallel_variables_must_hold_distinct_words() {
        let puzzle = build_puzzle(
            "
            ...
            ###
            ...
            ",
        );

        let one_word = WordList::new(&["cat"], None).unwrap();
        solve(&puzzle, &one_word).expect_err("Placed the same word twice??");

        let two_words = WordList::new(&["cat", "dog"], None).unwrap();
        let result = solve(&puzzle, &two_words).expect("Failed to place words");
        assert_eq!(result.assignment.get(0), Some(0));
        assert_eq!(result.assignment.get(1), Some(1));
    }

    #[test]
    fn test_solved_grid_satisfies_all_constraints() {
        let puzzle = build_puzzle(
            "
            ...
            .#.
            ...
            ",
        );
        let word_list = WordList::new(&["cot", "tan", "cat", "tin"], None).unwrap();

        let result = solve(&puzzle, &word_list).expect("Failed to place words");

        assert!(result.assignment.is_complete());
        assert!(is_consistent(&puzzle, &word_list, &result.assignment));

        // Spot-check the properties the validator is asserting: distinct words of the right
        // lengths that agree at every overlap.
        let words: Vec<_> = result
            .assignment
            .assigned()
            .map(|(variable, word_id)| (variable, word_list.word(word_id)))
            .collect();

        for (variable, word) in &words {
            assert_eq!(word.length(), puzzle.variables[*variable].length);
        }
        for (x, word_x) in &words {
            for (y, word_y) in &words {
                if x == y {
                    continue;
                }
                assert_ne!(word_x.normalized_string, word_y.normalized_string);
                if let Some((x_idx, y_idx)) = puzzle.overlap(*x, *y) {
                    assert_eq!(word_x.chars[x_idx], word_y.chars[y_idx]);
                }
            }
        }

        assert_eq!(
            render_grid(&puzzle, &word_list, &result.assignment),
            "cot\na#i\ntan"
        );
        assert!(result.statistics.states > 0);
    }

    #[test]
    fn test_solve_is_deterministic() {
        let puzzle = build_puzzle(
            "
            ...
            .#.
            ...
            ",
        );
        let word_list = WordList::new(&["cot", "tan", "cat", "tin", "con", "tub"], None).unwrap();

        let first = solve(&puzzle, &word_list).expect("Failed to place words");
        let second = solve(&puzzle, &word_list).expect("Failed to place words");

        assert_eq!(first.assignment, second.assignment);
    }
}
