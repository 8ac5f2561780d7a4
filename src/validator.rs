//! The pure consistency predicate used by the search to test partial and complete assignments.

use std::collections::HashSet;

use crate::puzzle::{Assignment, Puzzle};
use crate::types::WordId;
use crate::word_list::WordList;

/// Report whether the assigned words are pairwise distinct, length-matched, and in agreement at
/// every recorded overlap. Only assigned variables are checked, so partial assignments validate
/// as long as nothing assigned so far conflicts. No side effects.
#[must_use]
pub fn is_consistent(puzzle: &Puzzle, word_list: &WordList, assignment: &Assignment) -> bool {
    let mut seen: HashSet<WordId> = HashSet::new();

    for (variable, word_id) in assignment.assigned() {
        if !seen.insert(word_id) {
            return false;
        }
        // Redundant given node consistency, but required for the predicate to stand on its own.
        if word_list.word(word_id).length() != puzzle.variables[variable].length {
            return false;
        }
    }

    for (x, w1) in assignment.assigned() {
        for &y in puzzle.neighbors(x) {
            if y < x {
                continue; // each unordered pair is checked once
            }
            let Some(w2) = assignment.get(y) else {
                continue;
            };
            let (x_idx, y_idx) = puzzle
                .overlap(x, y)
                .expect("neighboring variables must have an overlap");

            if word_list.word(w1).chars[x_idx] != word_list.word(w2).chars[y_idx] {
                return false;
            }
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use crate::puzzle::{Assignment, Grid, Puzzle};
    use crate::validator::is_consistent;
    use crate::word_list::WordList;

    fn crossing_fixture() -> (Puzzle, WordList) {
        // Across of length 3 crossing a down of length 4 at (index 1, index 0).
        let puzzle = Puzzle::build(
            Grid::from_template_string(
                "
                ...
                #.#
                #.#
                #.#
                ",
            )
            .unwrap(),
        );
        let word_list = WordList::new(&["cat", "acid", "toad", "oat"], None).unwrap();
        (puzzle, word_list)
    }

    #[test]
    fn test_accepts_agreeing_assignment() {
        let (puzzle, word_list) = crossing_fixture();
        let mut assignment = Assignment::new(puzzle.variable_count());

        assignment.set(0, 0); // cat
        assignment.set(1, 1); // acid; cat[1] == acid[0] == 'a'

        assert!(is_consistent(&puzzle, &word_list, &assignment));
    }

    #[test]
    fn test_rejects_overlap_disagreement() {
        let (puzzle, word_list) = crossing_fixture();
        let mut assignment = Assignment::new(puzzle.variable_count());

        assignment.set(0, 0); // cat
        assignment.set(1, 2); // toad; cat[1] == 'a' but toad[0] == 't'

        assert!(!is_consistent(&puzzle, &word_list, &assignment));
    }

    #[test]
    fn test_rejects_duplicate_words() {
        let puzzle = Puzzle::build(
            Grid::from_template_string(
                "
                ...
                ###
                ...
                ",
            )
            .unwrap(),
        );
        let word_list = WordList::new(&["cat"], None).unwrap();
        let mut assignment = Assignment::new(puzzle.variable_count());

        assignment.set(0, 0);
        assignment.set(1, 0);

        assert!(!is_consistent(&puzzle, &word_list, &assignment));
    }

    #[test]
    fn test_rejects_length_mismatch() {
        let (puzzle, word_list) = crossing_fixture();
        let mut assignment = Assignment::new(puzzle.variable_count());

        assignment.set(0, 1); // acid in the length-3 slot

        assert!(!is_consistent(&puzzle, &word_list, &assignment));
    }

    #[test]
    fn test_partial_assignment_is_checked_only_where_assigned() {
        let (puzzle, word_list) = crossing_fixture();
        let mut assignment = Assignment::new(puzzle.variable_count());

        assert!(is_consistent(&puzzle, &word_list, &assignment));

        assignment.set(1, 1); // acid alone, across slot still open
        assert!(is_consistent(&puzzle, &word_list, &assignment));
    }
}
