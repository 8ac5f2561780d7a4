//! Mutable candidate word sets for each variable. Domains start as the length-filtered dictionary
//! ("node consistency") and only ever shrink afterwards, through AC-3 propagation.

use crate::puzzle::Puzzle;
use crate::types::{VariableId, WordId};
use crate::word_list::WordList;

/// A mapping from each variable to its current candidate word ids, kept in ascending id order so
/// every downstream ordering is deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainStore {
    options: Vec<Vec<WordId>>,
}

impl DomainStore {
    /// Initialize each domain with exactly the dictionary words whose length matches the
    /// variable's length. An empty domain here means the puzzle is unsolvable; that's the
    /// caller's check to make.
    #[must_use]
    pub fn node_consistent(puzzle: &Puzzle, word_list: &WordList) -> DomainStore {
        DomainStore {
            options: puzzle
                .variables
                .iter()
                .map(|variable| word_list.ids_of_length(variable.length).to_vec())
                .collect(),
        }
    }

    /// The candidate word ids for a variable, in ascending id order.
    #[must_use]
    pub fn options(&self, variable: VariableId) -> &[WordId] {
        &self.options[variable]
    }

    #[must_use]
    pub fn size(&self, variable: VariableId) -> usize {
        self.options[variable].len()
    }

    #[must_use]
    pub fn is_empty(&self, variable: VariableId) -> bool {
        self.options[variable].is_empty()
    }

    /// The first variable whose domain is empty, if any.
    #[must_use]
    pub fn first_empty(&self) -> Option<VariableId> {
        (0..self.options.len()).find(|&variable| self.options[variable].is_empty())
    }

    /// Exclusive access for the propagation engine; nothing else mutates domains.
    pub(crate) fn options_mut(&mut self, variable: VariableId) -> &mut Vec<WordId> {
        &mut self.options[variable]
    }
}
