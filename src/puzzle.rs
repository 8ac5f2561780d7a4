//! This module implements the static model of a puzzle, independent of any solving state: the
//! grid of fillable cells, the slot variables derived from it, and the overlap map recording
//! which letter positions crossing variables must agree on.

use smallvec::SmallVec;
use std::collections::HashMap;
use std::fmt;

#[cfg(feature = "serde")]
use serde_derive::{Deserialize, Serialize};

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::types::{GridCoord, VariableId, WordId};
use crate::word_list::WordList;
use crate::MAX_WORD_LENGTH;

/// The direction that a variable is facing.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Direction {
    Across,
    Down,
}

#[derive(Debug, Clone)]
pub enum GridError {
    Empty,
    RaggedRows,
    InvalidCell(char),
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let string = match self {
            GridError::Empty => "Grid must have at least one row and one column".into(),
            GridError::RaggedRows => "Rows in grid must all be the same length".into(),
            GridError::InvalidCell(ch) => {
                format!("Grid contains invalid cell: “{ch}” (expected “.” or “#”)")
            }
        };
        write!(f, "{string}")
    }
}

/// A fixed height×width matrix marking which cells can hold letters. Immutable once built.
#[derive(Debug, Clone)]
pub struct Grid {
    width: usize,
    height: usize,

    /// Flat row-major array of cells; `true` means fillable.
    cells: Vec<bool>,
}

impl Grid {
    /// Parse a template string with `.` representing fillable cells and `#` representing blocks.
    /// Lines are trimmed and blank lines skipped, so templates can be indented in source.
    pub fn from_template_string(template: &str) -> Result<Grid, GridError> {
        let lines: Vec<&str> = template
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();

        if lines.is_empty() {
            return Err(GridError::Empty);
        }

        let width = lines[0].chars().count();
        if width == 0 {
            return Err(GridError::Empty);
        }

        let mut cells: Vec<bool> = Vec::with_capacity(width * lines.len());
        for line in &lines {
            if line.chars().count() != width {
                return Err(GridError::RaggedRows);
            }
            for ch in line.chars() {
                match ch {
                    '.' => cells.push(true),
                    '#' => cells.push(false),
                    other => return Err(GridError::InvalidCell(other)),
                }
            }
        }

        Ok(Grid {
            width,
            height: lines.len(),
            cells,
        })
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    #[must_use]
    pub fn is_fillable(&self, (row, col): GridCoord) -> bool {
        self.cells[row * self.width + col]
    }
}

/// A maximal horizontal or vertical run of fillable cells requiring one word. Two variables are
/// equal iff all four fields match. Immutable once derived from the grid.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Variable {
    pub row: usize,
    pub col: usize,
    pub direction: Direction,
    pub length: usize,
}

impl Variable {
    /// Generate the coords for each cell of this variable.
    #[must_use]
    pub fn cell_coords(&self) -> Vec<GridCoord> {
        (0..self.length)
            .map(|cell_idx| match self.direction {
                Direction::Across => (self.row, self.col + cell_idx),
                Direction::Down => (self.row + cell_idx, self.col),
            })
            .collect()
    }

    /// Parse a string like "1,2,down,5" into a `Variable` struct.
    pub fn from_key(key: &str) -> Result<Variable, String> {
        let key_parts: Vec<&str> = key.split(',').collect();
        if key_parts.len() != 4 {
            return Err(format!("invalid variable key: {key}"));
        }

        let row: Result<usize, _> = key_parts[0].parse();
        let col: Result<usize, _> = key_parts[1].parse();
        let direction: Option<Direction> = match key_parts[2] {
            "across" => Some(Direction::Across),
            "down" => Some(Direction::Down),
            _ => None,
        };
        let length: Result<usize, _> = key_parts[3].parse();

        if let (Ok(row), Ok(col), Some(direction), Ok(length)) = (row, col, direction, length) {
            Ok(Variable {
                row,
                col,
                direction,
                length,
            })
        } else {
            Err(format!("invalid variable key: {key:?}"))
        }
    }

    /// Represent this variable as a string like "1,2,down,5".
    #[must_use]
    pub fn to_key(&self) -> String {
        let direction = match self.direction {
            Direction::Across => "across",
            Direction::Down => "down",
        };
        format!("{},{},{},{}", self.row, self.col, direction, self.length)
    }
}

/// Serialize a `Variable` into a string key.
#[cfg(feature = "serde")]
impl Serialize for Variable {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_key())
    }
}

/// Deserialize a `Variable` from a string key.
#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Variable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw_string = String::deserialize(deserializer)?;
        Variable::from_key(&raw_string).map_err(serde::de::Error::custom)
    }
}

/// The pair of char indices at which two crossing variables must agree: `overlap(x, y) = (i, j)`
/// means the word for `x` at index `i` equals the word for `y` at index `j`.
pub type Overlap = (usize, usize);

/// The immutable model consumed by the solver: the grid, its derived variables, and the overlap
/// map. Variables are stored in an arena and referenced by `VariableId` everywhere else, so the
/// cyclic constraint graph needs no back-references.
#[derive(Debug, Clone)]
pub struct Puzzle {
    pub grid: Grid,
    pub variables: Vec<Variable>,

    /// Dense ordered-pair matrix: `overlaps[x * n + y]` is the overlap between x and y, if any.
    overlaps: Vec<Option<Overlap>>,

    /// For each variable, the ids of every variable it overlaps with, in ascending order.
    neighbors: Vec<SmallVec<[VariableId; MAX_WORD_LENGTH]>>,
}

impl Puzzle {
    /// Derive the variables and overlap map for a grid. Variables are numbered deterministically:
    /// ACROSS runs scanned row by row, then DOWN runs scanned column by column.
    #[must_use]
    pub fn build(grid: Grid) -> Puzzle {
        let variables = derive_variables(&grid);
        let variable_count = variables.len();

        // Build a map from cell location to the variables occupying it, which determines the
        // crossings: an across and a down run can share at most one cell, and two runs of the
        // same direction never share any.
        let mut entries_by_cell: HashMap<GridCoord, Vec<(VariableId, usize)>> = HashMap::new();
        for (variable_id, variable) in variables.iter().enumerate() {
            for (cell_idx, coord) in variable.cell_coords().into_iter().enumerate() {
                entries_by_cell
                    .entry(coord)
                    .or_default()
                    .push((variable_id, cell_idx));
            }
        }

        let mut overlaps: Vec<Option<Overlap>> = vec![None; variable_count * variable_count];
        for entries in entries_by_cell.values() {
            if entries.len() < 2 {
                continue;
            }
            if entries.len() > 2 {
                panic!("More than two variables occupying one cell?");
            }

            let (a, a_idx) = entries[0];
            let (b, b_idx) = entries[1];
            overlaps[a * variable_count + b] = Some((a_idx, b_idx));
            overlaps[b * variable_count + a] = Some((b_idx, a_idx));
        }

        let neighbors: Vec<SmallVec<[VariableId; MAX_WORD_LENGTH]>> = (0..variable_count)
            .map(|x| {
                (0..variable_count)
                    .filter(|&y| overlaps[x * variable_count + y].is_some())
                    .collect()
            })
            .collect();

        Puzzle {
            grid,
            variables,
            overlaps,
            neighbors,
        }
    }

    #[must_use]
    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    /// The overlap between two variables, or `None` if they share no cell.
    #[must_use]
    pub fn overlap(&self, x: VariableId, y: VariableId) -> Option<Overlap> {
        self.overlaps[x * self.variables.len() + y]
    }

    /// The ids of every variable overlapping `x`, in ascending order.
    #[must_use]
    pub fn neighbors(&self, x: VariableId) -> &[VariableId] {
        &self.neighbors[x]
    }

    /// The number of overlap constraints on `x`.
    #[must_use]
    pub fn degree(&self, x: VariableId) -> usize {
        self.neighbors[x].len()
    }
}

/// Scan the grid for maximal runs of fillable cells of length >= 2, rows first and then columns.
fn derive_variables(grid: &Grid) -> Vec<Variable> {
    let mut variables: Vec<Variable> = vec![];

    for row in 0..grid.height() {
        let mut col = 0;
        while col < grid.width() {
            if !grid.is_fillable((row, col)) {
                col += 1;
                continue;
            }
            let start = col;
            while col < grid.width() && grid.is_fillable((row, col)) {
                col += 1;
            }
            if col - start >= 2 {
                variables.push(Variable {
                    row,
                    col: start,
                    direction: Direction::Across,
                    length: col - start,
                });
            }
        }
    }

    for col in 0..grid.width() {
        let mut row = 0;
        while row < grid.height() {
            if !grid.is_fillable((row, col)) {
                row += 1;
                continue;
            }
            let start = row;
            while row < grid.height() && grid.is_fillable((row, col)) {
                row += 1;
            }
            if row - start >= 2 {
                variables.push(Variable {
                    row: start,
                    col,
                    direction: Direction::Down,
                    length: row - start,
                });
            }
        }
    }

    variables
}

/// A mapping from variables to chosen words, built incrementally during search and complete once
/// every variable is mapped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    words: Vec<Option<WordId>>,
}

impl Assignment {
    #[must_use]
    pub fn new(variable_count: usize) -> Assignment {
        Assignment {
            words: vec![None; variable_count],
        }
    }

    #[must_use]
    pub fn get(&self, variable: VariableId) -> Option<WordId> {
        self.words[variable]
    }

    pub fn set(&mut self, variable: VariableId, word_id: WordId) {
        self.words[variable] = Some(word_id);
    }

    pub fn clear(&mut self, variable: VariableId) {
        self.words[variable] = None;
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.words.iter().all(Option::is_some)
    }

    /// Iterate over assigned (variable, word) pairs in ascending variable order.
    pub fn assigned(&self) -> impl Iterator<Item = (VariableId, WordId)> + '_ {
        self.words
            .iter()
            .enumerate()
            .filter_map(|(variable, word)| word.map(|word_id| (variable, word_id)))
    }
}

/// Turn the given puzzle and assignment into a rendered string, with `#` for blocks and `.` for
/// any cell no assigned variable covers.
#[must_use]
pub fn render_grid(puzzle: &Puzzle, word_list: &WordList, assignment: &Assignment) -> String {
    let width = puzzle.grid.width();
    let mut letters: Vec<Option<char>> = vec![None; width * puzzle.grid.height()];

    for (variable_id, word_id) in assignment.assigned() {
        let word = word_list.word(word_id);
        for (cell_idx, (row, col)) in puzzle.variables[variable_id]
            .cell_coords()
            .into_iter()
            .enumerate()
        {
            letters[row * width + col] = Some(word.chars[cell_idx]);
        }
    }

    (0..puzzle.grid.height())
        .map(|row| {
            (0..width)
                .map(|col| {
                    if puzzle.grid.is_fillable((row, col)) {
                        letters[row * width + col].unwrap_or('.')
                    } else {
                        '#'
                    }
                })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use crate::puzzle::{Direction, Variable};

    #[test]
    fn test_variable_serialization() {
        let variable = Variable {
            row: 1,
            col: 2,
            direction: Direction::Across,
            length: 5,
        };

        let key = serde_json::to_string(&variable).unwrap();

        assert_eq!(key, "\"1,2,across,5\"");
    }

    #[test]
    fn test_variable_deserialization() {
        let variable: Variable = serde_json::from_str("\"3,4,down,12\"").unwrap();

        assert_eq!(
            variable,
            Variable {
                row: 3,
                col: 4,
                direction: Direction::Down,
                length: 12,
            }
        );
    }
}
