use clap::Parser;
use crossfill_core::backtracking_search::solve;
use crossfill_core::puzzle::{render_grid, Grid, Puzzle};
use crossfill_core::word_list::WordList;
use std::fmt::{Debug, Formatter};
use std::fs;

const WORDLIST_RAW: &str = include_str!("../resources/wordlist.dict");

/// crossfill: Command-line crossword word-placement tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the grid file, as ASCII with # representing blocks and . representing open squares
    grid_path: String,

    /// Path to a wordlist file with one entry per line [default: (embedded word list)]
    #[arg(long)]
    wordlist: Option<String>,
}

struct Error(String);

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0) // Print error unquoted
    }
}

fn main() -> Result<(), Error> {
    let args = Args::parse();

    let raw_grid_content = fs::read_to_string(&args.grid_path)
        .map_err(|_| Error(format!("Couldn't read file '{}'", args.grid_path)))?;

    let grid = Grid::from_template_string(&raw_grid_content)
        .map_err(|grid_error| Error(format!("{grid_error}")))?;

    let max_side = grid.width().max(grid.height());

    let word_list = match args.wordlist {
        Some(wordlist_path) => WordList::from_dict_file(&wordlist_path, Some(max_side)),
        None => WordList::from_contents(WORDLIST_RAW, Some(max_side)),
    }
    .map_err(|word_list_error| Error(format!("{word_list_error}")))?;

    if word_list.is_empty() {
        return Err(Error("Word list is empty".into()));
    }

    let puzzle = Puzzle::build(grid);

    let result = solve(&puzzle, &word_list).map_err(|_| Error("Unsolvable puzzle".into()))?;

    println!("{}", render_grid(&puzzle, &word_list, &result.assignment));

    Ok(())
}
