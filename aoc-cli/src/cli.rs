//! CLI argument parsing using clap

use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Advent of Code 2020 solver runner
#[derive(Parser, Debug)]
#[command(name = "aoc2020", about = "Run Advent of Code 2020 solvers", version)]
pub struct Args {
    /// Day to run (runs all registered days if omitted)
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=25))]
    pub day: Option<u8>,

    /// Part to run (runs all parts if omitted)
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=2))]
    pub part: Option<u8>,

    /// Tags to filter solvers (comma-separated, all must match)
    #[arg(short, long, value_delimiter = ',')]
    pub tags: Vec<String>,

    /// Directory holding `dayNN.txt` input files
    #[arg(long, default_value = "inputs")]
    pub input_dir: PathBuf,

    /// Explicit input file for the selected day
    #[arg(short, long, requires = "day")]
    pub input: Option<PathBuf>,

    /// Quiet mode - only output answers
    #[arg(short, long)]
    pub quiet: bool,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_command_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["aoc2020"]).unwrap();
        assert_eq!(args.day, None);
        assert_eq!(args.part, None);
        assert!(args.tags.is_empty());
        assert_eq!(args.input_dir, PathBuf::from("inputs"));
        assert!(!args.quiet);
        assert_eq!(args.verbose, 0);
    }

    #[test]
    fn test_full_selection() {
        let args = Args::try_parse_from([
            "aoc2020", "-d", "17", "-p", "2", "-t", "simulation,core", "-i", "my.txt", "-q", "-vv",
        ])
        .unwrap();
        assert_eq!(args.day, Some(17));
        assert_eq!(args.part, Some(2));
        assert_eq!(args.tags, vec!["simulation", "core"]);
        assert_eq!(args.input, Some(PathBuf::from("my.txt")));
        assert!(args.quiet);
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_input_requires_day() {
        assert!(Args::try_parse_from(["aoc2020", "--input", "x.txt"]).is_err());
    }

    #[test]
    fn test_ranges_are_enforced() {
        assert!(Args::try_parse_from(["aoc2020", "-d", "0"]).is_err());
        assert!(Args::try_parse_from(["aoc2020", "-d", "26"]).is_err());
        assert!(Args::try_parse_from(["aoc2020", "-p", "3"]).is_err());
    }
}
