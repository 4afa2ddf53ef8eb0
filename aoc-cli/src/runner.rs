//! Sequential runner for the selected solvers

use crate::config::Config;
use crate::error::{InputError, RunError};
use crate::inputs::InputStore;
use aoc_framework::{DynSolver, SolverRegistry};
use chrono::TimeDelta;
use std::ops::RangeInclusive;
use std::path::PathBuf;

/// Result from a single solver execution
#[derive(Debug)]
pub struct SolverResult {
    pub day: u8,
    /// `None` when the day failed before any part could run
    pub part: Option<u8>,
    pub answer: Result<String, RunError>,
    /// Set on the first part of each day only, so totals count each parse once
    pub parse_duration: Option<TimeDelta>,
    pub solve_duration: TimeDelta,
}

impl SolverResult {
    fn failed(day: u8, error: RunError) -> Self {
        Self {
            day,
            part: None,
            answer: Err(error),
            parse_duration: None,
            solve_duration: TimeDelta::zero(),
        }
    }
}

/// Work item representing a solver to execute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    pub day: u8,
    pub parts: RangeInclusive<u8>,
}

/// Where each day's input comes from
enum InputSource {
    Directory(InputStore),
    /// Contents of `--input`, used for the single selected day
    Explicit(String),
}

/// Runs the selected days one after another
pub struct Runner {
    registry: SolverRegistry,
    source: InputSource,
    day_filter: Option<u8>,
    part_filter: Option<u8>,
}

impl Runner {
    /// Create a runner; `explicit_input` replaces the input directory.
    pub fn new(registry: SolverRegistry, config: &Config, explicit_input: Option<String>) -> Self {
        let source = match explicit_input {
            Some(input) => InputSource::Explicit(input),
            None => InputSource::Directory(InputStore::new(config.input_dir.clone())),
        };
        Self {
            registry,
            source,
            day_filter: config.day_filter,
            part_filter: config.part_filter,
        }
    }

    /// Collect work items by filtering from registry metadata
    pub fn collect_work_items(&self) -> Vec<WorkItem> {
        self.registry
            .iter_info()
            .filter(|info| self.day_filter.is_none_or(|d| info.day == d))
            .map(|info| WorkItem {
                day: info.day,
                parts: self.filter_parts(info.parts),
            })
            .filter(|w| !w.parts.is_empty())
            .collect()
    }

    /// Filter parts based on the part filter and the solver's max parts
    #[allow(clippy::reversed_empty_ranges)]
    fn filter_parts(&self, max_parts: u8) -> RangeInclusive<u8> {
        match self.part_filter {
            Some(p) if p <= max_parts => p..=p,
            Some(_) => 1..=0,
            None => 1..=max_parts,
        }
    }

    /// Days whose input file is absent, with the path that was expected
    pub fn missing_inputs(&self, work_items: &[WorkItem]) -> Vec<(u8, PathBuf)> {
        match &self.source {
            InputSource::Explicit(_) => Vec::new(),
            InputSource::Directory(store) => work_items
                .iter()
                .filter(|w| !store.contains(w.day))
                .map(|w| (w.day, store.path_for(w.day)))
                .collect(),
        }
    }

    /// Drop days whose input file is absent, unless a single day was asked
    /// for: a missing file for that day is still run and reported as a failure.
    pub fn skip_missing(
        &self,
        work_items: Vec<WorkItem>,
        missing: &[(u8, PathBuf)],
    ) -> Vec<WorkItem> {
        if self.day_filter.is_some() {
            return work_items;
        }
        work_items
            .into_iter()
            .filter(|w| missing.iter().all(|(day, _)| *day != w.day))
            .collect()
    }

    /// Execute all work items in day order, handing each result to `emit`
    pub fn execute(&self, work_items: &[WorkItem], mut emit: impl FnMut(SolverResult)) {
        for work in work_items {
            self.run_day(work, &mut emit);
        }
    }

    fn load_input(&self, day: u8) -> Result<String, InputError> {
        match &self.source {
            InputSource::Directory(store) => store.load(day),
            InputSource::Explicit(input) => Ok(input.clone()),
        }
    }

    fn run_day(&self, work: &WorkItem, emit: &mut impl FnMut(SolverResult)) {
        let day = work.day;
        let input = match self.load_input(day) {
            Ok(input) => input,
            Err(source) => return emit(SolverResult::failed(day, RunError::Input { day, source })),
        };

        let mut solver = match self.registry.create_solver(day, &input) {
            Ok(solver) => solver,
            Err(source) => return emit(SolverResult::failed(day, RunError::Setup { day, source })),
        };

        let mut parse_duration = Some(solver.parse_duration());
        for part in work.parts.clone() {
            emit(solve_part(day, part, &mut *solver, parse_duration.take()));
        }
    }
}

/// Solve a single part
fn solve_part(
    day: u8,
    part: u8,
    solver: &mut dyn DynSolver,
    parse_duration: Option<TimeDelta>,
) -> SolverResult {
    match solver.solve(part) {
        Ok(result) => SolverResult {
            day,
            part: Some(part),
            solve_duration: result.duration(),
            answer: Ok(result.answer),
            parse_duration,
        },
        Err(e) => SolverResult {
            day,
            part: Some(part),
            answer: Err(RunError::Part {
                day,
                part,
                source: e.into(),
            }),
            parse_duration,
            solve_duration: TimeDelta::zero(),
        },
    }
}

/// Fold every failure of a finished run into one error
pub fn into_outcome(results: Vec<SolverResult>) -> Result<(), RunError> {
    results
        .into_iter()
        .filter_map(|r| r.answer.err())
        .fold(None, |acc, e| Some(RunError::combine_opt(acc, e)))
        .map_or(Ok(()), Err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aoc_framework::{AocParser, AocSolver, ParseError, PartSolver, RegistryBuilder, SolveError, SolverError};
    use std::fs;
    use tempfile::TempDir;

    /// Sums the numbers on each line; part 2 always fails.
    #[derive(AocSolver)]
    #[aoc_solver(max_parts = 2)]
    struct LineSum;

    impl AocParser for LineSum {
        type SharedData<'a> = Vec<u64>;

        fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
            input
                .lines()
                .enumerate()
                .map(|(i, line)| line.trim().parse().map_err(|e| ParseError::at_line(i, e)))
                .collect()
        }
    }

    impl PartSolver<1> for LineSum {
        fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
            Ok(shared.iter().sum::<u64>().to_string())
        }
    }

    impl PartSolver<2> for LineSum {
        fn solve(_shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
            Err(SolveError::failed("not today"))
        }
    }

    fn registry() -> SolverRegistry {
        let mut builder = RegistryBuilder::new();
        aoc_framework::register_solver!(builder, LineSum, 3);
        aoc_framework::register_solver!(builder, LineSum, 5);
        builder.build()
    }

    fn config(dir: &TempDir, day: Option<u8>, part: Option<u8>) -> Config {
        Config {
            day_filter: day,
            part_filter: part,
            tags: Vec::new(),
            input_dir: dir.path().to_path_buf(),
            input_file: None,
            quiet: true,
            log_level: log::LevelFilter::Off,
        }
    }

    fn run(runner: &Runner) -> Vec<SolverResult> {
        let mut results = Vec::new();
        runner.execute(&runner.collect_work_items(), |r| results.push(r));
        results
    }

    #[test]
    fn test_work_item_filters() {
        let temp = TempDir::new().unwrap();

        let all = Runner::new(registry(), &config(&temp, None, None), None);
        assert_eq!(
            all.collect_work_items(),
            vec![
                WorkItem { day: 3, parts: 1..=2 },
                WorkItem { day: 5, parts: 1..=2 },
            ]
        );

        let one = Runner::new(registry(), &config(&temp, Some(5), Some(1)), None);
        assert_eq!(one.collect_work_items(), vec![WorkItem { day: 5, parts: 1..=1 }]);

        let none = Runner::new(registry(), &config(&temp, Some(4), None), None);
        assert!(none.collect_work_items().is_empty());
    }

    #[test]
    fn test_run_reports_every_outcome() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("day03.txt"), "1\n2\n3\n").unwrap();
        let runner = Runner::new(registry(), &config(&temp, None, None), None);

        let items = runner.collect_work_items();
        let missing = runner.missing_inputs(&items);
        assert_eq!(missing, vec![(5, temp.path().join("day05.txt"))]);

        let results = run(&runner);
        assert_eq!(results.len(), 3);

        assert_eq!((results[0].day, results[0].part), (3, Some(1)));
        assert_eq!(results[0].answer.as_deref().ok(), Some("6"));
        assert!(results[0].parse_duration.is_some());

        assert_eq!((results[1].day, results[1].part), (3, Some(2)));
        assert!(matches!(results[1].answer, Err(RunError::Part { day: 3, part: 2, .. })));
        assert!(results[1].parse_duration.is_none());

        assert_eq!((results[2].day, results[2].part), (5, None));
        assert!(matches!(results[2].answer, Err(RunError::Input { day: 5, .. })));

        match into_outcome(results) {
            Err(RunError::Multiple(errors)) => assert_eq!(errors.len(), 2),
            other => panic!("expected two failures, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_inputs_are_skipped_when_running_every_day() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("day05.txt"), "7\n").unwrap();

        let all = Runner::new(registry(), &config(&temp, None, Some(1)), None);
        let items = all.collect_work_items();
        let missing = all.missing_inputs(&items);
        let items = all.skip_missing(items, &missing);
        assert_eq!(items, vec![WorkItem { day: 5, parts: 1..=1 }]);

        let mut results = Vec::new();
        all.execute(&items, |r| results.push(r));
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].answer.as_deref().ok(), Some("7"));
        assert!(into_outcome(results).is_ok());

        let chosen = Runner::new(registry(), &config(&temp, Some(3), None), None);
        let items = chosen.collect_work_items();
        let missing = chosen.missing_inputs(&items);
        assert_eq!(missing.len(), 1);
        assert_eq!(chosen.skip_missing(items.clone(), &missing), items);
    }

    #[test]
    fn test_parse_failure_is_reported_once() {
        let temp = TempDir::new().unwrap();
        let runner = Runner::new(
            registry(),
            &config(&temp, Some(3), None),
            Some("1\ntwo\n".to_string()),
        );
        assert!(runner.missing_inputs(&runner.collect_work_items()).is_empty());

        let results = run(&runner);
        assert_eq!(results.len(), 1);
        assert!(matches!(
            &results[0].answer,
            Err(RunError::Setup {
                day: 3,
                source: SolverError::ParseError(ParseError::InvalidLine { line: 2, .. })
            })
        ));
    }

    #[test]
    fn test_clean_run_succeeds() {
        let temp = TempDir::new().unwrap();
        let runner = Runner::new(
            registry(),
            &config(&temp, Some(5), Some(1)),
            Some("40\n2".to_string()),
        );
        let results = run(&runner);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].answer.as_deref().ok(), Some("42"));
        assert!(into_outcome(results).is_ok());
    }
}
