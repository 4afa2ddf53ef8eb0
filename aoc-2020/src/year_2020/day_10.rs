//! Day 10: Adapter Array

use aoc_framework::{AocParser, AocSolver, AutoRegisterSolver, ParseError, PartSolver, SolveError};
use thiserror::Error;

use crate::utils::dp_cache::{DpCache, VecBackend};

/// Largest joltage step an adapter accepts.
const MAX_STEP: u64 = 3;

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(day = 10, tags = ["dp"])]
pub struct Solver;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("no adapter bridges the gap from {from} to {to} jolts")]
pub struct GapError {
    pub from: u64,
    pub to: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("more than {} adapter arrangements", u64::MAX)]
pub struct TooManyArrangements;

/// Sorted joltages with the outlet's 0 in front.
fn check_chain(chain: &[u64]) -> Result<(), GapError> {
    match chain.windows(2).find(|w| w[1] - w[0] > MAX_STEP) {
        Some(w) => Err(GapError { from: w[0], to: w[1] }),
        None => Ok(()),
    }
}

impl AocParser for Solver {
    type SharedData<'a> = Vec<u64>;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        let mut chain = vec![0];
        for (i, line) in input.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let jolts: u64 = line
                .parse()
                .map_err(|e| ParseError::at_line(i, format!("{line:?}: {e}")))?;
            if jolts == 0 {
                return Err(ParseError::at_line(i, "adapters must be rated above 0 jolts"));
            }
            chain.push(jolts);
        }
        chain.sort_unstable();
        Ok(chain)
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        check_chain(shared).map_err(SolveError::failed)?;
        let (ones, threes) = shared
            .windows(2)
            .fold((0u64, 0u64), |(ones, threes), w| match w[1] - w[0] {
                1 => (ones + 1, threes),
                3 => (ones, threes + 1),
                _ => (ones, threes),
            });
        // the device is always 3 above the last adapter
        Ok((ones * (threes + 1)).to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        check_chain(shared).map_err(SolveError::failed)?;
        let chain: &[u64] = shared;
        let last = chain.len() - 1;

        // ways(i): arrangements from adapter i up to the last one, None once
        // the count no longer fits
        let cache = DpCache::new(
            VecBackend::with_capacity(chain.len()),
            |&i: &usize| {
                (i + 1..chain.len())
                    .take_while(|&j| chain[j] - chain[i] <= MAX_STEP)
                    .collect()
            },
            |&i: &usize, deps: Vec<Option<u64>>| {
                if i == last {
                    Some(1)
                } else {
                    deps.into_iter().try_fold(0u64, |acc, ways| acc.checked_add(ways?))
                }
            },
        );
        let ways = cache
            .get(&0)
            .map_err(SolveError::failed)?
            .ok_or_else(|| SolveError::failed(TooManyArrangements))?;
        Ok(ways.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SMALL: &str = "16\n10\n15\n5\n1\n11\n7\n19\n6\n12\n4\n";
    const LARGE: &str = "28\n33\n18\n42\n31\n14\n46\n20\n48\n47\n24\n23\n49\n45\n19\n38\n39\n11\n1\n32\n25\n35\n8\n17\n7\n9\n4\n2\n34\n10\n3\n";

    fn solve_both(input: &str) -> (String, String) {
        let mut shared = Solver::parse(input).unwrap();
        (
            <Solver as PartSolver<1>>::solve(&mut shared).unwrap(),
            <Solver as PartSolver<2>>::solve(&mut shared).unwrap(),
        )
    }

    #[test]
    fn test_small_example() {
        assert_eq!(solve_both(SMALL), ("35".to_string(), "8".to_string()));
    }

    #[test]
    fn test_large_example() {
        assert_eq!(solve_both(LARGE), ("220".to_string(), "19208".to_string()));
    }

    #[test]
    fn test_single_adapter() {
        assert_eq!(solve_both("2"), ("0".to_string(), "1".to_string()));
    }

    #[test]
    fn test_no_adapters() {
        assert_eq!(solve_both(""), ("0".to_string(), "1".to_string()));
    }

    #[test]
    fn test_gap_is_an_error() {
        let mut shared = Solver::parse("1\n2\n9").unwrap();
        let err = <Solver as PartSolver<1>>::solve(&mut shared).unwrap_err();
        assert!(err.to_string().contains("from 2 to 9"));
        assert!(<Solver as PartSolver<2>>::solve(&mut shared).is_err());
    }

    #[test]
    fn test_arrangement_overflow_is_an_error() {
        let input = (1..=90).map(|j| j.to_string()).collect::<Vec<_>>().join("\n");
        let mut shared = Solver::parse(&input).unwrap();
        let err = <Solver as PartSolver<2>>::solve(&mut shared).unwrap_err();
        assert!(matches!(err, SolveError::SolveFailed(_)));
        assert!(err.to_string().contains("arrangements"));

        // 60 adapters in steps of one still fit
        let input = (1..=60).map(|j| j.to_string()).collect::<Vec<_>>().join("\n");
        let mut shared = Solver::parse(&input).unwrap();
        assert_eq!(
            <Solver as PartSolver<2>>::solve(&mut shared).unwrap(),
            "4680045560037375"
        );
    }

    #[test]
    fn test_long_chain_of_three_jolt_steps() {
        let input = (1..=60_000).map(|j| (j * 3).to_string()).collect::<Vec<_>>().join("\n");
        assert_eq!(solve_both(&input), ("0".to_string(), "1".to_string()));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            Solver::parse("1\nfour"),
            Err(ParseError::InvalidLine { line: 2, .. })
        ));
        assert!(matches!(
            Solver::parse("0"),
            Err(ParseError::InvalidLine { line: 1, .. })
        ));
    }
}
