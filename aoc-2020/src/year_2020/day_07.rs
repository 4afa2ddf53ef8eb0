//! Day 7: Handy Haversacks

use std::collections::{BTreeMap, VecDeque};
use std::sync::LazyLock;

use anyhow::{anyhow, bail};
use aoc_framework::{AocParser, AocSolver, AutoRegisterSolver, ParseError, PartSolver, SolveError};
use regex::Regex;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::utils::dp_cache::{DpCache, DpProblem, HashMapBackend};

const TARGET: &str = "shiny gold";

static RULE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.+?) bags contain (.+)\.$").expect("valid regex"));
static CONTENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+) (.+?) bags?$").expect("valid regex"));

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(day = 7, tags = ["graph", "dp"])]
pub struct Solver;

/// Outer colour to `(count, inner colour)` pairs.
pub type BagRules = BTreeMap<String, Vec<(u64, String)>>;

fn parse_rule(line: &str) -> anyhow::Result<(String, Vec<(u64, String)>)> {
    let caps = RULE
        .captures(line)
        .ok_or_else(|| anyhow!("expected `<colour> bags contain <contents>.`"))?;
    let outer = caps[1].to_string();
    let body = &caps[2];
    if body == "no other bags" {
        return Ok((outer, Vec::new()));
    }

    let contents = body
        .split(", ")
        .map(|item| -> anyhow::Result<(u64, String)> {
            let caps = CONTENT
                .captures(item)
                .ok_or_else(|| anyhow!("bad content {item:?}"))?;
            let count: u64 = caps[1].parse()?;
            if count == 0 {
                bail!("bag count must be positive in {item:?}");
            }
            Ok((count, caps[2].to_string()))
        })
        .collect::<anyhow::Result<_>>()?;
    Ok((outer, contents))
}

impl AocParser for Solver {
    type SharedData<'a> = BagRules;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        let mut rules = BagRules::new();
        for (i, line) in input.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let (outer, contents) = parse_rule(line).map_err(|e| ParseError::at_line(i, e))?;
            if rules.insert(outer, contents).is_some() {
                return Err(ParseError::at_line(i, "colour has two rules"));
            }
        }
        Ok(rules)
    }
}

/// Colours that can eventually hold `target`, by walking the rules backwards.
pub fn holders_of<'r>(rules: &'r BagRules, target: &str) -> FxHashSet<&'r str> {
    let mut parents: FxHashMap<&str, Vec<&str>> = FxHashMap::default();
    for (outer, contents) in rules {
        for (_, inner) in contents {
            parents.entry(inner.as_str()).or_default().push(outer.as_str());
        }
    }

    let mut seen = FxHashSet::default();
    let mut queue: VecDeque<&str> = VecDeque::from([target]);
    while let Some(colour) = queue.pop_front() {
        for &parent in parents.get(colour).into_iter().flatten() {
            if seen.insert(parent) {
                queue.push_back(parent);
            }
        }
    }
    seen.remove(target);
    seen
}

/// Bags inside a bag, the bag itself included, or `None` past `u64::MAX`.
/// Colours without a rule hold nothing.
struct BagCount<'r>(&'r BagRules);

impl<'r> DpProblem<&'r str, Option<u64>> for BagCount<'r> {
    fn deps(&self, colour: &&'r str) -> Vec<&'r str> {
        self.0
            .get(*colour)
            .into_iter()
            .flatten()
            .map(|(_, inner)| inner.as_str())
            .collect()
    }

    fn compute(&self, colour: &&'r str, deps: Vec<Option<u64>>) -> Option<u64> {
        let counts = self.0.get(*colour).into_iter().flatten().map(|(n, _)| *n);
        counts
            .zip(deps)
            .try_fold(1u64, |total, (n, inner)| total.checked_add(n.checked_mul(inner?)?))
    }
}

pub fn bags_inside(rules: &BagRules, colour: &str) -> Result<u64, SolveError> {
    let cache = DpCache::with_problem(HashMapBackend::new(), BagCount(rules));
    let total = cache
        .get(&colour)
        .map_err(SolveError::failed)?
        .ok_or_else(|| {
            SolveError::failed(format!("{colour} bags hold more than {} bags", u64::MAX))
        })?;
    Ok(total - 1)
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(holders_of(shared, TARGET).len().to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(bags_inside(shared, TARGET)?.to_string())
    }
}
