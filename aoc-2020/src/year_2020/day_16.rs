//! Day 16: Ticket Translation

use std::collections::{BTreeMap, BTreeSet};
use std::ops::RangeInclusive;
use std::sync::LazyLock;

use anyhow::anyhow;
use aoc_framework::{AocParser, AocSolver, AutoRegisterSolver, ParseError, PartSolver, SolveError};
use regex::Regex;
use thiserror::Error;

use crate::utils::elimination::{EliminationError, eliminate};

static RULE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([^:]+): (\d+)-(\d+) or (\d+)-(\d+)$").expect("valid regex")
});

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(day = 16, tags = ["sets", "parsing"])]
pub struct Solver;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRule<'a> {
    pub name: &'a str,
    pub ranges: [RangeInclusive<u64>; 2],
}

impl FieldRule<'_> {
    pub fn accepts(&self, value: u64) -> bool {
        self.ranges.iter().any(|range| range.contains(&value))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notes<'a> {
    pub rules: Vec<FieldRule<'a>>,
    pub mine: Vec<u64>,
    pub nearby: Vec<Vec<u64>>,
}

impl Notes<'_> {
    fn fits_some_rule(&self, value: u64) -> bool {
        self.rules.iter().any(|rule| rule.accepts(value))
    }

    /// Sum of the nearby values no rule accepts, or `None` past `u64::MAX`.
    pub fn error_rate(&self) -> Option<u64> {
        self.nearby
            .iter()
            .flatten()
            .filter(|&&value| !self.fits_some_rule(value))
            .try_fold(0u64, |total, &value| total.checked_add(value))
    }

    /// Nearby tickets whose every value fits at least one rule.
    pub fn valid_nearby(&self) -> impl Iterator<Item = &[u64]> {
        self.nearby
            .iter()
            .filter(|ticket| ticket.iter().all(|&value| self.fits_some_rule(value)))
            .map(Vec::as_slice)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TicketError {
    #[error("{rules} rules for tickets with {values} values")]
    FieldCount { rules: usize, values: usize },
    #[error(transparent)]
    Unresolved(#[from] EliminationError),
    #[error("departure product does not fit in u64")]
    Overflow,
}

/// Position of every field on a ticket.
///
/// A rule may sit at a position only if every valid ticket, ours included,
/// has an acceptable value there.
pub fn field_positions<'a>(notes: &Notes<'a>) -> Result<BTreeMap<&'a str, usize>, TicketError> {
    let width = notes.mine.len();
    if notes.rules.len() != width {
        return Err(TicketError::FieldCount {
            rules: notes.rules.len(),
            values: width,
        });
    }

    let tickets: Vec<&[u64]> = notes
        .valid_nearby()
        .chain(std::iter::once(notes.mine.as_slice()))
        .collect();
    log::debug!("{} of {} nearby tickets are valid", tickets.len() - 1, notes.nearby.len());

    let candidates: BTreeMap<&str, BTreeSet<usize>> = notes
        .rules
        .iter()
        .map(|rule| {
            let positions = (0..width)
                .filter(|&pos| tickets.iter().all(|ticket| rule.accepts(ticket[pos])))
                .collect();
            (rule.name, positions)
        })
        .collect();

    Ok(eliminate(candidates)?)
}

/// Product of our values in the fields whose name starts with `departure`.
pub fn departure_product(notes: &Notes<'_>) -> Result<u64, TicketError> {
    field_positions(notes)?
        .into_iter()
        .filter(|(name, _)| name.starts_with("departure"))
        .try_fold(1u64, |product, (_, pos)| product.checked_mul(notes.mine[pos]))
        .ok_or(TicketError::Overflow)
}

fn parse_rule(line: &str) -> anyhow::Result<FieldRule<'_>> {
    let caps = RULE
        .captures(line)
        .ok_or_else(|| anyhow!("expected `<name>: <a>-<b> or <c>-<d>`"))?;
    let bound = |group: usize| caps[group].parse::<u64>();
    Ok(FieldRule {
        name: caps.get(1).map_or("", |m| m.as_str()),
        ranges: [bound(2)?..=bound(3)?, bound(4)?..=bound(5)?],
    })
}

fn parse_ticket(line: &str) -> anyhow::Result<Vec<u64>> {
    line.split(',')
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|e| anyhow!("ticket value {value:?}: {e}"))
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Rules,
    Mine,
    Nearby,
}

impl AocParser for Solver {
    type SharedData<'a> = Notes<'a>;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        let mut section = Section::Rules;
        let mut rules: Vec<FieldRule<'a>> = Vec::new();
        let mut mine: Option<Vec<u64>> = None;
        let mut nearby = Vec::new();

        for (i, line) in input.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match (section, line) {
                (Section::Rules, "your ticket:") => section = Section::Mine,
                (Section::Mine, "nearby tickets:") if mine.is_some() => section = Section::Nearby,
                (Section::Mine, "nearby tickets:") => {
                    return Err(ParseError::at_line(i, "nearby tickets before your ticket"));
                }
                (Section::Rules, _) => {
                    let rule = parse_rule(line).map_err(|e| ParseError::at_line(i, e))?;
                    if rules.iter().any(|other| other.name == rule.name) {
                        return Err(ParseError::at_line(i, format!("duplicate field {:?}", rule.name)));
                    }
                    rules.push(rule);
                }
                (Section::Mine, _) if mine.is_some() => {
                    return Err(ParseError::at_line(i, "more than one ticket of your own"));
                }
                (Section::Mine, _) => {
                    mine = Some(parse_ticket(line).map_err(|e| ParseError::at_line(i, e))?);
                }
                (Section::Nearby, _) => {
                    let ticket = parse_ticket(line).map_err(|e| ParseError::at_line(i, e))?;
                    let expected = mine.as_ref().map_or(0, Vec::len);
                    if ticket.len() != expected {
                        return Err(ParseError::at_line(
                            i,
                            format!("ticket has {} values, expected {expected}", ticket.len()),
                        ));
                    }
                    nearby.push(ticket);
                }
            }
        }

        let mine = mine.ok_or_else(|| ParseError::MissingData("your ticket".to_string()))?;
        Ok(Notes {
            rules,
            mine,
            nearby,
        })
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let rate = shared
            .error_rate()
            .ok_or_else(|| SolveError::failed("error rate does not fit in u64"))?;
        Ok(rate.to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(departure_product(shared)
            .map_err(SolveError::failed)?
            .to_string())
    }
}
