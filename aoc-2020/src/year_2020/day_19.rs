//! Day 19: Monster Messages
//!
//! Messages are matched against a numbered grammar by expanding a queue of
//! pending rules one byte at a time. Every rule consumes at least one byte,
//! so a queue longer than the unread input can be dropped; that keeps
//! self-referencing rules from looping.

use anyhow::{anyhow, bail};
use aoc_framework::{AocParser, AocSolver, AutoRegisterSolver, ParseError, PartSolver, SolveError};
use thiserror::Error;

pub type RuleId = usize;

/// Largest rule id accepted; the table is dense up to the highest id.
pub const MAX_RULE_ID: RuleId = 9_999;

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(day = 19, tags = ["parsing", "grammar"])]
pub struct Solver;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// Exactly one byte
    Literal(u8),
    /// All sub-rules in order
    Sequence(Vec<RuleId>),
    /// Any one of the sequences
    Alternation(Vec<Vec<RuleId>>),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("rule {0} is not defined")]
    Undefined(RuleId),
    #[error("rule {rule} refers to undefined rule {missing}")]
    DanglingReference { rule: RuleId, missing: RuleId },
}

/// Rules indexed by id; ids need not be contiguous.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    rules: Vec<Option<Rule>>,
}

impl RuleSet {
    pub fn insert(&mut self, id: RuleId, rule: Rule) -> Option<Rule> {
        if id >= self.rules.len() {
            self.rules.resize(id + 1, None);
        }
        self.rules[id].replace(rule)
    }

    pub fn get(&self, id: RuleId) -> Option<&Rule> {
        self.rules.get(id)?.as_ref()
    }

    /// Copy of `self` with the given rules replaced.
    pub fn patched(&self, patches: impl IntoIterator<Item = (RuleId, Rule)>) -> Self {
        let mut out = self.clone();
        for (id, rule) in patches {
            out.insert(id, rule);
        }
        out
    }

    /// Check that `root` and every rule reference resolve.
    pub fn validate(&self, root: RuleId) -> Result<(), GrammarError> {
        if self.get(root).is_none() {
            return Err(GrammarError::Undefined(root));
        }
        for (rule, slot) in self.rules.iter().enumerate() {
            let mut refs: Box<dyn Iterator<Item = &RuleId>> = match slot {
                None | Some(Rule::Literal(_)) => continue,
                Some(Rule::Sequence(seq)) => Box::new(seq.iter()),
                Some(Rule::Alternation(alts)) => Box::new(alts.iter().flatten()),
            };
            if let Some(&missing) = refs.find(|&&id| self.get(id).is_none()) {
                return Err(GrammarError::DanglingReference { rule, missing });
            }
        }
        Ok(())
    }

    /// Whether the whole of `message` derives from `root`.
    pub fn matches(&self, root: RuleId, message: &str) -> bool {
        self.matches_all(message.as_bytes(), &[root], 0)
    }

    /// `unit_steps` counts consecutive expansions that neither consume input
    /// nor grow the queue; more of those than there are rules means a
    /// `a: b`, `b: a` style cycle with nothing left to gain.
    fn matches_all(&self, rest: &[u8], pending: &[RuleId], unit_steps: usize) -> bool {
        let Some((&id, tail)) = pending.split_first() else {
            return rest.is_empty();
        };
        if pending.len() > rest.len() || unit_steps > self.rules.len() {
            return false;
        }

        let expand = |body: &[RuleId]| {
            let steps = if body.len() == 1 { unit_steps + 1 } else { 0 };
            !body.is_empty() && self.matches_all(rest, &[body, tail].concat(), steps)
        };

        match self.get(id) {
            Some(Rule::Literal(byte)) => {
                rest.first() == Some(byte) && self.matches_all(&rest[1..], tail, 0)
            }
            Some(Rule::Sequence(seq)) => expand(seq),
            Some(Rule::Alternation(alts)) => alts.iter().any(|alt| expand(alt)),
            None => false,
        }
    }
}

#[derive(Debug)]
pub struct SharedData {
    rules: RuleSet,
    messages: Vec<String>,
}

fn parse_id(text: &str) -> anyhow::Result<RuleId> {
    let id: RuleId = text.trim().parse().map_err(|e| anyhow!("rule id {text:?}: {e}"))?;
    if id > MAX_RULE_ID {
        bail!("rule id {id} is above {MAX_RULE_ID}");
    }
    Ok(id)
}

fn parse_ids(text: &str) -> anyhow::Result<Vec<RuleId>> {
    let ids = text
        .split_whitespace()
        .map(parse_id)
        .collect::<anyhow::Result<Vec<RuleId>>>()?;
    if ids.is_empty() {
        bail!("empty alternative");
    }
    Ok(ids)
}

fn parse_rule(line: &str) -> anyhow::Result<(RuleId, Rule)> {
    let (id, body) = line
        .split_once(':')
        .ok_or_else(|| anyhow!("expected `<id>: <body>`"))?;
    let id = parse_id(id)?;
    let body = body.trim();

    let rule = if let Some(quoted) = body.strip_prefix('"') {
        match quoted.strip_suffix('"').map(str::as_bytes) {
            Some(&[byte]) => Rule::Literal(byte),
            _ => bail!("literal must be a single quoted character"),
        }
    } else if body.contains('|') {
        Rule::Alternation(body.split('|').map(parse_ids).collect::<anyhow::Result<_>>()?)
    } else {
        Rule::Sequence(parse_ids(body)?)
    };
    Ok((id, rule))
}

impl AocParser for Solver {
    type SharedData<'a> = SharedData;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        let mut rules = RuleSet::default();
        let mut lines = input.lines().enumerate();

        for (i, line) in lines.by_ref() {
            let line = line.trim();
            if line.is_empty() {
                break;
            }
            let (id, rule) = parse_rule(line).map_err(|e| ParseError::at_line(i, e))?;
            if rules.insert(id, rule).is_some() {
                return Err(ParseError::at_line(i, format!("rule {id} defined twice")));
            }
        }

        let messages: Vec<String> = lines
            .map(|(_, line)| line.trim())
            .filter(|line| !line.is_empty())
            .map(str::to_owned)
            .collect();

        if rules == RuleSet::default() && messages.is_empty() {
            return Ok(SharedData { rules, messages });
        }
        rules.validate(0).map_err(|e| match e {
            GrammarError::Undefined(_) => ParseError::MissingData(e.to_string()),
            GrammarError::DanglingReference { .. } => ParseError::InvalidFormat(e.to_string()),
        })?;
        log::debug!("{} rule slots, {} messages", rules.rules.len(), messages.len());
        Ok(SharedData { rules, messages })
    }
}

fn count_matches(rules: &RuleSet, messages: &[String]) -> usize {
    messages.iter().filter(|m| rules.matches(0, m)).count()
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(count_matches(&shared.rules, &shared.messages).to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        if shared.messages.is_empty() {
            return Ok("0".to_string());
        }
        let looped = shared.rules.patched([
            (8, Rule::Alternation(vec![vec![42], vec![42, 8]])),
            (11, Rule::Alternation(vec![vec![42, 31], vec![42, 11, 31]])),
        ]);
        looped.validate(0).map_err(SolveError::failed)?;
        Ok(count_matches(&looped, &shared.messages).to_string())
    }
}
