//! Day 18: Operation Order
//!
//! Arithmetic over `+`, `*` and parentheses with non-standard precedence,
//! evaluated with a value stack and an operator stack.

use anyhow::{anyhow, bail};
use aoc_framework::{AocParser, AocSolver, AutoRegisterSolver, ParseError, PartSolver, SolveError};
use thiserror::Error;

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(day = 18, tags = ["parsing", "core"])]
pub struct Solver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    Number(u64),
    Add,
    Mul,
    Open,
    Close,
}

/// Which operators bind tighter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precedence {
    /// `+` and `*` bind equally, evaluated left to right
    Uniform,
    /// `+` binds tighter than `*`
    AdditionFirst,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("operator is missing an operand")]
    MissingOperand,
    #[error("operands without an operator between them")]
    MissingOperator,
    #[error("unmatched closing parenthesis")]
    UnmatchedClose,
    #[error("unclosed parenthesis")]
    UnclosedOpen,
    #[error("empty expression")]
    Empty,
    #[error("arithmetic overflow")]
    Overflow,
}

/// Split a line into tokens; whitespace is ignored and digit runs form one number.
pub fn tokenize(line: &str) -> anyhow::Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = line.char_indices().peekable();

    while let Some((start, ch)) = chars.next() {
        let token = match ch {
            ' ' | '\t' => continue,
            '+' => Token::Add,
            '*' => Token::Mul,
            '(' => Token::Open,
            ')' => Token::Close,
            '0'..='9' => {
                let mut end = start + 1;
                while let Some(&(i, '0'..='9')) = chars.peek() {
                    end = i + 1;
                    chars.next();
                }
                let digits = &line[start..end];
                Token::Number(
                    digits
                        .parse()
                        .map_err(|e| anyhow!("number {digits:?}: {e}"))?,
                )
            }
            other => bail!("unexpected character {other:?} at column {}", start + 1),
        };
        tokens.push(token);
    }
    Ok(tokens)
}

/// Check that tokens alternate between operands and operators with
/// balanced parentheses.
fn check_grammar(tokens: &[Token]) -> anyhow::Result<()> {
    let mut depth = 0usize;
    let mut expect_operand = true;

    for (i, token) in tokens.iter().enumerate() {
        match (token, expect_operand) {
            (Token::Number(_), true) => expect_operand = false,
            (Token::Open, true) => depth += 1,
            (Token::Add | Token::Mul, false) => expect_operand = true,
            (Token::Close, false) => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| anyhow!("unmatched ')' at token {}", i + 1))?;
            }
            (_, true) => bail!("expected a number or '(' at token {}", i + 1),
            (_, false) => bail!("expected an operator or ')' at token {}", i + 1),
        }
    }

    if tokens.is_empty() || expect_operand {
        bail!("expression ends without an operand");
    }
    if depth > 0 {
        bail!("{depth} unclosed '('");
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Add,
    Mul,
    Open,
}

struct Evaluator {
    precedence: Precedence,
    values: Vec<u64>,
    ops: Vec<Op>,
}

impl Evaluator {
    fn apply(&mut self, op: Op) -> Result<(), EvalError> {
        let (Some(rhs), Some(lhs)) = (self.values.pop(), self.values.pop()) else {
            return Err(EvalError::MissingOperand);
        };
        let value = match op {
            Op::Add => lhs.checked_add(rhs),
            Op::Mul => lhs.checked_mul(rhs),
            Op::Open => return Err(EvalError::UnclosedOpen),
        };
        self.values.push(value.ok_or(EvalError::Overflow)?);
        Ok(())
    }

    /// Apply pending operators down to the nearest `(`.
    ///
    /// Under [`Precedence::AdditionFirst`] a pending `*` waits unless the
    /// reduction is forced by `)` or the end of input.
    fn reduce(&mut self, forced: bool) -> Result<(), EvalError> {
        while let Some(&op) = self.ops.last() {
            match op {
                Op::Open => break,
                Op::Mul if self.precedence == Precedence::AdditionFirst && !forced => break,
                _ => {}
            }
            self.ops.pop();
            self.apply(op)?;
        }
        Ok(())
    }
}

pub fn evaluate(tokens: &[Token], precedence: Precedence) -> Result<u64, EvalError> {
    let mut eval = Evaluator {
        precedence,
        values: Vec::new(),
        ops: Vec::new(),
    };

    for &token in tokens {
        match token {
            Token::Number(n) => {
                eval.values.push(n);
                eval.reduce(false)?;
            }
            Token::Add => eval.ops.push(Op::Add),
            Token::Mul => eval.ops.push(Op::Mul),
            Token::Open => eval.ops.push(Op::Open),
            Token::Close => {
                eval.reduce(true)?;
                if eval.ops.pop() != Some(Op::Open) {
                    return Err(EvalError::UnmatchedClose);
                }
                // the group is now an operand of whatever precedes it
                eval.reduce(false)?;
            }
        }
    }

    eval.reduce(true)?;
    if !eval.ops.is_empty() {
        return Err(EvalError::UnclosedOpen);
    }
    match eval.values.as_slice() {
        [] => Err(EvalError::Empty),
        [value] => Ok(*value),
        _ => Err(EvalError::MissingOperator),
    }
}

impl AocParser for Solver {
    type SharedData<'a> = Vec<Vec<Token>>;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        input
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(i, line)| {
                tokenize(line)
                    .and_then(|tokens| check_grammar(&tokens).map(|_| tokens))
                    .map_err(|e| ParseError::at_line(i, e))
            })
            .collect()
    }
}

fn sum_with(expressions: &[Vec<Token>], precedence: Precedence) -> Result<String, SolveError> {
    expressions
        .iter()
        .try_fold(0u64, |total, tokens| {
            let value = evaluate(tokens, precedence)?;
            total.checked_add(value).ok_or(EvalError::Overflow)
        })
        .map(|total| total.to_string())
        .map_err(SolveError::failed)
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        sum_with(shared, Precedence::Uniform)
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        sum_with(shared, Precedence::AdditionFirst)
    }
}
