//! Day 8: Handheld Halting

use anyhow::{anyhow, bail};
use aoc_framework::{AocParser, AocSolver, AutoRegisterSolver, ParseError, PartSolver, SolveError};
use thiserror::Error;

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(day = 8, tags = ["vm", "search"])]
pub struct Solver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Acc,
    Jmp,
    Nop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub op: Op,
    pub arg: i64,
}

/// How a run ended, with the accumulator at that point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// Control reached the slot just past the last instruction
    Halted(i64),
    /// The next instruction had already run once
    Looped(i64),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VmError {
    #[error("instruction {from} jumps to {target}, outside the program")]
    JumpOutOfRange { from: usize, target: i64 },
    #[error("accumulator overflow at instruction {0}")]
    Overflow(usize),
    #[error("the program halts without repeating an instruction")]
    NeverLoops,
    #[error("no single jmp/nop swap lets the program halt")]
    NoRepair,
}

/// Run until the program halts or an instruction is about to run twice.
pub fn run(program: &[Instruction]) -> Result<Exit, VmError> {
    let mut visited = vec![false; program.len()];
    let mut acc: i64 = 0;
    let mut pc = 0;

    while let Some(&Instruction { op, arg }) = program.get(pc) {
        if std::mem::replace(&mut visited[pc], true) {
            return Ok(Exit::Looped(acc));
        }
        let step = match op {
            Op::Acc => {
                acc = acc.checked_add(arg).ok_or(VmError::Overflow(pc))?;
                1
            }
            Op::Jmp => arg,
            Op::Nop => 1,
        };
        let target = i64::try_from(pc)
            .ok()
            .and_then(|pc| pc.checked_add(step))
            .unwrap_or(i64::MAX);
        pc = usize::try_from(target)
            .ok()
            .filter(|&next| next <= program.len())
            .ok_or(VmError::JumpOutOfRange { from: pc, target })?;
    }
    Ok(Exit::Halted(acc))
}

fn swapped(op: Op) -> Option<Op> {
    match op {
        Op::Jmp => Some(Op::Nop),
        Op::Nop => Some(Op::Jmp),
        Op::Acc => None,
    }
}

/// Accumulator of the first program, in instruction order, that halts
/// after swapping exactly one `jmp` for `nop` or back.
///
/// Variants that loop or jump out of the program are discarded.
pub fn repair(program: &[Instruction]) -> Result<i64, VmError> {
    let mut patched = program.to_vec();
    for (idx, instruction) in program.iter().enumerate() {
        let Some(op) = swapped(instruction.op) else {
            continue;
        };
        patched[idx].op = op;
        match run(&patched) {
            Ok(Exit::Halted(acc)) => {
                log::debug!("swapping instruction {idx} halts the program");
                return Ok(acc);
            }
            Ok(Exit::Looped(_)) | Err(VmError::JumpOutOfRange { .. }) => {}
            Err(err) => return Err(err),
        }
        patched[idx].op = instruction.op;
    }
    Err(VmError::NoRepair)
}

fn parse_instruction(line: &str) -> anyhow::Result<Instruction> {
    let (op, arg) = line
        .split_once(' ')
        .ok_or_else(|| anyhow!("expected `<op> <argument>`"))?;
    let op = match op {
        "acc" => Op::Acc,
        "jmp" => Op::Jmp,
        "nop" => Op::Nop,
        other => bail!("unknown operation {other:?}"),
    };
    let arg = arg
        .trim()
        .parse()
        .map_err(|e| anyhow!("argument {arg:?}: {e}"))?;
    Ok(Instruction { op, arg })
}

impl AocParser for Solver {
    type SharedData<'a> = Vec<Instruction>;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        input
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(i, line)| parse_instruction(line.trim()).map_err(|e| ParseError::at_line(i, e)))
            .collect()
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        match run(shared).map_err(SolveError::failed)? {
            Exit::Looped(acc) => Ok(acc.to_string()),
            Exit::Halted(_) => Err(SolveError::failed(VmError::NeverLoops)),
        }
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(repair(shared).map_err(SolveError::failed)?.to_string())
    }
}
