//! Day 24: Lobby Layout
//!
//! Hex tiles use axial coordinates `[q, r]`: east is `+q`, south-east is `+r`.

use anyhow::bail;
use aoc_framework::{AocParser, AocSolver, AutoRegisterSolver, ParseError, PartSolver, SolveError};
use rustc_hash::FxHashSet;

const DAYS: usize = 100;

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(day = 24, tags = ["simulation", "hex"])]
pub struct Solver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HexDir {
    E,
    W,
    NE,
    NW,
    SE,
    SW,
}

impl HexDir {
    pub const ALL: [HexDir; 6] = [
        HexDir::E,
        HexDir::W,
        HexDir::NE,
        HexDir::NW,
        HexDir::SE,
        HexDir::SW,
    ];

    pub fn offset(self) -> [i32; 2] {
        match self {
            HexDir::E => [1, 0],
            HexDir::W => [-1, 0],
            HexDir::NE => [1, -1],
            HexDir::NW => [0, -1],
            HexDir::SE => [0, 1],
            HexDir::SW => [-1, 1],
        }
    }
}

fn neighbour(tile: [i32; 2], dir: HexDir) -> [i32; 2] {
    let [dq, dr] = dir.offset();
    [tile[0] + dq, tile[1] + dr]
}

/// Split a run of `e`, `w`, `ne`, `nw`, `se`, `sw` with no separators.
fn parse_path(line: &str) -> anyhow::Result<Vec<HexDir>> {
    let mut path = Vec::new();
    let mut chars = line.chars();
    while let Some(c) = chars.next() {
        let dir = match c {
            'e' => HexDir::E,
            'w' => HexDir::W,
            'n' | 's' => match (c, chars.next()) {
                ('n', Some('e')) => HexDir::NE,
                ('n', Some('w')) => HexDir::NW,
                ('s', Some('e')) => HexDir::SE,
                ('s', Some('w')) => HexDir::SW,
                (_, next) => bail!("`{c}` must be followed by `e` or `w`, found {next:?}"),
            },
            other => bail!("unknown direction {other:?}"),
        };
        path.push(dir);
    }
    Ok(path)
}

impl AocParser for Solver {
    /// One walk from the reference tile per line
    type SharedData<'a> = Vec<Vec<HexDir>>;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        input
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(i, line)| parse_path(line.trim()).map_err(|e| ParseError::at_line(i, e)))
            .collect()
    }
}

/// One day's black tiles.
///
/// Days are values: [`HexFloor::step`] reads `self` and builds the next day,
/// so every tile flips against the same snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HexFloor {
    black: FxHashSet<[i32; 2]>,
}

impl HexFloor {
    /// Flip the tile at the end of each walk; walks ending on the same tile
    /// cancel out.
    pub fn from_paths(paths: &[Vec<HexDir>]) -> Self {
        let mut black = FxHashSet::default();
        for path in paths {
            let tile = path.iter().fold([0, 0], |tile, &dir| neighbour(tile, dir));
            if !black.insert(tile) {
                black.remove(&tile);
            }
        }
        Self { black }
    }

    pub fn black_count(&self) -> usize {
        self.black.len()
    }

    pub fn is_black(&self, tile: &[i32; 2]) -> bool {
        self.black.contains(tile)
    }

    /// Inclusive `(min, max)` of each axial coordinate, or `None` when all
    /// tiles are white.
    pub fn bounds(&self) -> Option<([i32; 2], [i32; 2])> {
        let mut tiles = self.black.iter();
        let first = *tiles.next()?;
        Some(tiles.fold((first, first), |(lo, hi), tile| {
            (
                [lo[0].min(tile[0]), lo[1].min(tile[1])],
                [hi[0].max(tile[0]), hi[1].max(tile[1])],
            )
        }))
    }

    fn black_neighbours(&self, tile: [i32; 2]) -> usize {
        HexDir::ALL
            .into_iter()
            .filter(|&dir| self.black.contains(&neighbour(tile, dir)))
            .count()
    }

    /// Advance one day.
    ///
    /// A white tile can only turn black next to a black one, so the bounding
    /// box grown by one covers every tile that may change.
    pub fn step(&self) -> Self {
        let Some((lo, hi)) = self.bounds() else {
            return Self::default();
        };

        let black = (lo[0] - 1..=hi[0] + 1)
            .flat_map(|q| (lo[1] - 1..=hi[1] + 1).map(move |r| [q, r]))
            .filter(|&tile| {
                matches!(
                    (self.is_black(&tile), self.black_neighbours(tile)),
                    (true, 1 | 2) | (false, 2)
                )
            })
            .collect();

        Self { black }
    }

    /// Run `days` steps, returning the final floor.
    pub fn simulate(&self, days: usize) -> Self {
        let mut current = self.clone();
        for day in 1..=days {
            current = current.step();
            log::trace!("day {day}: {} black", current.black_count());
        }
        current
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(HexFloor::from_paths(shared).black_count().to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let end = HexFloor::from_paths(shared).simulate(DAYS);
        Ok(end.black_count().to_string())
    }
}
