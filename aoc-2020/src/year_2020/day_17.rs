//! Day 17: Conway Cubes
//!
//! A sparse cellular automaton in 3 or 4 dimensions, seeded from a 2-D slice.

use aoc_framework::{AocParser, AocSolver, AutoRegisterSolver, ParseError, PartSolver, SolveError};
use itertools::Itertools;
use rustc_hash::FxHashSet;
use std::array;

use crate::utils::bitmap::Bitmap;

const GENERATIONS: usize = 6;

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(day = 17, tags = ["simulation", "core"])]
pub struct Solver;

impl AocParser for Solver {
    /// Active cells of the seed slice as `[x, y]`
    type SharedData<'a> = Vec<[i32; 2]>;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        let mut lines = input
            .lines()
            .enumerate()
            .skip_while(|(_, line)| line.trim().is_empty())
            .peekable();
        let first = lines.peek().map_or(0, |&(i, _)| i);
        let rows: Vec<&str> = lines
            .by_ref()
            .map_while(|(_, line)| Some(line.trim()).filter(|row| !row.is_empty()))
            .collect();
        if let Some((i, _)) = lines.find(|(_, line)| !line.trim().is_empty()) {
            return Err(ParseError::at_line(i, "text after the grid"));
        }

        let seed = Bitmap::parse(rows, first + 1)?;
        seed.iter_set()
            .map(|(x, y)| -> Result<[i32; 2], ParseError> {
                let x = i32::try_from(x).map_err(|e| ParseError::InvalidFormat(e.to_string()))?;
                let y = i32::try_from(y).map_err(|e| ParseError::at_line(first + y, e))?;
                Ok([x, y])
            })
            .collect()
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let end = PocketDimension::<3>::from_plane(shared).simulate(GENERATIONS);
        Ok(end.active_count().to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let end = PocketDimension::<4>::from_plane(shared).simulate(GENERATIONS);
        Ok(end.active_count().to_string())
    }
}

/// One generation of active cells in `D` dimensions.
///
/// Generations are values: [`PocketDimension::step`] reads `self` and builds
/// a new set, so a cell never sees a neighbour from the generation being
/// computed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PocketDimension<const D: usize> {
    active: FxHashSet<[i32; D]>,
}

impl<const D: usize> PocketDimension<D> {
    /// Lift a 2-D slice into `D` dimensions; every axis past `y` is 0.
    pub fn from_plane(cells: &[[i32; 2]]) -> Self {
        let active = cells
            .iter()
            .map(|&[x, y]| {
                array::from_fn(|axis| match axis {
                    0 => x,
                    1 => y,
                    _ => 0,
                })
            })
            .collect();
        Self { active }
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn is_active(&self, cell: &[i32; D]) -> bool {
        self.active.contains(cell)
    }

    /// Inclusive per-axis `(min, max)` over active cells, or `None` when empty.
    pub fn bounds(&self) -> Option<([i32; D], [i32; D])> {
        let mut cells = self.active.iter();
        let first = *cells.next()?;
        Some(cells.fold((first, first), |(mut lo, mut hi), cell| {
            for axis in 0..D {
                lo[axis] = lo[axis].min(cell[axis]);
                hi[axis] = hi[axis].max(cell[axis]);
            }
            (lo, hi)
        }))
    }

    /// Advance one generation.
    ///
    /// Every cell within one unit of the bounding box is visited, since an
    /// inactive neighbour of an active cell may switch on.
    pub fn step(&self) -> Self {
        let Some((lo, hi)) = self.bounds() else {
            return Self::default();
        };
        let offsets = neighbour_offsets::<D>();

        let active = cells_between(lo.map(|c| c - 1), hi.map(|c| c + 1))
            .filter(|cell| {
                // 4 or more is as good as any count past 3
                let neighbours = offsets
                    .iter()
                    .filter(|offset| self.active.contains(&translate(cell, offset)))
                    .take(4)
                    .count();
                matches!(
                    (self.active.contains(cell), neighbours),
                    (true, 2 | 3) | (false, 3)
                )
            })
            .collect();

        Self { active }
    }

    /// Run `generations` steps, returning the final generation.
    pub fn simulate(&self, generations: usize) -> Self {
        let mut current = self.clone();
        for generation in 1..=generations {
            current = current.step();
            log::trace!(
                "{D}-D generation {generation}: {} active",
                current.active_count()
            );
        }
        current
    }
}

fn translate<const D: usize>(cell: &[i32; D], offset: &[i32; D]) -> [i32; D] {
    array::from_fn(|axis| cell[axis] + offset[axis])
}

/// All `3^D - 1` unit offsets, excluding the zero vector.
fn neighbour_offsets<const D: usize>() -> Vec<[i32; D]> {
    cells_between([-1; D], [1; D])
        .filter(|offset| offset.iter().any(|&c| c != 0))
        .collect()
}

/// Every lattice point in the inclusive box `lo..=hi`.
fn cells_between<const D: usize>(lo: [i32; D], hi: [i32; D]) -> impl Iterator<Item = [i32; D]> {
    lo.into_iter()
        .zip(hi)
        .map(|(l, h)| l..=h)
        .multi_cartesian_product()
        .filter_map(|coords| <[i32; D]>::try_from(coords).ok())
}
