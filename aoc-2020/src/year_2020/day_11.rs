//! Day 11: Seating System
//!
//! Seats fill and empty in lockstep until the floor plan stops changing.

use aoc_framework::{AocParser, AocSolver, AutoRegisterSolver, ParseError, PartSolver, SolveError};
use rustc_hash::FxHashSet;
use thiserror::Error;

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(day = 11, tags = ["simulation", "grid"])]
pub struct Solver;

/// `(row, col)` steps to the 8 surrounding tiles.
const DIRECTIONS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Floor,
    Empty,
    Occupied,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatMap {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
}

impl SeatMap {
    /// Row-major index of `(row, col)` when it lies on the map.
    fn position(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.height && col < self.width).then(|| row * self.width + col)
    }
}

impl AocParser for Solver {
    type SharedData<'a> = SeatMap;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        let mut width = None;
        let mut height = 0;
        let mut tiles = Vec::new();

        for (i, line) in input.lines().enumerate() {
            let row = line.trim();
            if row.is_empty() {
                continue;
            }
            match width {
                None => width = Some(row.len()),
                Some(w) if w != row.len() => {
                    return Err(ParseError::at_line(
                        i,
                        format!("row has {} tiles, expected {w}", row.len()),
                    ));
                }
                Some(_) => {}
            }
            for c in row.chars() {
                tiles.push(match c {
                    '.' => Tile::Floor,
                    'L' => Tile::Empty,
                    '#' => Tile::Occupied,
                    other => return Err(ParseError::at_line(i, format!("unknown tile {other:?}"))),
                });
            }
            height += 1;
        }

        Ok(SeatMap {
            width: width.unwrap_or(0),
            height,
            tiles,
        })
    }
}

/// Which seats a seat pays attention to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Neighbourhood {
    /// The up to 8 touching tiles
    Adjacent,
    /// The first seat in each of the 8 directions, looking past floor
    LineOfSight,
}

impl Neighbourhood {
    /// Occupied neighbours at which a seated passenger leaves.
    pub fn tolerance(self) -> usize {
        match self {
            Neighbourhood::Adjacent => 4,
            Neighbourhood::LineOfSight => 5,
        }
    }
}

/// The seats of a map and who watches whom, fixed for a whole simulation.
#[derive(Debug, Clone)]
pub struct Seating {
    /// Tile position of each seat
    seats: Vec<usize>,
    /// Seat indices each seat watches
    neighbours: Vec<Vec<usize>>,
    tolerance: usize,
}

impl Seating {
    pub fn new(map: &SeatMap, rule: Neighbourhood) -> Self {
        let mut index = vec![None; map.tiles.len()];
        let mut seats = Vec::new();
        for (pos, tile) in map.tiles.iter().enumerate() {
            if *tile != Tile::Floor {
                index[pos] = Some(seats.len());
                seats.push(pos);
            }
        }

        let neighbours = seats
            .iter()
            .map(|&pos| {
                let (row, col) = (pos / map.width, pos % map.width);
                DIRECTIONS
                    .iter()
                    .filter_map(|&(dr, dc)| look(map, &index, rule, (row, col), (dr, dc)))
                    .collect()
            })
            .collect();

        Self {
            seats,
            neighbours,
            tolerance: rule.tolerance(),
        }
    }

    pub fn with_tolerance(self, tolerance: usize) -> Self {
        Self { tolerance, ..self }
    }

    pub fn seat_count(&self) -> usize {
        self.seats.len()
    }

    /// Seat index of the tile at `(row, col)`, if it is a seat.
    pub fn seat_at(&self, map: &SeatMap, row: usize, col: usize) -> Option<usize> {
        let pos = map.position(row, col)?;
        self.seats.binary_search(&pos).ok()
    }

    pub fn neighbours(&self, seat: usize) -> &[usize] {
        &self.neighbours[seat]
    }
}

/// First seat seen from `from` walking in `step`.
fn look(
    map: &SeatMap,
    index: &[Option<usize>],
    rule: Neighbourhood,
    from: (usize, usize),
    step: (isize, isize),
) -> Option<usize> {
    let (mut row, mut col) = from;
    loop {
        row = row.checked_add_signed(step.0)?;
        col = col.checked_add_signed(step.1)?;
        match index[map.position(row, col)?] {
            Some(seat) => return Some(seat),
            None if rule == Neighbourhood::Adjacent => return None,
            None => {}
        }
    }
}

/// Which seats are taken in one round.
///
/// Rounds are values: [`Occupancy::step`] reads `self` and builds the next
/// round, so every seat decides on the same snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Occupancy {
    occupied: Vec<bool>,
}

impl Occupancy {
    /// The taken seats drawn on the map, in [`Seating`] order.
    pub fn from_map(map: &SeatMap) -> Self {
        let occupied = map
            .tiles
            .iter()
            .filter(|tile| **tile != Tile::Floor)
            .map(|tile| *tile == Tile::Occupied)
            .collect();
        Self { occupied }
    }

    pub fn occupied_count(&self) -> usize {
        self.occupied.iter().filter(|taken| **taken).count()
    }

    pub fn occupied_neighbours(&self, seating: &Seating, seat: usize) -> usize {
        seating
            .neighbours(seat)
            .iter()
            .filter(|&&other| self.occupied[other])
            .count()
    }

    /// Advance one round.
    pub fn step(&self, seating: &Seating) -> Self {
        let occupied = self
            .occupied
            .iter()
            .enumerate()
            .map(|(seat, &taken)| {
                let around = self.occupied_neighbours(seating, seat);
                if taken {
                    around < seating.tolerance
                } else {
                    around == 0
                }
            })
            .collect();
        Self { occupied }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeatingError {
    #[error("seating repeats an earlier round after {0} rounds without settling")]
    Oscillates(usize),
}

/// Step from `start` until a round leaves every seat unchanged.
pub fn settle(seating: &Seating, start: Occupancy) -> Result<Occupancy, SeatingError> {
    let mut seen = FxHashSet::default();
    let mut current = start;
    for round in 1.. {
        let next = current.step(seating);
        if next == current {
            log::debug!(
                "settled after {} rounds with {} seats taken",
                round - 1,
                current.occupied_count()
            );
            break;
        }
        if !seen.insert(current) {
            return Err(SeatingError::Oscillates(round));
        }
        current = next;
    }
    Ok(current)
}

fn settled_count(map: &SeatMap, rule: Neighbourhood) -> Result<String, SolveError> {
    let seating = Seating::new(map, rule);
    let end = settle(&seating, Occupancy::from_map(map)).map_err(SolveError::failed)?;
    Ok(end.occupied_count().to_string())
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        settled_count(shared, Neighbourhood::Adjacent)
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        settled_count(shared, Neighbourhood::LineOfSight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: &str = "\
L.LL.LL.LL
LLLLLLL.LL
L.L.L..L..
LLLL.LL.LL
L.LL.LL.LL
L.LLLLL.LL
..L.L.....
LLLLLLLLLL
L.LLLLLL.L
L.LLLLL.LL
";

    fn map(input: &str) -> SeatMap {
        <Solver as AocParser>::parse(input).unwrap()
    }

    #[test]
    fn test_example() {
        let mut shared = map(EXAMPLE);
        assert_eq!(<Solver as PartSolver<1>>::solve(&mut shared).unwrap(), "37");
        assert_eq!(<Solver as PartSolver<2>>::solve(&mut shared).unwrap(), "26");
    }

    #[test]
    fn test_first_round_fills_every_seat() {
        let map = map(EXAMPLE);
        let seating = Seating::new(&map, Neighbourhood::Adjacent);
        assert_eq!(seating.seat_count(), 71);

        let start = Occupancy::from_map(&map);
        assert_eq!(start.occupied_count(), 0);
        let first = start.step(&seating);
        assert_eq!(first.occupied_count(), 71);
        // the starting round is untouched
        assert_eq!(start.occupied_count(), 0);
    }

    #[test]
    fn test_line_of_sight_sees_eight() {
        let map = map(
            ".......#.\n...#.....\n.#.......\n.........\n..#L....#\n\
             ....#....\n.........\n#........\n...#.....",
        );
        let seating = Seating::new(&map, Neighbourhood::LineOfSight);
        let seat = seating.seat_at(&map, 4, 3).unwrap();
        let occupancy = Occupancy::from_map(&map);
        assert_eq!(occupancy.occupied_neighbours(&seating, seat), 8);

        let adjacent = Seating::new(&map, Neighbourhood::Adjacent);
        let seat = adjacent.seat_at(&map, 4, 3).unwrap();
        assert_eq!(occupancy.occupied_neighbours(&adjacent, seat), 2);
    }

    #[test]
    fn test_line_of_sight_stops_at_first_seat() {
        let map = map(".L.L.#.#.#.#.");
        let seating = Seating::new(&map, Neighbourhood::LineOfSight);
        let seat = seating.seat_at(&map, 0, 1).unwrap();
        assert_eq!(seating.neighbours(seat), &[1]);
        assert_eq!(Occupancy::from_map(&map).occupied_neighbours(&seating, seat), 0);
    }

    #[test]
    fn test_line_of_sight_sees_nothing_taken() {
        let map = map(".##.##.\n#.#.#.#\n##...##\n...L...\n##...##\n#.#.#.#\n.##.##.");
        let seating = Seating::new(&map, Neighbourhood::LineOfSight);
        let seat = seating.seat_at(&map, 3, 3).unwrap();
        assert!(seating.neighbours(seat).is_empty());
    }

    #[test]
    fn test_floor_is_not_a_seat() {
        let map = map("L.\n.#");
        let seating = Seating::new(&map, Neighbourhood::Adjacent);
        assert_eq!(seating.seat_at(&map, 0, 1), None);
        assert_eq!(seating.seat_at(&map, 1, 1), Some(1));
        assert_eq!(seating.seat_at(&map, 2, 0), None);
    }

    #[test]
    fn test_oscillation_is_an_error() {
        // two neighbours that leave as soon as the other sits down
        let map = map("LL");
        let seating = Seating::new(&map, Neighbourhood::Adjacent).with_tolerance(1);
        assert_eq!(
            settle(&seating, Occupancy::from_map(&map)),
            Err(SeatingError::Oscillates(3))
        );
    }

    #[test]
    fn test_empty_input() {
        let mut shared = map("");
        assert_eq!(<Solver as PartSolver<1>>::solve(&mut shared).unwrap(), "0");
        assert_eq!(<Solver as PartSolver<2>>::solve(&mut shared).unwrap(), "0");
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            <Solver as AocParser>::parse("L.L\nL.\n"),
            Err(ParseError::InvalidLine { line: 2, .. })
        ));
        assert!(matches!(
            <Solver as AocParser>::parse("\nL.L\nLxL\n"),
            Err(ParseError::InvalidLine { line: 3, .. })
        ));
    }
}
