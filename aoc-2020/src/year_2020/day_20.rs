//! Day 20: Jurassic Jigsaw
//!
//! Tiles are matched by their edge patterns, laid out corner-first, stripped
//! of their borders and stitched into one image that is then scanned for sea
//! monsters.

use aoc_framework::{AocParser, AocSolver, AutoRegisterSolver, ParseError, PartSolver, SolveError};
use itertools::Itertools;
use rustc_hash::{FxHashMap, FxHashSet};
use thiserror::Error;

use crate::utils::bitmap::Bitmap;

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(day = 20, tags = ["grid", "search"])]
pub struct Solver;

/// Edges are stored as `u32` bitmasks, which caps the tile size.
const MAX_TILE: usize = 32;
const MIN_TILE: usize = 3;

const SEA_MONSTER: [&str; 3] = [
    "                  # ",
    "#    ##    ##    ###",
    " #  #  #  #  #  #   ",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    pub id: u64,
    pub image: Bitmap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];
}

/// Cells along one side as bits; bit `i` is the `i`-th cell reading
/// left to right or top to bottom.
pub fn edge(image: &Bitmap, side: Side) -> u32 {
    let (w, h) = (image.width(), image.height());
    let len = match side {
        Side::Top | Side::Bottom => w,
        Side::Left | Side::Right => h,
    };
    (0..len)
        .filter(|&i| match side {
            Side::Top => image.get(i, 0),
            Side::Bottom => image.get(i, h - 1),
            Side::Left => image.get(0, i),
            Side::Right => image.get(w - 1, i),
        })
        .fold(0, |bits, i| bits | 1 << i)
}

fn reverse_edge(bits: u32, len: usize) -> u32 {
    bits.reverse_bits() >> (32 - len)
}

/// The same value for an edge and its mirror image.
pub fn canonical_edge(bits: u32, len: usize) -> u32 {
    bits.min(reverse_edge(bits, len))
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JigsawError {
    #[error("{0} tiles do not form a square")]
    NotSquare(usize),
    #[error("expected 4 corner tiles, found {0}")]
    CornerCount(usize),
    #[error("corner tile {0} has no orientation with open top and left edges")]
    CornerOrientation(u64),
    #[error("no tile fits at row {row}, column {col}")]
    NoMatch { row: usize, col: usize },
    #[error("tile at row {row}, column {col} does not fit the tile above")]
    Mismatch { row: usize, col: usize },
}

/// Edge index over a set of equally sized tiles.
pub struct Jigsaw<'t> {
    tiles: &'t [Tile],
    edge_len: usize,
    owners: FxHashMap<u32, Vec<usize>>,
}

impl<'t> Jigsaw<'t> {
    pub fn new(tiles: &'t [Tile]) -> Self {
        let edge_len = tiles.first().map_or(0, |t| t.image.width());
        let mut owners: FxHashMap<u32, Vec<usize>> = FxHashMap::default();
        for (idx, tile) in tiles.iter().enumerate() {
            for side in Side::ALL {
                owners
                    .entry(canonical_edge(edge(&tile.image, side), edge_len))
                    .or_default()
                    .push(idx);
            }
        }
        Self {
            tiles,
            edge_len,
            owners,
        }
    }

    /// An edge no other tile shares, so it lies on the outer border.
    fn is_unique(&self, bits: u32) -> bool {
        self.owners
            .get(&canonical_edge(bits, self.edge_len))
            .is_some_and(|owners| owners.len() == 1)
    }

    pub fn unique_edges(&self, idx: usize) -> usize {
        Side::ALL
            .into_iter()
            .filter(|&side| self.is_unique(edge(&self.tiles[idx].image, side)))
            .count()
    }

    /// Indices of tiles with exactly two unshared edges.
    pub fn corners(&self) -> Vec<usize> {
        (0..self.tiles.len())
            .filter(|&idx| self.unique_edges(idx) == 2)
            .collect()
    }

    /// Lay out every tile, returning the oriented tiles row by row.
    ///
    /// The first corner is turned so its unshared edges face up and left.
    /// Each further tile is found through the edge index and turned until
    /// its left edge (or, in the first column, its top edge) equals the
    /// neighbour's facing edge exactly.
    pub fn assemble(&self) -> Result<Vec<Vec<Bitmap>>, JigsawError> {
        let count = self.tiles.len();
        let side = count.isqrt();
        if count == 0 || side * side != count {
            return Err(JigsawError::NotSquare(count));
        }

        let corners = self.corners();
        let &first = corners
            .first()
            .ok_or(JigsawError::CornerCount(corners.len()))?;
        let start = self.tiles[first]
            .image
            .symmetries()
            .find(|img| self.is_unique(edge(img, Side::Top)) && self.is_unique(edge(img, Side::Left)))
            .ok_or(JigsawError::CornerOrientation(self.tiles[first].id))?;

        let mut used = vec![false; count];
        used[first] = true;
        let mut grid: Vec<Vec<Bitmap>> = Vec::with_capacity(side);
        let mut start = Some(start);

        for row in 0..side {
            let mut line: Vec<Bitmap> = Vec::with_capacity(side);
            for col in 0..side {
                if let Some(corner) = start.take() {
                    line.push(corner);
                    continue;
                }

                let (want, facing) = match line.last() {
                    Some(left) => (edge(left, Side::Right), Side::Left),
                    None => (edge(&grid[row - 1][0], Side::Bottom), Side::Top),
                };
                let (idx, image) = self
                    .owners
                    .get(&canonical_edge(want, self.edge_len))
                    .into_iter()
                    .flatten()
                    .filter(|&&idx| !used[idx])
                    .find_map(|&idx| {
                        self.tiles[idx]
                            .image
                            .symmetries()
                            .find(|img| edge(img, facing) == want)
                            .map(|img| (idx, img))
                    })
                    .ok_or(JigsawError::NoMatch { row, col })?;

                if row > 0 && col > 0 && edge(&image, Side::Top) != edge(&grid[row - 1][col], Side::Bottom) {
                    return Err(JigsawError::Mismatch { row, col });
                }
                used[idx] = true;
                line.push(image);
            }
            grid.push(line);
        }

        log::debug!("assembled {side}x{side} tiles");
        Ok(grid)
    }
}

/// Drop each tile's border and join the interiors into one image.
pub fn stitch(grid: &[Vec<Bitmap>]) -> Bitmap {
    let tile = grid.first().and_then(|row| row.first()).map_or(0, Bitmap::width);
    let inner = tile.saturating_sub(2);
    let mut image = Bitmap::new(grid.len() * inner, grid.len() * inner);
    for (row, line) in grid.iter().enumerate() {
        for (col, piece) in line.iter().enumerate() {
            image.blit(&piece.crop(1, 1, inner, inner), col * inner, row * inner);
        }
    }
    image
}

fn monster_cells() -> Vec<(usize, usize)> {
    SEA_MONSTER
        .iter()
        .enumerate()
        .flat_map(|(y, row)| {
            row.bytes()
                .enumerate()
                .filter(|&(_, b)| b == b'#')
                .map(move |(x, _)| (x, y))
        })
        .collect()
}

/// Monster placements in this orientation; every offset where the whole
/// pattern fits is tried.
pub fn count_monsters(image: &Bitmap) -> usize {
    let cells = monster_cells();
    let (w, h) = (SEA_MONSTER[0].len(), SEA_MONSTER.len());
    let (Some(max_x), Some(max_y)) = (image.width().checked_sub(w), image.height().checked_sub(h)) else {
        return 0;
    };
    (0..=max_y)
        .cartesian_product(0..=max_x)
        .filter(|&(y, x)| cells.iter().all(|&(dx, dy)| image.get(x + dx, y + dy)))
        .count()
}

/// Set cells left over after removing every monster, using the first
/// orientation in which any monster appears.
pub fn water_roughness(image: &Bitmap) -> usize {
    let monsters = image
        .symmetries()
        .map(|oriented| count_monsters(&oriented))
        .find(|&count| count > 0)
        .unwrap_or(0);
    log::debug!("{monsters} sea monsters");
    image
        .count_set()
        .saturating_sub(monsters * monster_cells().len())
}

impl AocParser for Solver {
    type SharedData<'a> = Vec<Tile>;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError> {
        let mut tiles: Vec<Tile> = Vec::new();
        let mut ids = FxHashSet::default();
        let mut lines = input.lines().enumerate().peekable();

        loop {
            while lines.next_if(|(_, line)| line.trim().is_empty()).is_some() {}
            let Some((i, header)) = lines.next() else {
                break;
            };

            let id: u64 = header
                .trim()
                .strip_prefix("Tile ")
                .and_then(|rest| rest.strip_suffix(':'))
                .ok_or_else(|| ParseError::at_line(i, "expected `Tile <id>:`"))?
                .parse()
                .map_err(|e| ParseError::at_line(i, format!("tile id: {e}")))?;
            if !ids.insert(id) {
                return Err(ParseError::at_line(i, format!("tile {id} appears twice")));
            }

            let mut rows = Vec::new();
            while let Some((_, row)) = lines.next_if(|(_, line)| !line.trim().is_empty()) {
                rows.push(row);
            }
            let image = Bitmap::parse(rows, i + 2)?;

            if image.width() != image.height() {
                return Err(ParseError::at_line(i, format!("tile {id} is not square")));
            }
            if !(MIN_TILE..=MAX_TILE).contains(&image.width()) {
                return Err(ParseError::at_line(
                    i,
                    format!("tile side must be {MIN_TILE}..={MAX_TILE}, got {}", image.width()),
                ));
            }
            if let Some(first) = tiles.first()
                && first.image.width() != image.width()
            {
                return Err(ParseError::at_line(i, format!("tile {id} differs in size")));
            }
            tiles.push(Tile { id, image });
        }

        Ok(tiles)
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let jigsaw = Jigsaw::new(shared);
        let corners = jigsaw.corners();
        if corners.len() != 4 {
            return Err(SolveError::failed(JigsawError::CornerCount(corners.len())));
        }
        let product: u64 = corners.iter().map(|&idx| shared[idx].id).product();
        Ok(product.to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let grid = Jigsaw::new(shared).assemble().map_err(SolveError::failed)?;
        Ok(water_roughness(&stitch(&grid)).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TILE: usize = 10;
    const GRID: usize = 3;
    const STEP: usize = TILE - 1;
    const BIG: usize = STEP * GRID + 1;
    const INNER: usize = TILE - 2;

    fn on_border(c: usize) -> bool {
        c % STEP == 0
    }

    /// A 28x28 picture cut along every 9th row and column into 3x3
    /// overlapping tiles. Each border segment gets its own code with the
    /// last bit set and the first clear, so no segment equals another or
    /// its own reverse.
    fn source() -> Bitmap {
        let mut img = Bitmap::new(BIG, BIG);
        for y in 0..BIG {
            for x in 0..BIG {
                if !on_border(x) && !on_border(y) {
                    img.set(x, y, (x * 7 + y * 13) % 5 == 0);
                }
            }
        }
        let mut code = 0;
        for line in 0..=GRID {
            for seg in 0..GRID {
                for vertical in [false, true] {
                    let bits = 0x80 | (code << 1);
                    code += 1;
                    for i in 0..INNER {
                        let (along, across) = (seg * STEP + 1 + i, line * STEP);
                        let (x, y) = if vertical { (across, along) } else { (along, across) };
                        img.set(x, y, bits >> i & 1 == 1);
                    }
                }
            }
        }
        img
    }

    fn tile_id(row: usize, col: usize) -> u64 {
        1009 + 17 * (row * GRID + col) as u64
    }

    /// Tiles cut from [`source`], each turned differently, in reverse order.
    fn scrambled_tiles() -> Vec<Tile> {
        let img = source();
        let mut tiles: Vec<Tile> = (0..GRID)
            .cartesian_product(0..GRID)
            .map(|(row, col)| {
                let piece = img.crop(col * STEP, row * STEP, TILE, TILE);
                let turn = (row * GRID + col) % 8;
                Tile {
                    id: tile_id(row, col),
                    image: piece.symmetries().nth(turn).unwrap(),
                }
            })
            .collect();
        tiles.reverse();
        tiles
    }

    /// The source with every cut line removed.
    fn expected_image() -> Bitmap {
        let img = source();
        let side = GRID * INNER;
        let mut out = Bitmap::new(side, side);
        for y in 0..side {
            for x in 0..side {
                let sx = (x / INNER) * STEP + 1 + x % INNER;
                let sy = (y / INNER) * STEP + 1 + y % INNER;
                out.set(x, y, img.get(sx, sy));
            }
        }
        out
    }

    fn render(tiles: &[Tile]) -> String {
        tiles
            .iter()
            .map(|tile| format!("Tile {}:\n{}", tile.id, tile.image))
            .join("\n")
    }

    #[test]
    fn test_edges() {
        let img = Bitmap::parse(["#..", "..#", "##."], 1).unwrap();
        assert_eq!(edge(&img, Side::Top), 0b001);
        assert_eq!(edge(&img, Side::Bottom), 0b011);
        assert_eq!(edge(&img, Side::Left), 0b101);
        assert_eq!(edge(&img, Side::Right), 0b010);
        assert_eq!(canonical_edge(0b011, 3), 0b011);
        assert_eq!(canonical_edge(0b110, 3), 0b011);
        assert_eq!(reverse_edge(0b0000000001, 10), 0b1000000000);
    }

    #[test]
    fn test_corner_classification() {
        let tiles = scrambled_tiles();
        let jigsaw = Jigsaw::new(&tiles);
        let mut corner_ids: Vec<u64> = jigsaw.corners().iter().map(|&i| tiles[i].id).collect();
        corner_ids.sort_unstable();
        assert_eq!(
            corner_ids,
            vec![tile_id(0, 0), tile_id(0, 2), tile_id(2, 0), tile_id(2, 2)]
        );

        let center = tiles.iter().position(|t| t.id == tile_id(1, 1)).unwrap();
        assert_eq!(jigsaw.unique_edges(center), 0);
        let rim = tiles.iter().position(|t| t.id == tile_id(0, 1)).unwrap();
        assert_eq!(jigsaw.unique_edges(rim), 1);
    }

    #[test]
    fn test_assembly_restores_picture() {
        let tiles = scrambled_tiles();
        let grid = Jigsaw::new(&tiles).assemble().unwrap();
        assert_eq!(grid.len(), GRID);
        assert!(grid.iter().all(|row| row.len() == GRID));

        let image = stitch(&grid);
        assert_eq!((image.width(), image.height()), (GRID * INNER, GRID * INNER));
        let expected = expected_image();
        assert!(expected.symmetries().any(|candidate| candidate == image));
    }

    #[test]
    fn test_solver_parts() {
        let tiles = scrambled_tiles();
        let mut shared = Solver::parse(&render(&tiles)).unwrap();
        assert_eq!(shared, tiles);

        let product = tile_id(0, 0) * tile_id(0, 2) * tile_id(2, 0) * tile_id(2, 2);
        assert_eq!(<Solver as PartSolver<1>>::solve(&mut shared).unwrap(), product.to_string());
        // the fill never puts two set cells side by side, so no monster fits
        let roughness = expected_image().count_set();
        assert_eq!(<Solver as PartSolver<2>>::solve(&mut shared).unwrap(), roughness.to_string());
    }

    fn stamp_monster(image: &mut Bitmap, x: usize, y: usize) {
        for (dx, dy) in monster_cells() {
            image.set(x + dx, y + dy, true);
        }
    }

    #[test]
    fn test_monster_scan() {
        assert_eq!(monster_cells().len(), 15);

        let mut image = Bitmap::new(24, 24);
        stamp_monster(&mut image, 2, 5);
        stamp_monster(&mut image, 4, 21);
        image.set(0, 0, true);
        image.set(23, 23, true);
        image.set(10, 1, true);
        assert_eq!(count_monsters(&image), 2);
        assert_eq!(water_roughness(&image), 3);

        let turned = image.rotate_cw().flip_horizontal();
        assert_eq!(count_monsters(&turned), 0);
        assert_eq!(water_roughness(&turned), 3);
    }

    #[test]
    fn test_monster_needs_room() {
        let image = Bitmap::new(19, 40);
        assert_eq!(count_monsters(&image), 0);
        assert_eq!(water_roughness(&image), 0);
    }

    #[test]
    fn test_not_square() {
        let tiles: Vec<Tile> = scrambled_tiles().into_iter().take(2).collect();
        assert_eq!(
            Jigsaw::new(&tiles).assemble().unwrap_err(),
            JigsawError::NotSquare(2)
        );
    }

    /// Writes segment `code` along `side`, in reading order or reversed.
    fn paint_edge(img: &mut Bitmap, side: Side, code: u32, reversed: bool) {
        let bits = 0x80 | (code << 1);
        for i in 0..INNER {
            let along = if reversed { INNER - i } else { 1 + i };
            let (x, y) = match side {
                Side::Top => (along, 0),
                Side::Bottom => (along, TILE - 1),
                Side::Left => (0, along),
                Side::Right => (TILE - 1, along),
            };
            img.set(x, y, bits >> i & 1 == 1);
        }
    }

    /// A blank tile with one segment code per side, in [`Side::ALL`] order.
    fn framed(codes: [u32; 4]) -> Bitmap {
        let mut img = Bitmap::new(TILE, TILE);
        for (side, code) in Side::ALL.into_iter().zip(codes) {
            paint_edge(&mut img, side, code, false);
        }
        img
    }

    fn numbered(images: Vec<Bitmap>) -> Vec<Tile> {
        images
            .into_iter()
            .enumerate()
            .map(|(i, image)| Tile {
                id: 2001 + i as u64,
                image,
            })
            .collect()
    }

    #[test]
    fn test_no_corner_tiles() {
        let mut shared = numbered(vec![framed([1, 2, 3, 4]); 4]);
        assert!(Jigsaw::new(&shared).corners().is_empty());
        assert_eq!(
            Jigsaw::new(&shared).assemble().unwrap_err(),
            JigsawError::CornerCount(0)
        );
        let err = <Solver as PartSolver<1>>::solve(&mut shared).unwrap_err();
        assert!(err.to_string().contains("found 0"));
    }

    #[test]
    fn test_corner_with_opposite_open_edges() {
        // a ring: each tile's right edge is the next one's left edge, so the
        // only unshared edges are top and bottom
        let tiles = numbered(
            (0..4)
                .map(|i| framed([10 + i, i, 20 + i, (i + 3) % 4]))
                .collect(),
        );
        assert_eq!(Jigsaw::new(&tiles).corners().len(), 4);
        assert_eq!(
            Jigsaw::new(&tiles).assemble().unwrap_err(),
            JigsawError::CornerOrientation(2001)
        );
    }

    #[test]
    fn test_corner_sharing_edges_only_with_itself() {
        let tiles = numbered(vec![
            framed([10, 1, 1, 11]),
            framed([20, 21, 22, 23]),
            framed([24, 25, 26, 27]),
            framed([28, 29, 30, 31]),
        ]);
        assert_eq!(Jigsaw::new(&tiles).corners(), vec![0]);
        assert_eq!(
            Jigsaw::new(&tiles).assemble().unwrap_err(),
            JigsawError::NoMatch { row: 0, col: 1 }
        );
    }

    #[test]
    fn test_last_tile_disagrees_with_the_tile_above() {
        // a consistent 2x2 layout except that the last tile's top edge is
        // mirrored: it still pairs up by canonical edge but never lines up
        let mut last = framed([3, 16, 17, 4]);
        paint_edge(&mut last, Side::Top, 3, true);
        let tiles = numbered(vec![
            framed([10, 1, 2, 11]),
            framed([12, 13, 3, 1]),
            framed([2, 4, 15, 14]),
            last,
        ]);
        assert_eq!(Jigsaw::new(&tiles).corners().len(), 4);
        assert_eq!(
            Jigsaw::new(&tiles).assemble().unwrap_err(),
            JigsawError::Mismatch { row: 1, col: 1 }
        );
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            Solver::parse("Tile x:\n###\n#.#\n###"),
            Err(ParseError::InvalidLine { line: 1, .. })
        ));
        assert!(matches!(
            Solver::parse("Tile 1:\n###\n#.\n###"),
            Err(ParseError::InvalidLine { line: 3, .. })
        ));
        assert!(matches!(
            Solver::parse("Tile 1:\n###\n###"),
            Err(ParseError::InvalidLine { line: 1, .. })
        ));
        assert!(matches!(
            Solver::parse("Tile 1:\n###\n###\n###\n\nTile 1:\n###\n###\n###"),
            Err(ParseError::InvalidLine { line: 6, .. })
        ));
        assert!(matches!(
            Solver::parse("Tile 1:\n###\n###\n###\n\nTile 2:\n####\n####\n####\n####"),
            Err(ParseError::InvalidLine { line: 6, .. })
        ));
        assert!(Solver::parse("\n\n").unwrap().is_empty());
    }
}
