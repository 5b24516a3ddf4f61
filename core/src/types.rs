/// Single coordinate axis used for the board side and positions.
pub type Coord = u8;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u16;

/// Two-dimensional coordinates `(x, y)`.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn square(side: Coord) -> CellCount {
    let side = side as CellCount;
    side.saturating_mul(side)
}

/// Row-major iteration over every coordinate of a `side x side` board.
pub fn iter_coords(side: Coord) -> impl Iterator<Item = Coord2> {
    (0..side).flat_map(move |y| (0..side).map(move |x| (x, y)))
}

const NEIGHBOR_DELTAS: [(i8, i8); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

const ZONE_DELTAS: [(i8, i8); 9] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (0, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Applies `delta` to `coords`, returning a value only when it stays on the board.
fn offset(coords: Coord2, delta: (i8, i8), side: Coord) -> Option<Coord2> {
    let x = coords.0.checked_add_signed(delta.0)?;
    let y = coords.1.checked_add_signed(delta.1)?;
    (x < side && y < side).then_some((x, y))
}

/// Clamped neighborhood iterator, it never wraps around board edges.
#[derive(Debug, Clone)]
pub struct NeighborIter {
    center: Coord2,
    side: Coord,
    deltas: &'static [(i8, i8)],
    index: usize,
}

impl NeighborIter {
    /// The up to 8 cells touching `center`.
    pub fn around(center: Coord2, side: Coord) -> Self {
        Self {
            center,
            side,
            deltas: &NEIGHBOR_DELTAS,
            index: 0,
        }
    }

    /// The 3x3 block centered on `center`, including `center` itself.
    pub fn zone(center: Coord2, side: Coord) -> Self {
        Self {
            center,
            side,
            deltas: &ZONE_DELTAS,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(&delta) = self.deltas.get(self.index) {
            self.index += 1;
            if let Some(coords) = offset(self.center, delta, self.side) {
                return Some(coords);
            }
        }
        None
    }
}

/// Whether `coords` lies in the 3x3 block centered on `center`.
pub fn in_zone(center: Coord2, coords: Coord2) -> bool {
    center.0.abs_diff(coords.0) <= 1 && center.1.abs_diff(coords.1) <= 1
}
