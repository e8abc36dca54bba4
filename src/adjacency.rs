use crate::types::Coord2;

/// Row-major displacements covering the 3x3 block minus its center.
const OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Iterates the in-bounds coordinates at Chebyshev distance 1 from
/// `center`: 3 for a corner, 5 for an edge, 8 for an interior cell.
///
/// Yields in row-major order (increasing row, then increasing col), so
/// the sequence is deterministic for a given board size and center.
pub fn neighbors(size: Coord2, center: Coord2) -> Neighbors {
    Neighbors {
        center,
        size,
        offset: 0,
    }
}

#[derive(Debug)]
pub struct Neighbors {
    center: Coord2,
    size: Coord2,
    offset: u8,
}

impl Iterator for Neighbors {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(&delta) = OFFSETS.get(usize::from(self.offset)) {
            self.offset += 1;
            if let Some(coords) = shifted(self.center, delta, self.size) {
                return Some(coords);
            }
        }
        None
    }
}

/// Applies `delta` to `coords`, returning a value only while it stays in
/// bounds.
fn shifted((row, col): Coord2, (d_row, d_col): (i8, i8), (rows, cols): Coord2) -> Option<Coord2> {
    let row = row.checked_add_signed(d_row)?;
    let col = col.checked_add_signed(d_col)?;
    if row < rows && col < cols {
        Some((row, col))
    } else {
        None
    }
}
