//! Area model and reduction grouping for the multiplication view.

use fraction_arith::Fraction;
use serde::{Deserialize, Serialize};

/// State of one cell of the area model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CellState {
    Empty,
    /// Covered by the first fraction only
    Filled,
    /// Covered by the second fraction only
    Highlighting,
    /// Covered by both: part of the product
    Overlap,
}

/// Unit square cut into `cols` columns by the first fraction and `rows` rows
/// by the second.
///
/// Only one unit square is drawn, so a fraction above one covers its whole
/// axis and the overlap undercounts the product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaModel {
    pub rows: u64,
    pub cols: u64,
    /// Row-major cell states, `rows * cols` long
    pub cells: Vec<CellState>,
}

impl AreaModel {
    /// Lay `first` out along the columns and `second` along the rows.
    pub fn new(first: Fraction, second: Fraction) -> Self {
        let rows = second.denominator;
        let cols = first.denominator;
        let cells = (0..rows)
            .flat_map(|row| {
                (0..cols).map(move |col| {
                    let in_first = col < first.numerator;
                    let in_second = row < second.numerator;
                    match (in_first, in_second) {
                        (true, true) => CellState::Overlap,
                        (true, false) => CellState::Filled,
                        (false, true) => CellState::Highlighting,
                        (false, false) => CellState::Empty,
                    }
                })
            })
            .collect();
        Self { rows, cols, cells }
    }

    /// Like [`new`](Self::new), but `None` when the grid would have more than
    /// `max_cells` cells.
    pub fn bounded(first: Fraction, second: Fraction, max_cells: u64) -> Option<Self> {
        let cells = second.denominator.checked_mul(first.denominator)?;
        (cells <= max_cells).then(|| Self::new(first, second))
    }

    /// Get the state of a cell.
    pub fn cell(&self, row: u64, col: u64) -> Option<CellState> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.cells.get((row * self.cols + col) as usize).copied()
    }

    /// Number of cells in a given state.
    pub fn count(&self, state: CellState) -> usize {
        self.cells.iter().filter(|&&c| c == state).count()
    }
}

/// One block of the reduction walkthrough.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Which run of `gcd` blocks this belongs to
    pub group: u64,
    /// Position inside the run
    pub index: u64,
}

/// Numerator and denominator split into runs of `gcd` blocks. Each run
/// collapses to a single block of the reduced fraction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReductionGroups {
    pub gcd: u64,
    pub numerator: Vec<Block>,
    pub denominator: Vec<Block>,
}

impl ReductionGroups {
    /// Group the blocks of `original` by `gcd`. A zero `gcd` is treated as 1.
    pub fn new(original: Fraction, gcd: u64) -> Self {
        let gcd = gcd.max(1);
        let blocks = |count: u64| {
            (0..count)
                .map(|i| Block { group: i / gcd, index: i % gcd })
                .collect::<Vec<_>>()
        };
        Self {
            gcd,
            numerator: blocks(original.numerator),
            denominator: blocks(original.denominator),
        }
    }

    /// Like [`new`](Self::new), but `None` when either side of `original` has
    /// more than `max_blocks` blocks.
    pub fn bounded(original: Fraction, gcd: u64, max_blocks: u64) -> Option<Self> {
        (original.numerator <= max_blocks && original.denominator <= max_blocks)
            .then(|| Self::new(original, gcd))
    }

    /// Groups in the numerator; the reduced numerator when `gcd` divides it.
    pub fn numerator_groups(&self) -> u64 {
        self.numerator.len() as u64 / self.gcd
    }

    /// Groups in the denominator.
    pub fn denominator_groups(&self) -> u64 {
        self.denominator.len() as u64 / self.gcd
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fraction_arith::{fraction_gcd, multiply_fractions, reduce_fraction};

    fn f(n: u64, d: u64) -> Fraction {
        Fraction::new(n, d).unwrap()
    }

    #[test]
    fn overlap_matches_product() {
        for (a, b) in [(f(2, 3), f(3, 4)), (f(1, 2), f(1, 2)), (f(5, 6), f(4, 5)), (f(3, 3), f(2, 7))] {
            let model = AreaModel::new(a, b);
            let product = multiply_fractions(a, b).unwrap();
            assert_eq!(model.count(CellState::Overlap) as u64, product.numerator);
            assert_eq!(model.cells.len() as u64, product.denominator);
        }
    }

    #[test]
    fn cell_layout() {
        let model = AreaModel::new(f(2, 3), f(3, 4));
        assert_eq!((model.rows, model.cols), (4, 3));
        assert_eq!(model.cell(0, 0), Some(CellState::Overlap));
        assert_eq!(model.cell(0, 2), Some(CellState::Highlighting));
        assert_eq!(model.cell(3, 1), Some(CellState::Filled));
        assert_eq!(model.cell(3, 2), Some(CellState::Empty));
        assert_eq!(model.cell(4, 0), None);
        assert_eq!(model.count(CellState::Filled), 2);
        assert_eq!(model.count(CellState::Highlighting), 3);
        assert_eq!(model.count(CellState::Empty), 1);
    }

    #[test]
    fn groups_collapse_to_reduced_fraction() {
        let product = f(6, 12);
        let groups = ReductionGroups::new(product, fraction_gcd(product));
        let reduced = reduce_fraction(product);
        assert_eq!(groups.numerator_groups(), reduced.numerator);
        assert_eq!(groups.denominator_groups(), reduced.denominator);
        assert_eq!(groups.numerator[5], Block { group: 0, index: 5 });
        assert_eq!(groups.denominator[7], Block { group: 1, index: 1 });
    }

    #[test]
    fn bounded_models_refuse_huge_grids() {
        let tiny = f(1, 100_000);
        assert!(AreaModel::bounded(tiny, tiny, 100).is_none());
        assert!(AreaModel::bounded(f(1, u64::MAX), f(1, u64::MAX), u64::MAX).is_none());
        let model = AreaModel::bounded(f(10, 10), f(10, 10), 100).unwrap();
        assert_eq!(model.count(CellState::Overlap), 100);

        assert!(ReductionGroups::bounded(f(2, 100_000), 2, 100).is_none());
        let groups = ReductionGroups::bounded(f(100, 100), 100, 100).unwrap();
        assert_eq!(groups.numerator_groups(), 1);
    }

    #[test]
    fn zero_gcd_is_one() {
        let groups = ReductionGroups::new(f(2, 3), 0);
        assert_eq!(groups.gcd, 1);
        assert_eq!(groups.denominator_groups(), 3);
    }
}
