//! Travel cost matrices.
//!
//! A [`DistanceMatrix`] is validated to be square on construction and offers
//! a lookup that never panics. [`DistanceMatrix::with_terminal`] appends the
//! synthetic dummy terminal node that lets vehicles end their routes
//! anywhere at zero marginal cost.

use thiserror::Error;

/// Errors returned by [`DistanceMatrix::new`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MatrixError {
    /// A row's length disagreed with the number of rows.
    #[error("matrix row {row} has {actual} columns but {expected} expected (matrix must be square)")]
    NotSquare {
        /// Zero-based index of the offending row.
        row: usize,
        /// Expected column count (the number of rows).
        expected: usize,
        /// Actual column count of the row.
        actual: usize,
    },
}

/// A square, non-negative travel cost matrix indexed by node.
///
/// # Examples
/// ```
/// use fleetplan_core::DistanceMatrix;
///
/// let matrix = DistanceMatrix::new(vec![vec![0, 5], vec![7, 0]])?;
/// assert_eq!(matrix.size(), 2);
/// assert_eq!(matrix.cost(0, 1), 5);
/// # Ok::<(), fleetplan_core::MatrixError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceMatrix {
    rows: Vec<Vec<u64>>,
}

impl DistanceMatrix {
    /// Validate and construct a matrix from raw rows.
    ///
    /// # Errors
    /// Returns [`MatrixError::NotSquare`] if any row length differs from the
    /// row count.
    pub fn new(rows: Vec<Vec<u64>>) -> Result<Self, MatrixError> {
        let expected = rows.len();
        for (row, entries) in rows.iter().enumerate() {
            if entries.len() != expected {
                return Err(MatrixError::NotSquare {
                    row,
                    expected,
                    actual: entries.len(),
                });
            }
        }
        Ok(Self { rows })
    }

    /// Number of nodes covered by the matrix.
    #[must_use]
    pub fn size(&self) -> usize {
        self.rows.len()
    }

    /// Travel cost from `from` to `to`.
    ///
    /// Out-of-range lookups log and resolve to zero; the formulator bounds
    /// every index it hands out, so this only triggers on misuse.
    #[must_use]
    pub fn cost(&self, from: usize, to: usize) -> u64 {
        self.rows
            .get(from)
            .and_then(|row| row.get(to))
            .copied()
            .map_or_else(
                || {
                    log::warn!("matrix lookup out of range: from={from}, to={to}");
                    debug_assert!(false, "matrix lookup out of range: from={from}, to={to}");
                    0
                },
                |cost| cost,
            )
    }

    /// Append the dummy terminal node.
    ///
    /// Every existing row gains a zero-cost entry to the terminal and the
    /// terminal's own row is all zeros, so any node may end a route for
    /// free. The result has exactly one more row and column.
    #[must_use]
    pub fn with_terminal(&self) -> Self {
        let terminal_row = vec![0; self.rows.len() + 1];
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let mut extended = row.clone();
                extended.push(0);
                extended
            })
            .chain(std::iter::once(terminal_row))
            .collect();
        Self { rows }
    }
}

impl TryFrom<Vec<Vec<u64>>> for DistanceMatrix {
    type Error = MatrixError;

    fn try_from(rows: Vec<Vec<u64>>) -> Result<Self, Self::Error> {
        Self::new(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn rejects_jagged_rows() {
        let err = DistanceMatrix::new(vec![vec![0, 1], vec![1]]).expect_err("jagged");
        assert_eq!(
            err,
            MatrixError::NotSquare {
                row: 1,
                expected: 2,
                actual: 1
            }
        );
    }

    #[rstest]
    fn rejects_wide_rows() {
        let err = DistanceMatrix::new(vec![vec![0, 1, 2], vec![1, 0, 3]]).expect_err("wide");
        assert!(matches!(err, MatrixError::NotSquare { row: 0, .. }));
    }

    #[rstest]
    fn accepts_empty_matrix() {
        let matrix = DistanceMatrix::new(Vec::new()).expect("empty is square");
        assert_eq!(matrix.size(), 0);
    }

    #[rstest]
    fn terminal_row_and_column_are_zero() {
        let matrix = DistanceMatrix::new(vec![vec![0, 4], vec![6, 0]]).expect("square");
        let augmented = matrix.with_terminal();
        assert_eq!(augmented.size(), 3);
        for node in 0..3 {
            assert_eq!(augmented.cost(node, 2), 0);
            assert_eq!(augmented.cost(2, node), 0);
        }
        assert_eq!(augmented.cost(1, 0), 6);
    }
}
