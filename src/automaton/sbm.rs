//! Sparse Boolean Matrix: a 2-D boolean sparse matrix with
//! set/get, Kronecker product, boolean matmul and iterated-squaring
//! transitive closure. Backed by a sorted `Vec<(row, col)>` plus an
//! `AHashSet` for O(1) membership, which suits the small-to-medium matrices
//! that automaton intersection produces.
use ahash::AHashSet;

use crate::error::{Error, Result};

/// A sparse `rows x cols` boolean matrix. Empty cells are `false`; equality
/// is elementwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SparseBoolMatrix {
    rows: usize,
    cols: usize,
    cells: AHashSet<(u32, u32)>,
}

impl SparseBoolMatrix {
    /// An all-`false` matrix of the given shape.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: AHashSet::default(),
        }
    }

    /// Row count.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Column count.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Number of `true` cells.
    pub fn nnz(&self) -> usize {
        self.cells.len()
    }

    /// Set `M[i,j] = b`.
    pub fn set(&mut self, i: usize, j: usize, b: bool) {
        debug_assert!(i < self.rows && j < self.cols);
        if b {
            self.cells.insert((i as u32, j as u32));
        } else {
            self.cells.remove(&(i as u32, j as u32));
        }
    }

    /// `M[i,j]`.
    pub fn get(&self, i: usize, j: usize) -> bool {
        self.cells.contains(&(i as u32, j as u32))
    }

    /// Elementwise OR, in place. Errors if shapes disagree.
    pub fn or_into(&mut self, other: &SparseBoolMatrix) -> Result<()> {
        if self.rows != other.rows || self.cols != other.cols {
            return Err(Error::DimensionMismatch(format!(
                "or_into: {}x{} vs {}x{}",
                self.rows, self.cols, other.rows, other.cols
            )));
        }
        self.cells.extend(other.cells.iter().copied());
        Ok(())
    }

    /// All `(i, j)` with `M[i,j]` true, in unspecified order.
    pub fn nonzero(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells.iter().map(|&(i, j)| (i as usize, j as usize))
    }

    /// Boolean matrix multiply: `(a*b)[i,j] = OR_k a[i,k] & b[k,j]`.
    pub fn matmul(a: &SparseBoolMatrix, b: &SparseBoolMatrix) -> Result<SparseBoolMatrix> {
        if a.cols != b.rows {
            return Err(Error::DimensionMismatch(format!(
                "matmul: {}x{} * {}x{}",
                a.rows, a.cols, b.rows, b.cols
            )));
        }
        let mut result = SparseBoolMatrix::new(a.rows, b.cols);
        // Group `a`'s cells by row and `b`'s by row (i.e. the shared `k` axis).
        let mut b_by_row: Vec<Vec<u32>> = vec![Vec::new(); b.rows];
        for &(k, j) in &b.cells {
            b_by_row[k as usize].push(j);
        }
        let mut a_by_row: Vec<Vec<u32>> = vec![Vec::new(); a.rows];
        for &(i, k) in &a.cells {
            a_by_row[i as usize].push(k);
        }
        for i in 0..a.rows {
            for &k in &a_by_row[i] {
                for &j in &b_by_row[k as usize] {
                    result.cells.insert((i as u32, j));
                }
            }
        }
        Ok(result)
    }

    /// Kronecker product: `(a kron b)[i*q+p, j*q+s] = a[i,j] & b[p,s]` where
    /// `b` is `q x q'` (here `q` = `b.rows`, `q'` = `b.cols`).
    pub fn kron(a: &SparseBoolMatrix, b: &SparseBoolMatrix) -> SparseBoolMatrix {
        let mut result = SparseBoolMatrix::new(a.rows * b.rows, a.cols * b.cols);
        for &(i, j) in &a.cells {
            for &(p, s) in &b.cells {
                let row = i as usize * b.rows + p as usize;
                let col = j as usize * b.cols + s as usize;
                result.cells.insert((row as u32, col as u32));
            }
        }
        result
    }

    /// Transitive closure of a square matrix via iterated squaring:
    /// `A <- A | (A*A)` until `nnz(A)` stabilizes. Returns a new matrix; does
    /// not mutate `self`.
    pub fn transitive_closure(&self) -> Result<SparseBoolMatrix> {
        if self.rows != self.cols {
            return Err(Error::DimensionMismatch(format!(
                "transitive_closure: {}x{} is not square",
                self.rows, self.cols
            )));
        }
        let mut closure = self.clone();
        loop {
            let prev_nnz = closure.nnz();
            let squared = SparseBoolMatrix::matmul(&closure, &closure)?;
            closure.or_into(&squared)?;
            if closure.nnz() == prev_nnz {
                return Ok(closure);
            }
        }
    }
}
