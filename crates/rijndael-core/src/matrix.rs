//! Byte grids used for the cipher state and key material.
//!
//! Both [`ByteMatrix`] and [`State`] store cells column-major: the cell at
//! `(row, col)` lives at flat offset `col * rows + row`. Serializing a block
//! into a state is therefore the identity on the underlying bytes.

use core::fmt;

use zeroize::Zeroize;

use crate::block::xor_in_place;
use crate::error::{Error, Result};
use crate::params::{MAX_COLUMNS, MIN_COLUMNS, STATE_ROWS};

/// Owned `rows × columns` grid of bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct ByteMatrix {
    rows: usize,
    columns: usize,
    cells: Vec<u8>,
}

impl ByteMatrix {
    /// Allocates a zeroed matrix.
    pub fn new(rows: usize, columns: usize) -> Self {
        Self {
            rows,
            columns,
            cells: vec![0u8; rows * columns],
        }
    }

    /// Builds a matrix from column-major bytes. Returns `None` when `bytes`
    /// does not divide evenly into `rows`.
    pub fn from_bytes(rows: usize, bytes: &[u8]) -> Option<Self> {
        if rows == 0 || bytes.len() % rows != 0 {
            return None;
        }
        Some(Self {
            rows,
            columns: bytes.len() / rows,
            cells: bytes.to_vec(),
        })
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[inline]
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Reads the cell at `(row, col)`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.cells[col * self.rows + row]
    }

    /// Writes the cell at `(row, col)`.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: u8) {
        self.cells[col * self.rows + row] = value;
    }

    /// Borrows column `col` as a contiguous slice.
    #[inline]
    pub fn column(&self, col: usize) -> &[u8] {
        let start = col * self.rows;
        &self.cells[start..start + self.rows]
    }

    /// Mutably borrows column `col`.
    #[inline]
    pub fn column_mut(&mut self, col: usize) -> &mut [u8] {
        let start = col * self.rows;
        &mut self.cells[start..start + self.rows]
    }

    /// Column-major view of every cell.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.cells
    }

    /// Consumes the matrix, returning its column-major bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.cells
    }

    /// XORs `other` into `self` cell by cell.
    ///
    /// Both matrices must have the same shape.
    pub fn xor_in_place(&mut self, other: &ByteMatrix) {
        debug_assert_eq!((self.rows, self.columns), (other.rows, other.columns));
        xor_in_place(&mut self.cells, &other.cells);
    }

    /// Copies `total_columns` columns starting at `start_column` into a new matrix.
    pub fn sub_matrix(&self, start_column: usize, total_columns: usize) -> ByteMatrix {
        let start = start_column * self.rows;
        let end = start + total_columns * self.rows;
        Self {
            rows: self.rows,
            columns: total_columns,
            cells: self.cells[start..end].to_vec(),
        }
    }
}

impl Zeroize for ByteMatrix {
    fn zeroize(&mut self) {
        self.cells.zeroize();
    }
}

impl fmt::Display for ByteMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_grid(f, self.rows, self.columns, &self.cells)
    }
}

impl fmt::Debug for ByteMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteMatrix")
            .field("rows", &self.rows)
            .field("columns", &self.columns)
            .finish_non_exhaustive()
    }
}

/// The working state for one block: a `4 × blockColumns` view over a caller's buffer.
pub struct State<'a> {
    cells: &'a mut [u8],
    columns: usize,
}

impl<'a> State<'a> {
    /// Wraps a block buffer. The length must be a multiple of 4 bytes between 16 and 32.
    pub fn new(cells: &'a mut [u8]) -> Result<Self> {
        let len = cells.len();
        let columns = len / STATE_ROWS;
        if len % STATE_ROWS != 0 || !(MIN_COLUMNS..=MAX_COLUMNS).contains(&columns) {
            return Err(Error::InvalidBlockSize {
                len,
                expected: "a multiple of 4 bytes between 16 and 32".to_string(),
            });
        }
        Ok(Self { cells, columns })
    }

    /// Number of rows (always 4).
    #[inline]
    pub fn rows(&self) -> usize {
        STATE_ROWS
    }

    /// Number of columns.
    #[inline]
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Reads the cell at `(row, col)`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.cells[col * STATE_ROWS + row]
    }

    /// Writes the cell at `(row, col)`.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: u8) {
        self.cells[col * STATE_ROWS + row] = value;
    }

    /// Mutably borrows column `col`.
    #[inline]
    pub fn column_mut(&mut self, col: usize) -> &mut [u8] {
        let start = col * STATE_ROWS;
        &mut self.cells[start..start + STATE_ROWS]
    }

    /// Column-major view of every cell.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &*self.cells
    }

    /// Mutable column-major view of every cell.
    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut *self.cells
    }
}

impl fmt::Display for State<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_grid(f, STATE_ROWS, self.columns, &*self.cells)
    }
}

fn write_grid(f: &mut fmt::Formatter<'_>, rows: usize, columns: usize, cells: &[u8]) -> fmt::Result {
    for row in 0..rows {
        f.write_str("|")?;
        for col in 0..columns {
            write!(f, " {:02X}", cells[col * rows + row])?;
        }
        f.write_str(" |\n")?;
    }
    Ok(())
}
