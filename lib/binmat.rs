//! Dense binary matrices over GF(2).
//!
//! A [`BinMatrix`] stores one bit per entry as a `u8` that is always either
//! `0` or `1`; addition is XOR and multiplication is AND. Parity-check matrices
//! of legos are stored in symplectic form: for a lego with `n` legs, the first
//! `n` columns hold the X part and the last `n` columns hold the Z part of each
//! row, so that the column pair `(i, n + i)` describes the Pauli content of leg
//! `i`.

use std::fmt;
use itertools::Itertools;
use ndarray as nd;

/// A binary matrix over GF(2).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BinMatrix(pub(crate) nd::Array2<u8>);

impl From<nd::Array2<u8>> for BinMatrix {
    fn from(data: nd::Array2<u8>) -> Self { Self::from_array(data) }
}

impl fmt::Display for BinMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        let n = self.0.nrows();
        for (k, row) in self.0.rows().into_iter().enumerate() {
            write!(f, "[{}]", row.iter().join(","))?;
            if k + 1 < n { write!(f, ",")?; }
        }
        write!(f, "]")
    }
}

impl BinMatrix {
    /// Create a new all-zero matrix.
    pub fn zeros(nrows: usize, ncols: usize) -> Self {
        Self(nd::Array2::zeros((nrows, ncols)))
    }

    /// Create a new matrix from an existing array, reducing every entry mod 2.
    pub fn from_array(mut data: nd::Array2<u8>) -> Self {
        data.mapv_inplace(|b| b & 1);
        Self(data)
    }

    /// Create a new matrix from a list of rows, returning `None` if the rows
    /// have unequal lengths.
    ///
    /// An empty list of rows produces a `0 × 0` matrix.
    pub fn try_from_rows<I, R>(rows: I) -> Option<Self>
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = u8>,
    {
        let rows: Vec<Vec<u8>> =
            rows.into_iter()
            .map(|row| row.into_iter().map(|b| b & 1).collect())
            .collect();
        let ncols = rows.first().map(|row| row.len()).unwrap_or(0);
        if rows.iter().any(|row| row.len() != ncols) { return None; }
        let nrows = rows.len();
        let flat: Vec<u8> = rows.into_iter().flatten().collect();
        nd::Array2::from_shape_vec((nrows, ncols), flat).ok().map(Self)
    }

    /// Create a new matrix from a list of rows.
    ///
    /// *Panics if the rows have unequal lengths.*
    pub fn from_rows<I, R>(rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = u8>,
    {
        Self::try_from_rows(rows)
            .expect("BinMatrix::from_rows: rows must have equal lengths")
    }

    /// Create the `1 × 1` scalar matrix `[[b]]`.
    pub fn scalar(b: bool) -> Self {
        Self(nd::Array2::from_elem((1, 1), u8::from(b)))
    }

    /// Return the number of rows.
    pub fn nrows(&self) -> usize { self.0.nrows() }

    /// Return the number of columns.
    pub fn ncols(&self) -> usize { self.0.ncols() }

    /// Return `(nrows, ncols)`.
    pub fn shape(&self) -> (usize, usize) { self.0.dim() }

    /// Return `true` if `self` is a `1 × 1` scalar.
    pub fn is_scalar(&self) -> bool { self.0.dim() == (1, 1) }

    /// Return the number of legs described by the matrix in symplectic form,
    /// i.e. half the column count. Scalars have no legs.
    pub fn num_legs(&self) -> usize {
        if self.is_scalar() { 0 } else { self.ncols() / 2 }
    }

    /// Get the entry at `(r, c)`, if it exists.
    pub fn get(&self, r: usize, c: usize) -> Option<bool> {
        self.0.get((r, c)).map(|b| *b == 1)
    }

    /// Set the entry at `(r, c)`.
    ///
    /// *Panics if `(r, c)` is out of bounds.*
    pub fn set(&mut self, r: usize, c: usize, val: bool) {
        self.0[[r, c]] = u8::from(val);
    }

    /// Return a view of the underlying array.
    pub fn as_array(&self) -> nd::ArrayView2<'_, u8> { self.0.view() }

    /// Return the rows as plain vectors.
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        self.0.rows().into_iter().map(|row| row.to_vec()).collect()
    }

    /// Return `true` if row `r` is all zeros.
    ///
    /// *Panics if `r` is out of bounds.*
    pub fn row_is_zero(&self, r: usize) -> bool {
        self.0.row(r).iter().all(|b| *b == 0)
    }

    /// Return the symplectic `(x, z)` bits of leg `leg` in row `r`.
    pub fn leg_bits(&self, r: usize, leg: usize) -> (bool, bool) {
        let n = self.num_legs();
        (self.0[[r, leg]] == 1, self.0[[r, n + leg]] == 1)
    }

    fn swap_rows(&mut self, a: usize, b: usize) {
        if a == b { return; }
        let row_a = self.0.row(a).to_owned();
        let row_b = self.0.row(b).to_owned();
        self.0.row_mut(a).assign(&row_b);
        self.0.row_mut(b).assign(&row_a);
    }

    // row[target] += row[source]
    fn add_row(&mut self, target: usize, source: usize) {
        let src = self.0.row(source).to_owned();
        self.0.row_mut(target).zip_mut_with(&src, |a, b| { *a ^= *b; });
    }

    /// Add column `source` into column `target` (XOR).
    ///
    /// *Panics if either column does not exist.*
    pub fn add_col(&mut self, target: usize, source: usize) {
        assert!(
            target < self.ncols() && source < self.ncols(),
            "BinMatrix::add_col: column out of bounds",
        );
        let src = self.0.column(source).to_owned();
        self.0.column_mut(target).zip_mut_with(&src, |a, b| { *a ^= *b; });
    }

    /// Bring `self` into reduced row-echelon form in place and return its rank.
    ///
    /// Pivots are taken from the first eligible row, so the result depends only
    /// on the input.
    pub fn row_reduce(&mut self) -> usize {
        let (nrows, ncols) = self.0.dim();
        let mut rank: usize = 0;
        for col in 0..ncols {
            if rank == nrows { break; }
            let Some(piv) = (rank..nrows).find(|r| self.0[[*r, col]] == 1)
                else { continue; };
            self.swap_rows(rank, piv);
            for r in 0..nrows {
                if r != rank && self.0[[r, col]] == 1 {
                    self.add_row(r, rank);
                }
            }
            rank += 1;
        }
        rank
    }

    /// Return the rank of `self`.
    pub fn rank(&self) -> usize { self.clone().row_reduce() }

    /// Remove all rows that are entirely zero.
    pub fn drop_zero_rows(&mut self) {
        let keep: Vec<usize> =
            (0..self.nrows()).filter(|r| !self.row_is_zero(*r)).collect();
        if keep.len() != self.nrows() { *self = self.select_rows(&keep); }
    }

    /// Return the reduced row-echelon form of `self` with zero rows removed.
    ///
    /// Two matrices generate the same row space if and only if their canonical
    /// forms are equal.
    pub fn canonical(&self) -> Self {
        let mut out = self.clone();
        out.row_reduce();
        out.drop_zero_rows();
        out
    }

    /// Return `true` if `self` and `other` have the same shape in columns and
    /// span the same row space.
    pub fn same_row_space(&self, other: &Self) -> bool {
        self.ncols() == other.ncols() && self.canonical() == other.canonical()
    }

    /// Eliminate the variable in column `col` across all rows.
    ///
    /// The first row with a 1 in `col` is used as pivot: it is added to every
    /// other row with a 1 in `col` and then removed. Rows left entirely zero are
    /// dropped. Nothing happens if no row has a 1 in `col`. Returns `true` if a
    /// pivot row was removed.
    ///
    /// *Panics if `col` does not exist.*
    pub fn eliminate(&mut self, col: usize) -> bool {
        assert!(
            col < self.ncols(),
            "BinMatrix::eliminate: column {} out of bounds for {} columns",
            col, self.ncols(),
        );
        let Some(piv) = (0..self.nrows()).find(|r| self.0[[*r, col]] == 1)
            else { return false; };
        for r in 0..self.nrows() {
            if r != piv && self.0[[r, col]] == 1 { self.add_row(r, piv); }
        }
        let keep: Vec<usize> =
            (0..self.nrows())
            .filter(|r| *r != piv && !self.row_is_zero(*r))
            .collect();
        *self = self.select_rows(&keep);
        true
    }

    /// Return a new matrix made of the given rows, in order.
    pub fn select_rows(&self, rows: &[usize]) -> Self {
        Self(self.0.select(nd::Axis(0), rows))
    }

    /// Return a new matrix made of the given columns, in order.
    pub fn select_cols(&self, cols: &[usize]) -> Self {
        Self(self.0.select(nd::Axis(1), cols))
    }

    /// Reorder the legs of a symplectic matrix so that leg `k` of the output is
    /// leg `order[k]` of `self`. Legs missing from `order` are dropped.
    ///
    /// *Panics if any entry of `order` is not a leg of `self`.*
    pub fn permute_legs(&self, order: &[usize]) -> Self {
        let n = self.num_legs();
        assert!(
            order.iter().all(|leg| *leg < n),
            "BinMatrix::permute_legs: leg out of bounds",
        );
        let cols: Vec<usize> =
            order.iter().copied()
            .chain(order.iter().map(|leg| n + *leg))
            .collect();
        self.select_cols(&cols)
    }

    /// Stack matrices in symplectic form block-diagonally, so that the legs of
    /// the output are the legs of each input in order.
    pub fn symplectic_union<'a, I>(mats: I) -> Self
    where I: IntoIterator<Item = &'a BinMatrix>
    {
        let mats: Vec<&BinMatrix> = mats.into_iter().collect();
        let total_legs: usize = mats.iter().map(|m| m.num_legs()).sum();
        let total_rows: usize = mats.iter().map(|m| m.nrows()).sum();
        let mut out = Self::zeros(total_rows, 2 * total_legs);
        let mut row_offs: usize = 0;
        let mut leg_offs: usize = 0;
        for m in mats.into_iter() {
            let n = m.num_legs();
            for r in 0..m.nrows() {
                for leg in 0..n {
                    out.0[[row_offs + r, leg_offs + leg]] = m.0[[r, leg]];
                    out.0[[row_offs + r, total_legs + leg_offs + leg]] =
                        m.0[[r, n + leg]];
                }
            }
            row_offs += m.nrows();
            leg_offs += n;
        }
        out
    }
}
