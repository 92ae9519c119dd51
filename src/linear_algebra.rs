//! Dense least-squares on reusable flat storage.
//!
//! The fluctuation kernels solve one small least-squares problem per window,
//! millions of times per call. Everything here works in place on buffers owned
//! by the caller so the hot loop never allocates.

/// Row-major matrix backed by a single contiguous buffer.
///
/// The buffer only grows: shrinking the row count keeps the allocation so a
/// matrix sized for the largest window serves every smaller one.
#[derive(Debug, Clone)]
pub struct FlatMatrix {
    data: Vec<f64>,
    rows: usize,
    cols: usize,
}

impl FlatMatrix {
    /// Create a zeroed matrix with the given dimensions
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            data: vec![0.0; rows * cols],
            rows,
            cols,
        }
    }

    /// Number of rows currently in use
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Change the active row count, growing the buffer if needed.
    pub fn set_rows(&mut self, rows: usize) {
        let needed = rows * self.cols;
        if self.data.len() < needed {
            self.data.resize(needed, 0.0);
        }
        self.rows = rows;
    }

    /// Get element at (row, col)
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        debug_assert!(row < self.rows && col < self.cols);
        self.data[row * self.cols + col]
    }

    /// Set element at (row, col)
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        debug_assert!(row < self.rows && col < self.cols);
        self.data[row * self.cols + col] = value;
    }

    /// Mutable view of one row
    #[inline]
    pub fn row_mut(&mut self, row: usize) -> &mut [f64] {
        debug_assert!(row < self.rows);
        let start = row * self.cols;
        &mut self.data[start..start + self.cols]
    }
}

/// Solve `min ||A x - b||₂` by Householder QR without forming Q.
///
/// `a` (m × n, m ≥ n) and `b` (length m) are overwritten: on return the upper
/// triangle of `a` holds R and the first n entries of `b` hold Qᵀb. The
/// solution is written to `x` (length n).
///
/// Columns whose diagonal falls below a norm-scaled tolerance are treated as
/// rank deficient and their coefficient is set to zero. Non-finite inputs are
/// not screened; they propagate into `x`.
pub fn householder_least_squares(a: &mut FlatMatrix, b: &mut [f64], x: &mut [f64]) {
    let m = a.rows();
    let n = a.cols();
    debug_assert_eq!(b.len(), m, "right-hand side length must match row count");
    debug_assert_eq!(x.len(), n, "solution length must match column count");
    debug_assert!(m >= n, "underdetermined least-squares system");

    // tol = max(m,n) * eps * ||A||_F, with a safety factor
    let mut matrix_norm = 0.0;
    for i in 0..m {
        for j in 0..n {
            let v = a.get(i, j);
            matrix_norm += v * v;
        }
    }
    let rank_tol = 100.0 * f64::EPSILON * (m.max(n) as f64) * matrix_norm.sqrt().max(1.0);

    // Last row never needs a reflector
    let steps = n.min(m.saturating_sub(1));
    for k in 0..steps {
        let mut norm = 0.0;
        for i in k..m {
            let v = a.get(i, k);
            norm += v * v;
        }
        let norm = norm.sqrt();
        if norm < rank_tol {
            continue;
        }

        let head = a.get(k, k);
        let alpha = if head >= 0.0 { -norm } else { norm };
        // Reflector v = (head - alpha, a[k+1..m][k]) stored in column k
        a.set(k, k, head - alpha);
        let mut v_norm2 = 0.0;
        for i in k..m {
            let v = a.get(i, k);
            v_norm2 += v * v;
        }
        if v_norm2 == 0.0 {
            a.set(k, k, alpha);
            continue;
        }

        for j in (k + 1)..n {
            let mut dot = 0.0;
            for i in k..m {
                dot += a.get(i, k) * a.get(i, j);
            }
            let scale = 2.0 * dot / v_norm2;
            for i in k..m {
                let updated = a.get(i, j) - scale * a.get(i, k);
                a.set(i, j, updated);
            }
        }

        let mut dot_b = 0.0;
        for i in k..m {
            dot_b += a.get(i, k) * b[i];
        }
        let scale = 2.0 * dot_b / v_norm2;
        for i in k..m {
            b[i] -= scale * a.get(i, k);
        }

        a.set(k, k, alpha);
    }

    // Back-substitution on R x = Qᵀb
    for i in (0..n).rev() {
        let diag = a.get(i, i);
        if diag.abs() < rank_tol {
            x[i] = 0.0;
            continue;
        }
        let mut sum = b[i];
        for j in (i + 1)..n {
            sum -= a.get(i, j) * x[j];
        }
        x[i] = sum / diag;
    }
}
