//! Row-major 4x4 matrices

use std::fmt;
use std::ops::Mul;

use super::vector::Vector3;

/// A row-major 4x4 matrix applied to column vectors, `M · v`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix4 {
    pub rows: [[f32; 4]; 4],
}

impl Matrix4 {
    pub const IDENTITY: Matrix4 = Matrix4::from_rows([
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ]);

    pub const ZERO: Matrix4 = Matrix4::from_rows([[0.0; 4]; 4]);

    pub const fn from_rows(rows: [[f32; 4]; 4]) -> Self {
        Self { rows }
    }

    /// Translation by `t`: identity with `t` in the last column
    pub fn translation(t: Vector3) -> Self {
        Self::from_rows([
            [1.0, 0.0, 0.0, t.x],
            [0.0, 1.0, 0.0, t.y],
            [0.0, 0.0, 1.0, t.z],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Non-uniform scale along the axes
    pub fn scaling(s: Vector3) -> Self {
        Self::from_rows([
            [s.x, 0.0, 0.0, 0.0],
            [0.0, s.y, 0.0, 0.0],
            [0.0, 0.0, s.z, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.rows[row][col]
    }

    /// Apply to `(v.x, v.y, v.z, 1)` and return the first three components.
    ///
    /// No perspective divide is performed.
    pub fn transform_point(&self, v: Vector3) -> Vector3 {
        let h = v.to_homogeneous();
        let mut out = [0.0f32; 3];
        for (i, value) in out.iter_mut().enumerate() {
            *value = (0..4).map(|j| self.rows[i][j] * h[j]).sum();
        }
        Vector3::new(out[0], out[1], out[2])
    }

    /// Composition `self · other`: the result applies `other` first, then `self`.
    pub fn compose(&self, other: &Matrix4) -> Matrix4 {
        let mut result = Matrix4::ZERO;
        for i in 0..4 {
            for j in 0..4 {
                result.rows[i][j] = (0..4).map(|k| self.rows[i][k] * other.rows[k][j]).sum();
            }
        }
        result
    }

    pub fn transpose(&self) -> Matrix4 {
        let mut result = Matrix4::ZERO;
        for i in 0..4 {
            for j in 0..4 {
                result.rows[j][i] = self.rows[i][j];
            }
        }
        result
    }

    /// Inverse by Gauss-Jordan elimination with partial pivoting.
    ///
    /// Works on a local copy; `self` is never modified. Returns `None` when a
    /// pivot column has only zero entries or the result is not finite. The
    /// test is scale-free, so tiny but invertible matrices still invert.
    pub fn try_inverse(&self) -> Option<Matrix4> {
        let mut m = self.rows;
        let mut inv = Matrix4::IDENTITY.rows;

        for col in 0..4 {
            let pivot_row = (col..4)
                .max_by(|&a, &b| m[a][col].abs().total_cmp(&m[b][col].abs()))
                .unwrap_or(col);
            let pivot = m[pivot_row][col];
            if pivot == 0.0 || !pivot.is_finite() {
                return None;
            }
            m.swap(col, pivot_row);
            inv.swap(col, pivot_row);

            let factor = 1.0 / pivot;
            scale_row(&mut m[col], factor);
            scale_row(&mut inv[col], factor);

            for row in 0..4 {
                if row == col {
                    continue;
                }
                let f = m[row][col];
                if f == 0.0 {
                    continue;
                }
                let (m_pivot, inv_pivot) = (m[col], inv[col]);
                sub_scaled_row(&mut m[row], &m_pivot, f);
                sub_scaled_row(&mut inv[row], &inv_pivot, f);
            }
        }

        if inv.iter().flatten().all(|v| v.is_finite()) {
            Some(Matrix4::from_rows(inv))
        } else {
            None
        }
    }

    /// True when every element differs by at most `epsilon`
    pub fn approx_eq(&self, other: &Matrix4, epsilon: f32) -> bool {
        self.rows
            .iter()
            .flatten()
            .zip(other.rows.iter().flatten())
            .all(|(a, b)| (a - b).abs() <= epsilon)
    }
}

fn scale_row(row: &mut [f32; 4], factor: f32) {
    for value in row.iter_mut() {
        *value *= factor;
    }
}

fn sub_scaled_row(row: &mut [f32; 4], pivot: &[f32; 4], factor: f32) {
    for (value, p) in row.iter_mut().zip(pivot) {
        *value -= p * factor;
    }
}

impl Default for Matrix4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Matrix4 {
    type Output = Matrix4;

    fn mul(self, other: Matrix4) -> Matrix4 {
        self.compose(&other)
    }
}

impl Mul<Vector3> for Matrix4 {
    type Output = Vector3;

    fn mul(self, v: Vector3) -> Vector3 {
        self.transform_point(v)
    }
}

impl fmt::Display for Matrix4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            writeln!(f, "[{}, {}, {}, {}]", row[0], row[1], row[2], row[3])?;
        }
        Ok(())
    }
}
