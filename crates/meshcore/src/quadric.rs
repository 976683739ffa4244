//! Quadric error metric: a symmetric 3x3 matrix form plus the linear and
//! constant terms of `Q(v) = v^T A v + 2 b^T v + c`.

use glam::{Mat3, Vec3};

/// A symmetric 3x3 matrix, stored as its six distinct entries.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SymMat3 {
    pub m11: f32,
    pub m12: f32,
    pub m13: f32,
    pub m22: f32,
    pub m23: f32,
    pub m33: f32,
}

impl SymMat3 {
    pub const ZERO: SymMat3 = SymMat3 {
        m11: 0.0,
        m12: 0.0,
        m13: 0.0,
        m22: 0.0,
        m23: 0.0,
        m33: 0.0,
    };

    /// The outer product `n * n^T`, symmetric by construction.
    pub fn outer(n: Vec3) -> SymMat3 {
        SymMat3 {
            m11: n.x * n.x,
            m12: n.x * n.y,
            m13: n.x * n.z,
            m22: n.y * n.y,
            m23: n.y * n.z,
            m33: n.z * n.z,
        }
    }

    /// `self * v`, expanding the stored upper triangle across both sides.
    pub fn mul_vec3(&self, v: Vec3) -> Vec3 {
        Vec3::new(
            self.m11 * v.x + self.m12 * v.y + self.m13 * v.z,
            self.m12 * v.x + self.m22 * v.y + self.m23 * v.z,
            self.m13 * v.x + self.m23 * v.y + self.m33 * v.z,
        )
    }

    pub fn determinant(&self) -> f32 {
        Mat3::from(*self).determinant()
    }

    pub fn inverse(&self) -> Mat3 {
        Mat3::from(*self).inverse()
    }
}

impl From<SymMat3> for Mat3 {
    fn from(m: SymMat3) -> Mat3 {
        Mat3::from_cols(
            Vec3::new(m.m11, m.m12, m.m13),
            Vec3::new(m.m12, m.m22, m.m23),
            Vec3::new(m.m13, m.m23, m.m33),
        )
    }
}

impl std::ops::Add for SymMat3 {
    type Output = SymMat3;
    fn add(self, rhs: SymMat3) -> SymMat3 {
        SymMat3 {
            m11: self.m11 + rhs.m11,
            m12: self.m12 + rhs.m12,
            m13: self.m13 + rhs.m13,
            m22: self.m22 + rhs.m22,
            m23: self.m23 + rhs.m23,
            m33: self.m33 + rhs.m33,
        }
    }
}

impl std::ops::AddAssign for SymMat3 {
    fn add_assign(&mut self, rhs: SymMat3) {
        *self = *self + rhs;
    }
}

impl std::ops::Mul<f32> for SymMat3 {
    type Output = SymMat3;
    fn mul(self, s: f32) -> SymMat3 {
        SymMat3 {
            m11: self.m11 * s,
            m12: self.m12 * s,
            m13: self.m13 * s,
            m22: self.m22 * s,
            m23: self.m23 * s,
            m33: self.m33 * s,
        }
    }
}

/// Below this determinant magnitude, `A` is treated as singular and
/// [`Quadric::optimum`] declines to solve for a position.
pub const SINGULARITY_THRESHOLD: f32 = 1e-3;

/// The quadric error form `Q(v) = v^T A v + 2 b^T v + c`, accumulated
/// additively across the planes incident to a vertex.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Quadric {
    pub a: SymMat3,
    pub b: Vec3,
    pub c: f32,
}

impl Quadric {
    pub const ZERO: Quadric = Quadric {
        a: SymMat3::ZERO,
        b: Vec3::ZERO,
        c: 0.0,
    };

    /// The quadric of the plane `{ x : dot(n, x) + d = 0 }`, for unit `n`.
    pub fn from_plane(n: Vec3, d: f32) -> Quadric {
        Quadric {
            a: SymMat3::outer(n),
            b: n * d,
            c: d * d,
        }
    }

    /// The quadric of the plane through `p` with unit normal `n`.
    pub fn from_plane_point(n: Vec3, p: Vec3) -> Quadric {
        Self::from_plane(n, -n.dot(p))
    }

    /// Evaluate `Q(v)`.
    pub fn eval(&self, v: Vec3) -> f32 {
        v.dot(self.a.mul_vec3(v)) + 2.0 * self.b.dot(v) + self.c
    }

    /// Solve for the position minimizing `Q`, along with the error there.
    ///
    /// Returns `None` when `A` is near-singular (`|det(A)| <
    /// SINGULARITY_THRESHOLD`); the caller falls back to a candidate
    /// position (an edge endpoint or midpoint) and evaluates `Q` there
    /// directly instead.
    pub fn optimum(&self) -> Option<(Vec3, f32)> {
        self.optimum_with_threshold(SINGULARITY_THRESHOLD)
    }

    /// As [`Quadric::optimum`], but with a caller-supplied singularity
    /// threshold instead of the default constant.
    pub fn optimum_with_threshold(&self, threshold: f32) -> Option<(Vec3, f32)> {
        if self.a.determinant().abs() < threshold {
            return None;
        }
        let a_inv = self.a.inverse();
        let v = -(a_inv * self.b);
        let cost = -self.b.dot(a_inv * self.b) + self.c;
        Some((v, cost))
    }
}

impl std::ops::Add for Quadric {
    type Output = Quadric;
    fn add(self, rhs: Quadric) -> Quadric {
        Quadric {
            a: self.a + rhs.a,
            b: self.b + rhs.b,
            c: self.c + rhs.c,
        }
    }
}

impl std::ops::AddAssign for Quadric {
    fn add_assign(&mut self, rhs: Quadric) {
        *self = *self + rhs;
    }
}

impl std::ops::Mul<f32> for Quadric {
    type Output = Quadric;
    fn mul(self, s: f32) -> Quadric {
        Quadric {
            a: self.a * s,
            b: self.b * s,
            c: self.c * s,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plane_quadric_is_zero_on_its_own_plane() {
        let n = Vec3::Y;
        let q = Quadric::from_plane_point(n, Vec3::ZERO);
        assert!(q.eval(Vec3::new(5.0, 0.0, -3.0)).abs() < 1e-5);
        assert!(q.eval(Vec3::new(0.0, 1.0, 0.0)) > 0.0);
    }

    #[test]
    fn single_plane_quadric_is_singular() {
        let q = Quadric::from_plane_point(Vec3::Y, Vec3::ZERO);
        assert!(q.optimum().is_none());
    }

    #[test]
    fn three_independent_planes_pin_a_point() {
        let p = Vec3::new(1.0, 2.0, 3.0);
        let q = Quadric::from_plane_point(Vec3::X, p)
            + Quadric::from_plane_point(Vec3::Y, p)
            + Quadric::from_plane_point(Vec3::Z, p);
        let (v, cost) = q.optimum().expect("three independent planes are non-singular");
        assert!((v - p).length() < 1e-3);
        assert!(cost.abs() < 1e-3);
    }

    #[test]
    fn accumulation_is_additive() {
        let q1 = Quadric::from_plane(Vec3::X, 1.0);
        let q2 = Quadric::from_plane(Vec3::Y, 2.0);
        let sum = q1 + q2;
        assert_eq!(sum.a.m11, q1.a.m11 + q2.a.m11);
        assert_eq!(sum.c, q1.c + q2.c);
    }
}
