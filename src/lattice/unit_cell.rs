use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

use crate::config::CELL_TOLERANCE;
use crate::errors::{ErrorInfo, ReflectionError};
use crate::reflections::MillerIndex;
use crate::Result;

/// Crystallographic unit cell: edge lengths in Å, angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitCell {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

impl UnitCell {
    /// Construct a validated cell. Lengths must be positive, angles in (0°, 180°),
    /// and the six parameters must describe a non-degenerate volume.
    pub fn new(a: f64, b: f64, c: f64, alpha: f64, beta: f64, gamma: f64) -> Result<Self> {
        let cell = Self {
            a,
            b,
            c,
            alpha,
            beta,
            gamma,
        };
        let invalid = |reason: &str| {
            ReflectionError::validation(
                ErrorInfo::new(format!("invalid unit cell: {reason}"))
                    .with_context("cell", format!("{:?}", cell.parameters())),
            )
        };

        if [a, b, c].iter().any(|l| !l.is_finite() || *l <= 0.0) {
            return Err(invalid("edge lengths must be positive"));
        }
        if [alpha, beta, gamma]
            .iter()
            .any(|angle| !angle.is_finite() || *angle <= 0.0 || *angle >= 180.0)
        {
            return Err(invalid("angles must lie strictly between 0 and 180 degrees"));
        }
        if cell.volume_factor() <= CELL_TOLERANCE {
            return Err(invalid("angles do not span a three-dimensional cell"));
        }
        Ok(cell)
    }

    /// `[a, b, c, α, β, γ]`
    pub fn parameters(&self) -> [f64; 6] {
        [self.a, self.b, self.c, self.alpha, self.beta, self.gamma]
    }

    // 1 - cos²α - cos²β - cos²γ + 2 cosα cosβ cosγ
    fn volume_factor(&self) -> f64 {
        let (ca, cb, cg) = (
            self.alpha.to_radians().cos(),
            self.beta.to_radians().cos(),
            self.gamma.to_radians().cos(),
        );
        1.0 - ca * ca - cb * cb - cg * cg + 2.0 * ca * cb * cg
    }

    pub fn volume(&self) -> f64 {
        self.a * self.b * self.c * self.volume_factor().max(0.0).sqrt()
    }

    /// Fractional → Cartesian matrix; its columns are the basis vectors a, b, c.
    ///
    /// a along x, b in the xy-plane.
    pub fn orthogonalization_matrix(&self) -> Matrix3<f64> {
        let (alpha, beta, gamma) = (
            self.alpha.to_radians(),
            self.beta.to_radians(),
            self.gamma.to_radians(),
        );
        let (ca, cb, cg) = (alpha.cos(), beta.cos(), gamma.cos());
        let (sb, sg) = (beta.sin(), gamma.sin());

        // cos(α*) of the reciprocal cell
        let cas = (cb * cg - ca) / (sb * sg);
        let sas = (1.0 - cas * cas).max(0.0).sqrt();

        Matrix3::new(
            self.a, cg * self.b, cb * self.c,
            0.0, sg * self.b, -sb * cas * self.c,
            0.0, 0.0, sb * sas * self.c,
        )
    }

    /// Metric tensor G = Aᵀ·A.
    pub fn metric_tensor(&self) -> Matrix3<f64> {
        let basis = self.orthogonalization_matrix();
        basis.transpose() * basis
    }

    /// Reciprocal metric tensor G* = G⁻¹.
    pub fn reciprocal_metric_tensor(&self) -> Result<Matrix3<f64>> {
        self.metric_tensor().try_inverse().ok_or_else(|| {
            ReflectionError::validation(
                ErrorInfo::new("unit cell metric tensor is singular")
                    .with_context("cell", format!("{:?}", self.parameters())),
            )
        })
    }

    /// Lattice-plane spacing for one index given a precomputed G*.
    pub fn d_spacing_with(reciprocal_metric: &Matrix3<f64>, hkl: &MillerIndex) -> f64 {
        let h = Vector3::new(f64::from(hkl[0]), f64::from(hkl[1]), f64::from(hkl[2]));
        let inv_d_squared = h.dot(&(reciprocal_metric * h));
        1.0 / inv_d_squared.sqrt()
    }

    /// Lattice-plane spacing `d = 1/sqrt(hᵀ·G*·h)`; `(0,0,0)` gives `+∞`.
    pub fn d_spacing(&self, hkl: &MillerIndex) -> Result<f64> {
        Ok(Self::d_spacing_with(&self.reciprocal_metric_tensor()?, hkl))
    }

    /// Whether every parameter differs by no more than `threshold` (in units
    /// of 100 Å or 100°) from the corresponding parameter of `other`.
    pub fn is_isomorphous_to(&self, other: &UnitCell, threshold: f64) -> bool {
        self.parameters()
            .iter()
            .zip(other.parameters().iter())
            .all(|(p1, p2)| (p1 - p2).abs() / 100.0 <= threshold)
    }
}
