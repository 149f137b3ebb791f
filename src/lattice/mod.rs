// Lattice module: unit cell geometry needed for resolution calculations

// ======================== MODULE DECLARATIONS ========================
pub mod unit_cell;

// ======================== UNIT CELL ========================
pub use unit_cell::UnitCell; // struct - six cell parameters (Å, degrees)
// UnitCell impl methods:
//   new(a, b, c, alpha, beta, gamma) -> Result<Self>               - validated construction
//   volume(&self) -> f64                                           - cell volume
//   orthogonalization_matrix(&self) -> Matrix3<f64>                - fractional → Cartesian (columns a, b, c)
//   metric_tensor(&self) -> Matrix3<f64>                           - G = AᵀA
//   reciprocal_metric_tensor(&self) -> Result<Matrix3<f64>>        - G* = G⁻¹
//   d_spacing(&self, hkl: &MillerIndex) -> Result<f64>             - 1/sqrt(hᵀG*h)
//   is_isomorphous_to(&self, other: &UnitCell, threshold: f64) -> bool
