// Conversion between amplitude/phase pairs and complex structure factors

use num_complex::Complex64;

use crate::errors::{ErrorInfo, ReflectionError};
use crate::reflections::phases::canonicalize_phase;
use crate::Result;

/// `F = |F|·exp(iφ)` with φ in degrees.
pub fn to_structurefactor(amplitudes: &[f64], phases: &[f64]) -> Result<Vec<Complex64>> {
    if amplitudes.len() != phases.len() {
        return Err(ReflectionError::validation(
            ErrorInfo::new("amplitude and phase columns differ in length")
                .with_context("amplitudes", amplitudes.len())
                .with_context("phases", phases.len()),
        ));
    }
    Ok(amplitudes
        .iter()
        .zip(phases)
        .map(|(&amplitude, &phase)| Complex64::from_polar(amplitude, phase.to_radians()))
        .collect())
}

/// Split complex structure factors into amplitudes and canonical phases (degrees).
pub fn from_structurefactor(structure_factors: &[Complex64]) -> (Vec<f64>, Vec<f64>) {
    structure_factors
        .iter()
        .map(|sf| (sf.norm(), canonicalize_phase(sf.arg().to_degrees())))
        .unzip()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_polar_conversion() {
        let sfs = to_structurefactor(&[2.0, 1.0], &[90.0, 180.0]).unwrap();
        assert_relative_eq!(sfs[0].re, 0.0, epsilon = 1e-12);
        assert_relative_eq!(sfs[0].im, 2.0, epsilon = 1e-12);
        assert_relative_eq!(sfs[1].re, -1.0, epsilon = 1e-12);

        let (amplitudes, phases) = from_structurefactor(&sfs);
        assert_relative_eq!(amplitudes[0], 2.0, epsilon = 1e-12);
        assert_relative_eq!(phases[0], 90.0, epsilon = 1e-9);
        assert_relative_eq!(phases[1].abs(), 180.0, epsilon = 1e-9);
    }

    #[test]
    fn test_length_mismatch() {
        assert!(to_structurefactor(&[1.0], &[]).is_err());
    }
}
