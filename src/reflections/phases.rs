use crate::config::{PHASE_HALF_PERIOD, PHASE_PERIOD};

/// Wrap a phase in degrees into the canonical interval (-180, 180].
///
/// `((φ + 180) mod 360) - 180`, with the left endpoint folded onto the right
/// one so that both -180 and 180 map to 180. NaN passes through.
pub fn canonicalize_phase(phase: f64) -> f64 {
    let wrapped = (phase + PHASE_HALF_PERIOD).rem_euclid(PHASE_PERIOD) - PHASE_HALF_PERIOD;
    if wrapped <= -PHASE_HALF_PERIOD {
        PHASE_HALF_PERIOD
    } else {
        wrapped
    }
}

/// Element-wise [`canonicalize_phase`].
pub fn canonicalize_phases(phases: &[f64]) -> Vec<f64> {
    phases.iter().map(|&phase| canonicalize_phase(phase)).collect()
}

/// `coeff·(φ + shift)` canonicalized, the phase update shared by ASU reduction and expansion.
#[inline]
pub fn transform_phase(phase: f64, coeff: f64, shift: f64) -> f64 {
    canonicalize_phase(coeff * (phase + shift))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_boundary_values() {
        assert_eq!(canonicalize_phase(180.0), 180.0);
        assert_eq!(canonicalize_phase(-180.0), 180.0);
        assert_eq!(canonicalize_phase(540.0), 180.0);
        assert_eq!(canonicalize_phase(270.0), -90.0);
        assert_eq!(canonicalize_phase(0.0), 0.0);
        assert_eq!(canonicalize_phase(360.0), 0.0);
    }

    #[test]
    fn test_output_range() {
        let mut phase = -1000.0;
        while phase < 1000.0 {
            let out = canonicalize_phase(phase);
            assert!(out > -180.0 && out <= 180.0, "{phase} -> {out}");
            // Same angle modulo 360
            let turns = (phase - out) / 360.0;
            assert_relative_eq!(turns, turns.round(), epsilon = 1e-9);
            phase += 7.3;
        }
    }

    #[test]
    fn test_nan_passes_through() {
        assert!(canonicalize_phase(f64::NAN).is_nan());
    }

    #[test]
    fn test_transform_phase() {
        assert_eq!(transform_phase(30.0, -1.0, -180.0), 150.0);
        assert_eq!(transform_phase(170.0, 1.0, 90.0), -100.0);
    }
}
