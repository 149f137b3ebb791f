use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::config::TRANSLATION_DENOMINATOR;
use crate::errors::ReflectionError;
use crate::reflections::MillerIndex;
use crate::Result;

/// A crystallographic symmetry operation acting on fractional coordinates:
/// `x' = R·x + t`.
///
/// The translation is stored exactly as integers in units of
/// 1/[`TRANSLATION_DENOMINATOR`] and is kept in `[0, 24)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SymOp {
    /// Integer rotation matrix with determinant ±1
    pub rotation: Matrix3<i32>,
    /// Fractional translation in units of 1/24
    pub translation: Vector3<i32>,
}

impl SymOp {
    /// Create a new symmetry operation. The translation is wrapped into `[0, 24)`.
    pub fn new(rotation: Matrix3<i32>, translation: Vector3<i32>) -> Self {
        Self {
            rotation,
            translation: translation.map(|t| t.rem_euclid(TRANSLATION_DENOMINATOR)),
        }
    }

    /// Create identity operation
    pub fn identity() -> Self {
        Self {
            rotation: Matrix3::identity(),
            translation: Vector3::zeros(),
        }
    }

    /// Parse a coordinate triplet such as `"-x+1/2,y,-z+3/4"`.
    ///
    /// Each comma-separated component is one row of the rotation plus its
    /// translation. Translations must be exact multiples of 1/24.
    pub fn from_triplet(triplet: &str) -> Result<Self> {
        let parse_err = |reason: String| ReflectionError::SymopParse {
            triplet: triplet.to_string(),
            reason,
        };

        let rows: Vec<&str> = triplet.split(',').collect();
        if rows.len() != 3 {
            return Err(parse_err(format!(
                "expected 3 comma-separated components, found {}",
                rows.len()
            )));
        }

        let mut rotation = Matrix3::zeros();
        let mut translation = Vector3::zeros();
        for (row, expr) in rows.iter().enumerate() {
            let (coeffs, tran) = parse_component(expr.trim()).map_err(parse_err)?;
            for (col, coeff) in coeffs.iter().enumerate() {
                rotation[(row, col)] = *coeff;
            }
            translation[row] = tran;
        }

        if rotation.iter().any(|r: &i32| r.abs() > 1) {
            return Err(parse_err("rotation entries must be -1, 0 or 1".to_string()));
        }

        let op = SymOp::new(rotation, translation);
        match op.determinant() {
            1 | -1 => Ok(op),
            det => Err(parse_err(format!(
                "rotation part has determinant {det}, expected ±1"
            ))),
        }
    }

    /// Render the operation as a coordinate triplet, e.g. `-x+1/2,y,-z`.
    pub fn triplet(&self) -> String {
        (0..3)
            .map(|row| {
                let mut expr = String::new();
                for (col, axis) in ['x', 'y', 'z'].iter().enumerate() {
                    match self.rotation[(row, col)] {
                        0 => {}
                        1 if expr.is_empty() => expr.push(*axis),
                        1 => {
                            expr.push('+');
                            expr.push(*axis);
                        }
                        -1 => {
                            expr.push('-');
                            expr.push(*axis);
                        }
                        c => expr.push_str(&format!("{c:+}{axis}")),
                    }
                }
                let t = self.translation[row];
                if t != 0 {
                    let g = gcd(t, TRANSLATION_DENOMINATOR);
                    expr.push_str(&format!("+{}/{}", t / g, TRANSLATION_DENOMINATOR / g));
                }
                if expr.is_empty() {
                    expr.push('0');
                }
                expr
            })
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Check if this is the identity operation
    pub fn is_identity(&self) -> bool {
        self.rotation == Matrix3::identity() && self.translation == Vector3::zeros()
    }

    pub fn determinant(&self) -> i32 {
        let r = &self.rotation;
        r[(0, 0)] * (r[(1, 1)] * r[(2, 2)] - r[(1, 2)] * r[(2, 1)])
            - r[(0, 1)] * (r[(1, 0)] * r[(2, 2)] - r[(1, 2)] * r[(2, 0)])
            + r[(0, 2)] * (r[(1, 0)] * r[(2, 1)] - r[(1, 1)] * r[(2, 0)])
    }

    /// Composition `self ∘ other`: apply `other` first, then `self`.
    pub fn compose(&self, other: &SymOp) -> SymOp {
        SymOp::new(
            self.rotation * other.rotation,
            self.rotation * other.translation + self.translation,
        )
    }

    /// Inverse operation `(R⁻¹, -R⁻¹·t)`.
    ///
    /// Exact: the adjugate divided by a determinant of ±1 stays integral.
    pub fn inverse(&self) -> SymOp {
        let r = &self.rotation;
        let det = self.determinant();
        // Indices left over after striking row/column k
        const REST: [[usize; 2]; 3] = [[1, 2], [0, 2], [0, 1]];
        let cofactor = |i: usize, j: usize| -> i32 {
            let (rows, cols) = (REST[i], REST[j]);
            let minor = r[(rows[0], cols[0])] * r[(rows[1], cols[1])]
                - r[(rows[0], cols[1])] * r[(rows[1], cols[0])];
            if (i + j) % 2 == 0 {
                minor
            } else {
                -minor
            }
        };
        // inverse = adj(R) / det, adj(R)[i][j] = cofactor(j, i)
        let inv = Matrix3::from_fn(|i, j| cofactor(j, i) * det);
        SymOp::new(inv, -(inv * self.translation))
    }

    /// Same operation with the rotation negated, i.e. combined with Friedel inversion
    /// in reciprocal space. The translation is unchanged.
    pub fn friedel_negated(&self) -> SymOp {
        SymOp {
            rotation: -self.rotation,
            translation: self.translation,
        }
    }

    /// Same rotation with an additional (centering) translation.
    pub fn translated_by(&self, shift: &Vector3<i32>) -> SymOp {
        SymOp::new(self.rotation, self.translation + shift)
    }

    /// Miller index transformed by this operation, `h' = h·R`.
    #[inline]
    pub fn apply_to_hkl(&self, hkl: &MillerIndex) -> MillerIndex {
        let r = &self.rotation;
        [
            hkl[0] * r[(0, 0)] + hkl[1] * r[(1, 0)] + hkl[2] * r[(2, 0)],
            hkl[0] * r[(0, 1)] + hkl[1] * r[(1, 1)] + hkl[2] * r[(2, 1)],
            hkl[0] * r[(0, 2)] + hkl[1] * r[(1, 2)] + hkl[2] * r[(2, 2)],
        ]
    }

    /// `h·t` in units of 1/24 of a turn. Computed in `i64` so any `i32` index is safe.
    #[inline]
    pub fn hkl_dot_translation(&self, hkl: &MillerIndex) -> i64 {
        hkl_dot(hkl, &self.translation)
    }

    /// Phase shift (radians) picked up by reflection `h` under this operation:
    /// `φ(h·R) = φ(h) - 2π·h·t`.
    pub fn phase_shift(&self, hkl: &MillerIndex) -> f64 {
        -2.0 * PI * self.hkl_dot_translation(hkl) as f64 / f64::from(TRANSLATION_DENOMINATOR)
    }

    /// Phase shift in degrees. Exact for the 1/24 grid: `-15·(h·t₂₄)`.
    pub fn phase_shift_degrees(&self, hkl: &MillerIndex) -> f64 {
        // |h·t₂₄| < 2^53, so the conversion is exact
        -f64::from(360 / TRANSLATION_DENOMINATOR) * self.hkl_dot_translation(hkl) as f64
    }
}

impl Default for SymOp {
    fn default() -> Self {
        Self::identity()
    }
}

/// `h·v` for an integer vector `v`.
#[inline]
pub(crate) fn hkl_dot(hkl: &MillerIndex, v: &Vector3<i32>) -> i64 {
    (0..3).map(|i| i64::from(hkl[i]) * i64::from(v[i])).sum()
}

fn gcd(a: i32, b: i32) -> i32 {
    let (mut a, mut b) = (a.abs(), b.abs());
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a.max(1)
}

/// Parse one component like `-x+1/2` or `y-z`.
///
/// Returns (`[coeff_x, coeff_y, coeff_z]`, translation in 1/24 units).
fn parse_component(expr: &str) -> std::result::Result<([i32; 3], i32), String> {
    if expr.is_empty() {
        return Err("empty component".to_string());
    }

    let mut coeffs = [0i32; 3];
    let mut tran = 0i32;
    let chars: Vec<char> = expr.chars().filter(|c| !c.is_whitespace()).collect();
    let mut i = 0;

    while i < chars.len() {
        let sign = match chars[i] {
            '-' => {
                i += 1;
                -1
            }
            '+' => {
                i += 1;
                1
            }
            _ => 1,
        };
        let Some(&c) = chars.get(i) else {
            return Err(format!("dangling sign in '{expr}'"));
        };

        match c.to_ascii_lowercase() {
            axis @ ('x' | 'y' | 'z') => {
                let col = (axis as u8 - b'x') as usize;
                coeffs[col] += sign;
                i += 1;
            }
            '0'..='9' => {
                let (numerator, denominator, consumed) = parse_fraction(&chars[i..])?;
                let scaled = numerator
                    .checked_mul(TRANSLATION_DENOMINATOR)
                    .ok_or_else(|| format!("translation {numerator}/{denominator} is out of range"))?;
                if scaled % denominator != 0 {
                    return Err(format!(
                        "translation {numerator}/{denominator} is not a multiple of 1/{TRANSLATION_DENOMINATOR}"
                    ));
                }
                // Whole turns do not change the operation
                tran = (tran + sign * (scaled / denominator).rem_euclid(TRANSLATION_DENOMINATOR))
                    .rem_euclid(TRANSLATION_DENOMINATOR);
                i += consumed;
            }
            other => return Err(format!("unexpected character '{other}'")),
        }
    }

    Ok((coeffs, tran))
}

/// Parse an integer or a fraction like `1/2`. Returns (numerator, denominator, chars consumed).
fn parse_fraction(chars: &[char]) -> std::result::Result<(i32, i32, usize), String> {
    let (numerator, mut i) = parse_digits(chars)?;

    let mut denominator = 1i32;
    if i < chars.len() && chars[i] == '/' {
        let (value, consumed) = parse_digits(&chars[i + 1..])
            .map_err(|_| "missing or zero denominator".to_string())?;
        if value == 0 {
            return Err("missing or zero denominator".to_string());
        }
        denominator = value;
        i += 1 + consumed;
    }

    Ok((numerator, denominator, i))
}

// Leading run of ASCII digits as an i32
fn parse_digits(chars: &[char]) -> std::result::Result<(i32, usize), String> {
    let len = chars.iter().take_while(|c| c.is_ascii_digit()).count();
    let digits: String = chars[..len].iter().collect();
    let value = digits
        .parse::<i32>()
        .map_err(|e| format!("invalid number '{digits}': {e}"))?;
    Ok((value, len))
}
