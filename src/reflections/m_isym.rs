//! M/ISYM packing: a single integer carrying the symmetry-operation id and
//! the partiality flag, `code = isym + 256·partial`.

use crate::config::{MAX_ISYM, M_ISYM_STRIDE};
use crate::errors::{ErrorInfo, ReflectionError};
use crate::Result;

/// Pack `isym` (1..=255) and the partiality flag.
pub fn encode_m_isym(isym: i32, partial: bool) -> Result<i32> {
    if !(1..=MAX_ISYM).contains(&isym) {
        return Err(ReflectionError::encoding(
            ErrorInfo::new(format!("ISYM must lie in [1, {MAX_ISYM}]")).with_context("isym", isym),
        ));
    }
    Ok(isym + M_ISYM_STRIDE * i32::from(partial))
}

/// Unpack a code into `(isym, partial)`.
pub fn decode_m_isym(code: i32) -> Result<(i32, bool)> {
    let isym = code % M_ISYM_STRIDE;
    if code < 0 || isym == 0 {
        return Err(ReflectionError::encoding(
            ErrorInfo::new("M/ISYM code does not carry a valid ISYM").with_context("code", code),
        ));
    }
    Ok((isym, code / M_ISYM_STRIDE != 0))
}

/// Batch [`encode_m_isym`]. `partial` may be empty, meaning no partiality column.
pub fn encode_m_isym_column(isym: &[i32], partial: &[bool]) -> Result<Vec<i32>> {
    if !partial.is_empty() && partial.len() != isym.len() {
        return Err(ReflectionError::validation(
            ErrorInfo::new("ISYM and partiality columns differ in length")
                .with_context("isym_rows", isym.len())
                .with_context("partial_rows", partial.len()),
        ));
    }
    isym.iter()
        .enumerate()
        .map(|(row, &value)| encode_m_isym(value, partial.get(row).copied().unwrap_or(false)))
        .collect()
}

/// Batch [`decode_m_isym`], returning separate ISYM and partiality columns.
pub fn decode_m_isym_column(codes: &[i32]) -> Result<(Vec<i32>, Vec<bool>)> {
    let mut isym = Vec::with_capacity(codes.len());
    let mut partial = Vec::with_capacity(codes.len());
    for (row, &code) in codes.iter().enumerate() {
        let (value, flag) = decode_m_isym(code).map_err(|err| match err {
            ReflectionError::Encoding(info) => {
                ReflectionError::Encoding(info.with_context("row", row))
            }
            other => other,
        })?;
        isym.push(value);
        partial.push(flag);
    }
    Ok((isym, partial))
}
