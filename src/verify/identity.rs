//! National id (CPF) validation.
//!
//! Checks are syntactic: an 11-digit id with two mod-11 check digits, unique
//! among registered fans. Nothing here proves the id belongs to the user.

use crate::db::Repository;
use crate::errors::AppError;

/// Number of digits in a normalized id.
pub const ID_LEN: usize = 11;

/// Strip everything that is not an ASCII digit.
pub fn normalize(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Check length, repeated digits and both check digits of a normalized id.
pub fn is_structurally_valid(digits: &str) -> bool {
    if digits.len() != ID_LEN || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }

    let values: Vec<u32> = digits.bytes().map(|b| u32::from(b - b'0')).collect();
    if values.iter().all(|&d| d == values[0]) {
        return false;
    }

    let first = check_digit(&values[..9]);
    let mut with_first = values[..9].to_vec();
    with_first.push(first);
    let second = check_digit(&with_first);

    values[9] == first && values[10] == second
}

/// Weighted mod-11 check digit. Weights run from `len + 1` down to 2.
pub fn check_digit(digits: &[u32]) -> u32 {
    let top = digits.len() as u32 + 1;
    let sum: u32 = digits
        .iter()
        .zip((2..=top).rev())
        .map(|(d, w)| d * w)
        .sum();
    let rest = 11 - (sum % 11);
    if rest > 9 {
        0
    } else {
        rest
    }
}

/// True iff a fan with this normalized id is already stored.
pub async fn is_duplicate(repo: &Repository, digits: &str) -> Result<bool, AppError> {
    Ok(repo.find_fan_by_national_id(digits).await?.is_some())
}

/// Normalize, checksum and duplicate-check a submitted id, returning the digits.
///
/// The duplicate check is a plain read before the insert; concurrent
/// registrations of the same id are caught by the UNIQUE column instead.
pub async fn validate_new_fan(repo: &Repository, raw: &str) -> Result<String, AppError> {
    let digits = normalize(raw);

    if !is_structurally_valid(&digits) {
        return Err(AppError::Validation(
            "National id is invalid. Check the digits and try again".to_string(),
        ));
    }

    if is_duplicate(repo, &digits).await? {
        return Err(AppError::Duplicate(
            "National id is already registered".to_string(),
        ));
    }

    Ok(digits)
}
