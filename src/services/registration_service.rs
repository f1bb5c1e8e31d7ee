use mongodb::bson::{Bson, Document};

use crate::database::Repository;
use crate::utils::AppError;

pub async fn add_registration(repo: &dyn Repository, registration: Document) -> Result<(), AppError> {
    repo.insert_registration(registration).await
}

pub async fn list_registrations(repo: &dyn Repository) -> Result<Vec<Document>, AppError> {
    repo.list_registrations().await
}

/// Drops every pending registration; `NotFound` when there was nothing to drop
pub async fn clear_registrations(repo: &dyn Repository) -> Result<u64, AppError> {
    match repo.clear_registrations().await? {
        0 => Err(AppError::NotFound("No newPrint data found".to_string())),
        deleted => Ok(deleted),
    }
}

/// Lowest fingerprint slot not taken by any user
pub async fn next_serial(repo: &dyn Repository) -> Result<i64, AppError> {
    let fingerprints = repo.user_fingerprints().await?;
    Ok(first_free_serial(&fingerprints))
}

/// Scans the sorted numeric fingerprints for the first gap starting at 1.
/// Non-numeric values are skipped.
pub fn first_free_serial(fingerprints: &[Bson]) -> i64 {
    let mut serials: Vec<i64> = fingerprints.iter().filter_map(parse_serial).collect();
    serials.sort_unstable();

    let mut next = 1;
    for serial in serials {
        if serial == next {
            next += 1;
        }
    }
    next
}

/// Integer value of a stored fingerprint. Numbers truncate toward zero;
/// strings use their leading integer (`" 12abc"` is 12).
pub fn parse_serial(value: &Bson) -> Option<i64> {
    match value {
        Bson::Int32(n) => Some(i64::from(*n)),
        Bson::Int64(n) => Some(*n),
        Bson::Double(f) if f.is_finite() => Some(f.trunc() as i64),
        Bson::String(s) => parse_leading_int(s),
        _ => None,
    }
}

fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (sign, rest) = match s.as_bytes().first() {
        Some(b'-') => (-1, &s[1..]),
        Some(b'+') => (1, &s[1..]),
        _ => (1, s),
    };

    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());

    if digits_end == 0 {
        return None;
    }

    rest[..digits_end].parse::<i64>().ok().map(|n| sign * n)
}
