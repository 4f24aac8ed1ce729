//! Version math for release types
//!
//! Parsing and ordering come from the `semver` crate. Increment rules match
//! the `inc` behaviour of the npm `semver` package, so a prerelease that is
//! released (`1.0.0-beta` with `major`) becomes `1.0.0` instead of `2.0.0`.

use crate::domain::ReleaseType;
use crate::error::{ReleaseError, Result};
use semver::{BuildMetadata, Prerelease, Version};

/// Parse a version literal found in a target file
pub fn parse(literal: &str) -> Result<Version> {
    Version::parse(literal).map_err(|e| {
        ReleaseError::version(format!(
            "'{}' is not a valid semantic version: {}",
            literal, e
        ))
    })
}

/// Parse `literal` and compute the next version for `release_type`
pub fn bump(literal: &str, release_type: ReleaseType, preid: Option<&str>) -> Result<Version> {
    let current = parse(literal)?;
    increment(&current, release_type, preid)
}

/// Compute the next version for `release_type`.
///
/// Build metadata is always dropped. `preid` only affects release types that
/// produce a pre-release.
///
/// # Returns
/// * `Ok(Version)` - A version strictly greater than `current`
/// * `Err` - If `preid` is not a valid identifier, a numeric identifier
///   overflows, or the result would not be greater than `current`
pub fn increment(
    current: &Version,
    release_type: ReleaseType,
    preid: Option<&str>,
) -> Result<Version> {
    let mut next = current.clone();
    next.build = BuildMetadata::EMPTY;
    let has_pre = !current.pre.is_empty();

    match release_type {
        ReleaseType::Major => {
            if !has_pre || current.minor != 0 || current.patch != 0 {
                next.major = bump_component(current.major, "major")?;
            }
            next.minor = 0;
            next.patch = 0;
            next.pre = Prerelease::EMPTY;
        }
        ReleaseType::Minor => {
            if !has_pre || current.patch != 0 {
                next.minor = bump_component(current.minor, "minor")?;
            }
            next.patch = 0;
            next.pre = Prerelease::EMPTY;
        }
        ReleaseType::Patch => {
            if !has_pre {
                next.patch = bump_component(current.patch, "patch")?;
            }
            next.pre = Prerelease::EMPTY;
        }
        ReleaseType::Premajor => {
            next.major = bump_component(current.major, "major")?;
            next.minor = 0;
            next.patch = 0;
            next.pre = initial_prerelease(preid)?;
        }
        ReleaseType::Preminor => {
            next.minor = bump_component(current.minor, "minor")?;
            next.patch = 0;
            next.pre = initial_prerelease(preid)?;
        }
        ReleaseType::Prepatch => {
            next.patch = bump_component(current.patch, "patch")?;
            next.pre = initial_prerelease(preid)?;
        }
        ReleaseType::Prerelease => {
            if has_pre {
                next.pre = next_prerelease(&current.pre, preid)?;
            } else {
                next.patch = bump_component(current.patch, "patch")?;
                next.pre = initial_prerelease(preid)?;
            }
        }
    }

    if next <= *current {
        return Err(ReleaseError::version(format!(
            "{} release of {} would produce {}, which is not greater",
            release_type, current, next
        )));
    }

    Ok(next)
}

fn bump_component(value: u64, name: &str) -> Result<u64> {
    value.checked_add(1).ok_or_else(|| {
        ReleaseError::version(format!("{} version {} cannot be incremented", name, value))
    })
}

/// Reject a pre-release identifier before any work starts
pub fn validate_preid(preid: &str) -> Result<()> {
    if preid.trim().is_empty() {
        return Err(ReleaseError::invalid_argument(
            "pre-release identifier must not be empty",
        ));
    }
    prerelease_from(preid).map(|_| ())
}

/// `<preid>.0`, or `0` when no identifier is given
fn initial_prerelease(preid: Option<&str>) -> Result<Prerelease> {
    match preid {
        Some(id) => prerelease_from(&format!("{}.0", id)),
        None => prerelease_from("0"),
    }
}

fn next_prerelease(current: &Prerelease, preid: Option<&str>) -> Result<Prerelease> {
    let mut parts: Vec<String> = current.as_str().split('.').map(String::from).collect();

    if let Some(id) = preid {
        if parts.first().map(String::as_str) != Some(id) {
            return initial_prerelease(Some(id));
        }
    }

    match parts.iter().rposition(|part| is_numeric(part)) {
        Some(index) => {
            let incremented = parts[index]
                .parse::<u64>()
                .ok()
                .and_then(|value| value.checked_add(1))
                .ok_or_else(|| {
                    ReleaseError::version(format!(
                        "pre-release identifier '{}' is too large to increment",
                        parts[index]
                    ))
                })?;
            parts[index] = incremented.to_string();
        }
        None => parts.push("0".to_string()),
    }

    prerelease_from(&parts.join("."))
}

fn prerelease_from(text: &str) -> Result<Prerelease> {
    Prerelease::new(text).map_err(|e| {
        ReleaseError::invalid_argument(format!(
            "invalid pre-release identifier '{}': {}",
            text, e
        ))
    })
}

fn is_numeric(part: &str) -> bool {
    !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit())
}
