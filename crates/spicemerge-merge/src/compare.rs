//! Pairwise comparison of same-name models.

use spicemerge_parser::Model;

/// Manufacturer tag, ignored when weighing completeness.
const MANUFACTURER: &str = "MFG";

/// Relationship between a retained model and an incoming one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// Same definition; the incoming model adds nothing.
    Same,
    /// Distinct models that must both be kept.
    Different,
    /// The incoming model defines everything the retained one does, and more.
    OtherMoreComplete,
    /// The retained model defines everything the incoming one does, and more.
    RefMoreComplete,
}

/// Compare `reference` (already retained) with `other` (incoming).
///
/// Parameter tokens are compared case-insensitively and any conflicting
/// value makes the models [`Comparison::Different`]. Otherwise the model with
/// fewer missing parameters wins; `MFG` only breaks a tie between models that
/// define exactly the same parameters.
pub fn compare(reference: &Model, other: &Model) -> Comparison {
    if reference.name() != other.name() || reference.kind() != other.kind() {
        return Comparison::Different;
    }

    let Some(missing_in_other) = count_missing(reference, other) else {
        return Comparison::Different;
    };
    let Some(missing_in_reference) = count_missing(other, reference) else {
        return Comparison::Different;
    };

    match (missing_in_reference, missing_in_other) {
        (0, 0) => compare_manufacturer(reference, other),
        (a, b) if a > b => Comparison::OtherMoreComplete,
        (a, b) if a < b => Comparison::RefMoreComplete,
        // Both sides lack parameters the other has: no way to pick one.
        _ => Comparison::Different,
    }
}

/// Count the parameters of `from` that `to` lacks.
///
/// Returns `None` as soon as a shared parameter has a different value.
fn count_missing(from: &Model, to: &Model) -> Option<usize> {
    let mut missing = 0;
    for (key, token) in from.params() {
        if key == MANUFACTURER {
            continue;
        }
        match to.param(key) {
            None => missing += 1,
            Some(other) if !same_text(token, other) => return None,
            Some(_) => {}
        }
    }
    Some(missing)
}

fn compare_manufacturer(reference: &Model, other: &Model) -> Comparison {
    match (reference.param(MANUFACTURER), other.param(MANUFACTURER)) {
        (None, None) => Comparison::Same,
        (None, Some(_)) => Comparison::OtherMoreComplete,
        (Some(_), None) => Comparison::RefMoreComplete,
        (Some(a), Some(b)) if same_text(a, b) => Comparison::Same,
        (Some(_), Some(_)) => Comparison::Different,
    }
}

fn same_text(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}
