// Occupation matching: the static catalog and the weighted scorer.
// Both are pure; the catalog is shared read-only behind an Arc.

pub mod catalog;
pub mod handlers;
pub mod scorer;
