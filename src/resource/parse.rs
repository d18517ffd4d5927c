//! Provider Output Parsing
//!
//! Turns the raw `--output text` of the provider commands into collections.

use std::collections::BTreeSet;

/// Instance ids, one token per id in output order
pub fn instance_ids(output: &str) -> Vec<String> {
    output.split_whitespace().map(str::to_string).collect()
}

/// Tag keys or tag values
///
/// Text output is tab separated within a reservation and newline separated
/// across reservations. Surrounding spaces belong to the value.
pub fn tag_values(output: &str) -> BTreeSet<String> {
    output
        .split(|c: char| c == '\t' || c == '\n')
        .map(|s| s.strip_suffix('\r').unwrap_or(s))
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Bucket names from a bucket listing
///
/// Each line is `<date> <time> <name>`; the name is the last column. Blank
/// lines carry no name and are skipped.
pub fn bucket_names(output: &str) -> Vec<String> {
    output
        .lines()
        .filter_map(|line| line.split_whitespace().last())
        .map(str::to_string)
        .collect()
}
