// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! Small text helpers shared by field extraction and validation.

/// Collapse all whitespace runs into single spaces and trim the ends.
pub fn squeeze_whitespace(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Keep only the ASCII digits of the input.
pub fn digits(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Parse the leading numeric token as a fraction.
///
/// `"4.6 stars"` parses to `4.6`; text that does not start with a number
/// yields `None`.
pub fn leading_decimal(input: &str) -> Option<f64> {
    let trimmed = input.trim_start();
    let end = trimmed
        .char_indices()
        .take_while(|(_, c)| c.is_ascii_digit() || *c == '.')
        .last()
        .map(|(i, c)| i + c.len_utf8())?;
    trimmed[..end].parse().ok()
}

/// Parse the leading numeric token as an integer count.
///
/// Grouping separators and a wrapping parenthesis are tolerated:
/// `"1,234 reviews"` and `"(256)"` parse to `1234` and `256`.
pub fn leading_count(input: &str) -> Option<u64> {
    let trimmed = input.trim_start().trim_start_matches('(').trim_start();
    let end = trimmed
        .char_indices()
        .take_while(|(_, c)| c.is_ascii_digit() || *c == ',')
        .last()
        .map(|(i, c)| i + c.len_utf8())?;
    let token = digits(&trimmed[..end]);
    if token.is_empty() {
        return None;
    }
    token.parse().ok()
}
