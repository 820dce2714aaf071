//! Free-text extraction helpers.
//!
//! Goal exports embed identifiers and check-in details inside plain text
//! cells. Every helper returns the first capture group of its pattern, or
//! `None` when the input is blank or the pattern does not match.

use regex::Regex;
use std::sync::LazyLock;

static GOAL_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Id:\s(\d+)").unwrap());

static GOAL_WEIGHT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"weight:\s(\d+)").unwrap());

static CHECKIN_TIMESTAMP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\[.*UTC.*\]).*").unwrap());

static CHECKIN_STATUS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Status:\s(.*)").unwrap());

/// Everything between `Note:` and the last `Metric Name:` marker.
static CHECKIN_NOTES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Note:\s(.*[\s\S]+)Metric Name:").unwrap());

/// Parse the goal id out of an alignment cell such as `weight: 1, Id: 42`.
pub fn parse_goal_id(input: &str) -> Option<String> {
    capture(&GOAL_ID, input)
}

/// Parse the contribution weight out of an alignment cell.
pub fn parse_goal_weight(input: &str) -> Option<String> {
    capture(&GOAL_WEIGHT, input)
}

/// Parse the bracketed UTC timestamp from a check-in blob.
pub fn parse_checkin_timestamp(input: &str) -> Option<String> {
    capture(&CHECKIN_TIMESTAMP, input)
}

/// Parse the status label from a check-in blob (rest of the line).
pub fn parse_checkin_status(input: &str) -> Option<String> {
    capture(&CHECKIN_STATUS, input)
}

/// Parse the free-form note from a check-in blob.
pub fn parse_checkin_notes(input: &str) -> Option<String> {
    capture(&CHECKIN_NOTES, input)
}

fn capture(regex: &Regex, input: &str) -> Option<String> {
    if input.is_empty() {
        return None;
    }
    regex
        .captures(input)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
