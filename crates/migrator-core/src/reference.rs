//! External-id codec.
//!
//! Asana goals have no external-id field, so the local goal id is written
//! into the goal description as `[Ref: Ally Id: <id>]`. That tag is the only
//! join key between CSV rows and remote goals; every read and write of it goes
//! through [`ReferenceCodec`].

use regex::Regex;
use std::sync::LazyLock;

static GOAL_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Ref: Ally Id:\s(\d+)").unwrap());

/// Encodes and decodes reference tags embedded in notes text.
pub struct ReferenceCodec;

impl ReferenceCodec {
    /// Tag line for a goal id, followed by a blank line.
    pub fn encode(goal_id: &str) -> String {
        format!("[Ref: Ally Id: {}]\n\n", goal_id)
    }

    /// Goal notes: the tag, then the original description if there is one.
    pub fn goal_notes(goal_id: &str, description: Option<&str>) -> String {
        let mut notes = Self::encode(goal_id);
        if let Some(description) = description {
            notes.push_str(description);
        }
        notes
    }

    /// Recover the local goal id from a remote goal's notes.
    pub fn decode(notes: &str) -> Option<String> {
        if notes.is_empty() {
            return None;
        }
        GOAL_REFERENCE
            .captures(notes)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    /// Status update body: a check-in timestamp tag followed by the note.
    pub fn checkin_text(timestamp: &str, notes: &str) -> String {
        format!("[Ref: Ally Checkin Timestamp: {}]\n\n{}", timestamp, notes)
    }
}
