//! ID prefix constants and generation.
//!
//! Every entity ID is `{prefix}-{8 hex chars}`, e.g. `idea-a3f8b2c1`.

use uuid::Uuid;

pub const PREFIX_IDEA: &str = "idea";
pub const PREFIX_PACKET: &str = "pkt";
pub const PREFIX_BRIEF: &str = "brf";
pub const PREFIX_RUN: &str = "run";
pub const PREFIX_TELEMETRY: &str = "tel";
pub const PREFIX_OUTCOME: &str = "out";

/// Generate a prefixed random ID.
#[must_use]
pub fn generate_id(prefix: &str) -> String {
    let hex = Uuid::new_v4().simple().to_string();
    format!("{prefix}-{}", &hex[..8])
}

/// Return the prefix portion of an ID, if it has one.
#[must_use]
pub fn prefix_of(id: &str) -> Option<&str> {
    id.split_once('-').map(|(prefix, _)| prefix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn generated_ids_carry_prefix_and_eight_hex_chars() {
        let id = generate_id(PREFIX_PACKET);
        assert!(id.starts_with("pkt-"));
        let suffix = &id["pkt-".len()..];
        assert_eq!(suffix.len(), 8);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn generated_ids_are_unique() {
        let ids: HashSet<String> = (0..500).map(|_| generate_id(PREFIX_IDEA)).collect();
        assert_eq!(ids.len(), 500);
    }

    #[test]
    fn prefix_of_splits_on_first_dash() {
        assert_eq!(prefix_of("idea-deadbeef"), Some("idea"));
        assert_eq!(prefix_of("nodash"), None);
    }
}
