//! Wire codec - newline-delimited JSON in both directions
//!
//! Outbound: one self-contained JSON object per snapshot, terminated by a
//! single newline so the peer can frame by line. Inbound: one buffer's worth
//! of bytes, trimmed and parsed as `{"action": int, "interval": float}`.
//! Decode failure is always recoverable - the caller keeps its previous
//! command and the loop continues.

use super::command::Command;
use super::snapshot::Snapshot;

/// Codec errors
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Inbound payload is not valid UTF-8")]
    Utf8(#[from] std::str::Utf8Error),
}

/// Encode a snapshot as one newline-terminated JSON line
pub fn encode(snapshot: &Snapshot) -> Result<String, CodecError> {
    let mut line = serde_json::to_string(snapshot)?;
    line.push('\n');
    Ok(line)
}

/// Decode one inbound buffer into a command. All-or-nothing: a malformed
/// payload yields an error and no partial command.
pub fn decode(raw: &[u8]) -> Result<Command, CodecError> {
    let text = std::str::from_utf8(raw)?;
    Ok(serde_json::from_str(text.trim())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::command::ACTION_APPLY_FORCE;

    /// Every key of the outbound wire schema, in order
    const WIRE_KEYS: [&str; 22] = [
        "HasFishingRod",
        "CastingPower",
        "IsFishing",
        "IsNibbling",
        "PlayerTileX",
        "PlayerTileY",
        "MinigameActive",
        "FishPosition",
        "BobberBarPosition",
        "BobberBarHeight",
        "FishTargetPosition",
        "DistanceFromCatching",
        "TreasureAppeared",
        "TreasurePosition",
        "BobberBarVelocity",
        "FishVelocity",
        "Difficulty",
        "RodType",
        "Location",
        "Weather",
        "Season",
        "TimeOfDay",
    ];

    #[test]
    fn encode_emits_every_wire_key() {
        let line = encode(&Snapshot::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        let object = value.as_object().unwrap();
        for key in WIRE_KEYS {
            assert!(object.contains_key(key), "missing wire key {key}");
        }
        assert_eq!(object.len(), WIRE_KEYS.len());
    }

    #[test]
    fn encode_renders_lowercase_booleans_and_clean_tail() {
        let snapshot = Snapshot {
            has_fishing_rod: true,
            minigame_active: false,
            ..Snapshot::default()
        };
        let line = encode(&snapshot).unwrap();
        assert!(line.contains("\"HasFishingRod\":true"));
        assert!(line.contains("\"MinigameActive\":false"));
        assert!(!line.contains(",}"));
        assert!(line.ends_with("}\n"));
        assert_eq!(line.matches('\n').count(), 1);
    }

    #[test]
    fn encode_skips_bobber_fields() {
        let snapshot = Snapshot {
            bobber_exists: true,
            bobber_x: 2180.0,
            bobber_y: 980.0,
            ..Snapshot::default()
        };
        let line = encode(&snapshot).unwrap();
        assert!(!line.contains("Bobber_") && !line.contains("BobberX"));
    }

    #[test]
    fn decode_accepts_well_formed_action() {
        let command = decode(b"{\"action\": 1, \"interval\": 2.5}\n").unwrap();
        assert_eq!(command.action, ACTION_APPLY_FORCE);
        assert_eq!(command.interval, 2.5);
    }

    #[test]
    fn decode_tolerates_surrounding_whitespace() {
        let command = decode(b"  {\"action\": 0, \"interval\": -0.75}  \r\n").unwrap();
        assert_eq!(command.action, 0);
        assert_eq!(command.interval, -0.75);
    }

    #[test]
    fn decode_rejects_malformed_payloads() {
        assert!(decode(b"not json").is_err());
        assert!(decode(b"{\"action\": 1").is_err());
        assert!(decode(b"{\"action\": \"up\", \"interval\": 1.0}").is_err());
        assert!(decode(&[0xff, 0xfe, 0x00]).is_err());
    }
}
