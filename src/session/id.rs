//! Session identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::SessionError;

/// Identifier of the form `session_<unix-seconds>_<8 lowercase hex chars>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SessionId(String);

impl SessionId {
    /// Fresh id from the current wall clock and 4 random bytes.
    pub fn generate() -> Self {
        Self::from_parts(chrono::Utc::now().timestamp(), uuid::Uuid::new_v4().as_bytes())
    }

    fn from_parts(unix_seconds: i64, random: &[u8]) -> Self {
        let suffix: String = random.iter().take(4).map(|b| format!("{b:02x}")).collect();
        Self(format!("session_{unix_seconds}_{suffix}"))
    }

    /// Validate an externally supplied id.
    pub fn parse(raw: &str) -> Result<Self, SessionError> {
        let invalid = || SessionError::InvalidId(raw.to_string());
        let rest = raw.strip_prefix("session_").ok_or_else(invalid)?;
        let (secs, hex) = rest.split_once('_').ok_or_else(invalid)?;
        let secs_ok = !secs.is_empty() && secs.bytes().all(|b| b.is_ascii_digit());
        let hex_ok = hex.len() == 8
            && hex
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        if secs_ok && hex_ok {
            Ok(Self(raw.to_string()))
        } else {
            Err(invalid())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last `n` characters, for compact display.
    pub fn suffix(&self, n: usize) -> &str {
        let start = self.0.len().saturating_sub(n);
        &self.0[start..]
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SessionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SessionId {
    type Error = SessionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<SessionId> for String {
    fn from(id: SessionId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_parts_formats_hex_lowercase() {
        let id = SessionId::from_parts(1_700_000_000, &[0xAB, 0x01, 0xFF, 0x10, 0x99]);
        assert_eq!(id.as_str(), "session_1700000000_ab01ff10");
        assert_eq!(id.suffix(8), "ab01ff10");
    }

    #[test]
    fn generated_ids_parse() {
        let id = SessionId::generate();
        assert_eq!(SessionId::parse(id.as_str()).unwrap(), id);
    }

    #[test]
    fn malformed_ids_are_rejected() {
        for raw in [
            "",
            "session_",
            "session_123",
            "session_123_ABCDEF12",
            "session_12a_abcdef12",
            "session_123_abcdef1",
            "sess_123_abcdef12",
        ] {
            assert!(SessionId::parse(raw).is_err(), "{raw} should be rejected");
        }
    }

    #[test]
    fn suffix_longer_than_id_is_whole_id() {
        let id = SessionId::parse("session_1_00000000").unwrap();
        assert_eq!(id.suffix(100), id.as_str());
    }
}
