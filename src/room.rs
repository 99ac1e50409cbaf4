//! Room identifiers and document addresses.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{debug, instrument};

/// Exclusive upper bound for room identifiers.
pub const ROOM_LIMIT: u32 = 100_000_000;

/// Identifier scoping one shared game in the remote store.
///
/// Always in `[0, 10^8)`. Room 0 is the default.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
    derive_more::Display,
)]
#[serde(try_from = "u32", into = "u32")]
pub struct RoomId(u32);

impl RoomId {
    /// The default room.
    pub const DEFAULT: RoomId = RoomId(0);

    /// Validates a raw room number.
    pub fn new(id: u32) -> Result<Self, RoomError> {
        if id < ROOM_LIMIT {
            Ok(Self(id))
        } else {
            Err(RoomError::OutOfRange(u64::from(id)))
        }
    }

    /// Returns the raw room number.
    pub fn get(self) -> u32 {
        self.0
    }

    /// Resolves the room from a query string such as `?room=42`.
    ///
    /// A missing, non-numeric or out-of-range value yields the default room.
    #[instrument]
    pub fn from_query(query: &str) -> Self {
        let raw = query
            .trim_start_matches('?')
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(key, _)| *key == "room")
            .map(|(_, value)| value);

        match raw.map(str::parse::<RoomId>) {
            Some(Ok(room)) => room,
            Some(Err(e)) => {
                debug!(error = %e, "Falling back to default room");
                Self::DEFAULT
            }
            None => Self::DEFAULT,
        }
    }

    /// Query string selecting this room; empty for the default room.
    pub fn to_query(self) -> String {
        if self == Self::DEFAULT {
            String::new()
        } else {
            format!("?room={}", self.0)
        }
    }

    /// Address of this room's document under `base_url`.
    pub fn document_url(self, base_url: &str) -> String {
        format!("{}/room/{}.json", base_url.trim_end_matches('/'), self.0)
    }
}

impl FromStr for RoomId {
    type Err = RoomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(Self::DEFAULT);
        }
        let id: u64 = trimmed
            .parse()
            .map_err(|_| RoomError::NotANumber(s.to_string()))?;
        u32::try_from(id)
            .map_err(|_| RoomError::OutOfRange(id))
            .and_then(RoomId::new)
    }
}

impl TryFrom<u32> for RoomId {
    type Error = RoomError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        RoomId::new(value)
    }
}

impl From<RoomId> for u32 {
    fn from(room: RoomId) -> Self {
        room.0
    }
}

/// A room identifier that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum RoomError {
    /// Not a non-negative integer.
    #[display("Room id {:?} is not a non-negative integer", _0)]
    NotANumber(#[error(not(source))] String),

    /// Outside `[0, 10^8)`.
    #[display("Room id {} is out of range", _0)]
    OutOfRange(#[error(not(source))] u64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_query() {
        assert_eq!(RoomId::from_query("?room=42").get(), 42);
        assert_eq!(RoomId::from_query("foo=1&room=7").get(), 7);
        assert_eq!(RoomId::from_query("").get(), 0);
        assert_eq!(RoomId::from_query("?room=abc").get(), 0);
        assert_eq!(RoomId::from_query("?room=-3").get(), 0);
        assert_eq!(RoomId::from_query("?room=100000000").get(), 0);
        assert_eq!(RoomId::from_query("?room=99999999").get(), 99_999_999);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "12x".parse::<RoomId>(),
            Err(RoomError::NotANumber("12x".to_string()))
        );
        assert_eq!(
            "5000000000".parse::<RoomId>(),
            Err(RoomError::OutOfRange(5_000_000_000))
        );
        assert_eq!("".parse::<RoomId>(), Ok(RoomId::DEFAULT));
    }

    #[test]
    fn test_document_url() {
        let room = RoomId::new(42).unwrap();
        assert_eq!(
            room.document_url("http://localhost:3000/"),
            "http://localhost:3000/room/42.json"
        );
        assert_eq!(room.to_query(), "?room=42");
        assert_eq!(RoomId::DEFAULT.to_query(), "");
    }

    #[test]
    fn test_serde_rejects_out_of_range() {
        assert!(serde_json::from_str::<RoomId>("100000000").is_err());
        assert_eq!(serde_json::from_str::<RoomId>("3").unwrap().get(), 3);
    }
}
