//! Wire types for the Parley chat RPC.
//!
//! Everything in this module is something a client either sends or
//! receives. The server never hands out its internal structures; the room
//! store and presence tracker produce these values as snapshots.

use std::fmt;
use std::str::FromStr;

use chrono::{Local, NaiveDateTime, SubsecRound};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// Timestamp
// ---------------------------------------------------------------------------

/// The fixed wire format for timestamps: `2024-05-01 13:45:09`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A point in time with one-second resolution, in server-local wall clock.
///
/// Internally this is a structured `NaiveDateTime`; it only becomes a
/// string at the serde boundary, where it is written with
/// [`TIMESTAMP_FORMAT`]. Sub-second precision is dropped on construction so
/// that two values that print the same also compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(NaiveDateTime);

impl Timestamp {
    /// The current local wall-clock time, truncated to whole seconds.
    pub fn now() -> Self {
        Self::from_naive(Local::now().naive_local())
    }

    /// Wraps a `NaiveDateTime`, truncating it to whole seconds.
    pub fn from_naive(value: NaiveDateTime) -> Self {
        Self(value.trunc_subsecs(0))
    }

    /// Returns the underlying date-time.
    pub fn as_naive(&self) -> NaiveDateTime {
        self.0
    }

    /// Whole seconds elapsed from `earlier` to `self`. Negative if
    /// `earlier` is actually later.
    pub fn seconds_since(&self, earlier: Timestamp) -> i64 {
        (self.0 - earlier.0).num_seconds()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(TIMESTAMP_FORMAT))
    }
}

impl FromStr for Timestamp {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
            .map(Self)
            .map_err(ProtocolError::InvalidTimestamp)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Stored and returned data
// ---------------------------------------------------------------------------

/// One chat message as stored in a room and as sent on the wire.
///
/// Immutable once the room store has assigned its timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub username: String,
    pub text: String,
    pub room: String,
    pub timestamp: Timestamp,
}

/// A room as listed by `ListRooms`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSummary {
    pub name: String,
    pub message_count: usize,
}

/// Liveness information for one user.
///
/// `last_seen` is `None` for a user who has never sent a heartbeat.
/// `online` is derived from `last_seen` and the server's idle window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Presence {
    pub username: String,
    pub last_seen: Option<Timestamp>,
    pub online: bool,
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// The operation a client is asking for.
///
/// Internally tagged on `method`, so a join looks like
/// `{ "method": "Join", "username": "alice", "room": "general" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method")]
pub enum Call {
    /// Enter a room and receive its history so far.
    Join { username: String, room: String },

    /// Store a message in a room.
    SendMessage {
        username: String,
        text: String,
        room: String,
    },

    /// "I'm still here." Clients send one every few seconds.
    Heartbeat { username: String },

    /// Ask when a user last sent a heartbeat.
    LastSeen { username: String },

    /// List every known room with its message count.
    ListRooms,
}

impl Call {
    /// The method name, for logging.
    pub fn method(&self) -> &'static str {
        match self {
            Self::Join { .. } => "Join",
            Self::SendMessage { .. } => "SendMessage",
            Self::Heartbeat { .. } => "Heartbeat",
            Self::LastSeen { .. } => "LastSeen",
            Self::ListRooms => "ListRooms",
        }
    }
}

/// A request frame: a caller-chosen correlation id plus the call.
///
/// The server echoes `id` in the matching [`Response`]; it never
/// interprets it otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub id: u64,
    pub call: Call,
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// Error code for caller mistakes: empty fields, undecodable frames.
pub const CODE_INVALID_INPUT: u16 = 400;

/// Error code reserved for transport and connectivity failures.
pub const CODE_UNAVAILABLE: u16 = 503;

/// The outcome of a call, tagged on `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Reply {
    /// Join succeeded; `messages` is the room history at join time.
    History { messages: Vec<ChatMessage> },

    /// SendMessage or Heartbeat succeeded. No payload.
    Ack,

    /// Answer to `LastSeen`.
    Presence(Presence),

    /// Answer to `ListRooms`.
    RoomList { rooms: Vec<RoomSummary> },

    /// The call was rejected. `code` follows HTTP conventions
    /// ([`CODE_INVALID_INPUT`], [`CODE_UNAVAILABLE`]).
    Error { code: u16, message: String },
}

impl Reply {
    /// Shorthand for an `Error` reply.
    pub fn error(code: u16, message: impl Into<String>) -> Self {
        Self::Error {
            code,
            message: message.into(),
        }
    }

    /// Returns `true` for `Reply::Error`.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

/// A response frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    /// The `id` of the request this answers, or 0 if the request could
    /// not be decoded.
    pub id: u64,
    pub reply: Reply,
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    //! The JSON shapes here are the contract with existing clients, so
    //! these tests pin field names and tags rather than just round-tripping.

    use chrono::NaiveDate;

    use super::*;

    fn ts(h: u32, m: u32, s: u32) -> Timestamp {
        let naive = NaiveDate::from_ymd_opt(2024, 5, 1)
            .and_then(|d| d.and_hms_opt(h, m, s))
            .unwrap();
        Timestamp::from_naive(naive)
    }

    // =====================================================================
    // Timestamp
    // =====================================================================

    #[test]
    fn test_timestamp_display_uses_fixed_format() {
        assert_eq!(ts(13, 45, 9).to_string(), "2024-05-01 13:45:09");
    }

    #[test]
    fn test_timestamp_from_naive_drops_subseconds() {
        let naive = NaiveDate::from_ymd_opt(2024, 5, 1)
            .and_then(|d| d.and_hms_milli_opt(10, 0, 0, 999))
            .unwrap();
        assert_eq!(Timestamp::from_naive(naive), ts(10, 0, 0));
    }

    #[test]
    fn test_timestamp_now_has_no_subseconds() {
        use chrono::Timelike;
        assert_eq!(Timestamp::now().as_naive().nanosecond(), 0);
    }

    #[test]
    fn test_timestamp_parse_accepts_wire_format() {
        let parsed: Timestamp = "2024-05-01 13:45:09".parse().unwrap();
        assert_eq!(parsed, ts(13, 45, 9));
    }

    #[test]
    fn test_timestamp_parse_rejects_iso_format() {
        let result = "2024-05-01T13:45:09Z".parse::<Timestamp>();
        assert!(matches!(result, Err(ProtocolError::InvalidTimestamp(_))));
    }

    #[test]
    fn test_timestamp_seconds_since() {
        assert_eq!(ts(10, 1, 5).seconds_since(ts(10, 0, 0)), 65);
        assert_eq!(ts(10, 0, 0).seconds_since(ts(10, 0, 1)), -1);
    }

    #[test]
    fn test_timestamp_serializes_as_string() {
        let json = serde_json::to_string(&ts(8, 5, 0)).unwrap();
        assert_eq!(json, "\"2024-05-01 08:05:00\"");
    }

    #[test]
    fn test_timestamp_deserialize_rejects_garbage() {
        let result: Result<Timestamp, _> = serde_json::from_str("\"yesterday\"");
        assert!(result.is_err());
    }

    // =====================================================================
    // ChatMessage
    // =====================================================================

    #[test]
    fn test_chat_message_json_shape() {
        let msg = ChatMessage {
            username: "alice".into(),
            text: "hi".into(),
            room: "general".into(),
            timestamp: ts(9, 30, 0),
        };
        let json: serde_json::Value = serde_json::to_value(&msg).unwrap();

        assert_eq!(json["username"], "alice");
        assert_eq!(json["text"], "hi");
        assert_eq!(json["room"], "general");
        assert_eq!(json["timestamp"], "2024-05-01 09:30:00");
    }

    // =====================================================================
    // Call / Request
    // =====================================================================

    #[test]
    fn test_request_join_json_shape() {
        let req = Request {
            id: 7,
            call: Call::Join {
                username: "alice".into(),
                room: "general".into(),
            },
        };
        let json: serde_json::Value = serde_json::to_value(&req).unwrap();

        assert_eq!(json["id"], 7);
        assert_eq!(json["call"]["method"], "Join");
        assert_eq!(json["call"]["username"], "alice");
        assert_eq!(json["call"]["room"], "general");
    }

    #[test]
    fn test_request_list_rooms_decodes_from_bare_method() {
        let req: Request =
            serde_json::from_str(r#"{"id":1,"call":{"method":"ListRooms"}}"#)
                .unwrap();
        assert_eq!(req.call, Call::ListRooms);
    }

    #[test]
    fn test_request_unknown_method_fails_to_decode() {
        let result: Result<Request, _> =
            serde_json::from_str(r#"{"id":1,"call":{"method":"Leave"}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_call_method_names() {
        let hb = Call::Heartbeat {
            username: "bob".into(),
        };
        assert_eq!(hb.method(), "Heartbeat");
        assert_eq!(Call::ListRooms.method(), "ListRooms");
    }

    // =====================================================================
    // Reply / Response
    // =====================================================================

    #[test]
    fn test_reply_ack_json_shape() {
        let json: serde_json::Value = serde_json::to_value(Reply::Ack).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "Ack" }));
    }

    #[test]
    fn test_reply_error_json_shape() {
        let resp = Response {
            id: 3,
            reply: Reply::error(CODE_INVALID_INPUT, "text must not be empty"),
        };
        let json: serde_json::Value = serde_json::to_value(&resp).unwrap();

        assert_eq!(json["id"], 3);
        assert_eq!(json["reply"]["type"], "Error");
        assert_eq!(json["reply"]["code"], 400);
        assert_eq!(json["reply"]["message"], "text must not be empty");
        assert!(resp.reply.is_error());
    }

    #[test]
    fn test_reply_presence_flattens_fields() {
        let reply = Reply::Presence(Presence {
            username: "carol".into(),
            last_seen: None,
            online: false,
        });
        let json: serde_json::Value = serde_json::to_value(&reply).unwrap();

        assert_eq!(json["type"], "Presence");
        assert_eq!(json["username"], "carol");
        assert!(json["last_seen"].is_null());
        assert_eq!(json["online"], false);
    }

    #[test]
    fn test_reply_history_decodes() {
        let raw = r#"{"type":"History","messages":[
            {"username":"alice","text":"hi","room":"general","timestamp":"2024-05-01 09:30:00"}
        ]}"#;
        let reply: Reply = serde_json::from_str(raw).unwrap();

        match reply {
            Reply::History { messages } => {
                assert_eq!(messages.len(), 1);
                assert_eq!(messages[0].timestamp, ts(9, 30, 0));
            }
            other => panic!("expected History, got {other:?}"),
        }
    }
}
