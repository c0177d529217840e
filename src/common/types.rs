use serde::{Deserialize, Deserializer, Serialize};

/// A chat channel as listed by `GET /rooms`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub name: String,
}

/// Body of `GET /rooms`. The backend encodes an empty table as `null`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoomList {
    #[serde(default)]
    rooms: Option<Vec<Room>>,
}

impl RoomList {
    pub fn into_rooms(self) -> Vec<Room> {
        self.rooms.unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Success body of `/login` and `/register`.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Client → server stream envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum OutgoingMessage {
    #[serde(rename = "message.send")]
    Send { text: String },
}

/// Server → client stream envelope, one per line of a frame.
#[derive(Debug, Clone, Deserialize)]
pub struct IncomingEnvelope {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    pub data: IncomingMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IncomingMessage {
    pub sent_at: String,
    #[serde(default)]
    pub username: Option<String>,
    pub body: String,
    #[serde(default)]
    pub sender_id: Option<String>,
}

impl IncomingMessage {
    /// Name shown in front of the body.
    pub fn author(&self) -> &str {
        self.username
            .as_deref()
            .or(self.sender_id.as_deref())
            .unwrap_or("unknown")
    }
}

/// Navigation parameters of the chat view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatParams {
    pub room: String,
    pub name: String,
}

impl ChatParams {
    pub fn new(room: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            room: room.into(),
            name: name.into(),
        }
    }

    /// `chat.html?room=<id>&name=<name>`, the address of the chat view.
    pub fn to_query(&self) -> String {
        let query = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("room", &self.room)
            .append_pair("name", &self.name)
            .finish();
        format!("chat.html?{query}")
    }

    /// Accepts either a bare query (`room=1&name=general`) or a full
    /// `chat.html?...` address. Returns `None` when `room` is missing.
    pub fn from_query(input: &str) -> Option<Self> {
        let query = input.split_once('?').map_or(input, |(_, query)| query);
        let mut room = None;
        let mut name = None;
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "room" => room = Some(value.into_owned()),
                "name" => name = Some(value.into_owned()),
                _ => {}
            }
        }
        let room = room.filter(|room| !room.is_empty())?;
        Some(Self {
            name: name.unwrap_or_else(|| room.clone()),
            room,
        })
    }
}

/// Upper-cases the first character, as room labels are shown.
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(value) => Ok(value),
        serde_json::Value::Number(value) => Ok(value.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number room id, got {other}"
        ))),
    }
}
