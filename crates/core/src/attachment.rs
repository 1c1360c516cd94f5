use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A reference appended to a session note: an agenda item to cover during
/// the session, or a resource handed to the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteAttachment {
    pub id: String,
    pub note_id: String,
    pub kind: AttachmentKind,
    pub label: String,
    pub url: Option<String>,
    /// Agenda items are marked done when their session is finalized.
    pub done: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentKind {
    Agenda,
    Resource,
}

impl AttachmentKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Agenda => "agenda",
            Self::Resource => "resource",
        }
    }
}

impl std::str::FromStr for AttachmentKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "agenda" => Ok(Self::Agenda),
            "resource" => Ok(Self::Resource),
            _ => Err(anyhow::anyhow!("Invalid attachment kind: {}", s)),
        }
    }
}
