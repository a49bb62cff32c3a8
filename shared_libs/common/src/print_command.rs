// Command objects written to the realtime database. The printer polls the commands
// collection, acts on anything it has not seen yet and flips the processed flag itself.

use chrono::prelude::*;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use thiserror::Error;

/// Local time, no offset, microsecond precision. Matches what the printer firmware parses.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// Kinds of command the printer understands. The string form is the `type` literal on the wire.
#[derive(Serialize, Deserialize, Display, EnumString, AsRefStr, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CommandKind {
    Print,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CommandError {
    #[error("Message cannot be empty")]
    EmptyMessage,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PrintCommand {
    #[serde(rename = "type")]
    pub kind: CommandKind,
    pub data: String,
    pub timestamp: String,
    pub processed: bool,
}

impl PrintCommand {
    /// Build a print request for `message`, stamped with the current local time.
    pub fn new(message: &str) -> Result<Self, CommandError> {
        Self::with_timestamp(message, Local::now())
    }

    /// Surrounding whitespace is dropped from the message; nothing else is altered.
    pub fn with_timestamp(message: &str, timestamp: DateTime<Local>) -> Result<Self, CommandError> {
        let data = message.trim();
        if data.is_empty() {
            return Err(CommandError::EmptyMessage);
        }

        Ok(PrintCommand {
            kind: CommandKind::Print,
            data: data.to_string(),
            timestamp: timestamp.format(TIMESTAMP_FORMAT).to_string(),
            processed: false,
        })
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
