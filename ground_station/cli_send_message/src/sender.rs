// Uplink to the realtime database. One POST per command; the database assigns the key.

use common::firebase::COMMANDS_PATH;
use common::PrintCommand;
use log::{debug, info, warn};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SendError {
    /// The database answered with anything other than 200
    #[error("HTTP {status}: {body}")]
    Rejected { status: u16, body: String },
    /// Connect failure, timeout, or the connection dropping mid-response
    #[error("{0}")]
    Transport(#[source] reqwest::Error),
    #[error("could not build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

/// What the database told us about a stored command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendReceipt {
    /// Key the database stored the command under, taken from `name` in the reply
    pub command_id: Option<String>,
}

pub struct CommandSender {
    http: Client,
    url: String,
}

/// Full URL of the commands collection under `base_url`.
pub fn commands_url(base_url: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), COMMANDS_PATH)
}

impl CommandSender {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, SendError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(SendError::Client)?;

        Ok(CommandSender {
            http,
            url: commands_url(base_url),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// POST `command` to the commands collection. Only a 200 counts as stored.
    pub async fn send(&self, command: &PrintCommand) -> Result<SendReceipt, SendError> {
        debug!("POST {} {:?}", self.url, command);

        let response = self
            .http
            .post(&self.url)
            .json(command)
            .send()
            .await
            .map_err(SendError::Transport)?;

        let status = response.status();
        let body = response.text().await.map_err(SendError::Transport)?;

        if status != StatusCode::OK {
            warn!("Database rejected command with {}: {}", status, body);
            return Err(SendError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let command_id = command_id_from_body(&body);
        info!(
            "Stored print command {:?} as {}",
            command.data,
            command_id.as_deref().unwrap_or("<no id>")
        );
        Ok(SendReceipt { command_id })
    }
}

// The reply is expected to be {"name": "<key>"}; anything else just means no id to show.
// A 200 with an unreadable body still counts as stored, since only the status decides that.
fn command_id_from_body(body: &str) -> Option<String> {
    let json: Value = serde_json::from_str(body).ok()?;
    match json.get("name")? {
        Value::Null => None,
        Value::String(name) => Some(name.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_firebase::MockFirebase;
    use chrono::prelude::*;

    fn command(message: &str) -> PrintCommand {
        let at = Local.with_ymd_and_hms(2024, 12, 25, 7, 0, 0).unwrap();
        PrintCommand::with_timestamp(message, at).unwrap()
    }

    #[test]
    fn test_commands_url() {
        assert_eq!(
            commands_url("https://printerpot-d96f8-default-rtdb.firebaseio.com"),
            "https://printerpot-d96f8-default-rtdb.firebaseio.com/commands.json"
        );
        assert_eq!(commands_url("http://127.0.0.1:8080/"), "http://127.0.0.1:8080/commands.json");
    }

    #[test]
    fn test_command_id_from_body() {
        assert_eq!(command_id_from_body(r#"{"name": "abc123"}"#), Some("abc123".to_string()));
        assert_eq!(command_id_from_body(r#"{"name": 42}"#), Some("42".to_string()));
        assert_eq!(command_id_from_body(r#"{"name": null}"#), None);
        assert_eq!(command_id_from_body(r#"{"other": "x"}"#), None);
        assert_eq!(command_id_from_body("null"), None);
        assert_eq!(command_id_from_body("not json"), None);
        assert_eq!(command_id_from_body(""), None);
    }

    #[tokio::test]
    async fn test_send_posts_json_envelope() {
        let server = MockFirebase::respond_once("200 OK", r#"{"name":"-NxYz123"}"#);
        let sender = CommandSender::new(&server.base_url, Duration::from_secs(5)).unwrap();

        let receipt = sender.send(&command("  Merry Christmas ")).await.unwrap();
        assert_eq!(receipt.command_id.as_deref(), Some("-NxYz123"));

        let request = server.request();
        assert!(request.starts_with("POST /commands.json HTTP/1.1"));
        assert!(request.to_lowercase().contains("content-type: application/json"));

        let body: Value = serde_json::from_str(request.split("\r\n\r\n").nth(1).unwrap()).unwrap();
        assert_eq!(body["type"], "print");
        assert_eq!(body["data"], "Merry Christmas");
        assert_eq!(body["timestamp"], "2024-12-25T07:00:00.000000");
        assert_eq!(body["processed"], false);
    }

    #[tokio::test]
    async fn test_send_without_name() {
        let server = MockFirebase::respond_once("200 OK", "{}");
        let sender = CommandSender::new(&server.base_url, Duration::from_secs(5)).unwrap();

        let receipt = sender.send(&command("hi")).await.unwrap();
        assert_eq!(receipt.command_id, None);
    }

    #[tokio::test]
    async fn test_non_200_is_rejected() {
        let body = r#"{"error":"Permission denied"}"#;
        for (status, code) in [("500 Internal Server Error", 500), ("401 Unauthorized", 401), ("404 Not Found", 404)] {
            let server = MockFirebase::respond_once(status, body);
            let sender = CommandSender::new(&server.base_url, Duration::from_secs(5)).unwrap();

            match sender.send(&command("hi")).await {
                Err(SendError::Rejected { status, body: text }) => {
                    assert_eq!(status, code);
                    assert_eq!(text, body);
                }
                other => panic!("expected rejection for {}, got {:?}", code, other),
            }
        }
    }

    #[tokio::test]
    async fn test_timeout_is_transport_error() {
        let server = MockFirebase::stall(Duration::from_secs(2));
        let sender = CommandSender::new(&server.base_url, Duration::from_millis(200)).unwrap();

        match sender.send(&command("hi")).await {
            Err(SendError::Transport(e)) => assert!(e.is_timeout()),
            other => panic!("expected timeout, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        let base_url = MockFirebase::unused_base_url();
        let sender = CommandSender::new(&base_url, Duration::from_secs(2)).unwrap();

        let err = sender.send(&command("hi")).await.unwrap_err();
        assert!(matches!(err, SendError::Transport(_)));
        assert!(!err.to_string().is_empty());
    }
}
