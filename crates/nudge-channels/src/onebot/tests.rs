use super::types::{id_value, poke_request, send_msg_request, ObResponse, Session};
use super::OneBotTransport;
use async_trait::async_trait;
use nudge_core::config::TransportConfig;
use nudge_core::error::NudgeError;
use nudge_core::message::{ActionRecord, OutboundCommand};
use nudge_core::traits::{ActionHistory, Transport};
use serde_json::json;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct RecordingHistory {
    records: Mutex<Vec<ActionRecord>>,
}

#[async_trait]
impl ActionHistory for RecordingHistory {
    async fn store_action(&self, record: &ActionRecord) -> Result<(), NudgeError> {
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}

fn transport_with_history() -> (OneBotTransport, Arc<RecordingHistory>) {
    let history = Arc::new(RecordingHistory::default());
    let transport = OneBotTransport::new(&TransportConfig::default()).with_history(history.clone());
    (transport, history)
}

fn response(json: &str) -> ObResponse {
    serde_json::from_str(json).unwrap()
}

const OK: &str = r#"{"status":"ok","retcode":0,"data":null}"#;
const REJECTED: &str = r#"{"status":"failed","retcode":100,"wording":"not a member"}"#;

#[test]
fn test_parse_sessions() {
    assert_eq!(
        "group:42".parse::<Session>().unwrap(),
        Session::Group("42".to_string())
    );
    assert_eq!(
        "private:123".parse::<Session>().unwrap(),
        Session::Private("123".to_string())
    );
    assert_eq!(Session::Group("42".to_string()).to_string(), "group:42");
}

#[test]
fn test_parse_bad_sessions() {
    for bad in ["42", "group:", "channel:1", ""] {
        assert!(bad.parse::<Session>().is_err(), "{bad:?} should not parse");
    }
}

#[test]
fn test_id_value_keeps_numbers_numeric() {
    assert_eq!(id_value("123"), json!(123));
    assert_eq!(id_value("abc"), json!("abc"));
}

#[test]
fn test_send_msg_bodies() {
    let (endpoint, body) = send_msg_request(&Session::Group("42".to_string()), "hi!");
    assert_eq!(endpoint, "send_msg");
    assert_eq!(
        body,
        json!({"message_type": "group", "group_id": 42, "message": "hi!"})
    );

    let (_, body) = send_msg_request(&Session::Private("7".to_string()), "yo");
    assert_eq!(
        body,
        json!({"message_type": "private", "user_id": 7, "message": "yo"})
    );
}

#[test]
fn test_poke_bodies() {
    let (endpoint, body) = poke_request(&Session::Group("42".to_string()), "123");
    assert_eq!(endpoint, "group_poke");
    assert_eq!(body, json!({"group_id": 42, "user_id": 123}));

    let (endpoint, body) = poke_request(&Session::Private("123".to_string()), "123");
    assert_eq!(endpoint, "friend_poke");
    assert_eq!(body, json!({"user_id": 123}));
}

#[test]
fn test_response_status() {
    let ok: ObResponse = serde_json::from_str(r#"{"status":"ok","retcode":0,"data":null}"#).unwrap();
    assert!(ok.is_ok());

    let failed: ObResponse =
        serde_json::from_str(r#"{"status":"failed","retcode":100,"wording":"no such group"}"#)
            .unwrap();
    assert!(!failed.is_ok());
    assert_eq!(failed.wording.as_deref(), Some("no such group"));
}

#[test]
fn test_base_url_trailing_slash_trimmed() {
    let transport = OneBotTransport::new(&TransportConfig {
        base_url: "http://127.0.0.1:3000/".to_string(),
        ..Default::default()
    });
    assert_eq!(transport.base_url, "http://127.0.0.1:3000");
    assert_eq!(transport.name(), "onebot");
}

#[tokio::test]
async fn test_malformed_session_fails_before_network() {
    let transport = OneBotTransport::new(&TransportConfig::default());
    let cmd = OutboundCommand::send_poke("123", "[Poke]".to_string(), true);

    assert!(transport.send_command("nowhere", &cmd).await.is_err());
    assert!(transport.send_text("nowhere", "hi").await.is_err());
}

#[tokio::test]
async fn test_accepted_history_command_is_recorded() {
    let (transport, history) = transport_with_history();
    let cmd = OutboundCommand::send_poke("123", "[Poke: Nudge poked Alice]".to_string(), true);

    assert!(transport.settle_command("group:42", &cmd, response(OK)).await);

    let records = history.records.lock().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].action_name, "SEND_POKE");
    assert_eq!(records[0].display_text, "[Poke: Nudge poked Alice]");
    assert_eq!(records[0].session_id, "group:42");
    assert_eq!(records[0].parameters, json!({"target_handle": "123"}));
    assert!(records[0].done);
}

#[tokio::test]
async fn test_unflagged_or_rejected_command_is_not_recorded() {
    let (transport, history) = transport_with_history();
    let unflagged = OutboundCommand::send_poke("123", "[Poke]".to_string(), false);
    let flagged = OutboundCommand::send_poke("123", "[Poke]".to_string(), true);

    assert!(transport.settle_command("group:42", &unflagged, response(OK)).await);
    assert!(!transport.settle_command("group:42", &flagged, response(REJECTED)).await);

    assert!(history.records.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_flagged_command_without_history_sink_still_succeeds() {
    let transport = OneBotTransport::new(&TransportConfig::default());
    let cmd = OutboundCommand::send_poke("123", "[Poke]".to_string(), true);

    assert!(transport.settle_command("private:7", &cmd, response(OK)).await);
}
