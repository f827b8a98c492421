//! Transport trait implementation over the OneBot HTTP API.

use super::types::{poke_request, send_msg_request, ObResponse, Session};
use super::OneBotTransport;
use async_trait::async_trait;
use nudge_core::{
    error::NudgeError,
    message::{ActionRecord, CommandKind, OutboundCommand},
    traits::Transport,
};
use serde_json::{json, Value};
use tracing::{debug, warn};

impl OneBotTransport {
    /// POST one OneBot action and decode the response envelope.
    async fn call(&self, endpoint: &str, body: &Value) -> Result<ObResponse, NudgeError> {
        let url = format!("{}/{endpoint}", self.base_url);
        debug!("onebot: POST {url}");

        let mut req = self.client.post(&url).json(body);
        if !self.access_token.is_empty() {
            req = req.bearer_auth(&self.access_token);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| NudgeError::Transport(format!("onebot {endpoint} request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(NudgeError::Transport(format!(
                "onebot {endpoint} returned {status}: {text}"
            )));
        }

        resp.json::<ObResponse>()
            .await
            .map_err(|e| NudgeError::Transport(format!("onebot {endpoint} parse error: {e}")))
    }

    /// Turn a command response into the success flag, recording accepted
    /// commands flagged `store_in_history`.
    pub(super) async fn settle_command(
        &self,
        session_id: &str,
        command: &OutboundCommand,
        resp: ObResponse,
    ) -> bool {
        if !resp.is_ok() {
            warn!(
                "onebot: {} on {session_id} rejected (retcode {}): {}",
                command.kind.as_str(),
                resp.retcode,
                resp.wording.unwrap_or_default()
            );
            return false;
        }
        if command.store_in_history {
            self.record(session_id, command).await;
        }
        true
    }

    async fn record(&self, session_id: &str, command: &OutboundCommand) {
        let Some(history) = &self.history else {
            return;
        };
        let record = ActionRecord::new(
            command.kind.as_str(),
            &command.display_text,
            true,
            json!({ "target_handle": command.target_handle }),
            session_id,
        );
        if let Err(e) = history.store_action(&record).await {
            warn!("onebot: failed to record {}: {e}", command.kind.as_str());
        }
    }
}

#[async_trait]
impl Transport for OneBotTransport {
    fn name(&self) -> &str {
        "onebot"
    }

    async fn send_text(&self, session_id: &str, text: &str) -> Result<(), NudgeError> {
        let session: Session = session_id.parse()?;
        let (endpoint, body) = send_msg_request(&session, text);
        let resp = self.call(endpoint, &body).await?;
        if !resp.is_ok() {
            return Err(NudgeError::Transport(format!(
                "onebot send_msg to {session} failed (retcode {}): {}",
                resp.retcode,
                resp.wording.unwrap_or_default()
            )));
        }
        Ok(())
    }

    async fn send_command(
        &self,
        session_id: &str,
        command: &OutboundCommand,
    ) -> Result<bool, NudgeError> {
        let session: Session = session_id.parse()?;
        let (endpoint, body) = match command.kind {
            CommandKind::SendPoke => poke_request(&session, &command.target_handle),
        };

        let resp = self.call(endpoint, &body).await?;
        Ok(self.settle_command(session_id, command, resp).await)
    }
}
