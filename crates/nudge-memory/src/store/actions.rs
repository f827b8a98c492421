//! Action history: what the agent did, for later prompts.

use super::Store;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use nudge_core::{error::NudgeError, message::ActionRecord, traits::ActionHistory};
use tracing::debug;
use uuid::Uuid;

type ActionRow = (String, String, i64, String, String, i64, String);

impl Store {
    /// Append one action record.
    pub async fn insert_action(&self, record: &ActionRecord) -> Result<(), NudgeError> {
        let id = Uuid::new_v4().to_string();
        let parameters = serde_json::to_string(&record.parameters)?;

        sqlx::query(
            "INSERT INTO action_records \
             (id, action_name, display_text, done, parameters, session_id, build_into_prompt, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(&record.action_name)
        .bind(&record.display_text)
        .bind(record.done as i64)
        .bind(&parameters)
        .bind(&record.session_id)
        .bind(record.build_into_prompt as i64)
        .bind(record.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| NudgeError::Memory(format!("store action failed: {e}")))?;

        debug!(
            "action: {} [{}] on {}",
            record.action_name,
            if record.done { "done" } else { "failed" },
            record.session_id
        );
        Ok(())
    }

    /// Most recent actions on a session, newest first.
    pub async fn recent_actions(
        &self,
        session_id: &str,
        limit: usize,
    ) -> Result<Vec<ActionRecord>, NudgeError> {
        let rows: Vec<ActionRow> = sqlx::query_as(
            "SELECT action_name, display_text, done, parameters, session_id, build_into_prompt, created_at \
             FROM action_records WHERE session_id = ? \
             ORDER BY created_at DESC, rowid DESC LIMIT ?",
        )
        .bind(session_id)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| NudgeError::Memory(format!("query failed: {e}")))?;

        rows.into_iter().map(row_to_record).collect()
    }
}

fn row_to_record(row: ActionRow) -> Result<ActionRecord, NudgeError> {
    let (action_name, display_text, done, parameters, session_id, build_into_prompt, created_at) =
        row;
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map_err(|e| NudgeError::Memory(format!("bad timestamp {created_at}: {e}")))?
        .with_timezone(&Utc);

    Ok(ActionRecord {
        action_name,
        display_text,
        done: done != 0,
        parameters: serde_json::from_str(&parameters)?,
        session_id,
        build_into_prompt: build_into_prompt != 0,
        created_at,
    })
}

/// Render action records as prompt context, oldest first.
///
/// Records not meant for prompts are skipped; failed actions are marked.
pub fn format_action_context(records: &[ActionRecord]) -> String {
    let mut shown: Vec<&ActionRecord> = records.iter().filter(|r| r.build_into_prompt).collect();
    shown.sort_by_key(|r| r.created_at);
    shown
        .iter()
        .map(|r| {
            let status = if r.done { "" } else { " (failed)" };
            format!(
                "[{}] {}{status}",
                r.created_at.format("%Y-%m-%d %H:%M"),
                r.display_text
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[async_trait]
impl ActionHistory for Store {
    async fn store_action(&self, record: &ActionRecord) -> Result<(), NudgeError> {
        self.insert_action(record).await
    }
}
