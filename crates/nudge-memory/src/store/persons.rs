//! People: platform handles, internal ids, display names.

use super::Store;
use async_trait::async_trait;
use nudge_core::{error::NudgeError, message::PersonField, traits::IdentityResolver};
use uuid::Uuid;

impl Store {
    /// Register a person, or rename them if the handle is already known.
    /// Returns the person id.
    pub async fn register_person(
        &self,
        platform: &str,
        user_id: &str,
        person_name: &str,
    ) -> Result<String, NudgeError> {
        let id = Uuid::new_v4().to_string();
        sqlx::query(
            "INSERT INTO persons (person_id, platform, user_id, person_name) \
             VALUES (?, ?, ?, ?) \
             ON CONFLICT(platform, user_id) DO UPDATE SET \
             person_name = excluded.person_name, updated_at = datetime('now')",
        )
        .bind(&id)
        .bind(platform)
        .bind(user_id)
        .bind(person_name)
        .execute(&self.pool)
        .await
        .map_err(|e| NudgeError::Memory(format!("register person failed: {e}")))?;

        self.find_person(platform, user_id)
            .await?
            .ok_or_else(|| NudgeError::Memory(format!("person {platform}:{user_id} vanished")))
    }

    /// Person id for a platform handle.
    pub async fn find_person(
        &self,
        platform: &str,
        user_id: &str,
    ) -> Result<Option<String>, NudgeError> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT person_id FROM persons WHERE platform = ? AND user_id = ?")
                .bind(platform)
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| NudgeError::Memory(format!("query failed: {e}")))?;

        Ok(row.map(|(id,)| id))
    }

    /// Person id for a display name. The most recently updated person wins on duplicates.
    pub async fn find_person_by_name(&self, name: &str) -> Result<Option<String>, NudgeError> {
        let row: Option<(String,)> = sqlx::query_as(
            "SELECT person_id FROM persons WHERE person_name = ? \
             ORDER BY updated_at DESC, rowid DESC LIMIT 1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| NudgeError::Memory(format!("query failed: {e}")))?;

        Ok(row.map(|(id,)| id))
    }

    /// Read one field of a person.
    pub async fn get_person_value(
        &self,
        person_id: &str,
        field: PersonField,
    ) -> Result<Option<String>, NudgeError> {
        let sql = match field {
            PersonField::PersonName => "SELECT person_name FROM persons WHERE person_id = ?",
            PersonField::UserId => "SELECT user_id FROM persons WHERE person_id = ?",
        };
        let row: Option<(Option<String>,)> = sqlx::query_as(sql)
            .bind(person_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| NudgeError::Memory(format!("query {} failed: {e}", field.as_str())))?;

        Ok(row.and_then(|(value,)| value))
    }

    /// All known people on a platform: (person_id, user_id, person_name).
    pub async fn list_persons(
        &self,
        platform: &str,
    ) -> Result<Vec<(String, String, Option<String>)>, NudgeError> {
        let rows: Vec<(String, String, Option<String>)> = sqlx::query_as(
            "SELECT person_id, user_id, person_name FROM persons \
             WHERE platform = ? ORDER BY person_name, user_id",
        )
        .bind(platform)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| NudgeError::Memory(format!("query failed: {e}")))?;

        Ok(rows)
    }
}

#[async_trait]
impl IdentityResolver for Store {
    async fn person_id(&self, platform: &str, user_id: &str) -> Result<Option<String>, NudgeError> {
        self.find_person(platform, user_id).await
    }

    async fn person_id_by_name(&self, name: &str) -> Result<Option<String>, NudgeError> {
        self.find_person_by_name(name).await
    }

    async fn person_value(
        &self,
        person_id: &str,
        field: PersonField,
    ) -> Result<Option<String>, NudgeError> {
        self.get_person_value(person_id, field).await
    }
}
