use serde::Serialize;
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Employee record as stored. The password hash never leaves the server.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub email: Option<String>,
    pub roles: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl User {
    pub async fn find_by_username(db: &PgPool, username: &str) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, email, roles, created_at, updated_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(db)
        .await
    }

    pub async fn find_by_id(db: &PgPool, id: Uuid) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, email, roles, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
    }

    pub async fn create(
        db: &PgPool,
        username: &str,
        password_hash: &str,
        email: Option<&str>,
        roles: &[String],
    ) -> sqlx::Result<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash, email, roles)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, password_hash, email, roles, created_at, updated_at
            "#,
        )
        .bind(username)
        .bind(password_hash)
        .bind(email)
        .bind(roles)
        .fetch_one(db)
        .await
    }

    /// Newest first.
    pub async fn list_all(db: &PgPool) -> sqlx::Result<Vec<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, email, roles, created_at, updated_at
            FROM users
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(db)
        .await
    }

    /// Partial update: omitted fields keep their stored values. Returns the
    /// updated record, or `None` when no row matched.
    pub async fn update(
        db: &PgPool,
        id: Uuid,
        username: Option<&str>,
        password: Option<&str>,
        email: Option<&str>,
        roles: Option<Vec<String>>,
    ) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET username = COALESCE($2, username),
                password_hash = COALESCE($3, password_hash),
                email = COALESCE($4, email),
                roles = COALESCE($5, roles),
                updated_at = now()
            WHERE id = $1
            RETURNING id, username, password_hash, email, roles, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(username)
        .bind(password)
        .bind(email)
        .bind(roles)
        .fetch_optional(db)
        .await
    }

    /// Returns the number of rows removed (0 or 1).
    pub async fn delete(db: &PgPool, id: Uuid) -> sqlx::Result<u64> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            username: "suraj".into(),
            password_hash: "$argon2id$v=19$m=19456,t=2,p=1$abc$def".into(),
            email: Some("s@x.com".into()),
            roles: vec!["Employee".into()],
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn password_hash_is_never_serialized() {
        let value = serde_json::to_value(sample_user()).expect("serialize");
        let obj = value.as_object().expect("object");
        assert!(!obj.contains_key("password_hash"));
        assert_eq!(obj["username"], "suraj");
        assert_eq!(obj["roles"][0], "Employee");
    }

    #[test]
    fn timestamps_serialize_as_rfc3339() {
        let value = serde_json::to_value(sample_user()).expect("serialize");
        let created = value["created_at"].as_str().expect("string timestamp");
        assert!(created.contains('T'));
    }
}
