use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow},
    Pool, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};
use tracing::info;

use shared::{
    domain::{FeedbackId, Role, RoleCount, RoomId, SessionUser, UserId, UserSummary},
    error::ServiceError,
    listing::{FeedbackEntry, NewRoom, RoomFilter, RoomListing},
};

/// Persistence operations the desktop bridge depends on. `Storage` is the
/// SQLite implementation; tests substitute in-memory fakes.
#[async_trait]
pub trait Directory: Send + Sync {
    async fn health_check(&self) -> Result<()>;

    async fn register_user(
        &self,
        username: &str,
        password: &str,
        display_name: &str,
        role: Role,
    ) -> Result<UserId>;

    async fn authenticate(
        &self,
        username: &str,
        password: &str,
        role: Role,
    ) -> Result<Option<SessionUser>>;

    async fn list_rooms(&self, filter: &RoomFilter) -> Result<Vec<RoomListing>>;

    async fn list_locations(&self) -> Result<Vec<String>>;

    async fn rooms_for_owner(&self, owner: UserId) -> Result<Vec<RoomListing>>;

    async fn add_room(&self, owner: UserId, room: &NewRoom) -> Result<RoomId>;

    async fn update_room(&self, room_id: RoomId, owner: UserId, room: &NewRoom) -> Result<()>;

    async fn set_room_available(&self, room_id: RoomId, owner: UserId, available: bool)
        -> Result<()>;

    async fn delete_room(&self, room_id: RoomId) -> Result<()>;

    async fn submit_feedback(&self, user: UserId, text: &str) -> Result<FeedbackId>;

    async fn list_feedback(&self) -> Result<Vec<FeedbackEntry>>;

    async fn delete_feedback(&self, feedback_id: FeedbackId) -> Result<()>;

    async fn list_users(&self) -> Result<Vec<UserSummary>>;

    async fn delete_user(&self, user_id: UserId) -> Result<()>;

    async fn user_counts(&self) -> Result<Vec<RoleCount>>;
}

#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

const ROOM_COLUMNS: &str = r#"
    r.id, r.owner_id, u.display_name, r.location, r.price, r.description,
    r.room_type, r.contact_number, r.map_link, r.is_available, r.created_at
"#;

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);
        // Every connection to `sqlite::memory:` opens its own database.
        let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(connect_options)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    async fn username_taken(&self, username: &str) -> Result<bool> {
        let existing: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .context("failed to look up username")?;
        Ok(existing.is_some())
    }
}

#[async_trait]
impl Directory for Storage {
    async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    async fn register_user(
        &self,
        username: &str,
        password: &str,
        display_name: &str,
        role: Role,
    ) -> Result<UserId> {
        let username = username.trim();
        let display_name = display_name.trim();
        if username.is_empty() || password.is_empty() || display_name.is_empty() {
            return Err(ServiceError::validation("Please fill all fields.").into());
        }
        if self.username_taken(username).await? {
            return Err(ServiceError::validation("Username already exists.").into());
        }

        let id = sqlx::query(
            "INSERT INTO users (username, password_hash, display_name, user_type) VALUES (?, ?, ?, ?)",
        )
        .bind(username)
        .bind(hash_password(password))
        .bind(display_name)
        .bind(role.as_db_str())
        .execute(&self.pool)
        .await
        .with_context(|| format!("failed to insert user '{username}'"))?
        .last_insert_rowid();

        info!(user_id = id, role = %role, "registered user");
        Ok(UserId(id))
    }

    async fn authenticate(
        &self,
        username: &str,
        password: &str,
        role: Role,
    ) -> Result<Option<SessionUser>> {
        let row = sqlx::query(
            "SELECT id, username, display_name, user_type FROM users WHERE username = ? AND password_hash = ?",
        )
        .bind(username.trim())
        .bind(hash_password(password))
        .fetch_optional(&self.pool)
        .await
        .context("failed to authenticate user")?;

        let Some(row) = row else {
            return Ok(None);
        };
        let stored_role = parse_role(&row.get::<String, _>(3))?;
        if stored_role != role {
            return Ok(None);
        }

        Ok(Some(SessionUser {
            user_id: UserId(row.get(0)),
            username: row.get(1),
            display_name: row.get(2),
            role: stored_role,
        }))
    }

    async fn list_rooms(&self, filter: &RoomFilter) -> Result<Vec<RoomListing>> {
        let query = format!(
            "SELECT {ROOM_COLUMNS} FROM rooms r JOIN users u ON u.id = r.owner_id ORDER BY r.created_at DESC, r.id DESC"
        );
        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .context("failed to list rooms")?;

        let mut rooms = Vec::with_capacity(rows.len());
        for row in rows {
            let room = room_from_row(&row);
            if filter.matches(&room) {
                rooms.push(room);
            }
        }
        Ok(rooms)
    }

    async fn list_locations(&self) -> Result<Vec<String>> {
        let locations = sqlx::query_scalar("SELECT DISTINCT location FROM rooms ORDER BY location")
            .fetch_all(&self.pool)
            .await
            .context("failed to list locations")?;
        Ok(locations)
    }

    async fn rooms_for_owner(&self, owner: UserId) -> Result<Vec<RoomListing>> {
        let query = format!(
            "SELECT {ROOM_COLUMNS} FROM rooms r JOIN users u ON u.id = r.owner_id WHERE r.owner_id = ? ORDER BY r.created_at DESC, r.id DESC"
        );
        let rows = sqlx::query(&query)
            .bind(owner.0)
            .fetch_all(&self.pool)
            .await
            .with_context(|| format!("failed to list rooms for owner {owner}"))?;
        Ok(rows.iter().map(room_from_row).collect())
    }

    async fn add_room(&self, owner: UserId, room: &NewRoom) -> Result<RoomId> {
        room.validate()?;
        let id = sqlx::query(
            r#"
            INSERT INTO rooms (owner_id, location, price, description, room_type, contact_number, map_link, is_available)
            VALUES (?, ?, ?, ?, ?, ?, ?, 1)
            "#,
        )
        .bind(owner.0)
        .bind(room.location.trim())
        .bind(room.price)
        .bind(room.description.trim())
        .bind(room.room_type.as_deref())
        .bind(room.contact_number.as_deref())
        .bind(room.map_link.as_deref())
        .execute(&self.pool)
        .await
        .with_context(|| format!("failed to add room for owner {owner}"))?
        .last_insert_rowid();

        info!(room_id = id, owner_id = owner.0, "room listed");
        Ok(RoomId(id))
    }

    async fn update_room(&self, room_id: RoomId, owner: UserId, room: &NewRoom) -> Result<()> {
        room.validate()?;
        let result = sqlx::query(
            r#"
            UPDATE rooms
            SET location = ?, price = ?, description = ?, room_type = ?, contact_number = ?,
                map_link = ?, updated_at = CURRENT_TIMESTAMP
            WHERE id = ? AND owner_id = ?
            "#,
        )
        .bind(room.location.trim())
        .bind(room.price)
        .bind(room.description.trim())
        .bind(room.room_type.as_deref())
        .bind(room.contact_number.as_deref())
        .bind(room.map_link.as_deref())
        .bind(room_id.0)
        .bind(owner.0)
        .execute(&self.pool)
        .await
        .with_context(|| format!("failed to update room {room_id}"))?;

        if result.rows_affected() == 0 {
            return Err(ServiceError::not_found("Room not found.").into());
        }
        Ok(())
    }

    async fn set_room_available(
        &self,
        room_id: RoomId,
        owner: UserId,
        available: bool,
    ) -> Result<()> {
        let result = sqlx::query(
            "UPDATE rooms SET is_available = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ? AND owner_id = ?",
        )
        .bind(available)
        .bind(room_id.0)
        .bind(owner.0)
        .execute(&self.pool)
        .await
        .with_context(|| format!("failed to change availability of room {room_id}"))?;

        if result.rows_affected() == 0 {
            return Err(ServiceError::not_found("Room not found.").into());
        }
        Ok(())
    }

    async fn delete_room(&self, room_id: RoomId) -> Result<()> {
        let result = sqlx::query("DELETE FROM rooms WHERE id = ?")
            .bind(room_id.0)
            .execute(&self.pool)
            .await
            .with_context(|| format!("failed to delete room {room_id}"))?;

        if result.rows_affected() == 0 {
            return Err(ServiceError::not_found("Room not found.").into());
        }
        info!(room_id = room_id.0, "room deleted");
        Ok(())
    }

    async fn submit_feedback(&self, user: UserId, text: &str) -> Result<FeedbackId> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ServiceError::validation("Please enter your feedback.").into());
        }
        let id = sqlx::query("INSERT INTO feedback_and_issues (user_id, feedback_text) VALUES (?, ?)")
            .bind(user.0)
            .bind(text)
            .execute(&self.pool)
            .await
            .with_context(|| format!("failed to store feedback from user {user}"))?
            .last_insert_rowid();
        Ok(FeedbackId(id))
    }

    async fn list_feedback(&self) -> Result<Vec<FeedbackEntry>> {
        let rows = sqlx::query(
            r#"
            SELECT f.id, f.user_id, u.username, f.feedback_text, f.created_at
            FROM feedback_and_issues f
            JOIN users u ON u.id = f.user_id
            ORDER BY f.created_at DESC, f.id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .context("failed to list feedback")?;

        Ok(rows
            .into_iter()
            .map(|r| FeedbackEntry {
                feedback_id: FeedbackId(r.get(0)),
                user_id: UserId(r.get(1)),
                username: r.get(2),
                text: r.get(3),
                created_at: r.get::<DateTime<Utc>, _>(4),
            })
            .collect())
    }

    async fn delete_feedback(&self, feedback_id: FeedbackId) -> Result<()> {
        let result = sqlx::query("DELETE FROM feedback_and_issues WHERE id = ?")
            .bind(feedback_id.0)
            .execute(&self.pool)
            .await
            .with_context(|| format!("failed to delete feedback {feedback_id}"))?;

        if result.rows_affected() == 0 {
            return Err(ServiceError::not_found("Feedback not found.").into());
        }
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<UserSummary>> {
        let rows = sqlx::query(
            "SELECT id, username, display_name, user_type FROM users WHERE user_type != 'admin' ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .context("failed to list users")?;

        rows.into_iter()
            .map(|r| {
                Ok(UserSummary {
                    user_id: UserId(r.get(0)),
                    username: r.get(1),
                    display_name: r.get(2),
                    role: parse_role(&r.get::<String, _>(3))?,
                })
            })
            .collect()
    }

    async fn delete_user(&self, user_id: UserId) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM rooms WHERE owner_id = ?")
            .bind(user_id.0)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("failed to delete rooms of user {user_id}"))?;
        sqlx::query("DELETE FROM feedback_and_issues WHERE user_id = ?")
            .bind(user_id.0)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("failed to delete feedback of user {user_id}"))?;
        let result = sqlx::query("DELETE FROM users WHERE id = ? AND user_type != 'admin'")
            .bind(user_id.0)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("failed to delete user {user_id}"))?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(ServiceError::not_found("User not found.").into());
        }
        tx.commit().await?;
        info!(user_id = user_id.0, "user deleted");
        Ok(())
    }

    async fn user_counts(&self) -> Result<Vec<RoleCount>> {
        let rows = sqlx::query("SELECT user_type, COUNT(*) FROM users GROUP BY user_type")
            .fetch_all(&self.pool)
            .await
            .context("failed to count users")?;

        let mut counts: Vec<RoleCount> = Role::ALL
            .into_iter()
            .map(|role| RoleCount { role, count: 0 })
            .collect();
        for row in rows {
            let role = parse_role(&row.get::<String, _>(0))?;
            let count: i64 = row.get(1);
            if let Some(entry) = counts.iter_mut().find(|entry| entry.role == role) {
                entry.count = count;
            }
        }
        Ok(counts)
    }
}

pub fn hash_password(password: &str) -> String {
    format!("{:x}", Sha256::digest(password.as_bytes()))
}

fn parse_role(value: &str) -> Result<Role> {
    Role::from_str(value).with_context(|| format!("corrupt user_type column: {value}"))
}

fn room_from_row(r: &SqliteRow) -> RoomListing {
    RoomListing {
        room_id: RoomId(r.get(0)),
        owner_id: UserId(r.get(1)),
        owner_name: r.get(2),
        location: r.get(3),
        price: r.get(4),
        description: r.get(5),
        room_type: r.get(6),
        contact_number: r.get(7),
        map_link: r.get(8),
        available: r.get::<i64, _>(9) != 0,
        created_at: r.get::<DateTime<Utc>, _>(10),
    }
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

pub fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url == "sqlite::memory:" || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
