//! PostgreSQL user store implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use courtbook_core::error::{AppError, ErrorKind};
use courtbook_core::result::AppResult;
use courtbook_core::traits::UserStore;
use courtbook_entity::user::{NewUser, User};

/// sqlx-backed [`UserStore`].
#[derive(Debug, Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    /// Create a new user store over the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user by id", e))
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(username) = LOWER($1)")
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find user by username", e)
            })
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(email) = LOWER($1)")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find user by email", e)
            })
    }

    async fn create(&self, user: NewUser) -> AppResult<User> {
        let now = Utc::now();
        let record = User {
            id: Uuid::new_v4(),
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            display_name: user.display_name,
            phone: user.phone,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"INSERT INTO users (id, username, email, password_hash, display_name, phone, created_at, updated_at)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8)"#,
        )
        .bind(record.id)
        .bind(&record.username)
        .bind(&record.email)
        .bind(&record.password_hash)
        .bind(&record.display_name)
        .bind(&record.phone)
        .bind(record.created_at)
        .bind(record.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match &e {
            // The unique indexes on lower(username)/lower(email) make
            // concurrent duplicate registrations lose deterministically.
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::conflict("User already exists")
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to create user", e),
        })?;

        Ok(record)
    }
}
