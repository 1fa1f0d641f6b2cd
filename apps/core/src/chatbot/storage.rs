use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::{Sqlite, SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{Executor, FromRow};
use std::str::FromStr;
use tracing::info;

use crate::error::AppError;
use crate::preprocessing::{lowercase_text, remove_punctuation};

/// A stored statement, optionally linked to the statement it answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct StatementRecord {
    pub id: i64,
    pub text: String,
    /// Lowercased, punctuation-free form used for matching
    pub search_text: String,
    pub in_response_to: Option<String>,
    /// Unix timestamp of insertion
    pub created_at: i64,
}

/// A statement that has at least one known response.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct KnownInput {
    pub text: String,
    pub search_text: String,
}

/// Matching key for `text`: lowercase, no punctuation, single spaces.
pub fn search_text(text: &str) -> String {
    remove_punctuation(&lowercase_text(text))
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

async fn insert_statement<'e, E>(
    executor: E,
    text: &str,
    in_response_to: Option<&str>,
) -> Result<StatementRecord, AppError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let record = sqlx::query_as::<_, StatementRecord>(
        r#"
        INSERT INTO statements (text, search_text, in_response_to, created_at)
        VALUES (?, ?, ?, ?)
        RETURNING id, text, search_text, in_response_to, created_at
        "#,
    )
    .bind(text)
    .bind(search_text(text))
    .bind(in_response_to)
    .bind(Utc::now().timestamp())
    .fetch_one(executor)
    .await?;

    Ok(record)
}

/// SQLite-backed conversation statement store.
#[derive(Clone)]
pub struct StatementStorage {
    pool: SqlitePool,
}

impl StatementStorage {
    /// Opens (or creates) the database at `database_url` and applies the schema.
    pub async fn connect(database_url: &str) -> Result<Self, AppError> {
        info!("Initializing statement storage at: {}", database_url);

        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

        // Every pooled connection to an in-memory database sees its own copy,
        // so keep exactly one connection alive for the pool's lifetime.
        let in_memory = database_url.contains(":memory:");
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(5)
        };

        let pool = pool_options.connect_with(options).await?;
        Self::from_pool(pool).await
    }

    /// Wraps an existing pool and applies the schema.
    pub async fn from_pool(pool: SqlitePool) -> Result<Self, AppError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS statements (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                text TEXT NOT NULL,
                search_text TEXT NOT NULL,
                in_response_to TEXT,
                created_at INTEGER NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_statements_in_response_to
                ON statements(in_response_to);
            "#,
        )
        .execute(&pool)
        .await?;

        info!("Statement storage ready.");
        Ok(Self { pool })
    }

    pub async fn add(
        &self,
        text: &str,
        in_response_to: Option<&str>,
    ) -> Result<StatementRecord, AppError> {
        insert_statement(&self.pool, text, in_response_to).await
    }

    /// Stores every conversation line linked to the line before it, in one
    /// transaction. On error nothing is stored.
    ///
    /// Returns the number of statements stored.
    pub async fn add_conversations(
        &self,
        conversations: &[Vec<String>],
    ) -> Result<usize, AppError> {
        let mut tx = self.pool.begin().await?;
        let mut stored = 0;

        for conversation in conversations {
            let mut previous: Option<&str> = None;
            for line in conversation {
                insert_statement(&mut *tx, line, previous).await?;
                previous = Some(line.as_str());
                stored += 1;
            }
        }

        tx.commit().await?;
        Ok(stored)
    }

    pub async fn count(&self) -> Result<i64, AppError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM statements")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn all(&self) -> Result<Vec<StatementRecord>, AppError> {
        let records = sqlx::query_as::<_, StatementRecord>(
            r#"
            SELECT id, text, search_text, in_response_to, created_at
            FROM statements
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    /// Statements stored as answers to exactly `text`, oldest first.
    pub async fn responses_to(&self, text: &str) -> Result<Vec<StatementRecord>, AppError> {
        let records = sqlx::query_as::<_, StatementRecord>(
            r#"
            SELECT id, text, search_text, in_response_to, created_at
            FROM statements
            WHERE in_response_to = ?
            ORDER BY id ASC
            "#,
        )
        .bind(text)
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    /// Distinct statements that some other statement answers.
    pub async fn known_inputs(&self) -> Result<Vec<KnownInput>, AppError> {
        let inputs = sqlx::query_as::<_, KnownInput>(
            r#"
            SELECT text, MIN(search_text) AS search_text
            FROM statements s
            WHERE EXISTS (SELECT 1 FROM statements r WHERE r.in_response_to = s.text)
            GROUP BY text
            ORDER BY MIN(id) ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(inputs)
    }
}
