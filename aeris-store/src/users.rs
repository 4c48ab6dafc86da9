use crate::error::StoreError;
use aeris_core::models::User;
use sqlx::PgExecutor;

#[derive(Debug, sqlx::FromRow)]
pub struct UserRow {
    pub username: String,
    pub password_hash: String,
    pub balance: i32,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            username: row.username,
            password_hash: row.password_hash,
            balance: row.balance,
        }
    }
}

pub async fn find<'e>(
    executor: impl PgExecutor<'e>,
    username: &str,
) -> Result<Option<User>, StoreError> {
    let row: Option<UserRow> =
        sqlx::query_as("SELECT username, password_hash, balance FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(executor)
            .await?;
    Ok(row.map(User::from))
}

pub async fn insert<'e>(executor: impl PgExecutor<'e>, user: &User) -> Result<(), StoreError> {
    sqlx::query("INSERT INTO users (username, password_hash, balance) VALUES ($1, $2, $3)")
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(user.balance)
        .execute(executor)
        .await?;
    Ok(())
}

/// Current balance of a user that must exist; a missing row is a store
/// fault, not a business outcome.
pub async fn balance<'e>(
    executor: impl PgExecutor<'e>,
    username: &str,
) -> Result<i32, StoreError> {
    let balance: i32 = sqlx::query_scalar("SELECT balance FROM users WHERE username = $1")
        .bind(username)
        .fetch_one(executor)
        .await?;
    Ok(balance)
}

/// Lowers a user's balance by `amount`.
pub async fn debit_balance<'e>(
    executor: impl PgExecutor<'e>,
    username: &str,
    amount: i32,
) -> Result<(), StoreError> {
    sqlx::query("UPDATE users SET balance = balance - $1 WHERE username = $2")
        .bind(amount)
        .bind(username)
        .execute(executor)
        .await?;
    Ok(())
}

pub async fn delete_all<'e>(executor: impl PgExecutor<'e>) -> Result<(), StoreError> {
    sqlx::query("DELETE FROM users").execute(executor).await?;
    Ok(())
}
