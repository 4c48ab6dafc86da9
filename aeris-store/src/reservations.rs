use crate::error::StoreError;
use aeris_core::models::Reservation;
use sqlx::PgExecutor;

#[derive(Debug, sqlx::FromRow)]
pub struct ReservationRow {
    pub rid: i32,
    pub f1_fid: i32,
    pub f2_fid: Option<i32>,
    pub username: String,
    pub is_paid: bool,
}

impl From<ReservationRow> for Reservation {
    fn from(row: ReservationRow) -> Self {
        Reservation {
            rid: row.rid,
            first_fid: row.f1_fid,
            second_fid: row.f2_fid,
            username: row.username,
            is_paid: row.is_paid,
        }
    }
}

/// Counts a user's reservations whose first leg departs on `day`.
///
/// Only the first leg is inspected; both legs of a connecting itinerary share
/// a day by construction, and the duplicate-day rule is defined against the
/// first leg.
pub async fn count_on_day_for_user<'e>(
    executor: impl PgExecutor<'e>,
    day: i32,
    username: &str,
) -> Result<i64, StoreError> {
    let count: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM reservations r
        JOIN flights f ON r.f1_fid = f.fid
        WHERE f.day_of_month = $1 AND r.username = $2
        "#,
    )
    .bind(day)
    .bind(username)
    .fetch_one(executor)
    .await?;
    Ok(count)
}

/// Counts reservations referencing a flight in either leg slot.
pub async fn count_on_flight<'e>(
    executor: impl PgExecutor<'e>,
    fid: i32,
) -> Result<i64, StoreError> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM reservations WHERE f1_fid = $1 OR f2_fid = $1")
            .bind(fid)
            .fetch_one(executor)
            .await?;
    Ok(count)
}

/// Total reservation count; the next reservation id is this plus one, so the
/// enclosing transaction's isolation is what keeps ids unique.
pub async fn total<'e>(executor: impl PgExecutor<'e>) -> Result<i64, StoreError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reservations")
        .fetch_one(executor)
        .await?;
    Ok(count)
}

pub async fn insert<'e>(
    executor: impl PgExecutor<'e>,
    reservation: &Reservation,
) -> Result<(), StoreError> {
    sqlx::query(
        "INSERT INTO reservations (rid, f1_fid, f2_fid, username, is_paid) VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(reservation.rid)
    .bind(reservation.first_fid)
    .bind(reservation.second_fid)
    .bind(&reservation.username)
    .bind(reservation.is_paid)
    .execute(executor)
    .await?;
    Ok(())
}

pub async fn find<'e>(
    executor: impl PgExecutor<'e>,
    rid: i32,
) -> Result<Option<Reservation>, StoreError> {
    let row: Option<ReservationRow> = sqlx::query_as(
        "SELECT rid, f1_fid, f2_fid, username, is_paid FROM reservations WHERE rid = $1",
    )
    .bind(rid)
    .fetch_optional(executor)
    .await?;
    Ok(row.map(Reservation::from))
}

/// Flips a reservation to paid. The false-to-true transition happens at most
/// once; callers check the current flag inside the same transaction.
pub async fn mark_paid<'e>(executor: impl PgExecutor<'e>, rid: i32) -> Result<(), StoreError> {
    sqlx::query("UPDATE reservations SET is_paid = TRUE WHERE rid = $1")
        .bind(rid)
        .execute(executor)
        .await?;
    Ok(())
}

pub async fn list_for_user<'e>(
    executor: impl PgExecutor<'e>,
    username: &str,
) -> Result<Vec<Reservation>, StoreError> {
    let rows: Vec<ReservationRow> = sqlx::query_as(
        "SELECT rid, f1_fid, f2_fid, username, is_paid FROM reservations WHERE username = $1 ORDER BY rid",
    )
    .bind(username)
    .fetch_all(executor)
    .await?;
    Ok(rows.into_iter().map(Reservation::from).collect())
}

pub async fn delete_all<'e>(executor: impl PgExecutor<'e>) -> Result<(), StoreError> {
    sqlx::query("DELETE FROM reservations")
        .execute(executor)
        .await?;
    Ok(())
}
