//! Static flight reference data. Capacity comes from the aircraft seat-count
//! table; a tail number with no entry resolves to the -1 sentinel, which no
//! booked count can undercut.

use crate::error::StoreError;
use aeris_core::models::Flight;
use sqlx::PgExecutor;

#[derive(Debug, sqlx::FromRow)]
pub struct FlightRow {
    pub fid: i32,
    pub day_of_month: i32,
    pub carrier_id: String,
    pub flight_num: i32,
    pub origin_city: String,
    pub dest_city: String,
    pub duration_mins: i32,
    pub capacity: i32,
    pub price: i32,
}

impl From<FlightRow> for Flight {
    fn from(row: FlightRow) -> Self {
        Flight {
            fid: row.fid,
            day_of_month: row.day_of_month,
            carrier_id: row.carrier_id,
            flight_num: row.flight_num,
            origin_city: row.origin_city,
            dest_city: row.dest_city,
            duration_mins: row.duration_mins,
            capacity: row.capacity,
            price: row.price,
        }
    }
}

// Both legs of a connecting pair in one row.
#[derive(Debug, sqlx::FromRow)]
struct ConnectingRow {
    f1_fid: i32,
    f1_day_of_month: i32,
    f1_carrier_id: String,
    f1_flight_num: i32,
    f1_origin_city: String,
    f1_dest_city: String,
    f1_duration_mins: i32,
    f1_capacity: i32,
    f1_price: i32,
    f2_fid: i32,
    f2_day_of_month: i32,
    f2_carrier_id: String,
    f2_flight_num: i32,
    f2_origin_city: String,
    f2_dest_city: String,
    f2_duration_mins: i32,
    f2_capacity: i32,
    f2_price: i32,
}

/// Non-cancelled direct flights for a route on a day of month.
pub async fn direct_flights<'e>(
    executor: impl PgExecutor<'e>,
    origin: &str,
    dest: &str,
    day: i32,
) -> Result<Vec<Flight>, StoreError> {
    let rows: Vec<FlightRow> = sqlx::query_as(
        r#"
        SELECT f.fid, f.day_of_month, f.carrier_id, f.flight_num, f.origin_city,
               f.dest_city, f.duration_mins, COALESCE(a.seats, -1) AS capacity, f.price
        FROM flights f
        LEFT JOIN aircraft a ON a.tail_num = f.tail_num
        WHERE f.origin_city = $1 AND f.dest_city = $2 AND f.day_of_month = $3
          AND f.cancelled = 0
        "#,
    )
    .bind(origin)
    .bind(dest)
    .bind(day)
    .fetch_all(executor)
    .await?;

    Ok(rows.into_iter().map(Flight::from).collect())
}

/// Non-cancelled connecting pairs: first leg's destination feeds the second
/// leg's origin, distinct flight ids, both legs on the same day of month.
pub async fn connecting_flights<'e>(
    executor: impl PgExecutor<'e>,
    origin: &str,
    dest: &str,
    day: i32,
) -> Result<Vec<(Flight, Flight)>, StoreError> {
    let rows: Vec<ConnectingRow> = sqlx::query_as(
        r#"
        SELECT f1.fid AS f1_fid, f1.day_of_month AS f1_day_of_month,
               f1.carrier_id AS f1_carrier_id, f1.flight_num AS f1_flight_num,
               f1.origin_city AS f1_origin_city, f1.dest_city AS f1_dest_city,
               f1.duration_mins AS f1_duration_mins,
               COALESCE(a1.seats, -1) AS f1_capacity, f1.price AS f1_price,
               f2.fid AS f2_fid, f2.day_of_month AS f2_day_of_month,
               f2.carrier_id AS f2_carrier_id, f2.flight_num AS f2_flight_num,
               f2.origin_city AS f2_origin_city, f2.dest_city AS f2_dest_city,
               f2.duration_mins AS f2_duration_mins,
               COALESCE(a2.seats, -1) AS f2_capacity, f2.price AS f2_price
        FROM flights f1
        JOIN flights f2 ON f1.dest_city = f2.origin_city AND f1.fid <> f2.fid
        LEFT JOIN aircraft a1 ON a1.tail_num = f1.tail_num
        LEFT JOIN aircraft a2 ON a2.tail_num = f2.tail_num
        WHERE f1.origin_city = $1 AND f2.dest_city = $2
          AND f1.day_of_month = $3 AND f2.day_of_month = $3
          AND f1.cancelled = 0 AND f2.cancelled = 0
        "#,
    )
    .bind(origin)
    .bind(dest)
    .bind(day)
    .fetch_all(executor)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| {
            (
                Flight {
                    fid: row.f1_fid,
                    day_of_month: row.f1_day_of_month,
                    carrier_id: row.f1_carrier_id,
                    flight_num: row.f1_flight_num,
                    origin_city: row.f1_origin_city,
                    dest_city: row.f1_dest_city,
                    duration_mins: row.f1_duration_mins,
                    capacity: row.f1_capacity,
                    price: row.f1_price,
                },
                Flight {
                    fid: row.f2_fid,
                    day_of_month: row.f2_day_of_month,
                    carrier_id: row.f2_carrier_id,
                    flight_num: row.f2_flight_num,
                    origin_city: row.f2_origin_city,
                    dest_city: row.f2_dest_city,
                    duration_mins: row.f2_duration_mins,
                    capacity: row.f2_capacity,
                    price: row.f2_price,
                },
            )
        })
        .collect())
}

/// Looks up a flight by id with its capacity resolved, cancelled or not.
/// A reservation always references existing flights, so a missing row is a
/// store fault.
pub async fn lookup<'e>(executor: impl PgExecutor<'e>, fid: i32) -> Result<Flight, StoreError> {
    let row: FlightRow = sqlx::query_as(
        r#"
        SELECT f.fid, f.day_of_month, f.carrier_id, f.flight_num, f.origin_city,
               f.dest_city, f.duration_mins, COALESCE(a.seats, -1) AS capacity, f.price
        FROM flights f
        LEFT JOIN aircraft a ON a.tail_num = f.tail_num
        WHERE f.fid = $1
        "#,
    )
    .bind(fid)
    .fetch_one(executor)
    .await?;

    Ok(Flight::from(row))
}

/// Stored price of a single flight.
pub async fn price<'e>(executor: impl PgExecutor<'e>, fid: i32) -> Result<i32, StoreError> {
    let price: i32 = sqlx::query_scalar("SELECT price FROM flights WHERE fid = $1")
        .bind(fid)
        .fetch_one(executor)
        .await?;
    Ok(price)
}
