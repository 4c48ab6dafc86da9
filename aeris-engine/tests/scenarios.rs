//! End-to-end scenarios against a live PostgreSQL instance.
//!
//! Ignored by default: they need `DATABASE_URL` pointing at a scratch
//! database. Reservation ids restart from the global count after each reset,
//! so run the suite one test at a time:
//!
//!     DATABASE_URL=postgres://localhost/aeris_test \
//!         cargo test -p aeris-engine -- --ignored --test-threads=1

use aeris_engine::Session;
use aeris_store::StoreClient;

async fn connect() -> StoreClient {
    let url = std::env::var("DATABASE_URL").expect("set DATABASE_URL to a scratch database");
    let client = StoreClient::connect_lazy(&url).expect("pool");
    client.migrate().await.expect("migrations");
    client
}

async fn seed_flight(
    client: &StoreClient,
    fid: i32,
    day: i32,
    origin: &str,
    dest: &str,
    duration: i32,
    price: i32,
    tail: &str,
    seats: Option<i32>,
) {
    if let Some(seats) = seats {
        sqlx::query(
            "INSERT INTO aircraft (tail_num, seats) VALUES ($1, $2) \
             ON CONFLICT (tail_num) DO UPDATE SET seats = EXCLUDED.seats",
        )
        .bind(tail)
        .bind(seats)
        .execute(&client.pool)
        .await
        .expect("seed aircraft");
    }

    sqlx::query(
        "INSERT INTO flights (fid, day_of_month, carrier_id, flight_num, origin_city, dest_city, duration_mins, price, tail_num) \
         VALUES ($1, $2, 'AS', $1, $3, $4, $5, $6, $7) \
         ON CONFLICT (fid) DO UPDATE SET day_of_month = EXCLUDED.day_of_month, \
             origin_city = EXCLUDED.origin_city, dest_city = EXCLUDED.dest_city, \
             duration_mins = EXCLUDED.duration_mins, price = EXCLUDED.price, \
             tail_num = EXCLUDED.tail_num",
    )
    .bind(fid)
    .bind(day)
    .bind(origin)
    .bind(dest)
    .bind(duration)
    .bind(price)
    .bind(tail)
    .execute(&client.pool)
    .await
    .expect("seed flight");
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL with DATABASE_URL set"]
async fn scenario_signup_search_book_pay_list() {
    let client = connect().await;
    seed_flight(&client, 9001, 5, "San Francisco CA", "New York NY", 120, 100, "N9001", Some(100)).await;
    seed_flight(&client, 9002, 5, "San Francisco CA", "New York NY", 90, 80, "N9002", Some(100)).await;

    let mut session = Session::new(client.clone());
    session.reset_state().await.expect("reset");

    assert_eq!(
        session.create_customer("alice", "pw", 100).await,
        "Created user alice\n"
    );
    assert_eq!(session.login("alice", "pw").await, "Logged in as alice\n");
    assert_eq!(session.login("alice", "pw").await, "User already logged in\n");

    let listing = session
        .search("San Francisco CA", "New York NY", true, 5, 3)
        .await;
    assert!(
        listing.starts_with("Itinerary 0: 1 flight(s), 90 minutes\n"),
        "shorter flight must rank first: {listing}"
    );
    assert!(listing.contains("Itinerary 1: 1 flight(s), 120 minutes\n"));

    assert_eq!(
        session.book(0).await,
        "Booked flight(s), reservation ID: 1\n"
    );
    assert_eq!(
        session.book(1).await,
        "You cannot book two flights in the same day\n"
    );

    assert_eq!(
        session.pay(1).await,
        "Paid reservation: 1 remaining balance: 20\n"
    );
    assert_eq!(
        session.pay(1).await,
        "Cannot find unpaid reservation 1 under user: alice\n"
    );

    let reservations = session.list_reservations().await;
    assert!(
        reservations.starts_with("Reservation 1 paid: true:\n"),
        "paid flag must be visible in the listing: {reservations}"
    );
    assert!(reservations.contains("ID: 9002"));
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL with DATABASE_URL set"]
async fn scenario_payment_reports_exact_shortfall_and_rolls_back() {
    let client = connect().await;
    seed_flight(&client, 9003, 6, "Austin TX", "Denver CO", 60, 500, "N9003", Some(50)).await;

    let mut session = Session::new(client.clone());
    session.reset_state().await.expect("reset");

    assert_eq!(
        session.create_customer("bob", "pw", 40).await,
        "Created user bob\n"
    );
    assert_eq!(session.login("bob", "pw").await, "Logged in as bob\n");

    let listing = session.search("Austin TX", "Denver CO", true, 6, 1).await;
    assert!(listing.starts_with("Itinerary 0:"));
    assert_eq!(
        session.book(0).await,
        "Booked flight(s), reservation ID: 1\n"
    );

    assert_eq!(
        session.pay(1).await,
        "User has only 40 in account but itinerary costs 500\n"
    );

    // The failed payment left no partial mutation behind.
    let reservations = session.list_reservations().await;
    assert!(reservations.starts_with("Reservation 1 paid: false:\n"));
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL with DATABASE_URL set"]
async fn scenario_duplicate_username_is_rejected() {
    let client = connect().await;

    let mut session = Session::new(client.clone());
    session.reset_state().await.expect("reset");

    assert_eq!(
        session.create_customer("carol", "pw", 10).await,
        "Created user carol\n"
    );
    assert_eq!(
        session.create_customer("carol", "other", 10).await,
        "Failed to create user\n"
    );
}

#[tokio::test]
#[ignore = "requires a running PostgreSQL with DATABASE_URL set"]
async fn scenario_unresolved_capacity_is_unbookable() {
    let client = connect().await;
    // No aircraft row for this tail number: capacity resolves to -1.
    seed_flight(&client, 9004, 8, "Fresno CA", "Portland OR", 95, 60, "N-MISSING", None).await;

    let mut session = Session::new(client.clone());
    session.reset_state().await.expect("reset");

    assert_eq!(
        session.create_customer("dave", "pw", 100).await,
        "Created user dave\n"
    );
    assert_eq!(session.login("dave", "pw").await, "Logged in as dave\n");

    let listing = session.search("Fresno CA", "Portland OR", true, 8, 1).await;
    assert!(listing.contains("Capacity: -1"), "{listing}");
    assert_eq!(session.book(0).await, "Booking failed\n");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore = "requires a running PostgreSQL with DATABASE_URL set"]
async fn concurrent_bookings_never_oversell_the_last_seat() {
    let client = connect().await;
    seed_flight(&client, 9107, 7, "Reno NV", "Boise ID", 70, 30, "N9107", Some(1)).await;

    let mut admin = Session::new(client.clone());
    admin.reset_state().await.expect("reset");
    assert_eq!(
        admin.create_customer("racer1", "pw", 50).await,
        "Created user racer1\n"
    );
    assert_eq!(
        admin.create_customer("racer2", "pw", 50).await,
        "Created user racer2\n"
    );

    let mut handles = Vec::new();
    for name in ["racer1", "racer2"] {
        let client = client.clone();
        handles.push(tokio::spawn(async move {
            let mut session = Session::new(client);
            assert_eq!(
                session.login(name, "pw").await,
                format!("Logged in as {}\n", name)
            );
            let listing = session.search("Reno NV", "Boise ID", true, 7, 1).await;
            assert!(listing.starts_with("Itinerary 0:"), "{listing}");
            session.book(0).await
        }));
    }

    let mut outcomes = Vec::new();
    for handle in handles {
        outcomes.push(handle.await.expect("racer task"));
    }

    let wins = outcomes
        .iter()
        .filter(|o| o.starts_with("Booked flight(s), reservation ID:"))
        .count();
    let losses = outcomes.iter().filter(|o| *o == "Booking failed\n").count();
    assert_eq!(wins, 1, "exactly one racer gets the seat: {:?}", outcomes);
    assert_eq!(losses, 1, "the other observes the failure: {:?}", outcomes);

    let booked: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM reservations WHERE f1_fid = $1 OR f2_fid = $1")
            .bind(9107)
            .fetch_one(&client.pool)
            .await
            .expect("seat count");
    assert_eq!(booked, 1, "the capacity invariant must hold");
}
