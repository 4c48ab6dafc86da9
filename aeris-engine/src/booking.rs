use crate::error::{report, EngineError};
use crate::session::Session;
use aeris_core::models::Reservation;
use aeris_core::Itinerary;
use aeris_store::reservations;
use tracing::info;

impl Session {
    /// Books the itinerary at `index` in the session's ranked list.
    ///
    /// Each attempt is one serializable transaction: duplicate-day check,
    /// per-leg seat check, then insert under the next reservation id.
    /// Conflicts are replayed with identical inputs up to the retry bound.
    pub async fn book(&self, index: usize) -> String {
        match self.try_book(index).await {
            Ok(rid) => format!("Booked flight(s), reservation ID: {}\n", rid),
            Err(EngineError::NotLoggedIn) => {
                "Cannot book reservations, not logged in\n".to_string()
            }
            Err(EngineError::NoSuchItinerary(index)) => format!("No such itinerary {}\n", index),
            Err(EngineError::DuplicateDay(_)) => {
                "You cannot book two flights in the same day\n".to_string()
            }
            Err(err) => {
                report("book", &err);
                "Booking failed\n".to_string()
            }
        }
    }

    async fn try_book(&self, index: usize) -> Result<i32, EngineError> {
        let Some(username) = self.user.as_deref() else {
            return Err(EngineError::NotLoggedIn);
        };
        let Some(itinerary) = self.itineraries.get(index) else {
            return Err(EngineError::NoSuchItinerary(index));
        };

        self.policy
            .run(EngineError::is_transient, || {
                self.book_once(username, itinerary)
            })
            .await
    }

    async fn book_once(&self, username: &str, itinerary: &Itinerary) -> Result<i32, EngineError> {
        let mut tx = self.store.begin_serializable().await?;

        // The duplicate-day rule is defined against the first leg's day;
        // both legs share a day by construction.
        let day = itinerary.first.day_of_month;
        if reservations::count_on_day_for_user(&mut *tx, day, username).await? > 0 {
            return Err(EngineError::DuplicateDay(day));
        }

        for leg in itinerary.legs() {
            let booked = reservations::count_on_flight(&mut *tx, leg.fid).await?;
            if booked >= i64::from(leg.capacity) {
                return Err(EngineError::NoCapacity(leg.fid));
            }
        }

        // Not a store-managed sequence: a concurrent booking computes the
        // same id, the isolation level aborts one of the two transactions,
        // and the loser replays.
        let rid = reservations::total(&mut *tx).await? as i32 + 1;
        let reservation = Reservation {
            rid,
            first_fid: itinerary.first.fid,
            second_fid: itinerary.second.as_ref().map(|f| f.fid),
            username: username.to_string(),
            is_paid: false,
        };
        reservations::insert(&mut *tx, &reservation).await?;
        tx.commit().await?;

        info!("booked reservation {} for {}", rid, username);
        Ok(rid)
    }
}
