use serde::{Deserialize, Serialize};
use std::fmt;

/// A single flight segment, static reference data plus its resolved capacity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flight {
    pub fid: i32,
    pub day_of_month: i32,
    pub carrier_id: String,
    pub flight_num: i32,
    pub origin_city: String,
    pub dest_city: String,
    pub duration_mins: i32,
    /// Seat count from the aircraft table; -1 when the tail number has no
    /// entry, which no booked count can undercut.
    pub capacity: i32,
    pub price: i32,
}

impl fmt::Display for Flight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {} Day: {} Carrier: {} Number: {} Origin: {} Dest: {} Duration: {} Capacity: {} Price: {}",
            self.fid,
            self.day_of_month,
            self.carrier_id,
            self.flight_num,
            self.origin_city,
            self.dest_city,
            self.duration_mins,
            self.capacity,
            self.price,
        )
    }
}

/// A candidate booking option: one flight (direct) or two chained flights.
///
/// Itineraries only exist inside a session's ranked search results; they are
/// never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Itinerary {
    pub first: Flight,
    pub second: Option<Flight>,
}

impl Itinerary {
    pub fn direct(flight: Flight) -> Self {
        Self {
            first: flight,
            second: None,
        }
    }

    pub fn connecting(first: Flight, second: Flight) -> Self {
        Self {
            first,
            second: Some(second),
        }
    }

    /// Sum of leg durations, the primary ranking key.
    pub fn total_time(&self) -> i32 {
        self.first.duration_mins + self.second.as_ref().map_or(0, |f| f.duration_mins)
    }

    pub fn leg_count(&self) -> usize {
        if self.second.is_some() {
            2
        } else {
            1
        }
    }

    pub fn legs(&self) -> impl Iterator<Item = &Flight> {
        std::iter::once(&self.first).chain(self.second.as_ref())
    }
}

/// A persisted booking. `second_fid` is `None` for direct itineraries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub rid: i32,
    pub first_fid: i32,
    pub second_fid: Option<i32>,
    pub username: String,
    pub is_paid: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub password_hash: String,
    pub balance: i32,
}
