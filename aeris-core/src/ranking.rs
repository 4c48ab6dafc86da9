//! Itinerary ranking.
//!
//! The order is total: ascending total duration, ties broken by first-leg
//! flight id, remaining ties by second-leg flight id (a direct itinerary
//! sorts before a connecting one with the same duration and first leg).

use crate::models::Itinerary;
use std::cmp::Ordering;

/// Stateless comparator over (total duration, first-leg fid, second-leg fid).
pub fn compare(a: &Itinerary, b: &Itinerary) -> Ordering {
    a.total_time()
        .cmp(&b.total_time())
        .then_with(|| a.first.fid.cmp(&b.first.fid))
        .then_with(|| second_fid(a).cmp(&second_fid(b)))
}

/// Sorts itineraries into ranked order, best first.
pub fn rank(itineraries: &mut [Itinerary]) {
    itineraries.sort_by(compare);
}

fn second_fid(itinerary: &Itinerary) -> Option<i32> {
    itinerary.second.as_ref().map(|f| f.fid)
}
