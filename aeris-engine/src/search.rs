use crate::error::{report, EngineError};
use crate::session::Session;
use aeris_core::{ranking, Itinerary};
use aeris_store::flights;

impl Session {
    /// Replaces the session's itinerary list with the ranked results for a
    /// route and day, capped at `limit`. Indirect routes are only queried
    /// when the direct results leave room and the caller allows them.
    pub async fn search(
        &mut self,
        origin: &str,
        dest: &str,
        direct_only: bool,
        day: i32,
        limit: i32,
    ) -> String {
        match self.try_search(origin, dest, direct_only, day, limit).await {
            Ok(0) => "No flights match your selection\n".to_string(),
            Ok(_) => render_itineraries(&self.itineraries),
            Err(err) => {
                report("search", &err);
                "Failed to search\n".to_string()
            }
        }
    }

    async fn try_search(
        &mut self,
        origin: &str,
        dest: &str,
        direct_only: bool,
        day: i32,
        limit: i32,
    ) -> Result<usize, EngineError> {
        if limit <= 0 {
            return Err(EngineError::Validation(
                "itinerary limit must be positive".to_string(),
            ));
        }
        let limit = limit as usize;
        self.itineraries.clear();

        let mut results: Vec<Itinerary> =
            flights::direct_flights(&self.store.pool, origin, dest, day)
                .await?
                .into_iter()
                .map(Itinerary::direct)
                .collect();

        if results.len() >= limit {
            // Directs alone fill the request; indirect search is skipped.
            ranking::rank(&mut results);
            results.truncate(limit);
        } else if !direct_only {
            let remaining = limit - results.len();
            let mut connecting: Vec<Itinerary> =
                flights::connecting_flights(&self.store.pool, origin, dest, day)
                    .await?
                    .into_iter()
                    .map(|(first, second)| Itinerary::connecting(first, second))
                    .collect();
            ranking::rank(&mut connecting);
            connecting.truncate(remaining);
            results.extend(connecting);
        }

        ranking::rank(&mut results);
        self.itineraries = results;
        Ok(self.itineraries.len())
    }
}

/// Renders the ranked list: index, leg count, total duration, then one
/// detail line per leg.
fn render_itineraries(itineraries: &[Itinerary]) -> String {
    let mut out = String::new();
    for (index, itinerary) in itineraries.iter().enumerate() {
        out.push_str(&format!(
            "Itinerary {}: {} flight(s), {} minutes\n",
            index,
            itinerary.leg_count(),
            itinerary.total_time()
        ));
        for leg in itinerary.legs() {
            out.push_str(&format!("{}\n", leg));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use aeris_core::models::Flight;
    use aeris_store::StoreClient;

    fn flight(fid: i32, duration: i32) -> Flight {
        Flight {
            fid,
            day_of_month: 5,
            carrier_id: "UA".to_string(),
            flight_num: 700 + fid,
            origin_city: "San Francisco CA".to_string(),
            dest_city: "New York NY".to_string(),
            duration_mins: duration,
            capacity: 120,
            price: 80,
        }
    }

    #[test]
    fn test_render_lists_ranked_itineraries_with_leg_detail() {
        let mut list = vec![
            Itinerary::direct(flight(1, 120)),
            Itinerary::direct(flight(2, 90)),
        ];
        ranking::rank(&mut list);
        let out = render_itineraries(&list);

        let expected = format!(
            "Itinerary 0: 1 flight(s), 90 minutes\n{}\nItinerary 1: 1 flight(s), 120 minutes\n{}\n",
            flight(2, 90),
            flight(1, 120),
        );
        assert_eq!(out, expected);
    }

    #[test]
    fn test_render_appends_second_leg_only_when_present() {
        let list = vec![Itinerary::connecting(flight(1, 60), flight(2, 45))];
        let out = render_itineraries(&list);

        assert!(out.starts_with("Itinerary 0: 2 flight(s), 105 minutes\n"));
        assert_eq!(out.lines().count(), 3);
    }

    #[tokio::test]
    async fn test_search_rejects_non_positive_limit_without_store_access() {
        let store = StoreClient::connect_lazy("postgres://localhost/aeris_test")
            .expect("lazy pool");
        let mut session = Session::new(store);
        session.itineraries = vec![Itinerary::direct(flight(1, 90))];

        assert_eq!(session.search("A", "B", true, 5, 0).await, "Failed to search\n");
        // Rejected before the cache is cleared.
        assert_eq!(session.itineraries.len(), 1);
    }
}
