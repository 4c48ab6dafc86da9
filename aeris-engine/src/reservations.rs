use crate::error::{report, EngineError};
use crate::session::Session;
use aeris_store::{flights, reservations};

impl Session {
    /// Lists the caller's reservations by ascending id, reconstructing full
    /// flight detail (capacity included) for every leg.
    pub async fn list_reservations(&self) -> String {
        let Some(username) = self.user.as_deref() else {
            return "Cannot view reservations, not logged in\n".to_string();
        };

        match self.try_list(username).await {
            Ok(None) => "No reservations found\n".to_string(),
            Ok(Some(listing)) => listing,
            Err(err) => {
                report("reservations", &err);
                "Failed to retrieve reservations\n".to_string()
            }
        }
    }

    async fn try_list(&self, username: &str) -> Result<Option<String>, EngineError> {
        // One transaction, so the listing is a consistent snapshot.
        let mut tx = self.store.begin_serializable().await?;

        let reservations = reservations::list_for_user(&mut *tx, username).await?;
        if reservations.is_empty() {
            return Ok(None);
        }

        let mut out = String::new();
        for reservation in &reservations {
            out.push_str(&format!(
                "Reservation {} paid: {}:\n",
                reservation.rid, reservation.is_paid
            ));

            let first = flights::lookup(&mut *tx, reservation.first_fid).await?;
            out.push_str(&format!("{}\n", first));

            if let Some(second_fid) = reservation.second_fid {
                let second = flights::lookup(&mut *tx, second_fid).await?;
                out.push_str(&format!("{}\n", second));
            }
        }
        tx.commit().await?;

        Ok(Some(out))
    }
}
