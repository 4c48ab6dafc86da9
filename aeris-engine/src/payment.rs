use crate::error::{report, EngineError};
use crate::session::Session;
use aeris_store::{flights, reservations, users};
use tracing::info;

impl Session {
    /// Pays for one of the caller's unpaid reservations: marks it paid and
    /// debits the balance in the same serializable transaction.
    ///
    /// Unlike booking this is not retried; a conflict here is rare enough
    /// that it surfaces as an ordinary failure.
    pub async fn pay(&self, reservation_id: i32) -> String {
        let Some(username) = self.user.as_deref() else {
            return "Cannot pay, not logged in\n".to_string();
        };

        match self.try_pay(username, reservation_id).await {
            Ok(balance) => format!(
                "Paid reservation: {} remaining balance: {}\n",
                reservation_id, balance
            ),
            Err(EngineError::UnknownReservation(rid)) => format!(
                "Cannot find unpaid reservation {} under user: {}\n",
                rid, username
            ),
            Err(EngineError::InsufficientBalance { balance, price }) => format!(
                "User has only {} in account but itinerary costs {}\n",
                balance, price
            ),
            Err(err) => {
                report("pay", &err);
                format!("Failed to pay for reservation {}\n", reservation_id)
            }
        }
    }

    async fn try_pay(&self, username: &str, rid: i32) -> Result<i32, EngineError> {
        let mut tx = self.store.begin_serializable().await?;

        let Some(reservation) = reservations::find(&mut *tx, rid).await? else {
            return Err(EngineError::UnknownReservation(rid));
        };
        // Foreign and already-paid reservations answer exactly like absent
        // ones.
        if reservation.username != username || reservation.is_paid {
            return Err(EngineError::UnknownReservation(rid));
        }

        let mut price = flights::price(&mut *tx, reservation.first_fid).await?;
        if let Some(second_fid) = reservation.second_fid {
            price += flights::price(&mut *tx, second_fid).await?;
        }

        let balance = users::balance(&mut *tx, username).await?;
        if balance < price {
            // Rejected, not clamped.
            return Err(EngineError::InsufficientBalance { balance, price });
        }

        reservations::mark_paid(&mut *tx, rid).await?;
        users::debit_balance(&mut *tx, username, price).await?;
        tx.commit().await?;

        info!("reservation {} paid by {}", rid, username);
        Ok(balance - price)
    }
}

#[cfg(test)]
mod tests {
    use crate::session::Session;
    use aeris_store::StoreClient;

    #[tokio::test]
    async fn test_pay_requires_login() {
        let store = StoreClient::connect_lazy("postgres://localhost/aeris_test")
            .expect("lazy pool");
        let session = Session::new(store);

        assert_eq!(session.pay(1).await, "Cannot pay, not logged in\n");
    }
}
