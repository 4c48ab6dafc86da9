use crate::error::{report, EngineError};
use aeris_core::models::User;
use aeris_core::{credentials, Itinerary, RetryPolicy};
use aeris_store::{reservations, users, StoreClient};
use tracing::info;

/// One caller's engine instance: at most one authenticated identity plus the
/// ranked results of the caller's latest search.
///
/// A session issues operations sequentially; concurrency only exists between
/// sessions, and the store's transaction isolation is what keeps them
/// consistent.
pub struct Session {
    pub(crate) store: StoreClient,
    pub(crate) policy: RetryPolicy,
    pub(crate) user: Option<String>,
    pub(crate) itineraries: Vec<Itinerary>,
}

impl Session {
    pub fn new(store: StoreClient) -> Self {
        Self::with_policy(store, RetryPolicy::default())
    }

    pub fn with_policy(store: StoreClient, policy: RetryPolicy) -> Self {
        Self {
            store,
            policy,
            user: None,
            itineraries: Vec::new(),
        }
    }

    pub fn current_user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    /// Authenticates the session. Unknown usernames and wrong passwords get
    /// the same answer. There is no logout; a session authenticates at most
    /// once in its lifetime.
    pub async fn login(&mut self, username: &str, password: &str) -> String {
        match self.try_login(username, password).await {
            Ok(()) => format!("Logged in as {}\n", username),
            Err(EngineError::AlreadyLoggedIn) => "User already logged in\n".to_string(),
            Err(err) => {
                report("login", &err);
                "Login failed\n".to_string()
            }
        }
    }

    async fn try_login(&mut self, username: &str, password: &str) -> Result<(), EngineError> {
        if self.user.is_some() {
            return Err(EngineError::AlreadyLoggedIn);
        }

        let mut tx = self.store.begin_serializable().await?;
        let Some(user) = users::find(&mut *tx, username).await? else {
            return Err(EngineError::BadCredentials);
        };
        if !credentials::verify(password, &user.password_hash) {
            return Err(EngineError::BadCredentials);
        }
        tx.commit().await?;

        self.user = Some(username.to_string());
        self.itineraries.clear();
        info!("logged in as {}", username);
        Ok(())
    }

    /// Creates a user with a freshly hashed password and a starting balance.
    /// The existence check and the insert run in one retried serializable
    /// transaction, so two racing creates of the same name cannot both land.
    pub async fn create_customer(
        &self,
        username: &str,
        password: &str,
        init_balance: i32,
    ) -> String {
        match self.try_create_customer(username, password, init_balance).await {
            Ok(()) => format!("Created user {}\n", username),
            Err(err) => {
                report("create_customer", &err);
                "Failed to create user\n".to_string()
            }
        }
    }

    async fn try_create_customer(
        &self,
        username: &str,
        password: &str,
        init_balance: i32,
    ) -> Result<(), EngineError> {
        if init_balance < 0 {
            return Err(EngineError::Validation(
                "initial balance cannot be negative".to_string(),
            ));
        }

        self.policy
            .run(EngineError::is_transient, || {
                self.create_customer_once(username, password, init_balance)
            })
            .await
    }

    async fn create_customer_once(
        &self,
        username: &str,
        password: &str,
        init_balance: i32,
    ) -> Result<(), EngineError> {
        let mut tx = self.store.begin_serializable().await?;
        if users::find(&mut *tx, username).await?.is_some() {
            return Err(EngineError::DuplicateUsername);
        }

        let user = User {
            username: username.to_string(),
            password_hash: credentials::hash(password)?,
            balance: init_balance,
        };
        users::insert(&mut *tx, &user).await?;
        tx.commit().await?;

        info!("created user {}", username);
        Ok(())
    }

    /// Clears reservations and users, never flights or aircraft, and drops
    /// any session state. Test support for the presentation layer.
    pub async fn reset_state(&mut self) -> Result<(), EngineError> {
        let mut tx = self.store.begin_serializable().await?;
        reservations::delete_all(&mut *tx).await?;
        users::delete_all(&mut *tx).await?;
        tx.commit().await?;

        self.user = None;
        self.itineraries.clear();
        Ok(())
    }
}
