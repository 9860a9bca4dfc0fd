mod reservation_tests;

use crate::api::handlers::AppService;
use crate::core::errors::ReservationError;
use crate::core::models::{audit::AppLog, reservation::Reservation, user::{User, UserProfile}};
use crate::core::services::{AuthSettings, ReservationService};
use crate::infrastructure::clock::{Clock, FixedClock};
use crate::infrastructure::logging::{LoggingService, in_memory::InMemoryLogging};
use crate::infrastructure::storage::{Storage, in_memory::InMemoryStorage};
use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::sync::Arc;

pub const PASSWORD: &str = "s3cret-password";

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Monday 2024-06-03; every test service treats this as today.
pub fn today() -> NaiveDate {
    day(2024, 6, 3)
}

pub fn test_auth_settings() -> AuthSettings {
    AuthSettings {
        jwt_secret: "test-secret".to_string(),
        token_ttl: Duration::days(7),
        bcrypt_cost: 4,
    }
}

pub fn create_test_service() -> AppService {
    create_service_with_storage(Arc::new(InMemoryStorage::new()))
}

pub fn create_service_with_storage(storage: Arc<dyn Storage>) -> AppService {
    let logging = InMemoryLogging::new();
    let clock: Arc<dyn Clock> = Arc::new(FixedClock::at_midday(today()));
    ReservationService::new(storage, logging, clock, test_auth_settings())
}

/// Store whose slot lookup always reports a free slot, as a read taken just
/// before a competing insert would. Only the insert's own check can refuse.
#[derive(Clone, Default)]
pub struct StaleSlotStorage {
    pub inner: InMemoryStorage,
}

#[async_trait]
impl Storage for StaleSlotStorage {
    async fn create_user(&self, user: User) -> Result<User, ReservationError> {
        self.inner.create_user(user).await
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<User>, ReservationError> {
        self.inner.get_user(user_id).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, ReservationError> {
        self.inner.get_user_by_email(email).await
    }

    async fn insert_reservation(&self, reservation: Reservation) -> Result<Reservation, ReservationError> {
        self.inner.insert_reservation(reservation).await
    }

    async fn find_reservation_by_slot(&self, _: NaiveDate, _: u8) -> Result<Option<Reservation>, ReservationError> {
        Ok(None)
    }

    async fn delete_owned_reservation(
        &self,
        reservation_id: &str,
        user_id: &str,
    ) -> Result<Option<Reservation>, ReservationError> {
        self.inner.delete_owned_reservation(reservation_id, user_id).await
    }

    async fn get_user_reservations(&self, user_id: &str) -> Result<Vec<Reservation>, ReservationError> {
        self.inner.get_user_reservations(user_id).await
    }

    async fn get_reservations_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Reservation>, ReservationError> {
        self.inner.get_reservations_between(from, to).await
    }

    async fn get_all_reservations(&self) -> Result<Vec<Reservation>, ReservationError> {
        self.inner.get_all_reservations().await
    }
}

/// Audit backend that refuses every write.
pub struct FailingLogging;

#[async_trait]
impl LoggingService for FailingLogging {
    async fn log_action(
        &self,
        _: &str,
        _: serde_json::Value,
        _: Option<&str>,
        _: DateTime<Utc>,
    ) -> Result<(), ReservationError> {
        Err(ReservationError::LoggingError("audit backend unavailable".to_string()))
    }

    async fn get_logs(&self) -> Result<Vec<AppLog>, ReservationError> {
        Ok(Vec::new())
    }
}

pub async fn register_user(service: &AppService, email: &str) -> UserProfile {
    service.register(email, PASSWORD).await.unwrap()
}
