use crate::core::errors::ReservationError;
use crate::core::models::{reservation::Reservation, user::User};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;

/// Durable keyed storage for users and reservations.
///
/// Implementations own the uniqueness constraints: one user per email and one
/// reservation per (date, chair). `insert_reservation` must fail with
/// [`ReservationError::Conflict`] when the slot is taken, whatever the caller
/// checked beforehand.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn create_user(&self, user: User) -> Result<User, ReservationError>;
    async fn get_user(&self, user_id: &str) -> Result<Option<User>, ReservationError>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, ReservationError>;

    async fn insert_reservation(&self, reservation: Reservation) -> Result<Reservation, ReservationError>;
    async fn find_reservation_by_slot(
        &self,
        date: NaiveDate,
        chair_id: u8,
    ) -> Result<Option<Reservation>, ReservationError>;
    /// Removes the reservation only if `user_id` owns it; returns what was removed.
    async fn delete_owned_reservation(
        &self,
        reservation_id: &str,
        user_id: &str,
    ) -> Result<Option<Reservation>, ReservationError>;
    async fn get_user_reservations(&self, user_id: &str) -> Result<Vec<Reservation>, ReservationError>;
    /// Reservations with `from <= date <= to`.
    async fn get_reservations_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Reservation>, ReservationError>;
    async fn get_all_reservations(&self) -> Result<Vec<Reservation>, ReservationError>;
}

#[async_trait]
impl<T: Storage + ?Sized> Storage for Arc<T> {
    async fn create_user(&self, user: User) -> Result<User, ReservationError> {
        (**self).create_user(user).await
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<User>, ReservationError> {
        (**self).get_user(user_id).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, ReservationError> {
        (**self).get_user_by_email(email).await
    }

    async fn insert_reservation(&self, reservation: Reservation) -> Result<Reservation, ReservationError> {
        (**self).insert_reservation(reservation).await
    }

    async fn find_reservation_by_slot(
        &self,
        date: NaiveDate,
        chair_id: u8,
    ) -> Result<Option<Reservation>, ReservationError> {
        (**self).find_reservation_by_slot(date, chair_id).await
    }

    async fn delete_owned_reservation(
        &self,
        reservation_id: &str,
        user_id: &str,
    ) -> Result<Option<Reservation>, ReservationError> {
        (**self).delete_owned_reservation(reservation_id, user_id).await
    }

    async fn get_user_reservations(&self, user_id: &str) -> Result<Vec<Reservation>, ReservationError> {
        (**self).get_user_reservations(user_id).await
    }

    async fn get_reservations_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Reservation>, ReservationError> {
        (**self).get_reservations_between(from, to).await
    }

    async fn get_all_reservations(&self) -> Result<Vec<Reservation>, ReservationError> {
        (**self).get_all_reservations().await
    }
}

pub mod in_memory;
