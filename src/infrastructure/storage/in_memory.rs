use crate::core::errors::ReservationError;
use crate::core::models::{reservation::Reservation, user::User};
use crate::infrastructure::storage::Storage;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct Users {
    by_id: HashMap<String, User>,
    id_by_email: HashMap<String, String>,
}

#[derive(Default)]
struct Reservations {
    by_id: HashMap<String, Reservation>,
    // Unique index over (date, chair); ordered so range scans stay cheap.
    id_by_slot: BTreeMap<(NaiveDate, u8), String>,
}

#[derive(Clone, Default)]
pub struct InMemoryStorage {
    users: Arc<RwLock<Users>>,
    reservations: Arc<RwLock<Reservations>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        InMemoryStorage::default()
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn create_user(&self, user: User) -> Result<User, ReservationError> {
        let mut users = self.users.write().await;
        if users.id_by_email.contains_key(&user.email) {
            return Err(ReservationError::EmailAlreadyRegistered(user.email));
        }
        users.id_by_email.insert(user.email.clone(), user.id.clone());
        users.by_id.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn get_user(&self, user_id: &str) -> Result<Option<User>, ReservationError> {
        let users = self.users.read().await;
        Ok(users.by_id.get(user_id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, ReservationError> {
        let users = self.users.read().await;
        Ok(users
            .id_by_email
            .get(email)
            .and_then(|id| users.by_id.get(id))
            .cloned())
    }

    async fn insert_reservation(&self, reservation: Reservation) -> Result<Reservation, ReservationError> {
        let mut reservations = self.reservations.write().await;
        let slot = reservation.slot();
        if reservations.id_by_slot.contains_key(&slot) {
            return Err(ReservationError::Conflict {
                date: slot.0,
                chair_id: slot.1,
            });
        }
        reservations.id_by_slot.insert(slot, reservation.id.clone());
        reservations
            .by_id
            .insert(reservation.id.clone(), reservation.clone());
        Ok(reservation)
    }

    async fn find_reservation_by_slot(
        &self,
        date: NaiveDate,
        chair_id: u8,
    ) -> Result<Option<Reservation>, ReservationError> {
        let reservations = self.reservations.read().await;
        Ok(reservations
            .id_by_slot
            .get(&(date, chair_id))
            .and_then(|id| reservations.by_id.get(id))
            .cloned())
    }

    async fn delete_owned_reservation(
        &self,
        reservation_id: &str,
        user_id: &str,
    ) -> Result<Option<Reservation>, ReservationError> {
        let mut reservations = self.reservations.write().await;
        let owned = reservations
            .by_id
            .get(reservation_id)
            .is_some_and(|r| r.user_id == user_id);
        if !owned {
            return Ok(None);
        }
        let removed = reservations.by_id.remove(reservation_id);
        if let Some(ref r) = removed {
            reservations.id_by_slot.remove(&r.slot());
        }
        Ok(removed)
    }

    async fn get_user_reservations(&self, user_id: &str) -> Result<Vec<Reservation>, ReservationError> {
        let reservations = self.reservations.read().await;
        Ok(reservations
            .by_id
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn get_reservations_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<Reservation>, ReservationError> {
        if from > to {
            return Ok(Vec::new());
        }
        let reservations = self.reservations.read().await;
        Ok(reservations
            .id_by_slot
            .range((from, 0)..=(to, u8::MAX))
            .filter_map(|(_, id)| reservations.by_id.get(id))
            .cloned()
            .collect())
    }

    async fn get_all_reservations(&self) -> Result<Vec<Reservation>, ReservationError> {
        let reservations = self.reservations.read().await;
        Ok(reservations
            .id_by_slot
            .values()
            .filter_map(|id| reservations.by_id.get(id))
            .cloned()
            .collect())
    }
}
