use crate::auth::jwt::{Claims, JwtService};
use crate::auth::password::{hash_password, verify_password};
use crate::constants::{
    MAX_AVAILABILITY_DAYS, MAX_EMAIL_LENGTH, MIN_PASSWORD_LENGTH, RESERVATION_CANCELLED, RESERVATION_CREATED,
    USER_LOGGED_IN, USER_REGISTERED,
};
use crate::core::capacity;
use crate::core::errors::{ReservationError, ReservationResult};
use crate::core::models::{
    audit::AppLog,
    availability::DayAvailability,
    reservation::{OccupiedSlot, Reservation},
    user::{User, UserProfile},
};
use crate::infrastructure::clock::Clock;
use crate::infrastructure::logging::LoggingService;
use crate::infrastructure::storage::Storage;
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};
use utoipa::ToSchema;
use uuid::Uuid;

/// Credentials and token parameters handed to the service at construction.
#[derive(Clone)]
pub struct AuthSettings {
    pub jwt_secret: String,
    pub token_ttl: Duration,
    pub bcrypt_cost: u32,
}

#[derive(Serialize, Deserialize, Debug, ToSchema, Clone)]
pub struct AuthSession {
    pub token: String,
    pub user: UserProfile,
}

pub struct ReservationService<L: LoggingService, S: Storage, C: Clock> {
    storage: S,
    logging: L,
    clock: C,
    jwt_service: JwtService,
    bcrypt_cost: u32,
}

impl<L: LoggingService, S: Storage, C: Clock> ReservationService<L, S, C> {
    pub fn new(storage: S, logging: L, clock: C, auth: AuthSettings) -> Self {
        ReservationService {
            storage,
            logging,
            clock,
            jwt_service: JwtService::new(&auth.jwt_secret, auth.token_ttl),
            bcrypt_cost: auth.bcrypt_cost,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn validate_token(&self, token: &str) -> ReservationResult<Claims> {
        self.jwt_service.validate_token(token)
    }

    /// Resolves a token subject to a live user; a deleted user no longer authenticates.
    pub async fn require_user(&self, user_id: &str) -> ReservationResult<User> {
        self.storage
            .get_user(user_id)
            .await?
            .ok_or_else(|| ReservationError::Unauthenticated("Unknown user".to_string()))
    }

    /// Records an audit entry stamped by the service clock. The action it
    /// describes has already been committed, so a failed write is only logged.
    async fn log_action(&self, action: &str, details: serde_json::Value, user_id: Option<&str>) {
        if let Err(e) = self
            .logging
            .log_action(action, details, user_id, self.clock.now())
            .await
        {
            warn!(action, error = %e, "Failed to write audit entry");
        }
    }

    fn normalize_email(&self, email: &str) -> ReservationResult<String> {
        let email = email.trim().to_lowercase();
        if email.is_empty() {
            return Err(ReservationError::invalid("email", "Invalid email", "Email is required"));
        }
        let valid_shape = match email.split_once('@') {
            Some((local, domain)) => {
                !local.is_empty()
                    && !domain.contains('@')
                    && domain.contains('.')
                    && !domain.starts_with('.')
                    && !domain.ends_with('.')
            }
            None => false,
        };
        if !valid_shape || email.len() > MAX_EMAIL_LENGTH || email.chars().any(char::is_whitespace) {
            return Err(ReservationError::invalid(
                "email",
                "Invalid email",
                format!("{} is not a valid email address", email),
            ));
        }
        Ok(email)
    }

    fn validate_password(&self, password: &str) -> ReservationResult<()> {
        if password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(ReservationError::invalid(
                "password",
                "Password Too Short",
                format!("Password must be at least {} characters", MIN_PASSWORD_LENGTH),
            ));
        }
        Ok(())
    }

    pub async fn register(&self, email: &str, password: &str) -> ReservationResult<UserProfile> {
        let email = self.normalize_email(email)?;
        self.validate_password(password)?;

        let user = User {
            id: Uuid::new_v4().to_string(),
            email,
            password_hash: hash_password(password, self.bcrypt_cost)?,
            created_at: self.clock.now(),
        };
        let user = self.storage.create_user(user).await?;
        info!(user_id = %user.id, "User registered");
        self.log_action(USER_REGISTERED, json!({ "email": user.email }), Some(&user.id))
            .await;
        Ok(UserProfile::from(&user))
    }

    /// Exchanges credentials for a token. Any email/password pair that does
    /// not match a stored user is `InvalidCredentials`, whatever its shape.
    pub async fn authenticate(&self, email: &str, password: &str) -> ReservationResult<AuthSession> {
        let email = email.trim().to_lowercase();
        if email.is_empty() {
            return Err(ReservationError::invalid("email", "Missing email", "Email is required"));
        }
        if password.is_empty() {
            return Err(ReservationError::invalid("password", "Missing password", "Password is required"));
        }

        let user = self
            .storage
            .get_user_by_email(&email)
            .await?
            .ok_or(ReservationError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash)? {
            warn!(user_id = %user.id, "Rejected login with wrong password");
            return Err(ReservationError::InvalidCredentials);
        }

        let token = self.jwt_service.generate_token(&user.id)?;
        self.log_action(USER_LOGGED_IN, json!({}), Some(&user.id)).await;
        Ok(AuthSession {
            token,
            user: UserProfile::from(&user),
        })
    }

    /// Parses a calendar day from `YYYY-MM-DD` or an ISO-8601 date-time.
    ///
    /// Time-of-day is discarded; the date is taken as written, in the
    /// offset the caller supplied.
    pub fn parse_date(&self, raw: &str) -> ReservationResult<NaiveDate> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ReservationError::invalid("date", "Missing date", "date is required"));
        }
        if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            return Ok(date);
        }
        if let Ok(datetime) = DateTime::parse_from_rfc3339(raw) {
            return Ok(datetime.date_naive());
        }
        if let Ok(datetime) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
            return Ok(datetime.date());
        }
        Err(ReservationError::invalid(
            "date",
            "Invalid date format",
            format!("{} is not an ISO-8601 date", raw),
        ))
    }

    fn validate_chair(&self, date: NaiveDate, chair_id: i64) -> ReservationResult<u8> {
        let offered = u8::try_from(chair_id)
            .ok()
            .filter(|id| capacity::is_valid_chair(date, *id));
        offered.ok_or_else(|| {
            ReservationError::invalid(
                "chairId",
                "Invalid chair",
                format!(
                    "Chair {} is not offered on {} (capacity {})",
                    chair_id,
                    date,
                    capacity::capacity(date)
                ),
            )
        })
    }

    /// Admits a reservation for `(date, chair_id)` on behalf of `user_id`.
    ///
    /// The slot lookup only produces an early `Conflict`; the store's unique
    /// (date, chair) index decides between concurrent callers.
    pub async fn create_reservation(&self, user_id: &str, date: &str, chair_id: i64) -> ReservationResult<Reservation> {
        let date = self.parse_date(date)?;
        let today = self.clock.today();
        if date < today {
            return Err(ReservationError::invalid(
                "date",
                "Date in the past",
                format!("{} is before {}", date, today),
            ));
        }
        let chair_id = self.validate_chair(date, chair_id)?;

        let user = self.require_user(user_id).await?;

        if let Some(existing) = self.storage.find_reservation_by_slot(date, chair_id).await? {
            debug!(reservation_id = %existing.id, "Slot already taken");
            return Err(ReservationError::Conflict { date, chair_id });
        }

        let reservation = Reservation {
            id: Uuid::new_v4().to_string(),
            date,
            chair_id,
            user_id: user.id.clone(),
            created_at: self.clock.now(),
        };
        let reservation = self.storage.insert_reservation(reservation).await.inspect_err(|e| {
            if matches!(e, ReservationError::Conflict { .. }) {
                warn!(%date, chair_id, "Lost race for slot");
            }
        })?;

        info!(reservation_id = %reservation.id, %date, chair_id, user_id = %user.id, "Reservation created");
        self.log_action(
            RESERVATION_CREATED,
            json!({
                "reservation_id": reservation.id,
                "date": reservation.date,
                "chair_id": reservation.chair_id,
            }),
            Some(&user.id),
        )
        .await;
        Ok(reservation)
    }

    /// Removes a reservation owned by `user_id`.
    ///
    /// A reservation that exists but belongs to someone else is reported as
    /// `NotFound`, exactly like one that does not exist.
    pub async fn cancel_reservation(&self, user_id: &str, reservation_id: &str) -> ReservationResult<()> {
        self.require_user(user_id).await?;

        let removed = self
            .storage
            .delete_owned_reservation(reservation_id, user_id)
            .await?
            .ok_or_else(|| ReservationError::NotFound(format!("Reservation {}", reservation_id)))?;

        info!(reservation_id = %removed.id, date = %removed.date, chair_id = removed.chair_id, "Reservation cancelled");
        self.log_action(
            RESERVATION_CANCELLED,
            json!({
                "reservation_id": removed.id,
                "date": removed.date,
                "chair_id": removed.chair_id,
            }),
            Some(user_id),
        )
        .await;
        Ok(())
    }

    /// The caller's reservations, latest date first.
    pub async fn get_user_reservations(&self, user_id: &str) -> ReservationResult<Vec<Reservation>> {
        self.require_user(user_id).await?;
        let mut reservations = self.storage.get_user_reservations(user_id).await?;
        reservations.sort_by(|a, b| b.date.cmp(&a.date).then(a.chair_id.cmp(&b.chair_id)));
        Ok(reservations)
    }

    pub async fn get_occupied_slots(&self) -> ReservationResult<Vec<OccupiedSlot>> {
        let mut slots: Vec<OccupiedSlot> = self
            .storage
            .get_all_reservations()
            .await?
            .iter()
            .map(OccupiedSlot::from)
            .collect();
        slots.sort_by_key(|s| (s.date, s.chair_id));
        Ok(slots)
    }

    pub async fn get_availability(&self, from: NaiveDate, to: NaiveDate) -> ReservationResult<Vec<DayAvailability>> {
        if from > to {
            return Err(ReservationError::invalid(
                "from",
                "Invalid range",
                format!("from ({}) must not be after to ({})", from, to),
            ));
        }
        if (to - from).num_days() >= MAX_AVAILABILITY_DAYS {
            return Err(ReservationError::invalid(
                "to",
                "Range Too Large",
                format!("A range may cover at most {} days", MAX_AVAILABILITY_DAYS),
            ));
        }

        let mut reserved: BTreeMap<NaiveDate, Vec<u8>> = BTreeMap::new();
        for reservation in self.storage.get_reservations_between(from, to).await? {
            reserved
                .entry(reservation.date)
                .or_default()
                .push(reservation.chair_id);
        }

        let today = self.clock.today();
        Ok(from
            .iter_days()
            .take_while(|date| *date <= to)
            .map(|date| DayAvailability::compute(date, reserved.remove(&date).unwrap_or_default(), today))
            .collect())
    }

    pub async fn get_day_availability(&self, date: NaiveDate) -> ReservationResult<DayAvailability> {
        let mut days = self.get_availability(date, date).await?;
        days.pop()
            .ok_or_else(|| ReservationError::Internal(format!("No availability computed for {}", date)))
    }

    pub async fn get_app_logs(&self) -> ReservationResult<Vec<AppLog>> {
        self.logging.get_logs().await
    }
}
