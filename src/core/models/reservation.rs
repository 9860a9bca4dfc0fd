use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: String,
    #[schema(value_type = String, example = "2024-06-08")]
    pub date: NaiveDate,
    pub chair_id: u8,
    pub user_id: String,
    #[schema(value_type = String, example = "2024-06-01T12:34:56Z")]
    pub created_at: DateTime<Utc>,
}

impl Reservation {
    pub fn slot(&self) -> (NaiveDate, u8) {
        (self.date, self.chair_id)
    }
}

/// A taken (date, chair) pair with the owner stripped, for the shared calendar.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OccupiedSlot {
    #[schema(value_type = String, example = "2024-06-08")]
    pub date: NaiveDate,
    pub chair_id: u8,
}

impl From<&Reservation> for OccupiedSlot {
    fn from(reservation: &Reservation) -> Self {
        OccupiedSlot {
            date: reservation.date,
            chair_id: reservation.chair_id,
        }
    }
}
