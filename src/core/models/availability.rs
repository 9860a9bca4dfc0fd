use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::capacity;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DayAvailability {
    #[schema(value_type = String, example = "2024-06-08")]
    pub date: NaiveDate,
    pub is_weekend: bool,
    pub capacity: u8,
    pub reserved_chairs: Vec<u8>,
    pub available: u8,
    pub bookable: bool,
    pub suggested_chair: Option<u8>,
}

impl DayAvailability {
    /// Builds the calendar entry for `date` from the chair ids already taken on it.
    pub fn compute(date: NaiveDate, mut reserved_chairs: Vec<u8>, today: NaiveDate) -> Self {
        reserved_chairs.sort_unstable();
        reserved_chairs.dedup();
        let capacity = capacity::capacity(date);
        let available = capacity.saturating_sub(reserved_chairs.len() as u8);
        let suggested_chair = capacity::suggest_chair(date, &reserved_chairs);
        DayAvailability {
            date,
            is_weekend: capacity::is_weekend(date),
            capacity,
            available,
            bookable: date >= today && available > 0,
            suggested_chair,
            reserved_chairs,
        }
    }
}
