pub mod in_memory;

use crate::core::errors::ReservationError;
use crate::core::models::audit::AppLog;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait LoggingService: Send + Sync {
    async fn log_action(
        &self,
        action: &str,
        details: serde_json::Value,
        user_id: Option<&str>,
        timestamp: DateTime<Utc>,
    ) -> Result<(), ReservationError>;
    async fn get_logs(&self) -> Result<Vec<AppLog>, ReservationError>;
}
