// Audit actions
pub const USER_REGISTERED: &str = "USER_REGISTERED";
pub const USER_LOGGED_IN: &str = "USER_LOGGED_IN";
pub const RESERVATION_CREATED: &str = "RESERVATION_CREATED";
pub const RESERVATION_CANCELLED: &str = "RESERVATION_CANCELLED";

pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_EMAIL_LENGTH: usize = 254;
/// Widest window the availability calendar may request at once.
pub const MAX_AVAILABILITY_DAYS: i64 = 366;
/// Days shown when the calendar asks for availability without a range.
pub const DEFAULT_CALENDAR_DAYS: i64 = 35;
