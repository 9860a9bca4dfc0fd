use crate::core::errors::ReservationError;

pub fn hash_password(password: &str, cost: u32) -> Result<String, ReservationError> {
    bcrypt::hash(password, cost).map_err(|e| ReservationError::Internal(format!("Password hashing error: {}", e)))
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, ReservationError> {
    bcrypt::verify(password, hash)
        .map_err(|e| ReservationError::Internal(format!("Password verification error: {}", e)))
}
