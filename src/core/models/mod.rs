pub mod audit;
pub mod availability;
pub mod reservation;
pub mod user;
