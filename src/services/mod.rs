//! Calling-layer services built on top of the API client

pub mod auth_service;
pub mod booking_service;

pub use auth_service::{AuthService, SignUp};
pub use booking_service::{BookingService, BookingUpdate};
