//! Database models.

pub mod admin;
pub mod appointment;
pub mod contact_message;
pub mod validate;

pub use admin::Admin;
pub use appointment::{Appointment, AppointmentStatus, CreateAppointment};
pub use contact_message::{ContactMessage, CreateContactMessage};
