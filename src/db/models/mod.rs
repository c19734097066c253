mod agenda;
mod appointment;
mod client;
mod service;

pub use agenda::{Agenda, AgendaHoursRow};
pub use appointment::{Appointment, AppointmentStatus, BookingRequest};
pub use client::{Client, ClientDetails};
pub use service::Service;
