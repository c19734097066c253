mod agenda_repository;
mod appointment_repository;
mod client_repository;
mod service_repository;

pub use agenda_repository::AgendaRepository;
pub use appointment_repository::AppointmentRepository;
pub use client_repository::ClientRepository;
pub use service_repository::ServiceRepository;
