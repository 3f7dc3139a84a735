pub mod booking;
pub mod conflict;
pub mod consistency;

pub use booking::AppointmentBookingService;
pub use conflict::ConflictDetectionService;
pub use consistency::SchedulingLocks;
