pub mod destination;
pub mod expense;
pub mod flight;
pub mod session;
pub mod trip;
pub mod user;
