pub mod admin;
pub mod person;
pub mod router;
