pub mod database;
pub mod person;
