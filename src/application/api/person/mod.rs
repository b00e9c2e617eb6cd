pub mod person_input;
pub mod person_router;
