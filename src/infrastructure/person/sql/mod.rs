pub mod sql_repository;

pub use sql_repository::SqlPersonRepository;
