use super::person::Person;

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum PersonRepositoryError {
    #[error("storage error: {0}")]
    InternalError(String),
}

/// Storage boundary for `Person` records.
///
/// Lookups return `Ok(None)` when no row matches; updates and deletes that
/// match nothing succeed silently.
#[async_trait::async_trait]
pub trait PersonRepository: PersonClone + Send + Sync {
    async fn get_people(&self) -> Result<Vec<Person>, PersonRepositoryError>;
    async fn get_person_by_id(&self, id: i32) -> Result<Option<Person>, PersonRepositoryError>;
    async fn get_person_by_email(
        &self,
        email: &str,
    ) -> Result<Option<Person>, PersonRepositoryError>;
    async fn create_person(&self, person: &Person) -> Result<(), PersonRepositoryError>;
    async fn update_person(&self, id: i32, person: &Person) -> Result<(), PersonRepositoryError>;
    async fn delete_person(&self, id: i32) -> Result<(), PersonRepositoryError>;
}

pub trait PersonClone {
    fn clone_box(&self) -> Box<dyn PersonRepository>;
}

impl<T> PersonClone for T
where
    T: 'static + PersonRepository + Clone,
{
    fn clone_box(&self) -> Box<dyn PersonRepository> {
        Box::new(self.clone())
    }
}

// Clone for the boxed trait object goes through clone_box.
impl Clone for Box<dyn PersonRepository> {
    fn clone(&self) -> Box<dyn PersonRepository> {
        self.clone_box()
    }
}

#[cfg(test)]
pub mod mock {
    use async_trait::async_trait;
    use mockall::mock;

    use super::{Person, PersonRepository, PersonRepositoryError};

    mock! {
        pub PersonStore {}

        impl Clone for PersonStore {
            fn clone(&self) -> Self;
        }

        #[async_trait]
        impl PersonRepository for PersonStore {
            async fn get_people(&self) -> Result<Vec<Person>, PersonRepositoryError>;
            async fn get_person_by_id(&self, id: i32) -> Result<Option<Person>, PersonRepositoryError>;
            async fn get_person_by_email(
                &self,
                email: &str,
            ) -> Result<Option<Person>, PersonRepositoryError>;
            async fn create_person(&self, person: &Person) -> Result<(), PersonRepositoryError>;
            async fn update_person(&self, id: i32, person: &Person) -> Result<(), PersonRepositoryError>;
            async fn delete_person(&self, id: i32) -> Result<(), PersonRepositoryError>;
        }
    }
}
