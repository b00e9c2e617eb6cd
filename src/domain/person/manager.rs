use super::{
    person::Person,
    repository::{PersonRepository, PersonRepositoryError},
};

#[derive(Clone)]
pub struct PersonManager {
    repository: Box<dyn PersonRepository>,
}

impl PersonManager {
    pub fn new(repository: Box<dyn PersonRepository>) -> Self {
        return PersonManager { repository };
    }

    pub async fn get_people(&self) -> Result<Vec<Person>, PersonRepositoryError> {
        self.repository.get_people().await
    }

    pub async fn get_person_by_id(&self, id: i32) -> Result<Option<Person>, PersonRepositoryError> {
        self.repository.get_person_by_id(id).await
    }

    pub async fn get_person_by_email(
        &self,
        email: &str,
    ) -> Result<Option<Person>, PersonRepositoryError> {
        self.repository.get_person_by_email(email).await
    }

    // The generated id is not handed back; callers look the row up by email.
    pub async fn create_person(&self, person: Person) -> Result<(), PersonRepositoryError> {
        self.repository.create_person(&person).await
    }

    pub async fn update_person(&self, id: i32, person: Person) -> Result<(), PersonRepositoryError> {
        self.repository.update_person(id, &person).await
    }

    pub async fn delete_person(&self, id: i32) -> Result<(), PersonRepositoryError> {
        self.repository.delete_person(id).await
    }
}
