use sqlx::{AnyPool, ColumnIndex, Decode, Error, Row, Type};

use crate::{
    domain::person::{Person, PersonRepository, PersonRepositoryError},
    infrastructure::database::Backend,
};

impl From<Error> for PersonRepositoryError {
    fn from(value: Error) -> Self {
        match value {
            Error::Database(database_error) => Self::InternalError(database_error.to_string()),
            _ => Self::InternalError(value.to_string()),
        }
    }
}

/// Maps one `person` row, from any sqlx driver, into a `Person`.
pub fn row_to_person<'r, R>(row: &'r R) -> Result<Person, Error>
where
    R: Row,
    &'static str: ColumnIndex<R>,
    i32: Decode<'r, R::Database> + Type<R::Database>,
    String: Decode<'r, R::Database> + Type<R::Database>,
{
    let id: i32 = row.try_get("person_id")?;
    let name: String = row.try_get("full_name")?;
    let age: i32 = row.try_get("age")?;
    let email: String = row.try_get("email")?;
    let address: String = row.try_get("address")?;
    Ok(Person::new(id, &name, age, &email, &address))
}

fn create_table_query(backend: Backend) -> &'static str {
    match backend {
        Backend::Postgres => {
            r#"CREATE TABLE IF NOT EXISTS person (
        person_id SERIAL PRIMARY KEY,
        full_name VARCHAR NOT NULL,
        age INTEGER NOT NULL,
        email VARCHAR NOT NULL,
        address VARCHAR NOT NULL
    )"#
        }
        Backend::Sqlite => {
            r#"CREATE TABLE IF NOT EXISTS person (
        person_id INTEGER PRIMARY KEY AUTOINCREMENT,
        full_name TEXT NOT NULL,
        age INTEGER NOT NULL,
        email TEXT NOT NULL,
        address TEXT NOT NULL
    )"#
        }
    }
}

#[derive(Debug, Clone)]
pub struct SqlPersonRepository {
    pool: AnyPool,
}

impl SqlPersonRepository {
    pub async fn new(pool: AnyPool, backend: Backend) -> Result<Self, PersonRepositoryError> {
        sqlx::query(create_table_query(backend))
            .execute(&pool)
            .await?;
        tracing::debug!(?backend, "person table ready");
        Ok(Self { pool })
    }
}

#[async_trait::async_trait]
impl PersonRepository for SqlPersonRepository {
    async fn get_people(&self) -> Result<Vec<Person>, PersonRepositoryError> {
        let rows = sqlx::query("SELECT * FROM person")
            .fetch_all(&self.pool)
            .await?;
        let people = rows
            .iter()
            .map(row_to_person)
            .collect::<Result<Vec<Person>, Error>>()?;
        Ok(people)
    }

    async fn get_person_by_id(&self, id: i32) -> Result<Option<Person>, PersonRepositoryError> {
        let row = sqlx::query("SELECT * FROM person WHERE person_id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(row_to_person).transpose()?)
    }

    async fn get_person_by_email(
        &self,
        email: &str,
    ) -> Result<Option<Person>, PersonRepositoryError> {
        // fetch_optional keeps the first row when the schema allows duplicates.
        let row = sqlx::query("SELECT * FROM person WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(row_to_person).transpose()?)
    }

    async fn create_person(&self, person: &Person) -> Result<(), PersonRepositoryError> {
        sqlx::query("INSERT INTO person (full_name, age, email, address) VALUES ($1, $2, $3, $4)")
            .bind(person.name())
            .bind(person.age())
            .bind(person.email())
            .bind(person.address())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn update_person(&self, id: i32, person: &Person) -> Result<(), PersonRepositoryError> {
        let result = sqlx::query(
            "UPDATE person SET full_name = $1, age = $2, email = $3, address = $4 WHERE person_id = $5",
        )
        .bind(person.name())
        .bind(person.age())
        .bind(person.email())
        .bind(person.address())
        .bind(id)
        .execute(&self.pool)
        .await?;
        tracing::debug!(id, rows = result.rows_affected(), "person updated");
        Ok(())
    }

    async fn delete_person(&self, id: i32) -> Result<(), PersonRepositoryError> {
        let result = sqlx::query("DELETE FROM person WHERE person_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        tracing::debug!(id, rows = result.rows_affected(), "person deleted");
        Ok(())
    }
}

#[cfg(test)]
pub mod tests {
    use crate::{
        domain::person::{Person, PersonRepository, PersonRepositoryError},
        infrastructure::database::{self, Backend},
    };

    use super::SqlPersonRepository;

    async fn memory_repository() -> SqlPersonRepository {
        // One connection, otherwise every pooled connection gets its own empty database.
        let pool = database::connect("sqlite::memory:", 1000, 1).await.unwrap();
        SqlPersonRepository::new(pool, Backend::Sqlite).await.unwrap()
    }

    fn alice() -> Person {
        Person::unsaved("Alice", 30, "alice@mail.co", "1 Main St")
    }

    #[tokio::test]
    async fn test_empty_listing() {
        let repository = memory_repository().await;
        let people = repository.get_people().await.unwrap();
        assert!(people.is_empty());
    }

    #[tokio::test]
    async fn test_create_then_list() {
        let repository = memory_repository().await;
        assert_eq!(repository.create_person(&alice()).await, Ok(()));

        let people = repository.get_people().await.unwrap();
        assert_eq!(people.len(), 1);
        let stored = &people[0];
        assert!(stored.is_persisted());
        assert_eq!(stored.name(), "Alice");
        assert_eq!(stored.age(), 30);
        assert_eq!(stored.email(), "alice@mail.co");
        assert_eq!(stored.address(), "1 Main St");
    }

    #[tokio::test]
    async fn test_lookup_by_id_and_email() {
        let repository = memory_repository().await;
        repository.create_person(&alice()).await.unwrap();
        repository
            .create_person(&Person::unsaved("Bob", 41, "bob@mail.co", "2 Side St"))
            .await
            .unwrap();

        let bob = repository
            .get_person_by_email("bob@mail.co")
            .await
            .unwrap()
            .expect("bob was inserted");
        assert_eq!(bob.name(), "Bob");
        let by_id = repository.get_person_by_id(bob.id()).await.unwrap();
        assert_eq!(by_id, Some(bob));
    }

    #[tokio::test]
    async fn test_missing_keys_are_absent() {
        let repository = memory_repository().await;
        repository.create_person(&alice()).await.unwrap();
        assert_eq!(repository.get_person_by_id(4242).await, Ok(None));
        assert_eq!(
            repository.get_person_by_email("nobody@mail.co").await,
            Ok(None)
        );
    }

    #[tokio::test]
    async fn test_update_overwrites_fields() {
        let repository = memory_repository().await;
        repository.create_person(&alice()).await.unwrap();
        let id = repository
            .get_person_by_email("alice@mail.co")
            .await
            .unwrap()
            .unwrap()
            .id();

        let changed = Person::unsaved("Alice Smith", 31, "alice@smith.co", "9 High St");
        assert_eq!(repository.update_person(id, &changed).await, Ok(()));

        let fetched = repository.get_person_by_id(id).await.unwrap().unwrap();
        assert_eq!(fetched, Person::new(id, "Alice Smith", 31, "alice@smith.co", "9 High St"));
    }

    #[tokio::test]
    async fn test_update_and_delete_unknown_id_are_silent() {
        let repository = memory_repository().await;
        assert_eq!(repository.update_person(77, &alice()).await, Ok(()));
        assert_eq!(repository.delete_person(77).await, Ok(()));
        assert!(repository.get_people().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_removes_row() {
        let repository = memory_repository().await;
        repository.create_person(&alice()).await.unwrap();
        let id = repository.get_people().await.unwrap()[0].id();

        assert_eq!(repository.delete_person(id).await, Ok(()));
        assert_eq!(repository.get_person_by_id(id).await, Ok(None));
        assert!(repository.get_people().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_storage_fault_becomes_internal_error() {
        let pool = database::connect("sqlite::memory:", 1000, 1).await.unwrap();
        let repository = SqlPersonRepository::new(pool.clone(), Backend::Sqlite)
            .await
            .unwrap();
        pool.close().await;

        let listed = repository.get_people().await;
        assert!(matches!(listed, Err(PersonRepositoryError::InternalError(_))));
        let created = repository.create_person(&alice()).await;
        assert!(matches!(created, Err(PersonRepositoryError::InternalError(_))));
    }

    #[tokio::test]
    async fn test_missing_table_becomes_internal_error() {
        let pool = database::connect("sqlite::memory:", 1000, 1).await.unwrap();
        let repository = SqlPersonRepository::new(pool.clone(), Backend::Sqlite)
            .await
            .unwrap();
        sqlx::query("DROP TABLE person").execute(&pool).await.unwrap();

        let found = repository.get_person_by_id(1).await;
        assert!(matches!(found, Err(PersonRepositoryError::InternalError(_))));
    }

    #[tokio::test]
    async fn test_table_bootstrap_is_idempotent() {
        let pool = database::connect("sqlite::memory:", 1000, 1).await.unwrap();
        let first = SqlPersonRepository::new(pool.clone(), Backend::Sqlite)
            .await
            .unwrap();
        first.create_person(&alice()).await.unwrap();
        let second = SqlPersonRepository::new(pool, Backend::Sqlite).await.unwrap();
        assert_eq!(second.get_people().await.unwrap().len(), 1);
    }
}
