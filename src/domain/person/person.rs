#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    id: i32,
    name: String,
    age: i32,
    email: String,
    address: String,
}

impl Person {
    pub fn new(id: i32, name: &str, age: i32, email: &str, address: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            age,
            email: email.to_string(),
            address: address.to_string(),
        }
    }

    /// Builds a person the store has not assigned an id to yet.
    pub fn unsaved(name: &str, age: i32, email: &str, address: &str) -> Self {
        Self::new(0, name, age, email, address)
    }

    pub fn id(&self) -> i32 {
        self.id
    }
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn age(&self) -> i32 {
        self.age
    }
    pub fn email(&self) -> &str {
        &self.email
    }
    pub fn address(&self) -> &str {
        &self.address
    }

    /// An id of 0 marks a value that was never written to the store.
    pub fn is_persisted(&self) -> bool {
        self.id != 0
    }
}
