use serde::{Deserialize, Deserializer};

use crate::{
    application::api::router::{HttpError, INVALID_FORMAT_ERROR},
    domain::person::Person,
};

/// Person-shaped body shared by the `/people` writes and the admin form.
///
/// Every field may be missing so the admin form can be partial; the
/// `/people` routes go through `into_complete` which insists on all four
/// data fields. Numbers are accepted as JSON numbers or as form strings.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct PersonInput {
    #[serde(deserialize_with = "lenient_i32")]
    id: Option<i32>,
    name: Option<String>,
    #[serde(deserialize_with = "lenient_i32")]
    age: Option<i32>,
    email: Option<String>,
    address: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IntOrText {
    Int(i32),
    Text(String),
}

fn lenient_i32<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<IntOrText>::deserialize(deserializer)? {
        None => Ok(None),
        Some(IntOrText::Int(v)) => Ok(Some(v)),
        Some(IntOrText::Text(raw)) if raw.trim().is_empty() => Ok(None),
        Some(IntOrText::Text(raw)) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

impl PersonInput {
    /// Fields for a create or update; the id is left to the store.
    pub fn into_complete(self) -> Result<Person, HttpError<'static>> {
        match (self.name, self.age, self.email, self.address) {
            (Some(name), Some(age), Some(email), Some(address)) => {
                Ok(Person::unsaved(&name, age, &email, &address))
            }
            _ => Err(INVALID_FORMAT_ERROR),
        }
    }

    /// Whatever was submitted, with defaults for the rest.
    pub fn into_partial(self) -> Person {
        Person::new(
            self.id.unwrap_or_default(),
            &self.name.unwrap_or_default(),
            self.age.unwrap_or_default(),
            &self.email.unwrap_or_default(),
            &self.address.unwrap_or_default(),
        )
    }
}
