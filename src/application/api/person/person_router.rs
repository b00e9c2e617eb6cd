use std::collections::HashMap;

use hyper::{Method, StatusCode};
use serde_json::{value, Value};

use crate::{
    application::api::{
        person::person_input::PersonInput,
        router::{
            ApiResponse, HttpError, INTERNAL_ERROR, INVALID_FORMAT_ERROR,
            METHOD_NOT_ALLOWED_ERROR, NOT_FOUND_ERROR,
        },
    },
    domain::person::{Person, PersonManager, PersonRepositoryError},
};

const PERSON_NOT_FOUND_ERROR: HttpError =
    HttpError::new(404, "PersonNotFound", "The person requested is not found");

#[derive(serde::Serialize)]
pub struct GetPersonOutput {
    id: i32,
    name: String,
    age: i32,
    email: String,
    address: String,
}

impl From<Person> for GetPersonOutput {
    fn from(value: Person) -> Self {
        return Self {
            id: value.id(),
            name: value.name().to_string(),
            age: value.age(),
            email: value.email().to_string(),
            address: value.address().to_string(),
        };
    }
}

impl From<PersonRepositoryError> for HttpError<'static> {
    fn from(value: PersonRepositoryError) -> Self {
        match value {
            PersonRepositoryError::InternalError(e) => {
                tracing::error!(error = %e, "storage error while handling people");
                INTERNAL_ERROR
            }
        }
    }
}

fn parse_id(raw: &str) -> Result<i32, HttpError<'static>> {
    raw.parse::<i32>().map_err(|_| {
        HttpError::new(400, "InvalidId", "The id you provided is not a valid integer")
    })
}

fn parse_input(body: Value) -> Result<Person, HttpError<'static>> {
    let input: PersonInput = serde_json::from_value(body).map_err(|_| INVALID_FORMAT_ERROR)?;
    input.into_complete()
}

fn to_json<T: serde::Serialize>(output: T) -> Result<ApiResponse, HttpError<'static>> {
    let body = value::to_value(output).map_err(|e| {
        tracing::error!(error = ?e, "could not convert people to value");
        INTERNAL_ERROR
    })?;
    Ok(ApiResponse::Json(StatusCode::OK, body))
}

pub async fn router(
    path: &str,
    query_params: &HashMap<String, String>,
    method: &Method,
    body: Value,
    person_manager: &PersonManager,
) -> Result<ApiResponse, HttpError<'static>> {
    match (method, path) {
        (&Method::GET, "") => match query_params.get("email") {
            Some(email) => {
                let person = person_manager
                    .get_person_by_email(email)
                    .await?
                    .ok_or(PERSON_NOT_FOUND_ERROR)?;
                to_json(GetPersonOutput::from(person))
            }
            None => {
                let people: Vec<GetPersonOutput> = person_manager
                    .get_people()
                    .await?
                    .into_iter()
                    .map(GetPersonOutput::from)
                    .collect();
                to_json(people)
            }
        },
        (&Method::POST, "") => {
            person_manager.create_person(parse_input(body)?).await?;
            Ok(ApiResponse::Json(StatusCode::CREATED, Value::Null))
        }
        (_, "") => Err(METHOD_NOT_ALLOWED_ERROR),
        (_, raw_id) if raw_id.contains('/') => Err(NOT_FOUND_ERROR),
        (&Method::GET, raw_id) => {
            let id = parse_id(raw_id)?;
            let person = person_manager
                .get_person_by_id(id)
                .await?
                .ok_or(PERSON_NOT_FOUND_ERROR)?;
            to_json(GetPersonOutput::from(person))
        }
        (&Method::PATCH, raw_id) => {
            let id = parse_id(raw_id)?;
            person_manager.update_person(id, parse_input(body)?).await?;
            Ok(ApiResponse::Json(StatusCode::OK, Value::Null))
        }
        (&Method::DELETE, raw_id) => {
            let id = parse_id(raw_id)?;
            person_manager.delete_person(id).await?;
            Ok(ApiResponse::Json(StatusCode::OK, Value::Null))
        }
        (_, _) => Err(METHOD_NOT_ALLOWED_ERROR),
    }
}
