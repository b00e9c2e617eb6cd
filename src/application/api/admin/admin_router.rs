use hyper::{Method, StatusCode};
use serde::Serialize;
use serde_json::{value, Value};

use crate::{
    application::api::{
        person::{person_input::PersonInput, person_router::GetPersonOutput},
        router::{
            ApiResponse, HttpError, INTERNAL_ERROR, INVALID_FORMAT_ERROR, METHOD_NOT_ALLOWED_ERROR,
            NOT_FOUND_ERROR,
        },
    },
    domain::person::{Person, PersonManager},
};

/// View model of the admin page: every person bound under `people`.
#[derive(Serialize)]
pub struct AdminPage {
    view: &'static str,
    people: Vec<GetPersonOutput>,
}

impl AdminPage {
    fn new(people: Vec<Person>) -> Self {
        Self {
            view: "adminPage",
            people: people.into_iter().map(GetPersonOutput::from).collect(),
        }
    }
}

pub async fn show_admin_page(
    person_manager: &PersonManager,
) -> Result<ApiResponse, HttpError<'static>> {
    let people = person_manager.get_people().await?;
    let page = value::to_value(AdminPage::new(people)).map_err(|e| {
        tracing::error!(error = ?e, "could not serialize the admin page");
        INTERNAL_ERROR
    })?;
    Ok(ApiResponse::Json(StatusCode::OK, page))
}

/// Reads the submitted person; an empty body stands for an all-default form.
fn parse_grant(body: Value) -> Result<Person, HttpError<'static>> {
    let form = match body {
        Value::Null => PersonInput::default(),
        body => serde_json::from_value(body).map_err(|_| INVALID_FORMAT_ERROR)?,
    };
    Ok(form.into_partial())
}

pub fn grant_admin(person: Person) -> ApiResponse {
    // Admin rights are not modelled yet: nothing is persisted here.
    tracing::info!(
        person_id = person.id(),
        persisted = person.is_persisted(),
        "admin grant requested"
    );
    ApiResponse::Redirect("/people")
}

pub async fn router(
    path: &str,
    method: &Method,
    body: Value,
    person_manager: &PersonManager,
) -> Result<ApiResponse, HttpError<'static>> {
    match (method, path) {
        (&Method::GET, "") => show_admin_page(person_manager).await,
        (&Method::PATCH, "add") => Ok(grant_admin(parse_grant(body)?)),
        (_, "") | (_, "add") => Err(METHOD_NOT_ALLOWED_ERROR),
        (_, _) => Err(NOT_FOUND_ERROR),
    }
}
