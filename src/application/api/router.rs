use std::{collections::HashMap, io::Error, net::SocketAddr};

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::{
    body,
    header::{self, LOCATION},
    server::conn::http1,
    Method, Request, Response, StatusCode,
};
use hyper_util::{rt::TokioIo, service::TowerToHyperService};
use serde::Serialize;
use serde_json::Value;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::{
    application::api::{admin::admin_router, person::person_router},
    domain::person::PersonManager,
};

pub type BoxBody = http_body_util::combinators::BoxBody<Bytes, hyper::Error>;

#[derive(Debug, Serialize, PartialEq)]
pub struct HttpError<'a> {
    code: u16,
    error: &'a str,
    details: &'a str,
}
impl<'a> HttpError<'a> {
    pub const fn new(code: u16, error: &'a str, details: &'a str) -> Self {
        HttpError {
            code,
            error,
            details,
        }
    }

    pub fn code(&self) -> u16 {
        self.code
    }
}

pub const INTERNAL_ERROR: HttpError = HttpError {
    code: 500,
    error: "InternalError",
    details: "An internal error occured, please contact our technical service",
};

pub const NOT_FOUND_ERROR: HttpError = HttpError {
    code: 404,
    error: "NotFound",
    details: "The requested resource is not found",
};

pub const METHOD_NOT_ALLOWED_ERROR: HttpError = HttpError {
    code: 405,
    error: "MethodNotAllowed",
    details: "This method is not supported on the requested resource",
};

pub const INVALID_FORMAT_ERROR: HttpError = HttpError {
    code: 400,
    error: "InvalidFormat",
    details: "The body format is invalid. Please refer to the documentation",
};

#[derive(Debug)]
pub enum APIError {
    ConfigurationError(String),
    RequestError(HttpError<'static>),
}

/// What a sub-router hands back on success.
#[derive(Debug, PartialEq)]
pub enum ApiResponse {
    Json(StatusCode, Value),
    Redirect(&'static str),
}

impl From<APIError> for Response<BoxBody> {
    fn from(value: APIError) -> Self {
        let err = match value {
            APIError::RequestError(err) => err,
            APIError::ConfigurationError(e) => {
                tracing::error!(error = %e, "configuration error while serving a request");
                INTERNAL_ERROR
            }
        };
        Response::builder()
            .status(err.code)
            .header(header::CONTENT_TYPE, "application/json")
            .body(full(serde_json::to_string(&err).unwrap_or_default()))
            .unwrap_or_else(|_| Response::new(full("")))
    }
}

impl From<ApiResponse> for Response<BoxBody> {
    fn from(value: ApiResponse) -> Self {
        let built = match value {
            ApiResponse::Json(status, body) => Response::builder()
                .status(status)
                .header(header::CONTENT_TYPE, "application/json")
                .body(full(body.to_string())),
            // 303 rather than 302 so a PATCH submission is followed by a GET.
            ApiResponse::Redirect(location) => Response::builder()
                .status(StatusCode::SEE_OTHER)
                .header(LOCATION, location)
                .body(full("")),
        };
        built.unwrap_or_else(|_| APIError::RequestError(INTERNAL_ERROR).into())
    }
}

pub struct MainRouter {
    person_manager: PersonManager,
    address: SocketAddr,
}

impl MainRouter {
    pub fn new(person_manager: PersonManager, address: SocketAddr) -> Self {
        return Self {
            person_manager,
            address,
        };
    }

    pub async fn run(&self) -> Result<(), APIError> {
        let listener = TcpListener::bind(self.address)
            .await
            .map_err(|e| APIError::ConfigurationError(e.to_string()))?;
        tracing::info!(address = %self.address, "listening");
        // Accept connections until the process is stopped
        loop {
            let (stream, peer) = listener
                .accept()
                .await
                .map_err(|e| APIError::ConfigurationError(e.to_string()))?;

            // Adapter so hyper can drive a tokio stream.
            let io = TokioIo::new(stream);

            let person_manager_cloned = self.person_manager.clone();
            tokio::task::spawn(async move {
                let cors = CorsLayer::new()
                    .allow_origin(AllowOrigin::any())
                    .allow_methods(vec![
                        Method::GET,
                        Method::POST,
                        Method::PATCH,
                        Method::DELETE,
                        Method::OPTIONS,
                    ])
                    .allow_headers(vec![header::CONTENT_TYPE]);
                let service = ServiceBuilder::new().layer(cors).service_fn(|r| {
                    let person_manager_cloned = person_manager_cloned.clone();
                    async move {
                        let res = match route_requests(r, person_manager_cloned).await {
                            Ok(r) => r,
                            Err(e) => e.into(),
                        };
                        Ok::<Response<BoxBody>, Error>(res)
                    }
                });
                if let Err(err) = http1::Builder::new()
                    .serve_connection(io, TowerToHyperService::new(service))
                    .await
                {
                    tracing::warn!(%peer, error = ?err, "error serving connection");
                }
            });
        }
    }
}

async fn route_requests(
    request: Request<body::Incoming>,
    person_manager: PersonManager,
) -> Result<Response<BoxBody>, APIError> {
    let path = request.uri().path().to_string();
    let params = match request.uri().query() {
        Some(val) => val.to_string(),
        None => Default::default(),
    };
    let method = request.method().clone();
    tracing::info!(method = method.as_str(), %path, "request");
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let whole_body = request
        .collect()
        .await
        .map_err(|e| {
            tracing::error!(error = ?e, "could not read request body");
            APIError::RequestError(INTERNAL_ERROR)
        })?
        .to_bytes();
    let body = decode_body(content_type.as_deref(), &whole_body);
    let query_params = get_query_params_from_raw(&params);
    dispatch(&method, &path, &query_params, body, &person_manager).await
}

/// Routes an already-decoded request to the admin or people handlers.
pub async fn dispatch(
    method: &Method,
    path: &str,
    query_params: &HashMap<String, String>,
    body: Value,
    person_manager: &PersonManager,
) -> Result<Response<BoxBody>, APIError> {
    let mut splitted_path = path.trim_end_matches('/').split('/').skip(1);
    let resp = match splitted_path.next() {
        Some(val) => {
            let partial_path = &splitted_path.collect::<Vec<&str>>().join("/");
            match val {
                "admin" => admin_router::router(partial_path, method, body, person_manager).await,
                "people" => {
                    person_router::router(
                        partial_path,
                        query_params,
                        method,
                        body,
                        person_manager,
                    )
                    .await
                }
                _ => return Err(APIError::RequestError(NOT_FOUND_ERROR)),
            }
        }
        None => return Err(APIError::RequestError(NOT_FOUND_ERROR)),
    }
    .map_err(|e| {
        tracing::debug!(code = e.code(), error = e.error, "request rejected");
        APIError::RequestError(e)
    })?;
    Ok(resp.into())
}

/// Decodes a JSON or form-urlencoded body. Form fields become JSON strings.
pub fn decode_body(content_type: Option<&str>, raw: &[u8]) -> Value {
    let is_form = content_type
        .and_then(|ct| ct.split(';').next())
        .map(|mime| mime.trim().eq_ignore_ascii_case("application/x-www-form-urlencoded"))
        .unwrap_or(false);
    if !is_form {
        return serde_json::from_slice(raw).unwrap_or(Value::Null);
    }
    let Ok(raw) = std::str::from_utf8(raw) else {
        return Value::Null;
    };
    if raw.trim().is_empty() {
        return Value::Null;
    }
    Value::Object(
        get_query_params_from_raw(raw)
            .into_iter()
            .map(|(k, v)| (k, Value::String(v)))
            .collect(),
    )
}

pub fn full<T: Into<Bytes>>(chunk: T) -> BoxBody {
    Full::new(chunk.into())
        .map_err(|never| match never {})
        .boxed()
}

fn get_query_params_from_raw(raw_params: &str) -> HashMap<String, String> {
    let mut query_params = HashMap::new();
    for query_param in raw_params.split('&') {
        let mut param_splitted = query_param.splitn(2, '=');
        let (Some(var), Some(val)) = (param_splitted.next(), param_splitted.next()) else {
            continue;
        };
        let val = val.replace('+', " ");
        if let (Ok(var), Ok(val)) = (urlencoding::decode(var), urlencoding::decode(&val)) {
            query_params.insert(var.into_owned(), val.into_owned());
        }
    }
    query_params
}
