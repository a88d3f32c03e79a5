use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::Value;

use crate::api::rest::error::ApiError;
use crate::contract::model::CardFields;
use crate::domain::error::DomainError;

/// Routes advertised by `GET /`.
pub const ENDPOINTS: [&str; 4] = [
    "/cards [GET, POST, DELETE]",
    "/cards/search [GET]",
    "/cards/{id} [GET, PUT, PATCH, DELETE]",
    "/health [GET]",
];

#[derive(Debug, Clone, Serialize)]
pub struct WelcomeDto {
    pub message: &'static str,
    pub endpoints: Vec<&'static str>,
}

impl Default for WelcomeDto {
    fn default() -> Self {
        Self {
            message: "Welcome to the Playing Cards API!",
            endpoints: ENDPOINTS.to_vec(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InsertedDto {
    pub inserted_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ModifiedDto {
    pub modified_count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeletedDto {
    pub deleted_count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageDto {
    pub message: String,
}

/// JSON request body for create/replace/patch.
///
/// `None` means "no data": an empty body or a falsy JSON value
/// (`null`, `false`, `0`, `""`, `[]`, `{}`). Any other non-object is rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct CardBody(pub Option<CardFields>);

impl CardBody {
    pub fn parse(body: &[u8]) -> Result<Self, ApiError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(None));
        }

        let value: Value =
            serde_json::from_slice(body).map_err(|e| ApiError::InvalidJson(e.to_string()))?;
        if is_falsy(&value) {
            return Ok(Self(None));
        }
        match value {
            Value::Object(fields) => Ok(Self(Some(fields))),
            _ => Err(ApiError::NotAnObject),
        }
    }
}

impl<S> FromRequest<S> for CardBody
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;
        Self::parse(&bytes).map_err(IntoResponse::into_response)
    }
}

/// The raw `{id}` path segment. A segment axum cannot decode (e.g. invalid
/// UTF-8) is reported as an invalid id, like any other unparseable one.
#[derive(Debug, Clone, PartialEq)]
pub struct CardIdPath(pub String);

impl<S> FromRequestParts<S> for CardIdPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<String>::from_request_parts(parts, state).await {
            Ok(Path(id)) => Ok(Self(id)),
            Err(rejection) => Err(DomainError::invalid_id(rejection.body_text()).into()),
        }
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(fields) => fields.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_and_falsy_bodies_carry_no_data() {
        for raw in ["", "  \n", "null", "{}", "[]", "\"\"", "0", "0.0", "false"] {
            assert_eq!(CardBody::parse(raw.as_bytes()).unwrap(), CardBody(None), "{raw:?}");
        }
    }

    #[test]
    fn object_body_is_kept() {
        let CardBody(fields) = CardBody::parse(br#"{"rank":"A","suit":"Hearts"}"#).unwrap();
        let fields = fields.unwrap();
        assert_eq!(fields["rank"], "A");
        assert_eq!(fields["suit"], "Hearts");
    }

    #[test]
    fn malformed_json_is_reported() {
        let err = CardBody::parse(b"{\"rank\":").unwrap_err();
        assert!(err.to_string().starts_with("Invalid JSON body: "));
    }

    #[test]
    fn truthy_non_objects_are_rejected() {
        for raw in ["[1]", "\"A\"", "7", "true"] {
            let err = CardBody::parse(raw.as_bytes()).unwrap_err();
            assert_eq!(err.to_string(), "Request body must be a JSON object");
        }
    }
}
