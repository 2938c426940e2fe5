use axum::extract::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::env;
use std::fmt;
use std::fmt::Debug;

/// Service-wide error: a machine-checkable code plus a human-readable
/// message.
///
/// Codes are grouped by hundreds into response classes:
///
/// - `1..=99` internal failures carrying their cause; the message is logged
///   and never shown to clients
/// - `100..=199` validation-class, shown as 422
/// - `200..=299` not-found-class, shown as 404
/// - `300..=349` authentication failures, shown as 401
/// - `350..=399` authorization failures, shown as 403
/// - `400..=449` upstream (geocoding) unavailability, shown as 502
/// - `450..=499` persistence failures with a sanitized message, shown as 500
#[derive(Debug)]
pub struct Error {
    pub code: i32,
    pub message: String,
}

impl Error {
    pub fn env_var_error(err: env::VarError) -> Error {
        Error {
            code: 1,
            message: format!("environment variable error: {}", err),
        }
    }

    pub fn database_error<T: Debug>(cause: T) -> Error {
        Error {
            code: 2,
            message: format!("database error: {:?}", cause),
        }
    }

    pub fn transport_error(err: reqwest::Error) -> Error {
        Error {
            code: 3,
            message: format!("geocoding transport error: {}", err),
        }
    }

    pub fn credential_error<T: Debug>(cause: T) -> Error {
        Error {
            code: 4,
            message: format!("credential error: {:?}", cause),
        }
    }

    pub fn token_error<T: Debug>(cause: T) -> Error {
        Error {
            code: 5,
            message: format!("token error: {:?}", cause),
        }
    }

    pub fn policy_error(err: oso::OsoError) -> Error {
        Error {
            code: 6,
            message: format!("authorization policy error: {}", err),
        }
    }

    pub fn validation_error(message: &str) -> Error {
        Error {
            code: 100,
            message: message.into(),
        }
    }

    pub fn invalid_input_error() -> Error {
        Error {
            code: 101,
            message: "Address is required.".into(),
        }
    }

    pub fn email_taken_error() -> Error {
        Error {
            code: 102,
            message: "User exists already, please login instead.".into(),
        }
    }

    pub fn malformed_result_error(address: &str) -> Error {
        Error {
            code: 103,
            message: format!("Invalid coordinates for address: {}", address),
        }
    }

    pub fn not_found_error(message: &str) -> Error {
        Error {
            code: 200,
            message: message.into(),
        }
    }

    pub fn creator_not_found_error() -> Error {
        Error {
            code: 201,
            message: "Could not find user for provided id.".into(),
        }
    }

    pub fn no_match_error(address: &str) -> Error {
        Error {
            code: 202,
            message: format!("Could not find a location for address: {}", address),
        }
    }

    pub fn invalid_credentials_error() -> Error {
        Error {
            code: 300,
            message: "Invalid credentials, could not log you in.".into(),
        }
    }

    pub fn authentication_error() -> Error {
        Error {
            code: 301,
            message: "Authentication failed!".into(),
        }
    }

    pub fn unauthorized_error() -> Error {
        Error {
            code: 350,
            message: "You are not allowed to perform this action.".into(),
        }
    }

    pub fn upstream_error() -> Error {
        Error {
            code: 400,
            message: "The address lookup service is unavailable.".into(),
        }
    }

    pub fn persistence_error(message: &str) -> Error {
        Error {
            code: 450,
            message: message.into(),
        }
    }

    pub fn is_validation_error(&self) -> bool {
        self.code == 100
    }

    pub fn is_invalid_input_error(&self) -> bool {
        self.code == 101
    }

    pub fn is_email_taken_error(&self) -> bool {
        self.code == 102
    }

    pub fn is_malformed_result_error(&self) -> bool {
        self.code == 103
    }

    pub fn is_not_found_error(&self) -> bool {
        self.code == 200
    }

    pub fn is_creator_not_found_error(&self) -> bool {
        self.code == 201
    }

    pub fn is_no_match_error(&self) -> bool {
        self.code == 202
    }

    pub fn is_invalid_credentials_error(&self) -> bool {
        self.code == 300
    }

    pub fn is_authentication_error(&self) -> bool {
        self.code == 301
    }

    pub fn is_unauthorized_error(&self) -> bool {
        self.code == 350
    }

    pub fn is_upstream_error(&self) -> bool {
        self.code == 400
    }

    pub fn is_persistence_error(&self) -> bool {
        self.code == 450
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error {}: {}", self.code, self.message)
    }
}

impl From<env::VarError> for Error {
    fn from(err: env::VarError) -> Self {
        Error::env_var_error(err)
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        Error::database_error(err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::transport_error(err)
    }
}

impl From<oso::OsoError> for Error {
    fn from(err: oso::OsoError) -> Self {
        Error::policy_error(err)
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_message) = match self.code {
            1..=99 => (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"),
            100..=199 => (StatusCode::UNPROCESSABLE_ENTITY, self.message.as_str()),
            200..=299 => (StatusCode::NOT_FOUND, self.message.as_str()),
            300..=349 => (StatusCode::UNAUTHORIZED, self.message.as_str()),
            350..=399 => (StatusCode::FORBIDDEN, self.message.as_str()),
            400..=449 => (StatusCode::BAD_GATEWAY, self.message.as_str()),
            450..=499 => (StatusCode::INTERNAL_SERVER_ERROR, self.message.as_str()),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error"),
        };

        let body = Json(json!({
            "code": self.code,
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

#[test]
fn internal_errors_answer_500_without_leaking_the_cause() {
    let response = Error::database_error("connection refused").into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn each_failure_class_maps_to_one_status() {
    let cases = [
        (
            Error::validation_error("bad input"),
            StatusCode::UNPROCESSABLE_ENTITY,
        ),
        (Error::invalid_input_error(), StatusCode::UNPROCESSABLE_ENTITY),
        (Error::email_taken_error(), StatusCode::UNPROCESSABLE_ENTITY),
        (
            Error::malformed_result_error("somewhere"),
            StatusCode::UNPROCESSABLE_ENTITY,
        ),
        (Error::not_found_error("gone"), StatusCode::NOT_FOUND),
        (Error::creator_not_found_error(), StatusCode::NOT_FOUND),
        (Error::no_match_error("nowhere"), StatusCode::NOT_FOUND),
        (
            Error::invalid_credentials_error(),
            StatusCode::UNAUTHORIZED,
        ),
        (Error::authentication_error(), StatusCode::UNAUTHORIZED),
        (Error::unauthorized_error(), StatusCode::FORBIDDEN),
        (Error::upstream_error(), StatusCode::BAD_GATEWAY),
        (
            Error::persistence_error("could not save"),
            StatusCode::INTERNAL_SERVER_ERROR,
        ),
    ];

    for (error, status) in cases {
        assert_eq!(error.into_response().status(), status);
    }
}

#[test]
fn not_authorized_is_distinguishable_from_not_found() {
    let unauthorized = Error::unauthorized_error();
    let not_found = Error::not_found_error("Could not find a place for the provided id.");

    assert!(unauthorized.is_unauthorized_error());
    assert!(!unauthorized.is_not_found_error());
    assert!(not_found.is_not_found_error());
    assert_ne!(unauthorized.code, not_found.code);
}
