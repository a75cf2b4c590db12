use actix_web::{
    error::{InternalError, JsonPayloadError},
    http::StatusCode,
    HttpRequest, HttpResponse, ResponseError,
};
use log::error;
use serde_json::json;

use crate::accounts::Error;

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::UsernameExhausted(_) => StatusCode::SERVICE_UNAVAILABLE,
            Error::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut response = HttpResponse::build(self.status_code());
        match self {
            Error::Validation(errors) => response.json(errors),
            Error::NotFound(_) => response.json(json!({ "detail": "Not found." })),
            Error::UsernameExhausted(_) => {
                error!("Responding with error: {}", self);
                response.json(json!({ "detail": "Could not allocate a username, try again later." }))
            }
            Error::Database(e) => {
                error!("Responding with error: {}", e);
                response.json(json!({ "detail": "A server error occurred." }))
            }
        }
    }
}

/// Turns bodies that are not JSON at all into a 400 with a `detail` message.
/// Well formed JSON with missing or mistyped fields is reported per field by
/// the validation step instead.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let detail = err.to_string();
    InternalError::from_response(err, HttpResponse::BadRequest().json(json!({ "detail": detail })))
        .into()
}
