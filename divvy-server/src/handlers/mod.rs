pub mod expense;
pub mod group;
pub mod health;
pub mod request_io;
pub mod user;

pub mod error {
    use actix_web::http::StatusCode;
    use actix_web::{HttpRequest, HttpResponse, HttpResponseBuilder};
    use serde_json::json;
    use std::borrow::Cow;
    use std::fmt;

    #[derive(Debug)]
    pub enum HttpErrorResponse {
        // 400
        IncorrectlyFormed(Cow<'static, str>),

        // 404
        DoesNotExist(Cow<'static, str>),

        // 409
        ConflictWithExisting(Cow<'static, str>),

        // 500
        InternalError(Cow<'static, str>, String),
    }

    impl std::error::Error for HttpErrorResponse {}

    impl fmt::Display for HttpErrorResponse {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                HttpErrorResponse::IncorrectlyFormed(msg) => {
                    write!(f, "Incorrectly formed request: {msg}")
                }
                HttpErrorResponse::DoesNotExist(msg) => write!(f, "Does not exist: {msg}"),
                HttpErrorResponse::ConflictWithExisting(msg) => {
                    write!(f, "Conflict with existing data: {msg}")
                }
                HttpErrorResponse::InternalError(msg, e) => {
                    write!(f, "Internal error: {msg}: {e}")
                }
            }
        }
    }

    impl actix_web::error::ResponseError for HttpErrorResponse {
        fn error_response(&self) -> HttpResponse {
            let body = match self {
                HttpErrorResponse::IncorrectlyFormed(msg)
                | HttpErrorResponse::DoesNotExist(msg)
                | HttpErrorResponse::ConflictWithExisting(msg) => json!({ "message": msg }),
                HttpErrorResponse::InternalError(msg, e) => {
                    json!({ "message": msg, "error": e })
                }
            };

            HttpResponseBuilder::new(self.status_code()).json(body)
        }

        fn status_code(&self) -> StatusCode {
            match *self {
                HttpErrorResponse::IncorrectlyFormed(_) => StatusCode::BAD_REQUEST,
                HttpErrorResponse::DoesNotExist(_) => StatusCode::NOT_FOUND,
                HttpErrorResponse::ConflictWithExisting(_) => StatusCode::CONFLICT,
                HttpErrorResponse::InternalError(_, _) => StatusCode::INTERNAL_SERVER_ERROR,
            }
        }
    }

    // Malformed or incomplete JSON bodies become a 400 rather than falling
    // through as an unformatted actix error
    pub fn json_error_handler(
        err: actix_web::error::JsonPayloadError,
        _req: &HttpRequest,
    ) -> actix_web::Error {
        HttpErrorResponse::IncorrectlyFormed(err.to_string().into()).into()
    }
}
