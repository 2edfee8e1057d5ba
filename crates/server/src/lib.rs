use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

use serde::Serialize;
pub use server::{ServerState, router, run_with_listener};

mod bill;
mod extract;
pub mod mapping;
mod server;
mod split;

pub mod types {
    pub mod split {
        pub use api_types::split::{BillInput, BillItem, BillOutput, PersonItem};
    }

    pub mod bill {
        pub use api_types::bill::{
            Bill, BillInfo, BillSaved, Calculation, Item, ItemNew, ItemParticipants, Participant,
            ParticipantNew,
        };
    }
}

#[derive(Debug)]
pub enum ServerError {
    Engine(EngineError),
    Generic(String),
    /// Request body the extractor could not decode.
    Rejected(StatusCode, String),
    Internal(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::MalformedDate(_)
        | EngineError::InvalidAmount(_)
        | EngineError::InvalidTip(_)
        | EngineError::InvalidItem(_) => StatusCode::UNPROCESSABLE_ENTITY,
        EngineError::Reconciliation { .. } | EngineError::Io(_) | EngineError::Json(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Io(io_err) => {
            tracing::error!("storage error: {io_err}");
            "internal server error".to_string()
        }
        EngineError::Json(json_err) => {
            tracing::error!("storage encoding error: {json_err}");
            "internal server error".to_string()
        }
        err @ EngineError::Reconciliation { .. } => {
            tracing::error!("{err}");
            err.to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => (status_for_engine_error(&err), message_for_engine_error(err)),
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
            ServerError::Rejected(status, err) => (status, err),
            ServerError::Internal(err) => {
                tracing::error!("{err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}
