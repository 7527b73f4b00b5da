use super::{extract::Payload, types::InputPayload};
use crate::Error;
use axum::response::Json;
use tracing::{debug, warn};

pub async fn health() -> &'static str {
    "OK"
}

pub async fn input(
    payload: Result<Payload<InputPayload>, Error>,
) -> Result<Json<InputPayload>, Error> {
    match payload {
        Ok(Payload(payload)) => {
            debug!("Received input of {} bytes", payload.input.len());
            Ok(Json(payload))
        }
        Err(e) => {
            warn!("Rejected input request: {}", e);
            Err(e)
        }
    }
}
