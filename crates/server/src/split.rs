//! Stateless bill splitting endpoint

use api_types::split::{BillInput, BillOutput};
use axum::{Json, extract::State};

use crate::{ServerError, extract::ApiJson, mapping, server::ServerState};

/// Handle requests for splitting a complete bill
pub async fn split(
    State(state): State<ServerState>,
    ApiJson(payload): ApiJson<BillInput>,
) -> Result<Json<BillOutput>, ServerError> {
    let input = mapping::bill_input(payload)?;
    let output = engine::split_bill_with(&input, state.residue)?;
    tracing::debug!(
        people = output.items.len(),
        total = %output.total_amount,
        "bill split"
    );

    Ok(Json(mapping::bill_output(output)))
}
