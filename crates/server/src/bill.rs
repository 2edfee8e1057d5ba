//! Bill draft API endpoints

use std::sync::Arc;

use api_types::{
    Message,
    bill::{
        Bill, BillInfo, BillSaved, Calculation, Item, ItemNew, ItemParticipants, Participant,
        ParticipantNew,
    },
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{BillStore, EngineError, Money, ResultEngine, TipRate};

use crate::{ServerError, extract::ApiJson, mapping, server::ServerState};

/// Runs blocking store I/O off the async workers.
async fn with_store<T, F>(state: &ServerState, op: F) -> Result<T, ServerError>
where
    F: FnOnce(&BillStore) -> ResultEngine<T> + Send + 'static,
    T: Send + 'static,
{
    let store = Arc::clone(&state.store);
    let result = tokio::task::spawn_blocking(move || op(&store))
        .await
        .map_err(|err| ServerError::Internal(format!("store task failed: {err}")))?;
    Ok(result?)
}

fn message(text: &str) -> Json<Message> {
    Json(Message {
        message: text.to_string(),
    })
}

/// Handle requests for starting a new draft
pub async fn reset(State(state): State<ServerState>) -> Json<Message> {
    *state.draft.write().await = engine::Bill::new();
    tracing::info!("bill draft reset");
    message("new bill created")
}

pub async fn get(State(state): State<ServerState>) -> Json<Bill> {
    Json(mapping::bill(&*state.draft.read().await))
}

/// Handle requests for updating name, date, location and tip
pub async fn update_info(
    State(state): State<ServerState>,
    ApiJson(payload): ApiJson<BillInfo>,
) -> Result<Json<Message>, ServerError> {
    engine::format_date(&payload.date)?;
    let tip = TipRate::from_percent(payload.tip_percentage)?;

    state
        .draft
        .write()
        .await
        .update_info(&payload.name, &payload.date, &payload.location, tip);
    Ok(message("bill info updated"))
}

/// Handle requests for persisting the current draft
pub async fn save(State(state): State<ServerState>) -> Result<Json<BillSaved>, ServerError> {
    let bill = state.draft.read().await.clone();
    let id = bill.id.clone();
    with_store(&state, move |store| store.save(&bill)).await?;
    tracing::info!(%id, "bill saved");

    Ok(Json(BillSaved {
        message: "bill saved".to_string(),
        id,
    }))
}

/// Handle requests for a previously saved bill
pub async fn get_saved(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<Bill>, ServerError> {
    let bill = with_store(&state, move |store| {
        store.get(&id)?.ok_or(EngineError::KeyNotFound(id))
    })
    .await?;

    Ok(Json(mapping::bill(&bill)))
}

pub async fn participant_new(
    State(state): State<ServerState>,
    ApiJson(payload): ApiJson<ParticipantNew>,
) -> Result<(StatusCode, Json<Participant>), ServerError> {
    if payload.name.trim().is_empty() {
        return Err(ServerError::Generic(
            "participant name is required".to_string(),
        ));
    }

    let participant = state.draft.write().await.add_participant(&payload.name)?;
    Ok((StatusCode::CREATED, Json(mapping::participant(&participant))))
}

pub async fn participant_remove(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state.draft.write().await.remove_participant(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn item_new(
    State(state): State<ServerState>,
    ApiJson(payload): ApiJson<ItemNew>,
) -> Result<(StatusCode, Json<Item>), ServerError> {
    let incomplete = || {
        ServerError::Generic("item name, amount and participants are required".to_string())
    };

    let name = payload
        .name
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(incomplete)?;
    let amount = payload.amount.ok_or_else(incomplete)?;
    let participant_ids = payload
        .participant_ids
        .filter(|ids| !ids.is_empty())
        .ok_or_else(incomplete)?;

    let amount = Money::from_major(amount)?;
    let item = state
        .draft
        .write()
        .await
        .add_item(&name, amount, payload.is_shared, participant_ids)?;

    Ok((StatusCode::CREATED, Json(mapping::item(&item))))
}

pub async fn item_remove(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state.draft.write().await.remove_item(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn item_participants(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<ItemParticipants>,
) -> Result<Json<Item>, ServerError> {
    let item = state
        .draft
        .write()
        .await
        .update_item_participants(&id, payload.participant_ids)?;

    Ok(Json(mapping::item(&item)))
}

/// Handle requests for splitting the current draft
pub async fn calculate(
    State(state): State<ServerState>,
) -> Result<Json<Calculation>, ServerError> {
    let bill = state.draft.read().await.clone();
    let results = bill.calculate(state.residue)?;

    Ok(Json(Calculation {
        bill: mapping::bill(&bill),
        results: mapping::bill_output(results),
    }))
}
