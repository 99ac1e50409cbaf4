//! Room store server.
//!
//! Holds one JSON blob per room and speaks the same verbs a hosted realtime
//! database does, so separate clients can share rooms. The server does not
//! look inside documents.

use crate::room::RoomId;
use crate::sync::store::MemoryRoomStore;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{Request, StatusCode};
use axum::routing::get;
use axum::{Json, Router};
use tower::ServiceBuilder;
use tracing::{debug, info, instrument, warn};

/// Builds the router over `store`.
///
/// Routes: `GET`, `PUT`, `PATCH`, `DELETE` on `/room/{id}.json`.
#[instrument(skip(store))]
pub fn router(store: MemoryRoomStore) -> Router {
    info!("Building room store router");
    Router::new()
        .route(
            "/room/{file}",
            get(fetch_room)
                .put(replace_room)
                .patch(merge_room)
                .delete(delete_room),
        )
        .layer(ServiceBuilder::new().map_request(|req: Request<Body>| {
            debug!(method = %req.method(), uri = %req.uri(), "Incoming HTTP request");
            req
        }))
        .with_state(store)
}

/// Serves `store` on `listener` until the task is dropped.
#[instrument(skip_all)]
pub async fn serve(
    listener: tokio::net::TcpListener,
    store: MemoryRoomStore,
) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "Room store listening");
    }
    axum::serve(listener, router(store)).await
}

/// Parses `"{id}.json"` into a room.
fn room_from_file(file: &str) -> Result<RoomId, StatusCode> {
    let raw = file.strip_suffix(".json").ok_or(StatusCode::NOT_FOUND)?;
    raw.parse::<RoomId>().map_err(|e| {
        warn!(file, error = %e, "Rejected room id");
        StatusCode::BAD_REQUEST
    })
}

#[instrument(skip(store))]
async fn fetch_room(
    State(store): State<MemoryRoomStore>,
    Path(file): Path<String>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let room = room_from_file(&file)?;
    Ok(Json(store.get(room).unwrap_or(serde_json::Value::Null)))
}

#[instrument(skip(store, body))]
async fn replace_room(
    State(store): State<MemoryRoomStore>,
    Path(file): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let room = room_from_file(&file)?;
    if body.is_null() {
        store.remove(room);
    } else {
        store.put(room, body.clone());
    }
    info!(room = %room, "Room document replaced");
    Ok(Json(body))
}

#[instrument(skip(store, body))]
async fn merge_room(
    State(store): State<MemoryRoomStore>,
    Path(file): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let room = room_from_file(&file)?;
    let merged = store.merge(room, body).ok_or_else(|| {
        warn!(room = %room, "PATCH body is not an object");
        StatusCode::BAD_REQUEST
    })?;
    info!(room = %room, "Room document updated");
    Ok(Json(merged))
}

#[instrument(skip(store))]
async fn delete_room(
    State(store): State<MemoryRoomStore>,
    Path(file): Path<String>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let room = room_from_file(&file)?;
    let existed = store.remove(room);
    info!(room = %room, existed, "Room document deleted");
    Ok(Json(serde_json::Value::Null))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_from_file() {
        assert_eq!(room_from_file("42.json"), Ok(RoomId::new(42).unwrap()));
        assert_eq!(room_from_file("42"), Err(StatusCode::NOT_FOUND));
        assert_eq!(room_from_file("abc.json"), Err(StatusCode::BAD_REQUEST));
        assert_eq!(room_from_file("100000000.json"), Err(StatusCode::BAD_REQUEST));
    }
}
