use super::*;

pub(super) async fn set_terrain(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> Json<ApiResponse<String>> {
    let req = match serde_json::from_value::<TerrainUploadRequest>(body) {
        Ok(req) => req,
        Err(e) => return Json(ApiResponse::failure(format!("invalid request: {e}"))),
    };
    let (tx, rx) = tokio::sync::oneshot::channel();
    let _ = state.sender.send(ApiCommand::SetTerrain(req, tx));
    match rx.await {
        Ok(Ok(())) => Json(ApiResponse::success("ok".to_string())),
        Ok(Err(e)) => Json(ApiResponse::failure(e)),
        Err(_) => Json(ApiResponse::failure("Channel closed")),
    }
}

pub(super) async fn get_terrain(State(state): State<AppState>) -> Json<ApiResponse<TerrainInfo>> {
    let (tx, rx) = tokio::sync::oneshot::channel();
    let _ = state.sender.send(ApiCommand::GetTerrain(tx));
    match rx.await {
        Ok(Some(info)) => Json(ApiResponse::success(info)),
        Ok(None) => Json(ApiResponse::failure("no terrain loaded")),
        Err(_) => Json(ApiResponse::failure("Channel closed")),
    }
}

pub(super) async fn add_terrain_layer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> Json<ApiResponse<String>> {
    let req = match serde_json::from_value::<TerrainLayerRequest>(body) {
        Ok(req) => req,
        Err(e) => return Json(ApiResponse::failure(format!("invalid request: {e}"))),
    };
    let (tx, rx) = tokio::sync::oneshot::channel();
    let _ = state.sender.send(ApiCommand::AddTerrainLayer(id, req, tx));
    match rx.await {
        Ok(Ok(())) => Json(ApiResponse::success("ok".to_string())),
        Ok(Err(e)) => Json(ApiResponse::failure(e)),
        Err(_) => Json(ApiResponse::failure("Channel closed")),
    }
}

pub(super) async fn remove_terrain_layer(
    State(state): State<AppState>,
    Path((id, index)): Path<(String, usize)>,
) -> Json<ApiResponse<String>> {
    let (tx, rx) = tokio::sync::oneshot::channel();
    let _ = state
        .sender
        .send(ApiCommand::RemoveTerrainLayer(id, index, tx));
    match rx.await {
        Ok(Ok(())) => Json(ApiResponse::success("ok".to_string())),
        Ok(Err(e)) => Json(ApiResponse::failure(e)),
        Err(_) => Json(ApiResponse::failure("Channel closed")),
    }
}
