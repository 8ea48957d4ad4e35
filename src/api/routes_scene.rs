use super::*;

pub(super) async fn add_node(
    State(state): State<AppState>,
    Json(body): Json<serde_json::Value>,
) -> Json<ApiResponse<NodeAdded>> {
    let req = match serde_json::from_value::<NodeAddRequest>(body) {
        Ok(req) => req,
        Err(e) => return Json(ApiResponse::failure(format!("invalid request: {e}"))),
    };
    let (tx, rx) = tokio::sync::oneshot::channel();
    let _ = state.sender.send(ApiCommand::AddNode(req, tx));
    match rx.await {
        Ok(Ok(added)) => Json(ApiResponse::success(added)),
        Ok(Err(e)) => Json(ApiResponse::failure(e)),
        Err(_) => Json(ApiResponse::failure("Channel closed")),
    }
}

pub(super) async fn update_node(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> Json<ApiResponse<String>> {
    let req = match serde_json::from_value::<NodeUpdateRequest>(body) {
        Ok(req) => req,
        Err(e) => return Json(ApiResponse::failure(format!("invalid request: {e}"))),
    };
    let (tx, rx) = tokio::sync::oneshot::channel();
    let _ = state.sender.send(ApiCommand::UpdateNode(id, req, tx));
    match rx.await {
        Ok(Ok(())) => Json(ApiResponse::success("ok".to_string())),
        Ok(Err(e)) => Json(ApiResponse::failure(e)),
        Err(_) => Json(ApiResponse::failure("Channel closed")),
    }
}

pub(super) async fn move_node(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> Json<ApiResponse<String>> {
    let req = match serde_json::from_value::<NodeMoveRequest>(body) {
        Ok(req) => req,
        Err(e) => return Json(ApiResponse::failure(format!("invalid request: {e}"))),
    };
    let (tx, rx) = tokio::sync::oneshot::channel();
    let _ = state.sender.send(ApiCommand::MoveNode(id, req, tx));
    match rx.await {
        Ok(Ok(())) => Json(ApiResponse::success("ok".to_string())),
        Ok(Err(e)) => Json(ApiResponse::failure(e)),
        Err(_) => Json(ApiResponse::failure("Channel closed")),
    }
}

pub(super) async fn delete_node(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<ApiResponse<String>> {
    let (tx, rx) = tokio::sync::oneshot::channel();
    let _ = state.sender.send(ApiCommand::DeleteNode(id, tx));
    match rx.await {
        Ok(Ok(())) => Json(ApiResponse::success("ok".to_string())),
        Ok(Err(e)) => Json(ApiResponse::failure(e)),
        Err(_) => Json(ApiResponse::failure("Channel closed")),
    }
}

pub(super) async fn get_node(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<ApiResponse<NodeInfo>> {
    let (tx, rx) = tokio::sync::oneshot::channel();
    let _ = state.sender.send(ApiCommand::GetNode(id, tx));
    match rx.await {
        Ok(Some(info)) => Json(ApiResponse::success(info)),
        Ok(None) => Json(ApiResponse::failure("node not found")),
        Err(_) => Json(ApiResponse::failure("Channel closed")),
    }
}

/// `GET /scene/nodes?name=` filters by exact name; without a filter every
/// node is returned.
pub(super) async fn find_nodes(
    State(state): State<AppState>,
    UrlQuery(params): UrlQuery<HashMap<String, String>>,
) -> Json<ApiResponse<Vec<NodeInfo>>> {
    let name = params.get("name").cloned();
    let (tx, rx) = tokio::sync::oneshot::channel();
    let _ = state.sender.send(ApiCommand::FindNodes(name, tx));
    match rx.await {
        Ok(nodes) => Json(ApiResponse::success(nodes)),
        Err(_) => Json(ApiResponse::failure("Channel closed")),
    }
}

pub(super) async fn describe_scene(
    State(state): State<AppState>,
) -> Json<ApiResponse<Vec<NodeInfo>>> {
    let (tx, rx) = tokio::sync::oneshot::channel();
    let _ = state.sender.send(ApiCommand::FindNodes(None, tx));
    match rx.await {
        Ok(nodes) => Json(ApiResponse::success(nodes)),
        Err(_) => Json(ApiResponse::failure("Channel closed")),
    }
}
