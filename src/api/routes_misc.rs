use super::*;

pub(super) async fn get_events(State(state): State<AppState>) -> Json<ApiResponse<Vec<SceneEvent>>> {
    let (tx, rx) = tokio::sync::oneshot::channel();
    let _ = state.sender.send(ApiCommand::GetEvents(tx));
    match rx.await {
        Ok(events) => Json(ApiResponse::success(events)),
        Err(_) => Json(ApiResponse::failure("Channel closed")),
    }
}

pub(super) async fn subscribe_events(State(state): State<AppState>) -> impl IntoResponse {
    let sender = state.sender.clone();
    let stream = async_stream::stream! {
        let mut tick = tokio::time::interval(std::time::Duration::from_millis(100));
        let mut last_idx = 0usize;
        loop {
            tick.tick().await;
            let (tx, rx) = tokio::sync::oneshot::channel();
            if sender.send(ApiCommand::GetEvents(tx)).is_err() {
                break;
            }
            let Ok(events) = rx.await else {
                break;
            };
            if events.len() < last_idx {
                last_idx = 0;
            }
            for ev in events.iter().skip(last_idx) {
                let payload = serde_json::to_string(ev).unwrap_or_else(|_| "{}".to_string());
                yield Ok::<SseEvent, Infallible>(SseEvent::default().event("scene_event").data(payload));
            }
            last_idx = events.len();
        }
    };
    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(std::time::Duration::from_secs(5))
            .text("keep-alive"),
    )
}

pub(super) async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthInfo>> {
    let (tx, rx) = tokio::sync::oneshot::channel();
    let _ = state.sender.send(ApiCommand::HealthCheck(tx));
    match rx.await {
        Ok(info) => Json(ApiResponse::success(info)),
        Err(_) => Json(ApiResponse::failure("Channel closed")),
    }
}
