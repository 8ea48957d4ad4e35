use super::*;

pub(super) fn build_router(state: AppState, security: ApiSecurity) -> Router {
    Router::new()
        .route("/scene/nodes", get(find_nodes).post(add_node))
        .route(
            "/scene/nodes/{id}",
            get(get_node).post(update_node).delete(delete_node),
        )
        .route("/scene/nodes/{id}/moveto", post(move_node))
        .route("/scene/nodes/{id}/terrain/layers", post(add_terrain_layer))
        .route(
            "/scene/nodes/{id}/terrain/layers/{index}",
            delete(remove_terrain_layer),
        )
        .route("/scene/describe", get(describe_scene))
        .route("/terrain", get(get_terrain).post(set_terrain))
        .route("/events", get(get_events))
        .route("/events/subscribe", get(subscribe_events))
        .route("/health", get(health))
        .with_state(state)
        .layer(middleware::from_fn_with_state(security, api_guard))
}
