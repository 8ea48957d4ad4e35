mod command_runtime;
mod commands;
mod router;
mod routes_misc;
mod routes_scene;
mod routes_terrain;
mod security;
mod state;
pub mod types;

use axum::{
    extract::Request,
    extract::{Path, Query as UrlQuery, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{
        sse::{Event as SseEvent, KeepAlive, Sse},
        IntoResponse,
    },
    routing::{delete, get, post},
    Json, Router,
};
use bevy::prelude::*;
use crossbeam_channel::{Receiver, Sender};
use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::{Arc, Mutex};

use crate::components::*;
use crate::events::{SceneEvent, SceneEventBus};
use crate::mover::Mover;
use crate::terrain::{HeightField, Terrain};
use command_runtime::*;
use commands::*;
use router::build_router;
use routes_misc::*;
use routes_scene::*;
use routes_terrain::*;
use security::*;
use state::*;
use types::*;

pub struct ApiPlugin;

impl Plugin for ApiPlugin {
    fn build(&self, app: &mut App) {
        let (tx, rx) = crossbeam_channel::unbounded::<ApiCommand>();

        app.insert_resource(ApiChannels { receiver: rx })
            .add_systems(Update, process_api_commands);

        let state = AppState { sender: tx };
        let security = ApiSecurity::from_env();
        let addr = api_addr();
        std::thread::spawn(move || {
            let rt = tokio::runtime::Runtime::new().expect("failed to create API runtime");
            rt.block_on(async move {
                let app = build_router(state, security);

                let listener = tokio::net::TcpListener::bind(&addr)
                    .await
                    .unwrap_or_else(|e| panic!("failed to bind API address {addr}: {e}"));

                info!("[Scenehost API] Listening on http://{addr}");

                if let Err(e) = axum::serve(listener, app).await {
                    error!("[Scenehost API] Server error: {e}");
                }
            });
        });
    }
}

fn api_addr() -> String {
    std::env::var("SCENEHOST_API_ADDR")
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "127.0.0.1:3000".to_string())
}
