use super::*;

/// Commands sent from API -> scene world. Each carries a oneshot sender the
/// runtime system answers on during the next frame.
pub enum ApiCommand {
    AddNode(
        NodeAddRequest,
        tokio::sync::oneshot::Sender<Result<NodeAdded, String>>,
    ),
    UpdateNode(
        String,
        NodeUpdateRequest,
        tokio::sync::oneshot::Sender<Result<(), String>>,
    ),
    MoveNode(
        String,
        NodeMoveRequest,
        tokio::sync::oneshot::Sender<Result<(), String>>,
    ),
    DeleteNode(String, tokio::sync::oneshot::Sender<Result<(), String>>),
    /// `None` lists every node in the scene.
    FindNodes(Option<String>, tokio::sync::oneshot::Sender<Vec<NodeInfo>>),
    GetNode(String, tokio::sync::oneshot::Sender<Option<NodeInfo>>),
    AddTerrainLayer(
        String,
        TerrainLayerRequest,
        tokio::sync::oneshot::Sender<Result<(), String>>,
    ),
    RemoveTerrainLayer(
        String,
        usize,
        tokio::sync::oneshot::Sender<Result<(), String>>,
    ),
    SetTerrain(
        TerrainUploadRequest,
        tokio::sync::oneshot::Sender<Result<(), String>>,
    ),
    GetTerrain(tokio::sync::oneshot::Sender<Option<TerrainInfo>>),
    GetEvents(tokio::sync::oneshot::Sender<Vec<SceneEvent>>),
    HealthCheck(tokio::sync::oneshot::Sender<HealthInfo>),
}

#[derive(Resource)]
pub struct ApiChannels {
    pub receiver: Receiver<ApiCommand>,
}
