use serde::{Deserialize, Serialize};

#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(msg: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(msg.into()),
        }
    }
}

// === Scene node requests ===
//
// Wire field names follow the remote-control protocol as clients already
// speak it (`cullbackfaces`, `smoothnormals`, `followheight`, `minHeight`).

#[derive(Deserialize, Clone)]
pub struct NodeAddRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub components: Option<ComponentSet>,
}

#[derive(Deserialize, Clone, Default)]
pub struct ComponentSet {
    #[serde(default)]
    pub transform: Option<TransformDef>,
    #[serde(default)]
    pub model: Option<ModelDef>,
    #[serde(default)]
    pub terrain: Option<TerrainDef>,
    #[serde(default)]
    pub water: Option<WaterDef>,
    #[serde(default)]
    pub panel: Option<PanelDef>,
}

#[derive(Deserialize, Clone, Default)]
pub struct TransformDef {
    #[serde(default)]
    pub position: Option<[f32; 3]>,
    /// Euler angles in degrees.
    #[serde(default)]
    pub rotation: Option<[f32; 3]>,
    /// Uniform scale factor.
    #[serde(default)]
    pub scale: Option<f32>,
}

#[derive(Deserialize, Clone)]
pub struct ModelDef {
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub animated: bool,
    /// Clip to start looping right away (animated models only).
    #[serde(default)]
    pub animation: Option<String>,
    #[serde(default)]
    pub cullbackfaces: Option<bool>,
}

#[derive(Deserialize, Clone)]
pub struct TerrainDef {
    #[serde(default)]
    pub smoothnormals: Option<bool>,
}

#[derive(Deserialize, Clone)]
pub struct WaterDef {
    #[serde(default)]
    pub size: Option<[f32; 2]>,
    #[serde(default)]
    pub resolution: Option<f32>,
}

#[derive(Deserialize, Clone)]
pub struct PanelDef {
    #[serde(default)]
    pub size: Option<[f32; 2]>,
    #[serde(default)]
    pub resolution: Option<[u32; 2]>,
    #[serde(default)]
    pub background: Option<[f32; 4]>,
}

#[derive(Deserialize, Clone)]
pub struct NodeUpdateRequest {
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub transform: Option<TransformDef>,
    #[serde(default)]
    pub animation: Option<AnimationDef>,
}

#[derive(Deserialize, Clone)]
pub struct AnimationDef {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub speed: Option<f32>,
}

#[derive(Deserialize, Clone)]
pub struct NodeMoveRequest {
    /// Cancels the node's running move instead of starting one.
    #[serde(default)]
    pub stop: bool,
    #[serde(default)]
    pub position: Option<[f32; 3]>,
    #[serde(default)]
    pub speed: Option<f32>,
    #[serde(default)]
    pub time: Option<f32>,
    #[serde(default)]
    pub interpolate: Option<String>,
    #[serde(default)]
    pub followheight: bool,
    #[serde(default)]
    pub rotate: Option<String>,
}

#[derive(Deserialize, Clone)]
pub struct TerrainLayerRequest {
    #[serde(default)]
    pub diffuse: Option<String>,
    #[serde(default)]
    pub normal: Option<String>,
    #[serde(default, rename = "minHeight")]
    pub min_height: Option<f32>,
    #[serde(default, rename = "maxHeight")]
    pub max_height: Option<f32>,
    #[serde(default, rename = "fadeDist")]
    pub fade_dist: Option<f32>,
}

#[derive(Deserialize, Clone)]
pub struct TerrainUploadRequest {
    pub width: usize,
    pub depth: usize,
    #[serde(default)]
    pub spacing: Option<f32>,
    pub heights: Vec<f32>,
}

// === Responses ===

#[derive(Serialize, Clone, Debug)]
pub struct NodeAdded {
    pub id: String,
    pub name: String,
}

#[derive(Serialize, Clone, Debug)]
pub struct NodeInfo {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    pub position: [f32; 3],
    /// Euler angles in degrees.
    pub rotation: [f32; 3],
    pub scale: [f32; 3],
    pub components: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<String>,
    pub moving: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terrain_layers: Option<usize>,
}

#[derive(Serialize, Clone)]
pub struct TerrainInfo {
    pub width: usize,
    pub depth: usize,
    pub spacing: f32,
    pub min_height: f32,
    pub max_height: f32,
}

#[derive(Serialize, Clone)]
pub struct HealthInfo {
    pub status: String,
    pub nodes: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_request_accepts_the_full_wire_payload() {
        let req: NodeAddRequest = serde_json::from_value(serde_json::json!({
            "name": "island",
            "id": "island-1",
            "parent": "root-2",
            "components": {
                "transform": { "position": [1.0, 2.0, 3.0], "rotation": [0.0, 90.0, 0.0], "scale": 2.0 },
                "model": { "file": "models/palm.obj", "cullbackfaces": true },
                "terrain": { "smoothnormals": true },
                "water": { "size": [64.0, 64.0], "resolution": 0.25 },
                "panel": { "size": [1.0, 0.5], "resolution": [512, 256], "background": [0.0, 0.0, 0.0, 1.0] }
            }
        }))
        .expect("deserialize add request");

        assert_eq!(req.name.as_deref(), Some("island"));
        assert_eq!(req.parent.as_deref(), Some("root-2"));
        let components = req.components.expect("components");
        assert_eq!(
            components.transform.as_ref().and_then(|t| t.scale),
            Some(2.0)
        );
        assert_eq!(
            components.model.as_ref().and_then(|m| m.cullbackfaces),
            Some(true)
        );
        assert!(!components.model.as_ref().map(|m| m.animated).unwrap());
        assert_eq!(
            components.terrain.as_ref().and_then(|t| t.smoothnormals),
            Some(true)
        );
        assert_eq!(
            components.panel.as_ref().and_then(|p| p.resolution),
            Some([512, 256])
        );
    }

    #[test]
    fn layer_request_uses_camel_case_wire_names() {
        let req: TerrainLayerRequest = serde_json::from_value(serde_json::json!({
            "diffuse": "textures/grass.png",
            "normal": "textures/grass_n.png",
            "minHeight": 0.0,
            "maxHeight": 8.0,
            "fadeDist": 1.5
        }))
        .expect("deserialize layer request");
        assert_eq!(req.min_height, Some(0.0));
        assert_eq!(req.max_height, Some(8.0));
        assert_eq!(req.fade_dist, Some(1.5));
    }

    #[test]
    fn response_serialization_omits_empty_fields() {
        let ok = serde_json::to_value(ApiResponse::success(NodeAdded {
            id: "a".into(),
            name: "b".into(),
        }))
        .expect("serialize");
        assert_eq!(ok["ok"], true);
        assert!(ok.get("error").is_none());

        let err = serde_json::to_value(ApiResponse::<NodeAdded>::failure("node not found"))
            .expect("serialize");
        assert_eq!(err["ok"], false);
        assert_eq!(err["error"], "node not found");
        assert!(err.get("data").is_none());
    }
}
