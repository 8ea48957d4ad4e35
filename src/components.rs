use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Stable string identity of a scene node, unique across the scene.
/// Clients may supply their own; otherwise one is generated.
#[derive(Component, Clone, PartialEq, Eq, Hash, Debug)]
pub struct NodeId(pub String);

/// Display name of a scene node. Not unique.
#[derive(Component, Clone, Debug)]
pub struct NodeName(pub String);

/// Static model attached to a node. The file is a path into whatever asset
/// store the external renderer uses.
#[derive(Component, Clone, Debug)]
pub struct ModelRenderer {
    pub file: String,
    pub cull_back_faces: bool,
}

/// Animated model with a playback clock. `elapsed` advances every frame
/// while a clip is set; sampling the skeleton is the renderer's job.
#[derive(Component, Clone, Debug)]
pub struct AnimatedModelRenderer {
    pub file: String,
    pub clip: Option<String>,
    pub speed: f32,
    pub looping: bool,
    pub elapsed: f32,
}

impl AnimatedModelRenderer {
    pub fn new(file: String) -> Self {
        Self {
            file,
            clip: None,
            speed: 1.0,
            looping: false,
            elapsed: 0.0,
        }
    }

    /// Switches to the named clip and restarts the playback clock.
    pub fn play(&mut self, clip: String, looping: bool) {
        self.clip = Some(clip);
        self.looping = looping;
        self.elapsed = 0.0;
    }
}

/// Terrain surface of a node, textured by height-ranged material layers.
#[derive(Component, Clone, Default, Debug)]
pub struct TerrainRenderer {
    pub smooth_normals: bool,
    pub layers: Vec<TerrainLayer>,
}

/// One material layer of a terrain renderer, blended in over
/// `fade_dist` world units around its height range.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct TerrainLayer {
    pub diffuse: String,
    pub normal: String,
    pub min_height: f32,
    pub max_height: f32,
    pub fade_dist: f32,
}

pub const DEFAULT_WATER_RESOLUTION: f32 = 0.1;

/// Water surface patch, `size` world units wide/deep, tessellated at
/// `resolution` units per cell.
#[derive(Component, Clone, Debug)]
pub struct WaterSurface {
    pub size: Vec2,
    pub resolution: f32,
}

/// Flat UI panel in world space with a pixel back buffer of `resolution`,
/// optionally cleared to `background` (RGBA).
#[derive(Component, Clone, Debug)]
pub struct PanelSurface {
    pub size: Vec2,
    pub resolution: UVec2,
    pub background: Option<[f32; 4]>,
}
