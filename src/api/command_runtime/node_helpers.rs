use super::*;
use crate::mover::{Interpolate, Pace, RotateMode, DEFAULT_MOVE_DURATION};
use rand::Rng;

pub(super) fn generate_node_id() -> String {
    format!("{:032x}", rand::thread_rng().gen::<u128>())
}

enum ModelAttachment {
    Static(ModelRenderer),
    Animated(AnimatedModelRenderer),
}

/// Validates the whole add request, then spawns the node with its
/// attachments in one go. Nothing is spawned on a validation failure.
pub(super) fn spawn_node(
    req: &NodeAddRequest,
    node_index: &HashMap<String, Entity>,
    terrain: &Terrain,
    commands: &mut Commands,
    event_bus: &mut SceneEventBus,
) -> Result<(NodeAdded, Entity), String> {
    let parent = match req.parent.as_deref() {
        Some(guid) => Some(
            node_index
                .get(guid)
                .copied()
                .ok_or_else(|| "parent not found".to_string())?,
        ),
        None => None,
    };
    let name = match req.name.as_deref() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => return Err("name not specified".to_string()),
    };
    let guid = match &req.id {
        Some(id) if node_index.contains_key(id) => {
            return Err("node id already in use".to_string());
        }
        Some(id) => id.clone(),
        None => generate_node_id(),
    };

    let components = req.components.clone().unwrap_or_default();
    let model = components.model.as_ref().map(build_model).transpose()?;
    let water = components.water.as_ref().map(build_water).transpose()?;
    let panel = components.panel.as_ref().map(build_panel).transpose()?;
    if components.terrain.is_some() && terrain.height_field.is_none() {
        return Err("no terrain loaded".to_string());
    }

    let mut entity = commands.spawn((
        NodeId(guid.clone()),
        NodeName(name.clone()),
        transform_from_def(components.transform.as_ref()),
    ));
    match model {
        Some(ModelAttachment::Static(renderer)) => {
            entity.insert(renderer);
        }
        Some(ModelAttachment::Animated(renderer)) => {
            entity.insert(renderer);
        }
        None => {}
    }
    if let Some(def) = &components.terrain {
        entity.insert(TerrainRenderer {
            smooth_normals: def.smoothnormals.unwrap_or(false),
            layers: Vec::new(),
        });
    }
    if let Some(water) = water {
        entity.insert(water);
    }
    if let Some(panel) = panel {
        entity.insert(panel);
    }
    if let Some(parent) = parent {
        entity.set_parent(parent);
    }
    let spawned = entity.id();

    event_bus.emit(
        "node_added",
        serde_json::json!({ "id": guid, "name": name }),
        Some(guid.clone()),
    );
    Ok((NodeAdded { id: guid, name }, spawned))
}

fn build_model(def: &ModelDef) -> Result<ModelAttachment, String> {
    let file = match def.file.as_deref() {
        Some(file) if !file.is_empty() => file.to_string(),
        _ => return Err("no file field found in model".to_string()),
    };
    if def.animated {
        let mut renderer = AnimatedModelRenderer::new(file);
        if let Some(clip) = &def.animation {
            renderer.play(clip.clone(), true);
        }
        Ok(ModelAttachment::Animated(renderer))
    } else {
        Ok(ModelAttachment::Static(ModelRenderer {
            file,
            cull_back_faces: def.cullbackfaces.unwrap_or(false),
        }))
    }
}

fn build_water(def: &WaterDef) -> Result<WaterSurface, String> {
    let size = def
        .size
        .ok_or_else(|| "water/size not specified".to_string())?;
    Ok(WaterSurface {
        size: Vec2::from_array(size),
        resolution: def.resolution.unwrap_or(DEFAULT_WATER_RESOLUTION),
    })
}

fn build_panel(def: &PanelDef) -> Result<PanelSurface, String> {
    let size = def
        .size
        .ok_or_else(|| "panel/size not specified".to_string())?;
    let resolution = def
        .resolution
        .ok_or_else(|| "panel/resolution not specified".to_string())?;
    Ok(PanelSurface {
        size: Vec2::from_array(size),
        resolution: UVec2::new(resolution[0], resolution[1]),
        background: def.background,
    })
}

pub(super) fn transform_from_def(def: Option<&TransformDef>) -> Transform {
    let mut transform = Transform::IDENTITY;
    if let Some(def) = def {
        apply_transform_def(def, &mut transform);
    }
    transform
}

fn apply_transform_def(def: &TransformDef, transform: &mut Transform) {
    if let Some([x, y, z]) = def.position {
        transform.translation = Vec3::new(x, y, z);
    }
    if let Some([x, y, z]) = def.rotation {
        transform.rotation = Quat::from_euler(
            EulerRot::XYZ,
            x.to_radians(),
            y.to_radians(),
            z.to_radians(),
        );
    }
    if let Some(scale) = def.scale {
        transform.scale = Vec3::splat(scale);
    }
}

pub(super) fn apply_node_update(
    entity: Entity,
    guid: &str,
    req: &NodeUpdateRequest,
    node_index: &HashMap<String, Entity>,
    nodes: &mut NodeQuery<'_, '_>,
    animated: &mut Query<'_, '_, &'static mut AnimatedModelRenderer>,
    commands: &mut Commands,
) -> Result<(), String> {
    if req.animation.is_some() && animated.get(entity).is_err() {
        return Err("node has no animated model renderer".to_string());
    }

    if let Some(parent_guid) = &req.parent {
        match node_index.get(parent_guid).copied() {
            Some(new_parent) if !reachable_from(nodes, new_parent, entity) => {
                commands.entity(entity).set_parent(new_parent);
            }
            Some(_) => {
                warn!(
                    "[Scenehost API] Ignoring reparent of {guid} under {parent_guid}: would create a cycle"
                );
            }
            None => {
                warn!("[Scenehost API] Could not find new parent {parent_guid} for node {guid}");
            }
        }
    }

    if let Some(def) = &req.transform {
        if let Ok((_, _, _, _, _, mut transform)) = nodes.get_mut(entity) {
            apply_transform_def(def, &mut transform);
        }
    }

    if let Some(anim) = &req.animation {
        if let Ok(mut renderer) = animated.get_mut(entity) {
            if let Some(clip) = &anim.name {
                renderer.play(clip.clone(), true);
            }
            if let Some(speed) = anim.speed {
                renderer.speed = speed;
            }
        }
    }
    Ok(())
}

/// True if `target` is `from` itself or one of its ancestors.
fn reachable_from(nodes: &NodeQuery<'_, '_>, from: Entity, target: Entity) -> bool {
    let mut current = Some(from);
    while let Some(entity) = current {
        if entity == target {
            return true;
        }
        current = nodes
            .get(entity)
            .ok()
            .and_then(|(_, _, _, parent, _, _)| parent.map(|p| p.get()));
    }
    false
}

pub(super) fn make_mover(
    req: &NodeMoveRequest,
    start: Vec3,
    terrain: &Terrain,
) -> Result<Mover, String> {
    let position = req
        .position
        .ok_or_else(|| "position not specified".to_string())?;
    let pace = match (req.time, req.speed) {
        (Some(time), _) if time <= 0.0 => return Err("time must be positive".to_string()),
        (_, Some(speed)) if speed <= 0.0 => return Err("speed must be positive".to_string()),
        (Some(time), _) => Pace::Duration(time),
        (None, Some(speed)) => Pace::Speed(speed),
        (None, None) => Pace::Duration(DEFAULT_MOVE_DURATION),
    };
    if req.followheight && terrain.height_field.is_none() {
        return Err("no terrain loaded".to_string());
    }
    Ok(Mover {
        target: Vec3::from_array(position),
        start,
        elapsed: 0.0,
        pace,
        interpolate: Interpolate::parse(req.interpolate.as_deref()),
        rotate: RotateMode::parse(req.rotate.as_deref()),
        follow_height: req.followheight,
    })
}

pub(super) fn build_terrain_layer(req: &TerrainLayerRequest) -> Result<TerrainLayer, String> {
    let diffuse = req
        .diffuse
        .clone()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| "diffuse not specified".to_string())?;
    let normal = req
        .normal
        .clone()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| "normal not specified".to_string())?;
    let min_height = req
        .min_height
        .ok_or_else(|| "minHeight not specified".to_string())?;
    let max_height = req
        .max_height
        .ok_or_else(|| "maxHeight not specified".to_string())?;
    let fade_dist = req
        .fade_dist
        .ok_or_else(|| "fadeDist not specified".to_string())?;
    if min_height >= max_height {
        return Err("minHeight must be below maxHeight".to_string());
    }
    Ok(TerrainLayer {
        diffuse,
        normal,
        min_height,
        max_height,
        fade_dist,
    })
}

pub(super) fn build_node_info(
    entity: Entity,
    nodes: &NodeQuery<'_, '_>,
    animated: &Query<'_, '_, &'static mut AnimatedModelRenderer>,
    terrain_renderers: &Query<'_, '_, &'static mut TerrainRenderer>,
    movers: &Query<'_, '_, &'static Mover>,
    extras: &Query<'_, '_, ExtrasQuery>,
) -> Option<NodeInfo> {
    let (_, node_id, node_name, parent, children, transform) = nodes.get(entity).ok()?;
    let parent_id = parent.and_then(|p| nodes.get(p.get()).ok().map(|(_, pid, ..)| pid.0.clone()));
    let children_ids: Vec<String> = children
        .map(|children| {
            children
                .iter()
                .filter_map(|child| nodes.get(*child).ok().map(|(_, cid, ..)| cid.0.clone()))
                .collect()
        })
        .unwrap_or_default();

    let mut component_names = Vec::new();
    let mut animation = None;
    if let Ok((model, water, panel)) = extras.get(entity) {
        if model.is_some() {
            component_names.push("model".to_string());
        }
        if water.is_some() {
            component_names.push("water".to_string());
        }
        if panel.is_some() {
            component_names.push("panel".to_string());
        }
    }
    if let Ok(renderer) = animated.get(entity) {
        component_names.push("animated_model".to_string());
        animation = renderer.clip.clone();
    }
    let terrain_layers = terrain_renderers.get(entity).ok().map(|r| r.layers.len());
    if terrain_layers.is_some() {
        component_names.push("terrain".to_string());
    }

    let (rx, ry, rz) = transform.rotation.to_euler(EulerRot::XYZ);
    Some(NodeInfo {
        id: node_id.0.clone(),
        name: node_name.0.clone(),
        parent: parent_id,
        position: transform.translation.to_array(),
        rotation: [rx.to_degrees(), ry.to_degrees(), rz.to_degrees()],
        scale: transform.scale.to_array(),
        components: component_names,
        children: children_ids,
        moving: movers.get(entity).is_ok(),
        animation,
        terrain_layers,
    })
}
