mod node_helpers;

use node_helpers::{
    apply_node_update, build_node_info, build_terrain_layer, make_mover, spawn_node,
};

use super::*;
use bevy::ecs::system::SystemParam;

pub(super) type NodeQuery<'w, 's> = Query<
    'w,
    's,
    (
        Entity,
        &'static NodeId,
        &'static NodeName,
        Option<&'static Parent>,
        Option<&'static Children>,
        &'static mut Transform,
    ),
>;

pub(super) type ExtrasQuery = (
    Option<&'static ModelRenderer>,
    Option<&'static WaterSurface>,
    Option<&'static PanelSurface>,
);

#[derive(SystemParam)]
pub(super) struct ApiRuntimeCtx<'w, 's> {
    channels: Res<'w, ApiChannels>,
    commands: Commands<'w, 's>,
    terrain: ResMut<'w, Terrain>,
    event_bus: ResMut<'w, SceneEventBus>,
    nodes: NodeQuery<'w, 's>,
    animated: Query<'w, 's, &'static mut AnimatedModelRenderer>,
    terrain_renderers: Query<'w, 's, &'static mut TerrainRenderer>,
    movers: Query<'w, 's, &'static Mover>,
    extras: Query<'w, 's, ExtrasQuery>,
}

/// Drains the API command queue once per frame and applies it against the
/// scene. Structural changes go through `Commands`, so they become visible
/// to queries on the following frame.
pub(super) fn process_api_commands(ctx: ApiRuntimeCtx<'_, '_>) {
    let ApiRuntimeCtx {
        channels,
        mut commands,
        mut terrain,
        mut event_bus,
        mut nodes,
        mut animated,
        mut terrain_renderers,
        movers,
        extras,
    } = ctx;

    let mut node_index = HashMap::<String, Entity>::new();
    let mut node_index_ready = false;
    macro_rules! ensure_node_index {
        () => {
            if !node_index_ready {
                node_index.clear();
                for (entity, node_id, ..) in nodes.iter() {
                    node_index.insert(node_id.0.clone(), entity);
                }
                node_index_ready = true;
            }
        };
    }

    while let Ok(cmd) = channels.receiver.try_recv() {
        match cmd {
            ApiCommand::AddNode(req, reply) => {
                ensure_node_index!();
                let result = spawn_node(&req, &node_index, &terrain, &mut commands, &mut event_bus);
                let _ = reply.send(result.map(|(added, entity)| {
                    node_index.insert(added.id.clone(), entity);
                    added
                }));
            }
            ApiCommand::UpdateNode(guid, req, reply) => {
                ensure_node_index!();
                let result = match node_index.get(&guid).copied() {
                    Some(entity) if nodes.get(entity).is_ok() => apply_node_update(
                        entity,
                        &guid,
                        &req,
                        &node_index,
                        &mut nodes,
                        &mut animated,
                        &mut commands,
                    ),
                    _ => Err("node not found".to_string()),
                };
                let _ = reply.send(result);
            }
            ApiCommand::MoveNode(guid, req, reply) => {
                ensure_node_index!();
                let result = match node_index.get(&guid).copied() {
                    None => Err("node not found".to_string()),
                    Some(entity) if req.stop => {
                        commands.entity(entity).remove::<Mover>();
                        Ok(())
                    }
                    Some(entity) => match nodes.get(entity) {
                        Ok((_, _, _, _, _, transform)) => {
                            make_mover(&req, transform.translation, &terrain).map(|mover| {
                                commands.entity(entity).insert(mover);
                            })
                        }
                        Err(_) => Err("node not found".to_string()),
                    },
                };
                let _ = reply.send(result);
            }
            ApiCommand::DeleteNode(guid, reply) => {
                ensure_node_index!();
                let result = match node_index.get(&guid).copied() {
                    Some(entity) => match nodes.get(entity) {
                        Ok((_, node_id, node_name, ..)) => {
                            event_bus.emit(
                                "node_deleted",
                                serde_json::json!({ "id": node_id.0, "name": node_name.0 }),
                                Some(node_id.0.clone()),
                            );
                            commands.entity(entity).despawn_recursive();
                            node_index.remove(&guid);
                            Ok(())
                        }
                        Err(_) => Err("node not found".to_string()),
                    },
                    None => Err("node not found".to_string()),
                };
                let _ = reply.send(result);
            }
            ApiCommand::FindNodes(name, reply) => {
                let mut infos = Vec::new();
                for (entity, _, node_name, ..) in nodes.iter() {
                    if name.as_deref().map_or(true, |n| n == node_name.0) {
                        if let Some(info) = build_node_info(
                            entity,
                            &nodes,
                            &animated,
                            &terrain_renderers,
                            &movers,
                            &extras,
                        ) {
                            infos.push(info);
                        }
                    }
                }
                let _ = reply.send(infos);
            }
            ApiCommand::GetNode(guid, reply) => {
                ensure_node_index!();
                let info = node_index.get(&guid).copied().and_then(|entity| {
                    build_node_info(
                        entity,
                        &nodes,
                        &animated,
                        &terrain_renderers,
                        &movers,
                        &extras,
                    )
                });
                let _ = reply.send(info);
            }
            ApiCommand::AddTerrainLayer(guid, req, reply) => {
                ensure_node_index!();
                let result = match node_index.get(&guid).copied() {
                    None => Err("node not found".to_string()),
                    Some(entity) => match terrain_renderers.get_mut(entity) {
                        Err(_) => Err("node has no terrain renderer".to_string()),
                        Ok(mut renderer) => {
                            build_terrain_layer(&req).map(|layer| renderer.layers.push(layer))
                        }
                    },
                };
                let _ = reply.send(result);
            }
            ApiCommand::RemoveTerrainLayer(guid, index, reply) => {
                ensure_node_index!();
                let result = match node_index.get(&guid).copied() {
                    None => Err("node not found".to_string()),
                    Some(entity) => match terrain_renderers.get_mut(entity) {
                        Err(_) => Err("node has no terrain renderer".to_string()),
                        Ok(mut renderer) => {
                            if index < renderer.layers.len() {
                                renderer.layers.remove(index);
                                Ok(())
                            } else {
                                Err("layer index out of range".to_string())
                            }
                        }
                    },
                };
                let _ = reply.send(result);
            }
            ApiCommand::SetTerrain(req, reply) => {
                let result =
                    HeightField::new(req.width, req.depth, req.spacing.unwrap_or(1.0), req.heights)
                        .map(|hf| {
                            event_bus.emit(
                                "terrain_loaded",
                                serde_json::json!({ "width": hf.width, "depth": hf.depth }),
                                None,
                            );
                            terrain.height_field = Some(hf);
                        });
                let _ = reply.send(result);
            }
            ApiCommand::GetTerrain(reply) => {
                let info = terrain.height_field.as_ref().map(|hf| TerrainInfo {
                    width: hf.width,
                    depth: hf.depth,
                    spacing: hf.spacing,
                    min_height: hf.min_height(),
                    max_height: hf.max_height(),
                });
                let _ = reply.send(info);
            }
            ApiCommand::GetEvents(reply) => {
                let _ = reply.send(event_bus.recent.iter().cloned().collect());
            }
            ApiCommand::HealthCheck(reply) => {
                let _ = reply.send(HealthInfo {
                    status: "ok".to_string(),
                    nodes: nodes.iter().count(),
                });
            }
        }
    }
}
