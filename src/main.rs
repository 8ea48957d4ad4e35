mod animation;
mod api;
mod components;
mod events;
mod mover;
mod terrain;

use std::time::Duration;

use bevy::app::ScheduleRunnerPlugin;
use bevy::prelude::*;

fn main() {
    let mut app = App::new();

    // Headless scene host: ECS + API, no window, no renderer. An external
    // client renders whatever component data it reads back over the API.
    app.add_plugins(
        MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(
            1.0 / 60.0,
        ))),
    )
    .add_plugins(bevy::log::LogPlugin::default())
    .add_plugins(bevy::transform::TransformPlugin)
    .add_plugins(bevy::hierarchy::HierarchyPlugin)
    .insert_resource(terrain::Terrain::default())
    .add_plugins(events::SceneEventsPlugin)
    .add_plugins(animation::AnimationPlugin)
    .add_plugins(mover::MoverPlugin)
    .add_plugins(api::ApiPlugin);

    info!("[Scenehost] Starting headless scene host");
    app.run();
}
