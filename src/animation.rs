use bevy::prelude::*;

use crate::components::AnimatedModelRenderer;

/// Advances the playback clock of every animated model. Sampling bones
/// against the clock is the external renderer's concern.
pub struct AnimationPlugin;

impl Plugin for AnimationPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, tick_animation_clocks);
    }
}

fn tick_animation_clocks(time: Res<Time>, mut query: Query<&mut AnimatedModelRenderer>) {
    let dt = time.delta_secs();
    for mut renderer in query.iter_mut() {
        if renderer.clip.is_some() {
            let advance = renderer.speed * dt;
            renderer.elapsed += advance;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn setup_app() -> App {
        let mut app = App::new();
        app.insert_resource(Time::<()>::default())
            .add_systems(Update, tick_animation_clocks);
        app
    }

    fn advance(app: &mut App, seconds: f32) {
        app.world_mut()
            .resource_mut::<Time>()
            .advance_by(Duration::from_secs_f32(seconds));
        app.update();
    }

    #[test]
    fn clock_advances_only_while_a_clip_plays() {
        let mut app = setup_app();
        let entity = app
            .world_mut()
            .spawn(AnimatedModelRenderer::new("models/guard.fbx".to_string()))
            .id();

        advance(&mut app, 1.0);
        assert_eq!(
            app.world().get::<AnimatedModelRenderer>(entity).unwrap().elapsed,
            0.0
        );

        app.world_mut()
            .get_mut::<AnimatedModelRenderer>(entity)
            .unwrap()
            .play("walk".to_string(), true);
        advance(&mut app, 0.5);
        let renderer = app.world().get::<AnimatedModelRenderer>(entity).unwrap();
        assert_eq!(renderer.clip.as_deref(), Some("walk"));
        assert!((renderer.elapsed - 0.5).abs() < 1e-5);
    }

    #[test]
    fn speed_scales_the_clock() {
        let mut app = setup_app();
        let entity = app
            .world_mut()
            .spawn(AnimatedModelRenderer::new("models/guard.fbx".to_string()))
            .id();
        {
            let mut renderer = app
                .world_mut()
                .get_mut::<AnimatedModelRenderer>(entity)
                .unwrap();
            renderer.play("run".to_string(), true);
            renderer.speed = 2.0;
        }
        advance(&mut app, 1.0);
        let renderer = app.world().get::<AnimatedModelRenderer>(entity).unwrap();
        assert!((renderer.elapsed - 2.0).abs() < 1e-5);
    }
}
