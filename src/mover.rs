use bevy::prelude::*;

use crate::components::NodeId;
use crate::events::SceneEventBus;
use crate::terrain::Terrain;

/// Distance under which a speed-paced mover counts as arrived.
const ARRIVE_EPSILON: f32 = 1e-3;

/// Duration used when a move request specifies neither speed nor time.
pub const DEFAULT_MOVE_DURATION: f32 = 1.0;

pub struct MoverPlugin;

impl Plugin for MoverPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, tick_movers);
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Pace {
    /// Finish in a fixed number of seconds.
    Duration(f32),
    /// Travel at a fixed number of world units per second.
    Speed(f32),
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Interpolate {
    #[default]
    Linear,
    Exponential,
}

impl Interpolate {
    /// Anything but "exponential" falls back to linear.
    pub fn parse(s: Option<&str>) -> Self {
        match s {
            Some("exponential") => Self::Exponential,
            _ => Self::Linear,
        }
    }

    /// Progress curve for duration-paced moves, 0 at t=0 and exactly 1 at t=1.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::Exponential => {
                if t >= 1.0 {
                    1.0
                } else {
                    (1.0 - (2.0f32).powf(-10.0 * t)) / (1.0 - (2.0f32).powi(-10))
                }
            }
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum RotateMode {
    #[default]
    None,
    /// Yaw toward the direction of travel, keeping the node upright.
    Xz,
    /// Fully orient along the direction of travel.
    Xyz,
}

impl RotateMode {
    pub fn parse(s: Option<&str>) -> Self {
        match s {
            Some("XZ") => Self::Xz,
            Some("XYZ") => Self::Xyz,
            _ => Self::None,
        }
    }
}

/// Transient move task: interpolates the node's position toward `target`,
/// then removes itself and emits a `move_complete` event. One per node at
/// most; inserting a new one replaces the running move.
#[derive(Component, Clone, Debug)]
pub struct Mover {
    pub target: Vec3,
    pub start: Vec3,
    pub elapsed: f32,
    pub pace: Pace,
    pub interpolate: Interpolate,
    pub rotate: RotateMode,
    pub follow_height: bool,
}

pub(crate) fn tick_movers(
    mut commands: Commands,
    time: Res<Time>,
    terrain: Res<Terrain>,
    mut event_bus: ResMut<SceneEventBus>,
    mut query: Query<(Entity, &NodeId, &mut Transform, &mut Mover)>,
) {
    let dt = time.delta_secs();
    for (entity, node_id, mut transform, mut mover) in query.iter_mut() {
        mover.elapsed += dt;
        let current = transform.translation;

        let (mut next, arrived) = match mover.pace {
            Pace::Duration(total) => {
                let t = (mover.elapsed / total.max(f32::EPSILON)).clamp(0.0, 1.0);
                let eased = mover.interpolate.apply(t);
                (mover.start.lerp(mover.target, eased), t >= 1.0)
            }
            Pace::Speed(speed) => match mover.interpolate {
                Interpolate::Linear => {
                    let delta = mover.target - current;
                    let dist = delta.length();
                    let step = speed * dt;
                    if step >= dist {
                        (mover.target, true)
                    } else {
                        (current + delta / dist * step, false)
                    }
                }
                Interpolate::Exponential => {
                    // proportional approach, frame-rate independent
                    let fraction = 1.0 - (-speed * dt).exp();
                    let next = current + (mover.target - current) * fraction;
                    let arrived = next.distance(mover.target) < ARRIVE_EPSILON;
                    (next, arrived)
                }
            },
        };

        if arrived {
            next = mover.target;
        }
        if mover.follow_height {
            if let Some(height) = terrain.height_at(next.x, next.z) {
                next.y = height;
            }
        }

        let travel = next - current;
        match mover.rotate {
            RotateMode::None => {}
            RotateMode::Xz => {
                let flat = Vec3::new(travel.x, 0.0, travel.z);
                if flat.length_squared() > 1e-8 {
                    transform.look_to(flat, Vec3::Y);
                }
            }
            RotateMode::Xyz => {
                if travel.length_squared() > 1e-8 {
                    transform.look_to(travel, Vec3::Y);
                }
            }
        }

        transform.translation = next;

        if arrived {
            commands.entity(entity).remove::<Mover>();
            event_bus.emit(
                "move_complete",
                serde_json::json!({
                    "id": node_id.0,
                    "position": [next.x, next.y, next.z],
                }),
                Some(node_id.0.clone()),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_modes_fall_back_like_the_wire_protocol() {
        assert_eq!(Interpolate::parse(Some("exponential")), Interpolate::Exponential);
        assert_eq!(Interpolate::parse(Some("linear")), Interpolate::Linear);
        assert_eq!(Interpolate::parse(Some("wobbly")), Interpolate::Linear);
        assert_eq!(Interpolate::parse(None), Interpolate::Linear);

        assert_eq!(RotateMode::parse(Some("XZ")), RotateMode::Xz);
        assert_eq!(RotateMode::parse(Some("XYZ")), RotateMode::Xyz);
        assert_eq!(RotateMode::parse(Some("xz")), RotateMode::None);
        assert_eq!(RotateMode::parse(None), RotateMode::None);
    }

    #[test]
    fn easing_hits_both_endpoints() {
        for interpolate in [Interpolate::Linear, Interpolate::Exponential] {
            assert!((interpolate.apply(0.0)).abs() < 1e-6);
            assert!((interpolate.apply(1.0) - 1.0).abs() < 1e-6);
            assert!((interpolate.apply(2.0) - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn exponential_easing_front_loads_progress() {
        let mut last = 0.0;
        for i in 1..=10 {
            let t = i as f32 / 10.0;
            let eased = Interpolate::Exponential.apply(t);
            assert!(eased > last, "not monotonic at t={t}");
            last = eased;
        }
        assert!(Interpolate::Exponential.apply(0.3) > 0.3);
    }
}
