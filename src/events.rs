use std::collections::VecDeque;

use bevy::prelude::*;
use serde::Serialize;

const MAX_EVENTS: usize = 500;

#[derive(Serialize, Clone)]
pub struct SceneEvent {
    pub name: String,
    pub data: serde_json::Value,
    pub frame: u64,
    pub node: Option<String>,
}

/// Bounded ring of recent scene mutations, drained read-only over the API.
#[derive(Resource, Default)]
pub struct SceneEventBus {
    pub recent: VecDeque<SceneEvent>,
    pub frame: u64,
    pub dropped_events: u64,
    last_overflow_log_frame: u64,
}

impl SceneEventBus {
    pub fn emit(&mut self, name: impl Into<String>, data: serde_json::Value, node: Option<String>) {
        self.recent.push_back(SceneEvent {
            name: name.into(),
            data,
            frame: self.frame,
            node,
        });
        if self.recent.len() > MAX_EVENTS {
            let excess = self.recent.len() - MAX_EVENTS;
            for _ in 0..excess {
                self.recent.pop_front();
            }
            self.dropped_events = self.dropped_events.saturating_add(excess as u64);
            if self.frame.saturating_sub(self.last_overflow_log_frame) >= 60 {
                self.last_overflow_log_frame = self.frame;
                warn!(
                    "[Scenehost events] Dropped {} buffered events (total dropped: {})",
                    excess, self.dropped_events
                );
            }
        }
    }
}

pub struct SceneEventsPlugin;

impl Plugin for SceneEventsPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(SceneEventBus::default())
            .add_systems(Update, tick_event_frame);
    }
}

fn tick_event_frame(mut bus: ResMut<SceneEventBus>) {
    bus.frame = bus.frame.saturating_add(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_bus_drops_oldest_beyond_capacity() {
        let mut bus = SceneEventBus::default();
        for i in 0..(MAX_EVENTS + 30) {
            bus.emit("node_added", serde_json::json!({ "i": i }), None);
        }
        assert_eq!(bus.recent.len(), MAX_EVENTS);
        assert_eq!(bus.dropped_events, 30);
        // oldest entries are the dropped ones
        assert_eq!(bus.recent.front().map(|e| e.data["i"].as_u64()), Some(Some(30)));
    }
}
