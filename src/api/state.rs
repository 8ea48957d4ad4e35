use super::*;

/// Shared handle given to every route handler. The scene itself lives on the
/// bevy side; handlers only get to talk to it through the command channel.
#[derive(Clone)]
pub(super) struct AppState {
    pub(super) sender: Sender<ApiCommand>,
}
