//! Translation of inbound frame commands into reducer actions.

use desktop_app_contract::{
    FrameReadyNotice, OpenDesktopAppRequest, FRAME_READY_COMMAND, OPEN_DESKTOP_APP_COMMAND,
};

use crate::{
    message_router::{sender_owns_app, InboundCommand},
    model::{AppKey, LaunchRequest, LaunchTrigger},
    reducer::DesktopAction,
    registry::ApplicationRegistry,
};

/// Commands the shell registers handlers for.
pub const SHELL_COMMANDS: [&str; 2] = [OPEN_DESKTOP_APP_COMMAND, FRAME_READY_COMMAND];

/// Maps a shell command to the action it requests.
///
/// # Errors
///
/// Returns a message when the payload does not decode, when a frame reports readiness for an app
/// it does not host, or when the command is not a shell command.
pub fn action_for_command(
    registry: &ApplicationRegistry,
    command: &InboundCommand,
) -> Result<DesktopAction, String> {
    match command.envelope.command.as_str() {
        OPEN_DESKTOP_APP_COMMAND => {
            let request: OpenDesktopAppRequest = command.envelope.decode()?;
            Ok(DesktopAction::Launch(LaunchRequest::from(
                LaunchTrigger::InboundCommand { request },
            )))
        }
        FRAME_READY_COMMAND => {
            let notice: FrameReadyNotice = command.envelope.decode()?;
            let app_key = AppKey::new(notice.app_key);
            if !sender_owns_app(registry, &app_key, &command.origin) {
                return Err(format!(
                    "`{}` reported readiness for `{app_key}`",
                    command.origin
                ));
            }
            Ok(DesktopAction::FrameReady { app_key })
        }
        other => Err(format!("`{other}` is not a shell command")),
    }
}
