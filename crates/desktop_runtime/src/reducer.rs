//! Reducer actions, side-effect intents, and transition logic for the desktop runtime.

use platform_host::{HostAlert, SessionSnapshot};
use thiserror::Error;

use crate::{
    model::{
        AppKey, CatalogStatus, DeliveryAttempt, DesktopState, LaunchRequest, OutboundMessage,
        PendingMessage, Pid, ShellAlert,
    },
    registry::ApplicationRegistry,
    window_manager::{self, LaunchOutcome},
};

#[derive(Debug, Clone, PartialEq)]
/// Actions accepted by [`reduce_desktop`] to mutate [`DesktopState`].
pub enum DesktopAction {
    /// Replace the catalog with a freshly loaded registry.
    HydrateRegistry {
        /// Validated catalog.
        registry: ApplicationRegistry,
    },
    /// The inventory collaborator failed; the catalog becomes empty.
    RegistryLoadFailed {
        /// Failure reported by the inventory service.
        error: String,
    },
    /// Ask the host to reload the inventory.
    RefreshRegistry,
    /// Launch an application or focus its running instance.
    Launch(LaunchRequest),
    /// Raise a running process to the foreground.
    RaiseProcess {
        /// Process to raise.
        pid: Pid,
    },
    /// Terminate a running process.
    TerminateProcess {
        /// Process to terminate.
        pid: Pid,
    },
    /// The frame of `app_key` can now receive messages.
    FrameReady {
        /// Application whose frame signalled readiness.
        app_key: AppKey,
    },
    /// A first delivery attempt failed; keep the payload until the frame is ready.
    QueuePendingMessage {
        /// Message that could not be delivered.
        message: OutboundMessage,
        /// Enqueue timestamp.
        queued_at_ms: u64,
    },
    /// Drop pending messages older than `ttl_ms`.
    ExpirePendingMessages {
        /// Current time.
        now_ms: u64,
        /// Maximum age of a pending message.
        ttl_ms: u64,
    },
    /// Replace the session snapshot reported by the session collaborator.
    SetSession(SessionSnapshot),
    /// End the session from the shell.
    SignOut,
    /// Change the interface language.
    SetLanguage {
        /// Language tag (`en`, `zh`, ...).
        language: String,
    },
    /// Collapse or expand the launcher sidebar.
    ToggleSidebar,
    /// Show an in-page alert until it is dismissed.
    ShowAlert(HostAlert),
    /// Remove a visible alert.
    DismissAlert {
        /// Alert id assigned by [`DesktopAction::ShowAlert`].
        id: u64,
    },
}

#[derive(Debug, Clone, PartialEq)]
/// Side-effect intents emitted by [`reduce_desktop`] for the shell runtime to execute.
pub enum RuntimeEffect {
    /// Load the installed-application inventory.
    LoadRegistry,
    /// Post a payload to a running process's frame.
    SendFrameMessage(OutboundMessage),
    /// Move input focus into the foreground frame.
    FocusFrame(Pid),
    /// Tell the session collaborator to sign out.
    EndSession,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Reducer errors for invalid actions. None of them change state.
pub enum ReducerError {
    /// The requested key is not in the catalog.
    #[error("unknown application `{0}`")]
    UnknownApplication(AppKey),
    /// The pid is not (or no longer) running.
    #[error("unknown process {0}")]
    UnknownProcess(Pid),
    /// Launches are rejected while signed out.
    #[error("no active session")]
    SessionInactive,
}

/// Applies a [`DesktopAction`] to the desktop runtime state and collects resulting side effects.
///
/// # Errors
///
/// Returns a [`ReducerError`] when the action references an unknown application or process, or
/// when a launch is attempted without an active session. State is unchanged in that case.
pub fn reduce_desktop(
    state: &mut DesktopState,
    action: DesktopAction,
) -> Result<Vec<RuntimeEffect>, ReducerError> {
    let mut effects = Vec::new();
    match action {
        DesktopAction::HydrateRegistry { registry } => {
            state.registry = registry;
            state.catalog = CatalogStatus::Ready;
            replace_catalog_followup(state, &mut effects);
        }
        DesktopAction::RegistryLoadFailed { error } => {
            state.registry = ApplicationRegistry::default();
            state.catalog = CatalogStatus::Unavailable(error);
            replace_catalog_followup(state, &mut effects);
        }
        DesktopAction::RefreshRegistry => {
            state.catalog = CatalogStatus::Loading;
            effects.push(RuntimeEffect::LoadRegistry);
        }
        DesktopAction::Launch(request) => {
            launch(state, request, &mut effects)?;
        }
        DesktopAction::RaiseProcess { pid } => {
            window_manager::raise_process(state, pid)?;
            effects.push(RuntimeEffect::FocusFrame(pid));
        }
        DesktopAction::TerminateProcess { pid } => {
            window_manager::terminate_process(state, pid)?;
            if let Some(foreground) = state.foreground_pid() {
                effects.push(RuntimeEffect::FocusFrame(foreground));
            }
        }
        DesktopAction::FrameReady { app_key } => {
            if let Some(pid) = window_manager::mark_frame_ready(state, &app_key) {
                effects.extend(drain_pending(state, pid));
            }
        }
        DesktopAction::QueuePendingMessage {
            message,
            queued_at_ms,
        } => {
            if let Some(effect) = queue_pending(state, message, queued_at_ms) {
                effects.push(effect);
            }
        }
        DesktopAction::ExpirePendingMessages { now_ms, ttl_ms } => {
            state
                .pending
                .retain(|message| now_ms.saturating_sub(message.queued_at_ms) <= ttl_ms);
        }
        DesktopAction::SetSession(session) => {
            if !session.signed_in {
                window_manager::terminate_all(state);
            }
            state.session = session;
        }
        DesktopAction::SignOut => {
            window_manager::terminate_all(state);
            state.session = SessionSnapshot::default();
            effects.push(RuntimeEffect::EndSession);
        }
        DesktopAction::SetLanguage { language } => {
            let language = language.trim();
            if !language.is_empty() {
                state.language = language.to_string();
            }
        }
        DesktopAction::ToggleSidebar => {
            state.sidebar_open = !state.sidebar_open;
        }
        DesktopAction::ShowAlert(alert) => {
            let id = state.next_alert_id;
            state.next_alert_id = state.next_alert_id.saturating_add(1);
            state.alerts.push(ShellAlert { id, alert });
        }
        DesktopAction::DismissAlert { id } => {
            state.alerts.retain(|alert| alert.id != id);
        }
    }
    Ok(effects)
}

/// Runs the launch path and reports the resulting pid.
///
/// Used by callers that need the pid back (the runtime context) as well as by [`reduce_desktop`].
///
/// # Errors
///
/// See [`reduce_desktop`].
pub fn launch(
    state: &mut DesktopState,
    request: LaunchRequest,
    effects: &mut Vec<RuntimeEffect>,
) -> Result<Pid, ReducerError> {
    if !state.session.signed_in {
        return Err(ReducerError::SessionInactive);
    }
    let LaunchOutcome { pid, .. } = window_manager::launch_or_focus(state, &request)?;
    effects.push(RuntimeEffect::FocusFrame(pid));
    if let Some(payload) = request.message {
        effects.push(RuntimeEffect::SendFrameMessage(OutboundMessage {
            pid,
            app_key: request.app_key,
            payload,
            attempt: DeliveryAttempt::Initial,
        }));
    }
    Ok(pid)
}

/// Drops processes left without an application and refocuses the new foreground.
fn replace_catalog_followup(state: &mut DesktopState, effects: &mut Vec<RuntimeEffect>) {
    let terminated = window_manager::terminate_unregistered(state);
    if terminated.is_empty() {
        return;
    }
    if let Some(foreground) = state.foreground_pid() {
        effects.push(RuntimeEffect::FocusFrame(foreground));
    }
}

fn queue_pending(
    state: &mut DesktopState,
    message: OutboundMessage,
    queued_at_ms: u64,
) -> Option<RuntimeEffect> {
    if message.attempt != DeliveryAttempt::Initial {
        return None;
    }
    // The process may have been terminated (or replaced) while the first attempt was in flight.
    let process = state
        .process(message.pid)
        .filter(|p| p.app_key == message.app_key)?;
    if process.frame_ready {
        return Some(RuntimeEffect::SendFrameMessage(OutboundMessage {
            attempt: DeliveryAttempt::AfterReady,
            ..message
        }));
    }
    let target_origin = state.registry.find(&message.app_key)?.origin();
    state.pending.push(PendingMessage {
        pid: message.pid,
        app_key: message.app_key,
        payload: message.payload,
        target_origin,
        queued_at_ms,
    });
    None
}

fn drain_pending(state: &mut DesktopState, pid: Pid) -> Vec<RuntimeEffect> {
    let (ready, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut state.pending)
        .into_iter()
        .partition(|message| message.pid == pid);
    state.pending = waiting;
    ready
        .into_iter()
        .map(|message| {
            RuntimeEffect::SendFrameMessage(OutboundMessage {
                pid: message.pid,
                app_key: message.app_key,
                payload: message.payload,
                attempt: DeliveryAttempt::AfterReady,
            })
        })
        .collect()
}
