//! Outbound frame delivery and inbound command subscriptions.
//!
//! Outbound payloads always target the launch-URL origin of the receiving application. Inbound
//! window messages are accepted only from the shell's own origin or from a registered
//! application's origin, decoded as [`CommandEnvelope`]s, and handed to the single handler
//! registered for the command name.

use std::{
    cell::RefCell,
    collections::HashMap,
    fmt,
    rc::{Rc, Weak},
};

use desktop_app_contract::CommandEnvelope;
use platform_host::{FrameDelivery, FrameTransport, InboundFrameMessage};
use serde_json::Value;

use crate::{
    model::{AppKey, DesktopState},
    registry::ApplicationRegistry,
};

#[derive(Debug, Clone, PartialEq, Eq)]
/// Why a payload could not be handed to a frame.
pub enum NotDeliverable {
    /// The key is not in the catalog.
    UnknownApplication,
    /// No process is running for the key.
    NotRunning,
    /// The frame has not signalled readiness yet.
    FrameNotReady,
    /// The frame element is not in the document.
    FrameMissing,
    /// The transport rejected the post.
    Transport(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Result of [`MessageRouter::send`].
pub enum Delivery {
    Delivered,
    NotDeliverable(NotDeliverable),
}

#[derive(Debug, Clone, PartialEq)]
/// Decoded inbound command passed to handlers.
pub struct InboundCommand {
    /// Sender origin as reported by the browser.
    pub origin: String,
    pub envelope: CommandEnvelope,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// What [`MessageRouter::dispatch_inbound`] did with a window message.
pub enum InboundOutcome {
    /// A handler ran.
    Handled,
    /// The sender origin is neither the shell nor a registered application.
    RejectedOrigin(String),
    /// The body is not a command envelope.
    Ignored,
    /// No handler is registered for the command.
    Unhandled(String),
}

type CommandHandler = Rc<dyn Fn(&InboundCommand)>;

struct CommandSlot {
    token: u64,
    handler: CommandHandler,
}

#[derive(Default)]
struct CommandTable {
    next_token: u64,
    slots: HashMap<String, CommandSlot>,
}

#[derive(Clone, Default)]
/// Command name to handler table. Registering a name again replaces the previous handler.
pub struct CommandRegistry {
    inner: Rc<RefCell<CommandTable>>,
}

impl CommandRegistry {
    /// Registers `handler` for `command`, replacing any existing handler.
    pub fn on(
        &self,
        command: impl Into<String>,
        handler: impl Fn(&InboundCommand) + 'static,
    ) -> Subscription {
        let command = command.into();
        let mut table = self.inner.borrow_mut();
        table.next_token += 1;
        let token = table.next_token;
        table.slots.insert(
            command.clone(),
            CommandSlot {
                token,
                handler: Rc::new(handler),
            },
        );
        Subscription {
            table: Rc::downgrade(&self.inner),
            command,
            token,
            released: false,
        }
    }

    pub fn is_registered(&self, command: &str) -> bool {
        self.inner.borrow().slots.contains_key(command)
    }

    fn handler_for(&self, command: &str) -> Option<CommandHandler> {
        self.inner
            .borrow()
            .slots
            .get(command)
            .map(|slot| Rc::clone(&slot.handler))
    }
}

impl fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let table = self.inner.borrow();
        let mut commands: Vec<_> = table.slots.keys().collect();
        commands.sort();
        f.debug_struct("CommandRegistry")
            .field("commands", &commands)
            .finish()
    }
}

#[must_use = "dropping a subscription unregisters its handler"]
/// Registration handle returned by [`CommandRegistry::on`].
///
/// Dropping the handle (or calling [`Subscription::unsubscribe`]) removes the handler, unless it
/// was already replaced by a newer registration for the same command.
pub struct Subscription {
    table: Weak<RefCell<CommandTable>>,
    command: String,
    token: u64,
    released: bool,
}

impl Subscription {
    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn unsubscribe(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if std::mem::replace(&mut self.released, true) {
            return;
        }
        let Some(table) = self.table.upgrade() else {
            return;
        };
        let mut table = table.borrow_mut();
        if table
            .slots
            .get(&self.command)
            .is_some_and(|slot| slot.token == self.token)
        {
            table.slots.remove(&self.command);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("command", &self.command)
            .field("released", &self.released)
            .finish()
    }
}

#[derive(Clone)]
/// Routes payloads to hosted frames and inbound commands to their handlers.
pub struct MessageRouter {
    transport: Rc<dyn FrameTransport>,
    commands: CommandRegistry,
}

impl MessageRouter {
    pub fn new(transport: Rc<dyn FrameTransport>) -> Self {
        Self {
            transport,
            commands: CommandRegistry::default(),
        }
    }

    pub fn transport(&self) -> Rc<dyn FrameTransport> {
        Rc::clone(&self.transport)
    }

    /// Posts `payload` to the frame of the running process for `app_key`.
    ///
    /// The target origin is the application's launch origin; a frame that navigated elsewhere
    /// never sees the payload.
    pub fn send(&self, state: &DesktopState, app_key: &AppKey, payload: &Value) -> Delivery {
        let Some(app) = state.registry.find(app_key) else {
            return Delivery::NotDeliverable(NotDeliverable::UnknownApplication);
        };
        let Some(process) = state.process_for_app(app_key) else {
            return Delivery::NotDeliverable(NotDeliverable::NotRunning);
        };
        if !process.frame_ready {
            return Delivery::NotDeliverable(NotDeliverable::FrameNotReady);
        }

        match self
            .transport
            .post_to_frame(&process.frame_dom_id(), payload, &app.origin())
        {
            Ok(FrameDelivery::Delivered) => Delivery::Delivered,
            Ok(FrameDelivery::FrameMissing) => {
                Delivery::NotDeliverable(NotDeliverable::FrameMissing)
            }
            Err(err) => Delivery::NotDeliverable(NotDeliverable::Transport(err)),
        }
    }

    /// Registers the handler for an inbound command name. See [`CommandRegistry::on`].
    pub fn on(
        &self,
        command: impl Into<String>,
        handler: impl Fn(&InboundCommand) + 'static,
    ) -> Subscription {
        self.commands.on(command, handler)
    }

    pub fn commands(&self) -> &CommandRegistry {
        &self.commands
    }

    /// Filters and dispatches one inbound window message.
    pub fn dispatch_inbound(
        &self,
        registry: &ApplicationRegistry,
        shell_origin: &str,
        message: InboundFrameMessage,
    ) -> InboundOutcome {
        if message.origin != shell_origin && registry.find_by_origin(&message.origin).is_none() {
            return InboundOutcome::RejectedOrigin(message.origin);
        }
        let Some(envelope) = CommandEnvelope::from_message(&message.body) else {
            return InboundOutcome::Ignored;
        };
        // Clone the handler out so it may (un)register commands while running.
        let Some(handler) = self.commands.handler_for(&envelope.command) else {
            return InboundOutcome::Unhandled(envelope.command);
        };
        handler(&InboundCommand {
            origin: message.origin,
            envelope,
        });
        InboundOutcome::Handled
    }
}

impl fmt::Debug for MessageRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MessageRouter")
            .field("commands", &self.commands)
            .finish_non_exhaustive()
    }
}

/// Whether `origin` is the launch origin of `app_key`.
pub fn sender_owns_app(registry: &ApplicationRegistry, app_key: &AppKey, origin: &str) -> bool {
    registry
        .find(app_key)
        .is_some_and(|app| app.origin() == origin)
}

#[cfg(test)]
mod tests {
    use platform_host::{InstalledAppRecord, RecordingFrameTransport, SessionSnapshot};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::{
        model::LaunchRequest,
        reducer::{reduce_desktop, DesktopAction},
        window_manager,
    };

    const SHELL_ORIGIN: &str = "https://cloud.example";

    fn state() -> DesktopState {
        let (registry, _) = ApplicationRegistry::from_records(vec![
            InstalledAppRecord::iframe("system-terminal", "Terminal", "https://terminal.example/app"),
            InstalledAppRecord::iframe("system-db", "Database", "https://db.example"),
        ]);
        let mut state = DesktopState::default();
        reduce_desktop(&mut state, DesktopAction::HydrateRegistry { registry }).expect("hydrate");
        reduce_desktop(
            &mut state,
            DesktopAction::SetSession(SessionSnapshot::signed_in("ada")),
        )
        .expect("session");
        state
    }

    fn router() -> (MessageRouter, RecordingFrameTransport) {
        let frames = RecordingFrameTransport::default();
        (MessageRouter::new(Rc::new(frames.clone())), frames)
    }

    #[test]
    fn send_targets_the_launch_origin_only() {
        let mut state = state();
        let (router, frames) = router();
        let key = AppKey::new("system-terminal");
        let payload = json!({ "cmd": "ls" });

        assert_eq!(
            router.send(&state, &key, &payload),
            Delivery::NotDeliverable(NotDeliverable::NotRunning)
        );

        window_manager::launch_or_focus(&mut state, &LaunchRequest::new(key.clone()))
            .expect("launch");
        assert_eq!(
            router.send(&state, &key, &payload),
            Delivery::NotDeliverable(NotDeliverable::FrameNotReady)
        );

        window_manager::mark_frame_ready(&mut state, &key);
        assert_eq!(
            router.send(&state, &key, &payload),
            Delivery::NotDeliverable(NotDeliverable::FrameMissing)
        );

        frames.mount(key.frame_dom_id());
        assert_eq!(router.send(&state, &key, &payload), Delivery::Delivered);

        let posted = frames.posted();
        assert_eq!(posted.len(), 1);
        assert_eq!(posted[0].frame_dom_id, "app-window-system-terminal");
        assert_eq!(posted[0].target_origin, "https://terminal.example");
        assert!(posted.iter().all(|m| m.target_origin != "*"));
    }

    #[test]
    fn unknown_application_is_not_deliverable() {
        let state = state();
        let (router, frames) = router();
        assert_eq!(
            router.send(&state, &AppKey::new("system-missing"), &json!(1)),
            Delivery::NotDeliverable(NotDeliverable::UnknownApplication)
        );
        assert!(frames.posted().is_empty());
    }

    #[test]
    fn inbound_messages_are_filtered_by_origin() {
        let state = state();
        let (router, _) = router();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let _sub = router.on("openDesktopApp", move |command| {
            sink.borrow_mut().push(command.origin.clone());
        });
        let body = json!({ "command": "openDesktopApp", "data": { "appKey": "system-db" } });

        let inbound = |origin: &str, body: Value| {
            router.dispatch_inbound(
                &state.registry,
                SHELL_ORIGIN,
                InboundFrameMessage {
                    origin: origin.to_string(),
                    body,
                },
            )
        };

        assert_eq!(
            inbound("https://evil.example", body.clone()),
            InboundOutcome::RejectedOrigin("https://evil.example".to_string())
        );
        assert_eq!(inbound("https://db.example", body.clone()), InboundOutcome::Handled);
        assert_eq!(inbound(SHELL_ORIGIN, body), InboundOutcome::Handled);
        assert_eq!(
            inbound("https://db.example", json!("webpackHotUpdate")),
            InboundOutcome::Ignored
        );
        assert_eq!(
            inbound("https://db.example", json!({ "command": "resize" })),
            InboundOutcome::Unhandled("resize".to_string())
        );
        assert_eq!(
            *seen.borrow(),
            vec!["https://db.example".to_string(), SHELL_ORIGIN.to_string()]
        );
    }

    #[test]
    fn registering_again_replaces_and_stale_handle_does_not_unregister() {
        let (router, _) = router();
        let calls = Rc::new(RefCell::new(Vec::new()));

        let first_sink = Rc::clone(&calls);
        let first = router.on("openDesktopApp", move |_| first_sink.borrow_mut().push("first"));
        let second_sink = Rc::clone(&calls);
        let second = router.on("openDesktopApp", move |_| second_sink.borrow_mut().push("second"));

        drop(first);
        assert!(router.commands().is_registered("openDesktopApp"));

        let registry = ApplicationRegistry::default();
        let message = InboundFrameMessage {
            origin: SHELL_ORIGIN.to_string(),
            body: json!({ "command": "openDesktopApp", "data": {} }),
        };
        router.dispatch_inbound(&registry, SHELL_ORIGIN, message.clone());
        assert_eq!(*calls.borrow(), vec!["second"]);

        second.unsubscribe();
        assert!(!router.commands().is_registered("openDesktopApp"));
        assert_eq!(
            router.dispatch_inbound(&registry, SHELL_ORIGIN, message),
            InboundOutcome::Unhandled("openDesktopApp".to_string())
        );
    }

    #[test]
    fn handler_may_unregister_itself_while_running() {
        let (router, _) = router();
        let slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let inner = Rc::clone(&slot);
        *slot.borrow_mut() = Some(router.on("frameReady", move |_| {
            inner.borrow_mut().take();
        }));

        let outcome = router.dispatch_inbound(
            &ApplicationRegistry::default(),
            SHELL_ORIGIN,
            InboundFrameMessage {
                origin: SHELL_ORIGIN.to_string(),
                body: json!({ "command": "frameReady" }),
            },
        );
        assert_eq!(outcome, InboundOutcome::Handled);
        assert!(!router.commands().is_registered("frameReady"));
    }

    #[test]
    fn sender_must_own_the_app_it_names() {
        let state = state();
        let key = AppKey::new("system-db");
        assert!(sender_owns_app(&state.registry, &key, "https://db.example"));
        assert!(!sender_owns_app(&state.registry, &key, "https://terminal.example"));
        assert!(!sender_owns_app(
            &state.registry,
            &AppKey::new("system-missing"),
            "https://db.example"
        ));
    }
}
