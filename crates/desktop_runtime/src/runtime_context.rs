//! Runtime provider and context wiring for the desktop shell.
//!
//! This module owns the long-lived reducer container, the runtime effect queue, host bootstrap
//! wiring, and registration of the shell's inbound command handlers. UI composition stays in
//! [`crate::components`].

use leptos::*;
use platform_host::HostServices;

use crate::{
    config::ShellConfig,
    effect_executor,
    host::DesktopHostContext,
    inbound_commands::{action_for_command, SHELL_COMMANDS},
    message_router::InboundOutcome,
    model::{DesktopState, LaunchRequest, Pid, Process},
    reducer::{self, reduce_desktop, DesktopAction, ReducerError, RuntimeEffect},
};

#[derive(Clone, Copy)]
/// Leptos context for reading desktop runtime state and dispatching [`DesktopAction`] values.
pub struct DesktopRuntimeContext {
    /// Host service bundle for executing runtime side effects.
    pub host: StoredValue<DesktopHostContext>,
    /// Reactive desktop state signal.
    pub state: RwSignal<DesktopState>,
    /// Queue of runtime effects emitted by the reducer and processed by the shell.
    pub effects: RwSignal<Vec<RuntimeEffect>>,
    /// Reducer dispatch callback.
    pub dispatch: Callback<DesktopAction>,
}

impl DesktopRuntimeContext {
    /// Dispatches a reducer action through the runtime context callback.
    pub fn dispatch_action(&self, action: DesktopAction) {
        self.dispatch.call(action);
    }

    /// Launches or focuses an application and returns its pid.
    ///
    /// # Errors
    ///
    /// Returns the reducer error; state is unchanged in that case.
    pub fn launch(&self, request: impl Into<LaunchRequest>) -> Result<Pid, ReducerError> {
        let mut desktop = self.state.get_untracked();
        let mut new_effects = Vec::new();
        let pid = reducer::launch(&mut desktop, request.into(), &mut new_effects)?;
        commit(self.state, self.effects, desktop, new_effects);
        Ok(pid)
    }

    /// Raises a running process.
    ///
    /// # Errors
    ///
    /// Returns [`ReducerError::UnknownProcess`] when `pid` is not running.
    pub fn raise(&self, pid: Pid) -> Result<(), ReducerError> {
        self.try_dispatch(DesktopAction::RaiseProcess { pid })
    }

    /// Terminates a running process.
    ///
    /// # Errors
    ///
    /// Returns [`ReducerError::UnknownProcess`] when `pid` is not running.
    pub fn terminate(&self, pid: Pid) -> Result<(), ReducerError> {
        self.try_dispatch(DesktopAction::TerminateProcess { pid })
    }

    pub fn foreground(&self) -> Option<Process> {
        self.state.with_untracked(|desktop| desktop.foreground().cloned())
    }

    fn try_dispatch(&self, action: DesktopAction) -> Result<(), ReducerError> {
        let mut desktop = self.state.get_untracked();
        let new_effects = reduce_desktop(&mut desktop, action)?;
        commit(self.state, self.effects, desktop, new_effects);
        Ok(())
    }
}

fn commit(
    state: RwSignal<DesktopState>,
    effects: RwSignal<Vec<RuntimeEffect>>,
    desktop: DesktopState,
    new_effects: Vec<RuntimeEffect>,
) {
    if state.with_untracked(|previous| *previous != desktop) {
        state.set(desktop);
    }
    if !new_effects.is_empty() {
        effects.update(|queue| queue.extend(new_effects));
    }
}

fn install_inbound_commands(runtime: DesktopRuntimeContext) {
    let host = runtime.host.get_value();
    let router = host.router().clone();

    let subscriptions: Vec<_> = SHELL_COMMANDS
        .into_iter()
        .map(|name| {
            router.on(name, move |command| {
                let action = runtime
                    .state
                    .with_untracked(|desktop| action_for_command(&desktop.registry, command));
                match action {
                    Ok(DesktopAction::Launch(request)) => {
                        if let Err(err) = runtime.launch(request) {
                            logging::warn!("openDesktopApp from {} rejected: {err}", command.origin);
                        }
                    }
                    Ok(action) => runtime.dispatch_action(action),
                    Err(err) => logging::warn!("inbound command ignored: {err}"),
                }
            })
        })
        .collect();

    let shell_origin = host.shell_origin();
    let listener = host.services().frames.listen(Box::new(move |message| {
        // Handlers write to the state signal, so dispatch against a copy of the catalog.
        let registry = runtime.state.with_untracked(|desktop| desktop.registry.clone());
        let outcome = router.dispatch_inbound(&registry, &shell_origin, message);
        if let InboundOutcome::RejectedOrigin(origin) = outcome {
            logging::warn!("ignoring message from unregistered origin {origin}");
        }
    }));

    on_cleanup(move || {
        drop(listener);
        drop(subscriptions);
    });
}

fn install_runtime_orchestration(runtime: DesktopRuntimeContext) {
    let host = runtime.host.get_value();
    install_inbound_commands(runtime);
    effect_executor::install(runtime);
    host.install_boot(runtime.dispatch);
    host.install_timers(runtime);
}

#[component]
/// Provides [`DesktopRuntimeContext`] to descendant components and boots the session.
pub fn DesktopProvider(
    /// Injected browser or stub host bundle assembled by the entry layer.
    host_services: HostServices,
    children: Children,
) -> impl IntoView {
    let config = ShellConfig::embedded();
    let state = create_rw_signal(DesktopState {
        language: config.default_language.clone(),
        ..DesktopState::default()
    });
    let host = store_value(DesktopHostContext::new(host_services, config));
    let effects = create_rw_signal(Vec::<RuntimeEffect>::new());

    let dispatch = Callback::new(move |action: DesktopAction| {
        let mut desktop = state.get_untracked();
        match reduce_desktop(&mut desktop, action) {
            Ok(new_effects) => commit(state, effects, desktop, new_effects),
            Err(err) => logging::warn!("desktop reducer error: {err}"),
        }
    });

    let runtime = DesktopRuntimeContext {
        host,
        state,
        effects,
        dispatch,
    };

    provide_context(runtime);

    install_runtime_orchestration(runtime);

    children().into_view()
}

/// Returns the current [`DesktopRuntimeContext`].
///
/// # Panics
///
/// Panics if called outside [`DesktopProvider`].
pub fn use_desktop_runtime() -> DesktopRuntimeContext {
    use_context::<DesktopRuntimeContext>().expect("DesktopRuntimeContext not provided")
}
