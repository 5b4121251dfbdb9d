//! Process-table transitions used by the desktop reducer.
//!
//! These helpers are the only code that changes the stacking order. The process vector is kept in
//! z-order (bottom first), so raising is "remove and re-append" and the foreground process is
//! always the last element.

use crate::{
    model::{AppKey, DesktopState, LaunchRequest, Pid, Process},
    reducer::ReducerError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Result of a successful launch-or-focus.
pub struct LaunchOutcome {
    /// Process now in the foreground.
    pub pid: Pid,
    /// Whether a new process was created (as opposed to an existing one being raised).
    pub created: bool,
}

/// Launches the requested application or focuses its running instance.
///
/// A running instance is reused: its launch parameters are replaced when the request carries
/// them, then it is raised. Readiness is cleared only when the frame URL changes. Otherwise a new process gets the next pid and is appended on top.
///
/// # Errors
///
/// Returns [`ReducerError::UnknownApplication`] without touching state when the key is not in
/// the registry.
pub fn launch_or_focus(
    state: &mut DesktopState,
    request: &LaunchRequest,
) -> Result<LaunchOutcome, ReducerError> {
    let Some(app) = state.registry.find(&request.app_key) else {
        return Err(ReducerError::UnknownApplication(request.app_key.clone()));
    };

    if let Some(process) = state
        .processes
        .iter_mut()
        .find(|p| p.app_key == request.app_key)
    {
        if let Some(params) = &request.params {
            // Only a changed navigation target reloads the frame; it then has to signal
            // readiness again. A size change alone keeps the loaded document.
            if app.frame_src(&process.launch) != app.frame_src(params) {
                process.frame_ready = false;
            }
            process.launch = params.clone();
        }
        let pid = process.pid;
        raise_process(state, pid)?;
        return Ok(LaunchOutcome {
            pid,
            created: false,
        });
    }

    let pid = next_pid(state);
    state.processes.push(Process {
        pid,
        app_key: request.app_key.clone(),
        launch: request.params.clone().unwrap_or_default(),
        frame_ready: false,
    });
    Ok(LaunchOutcome { pid, created: true })
}

/// Moves `pid` to the top of the stacking order.
///
/// Raising the current foreground process leaves the order unchanged.
///
/// # Errors
///
/// Returns [`ReducerError::UnknownProcess`] when `pid` is not running.
pub fn raise_process(state: &mut DesktopState, pid: Pid) -> Result<(), ReducerError> {
    let index = state
        .processes
        .iter()
        .position(|p| p.pid == pid)
        .ok_or(ReducerError::UnknownProcess(pid))?;
    if index + 1 == state.processes.len() {
        return Ok(());
    }
    let process = state.processes.remove(index);
    state.processes.push(process);
    Ok(())
}

/// Removes `pid` and cancels its pending messages. Relative order of the rest is unchanged.
///
/// # Errors
///
/// Returns [`ReducerError::UnknownProcess`] when `pid` is not running.
pub fn terminate_process(state: &mut DesktopState, pid: Pid) -> Result<Process, ReducerError> {
    let index = state
        .processes
        .iter()
        .position(|p| p.pid == pid)
        .ok_or(ReducerError::UnknownProcess(pid))?;
    let process = state.processes.remove(index);
    state.pending.retain(|message| message.pid != pid);
    Ok(process)
}

/// Removes every process and pending message. Pids stay reserved.
pub fn terminate_all(state: &mut DesktopState) -> Vec<Pid> {
    state.pending.clear();
    state.processes.drain(..).map(|p| p.pid).collect()
}

/// Terminates every process whose application is no longer in the catalog.
///
/// Runs after the catalog is replaced. Returns the terminated pids in stacking order.
pub fn terminate_unregistered(state: &mut DesktopState) -> Vec<Pid> {
    let orphans: Vec<Pid> = state
        .processes
        .iter()
        .filter(|p| state.registry.find(&p.app_key).is_none())
        .map(|p| p.pid)
        .collect();
    orphans
        .into_iter()
        .filter_map(|pid| terminate_process(state, pid).ok().map(|p| p.pid))
        .collect()
}

/// Marks the frame of `app_key` ready; returns the pid when a process for the key is running.
pub fn mark_frame_ready(state: &mut DesktopState, app_key: &AppKey) -> Option<Pid> {
    let process = state
        .processes
        .iter_mut()
        .find(|p| &p.app_key == app_key)?;
    process.frame_ready = true;
    Some(process.pid)
}

fn next_pid(state: &mut DesktopState) -> Pid {
    let pid = Pid(state.next_pid);
    state.next_pid = state.next_pid.saturating_add(1);
    pid
}
