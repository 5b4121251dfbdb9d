//! Drains reducer-emitted runtime effects in dispatch order.

use leptos::*;

use crate::runtime_context::DesktopRuntimeContext;

/// Installs the executor effect for `runtime`.
pub fn install(runtime: DesktopRuntimeContext) {
    create_effect(move |_| {
        if runtime.effects.with(Vec::is_empty) {
            return;
        }

        // Take the batch first; effects that dispatch again queue a fresh batch behind it.
        let mut batch = Vec::new();
        runtime
            .effects
            .update(|queue| std::mem::swap(queue, &mut batch));

        let host = runtime.host.get_value();
        for effect in batch {
            host.run_runtime_effect(runtime, effect);
        }
    });
}
