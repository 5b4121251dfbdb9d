use leptos::{create_effect, logging, Callable, Callback};

use crate::{
    host::DesktopHostContext, reducer::DesktopAction, registry::ApplicationRegistry,
};

/// Reads the session, then requests the inventory through the effect queue.
pub(super) fn install_boot(host: DesktopHostContext, dispatch: Callback<DesktopAction>) {
    create_effect(move |_| {
        dispatch.call(DesktopAction::SetSession(
            host.services().session.current_session(),
        ));
        dispatch.call(DesktopAction::RefreshRegistry);
    });
}

pub(super) async fn load_registry(host: &DesktopHostContext) -> DesktopAction {
    match host.services().inventory.list_installed_apps().await {
        Ok(records) => {
            let (registry, rejected) = ApplicationRegistry::from_records(records);
            for err in rejected {
                logging::warn!("skipping installed app: {err}");
            }
            DesktopAction::HydrateRegistry { registry }
        }
        Err(error) => {
            logging::warn!("installed app inventory load failed: {error}");
            DesktopAction::RegistryLoadFailed { error }
        }
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use platform_host::{InstalledAppRecord, MemoryAppInventory, MemoryHost};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{config::ShellConfig, model::AppKey};

    #[test]
    fn inventory_records_become_a_registry() {
        let inventory = MemoryAppInventory::new(vec![
            InstalledAppRecord::iframe("system-terminal", "Terminal", "https://terminal.example"),
            InstalledAppRecord::iframe("system-bad", "Bad", "nope"),
        ]);
        let host = DesktopHostContext::new(
            MemoryHost::signed_in(inventory).services(),
            ShellConfig::default(),
        );

        let DesktopAction::HydrateRegistry { registry } = block_on(load_registry(&host)) else {
            panic!("expected hydrate action");
        };
        assert_eq!(registry.list().len(), 1);
        assert!(registry.find(&AppKey::new("system-terminal")).is_some());
    }

    #[test]
    fn inventory_failure_becomes_registry_failure() {
        let host = DesktopHostContext::new(
            MemoryHost::signed_in(MemoryAppInventory::failing("503")).services(),
            ShellConfig::default(),
        );
        assert_eq!(
            block_on(load_registry(&host)),
            DesktopAction::RegistryLoadFailed {
                error: "503".to_string()
            }
        );
    }
}
