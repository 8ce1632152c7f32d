use crate::events::AppEvent;
use async_channel::Sender;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::PathBuf;

/// Watches the directory holding `config_path` and forwards a reload for
/// every change that touches the file itself.
pub async fn run_async_watcher(config_path: PathBuf, tx: Sender<AppEvent>) {
    let config_dir = match config_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };

    if let Err(e) = fs_err::create_dir_all(&config_dir) {
        log::error!("Failed to create config directory for watching: {}", e);
        return;
    }

    let (bridge_tx, bridge_rx) = async_channel::unbounded();

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    ) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to create watcher: {}", e);
            return;
        }
    };

    if let Err(e) = watcher.watch(&config_dir, RecursiveMode::NonRecursive) {
        log::error!("Failed to watch config directory: {}", e);
        return;
    }
    log::info!("Watching {}", config_path.display());

    let file_name = config_path.file_name().map(|n| n.to_os_string());

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) => {
                let meaningful_event = matches!(
                    event.kind,
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                );
                // editors may report the path relative or canonical; match on the name
                let touches_config = event.paths.iter().any(|p| {
                    p == &config_path || p.file_name().map(|n| n.to_os_string()) == file_name
                });

                if meaningful_event
                    && touches_config
                    && tx.send(AppEvent::ConfigReload).await.is_err()
                {
                    break;
                }
            }
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}
