use crate::events::AppEvent;
use async_channel::Sender;
use std::path::PathBuf;
use std::thread;
use tokio::runtime::Runtime;

/// Runs the config watcher and the Ctrl-C listener on a background Tokio
/// runtime. Everything they notice arrives on `tx`.
pub fn start_background_services(config_path: PathBuf, tx: Sender<AppEvent>) {
    thread::spawn(move || {
        let rt = match Runtime::new() {
            Ok(rt) => rt,
            Err(e) => {
                log::error!("Failed to create Tokio runtime: {}", e);
                let _ = tx.send_blocking(AppEvent::Shutdown);
                return;
            }
        };

        rt.block_on(async {
            {
                let tx = tx.clone();
                tokio::spawn(async move {
                    super::watcher::run_async_watcher(config_path, tx).await;
                });
            }

            match tokio::signal::ctrl_c().await {
                Ok(()) => log::info!("Interrupted"),
                Err(e) => log::error!("Failed to listen for Ctrl-C: {}", e),
            }
            let _ = tx.send(AppEvent::Shutdown).await;
        });
    });
}
