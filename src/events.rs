#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    ConfigReload,
    Shutdown,
}
