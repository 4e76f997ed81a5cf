//! Notification port — how the user hears that `solargraph` is missing.

use std::path::PathBuf;

/// The one user-facing notice this launcher ever raises.
#[derive(Debug, Clone)]
pub struct MissingServerNotice {
    pub id: &'static str,
    pub title: &'static str,
    pub body: &'static str,
    pub actions: [&'static str; 2],
}

impl MissingServerNotice {
    #[must_use]
    pub fn solargraph() -> Self {
        Self {
            id: "solargraph-not-found",
            title: "Solargraph Not Found",
            body: "The \"solargraph\" command could not be found in your environment.",
            actions: ["OK", "Help"],
        }
    }
}

/// Which action the user chose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeResponse {
    Dismissed,
    Help,
}

/// Port for presenting notices and opening the settings surface.
#[allow(async_fn_in_trait)]
pub trait NotificationCenter {
    async fn present(&self, notice: &MissingServerNotice) -> NoticeResponse;

    /// Invoked when the user picks the Help action.
    fn open_settings(&self);
}

/// Production notifier: a headless launcher has no dialog to raise, so the
/// notice lands in the log, with a pointer at the settings file.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier {
    settings_path: Option<PathBuf>,
}

impl LogNotifier {
    #[must_use]
    pub fn new(settings_path: Option<PathBuf>) -> Self {
        Self { settings_path }
    }
}

impl NotificationCenter for LogNotifier {
    async fn present(&self, notice: &MissingServerNotice) -> NoticeResponse {
        tracing::warn!(notice = notice.id, "{}: {}", notice.title, notice.body);
        NoticeResponse::Dismissed
    }

    fn open_settings(&self) {
        match &self.settings_path {
            Some(path) => {
                tracing::info!("Configure the server path in {}", path.display());
            }
            None => tracing::info!("Configure the server path in .solard.toml"),
        }
    }
}
