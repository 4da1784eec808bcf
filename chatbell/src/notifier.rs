use std::path::PathBuf;
use std::sync::OnceLock;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Notification categories, registered with the notification service once
/// per process.
#[derive(
    strum_macros::Display,
    strum_macros::EnumIter,
    Serialize,
    Deserialize,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    #[strum(to_string = "Contact becomes Available")]
    ContactAvailable,
    #[strum(to_string = "Contact becomes Unavailable")]
    ContactUnavailable,
    #[strum(to_string = "Contact changes Status")]
    ContactStatusChange,
    #[strum(to_string = "Incoming Message")]
    IncomingMessage,
    #[strum(to_string = "Incoming Headline")]
    IncomingHeadline,
    #[strum(to_string = "Incoming File")]
    IncomingFile,
}

impl Category {
    /// Categories that are shown unless the user turns them off.
    pub fn defaults() -> Vec<Category> {
        vec![
            Category::ContactAvailable,
            Category::IncomingMessage,
            Category::IncomingHeadline,
            Category::IncomingFile,
        ]
    }

    /// freedesktop.org notification category hint.
    pub fn hint(&self) -> &'static str {
        match self {
            Category::ContactAvailable => "presence.online",
            Category::ContactUnavailable => "presence.offline",
            Category::ContactStatusChange => "presence",
            Category::IncomingMessage | Category::IncomingHeadline => "im.received",
            Category::IncomingFile => "transfer",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub category: Category,
    pub title: String,
    pub body: String,
    pub icon: Option<PathBuf>,
}

impl Notification {
    /// The subject line: category followed by the title.
    pub fn summary(&self) -> String {
        format!("{}: {}", self.category, self.title)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interaction {
    Clicked,
    TimedOut,
}

pub type InteractionCallback = Box<dyn FnOnce(Interaction) + Send + 'static>;

pub trait NotificationService: Send + Sync {
    fn register(&self, app_name: &str, categories: &[Category]);

    /// Display `notification` without blocking. `on_interaction` is called at
    /// most once, possibly from another thread.
    fn show(
        &self,
        notification: &Notification,
        on_interaction: InteractionCallback,
    ) -> anyhow::Result<()>;
}

pub struct DesktopNotifier {
    app_name: OnceLock<String>,
    timeout: notify_rust::Timeout,
}

impl DesktopNotifier {
    pub fn new(timeout_ms: Option<u32>) -> Self {
        let timeout = match timeout_ms {
            Some(ms) => notify_rust::Timeout::Milliseconds(ms),
            None => notify_rust::Timeout::Default,
        };
        Self {
            app_name: OnceLock::new(),
            timeout,
        }
    }

    fn app_name(&self) -> &str {
        self.app_name.get().map(String::as_str).unwrap_or("chatbell")
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    fn deliver(&self, handle: notify_rust::NotificationHandle, on_interaction: InteractionCallback) {
        std::thread::spawn(move || {
            handle.wait_for_action(|action| {
                tracing::debug!(action = %action, "Notification interaction");
                let interaction = match action {
                    "default" => Interaction::Clicked,
                    _ => Interaction::TimedOut,
                };
                on_interaction(interaction);
            });
        });
    }

    #[cfg(not(all(unix, not(target_os = "macos"))))]
    fn deliver<H>(&self, _handle: H, on_interaction: InteractionCallback) {
        // No action support on this platform; release right away.
        on_interaction(Interaction::TimedOut);
    }
}

impl NotificationService for DesktopNotifier {
    fn register(&self, app_name: &str, categories: &[Category]) {
        if self.app_name.set(app_name.to_string()).is_err() {
            tracing::warn!(app_name = %app_name, "Notification service already registered");
            return;
        }
        let names: Vec<String> = categories.iter().map(Category::to_string).collect();
        tracing::info!(app_name = %app_name, categories = ?names, "Registered notification categories");
    }

    fn show(
        &self,
        notification: &Notification,
        on_interaction: InteractionCallback,
    ) -> anyhow::Result<()> {
        let mut desktop = notify_rust::Notification::new();
        desktop
            .appname(self.app_name())
            .summary(&notification.summary())
            .body(&notification.body)
            .action("default", "Open")
            .timeout(self.timeout);
        #[cfg(all(unix, not(target_os = "macos")))]
        desktop.hint(notify_rust::Hint::Category(
            notification.category.hint().to_string(),
        ));
        if let Some(icon) = &notification.icon {
            desktop.icon(&icon.to_string_lossy());
        }

        let handle = desktop
            .show()
            .context("Could not show desktop notification")?;
        self.deliver(handle, on_interaction);
        Ok(())
    }
}
