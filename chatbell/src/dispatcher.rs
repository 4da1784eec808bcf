use std::sync::{Arc, OnceLock};
use std::time::Duration;

use strum::IntoEnumIterator;
use thiserror::Error;

use crate::account::Account;
use crate::address::Address;
use crate::config::ConfigurationValues;
use crate::context::{ContextTable, ContextToken, NotificationContext};
use crate::event::{AppEvent, Message, PopupKind, RosterEntry};
use crate::notifier::{
    Category, DesktopNotifier, Interaction, InteractionCallback, Notification, NotificationService,
};
use crate::status::Resource;

const FILE_PLACEHOLDER: &str = "[Incoming File]";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum NotifyError {
    #[error("{kind} popup for {address} needs {needed}, but none was given")]
    InvalidEventReference {
        kind: PopupKind,
        address: String,
        needed: &'static str,
    },
    #[error("{0} popups are not shown as desktop notifications")]
    UnsupportedEventType(PopupKind),
}

/// Everything a popup is composed from.
pub struct PopupRequest<'a> {
    pub kind: PopupKind,
    pub address: &'a Address,
    pub resource: &'a Resource,
    pub roster_entry: Option<&'a dyn RosterEntry>,
    pub event: Option<&'a AppEvent>,
}

impl<'a> PopupRequest<'a> {
    fn missing(&self, needed: &'static str) -> NotifyError {
        NotifyError::InvalidEventReference {
            kind: self.kind,
            address: self.address.to_string(),
            needed,
        }
    }

    /// Name shown for the sender: the roster name, then a nickname carried
    /// by the event, then the bare address.
    pub fn contact_name(&self) -> Result<String, NotifyError> {
        let name = match (self.roster_entry, self.event) {
            (Some(entry), _) => Some(entry.display_name().to_string()),
            (None, Some(event)) => event.nick().map(str::to_string),
            (None, None) => return Err(self.missing("a roster entry or an event")),
        };
        Ok(name
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| self.address.bare().to_string()))
    }

    fn message(&self) -> Result<&'a Message, NotifyError> {
        self.event
            .and_then(AppEvent::message)
            .ok_or_else(|| self.missing("a message event"))
    }
}

/// Apply the popup policy to `request`, without the avatar.
pub fn compose(request: &PopupRequest<'_>) -> Result<Notification, NotifyError> {
    let presence = |category: Category, contact: String| Notification {
        category,
        title: format!("{} ({})", contact, request.resource.status.text()),
        body: request.resource.status.message.clone(),
        icon: None,
    };

    let notification = match request.kind {
        PopupKind::Online => presence(Category::ContactAvailable, request.contact_name()?),
        PopupKind::Offline => presence(Category::ContactUnavailable, request.contact_name()?),
        PopupKind::StatusChange => {
            presence(Category::ContactStatusChange, request.contact_name()?)
        }
        PopupKind::Message => {
            let message = request.message()?;
            Notification {
                category: Category::IncomingMessage,
                title: format!("{} says:", request.contact_name()?),
                body: message.body.clone(),
                icon: None,
            }
        }
        PopupKind::Chat => {
            let message = request.message()?;
            Notification {
                category: Category::IncomingMessage,
                title: request.contact_name()?,
                body: message.body.clone(),
                icon: None,
            }
        }
        PopupKind::Headline => {
            let message = request.message()?;
            let title = if message.subject.is_empty() {
                request.contact_name()?
            } else {
                message.subject.clone()
            };
            Notification {
                category: Category::IncomingHeadline,
                title,
                body: message.body.clone(),
                icon: None,
            }
        }
        PopupKind::File => Notification {
            category: Category::IncomingFile,
            title: request.contact_name()?,
            body: FILE_PLACEHOLDER.to_string(),
            icon: None,
        },
        PopupKind::Composing | PopupKind::GroupChatHighlight => {
            return Err(NotifyError::UnsupportedEventType(request.kind));
        }
    };
    Ok(notification)
}

/// Turns chat and presence events into desktop notifications and routes
/// clicks on them back to the account they came from.
///
/// One dispatcher normally lives for the whole process, see [`instance`].
///
/// [`instance`]: NotificationDispatcher::instance
pub struct NotificationDispatcher {
    service: Box<dyn NotificationService>,
    config: ConfigurationValues,
    contexts: Arc<ContextTable>,
}

static INSTANCE: OnceLock<NotificationDispatcher> = OnceLock::new();

impl NotificationDispatcher {
    /// Create a dispatcher and register all categories with `service`.
    pub fn new(service: Box<dyn NotificationService>, config: ConfigurationValues) -> Self {
        let categories: Vec<Category> = Category::iter().collect();
        service.register(&config.app_name, &categories);
        Self {
            service,
            config,
            contexts: Arc::new(ContextTable::new()),
        }
    }

    /// The process-wide dispatcher, built from the user configuration and the
    /// desktop notification service on first use.
    pub fn instance() -> &'static NotificationDispatcher {
        Self::instance_with(|| {
            let config = ConfigurationValues::load_or_default();
            let service = DesktopNotifier::new(config.timeout_ms);
            Self::new(Box::new(service), config)
        })
    }

    /// Like [`instance`](Self::instance), but builds the dispatcher with
    /// `init` if there is none yet. `init` runs at most once per process.
    pub fn instance_with(
        init: impl FnOnce() -> NotificationDispatcher,
    ) -> &'static NotificationDispatcher {
        INSTANCE.get_or_init(|| {
            tracing::debug!("Initializing notification dispatcher");
            init()
        })
    }

    pub fn config(&self) -> &ConfigurationValues {
        &self.config
    }

    /// Show a notification for an event from `address`.
    ///
    /// Returns the token of the shown notification, or `None` if its
    /// category is disabled or the service could not display it. The event
    /// is required whenever there is no roster entry, and message popups
    /// always need a message event.
    pub fn popup(
        &self,
        account: Arc<dyn Account>,
        kind: PopupKind,
        address: &Address,
        resource: &Resource,
        roster_entry: Option<&dyn RosterEntry>,
        event: Option<&AppEvent>,
    ) -> Result<Option<ContextToken>, NotifyError> {
        let request = PopupRequest {
            kind,
            address,
            resource,
            roster_entry,
            event,
        };
        let mut notification = match compose(&request) {
            Ok(n) => n,
            Err(e @ NotifyError::UnsupportedEventType(_)) => {
                tracing::debug!(kind = %kind, address = %address, "Skipping unsupported popup");
                return Err(e);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Could not compose notification");
                return Err(e);
            }
        };

        if !self.config.is_enabled(notification.category) {
            tracing::debug!(category = %notification.category, "Category disabled, not notifying");
            return Ok(None);
        }

        notification.icon = account.avatar(&address.bare());

        let token = self.contexts.insert(NotificationContext {
            account,
            address: address.clone(),
        });
        let contexts = Arc::clone(&self.contexts);
        let on_interaction: InteractionCallback = Box::new(move |interaction| {
            contexts.resolve(token, interaction);
        });

        if let Err(e) = self.service.show(&notification, on_interaction) {
            tracing::warn!(error = %e, category = %notification.category, "Could not deliver notification");
            self.contexts.take(token);
            return Ok(None);
        }
        tracing::debug!(
            token = %token,
            category = %notification.category,
            title = %notification.title,
            file_name = event.and_then(AppEvent::file_name).unwrap_or_default(),
            "Notification shown"
        );
        Ok(Some(token))
    }

    /// The user activated the notification: run the account's default action.
    pub fn notification_clicked(&self, token: ContextToken) {
        self.contexts.resolve(token, Interaction::Clicked);
    }

    pub fn notification_timed_out(&self, token: ContextToken) {
        self.contexts.resolve(token, Interaction::TimedOut);
    }

    /// Number of shown notifications still waiting for interaction.
    pub fn pending(&self) -> usize {
        self.contexts.len()
    }

    /// Block until the notification behind `token` was clicked or timed out,
    /// or until `limit` passes. Returns whether it was released in time.
    pub fn wait_released(&self, token: ContextToken, limit: Duration) -> bool {
        self.contexts.wait_released(token, limit)
    }
}
