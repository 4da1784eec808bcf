/// Kind of popup the application asks the notifier for.
#[derive(
    strum_macros::Display,
    clap::ValueEnum,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
)]
#[strum(serialize_all = "kebab-case")]
pub enum PopupKind {
    Online,
    Offline,
    StatusChange,
    Message,
    Chat,
    Headline,
    File,
    /// Typing notifications; never rendered as a desktop popup.
    Composing,
    /// Own nickname mentioned in a group chat; never rendered as a desktop popup.
    GroupChatHighlight,
}

/// A contact record from the user's contact list.
pub trait RosterEntry {
    fn display_name(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contact {
    pub name: String,
}

impl RosterEntry for Contact {
    fn display_name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Message {
    pub body: String,
    pub subject: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthEvent {
    pub nick: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageEvent {
    pub nick: String,
    pub message: Message,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEvent {
    pub nick: String,
    pub file_name: String,
}

/// Application event a popup may originate from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Auth(AuthEvent),
    Message(MessageEvent),
    File(FileEvent),
}

impl AppEvent {
    /// Nickname the sender announced with this event, if any.
    pub fn nick(&self) -> Option<&str> {
        let nick = match self {
            AppEvent::Auth(auth) => &auth.nick,
            AppEvent::Message(message) => &message.nick,
            AppEvent::File(file) => &file.nick,
        };
        Some(nick.as_str()).filter(|n| !n.is_empty())
    }

    /// Name of the offered file for file transfer events.
    pub fn file_name(&self) -> Option<&str> {
        match self {
            AppEvent::File(event) => Some(event.file_name.as_str()),
            _ => None,
        }
    }

    pub fn message(&self) -> Option<&Message> {
        match self {
            AppEvent::Message(event) => Some(&event.message),
            _ => None,
        }
    }
}
