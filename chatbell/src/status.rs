/// Presence availability as announced by a contact's resource.
#[derive(
    strum_macros::Display,
    strum_macros::EnumString,
    clap::ValueEnum,
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
)]
#[strum(ascii_case_insensitive)]
pub enum Show {
    #[default]
    #[strum(to_string = "Online", serialize = "online")]
    Online,
    #[strum(to_string = "Free for Chat", serialize = "chat", serialize = "free-for-chat")]
    FreeForChat,
    #[strum(to_string = "Away", serialize = "away")]
    Away,
    #[strum(to_string = "Not Available", serialize = "xa", serialize = "not-available")]
    NotAvailable,
    #[strum(to_string = "Do not Disturb", serialize = "dnd", serialize = "do-not-disturb")]
    DoNotDisturb,
    #[strum(to_string = "Invisible", serialize = "invisible")]
    Invisible,
    #[strum(to_string = "Offline", serialize = "offline")]
    Offline,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Status {
    pub show: Show,
    pub message: String,
}

impl Status {
    pub fn new(show: Show, message: &str) -> Self {
        Self {
            show,
            message: message.to_string(),
        }
    }

    /// Human readable label, e.g. "Not Available".
    pub fn text(&self) -> String {
        self.show.to_string()
    }
}

/// One connected resource of a contact.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resource {
    pub name: String,
    pub status: Status,
}

impl Resource {
    pub fn new(name: &str, status: Status) -> Self {
        Self {
            name: name.to_string(),
            status,
        }
    }
}
