use anyhow::Context;
use std::io::Write;
use std::time::Duration;

use crate::address::Address;
use crate::commands::CommandContext;
use crate::dispatcher::{NotificationDispatcher, PopupRequest, compose};
use crate::event::{
    AppEvent, AuthEvent, Contact, FileEvent, Message, MessageEvent, PopupKind, RosterEntry,
};
use crate::status::{Resource, Show, Status};

#[derive(clap::Args)]
#[command(author, version, about = "Show a desktop notification for a contact event")]
pub struct PopupArgs {
    #[arg(value_enum)]
    pub kind: PopupKind,
    /// Address the event comes from, e.g. bob@example.com/laptop
    pub address: String,

    #[arg(long, value_enum, default_value_t = Show::Online)]
    pub status: Show,
    #[arg(long, default_value = "")]
    pub status_message: String,

    /// Name of the contact in the roster, if it is in there
    #[arg(long)]
    pub contact_name: Option<String>,
    /// Nickname the sender announced
    #[arg(long)]
    pub nick: Option<String>,
    /// The event is an authorization request
    #[arg(long)]
    pub auth: bool,

    #[arg(long, default_value = "")]
    pub body: String,
    #[arg(long, default_value = "")]
    pub subject: String,
    #[arg(long, default_value = "")]
    pub file_name: String,

    /// Print the notification instead of showing it
    #[arg(long)]
    pub dry_run: bool,
}

impl PopupArgs {
    fn resource(&self, address: &Address) -> Resource {
        Resource::new(
            address.resource().unwrap_or_default(),
            Status::new(self.status, &self.status_message),
        )
    }

    fn event(&self) -> Option<AppEvent> {
        let nick = self.nick.clone().unwrap_or_default();
        if self.auth {
            return Some(AppEvent::Auth(AuthEvent { nick }));
        }
        match self.kind {
            PopupKind::Message | PopupKind::Chat | PopupKind::Headline => {
                Some(AppEvent::Message(MessageEvent {
                    nick,
                    message: Message {
                        body: self.body.clone(),
                        subject: self.subject.clone(),
                    },
                }))
            }
            PopupKind::File => Some(AppEvent::File(FileEvent {
                nick,
                file_name: self.file_name.clone(),
            })),
            _ => None,
        }
    }
}

pub fn popup<W: Write>(
    context: &mut CommandContext<W>,
    dispatcher: &NotificationDispatcher,
    args: PopupArgs,
) -> anyhow::Result<()> {
    let address: Address = args.address.parse().context("Invalid address")?;
    let resource = args.resource(&address);
    let event = args.event();
    let contact = args.contact_name.clone().map(|name| Contact { name });

    if args.dry_run {
        let request = PopupRequest {
            kind: args.kind,
            address: &address,
            resource: &resource,
            roster_entry: contact.as_ref().map(|c| c as &dyn RosterEntry),
            event: event.as_ref(),
        };
        let notification = compose(&request)?;
        let icon = context
            .account
            .avatar(&address.bare())
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "-".to_string());
        let enabled = if context.config.is_enabled(notification.category) {
            "yes"
        } else {
            "no"
        };
        let output = format!(
            "category: {}\ntitle: {}\nbody: {}\nicon: {}\nenabled: {}\n",
            notification.category, notification.title, notification.body, icon, enabled
        );
        context
            .writer
            .write_all(output.as_bytes())
            .context("Could not write to output")?;
        return Ok(());
    }

    let token = dispatcher.popup(
        context.account.clone(),
        args.kind,
        &address,
        &resource,
        contact.as_ref().map(|c| c as &dyn RosterEntry),
        event.as_ref(),
    )?;
    let Some(token) = token else {
        return Ok(());
    };

    // Keep the process alive so the click can still reach the account.
    let limit = Duration::from_secs(context.config.wait_limit_secs);
    if !dispatcher.wait_released(token, limit) {
        tracing::info!(token = %token, "Stopped waiting for notification interaction");
        dispatcher.notification_timed_out(token);
    }

    Ok(())
}
