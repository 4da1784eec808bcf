use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{Context, bail};

use crate::address::{Address, BareAddress};

/// The messaging account a notification or call belongs to.
pub trait Account: Send + Sync {
    fn name(&self) -> &str;

    /// Avatar image for a contact, if one is cached.
    fn avatar(&self, address: &BareAddress) -> Option<PathBuf>;

    /// What activating a notification about `address` should do, typically
    /// opening a chat with it.
    fn default_action(&self, address: &Address);
}

/// Account backed by local configuration: avatars come from a directory and
/// the default action runs an external command.
pub struct LocalAccount {
    name: String,
    avatar_directory: Option<PathBuf>,
    default_action_command: Option<String>,
}

impl LocalAccount {
    pub fn new(
        name: &str,
        avatar_directory: Option<PathBuf>,
        default_action_command: Option<String>,
    ) -> Self {
        Self {
            name: name.to_string(),
            avatar_directory,
            default_action_command,
        }
    }

    fn action_command(&self, address: &Address) -> anyhow::Result<Command> {
        let command_line = self
            .default_action_command
            .as_deref()
            .context("No default action command is configured")?;
        let mut parts = command_line.split_whitespace();
        let Some(program) = parts.next() else {
            bail!("Default action command is empty");
        };

        let mut command = Command::new(program);
        command.args(parts).arg(format!("xmpp:{}", address));
        Ok(command)
    }

    fn run_default_action(&self, address: &Address) -> anyhow::Result<()> {
        // Not waited on, the action outlives the notification.
        self.action_command(address)?
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::inherit())
            .spawn()
            .context("Failed to spawn default action command")?;
        Ok(())
    }
}

pub fn avatar_path(directory: &Path, address: &BareAddress) -> PathBuf {
    directory.join(format!("{}.png", address))
}

impl Account for LocalAccount {
    fn name(&self) -> &str {
        &self.name
    }

    fn avatar(&self, address: &BareAddress) -> Option<PathBuf> {
        let path = avatar_path(self.avatar_directory.as_deref()?, address);
        if path.is_file() {
            Some(path)
        } else {
            tracing::debug!(address = %address, path = %path.display(), "No cached avatar");
            None
        }
    }

    fn default_action(&self, address: &Address) {
        tracing::info!(account = %self.name, address = %address, "Running default action");
        if let Err(e) = self.run_default_action(address) {
            tracing::warn!(account = %self.name, address = %address, error = %e, "Default action failed");
        }
    }
}
