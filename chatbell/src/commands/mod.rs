pub mod call;
pub mod categories;
pub mod popup;

use std::io::Write;
use std::sync::Arc;

use crate::account::Account;
use crate::config::ConfigurationValues;

pub struct CommandContext<W: Write> {
    pub config: ConfigurationValues,
    pub writer: W,
    pub account: Arc<dyn Account>,
}

impl<W: Write> CommandContext<W> {
    pub fn new(config: ConfigurationValues, writer: W, account: Arc<dyn Account>) -> Self {
        Self {
            config,
            writer,
            account,
        }
    }
}
