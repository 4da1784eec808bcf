use std::sync::Arc;

use clap::Parser;

use chatbell::NotificationDispatcher;
use chatbell::account::LocalAccount;
use chatbell::commands::CommandContext;
use chatbell::commands::call::{CallArgs, call};
use chatbell::commands::categories::{CategoriesArgs, list_categories};
use chatbell::commands::popup::{PopupArgs, popup};

#[derive(Parser)]
#[command(author, version, about)]
enum ChatbellCli {
    Popup(PopupArgs),
    Categories(CategoriesArgs),
    Call(CallArgs),
}

fn main() -> anyhow::Result<()> {
    let _guard = chatbell_logging::init_logging("chatbell.log");
    let args = ChatbellCli::parse();

    let dispatcher = NotificationDispatcher::instance();
    let config = dispatcher.config().clone();
    let account = Arc::new(LocalAccount::new(
        &config.app_name,
        config.avatar_directory.clone(),
        config.default_action_command.clone(),
    ));
    let mut context = CommandContext::new(config, std::io::stdout(), account);

    match args {
        ChatbellCli::Popup(args) => popup(&mut context, dispatcher, args),
        ChatbellCli::Categories(_) => list_categories(&mut context),
        ChatbellCli::Call(args) => call(&mut context, args),
    }
}
