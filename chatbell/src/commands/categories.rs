use anyhow::Context;
use std::io::Write;
use strum::IntoEnumIterator;

use crate::commands::CommandContext;
use crate::notifier::Category;

#[derive(clap::Args)]
#[command(
    author,
    version,
    about = "List notification categories and whether they are enabled"
)]
pub struct CategoriesArgs {}

pub fn list_categories<W: Write>(context: &mut CommandContext<W>) -> anyhow::Result<()> {
    for category in Category::iter() {
        let state = if context.config.is_enabled(category) {
            "enabled"
        } else {
            "disabled"
        };
        context
            .writer
            .write_all(format!("{}\t{}\n", category, state).as_bytes())
            .context("Could not write to output")?;
    }
    Ok(())
}
