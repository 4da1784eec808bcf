use anyhow::{Context, bail};
use std::io::Write;

use crate::address::Address;
use crate::call::{CallDialog, CallSession, Media};
use crate::commands::CommandContext;

#[derive(clap::Args)]
#[command(author, version, about = "Set up a call dialog for an outgoing or incoming call")]
pub struct CallArgs {
    /// Address to call
    #[arg(long, conflicts_with = "incoming")]
    pub to: Option<String>,
    /// Address of the caller of an incoming call
    #[arg(long, requires = "session")]
    pub incoming: Option<String>,
    /// Session id of the incoming call
    #[arg(long)]
    pub session: Option<String>,
    /// The incoming call offers video as well as audio
    #[arg(long)]
    pub video: bool,
}

pub fn call<W: Write>(context: &mut CommandContext<W>, args: CallArgs) -> anyhow::Result<()> {
    let mut dialog = CallDialog::new(context.account.clone());

    match (&args.to, &args.incoming) {
        (Some(to), None) => {
            let address: Address = to.parse().context("Invalid address to call")?;
            dialog.set_outgoing(address)?;
        }
        (None, Some(from)) => {
            let peer: Address = from.parse().context("Invalid caller address")?;
            let session_id = args
                .session
                .as_deref()
                .context("An incoming call needs a session id")?;
            let mut media = vec![Media::Audio];
            if args.video {
                media.push(Media::Video);
            }
            dialog.set_incoming(CallSession::new(session_id, peer, media))?;
        }
        (Some(_), Some(_)) => bail!("A call is either outgoing or incoming, not both"),
        (None, None) => bail!("Either --to or --incoming is required"),
    }

    context
        .writer
        .write_all(format!("{}\n", dialog.state()).as_bytes())
        .context("Could not write to output")?;
    Ok(())
}
