//! Manage analysis session files.

use anyhow::Context;
use clap::{Args, Subcommand};
use polarmap_config::{Session, paths};
use std::path::PathBuf;

#[derive(Args)]
pub struct SessionArgs {
    #[command(subcommand)]
    command: SessionCommand,
}

#[derive(Subcommand)]
enum SessionCommand {
    /// Write a default session file to edit by hand
    Init {
        /// Session name
        #[arg(long, default_value = "default")]
        name: String,

        /// Where to write the file; defaults to the user sessions directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List session files in the user sessions directory
    List,

    /// Validate a session file
    Check {
        /// Session file to validate
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

pub fn run(args: SessionArgs) -> anyhow::Result<()> {
    match args.command {
        SessionCommand::Init { name, output } => {
            let path = match output {
                Some(path) => path,
                None => paths::ensure_user_sessions_dir()?.join(format!("{name}.toml")),
            };
            Session::new(&name)
                .save(&path)
                .with_context(|| format!("writing {}", path.display()))?;
            println!("Wrote {}", path.display());
        }
        SessionCommand::List => {
            let sessions = paths::list_user_sessions();
            if sessions.is_empty() {
                println!("No sessions in {}", paths::user_sessions_dir().display());
            }
            for path in sessions {
                println!("{}", path.display());
            }
        }
        SessionCommand::Check { file } => {
            let session = Session::load(&file)
                .with_context(|| format!("loading {}", file.display()))?;
            println!(
                "{} is valid (gate {}..{}, {} modal coefficients)",
                file.display(),
                session.gate.left.position,
                session.gate.right.position,
                session.modal.coefficient_count
            );
        }
    }
    Ok(())
}
