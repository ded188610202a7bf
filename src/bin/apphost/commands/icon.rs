//! `apphost icon` command

use anyhow::Result;

use super::with_help;
use crate::cli::IconArgs;
use apphost::ops::{render_icon, IconOptions};
use apphost::util::shell::Status;
use apphost::util::Shell;

pub fn execute(args: IconArgs, shell: &Shell) -> Result<()> {
    shell.status(Status::Rendering, args.monochrome.display());

    let result = render_icon(&IconOptions {
        monochrome: args.monochrome,
        accent: args.accent,
        out_dir: args.out,
    })
    .map_err(with_help)?;

    shell.note(format!(
        "{}x{} foreground {} background {}",
        result.width, result.height, result.colors.foreground, result.colors.background
    ));
    for file in &result.files {
        shell.status(Status::Created, file.display());
    }

    Ok(())
}
