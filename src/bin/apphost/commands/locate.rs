//! `apphost locate` command

use std::path::Path;

use anyhow::{bail, Result};

use super::with_help;
use crate::cli::LocateArgs;
use apphost::builder::ArtifactLocator;
use apphost::util::Shell;
use apphost::{BuildWorkspace, GlobalContext};

pub fn execute(args: LocateArgs, host: Option<&Path>, shell: &Shell) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let config = ctx.load_config();
    let template = ctx.resolve_template(host, &config).map_err(with_help)?;

    let ws = BuildWorkspace::for_package(&template, &args.package);
    if !ws.exists() {
        bail!(
            "no workspace for `{}` under {}\nhint: run `apphost build --package {}` first",
            args.package,
            template.workspaces_dir().display(),
            args.package
        );
    }

    let artifact = ArtifactLocator::from_config(&config.artifact)
        .find(ws.root())
        .map_err(with_help)?;
    if !artifact.signed {
        shell.warn("no signed package found, using an unsigned one");
    }
    println!("{}", artifact.path.display());

    Ok(())
}
