//! `apphost build` command

use std::path::Path;

use anyhow::Result;

use super::with_help;
use crate::cli::BuildArgs;
use crate::terminal::TerminalInteraction;
use apphost::builder::{ArtifactLocator, DotnetToolchain};
use apphost::core::error::ErrorKind;
use apphost::ops::{select_template, BuildOrchestrator, BuildOutcome};
use apphost::util::shell::Status;
use apphost::util::{GlobalContext, Shell};
use apphost::BuildRequest;

/// Exit status for a cancelled build.
const EXIT_CANCELLED: i32 = 2;

pub fn execute(args: BuildArgs, host: Option<&Path>, shell: &Shell) -> Result<i32> {
    let ctx = GlobalContext::new()?;
    let config = ctx.load_config();

    let ui = TerminalInteraction::new(shell)
        .assume_yes(args.yes)
        .save_to(args.save_to.clone());

    let template = match select_template(&ctx, host, &config, &ui) {
        Ok(template) => template,
        Err(e) if e.kind() == ErrorKind::UserCancelled => {
            let msg = format!("{}, pass --host or set `host.dir`", e);
            if shell.is_json() {
                shell.error(msg);
            } else {
                shell.warn(msg);
            }
            return Ok(EXIT_CANCELLED);
        }
        Err(e) if shell.is_json() => {
            shell.error(with_help(e));
            return Ok(1);
        }
        Err(e) => return Err(with_help(e)),
    };

    let mut request = BuildRequest::new(args.package, args.name);
    request.foreground_image = args.foreground;
    request.background_image = args.background;
    request.monochrome_image = args.monochrome;
    request.accent = args.accent;

    shell.status(
        Status::Staging,
        format!("`{}` from {}", request.package_name, template.root().display()),
    );

    let toolchain = DotnetToolchain::from_config(&config).with_base_dir(ctx.cwd());
    let orchestrator = BuildOrchestrator::new(&template, &toolchain, &ui)
        .with_locator(ArtifactLocator::from_config(&config.artifact));
    let outcome = orchestrator.run(&request);

    if shell.is_json() {
        println!("{}", serde_json::to_string(&outcome)?);
    } else if let BuildOutcome::Success {
        saved_to: Some(ref saved),
        ..
    } = outcome
    {
        shell.status(Status::Saved, saved.display());
    }

    Ok(match outcome {
        BuildOutcome::Success { .. } => 0,
        BuildOutcome::Failure {
            kind: ErrorKind::UserCancelled,
            ..
        } => EXIT_CANCELLED,
        BuildOutcome::Failure { .. } => 1,
    })
}
