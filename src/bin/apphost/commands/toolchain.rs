//! `apphost toolchain` command

use anyhow::Result;

use super::with_help;
use apphost::builder::{DotnetToolchain, Toolchain};
use apphost::util::shell::Status;
use apphost::util::{GlobalContext, Shell};

pub fn execute(shell: &Shell) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let config = ctx.load_config();
    let toolchain = DotnetToolchain::from_config(&config).with_base_dir(ctx.cwd());

    shell.status(Status::Checking, config.toolchain.program.display());
    let program = toolchain.resolve_program().map_err(with_help)?;
    let version = toolchain.check_version().map_err(with_help)?;

    println!("Toolchain:");
    println!();
    println!("  Program:   {}", program.display());
    println!("  Version:   {}", version);
    println!("  Required:  {}.0 or newer", toolchain.min_major());
    println!();
    println!("Build:");
    println!("  Command:        {}", config.build.command);
    println!("  Configuration:  {}", config.build.configuration);
    if let Some(ref framework) = config.build.framework {
        println!("  Framework:      {}", framework);
    }
    if !config.build.extra_args.is_empty() {
        println!("  Extra args:     {}", config.build.extra_args.join(" "));
    }

    Ok(())
}
