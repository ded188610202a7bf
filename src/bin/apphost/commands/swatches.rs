//! `apphost swatches` command

use anyhow::Result;

use apphost::core::color::{ColorPair, SWATCHES};

pub fn execute() -> Result<()> {
    println!("{:<7} {:<10} {}", "index", "accent", "background");
    for (index, accent) in SWATCHES.iter().enumerate() {
        let pair = ColorPair::from_accent(*accent);
        println!(
            "{:<7} {:<10} {}",
            index,
            pair.foreground.to_string(),
            pair.background
        );
    }
    Ok(())
}
