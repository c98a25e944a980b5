//! The `cutcheck profiles` command.

use clap::Args;
use console::style;
use cutcheck_core::Config;

/// Arguments for the `profiles` command.
#[derive(Args, Debug)]
pub struct ProfilesArgs {
    /// Print profiles as JSON
    #[arg(long)]
    pub json: bool,
}

/// List every configured profile, marking the active one.
pub fn execute(args: ProfilesArgs, config: &Config) -> anyhow::Result<()> {
    let submission = &config.submission;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&submission.profiles)?);
        return Ok(());
    }

    for profile in &submission.profiles {
        let line = format!("{:<16} {}x{}px", profile.id, profile.width, profile.height);
        if profile.id == submission.active {
            println!("{} {}", style("*").green(), style(line).bold());
        } else {
            println!("  {line}");
        }
    }
    Ok(())
}
