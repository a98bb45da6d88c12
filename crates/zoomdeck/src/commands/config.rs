use colored::Colorize;

use crate::cli::ConfigCommands;
use crate::config::Config;

pub fn run(command: ConfigCommands) -> anyhow::Result<()> {
    match command {
        ConfigCommands::Show => show(),
        ConfigCommands::Set { key, value } => set(&key, &value),
    }
}

fn show() -> anyhow::Result<()> {
    let path = Config::path()?;
    let config = match Config::load_from(&path) {
        Ok(config) => {
            println!("{} {}", "Config:".bold(), path.display());
            config
        }
        Err(_) => {
            println!(
                "{} {} {}",
                "Config:".bold(),
                path.display(),
                "(not created yet, showing defaults)".dimmed()
            );
            Config::default()
        }
    };
    println!();

    let animation = config
        .animation_ms()
        .map(|ms| format!("{ms} ms"))
        .unwrap_or_else(|| format!("{} ms", crate::animator::DEFAULT_DURATION_MS));
    let start = config
        .defaults
        .as_ref()
        .and_then(|d| d.start_mode.clone())
        .unwrap_or_else(|| "first".to_string());

    println!("  {:<24} {}", "defaults.theme".cyan(), config.theme());
    println!("  {:<24} {}", "defaults.start_mode".cyan(), start);
    println!("  {:<24} {}", "defaults.windowed".cyan(), config.windowed());
    println!("  {:<24} {}", "defaults.animation_ms".cyan(), animation);
    Ok(())
}

fn set(key: &str, value: &str) -> anyhow::Result<()> {
    let mut config = Config::load_or_default();
    config.set(key, value)?;
    let path = config.save()?;
    println!("{} {key} = {value}", "\u{2713}".green());
    println!("  {}", path.display().to_string().dimmed());
    Ok(())
}
