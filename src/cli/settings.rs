//! The `settings` subcommands.
use crate::settings::Settings;
use anyhow::{Context, Result};
use clap::Subcommand;
use std::fs;
use std::path::Path;

/// Subcommands for managing the settings file
#[derive(Subcommand)]
pub enum SettingsSubcommands {
    /// Open the settings file in a text editor, creating it from a template if needed
    Edit,
    /// Print the path of the settings file
    Path,
    /// Print a settings file template
    DumpDefault,
}

impl SettingsSubcommands {
    /// Run the subcommand
    pub fn execute(self) -> Result<()> {
        match self {
            Self::Edit => {
                let file_path = Settings::file_path();
                write_template_if_missing(&file_path)?;
                println!("Opening settings file for editing: {}", file_path.display());
                edit::edit_file(&file_path)
                    .with_context(|| format!("Could not edit {}", file_path.display()))?;
            }
            Self::Path => println!("{}", Settings::file_path().display()),
            Self::DumpDefault => print!("{}", Settings::template()?),
        }

        Ok(())
    }
}

/// Write the settings template to `file_path`, unless a file is already there
fn write_template_if_missing(file_path: &Path) -> Result<()> {
    if file_path.is_file() {
        return Ok(());
    }

    if let Some(config_dir) = file_path.parent() {
        fs::create_dir_all(config_dir)
            .with_context(|| format!("Could not create {}", config_dir.display()))?;
    }
    fs::write(file_path, Settings::template()?)
        .with_context(|| format!("Could not write {}", file_path.display()))
}
