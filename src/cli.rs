//! The command line interface for the model builder.
use crate::global::GlobalProperties;
use crate::input::load_model;
use crate::log;
use crate::model::ModelIndex;
use crate::output::{DataWriter, create_output_directory, get_output_dir};
use crate::settings::Settings;
use ::log::{info, warn};
use anyhow::{Context, Result, ensure};
use clap::{Args, CommandFactory, Parser, Subcommand};
use std::path::{Path, PathBuf};

pub mod example;
use example::ExampleSubcommands;
pub mod settings;
use settings::SettingsSubcommands;

/// The command line interface for the model builder.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// The available commands.
    #[command(subcommand)]
    command: Option<Commands>,
    /// Flag to provide the CLI docs as markdown
    #[arg(long, hide = true)]
    markdown_help: bool,
}

/// Options for the build command
#[derive(Args, Default)]
pub struct BuildOpts {
    /// Directory for output files
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
    /// Whether to overwrite the output directory if it already exists
    #[arg(long)]
    pub overwrite: bool,
    /// Set a global property to a value in every support time frame, e.g. "CO2 limit=0"
    #[arg(long = "override", value_name = "NAME=VALUE", value_parser = parse_override)]
    pub overrides: Vec<(String, f64)>,
}

/// The available commands.
#[derive(Subcommand)]
enum Commands {
    /// Build the sets and parameters of a model.
    Build {
        /// Path to the model directory.
        model_dir: PathBuf,
        /// Other build options
        #[command(flatten)]
        opts: BuildOpts,
    },
    /// Manage example models.
    Example {
        /// The available subcommands for managing example models.
        #[command(subcommand)]
        subcommand: ExampleSubcommands,
    },
    /// Validate a model.
    Validate {
        /// The path to the model directory.
        model_dir: PathBuf,
    },
    /// Manage settings file.
    Settings {
        /// The subcommands for managing the settings file.
        #[command(subcommand)]
        subcommand: SettingsSubcommands,
    },
}

impl Commands {
    /// Execute the supplied CLI command
    fn execute(self) -> Result<()> {
        match self {
            Self::Build { model_dir, opts } => handle_build_command(&model_dir, &opts, None),
            Self::Example { subcommand } => subcommand.execute(),
            Self::Validate { model_dir } => handle_validate_command(&model_dir, None),
            Self::Settings { subcommand } => subcommand.execute(),
        }
    }
}

/// Parse CLI arguments and start urbs2
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    // Invoked as: `$ urbs2 --markdown-help`
    if cli.markdown_help {
        clap_markdown::print_help_markdown::<Cli>();
        return Ok(());
    }

    let Some(command) = cli.command else {
        // Output program help in markdown format
        let help_str = Cli::command().render_long_help().to_string();
        println!("{help_str}");
        return Ok(());
    };

    command.execute()
}

/// Parse a global property override of the form `NAME=VALUE`
fn parse_override(arg: &str) -> Result<(String, f64)> {
    let (name, value) = arg
        .split_once('=')
        .context("Overrides must be given as NAME=VALUE")?;
    let name = name.trim();
    ensure!(!name.is_empty(), "Override is missing a property name");
    let value: f64 = value
        .trim()
        .parse()
        .with_context(|| format!("Invalid value for {name}"))?;
    ensure!(!value.is_nan(), "Invalid value for {name}");

    Ok((name.to_string(), value))
}

/// Apply global property overrides given on the command line
fn apply_overrides(global_properties: &mut GlobalProperties, overrides: &[(String, f64)]) {
    for (name, value) in overrides {
        info!("Setting {name} to {value} in every support time frame");
        global_properties.set_all(name, *value);
    }
}

/// Load program settings, if not provided
fn load_settings(settings: Option<Settings>) -> Result<Settings> {
    if let Some(settings) = settings {
        Ok(settings)
    } else {
        Settings::load().context("Failed to load settings.")
    }
}

/// Handle the `build` command.
pub fn handle_build_command(
    model_path: &Path,
    opts: &BuildOpts,
    settings: Option<Settings>,
) -> Result<()> {
    let settings = load_settings(settings)?;

    // Get path to output folder
    let pathbuf: PathBuf;
    let output_path = if let Some(p) = opts.output_dir.as_deref() {
        p
    } else {
        pathbuf = get_output_dir(model_path)?;
        &pathbuf
    };

    // This setting can be overridden by command-line argument
    let allow_overwrite = opts.overwrite || settings.overwrite;
    let overwrite =
        create_output_directory(output_path, allow_overwrite).with_context(|| {
            format!(
                "Failed to create output directory: {}",
                output_path.display()
            )
        })?;

    // Initialise program logger
    log::init(Some(settings.log_level.as_str()), Some(output_path))
        .context("Failed to initialise logging.")?;

    // Load the model to build
    let mut model = load_model(model_path).context("Failed to load model.")?;
    info!("Loaded model from {}", model_path.display());
    info!("Output folder: {}", output_path.display());

    // NB: We have to wait until the logger is initialised to display this warning
    if overwrite {
        warn!("Output folder will be overwritten");
    }

    apply_overrides(&mut model.global_properties, &opts.overrides);

    let index = ModelIndex::build(&model).context("Failed to build model index.")?;
    info!(
        "Built index over {} timesteps and {} support time frames",
        index.timesteps.len(),
        model.time_frames.len()
    );

    DataWriter::create(output_path)?.write_model_index(&index)?;
    info!("Model index written to {}", output_path.display());

    Ok(())
}

/// Handle the `validate` command.
pub fn handle_validate_command(model_path: &Path, settings: Option<Settings>) -> Result<()> {
    let settings = load_settings(settings)?;

    // Initialise program logger (we won't save log files when running the validate command)
    log::init(Some(settings.log_level.as_str()), None).context("Failed to initialise logging.")?;

    // Load/validate the model
    let model = load_model(model_path).context("Failed to validate model.")?;
    ModelIndex::build(&model).context("Failed to validate model.")?;
    info!("Model validation successful!");

    Ok(())
}
