// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use snapcam::app::AppModel;
use snapcam::i18n;
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "snapcam")]
#[command(about = "Point-and-shoot camera for the COSMIC desktop")]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List available cameras
    List {
        /// Print the listing as JSON
        #[arg(long)]
        json: bool,
    },

    /// Take a photo with the configured camera
    Photo {
        /// Output file or directory (default: ~/Pictures/snapcam)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the photo as a data URL instead of saving it
        #[arg(long, conflicts_with = "output")]
        data_url: bool,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Set RUST_LOG to control the log level, e.g. RUST_LOG=snapcam=debug
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::List { json }) => cli::list_cameras(json),
        Some(Commands::Photo { output, data_url }) => cli::take_photo(output, data_url),
        None => run_gui(),
    }
}

fn run_gui() -> Result<(), Box<dyn std::error::Error>> {
    // Get the system's preferred languages.
    let requested_languages = i18n_embed::DesktopLanguageRequester::requested_languages();

    // Enable localizations to be applied.
    i18n::init(&requested_languages);

    let settings = cosmic::app::Settings::default().size_limits(
        cosmic::iced::Limits::NONE
            .min_width(360.0)
            .min_height(480.0),
    );

    cosmic::app::run::<AppModel>(settings, ())?;

    Ok(())
}
