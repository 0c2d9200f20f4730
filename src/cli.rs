use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "gofileyourself")]
#[command(about = "A three-pane terminal file browser with a fuzzy finder")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Write debug logs to ./debug.log
    #[arg(long)]
    pub debug: bool,

    /// Write the chosen file to this path and exit instead of opening an editor
    #[arg(long, value_name = "OUT")]
    pub choose_file: Option<PathBuf>,

    /// Configuration file (defaults to the platform config directory)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory to open, or a file to select inside its parent
    pub selected: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Render one frame of the browser as text
    Screenshot {
        /// Directory to render
        #[arg(short, long, default_value = ".")]
        path: PathBuf,
        /// Terminal width for rendering
        #[arg(long, default_value = "120")]
        width: u16,
        /// Terminal height for rendering
        #[arg(long, default_value = "40")]
        height: u16,
    },
}
