//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand, ValueEnum};

/// DraftBuddy CLI - Command-line interface for DraftBuddy picture frames
#[derive(Parser, Debug)]
#[command(name = "draftbuddy-cli")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Request timeout in seconds
    #[arg(long, global = true, default_value = "10", env = "DRAFTBUDDY_CLI_TIMEOUT")]
    pub timeout: u64,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Device address to connect to (skips network discovery)
    #[arg(short, long, global = true)]
    pub device: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Discover DraftBuddy frames on the network
    Discover(DiscoverArgs),

    /// Connect to a frame and show its status
    Status,

    /// Watch frame health continuously
    Monitor(MonitorArgs),

    /// Gallery management
    Gallery(GalleryArgs),

    /// Crop an image and upload it as the frame background
    Upload(UploadArgs),
}

// ==================== Discover ====================

#[derive(Args, Debug)]
pub struct DiscoverArgs {
    /// Filter by operating mode
    #[arg(long, value_enum)]
    pub mode: Option<ModeFilter>,

    /// Print each progress update on its own line instead of a progress bar
    #[arg(long)]
    pub watch_progress: bool,

    /// Maximum number of concurrent probes
    #[arg(long, default_value = "64")]
    pub concurrency: usize,
}

#[derive(ValueEnum, Clone, Debug)]
pub enum ModeFilter {
    Service,
    Slave,
    Unknown,
}

// ==================== Monitor ====================

#[derive(Args, Debug)]
pub struct MonitorArgs {
    /// Seconds between health checks
    #[arg(short, long, default_value = "10")]
    pub interval: u64,

    /// Output as newline-delimited JSON (NDJSON)
    #[arg(long)]
    pub ndjson: bool,
}

// ==================== Gallery ====================

#[derive(Args, Debug)]
pub struct GalleryArgs {
    #[command(subcommand)]
    pub command: GalleryCommands,
}

#[derive(Subcommand, Debug)]
pub enum GalleryCommands {
    /// List images stored on the frame
    List,

    /// Download an image from the frame as PNG
    Fetch(GalleryFetchArgs),

    /// Set the active background image
    Set(GallerySetArgs),

    /// Delete an image from the frame
    Delete(GalleryDeleteArgs),
}

#[derive(Args, Debug)]
pub struct GalleryFetchArgs {
    /// Image name as listed by `gallery list`
    pub name: String,

    /// Output file (default: <name>.png)
    #[arg(short, long)]
    pub out: Option<String>,

    /// Fetch the full-size frame instead of the thumbnail
    #[arg(long)]
    pub full: bool,
}

#[derive(Args, Debug)]
pub struct GallerySetArgs {
    /// Image name as listed by `gallery list`
    pub name: String,
}

#[derive(Args, Debug)]
pub struct GalleryDeleteArgs {
    /// Image name as listed by `gallery list`
    pub name: String,
}

// ==================== Upload ====================

#[derive(Args, Debug)]
pub struct UploadArgs {
    /// Image file to upload (JPEG or PNG)
    pub image: String,

    /// Zoom level between 0.0 (fit) and 1.0 (maximum)
    #[arg(long, default_value = "0")]
    pub zoom: f64,

    /// Horizontal pan in viewport pixels (negative moves the image left)
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub pan_x: f64,

    /// Vertical pan in viewport pixels (negative moves the image up)
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub pan_y: f64,
}
