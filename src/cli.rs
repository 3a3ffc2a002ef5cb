use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "sentitube",
    version,
    about = "Analyze the comment sentiment of a YouTube video from the terminal"
)]
pub struct Cli {
    /// YouTube watch URL, e.g. https://www.youtube.com/watch?v=dQw4w9WgXcQ
    pub url: String,

    /// Config file path (defaults to ~/.config/sentitube/config.yaml)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Backend base URL, overriding config
    #[arg(long, value_name = "URL")]
    pub backend: Option<String>,

    /// Cap on comments collected across all pages
    #[arg(long, value_name = "N")]
    pub max_comments: Option<usize>,

    /// Directory chart images are written to (defaults to the current directory)
    #[arg(long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,
}
