use clap::Parser;
use open_course_aria2::{
    ConvertOptions, DEFAULT_USER_AGENT, NeteaseProvider, ProgressEvent, convert_playlists,
};
use std::path::PathBuf;
use std::process;

/// Generate aria2 input files for Netease Open Course playlists
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Playlist identifiers, e.g. M6HV755O6
    #[arg(value_name = "PLID", required = true)]
    plids: Vec<String>,

    /// Directory the .aria2 files are written to
    #[arg(short, long, env = "OPEN_COURSE_OUTPUT_DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Base directory aria2 should place the playlist directories in
    #[arg(short, long, env = "OPEN_COURSE_DOWNLOAD_DIR")]
    download_dir: Option<PathBuf>,

    /// Log failing playlists and continue with the remaining ones
    #[arg(long)]
    keep_going: bool,

    /// User agent sent to the course API
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    user_agent: String,
}

/// Handles progress events and turns them into log lines
fn handle_progress_event(event: ProgressEvent) {
    match event {
        ProgressEvent::Fetching { plid } => {
            tracing::info!("Getting {}", plid);
        }
        ProgressEvent::Resolved {
            directory_name,
            video_count,
            directive_count,
        } => {
            tracing::debug!(
                "Resolved {} video(s) into {} download(s) for {}",
                video_count,
                directive_count,
                directory_name
            );
        }
        ProgressEvent::Written { path } => {
            tracing::debug!("Wrote {}", path.display());
        }
        ProgressEvent::Complete { directory_name } => {
            tracing::info!("{} done", directory_name);
        }
        ProgressEvent::Failed { plid, error } => {
            tracing::error!("Failed to convert {}: {}", plid, error);
        }
    }
}

/// Initialize logging with tracing
fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "open_course_aria2=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();

    let args = Args::parse();

    let provider = NeteaseProvider::new().user_agent(&args.user_agent);
    let options = ConvertOptions {
        output_dir: args.output_dir,
        download_dir: args.download_dir,
    };

    match convert_playlists(
        &provider,
        &args.plids,
        &options,
        args.keep_going,
        handle_progress_event,
    ) {
        Ok(summary) => {
            if args.plids.len() > 1 {
                tracing::info!(
                    "Converted {} playlist(s), {} failed",
                    summary.converted.len(),
                    summary.failed.len()
                );
            }
            if !summary.is_success() {
                process::exit(1);
            }
        }
        // Already reported through ProgressEvent::Failed
        Err(_) => process::exit(1),
    }
}
