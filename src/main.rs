use clap::Parser;
use colored::Colorize;
use std::path::PathBuf;
use std::process::exit;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod audio;
mod descriptor;
mod error;
mod playlist;
mod rename;
mod report;
mod scan;
mod tagger;
mod track;

use audio::LoftyBackend;
use error::Result;

#[derive(Parser, Debug)]
#[command(version, about = "Automatically rename and tag your dance playlist", long_about = None)]
/// Represents the command-line arguments for the application.
struct Args {
    /// Your txt file containing the playlist, one `NN_Title; Artist -- Dance`
    /// line per track.
    #[arg(short, long)]
    file: PathBuf,

    /// The directory of the mp3 files to process.
    #[arg(short, long)]
    dir: PathBuf,

    /// The name of the playlist, also used as album. eg: "Schulball 08.05.2024"
    #[arg(short, long)]
    name: String,

    /// The directory the `.m3u` and `.m3u8` playlist files are written to.
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Only display the renames that would be performed, without renaming,
    /// tagging or writing a playlist.
    #[arg(long, default_value_t = false)]
    dry_run: bool,

    /// Print debug output.
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

/// Everything a run needs, handed to each stage explicitly.
#[derive(Debug)]
struct Config {
    descriptor: PathBuf,
    dir: PathBuf,
    name: String,
    output: PathBuf,
    dry_run: bool,
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Config {
            descriptor: args.file,
            dir: args.dir,
            name: args.name,
            output: args.output,
            dry_run: args.dry_run,
        }
    }
}

fn main() {
    let args = Args::parse();

    let filter = if args.verbose {
        "ditag=debug"
    } else {
        "ditag=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    if let Err(err) = ctrlc::set_handler(|| {
        eprintln!("\n{}", "Interrupted, exiting.".yellow());
        exit(1);
    }) {
        warn!("Failed to register signal handler: {}", err);
    }

    let config = Config::from(args);
    if config.dry_run {
        println!(
            "{}",
            "--->>> This is running as a dry-run, no changes will be made! <<<---"
                .bold()
                .underline()
                .yellow()
        );
    }

    if let Err(err) = run(&config) {
        eprintln!("{} {}", "Error:".red(), err);
        eprintln!("{} {}", "Hint:".yellow(), err.hint());
        exit(1);
    }

    println!("\n——————————————————————————————");
    println!("{}", "Finished!".bold().blue());
}

/**
 * Runs the three stages in order: rename, tag, playlist.
 *
 * Every stage lists the music directory again, so each one sees the result
 * of the previous one.
 */
fn run(config: &Config) -> Result<()> {
    scan::validate_music_directory(&config.dir)?;
    let lines = descriptor::validate_descriptor_file(&config.descriptor)?;
    info!(
        "Read {} entries from '{}'",
        lines.len(),
        config.descriptor.display()
    );

    println!("{}", "Renaming files...".bold());
    rename::rename_tracks(&lines, &config.dir, config.dry_run)?.print_summary();
    if config.dry_run {
        return Ok(());
    }

    let backend = LoftyBackend;

    println!("\n{}", "Tagging files...".bold());
    tagger::tag_directory(&config.dir, &config.name, &backend)?.print_summary();

    println!("\n{}", "Creating playlist...".bold());
    let (_, report) =
        playlist::create_playlist_files(&config.dir, &config.name, &config.output, &backend)?;
    report.print_summary();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_args_valid() {
        let args = Args::try_parse_from([
            "ditag",
            "-f",
            "playlist.txt",
            "-d",
            "music_dir",
            "-n",
            "My Playlist",
        ])
        .unwrap();
        assert_eq!(args.file, PathBuf::from("playlist.txt"));
        assert_eq!(args.dir, PathBuf::from("music_dir"));
        assert_eq!(args.name, "My Playlist");
        assert_eq!(args.output, PathBuf::from("."));
        assert!(!args.dry_run);
    }

    #[test]
    fn test_args_missing_required() {
        let err = Args::try_parse_from(["ditag"]).unwrap_err();
        assert_eq!(err.exit_code(), 2);

        let err = Args::try_parse_from(["ditag", "-f", "playlist.txt", "-d", "music"]).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    fn config(root: &TempDir, dry_run: bool) -> Config {
        Config {
            descriptor: root.path().join("tänze.txt"),
            dir: root.path().join("Tanzmusik"),
            name: "Ball".to_string(),
            output: root.path().to_path_buf(),
            dry_run,
        }
    }

    #[test]
    fn test_run_dry_run() {
        let root = TempDir::new().unwrap();
        let cfg = config(&root, true);
        fs::create_dir(&cfg.dir).unwrap();
        fs::write(cfg.dir.join("01-Song.mp3"), b"dummy audio content").unwrap();
        fs::write(&cfg.descriptor, "01_Waltz; Artist -- Dance\n").unwrap();

        run(&cfg).unwrap();

        assert!(cfg.dir.join("01-Song.mp3").exists());
        assert!(!root.path().join("Ball.m3u").exists());
    }

    #[test]
    fn test_run_bad_descriptor() {
        let root = TempDir::new().unwrap();
        let cfg = config(&root, false);
        fs::create_dir(&cfg.dir).unwrap();
        fs::write(cfg.dir.join("01-Song.mp3"), b"dummy audio content").unwrap();
        fs::write(&cfg.descriptor, "01_Waltz, Artist -- Dance\n").unwrap();

        let err = run(&cfg).unwrap_err();
        assert!(matches!(err, Error::Descriptor(_)));
        assert!(cfg.dir.join("01-Song.mp3").exists());
    }

    #[test]
    fn test_run_missing_music_directory() {
        let root = TempDir::new().unwrap();
        let cfg = config(&root, false);
        fs::write(&cfg.descriptor, "01_Waltz; Artist -- Dance\n").unwrap();

        let err = run(&cfg).unwrap_err();
        assert!(matches!(err, Error::Audio(_)));
        assert!(err.to_string().contains("Music directory not found"));
    }

    #[test]
    fn test_run_untaggable_files() {
        let root = TempDir::new().unwrap();
        let cfg = config(&root, false);
        fs::create_dir(&cfg.dir).unwrap();
        fs::write(cfg.dir.join("01-Song.mp3"), b"dummy audio content").unwrap();
        fs::write(&cfg.descriptor, "01_Waltz; Artist -- Dance\n").unwrap();

        let err = run(&cfg).unwrap_err();
        assert!(err.to_string().contains("No files could be tagged"));
        assert!(cfg.dir.join("01_Waltz; Artist -- Dance.mp3").exists());
    }
}
