use std::sync::Arc;

use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use colored::Colorize;
use ffmpeg_next::util::log::Level as FfmpegLogLevel;
use indicatif::{ProgressBar, ProgressStyle};
use qhist::{AnalysisOptions, FrameKind, ProgressCallback, ProgressInfo, VideoFile};
use serde_json::json;

const CLI_AFTER_HELP: &str = "Examples:\n  qhist input.mp4\n  qhist input.mp4 --progress\n  qhist input.mp4 --json > stats.json\n  qhist input.mp4 --max-frames 500\n  qhist --completions zsh > _qhist";

#[derive(Debug, Parser)]
#[command(
    name = "qhist",
    version,
    about = "Report per-frame quantizer statistics for a video file",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    /// Input video path or URL.
    #[arg(required_unless_present = "completions")]
    input: Option<String>,

    /// Output the statistics as machine-readable JSON.
    #[arg(long)]
    json: bool,

    /// Show a progress bar while scanning frames.
    #[arg(long)]
    progress: bool,

    /// Show additional output, including FFmpeg's own log messages.
    #[arg(long)]
    verbose: bool,

    /// Stop after decoding this many frames.
    #[arg(long)]
    max_frames: Option<u64>,

    /// Generate shell completion scripts and exit.
    #[arg(long, value_enum)]
    completions: Option<Shell>,
}

/// Feeds analysis progress into an indicatif bar.
struct TerminalProgress {
    bar: ProgressBar,
}

impl ProgressCallback for TerminalProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        if let Some(total) = info.total {
            // The frame count is an estimate; never let the bar overflow it.
            self.bar.set_length(total.max(info.current));
        }
        self.bar.set_position(info.current);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        let mut command = Cli::command();
        clap_complete::generate(shell, &mut command, "qhist", &mut std::io::stdout());
        return Ok(());
    }

    let input = cli.input.as_deref().ok_or("no input file given")?;

    // FFmpeg's own stderr chatter would drown the report.
    if !cli.verbose {
        ffmpeg_next::util::log::set_level(FfmpegLogLevel::Error);
    }

    let mut file = VideoFile::open(input)?;
    let metadata = file.metadata().clone();

    if cli.verbose {
        eprintln!(
            "{}: {}x{} @ {:.2} fps [{}] in {} (~{} frames)",
            input,
            metadata.width,
            metadata.height,
            metadata.frames_per_second,
            metadata.codec,
            metadata.format,
            metadata.frame_count,
        );
    }

    let mut options = AnalysisOptions::new();
    if let Some(max_frames) = cli.max_frames {
        options = options.with_max_frames(max_frames);
    }

    let progress_bar = if cli.progress {
        let bar = ProgressBar::new(metadata.frame_count.max(1));
        let style =
            ProgressStyle::with_template("{spinner:.green} {bar:40.cyan/blue} {pos}/{len} frames")?;
        bar.set_style(style.progress_chars("##-"));
        options = options.with_progress(Arc::new(TerminalProgress { bar: bar.clone() }));
        Some(bar)
    } else {
        None
    };

    let analysis = file.analyze_quantizers(&options)?;

    if let Some(bar) = progress_bar {
        bar.finish_and_clear();
    }

    if analysis.skipped_frames > 0 {
        eprintln!(
            "{} {}",
            "warning:".yellow().bold(),
            format!(
                "{} frame(s) had no usable quantizer data and were skipped",
                analysis.skipped_frames
            )
            .yellow(),
        );
    }

    // Validates that at least one frame was recorded before any ratios are
    // computed.
    let report = analysis.report()?;

    if cli.json {
        let total = analysis.tally.total_frames();
        let percentage = |kind: FrameKind| analysis.tally.count(kind) as f64 / total as f64 * 100.0;
        let payload = json!({
            "input": input,
            "total_frames": total,
            "skipped_frames": analysis.skipped_frames,
            "frame_types": {
                "intra": {
                    "count": analysis.tally.count(FrameKind::Intra),
                    "percentage": percentage(FrameKind::Intra),
                },
                "bi_predicted": {
                    "count": analysis.tally.count(FrameKind::BiPredicted),
                    "percentage": percentage(FrameKind::BiPredicted),
                },
                "predicted": {
                    "count": analysis.tally.count(FrameKind::Predicted),
                    "percentage": percentage(FrameKind::Predicted),
                },
                "unknown": {
                    "count": analysis.tally.count(FrameKind::Unknown),
                    "percentage": percentage(FrameKind::Unknown),
                },
            },
            "qvalues": analysis.frequency.iter().map(|entry| json!({
                "qvalue": entry.value,
                "count": entry.count,
                "percentage": entry.count as f64 / total as f64 * 100.0,
            })).collect::<Vec<_>>(),
            "average_qvalue": report.average_qvalue(),
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        println!();
        print!("{report}");
    }

    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::Cli;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn input_required_unless_generating_completions() {
        assert!(Cli::try_parse_from(["qhist"]).is_err());
        assert!(Cli::try_parse_from(["qhist", "input.mp4"]).is_ok());
        assert!(Cli::try_parse_from(["qhist", "--completions", "bash"]).is_ok());
    }

    #[test]
    fn flags_parse() {
        let cli = Cli::try_parse_from([
            "qhist",
            "input.mp4",
            "--json",
            "--progress",
            "--max-frames",
            "250",
        ])
        .unwrap();
        assert!(cli.json);
        assert!(cli.progress);
        assert_eq!(cli.max_frames, Some(250));
    }
}
