// src/main.rs
use anyhow::Result;
use clap::Parser;
use colorful::Colorful;
use std::path::PathBuf;

use spectroview::batch::BatchRunner;
use spectroview::core::probe::FfprobeProbe;

#[derive(Parser, Debug)]
#[command(name = "spectroview")]
#[command(about = "Render labeled spectrogram images for audio files")]
struct Args {
    /// Input audio file, or a directory scanned recursively for
    /// .m4a/.mp3/.flac/.wav files
    path: PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let probe = FfprobeProbe::new();
    probe.check_available()?;

    let runner = BatchRunner::new(Box::new(probe));
    let summary = runner.run(&args.path)?;

    if summary.skipped > 0 {
        println!(
            "{}",
            format!(
                "Rendered {} file(s), skipped {}",
                summary.rendered, summary.skipped
            )
            .yellow()
        );
    } else {
        println!("{}", format!("Rendered {} file(s)", summary.rendered).green());
    }

    Ok(())
}
