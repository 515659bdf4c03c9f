//! bitreel CLI Tool
//!
//! Command-line interface for building and inspecting bitreel assets.

use anyhow::{bail, Context, Result};
use bitreel_core::{AssetHeader, AssetReader, AssetStats};
use bitreel_decoder::{FrameRenderer, Palette, Playback};
use bitreel_encoder::storage::DEFAULT_PARTITION_BYTES;
use bitreel_encoder::{AssetEncoder, AudioTrack, EncoderConfig, StorageBudget};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "bitreel")]
#[command(about = "bitreel - Run-length encoded monochrome video for tiny devices")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build an asset from a directory of extracted frame images
    Build {
        /// Directory with frame images (e.g. "frame_000001.png")
        frames_dir: PathBuf,

        /// Output asset file path
        #[arg(short, long)]
        output: PathBuf,

        /// Frame width in pixels
        #[arg(long, default_value = "180")]
        width: u16,

        /// Frame height in pixels
        #[arg(long, default_value = "135")]
        height: u16,

        /// Frame rate stored in the header
        #[arg(long, default_value = "15")]
        fps: u16,

        /// Luma below this value becomes foreground (0-255)
        #[arg(long, default_value = "128")]
        threshold: u8,

        /// Swap foreground and background
        #[arg(long)]
        invert: bool,

        /// Raw unsigned 8-bit mono PCM to ship next to the asset
        #[arg(long)]
        audio: Option<PathBuf>,

        /// Sample rate of the raw audio
        #[arg(long, default_value = "8000")]
        audio_rate: u32,

        /// Where to write the audio artifact (default: "<output>_audio.raw")
        #[arg(long)]
        audio_out: Option<PathBuf>,

        /// Flash partition size in bytes, decimal or 0x-prefixed hex
        #[arg(long, value_parser = parse_size, default_value_t = DEFAULT_PARTITION_BYTES)]
        partition_size: u64,
    },

    /// Show information about an asset
    Info {
        /// Input asset file path
        input: PathBuf,

        /// Print the header and stats as JSON
        #[arg(long)]
        json: bool,
    },

    /// Extract frames from an asset as PNG images
    Extract {
        /// Input asset file path
        input: PathBuf,

        /// Output directory, or output file when --frame is given
        #[arg(short, long)]
        output: PathBuf,

        /// Extract a single frame by index
        #[arg(long)]
        frame: Option<usize>,

        /// Render foreground white on black
        #[arg(long)]
        invert: bool,
    },
}

#[derive(Serialize)]
struct InfoReport {
    header: AssetHeader,
    stats: AssetStats,
    duration_ms: u64,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Build {
            frames_dir,
            output,
            width,
            height,
            fps,
            threshold,
            invert,
            audio,
            audio_rate,
            audio_out,
            partition_size,
        } => {
            let config = EncoderConfig {
                width,
                height,
                frame_rate: fps,
                threshold,
                invert,
            };
            let audio = audio.map(|path| (path, audio_rate, audio_out));
            build_asset(frames_dir, output, config, audio, partition_size)?
        }

        Commands::Info { input, json } => show_info(input, json)?,

        Commands::Extract {
            input,
            output,
            frame,
            invert,
        } => extract_frames(input, output, frame, invert)?,
    }

    Ok(())
}

fn build_asset(
    frames_dir: PathBuf,
    output: PathBuf,
    config: EncoderConfig,
    audio: Option<(PathBuf, u32, Option<PathBuf>)>,
    partition_size: u64,
) -> Result<()> {
    println!("Building asset from: {}", frames_dir.display());
    println!(
        "Frames: {}x{} @ {} fps, threshold {}",
        config.width, config.height, config.frame_rate, config.threshold
    );

    let encoder = AssetEncoder::new(config);
    let asset = encoder
        .encode_dir(&frames_dir)
        .context("Failed to encode frames")?;

    std::fs::write(&output, &asset.blob).context("Failed to write asset file")?;
    print_stats(&asset.stats);
    println!("Wrote {}", output.display());

    let mut audio_bytes = 0;
    if let Some((audio_path, sample_rate, audio_out)) = audio {
        let track = AudioTrack::from_raw_file(&audio_path, sample_rate)
            .context("Failed to read audio track")?;
        encoder.check_audio_sync(&asset.stats, &track);

        let audio_out = audio_out.unwrap_or_else(|| default_audio_path(&output));
        track
            .write_raw(&audio_out)
            .context("Failed to write audio track")?;
        audio_bytes = track.byte_len();
        println!(
            "Audio: {} ({} bytes, {:.2} s)",
            audio_out.display(),
            audio_bytes,
            track.duration_ms() as f64 / 1000.0
        );
    }

    let report = StorageBudget::new(partition_size).check(asset.stats.blob_bytes, audio_bytes);
    println!(
        "\nTotal data: {} bytes ({:.2} MB)",
        report.total_bytes(),
        report.total_bytes() as f64 / 1024.0 / 1024.0
    );
    println!(
        "Usable storage: ~{} bytes ({:.2} MB)",
        report.usable_bytes,
        report.usable_bytes as f64 / 1024.0 / 1024.0
    );
    if report.fits() {
        println!("OK - fits in partition.");
    } else {
        println!("WARNING: data may not fit! Consider a lower audio rate or smaller resolution");
    }

    Ok(())
}

fn show_info(input: PathBuf, json: bool) -> Result<()> {
    let blob = std::fs::read(&input).context("Failed to read asset file")?;
    let reader = AssetReader::open(blob).context("Failed to parse asset")?;

    let header = *reader.header();
    let stats = reader.stats();

    if json {
        let report = InfoReport {
            header,
            stats,
            duration_ms: header.duration_ms(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("\n=== Asset Information ===");
    println!("File: {}", input.display());
    println!("Resolution: {}x{}", header.width, header.height);
    println!(
        "Frame rate: {} fps ({} ms per frame)",
        header.frame_rate,
        header.frame_delay_ms()
    );
    println!(
        "Duration: {} ms ({:.2} seconds)",
        header.duration_ms(),
        header.duration_ms() as f64 / 1000.0
    );
    print_stats(&stats);

    println!("\n=== Frame index (first 10 entries) ===");
    for (i, offset) in reader.index().iter().take(10).enumerate() {
        let size = reader.frame_bytes(i)?.len();
        println!("  [{}] offset {} ({} bytes)", i, offset, size);
    }
    if reader.frame_count() > 10 {
        println!("  ... and {} more entries", reader.frame_count() - 10);
    }

    Ok(())
}

fn extract_frames(
    input: PathBuf,
    output: PathBuf,
    frame: Option<usize>,
    invert: bool,
) -> Result<()> {
    println!("Decoding asset: {}", input.display());

    let blob = std::fs::read(&input).context("Failed to read asset file")?;
    let reader = AssetReader::open(blob).context("Failed to parse asset")?;

    let palette = if invert {
        Palette::default().invert()
    } else {
        Palette::default()
    };
    let renderer = FrameRenderer::new(reader, palette);

    if let Some(index) = frame {
        renderer
            .save(index, &output)
            .with_context(|| format!("Failed to extract frame {index}"))?;
        println!("Saved frame {} to {}", index, output.display());
        return Ok(());
    }

    let frame_count = renderer.reader().frame_count();
    if frame_count == 0 {
        bail!("Asset has no frames");
    }
    std::fs::create_dir_all(&output).context("Failed to create output directory")?;
    println!("Extracting {} frames to {}", frame_count, output.display());

    for (i, item) in Playback::new(renderer.reader()).enumerate() {
        let (timestamp_ms, frame) =
            item.with_context(|| format!("Failed to decode frame {i}"))?;

        let frame_path = output.join(format!("frame_{:06}.png", i + 1));
        palette
            .paint(&frame)
            .save(&frame_path)
            .with_context(|| format!("Failed to save frame {i} ({timestamp_ms} ms)"))?;

        if (i + 1) % 500 == 0 {
            println!("Extracted {} / {} frames", i + 1, frame_count);
        }
    }

    println!("Successfully extracted all frames");
    Ok(())
}

fn print_stats(stats: &AssetStats) {
    println!("Frames: {}", stats.frame_count);
    println!(
        "Bit-RLE total: {} bytes (raw 1-bit would be {}, ratio {:.1}%)",
        stats.encoded_bytes,
        stats.raw_bytes,
        stats.ratio_percent()
    );
    println!("Largest frame: {} bytes", stats.largest_frame);
    println!(
        "Asset size: {} bytes ({:.2} MB)",
        stats.blob_bytes,
        stats.blob_bytes as f64 / 1024.0 / 1024.0
    );
}

/// `video.bin` -> `video_audio.raw`
fn default_audio_path(output: &Path) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "asset".to_string());
    output.with_file_name(format!("{stem}_audio.raw"))
}

fn parse_size(value: &str) -> Result<u64> {
    let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => value.parse(),
    };
    parsed.with_context(|| format!("invalid size: {value}"))
}
