use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use dough_gauge::{
    capture, color_view, debug, io, load_rgb, measure_size, pixel_stats, DoughError, HsvRange,
    HsvTuner, ImageStats, MeasurementReport, MonitorConfig,
};
use log::LevelFilter;

/// Measure proofing dough from a single camera frame.
#[derive(Parser, Debug)]
#[command(name = "dough-gauge", version, about, long_about = None)]
struct Cli {
    /// JSON configuration file; defaults are used when omitted.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (off, error, warn, info, debug, trace). Falls back to
    /// `DOUGH_GAUGE_LOG`, then `info`.
    #[arg(long, global = true, value_parser = parse_level)]
    log_level: Option<LevelFilter>,

    /// Emit JSON log lines (tracing builds only).
    #[cfg(feature = "tracing")]
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Area and height of the dough via adaptive thresholding.
    Measure {
        /// Input image; without it a frame is captured.
        #[arg(short, long)]
        image: Option<PathBuf>,
        /// Write the frame annotated with the region outline and box.
        #[arg(long)]
        debug_image: Option<PathBuf>,
        /// Write original | raw mask | cleaned mask side by side.
        #[arg(long)]
        panel: Option<PathBuf>,
        /// Write the measurement as JSON.
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Foreground pixel statistics via the HSV color range.
    Pixels {
        #[arg(short, long)]
        image: PathBuf,
        /// Write original | raw mask | cleaned mask side by side.
        #[arg(long)]
        panel: Option<PathBuf>,
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Try HSV bounds on an image and preview the mask.
    Tune {
        #[arg(short, long)]
        image: PathBuf,
        /// Lower bound as H,S,V.
        #[arg(long, value_parser = parse_hsv)]
        lower: Option<[u8; 3]>,
        /// Upper bound as H,S,V.
        #[arg(long, value_parser = parse_hsv)]
        upper: Option<[u8; 3]>,
        /// Write original | mask | masked original side by side.
        #[arg(long)]
        preview: Option<PathBuf>,
        /// Save the config with the tried bounds to this path.
        #[arg(long)]
        save_config: Option<PathBuf>,
    },
    /// Write the default configuration as JSON.
    InitConfig { path: PathBuf },
}

fn parse_level(raw: &str) -> Result<LevelFilter, String> {
    raw.parse()
        .map_err(|_| format!("unknown log level `{raw}`"))
}

fn parse_hsv(raw: &str) -> Result<[u8; 3], String> {
    let parts: Vec<&str> = raw.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(format!("expected H,S,V, got `{raw}`"));
    }
    let mut out = [0u8; 3];
    for (slot, part) in out.iter_mut().zip(parts) {
        *slot = part
            .parse()
            .map_err(|e| format!("invalid component `{part}`: {e}"))?;
    }
    Ok(out)
}

fn init_logging(cli: &Cli) {
    #[cfg(feature = "tracing")]
    {
        let _ = tracing_log::LogTracer::init();
        if let Some(level) = cli.log_level {
            log::set_max_level(level);
        }
        dough_gauge::core::init_tracing(cli.json_logs);
    }
    #[cfg(not(feature = "tracing"))]
    {
        let _ = match cli.log_level {
            Some(level) => dough_gauge::core::init_with_level(level),
            None => dough_gauge::core::init_from_env(LevelFilter::Info),
        };
    }
}

fn load_config(path: Option<&Path>) -> Result<MonitorConfig, DoughError> {
    match path {
        Some(path) => Ok(MonitorConfig::load_json(path)?),
        None => Ok(MonitorConfig::default()),
    }
}

fn write_report(report: &MeasurementReport, path: Option<&Path>) -> Result<(), DoughError> {
    if let Some(path) = path {
        report.write_json(path)?;
        log::info!("wrote report JSON to {}", path.display());
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), DoughError> {
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Cmd::Measure {
            image,
            debug_image,
            panel,
            report,
        } => {
            let (frame, source) = match image {
                Some(path) => (load_rgb(&path)?, Some(path.display().to_string())),
                None => (capture::acquire(&config.capture)?, None),
            };
            let measurement = measure_size(&color_view(&frame), &config)?;

            match &measurement.size {
                Some(size) => {
                    for line in size.overlay_lines() {
                        println!("{line}");
                    }
                }
                None => println!("No region detected"),
            }

            if let (Some(path), Some(region)) = (&debug_image, measurement.region()) {
                io::save_rgb(&debug::annotate_region(&frame, region), path)?;
            }
            if let Some(path) = &panel {
                let seg = &measurement.segmentation;
                io::save_rgb(
                    &debug::analysis_panel(&frame, &seg.raw_mask, &seg.cleaned_mask),
                    path,
                )?;
            }

            let mut out = measurement.report();
            if let Some(source) = source {
                out = out.with_source(source);
            }
            write_report(&out, report.as_deref())
        }
        Cmd::Pixels {
            image,
            panel,
            report,
        } => {
            let frame = load_rgb(&image)?;
            let view = color_view(&frame);
            let stats = pixel_stats(&view, &config)?;
            println!(
                "Dough pixels: {} of {} ({:.2}%)",
                stats.foreground_pixels, stats.total_pixels, stats.foreground_percentage
            );
            if let Some(path) = &panel {
                io::save_rgb(
                    &debug::analysis_panel(&frame, &stats.raw_mask, &stats.cleaned_mask),
                    path,
                )?;
            }
            let out = MeasurementReport::color(ImageStats::from_view(&view), &stats)
                .with_source(image.display().to_string());
            write_report(&out, report.as_deref())
        }
        Cmd::Tune {
            image,
            lower,
            upper,
            preview,
            save_config,
        } => {
            let frame = load_rgb(&image)?;
            let mut tuner = HsvTuner::new(&color_view(&frame), config.color_params())?
                .with_observer(|n| log::debug!("tuner: {n} foreground pixels"));
            let current = tuner.range();
            let range = HsvRange::new(
                lower.unwrap_or(current.lower),
                upper.unwrap_or(current.upper),
            );
            let report = tuner.update(range);
            println!(
                "lower={:?} upper={:?}: {} of {} px ({:.2}%)",
                range.lower,
                range.upper,
                report.foreground_pixels,
                report.total_pixels,
                report.foreground_percentage
            );
            if let Some(path) = &preview {
                io::save_rgb(&debug::tuning_preview(&frame, &report.cleaned_mask), path)?;
            }
            let final_range = tuner.finish();
            if let Some(path) = &save_config {
                let tuned = MonitorConfig {
                    lower_hsv: final_range.lower,
                    upper_hsv: final_range.upper,
                    ..config
                };
                tuned.validate()?;
                tuned.write_json(path)?;
                log::info!("wrote tuned config to {}", path.display());
            }
            Ok(())
        }
        Cmd::InitConfig { path } => {
            MonitorConfig::default().write_json(&path)?;
            println!("wrote default config to {}", path.display());
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            let mut source = err.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}
