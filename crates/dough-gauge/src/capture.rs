//! Single-frame acquisition from a camera command or a simulated still image.
//!
//! The device is never driven directly: a still-capture tool (for example
//! `libcamera-still`) writes a file that is then decoded. When the configured
//! simulated image exists, it is used instead, so the same binary runs on a
//! workstation and on the proofing box.

use crate::CaptureConfig;
use image::{ImageReader, RgbImage};
use std::{
    path::{Path, PathBuf},
    process::Command,
};

#[derive(thiserror::Error, Debug)]
pub enum CaptureError {
    #[error("no frame available from {0}")]
    FrameUnavailable(String),
    #[error("capture command `{command}` exited with {status}")]
    CommandFailed { command: String, status: String },
    #[error("failed to start capture command `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("capture command is empty")]
    EmptyCommand,
    #[error("no simulated image at {} and no capture command configured", .0.display())]
    NoDevice(PathBuf),
    #[error("failed to decode frame {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to save snapshot {}: {source}", path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Anything that can hand out frames one at a time.
///
/// `Ok(None)` means "no frame right now"; errors are reserved for a broken
/// source.
pub trait FrameSource {
    fn read_frame(&mut self) -> Result<Option<RgbImage>, CaptureError>;

    /// Human-readable name used in logs and errors.
    fn describe(&self) -> String;
}

/// Discard `warmup_frames` reads, then return the next one.
///
/// A failed warm-up read ends the warm-up early; a failed final read is an error.
pub fn capture_frame(
    source: &mut dyn FrameSource,
    warmup_frames: usize,
) -> Result<RgbImage, CaptureError> {
    for i in 0..warmup_frames {
        match source.read_frame() {
            Ok(Some(_)) => {}
            Ok(None) => {
                log::warn!("warm-up frame {} unavailable from {}", i, source.describe());
                break;
            }
            Err(e) => {
                log::warn!("warm-up frame {} failed: {}", i, e);
                break;
            }
        }
    }
    match source.read_frame()? {
        Some(frame) => {
            log::info!(
                "captured {}x{} frame from {}",
                frame.width(),
                frame.height(),
                source.describe()
            );
            Ok(frame)
        }
        None => Err(CaptureError::FrameUnavailable(source.describe())),
    }
}

fn decode(path: &Path) -> Result<Option<RgbImage>, CaptureError> {
    if !path.is_file() {
        return Ok(None);
    }
    let to_err = |source| CaptureError::Decode {
        path: path.to_path_buf(),
        source,
    };
    let img = ImageReader::open(path)
        .map_err(|e| to_err(image::ImageError::IoError(e)))?
        .with_guessed_format()
        .map_err(|e| to_err(image::ImageError::IoError(e)))?
        .decode()
        .map_err(to_err)?;
    Ok(Some(img.to_rgb8()))
}

/// Re-reads one image file on every call.
#[derive(Clone, Debug)]
pub struct StillImageSource {
    path: PathBuf,
}

impl StillImageSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl FrameSource for StillImageSource {
    fn read_frame(&mut self) -> Result<Option<RgbImage>, CaptureError> {
        decode(&self.path)
    }

    fn describe(&self) -> String {
        format!("still image {}", self.path.display())
    }
}

/// Runs an external still-capture command and decodes the file it writes.
#[derive(Clone, Debug)]
pub struct CommandSource {
    argv: Vec<String>,
    output: PathBuf,
}

/// Placeholder in the command line replaced by the output path.
pub const OUTPUT_PLACEHOLDER: &str = "{output}";

impl CommandSource {
    pub fn new(argv: Vec<String>, output: impl Into<PathBuf>) -> Result<Self, CaptureError> {
        if argv.is_empty() {
            return Err(CaptureError::EmptyCommand);
        }
        Ok(Self {
            argv,
            output: output.into(),
        })
    }

    fn command_line(&self) -> String {
        self.argv.join(" ")
    }
}

impl FrameSource for CommandSource {
    fn read_frame(&mut self) -> Result<Option<RgbImage>, CaptureError> {
        let output = self.output.to_string_lossy();
        let args: Vec<String> = self.argv[1..]
            .iter()
            .map(|a| a.replace(OUTPUT_PLACEHOLDER, &output))
            .collect();
        let status = Command::new(&self.argv[0])
            .args(&args)
            .status()
            .map_err(|source| CaptureError::Spawn {
                command: self.command_line(),
                source,
            })?;
        if !status.success() {
            return Err(CaptureError::CommandFailed {
                command: self.command_line(),
                status: status.to_string(),
            });
        }
        decode(&self.output)
    }

    fn describe(&self) -> String {
        format!("command `{}`", self.command_line())
    }
}

/// Where frames come from in this environment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AcquisitionMode {
    Simulated(PathBuf),
    Device,
}

impl AcquisitionMode {
    /// Simulation when the configured sample image exists, the device otherwise.
    pub fn detect(config: &CaptureConfig) -> Self {
        if config.simulated_image_path.is_file() {
            Self::Simulated(config.simulated_image_path.clone())
        } else {
            Self::Device
        }
    }

    pub fn open(&self, config: &CaptureConfig) -> Result<Box<dyn FrameSource>, CaptureError> {
        match self {
            Self::Simulated(path) => Ok(Box::new(StillImageSource::new(path.clone()))),
            Self::Device => match &config.command {
                Some(argv) => Ok(Box::new(CommandSource::new(
                    argv.clone(),
                    config.snapshot_path.clone(),
                )?)),
                None => Err(CaptureError::NoDevice(
                    config.simulated_image_path.clone(),
                )),
            },
        }
    }
}

/// Detect the environment, capture one frame and persist it to `snapshot_path`.
pub fn acquire(config: &CaptureConfig) -> Result<RgbImage, CaptureError> {
    let mode = AcquisitionMode::detect(config);
    log::info!("acquisition mode: {:?}", mode);
    let mut source = mode.open(config)?;
    let frame = capture_frame(source.as_mut(), config.warmup_frames)?;
    save_snapshot(&frame, &config.snapshot_path)?;
    Ok(frame)
}

pub fn save_snapshot(frame: &RgbImage, path: impl AsRef<Path>) -> Result<(), CaptureError> {
    let path = path.as_ref();
    frame.save(path).map_err(|source| CaptureError::Save {
        path: path.to_path_buf(),
        source,
    })?;
    log::debug!("snapshot saved to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    struct Scripted {
        frames: VecDeque<Result<Option<RgbImage>, CaptureError>>,
        reads: usize,
    }

    impl Scripted {
        fn new(frames: Vec<Result<Option<RgbImage>, CaptureError>>) -> Self {
            Self {
                frames: frames.into(),
                reads: 0,
            }
        }
    }

    impl FrameSource for Scripted {
        fn read_frame(&mut self) -> Result<Option<RgbImage>, CaptureError> {
            self.reads += 1;
            self.frames.pop_front().unwrap_or(Ok(None))
        }

        fn describe(&self) -> String {
            "scripted".to_string()
        }
    }

    fn frame(v: u8) -> RgbImage {
        RgbImage::from_pixel(2, 2, image::Rgb([v, v, v]))
    }

    #[test]
    fn returns_frame_after_warmup() {
        let mut src = Scripted::new((0..6).map(|i| Ok(Some(frame(i)))).collect());
        let out = capture_frame(&mut src, 5).unwrap();
        assert_eq!(src.reads, 6);
        assert_eq!(out.get_pixel(0, 0).0, [5, 5, 5]);
    }

    #[test]
    fn failed_warmup_read_stops_warmup() {
        let mut src = Scripted::new(vec![
            Ok(Some(frame(0))),
            Ok(None),
            Ok(Some(frame(9))),
        ]);
        let out = capture_frame(&mut src, 5).unwrap();
        assert_eq!(src.reads, 3);
        assert_eq!(out.get_pixel(1, 1).0, [9, 9, 9]);
    }

    #[test]
    fn missing_final_frame_is_an_error() {
        let mut src = Scripted::new(vec![Ok(Some(frame(0)))]);
        let err = capture_frame(&mut src, 1).unwrap_err();
        assert!(matches!(err, CaptureError::FrameUnavailable(_)));
    }

    #[test]
    fn detect_prefers_existing_simulated_image() {
        let dir = tempfile::tempdir().unwrap();
        let sample = dir.path().join("sample.png");
        let mut config = CaptureConfig {
            simulated_image_path: sample.clone(),
            snapshot_path: dir.path().join("snap.png"),
            ..CaptureConfig::default()
        };
        assert_eq!(AcquisitionMode::detect(&config), AcquisitionMode::Device);
        assert!(matches!(
            AcquisitionMode::Device.open(&config),
            Err(CaptureError::NoDevice(_))
        ));

        frame(42).save(&sample).unwrap();
        assert_eq!(
            AcquisitionMode::detect(&config),
            AcquisitionMode::Simulated(sample)
        );
        config.warmup_frames = 2;
        let out = acquire(&config).unwrap();
        assert_eq!(out.get_pixel(0, 0).0, [42, 42, 42]);
        assert!(config.snapshot_path.is_file());
    }

    #[cfg(unix)]
    #[test]
    fn command_source_decodes_written_file() {
        let dir = tempfile::tempdir().unwrap();
        let sample = dir.path().join("sample.png");
        frame(7).save(&sample).unwrap();
        let argv = vec![
            "cp".to_string(),
            sample.to_string_lossy().into_owned(),
            OUTPUT_PLACEHOLDER.to_string(),
        ];
        let mut src = CommandSource::new(argv, dir.path().join("shot.png")).unwrap();
        let out = capture_frame(&mut src, 0).unwrap();
        assert_eq!(out.get_pixel(1, 0).0, [7, 7, 7]);
    }

    #[cfg(unix)]
    #[test]
    fn failing_command_is_reported() {
        let mut src = CommandSource::new(vec!["false".to_string()], "never.png").unwrap();
        let err = capture_frame(&mut src, 0).unwrap_err();
        assert!(matches!(err, CaptureError::CommandFailed { .. }));
    }

    #[test]
    fn empty_command_is_rejected() {
        assert!(matches!(
            CommandSource::new(Vec::new(), "out.png"),
            Err(CaptureError::EmptyCommand)
        ));
    }
}
