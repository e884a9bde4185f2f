//! Video frame source backed by the system `ffprobe`/`ffmpeg` binaries.
//!
//! Frames are streamed as raw `rgb24` over a pipe, one blocking read per frame, so the whole
//! clip never sits in memory at once.

use std::path::{Path, PathBuf};

use crate::{
    foundation::error::{LampreelError, LampreelResult},
    source::frame::{FrameSource, PixelGrid, SourceInfo},
};

/// Container metadata as reported by `ffprobe`.
#[derive(Clone, Debug)]
pub struct VideoSourceInfo {
    /// Probed file.
    pub source_path: PathBuf,
    /// Native frame width.
    pub width: u32,
    /// Native frame height.
    pub height: u32,
    /// Frame rate numerator.
    pub fps_num: u32,
    /// Frame rate denominator.
    pub fps_den: u32,
    /// Container duration, 0 when unknown.
    pub duration_sec: f64,
    /// Frame count from the stream header, if the container stores one.
    pub nb_frames: Option<u32>,
}

impl VideoSourceInfo {
    /// Frames per second, 0 when the rate is unknown.
    pub fn source_fps(&self) -> f64 {
        if self.fps_den == 0 {
            0.0
        } else {
            f64::from(self.fps_num) / f64::from(self.fps_den)
        }
    }

    /// Header frame count, else duration times rate.
    pub fn estimated_frame_count(&self) -> u32 {
        match self.nb_frames {
            Some(n) if n > 0 => n,
            _ => (self.duration_sec * self.source_fps()).round().max(0.0) as u32,
        }
    }
}

#[cfg(feature = "media-ffmpeg")]
pub fn probe_video(source_path: &Path) -> LampreelResult<VideoSourceInfo> {
    #[derive(serde::Deserialize)]
    struct ProbeStream {
        codec_type: Option<String>,
        width: Option<u32>,
        height: Option<u32>,
        r_frame_rate: Option<String>,
        nb_frames: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeFormat {
        duration: Option<String>,
    }
    #[derive(serde::Deserialize)]
    struct ProbeOut {
        streams: Vec<ProbeStream>,
        format: Option<ProbeFormat>,
    }

    let out = std::process::Command::new("ffprobe")
        .args([
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_streams",
            "-show_format",
        ])
        .arg(source_path)
        .output()
        .map_err(|e| LampreelError::source_unavailable(format!("failed to run ffprobe: {e}")))?;
    if !out.status.success() {
        return Err(LampreelError::source_unavailable(format!(
            "ffprobe failed for '{}': {}",
            source_path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    let parsed: ProbeOut = serde_json::from_slice(&out.stdout).map_err(|e| {
        LampreelError::source_unavailable(format!("ffprobe json parse failed: {e}"))
    })?;
    let video_stream = parsed
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| LampreelError::source_unavailable("no video stream found"))?;
    let width = video_stream
        .width
        .ok_or_else(|| LampreelError::source_unavailable("missing video width from ffprobe"))?;
    let height = video_stream
        .height
        .ok_or_else(|| LampreelError::source_unavailable("missing video height from ffprobe"))?;

    let (fps_num, fps_den) =
        parse_ff_ratio(video_stream.r_frame_rate.as_deref().unwrap_or("0/1")).unwrap_or((0, 1));
    let duration_sec = parsed
        .format
        .as_ref()
        .and_then(|f| f.duration.as_ref())
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(0.0);
    let nb_frames = video_stream
        .nb_frames
        .as_deref()
        .and_then(|s| s.parse::<u32>().ok());

    Ok(VideoSourceInfo {
        source_path: source_path.to_path_buf(),
        width,
        height,
        fps_num,
        fps_den,
        duration_sec,
        nb_frames,
    })
}

#[cfg(not(feature = "media-ffmpeg"))]
pub fn probe_video(_source_path: &Path) -> LampreelResult<VideoSourceInfo> {
    Err(LampreelError::source_unavailable(
        "video sources require the 'media-ffmpeg' feature",
    ))
}

type StderrDrain = std::thread::JoinHandle<std::io::Result<Vec<u8>>>;

/// Streaming decoder over an `ffmpeg` child process.
///
/// Stderr is drained on a helper thread so a chatty decoder cannot fill the pipe and stall
/// while frames are still being read from stdout.
#[derive(Debug)]
pub struct FfmpegFrameSource {
    video: VideoSourceInfo,
    child: Option<std::process::Child>,
    stdout: Option<std::io::BufReader<std::process::ChildStdout>>,
    stderr_drain: Option<StderrDrain>,
}

impl FfmpegFrameSource {
    /// Probe `path` and start the decoder.
    #[cfg(feature = "media-ffmpeg")]
    pub fn open(path: &Path) -> LampreelResult<Self> {
        use std::process::{Command, Stdio};

        let video = probe_video(path)?;
        if video.width == 0 || video.height == 0 {
            return Err(LampreelError::source_unavailable(
                "decoded video frame size is zero (invalid source dimensions)",
            ));
        }

        let child = Command::new("ffmpeg")
            .args(["-v", "error", "-i"])
            .arg(path)
            .args(["-an", "-f", "rawvideo", "-pix_fmt", "rgb24", "pipe:1"])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                LampreelError::source_unavailable(format!(
                    "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
                ))
            })?;

        tracing::info!(
            path = %path.display(),
            width = video.width,
            height = video.height,
            frames = video.estimated_frame_count(),
            "opened video source"
        );
        Self::attach(video, child)
    }

    #[cfg(not(feature = "media-ffmpeg"))]
    pub fn open(path: &Path) -> LampreelResult<Self> {
        probe_video(path).map(|video| Self {
            video,
            child: None,
            stdout: None,
            stderr_drain: None,
        })
    }

    /// Take over a spawned decoder that writes raw `rgb24` frames of `video`'s size to stdout.
    #[cfg_attr(not(feature = "media-ffmpeg"), allow(dead_code))]
    fn attach(video: VideoSourceInfo, mut child: std::process::Child) -> LampreelResult<Self> {
        use std::io::Read as _;

        let Some(stdout) = child.stdout.take() else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(LampreelError::source_unavailable(
                "failed to open ffmpeg stdout",
            ));
        };
        let stderr_drain = child.stderr.take().map(|mut stderr| {
            std::thread::spawn(move || {
                let mut stderr_bytes = Vec::new();
                stderr.read_to_end(&mut stderr_bytes)?;
                Ok(stderr_bytes)
            })
        });

        Ok(Self {
            video,
            child: Some(child),
            stdout: Some(std::io::BufReader::new(stdout)),
            stderr_drain,
        })
    }

    /// Probed container metadata.
    pub fn video(&self) -> &VideoSourceInfo {
        &self.video
    }

    fn finish(&mut self) -> LampreelResult<()> {
        drop(self.stdout.take());
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };
        let status = child.wait().map_err(|e| {
            LampreelError::source_unavailable(format!("failed to wait for ffmpeg: {e}"))
        })?;
        let stderr_bytes = match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| LampreelError::source_unavailable("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| {
                    LampreelError::source_unavailable(format!("ffmpeg stderr read failed: {e}"))
                })?,
            None => Vec::new(),
        };
        if !status.success() {
            return Err(LampreelError::source_unavailable(format!(
                "ffmpeg video decode failed for '{}' ({status}): {}",
                self.video.source_path.display(),
                String::from_utf8_lossy(&stderr_bytes).trim()
            )));
        }
        Ok(())
    }
}

impl FrameSource for FfmpegFrameSource {
    fn info(&self) -> SourceInfo {
        SourceInfo {
            width: self.video.width,
            height: self.video.height,
            frame_count: self.video.estimated_frame_count(),
        }
    }

    fn next_frame(&mut self) -> LampreelResult<Option<PixelGrid>> {
        use std::io::Read as _;

        let Some(reader) = self.stdout.as_mut() else {
            return Ok(None);
        };
        let frame_len = self.video.width as usize * self.video.height as usize * 3;
        let mut buf = vec![0u8; frame_len];
        let mut filled = 0usize;
        while filled < frame_len {
            let n = reader.read(&mut buf[filled..]).map_err(|e| {
                LampreelError::source_unavailable(format!("failed to read ffmpeg output: {e}"))
            })?;
            if n == 0 {
                break;
            }
            filled += n;
        }

        if filled == 0 {
            self.finish()?;
            return Ok(None);
        }
        if filled < frame_len {
            self.finish()?;
            return Err(LampreelError::source_unavailable(format!(
                "decoded video frame is truncated: got {filled} bytes, expected {frame_len}"
            )));
        }
        PixelGrid::new(self.video.width, self.video.height, buf).map(Some)
    }
}

impl Drop for FfmpegFrameSource {
    fn drop(&mut self) {
        drop(self.stdout.take());
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
        if let Some(handle) = self.stderr_drain.take() {
            let _ = handle.join();
        }
    }
}

#[cfg_attr(not(feature = "media-ffmpeg"), allow(dead_code))]
fn parse_ff_ratio(s: &str) -> Option<(u32, u32)> {
    let mut parts = s.split('/');
    let a = parts.next()?.parse::<u32>().ok()?;
    let b = parts.next()?.parse::<u32>().ok()?;
    if b == 0 {
        return None;
    }
    Some((a, b))
}

#[cfg(test)]
#[path = "../../tests/unit/source/media.rs"]
mod tests;
