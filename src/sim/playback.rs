//! ASCII video playback
//!
//! A text asset is cut into fixed-height frames which are drawn onto a raster
//! surface on a fixed timer. Only one session runs at a time; while it runs
//! (loading included) the rest of the scene is suspended.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{FRAME_INTERVAL_MS, FRAME_LINES};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    #[error("playback already in progress")]
    Busy,
    #[error("asset request failed with HTTP status {status}")]
    Fetch { status: u16 },
    #[error("asset request failed: {0}")]
    Network(String),
    #[error("no asset load in progress")]
    NotLoading,
}

/// Frames cut from a newline-delimited text asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsciiFrameSet {
    lines: Vec<String>,
    frame_lines: usize,
}

impl AsciiFrameSet {
    /// Split on '\n'. A trailing partial frame is dropped.
    pub fn parse(text: &str, frame_lines: usize) -> Self {
        let lines = text
            .split('\n')
            .map(|l| l.strip_suffix('\r').unwrap_or(l).to_string())
            .collect();
        Self {
            lines,
            frame_lines: frame_lines.max(1),
        }
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// `floor(line_count / frame_lines)`
    pub fn total_frames(&self) -> usize {
        self.lines.len() / self.frame_lines
    }

    pub fn frame(&self, index: usize) -> Option<&[String]> {
        if index >= self.total_frames() {
            return None;
        }
        let start = index * self.frame_lines;
        Some(&self.lines[start..start + self.frame_lines])
    }
}

/// Off-screen raster the frames are drawn onto
pub trait TextSurface {
    /// Fill with the background color
    fn clear(&mut self);
    /// Draw one line of monospace text at row `row`
    fn draw_line(&mut self, row: usize, text: &str);
    /// Flag the surface for re-upload to the GPU
    fn mark_dirty(&mut self);
}

/// CPU text surface (native preview and tests)
#[derive(Debug, Clone, Default)]
pub struct TextBuffer {
    pub rows: Vec<String>,
    pub dirty: bool,
    /// Number of `clear` calls, one per drawn frame
    pub frames_drawn: usize,
}

impl TextBuffer {
    /// Return and reset the dirty flag
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }
}

impl TextSurface for TextBuffer {
    fn clear(&mut self) {
        self.rows.clear();
        self.frames_drawn += 1;
    }

    fn draw_line(&mut self, row: usize, text: &str) {
        if self.rows.len() <= row {
            self.rows.resize(row + 1, String::new());
        }
        self.rows[row] = text.to_string();
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackPhase {
    Idle,
    /// Asset requested, waiting for the body
    Loading,
    /// `frame` is the next frame to draw
    Playing { frame: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackEvent {
    /// Last frame shown; engine is Idle again
    Finished { frames_shown: usize },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackEngine {
    phase: PlaybackPhase,
    frames: Option<AsciiFrameSet>,
    frame_lines: usize,
    interval_ms: f64,
    timer_ms: f64,
}

impl Default for PlaybackEngine {
    fn default() -> Self {
        Self::new(FRAME_LINES, FRAME_INTERVAL_MS)
    }
}

impl PlaybackEngine {
    pub fn new(frame_lines: usize, interval_ms: f64) -> Self {
        Self {
            phase: PlaybackPhase::Idle,
            frames: None,
            frame_lines,
            interval_ms,
            timer_ms: 0.0,
        }
    }

    pub fn phase(&self) -> PlaybackPhase {
        self.phase
    }

    /// Anything other than Idle
    pub fn is_active(&self) -> bool {
        self.phase != PlaybackPhase::Idle
    }

    pub fn is_playing(&self) -> bool {
        matches!(self.phase, PlaybackPhase::Playing { .. })
    }

    pub fn total_frames(&self) -> usize {
        self.frames.as_ref().map_or(0, |f| f.total_frames())
    }

    /// Start a session: Idle -> Loading. Rejected while a session runs.
    pub fn request(&mut self) -> Result<(), PlaybackError> {
        if self.is_active() {
            return Err(PlaybackError::Busy);
        }
        self.phase = PlaybackPhase::Loading;
        Ok(())
    }

    /// Deliver the fetched asset. On success playback starts at frame 0 and
    /// the frame count is returned; on failure the engine drops back to Idle.
    pub fn finish_loading(
        &mut self,
        body: Result<String, PlaybackError>,
    ) -> Result<usize, PlaybackError> {
        if self.phase != PlaybackPhase::Loading {
            return Err(PlaybackError::NotLoading);
        }

        let text = match body {
            Ok(text) => text,
            Err(e) => {
                self.reset();
                return Err(e);
            }
        };

        let frames = AsciiFrameSet::parse(&text, self.frame_lines);
        let total = frames.total_frames();
        self.frames = Some(frames);
        self.phase = PlaybackPhase::Playing { frame: 0 };
        self.timer_ms = 0.0;
        Ok(total)
    }

    /// Advance the frame timer. Each elapsed interval clears the surface,
    /// draws the next frame and marks it dirty.
    pub fn advance(&mut self, dt_ms: f64, surface: &mut dyn TextSurface) -> Option<PlaybackEvent> {
        let PlaybackPhase::Playing { mut frame } = self.phase else {
            return None;
        };

        self.timer_ms += dt_ms;
        while self.timer_ms >= self.interval_ms {
            self.timer_ms -= self.interval_ms;

            surface.clear();
            if let Some(lines) = self.frames.as_ref().and_then(|f| f.frame(frame)) {
                for (row, line) in lines.iter().enumerate() {
                    surface.draw_line(row, line);
                }
            }
            surface.mark_dirty();
            frame += 1;

            if frame >= self.total_frames() {
                self.reset();
                return Some(PlaybackEvent::Finished {
                    frames_shown: frame,
                });
            }
        }

        self.phase = PlaybackPhase::Playing { frame };
        None
    }

    fn reset(&mut self) {
        self.phase = PlaybackPhase::Idle;
        self.frames = None;
        self.timer_ms = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn asset(lines: usize) -> String {
        (0..lines)
            .map(|i| format!("line {}", i))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn playing(lines: usize) -> PlaybackEngine {
        let mut engine = PlaybackEngine::default();
        engine.request().expect("idle engine accepts a request");
        engine
            .finish_loading(Ok(asset(lines)))
            .expect("load succeeds");
        engine
    }

    #[test]
    fn test_frame_partition() {
        let frames = AsciiFrameSet::parse(&asset(100), 36);
        assert_eq!(frames.line_count(), 100);
        assert_eq!(frames.total_frames(), 2);
        assert_eq!(frames.frame(0).map(|f| f.len()), Some(36));
        assert_eq!(frames.frame(1).map(|f| f[0].as_str()), Some("line 36"));
        assert!(frames.frame(2).is_none());
    }

    #[test]
    fn test_trailing_newline_counts_as_a_line() {
        let frames = AsciiFrameSet::parse("a\r\nb\n", 1);
        assert_eq!(frames.line_count(), 3);
        assert_eq!(frames.frame(0).map(|f| f[0].as_str()), Some("a"));
        assert_eq!(frames.frame(2).map(|f| f[0].as_str()), Some(""));
    }

    #[test]
    fn test_hundred_lines_finish_after_two_ticks() {
        let mut engine = playing(100);
        let mut surface = TextBuffer::default();
        assert_eq!(engine.total_frames(), 2);

        assert_eq!(engine.advance(FRAME_INTERVAL_MS, &mut surface), None);
        assert_eq!(surface.frames_drawn, 1);
        assert_eq!(surface.rows[0], "line 0");
        assert!(surface.take_dirty());

        let event = engine.advance(FRAME_INTERVAL_MS, &mut surface);
        assert_eq!(event, Some(PlaybackEvent::Finished { frames_shown: 2 }));
        assert_eq!(surface.frames_drawn, 2);
        assert_eq!(surface.rows[0], "line 36");
        assert_eq!(surface.rows.len(), 36);
        assert_eq!(engine.phase(), PlaybackPhase::Idle);

        // No third frame, ever
        assert_eq!(engine.advance(FRAME_INTERVAL_MS * 10.0, &mut surface), None);
        assert_eq!(surface.frames_drawn, 2);
    }

    #[test]
    fn test_frames_wait_for_the_interval() {
        let mut engine = playing(36 * 3);
        let mut surface = TextBuffer::default();
        assert_eq!(engine.advance(FRAME_INTERVAL_MS - 1.0, &mut surface), None);
        assert_eq!(surface.frames_drawn, 0);
        assert!(!surface.dirty);
        engine.advance(1.0, &mut surface);
        assert_eq!(surface.frames_drawn, 1);
        assert_eq!(engine.phase(), PlaybackPhase::Playing { frame: 1 });
    }

    #[test]
    fn test_large_dt_catches_up_but_stops_at_end() {
        let mut engine = playing(36 * 3);
        let mut surface = TextBuffer::default();
        let event = engine.advance(FRAME_INTERVAL_MS * 50.0, &mut surface);
        assert_eq!(event, Some(PlaybackEvent::Finished { frames_shown: 3 }));
        assert_eq!(surface.frames_drawn, 3);
    }

    #[test]
    fn test_undersized_asset_finishes_on_first_tick() {
        let mut engine = playing(10);
        let mut surface = TextBuffer::default();
        assert_eq!(engine.total_frames(), 0);
        let event = engine.advance(FRAME_INTERVAL_MS, &mut surface);
        assert_eq!(event, Some(PlaybackEvent::Finished { frames_shown: 1 }));
        assert!(surface.rows.is_empty());
        assert!(!engine.is_active());
    }

    #[test]
    fn test_busy_guard() {
        let mut engine = PlaybackEngine::default();
        engine.request().expect("first request");
        assert_eq!(engine.request(), Err(PlaybackError::Busy));
        engine.finish_loading(Ok(asset(72))).expect("load");
        assert_eq!(engine.request(), Err(PlaybackError::Busy));
    }

    #[test]
    fn test_fetch_failure_returns_to_idle() {
        let mut engine = PlaybackEngine::default();
        engine.request().expect("request");
        let err = engine
            .finish_loading(Err(PlaybackError::Fetch { status: 404 }))
            .expect_err("should fail");
        assert_eq!(err, PlaybackError::Fetch { status: 404 });
        assert_eq!(engine.phase(), PlaybackPhase::Idle);
        assert_eq!(engine.total_frames(), 0);

        // A later trigger may retry
        assert!(engine.request().is_ok());
    }

    #[test]
    fn test_load_without_request_is_rejected() {
        let mut engine = PlaybackEngine::default();
        assert_eq!(
            engine.finish_loading(Ok(asset(72))),
            Err(PlaybackError::NotLoading)
        );
        assert_eq!(engine.phase(), PlaybackPhase::Idle);
    }

    #[test]
    fn test_loading_does_not_draw() {
        let mut engine = PlaybackEngine::default();
        engine.request().expect("request");
        let mut surface = TextBuffer::default();
        assert_eq!(engine.advance(10_000.0, &mut surface), None);
        assert_eq!(surface.frames_drawn, 0);
        assert_eq!(engine.phase(), PlaybackPhase::Loading);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            PlaybackError::Fetch { status: 500 }.to_string(),
            "asset request failed with HTTP status 500"
        );
        assert_eq!(PlaybackError::Busy.to_string(), "playback already in progress");
    }
}
