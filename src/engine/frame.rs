use std::{fmt, time::Duration};

/// How long the last frame took to build and submit.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct FrameStats {
    pub duration: Duration,
    pub draw_calls: usize,
}

impl FrameStats {
    #[inline]
    pub fn millis(&self) -> f64 {
        self.duration.as_nanos() as f64 / 1_000_000.0
    }

    /// Frames per second to one decimal place, rounded down.
    #[inline]
    pub fn fps(&self) -> f64 {
        (10000.0 / self.millis()).floor() / 10.0
    }
}

impl fmt::Display for FrameStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, " ms: {} fps: {}", self.millis().floor(), self.fps())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn stats(micros: u64) -> FrameStats {
        FrameStats {
            duration: Duration::from_micros(micros),
            draw_calls: 0,
        }
    }

    #[test]
    fn text() {
        assert_eq!(" ms: 16 fps: 60.6", stats(16_500).to_string());
        assert_eq!(" ms: 3 fps: 333.3", stats(3_000).to_string());
        assert_eq!(" ms: 40 fps: 25", stats(40_000).to_string());
    }

    #[test]
    fn instant_frames_do_not_panic() {
        let text = stats(0).to_string();
        assert!(text.starts_with(" ms: 0 fps: "));
        assert!(stats(0).fps().is_infinite());
    }
}
