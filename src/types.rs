//! Type definitions for the replay viewer state.

use std::time::Duration;

use clap::ValueEnum;
use serde::Deserialize;

use crate::animation::ANIMATION_FRAME_DELAY_MS;

/// Playback state of the replay.
///
/// This enumeration holds whether the recorded run advances on its own or waits for the user to
/// step through it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Playback {
    /// Frames advance on a timer.
    Playing,
    /// Frames only advance on request.
    Paused,
}

impl Playback {
    /// Returns the other playback state.
    pub(crate) const fn toggled(self) -> Self {
        match self {
            Self::Playing => Self::Paused,
            Self::Paused => Self::Playing,
        }
    }

    /// Returns the label shown in the status line.
    pub(crate) const fn repr(self) -> &'static str {
        match self {
            Self::Playing => "playing",
            Self::Paused => "paused",
        }
    }
}

/// Replay speed levels.
///
/// Each level scales [`ANIMATION_FRAME_DELAY_MS`], the delay between two frames at normal speed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum Speed {
    /// Four times the normal delay.
    Slowest,
    /// Twice the normal delay.
    Slow,
    /// The normal delay.
    #[default]
    Normal,
    /// Half the normal delay.
    Fast,
    /// An eighth of the normal delay.
    Fastest,
}

impl Speed {
    /// Returns the delay between two frames at this speed.
    pub(crate) const fn delay(self) -> Duration {
        Duration::from_millis(match self {
            Self::Slowest => ANIMATION_FRAME_DELAY_MS * 4,
            Self::Slow => ANIMATION_FRAME_DELAY_MS * 2,
            Self::Normal => ANIMATION_FRAME_DELAY_MS,
            Self::Fast => ANIMATION_FRAME_DELAY_MS / 2,
            Self::Fastest => ANIMATION_FRAME_DELAY_MS / 8,
        })
    }

    /// Returns the next faster level, staying put at the fastest one.
    pub(crate) const fn faster(self) -> Self {
        match self {
            Self::Slowest => Self::Slow,
            Self::Slow => Self::Normal,
            Self::Normal => Self::Fast,
            Self::Fast | Self::Fastest => Self::Fastest,
        }
    }

    /// Returns the next slower level, staying put at the slowest one.
    pub(crate) const fn slower(self) -> Self {
        match self {
            Self::Slowest | Self::Slow => Self::Slowest,
            Self::Normal => Self::Slow,
            Self::Fast => Self::Normal,
            Self::Fastest => Self::Fast,
        }
    }

    /// Returns the label shown in the status line.
    pub(crate) const fn repr(self) -> &'static str {
        match self {
            Self::Slowest => "slowest",
            Self::Slow => "slow",
            Self::Normal => "normal",
            Self::Fast => "fast",
            Self::Fastest => "fastest",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_playback_toggles() {
        assert_eq!(Playback::Playing.toggled(), Playback::Paused, "pause");
        assert_eq!(Playback::Paused.toggled(), Playback::Playing, "resume");
        assert_eq!(Playback::Paused.repr(), "paused", "label");
    }

    #[test]
    fn test_speed_levels_saturate() {
        assert_eq!(Speed::Fastest.faster(), Speed::Fastest, "no level above fastest");
        assert_eq!(Speed::Slowest.slower(), Speed::Slowest, "no level below slowest");
        assert_eq!(Speed::Normal.faster().slower(), Speed::Normal, "round trip");
    }

    #[test]
    fn test_faster_levels_have_shorter_delays() {
        let mut speed = Speed::Slowest;
        while speed != Speed::Fastest {
            let next = speed.faster();
            assert!(next.delay() < speed.delay(), "{next:?} is quicker than {speed:?}");
            speed = next;
        }
        assert_eq!(
            Speed::Normal.delay(),
            Duration::from_millis(ANIMATION_FRAME_DELAY_MS),
            "normal speed uses the base delay"
        );
    }
}
