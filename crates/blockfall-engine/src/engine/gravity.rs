use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How quickly gravity pulls the current block down as the score rises.
///
/// The delay between gravity ticks is
/// `max(min_delay, max_delay - score * delay_decrease)`, so difficulty grows
/// with the score until it bottoms out at `min_delay`.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use blockfall_engine::GravityCurve;
///
/// let gravity = GravityCurve::default();
/// assert_eq!(gravity.delay_for_score(0), Duration::from_millis(1000));
/// assert_eq!(gravity.delay_for_score(10), Duration::from_millis(750));
/// assert_eq!(gravity.delay_for_score(1000), Duration::from_millis(75));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GravityCurve {
    #[serde(with = "millis")]
    pub max_delay: Duration,
    #[serde(with = "millis")]
    pub min_delay: Duration,
    #[serde(with = "millis")]
    pub delay_decrease: Duration,
}

impl Default for GravityCurve {
    fn default() -> Self {
        Self {
            max_delay: Duration::from_millis(1000),
            min_delay: Duration::from_millis(75),
            delay_decrease: Duration::from_millis(25),
        }
    }
}

impl GravityCurve {
    /// Delay before the next gravity tick at the given score.
    #[must_use]
    pub fn delay_for_score(&self, score: usize) -> Duration {
        let score = u32::try_from(score).unwrap_or(u32::MAX);
        let decrease = self.delay_decrease.saturating_mul(score);
        self.max_delay.saturating_sub(decrease).max(self.min_delay)
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize as _, Deserializer, Serializer};

    pub(super) fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let millis = u64::try_from(duration.as_millis()).map_err(serde::ser::Error::custom)?;
        serializer.serialize_u64(millis)
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}
