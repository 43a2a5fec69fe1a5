use serde::{de::Error, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::time::Duration;

/// An interval written as `{n}s`, `{n}m` or `{n}h`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerInterval {
    Seconds(u32),
    Minutes(u32),
    Hours(u32),
}

impl SchedulerInterval {
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();
        let (num, unit) = match s.char_indices().last() {
            Some((idx, _)) if idx > 0 => s.split_at(idx),
            _ => return Err(format!("Invalid interval '{s}'")),
        };
        let num: u32 = num
            .parse()
            .map_err(|e| format!("Invalid interval '{s}': {e}"))?;

        match unit {
            "s" => Ok(SchedulerInterval::Seconds(num)),
            "m" => Ok(SchedulerInterval::Minutes(num)),
            "h" => Ok(SchedulerInterval::Hours(num)),
            _ => Err(format!("Invalid time unit in interval '{s}'")),
        }
    }

    pub fn as_duration(&self) -> Duration {
        match self {
            SchedulerInterval::Seconds(s) => Duration::from_secs(*s as u64),
            SchedulerInterval::Minutes(m) => Duration::from_secs(*m as u64 * 60),
            SchedulerInterval::Hours(h) => Duration::from_secs(*h as u64 * 3600),
        }
    }
}

impl fmt::Display for SchedulerInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchedulerInterval::Seconds(s) => write!(f, "{s}s"),
            SchedulerInterval::Minutes(m) => write!(f, "{m}m"),
            SchedulerInterval::Hours(h) => write!(f, "{h}h"),
        }
    }
}

impl<'de> Deserialize<'de> for SchedulerInterval {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: String = Deserialize::deserialize(deserializer)?;
        SchedulerInterval::parse(&s).map_err(D::Error::custom)
    }
}

impl Serialize for SchedulerInterval {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl From<SchedulerInterval> for clokwerk::Interval {
    fn from(val: SchedulerInterval) -> Self {
        match val {
            SchedulerInterval::Seconds(s) => clokwerk::Interval::Seconds(s),
            SchedulerInterval::Minutes(m) => clokwerk::Interval::Minutes(m),
            SchedulerInterval::Hours(h) => clokwerk::Interval::Hours(h),
        }
    }
}

impl From<SchedulerInterval> for chrono::Duration {
    fn from(val: SchedulerInterval) -> Self {
        match val {
            SchedulerInterval::Seconds(s) => chrono::Duration::seconds(s as i64),
            SchedulerInterval::Minutes(m) => chrono::Duration::minutes(m as i64),
            SchedulerInterval::Hours(h) => chrono::Duration::hours(h as i64),
        }
    }
}
