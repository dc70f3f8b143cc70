use std::fmt;

/// Presence flags from one probe of the folder around a source file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarkerProbe {
    pub source: bool,
    pub tmp: bool,
    pub txt: bool,
    pub err: bool,
}

/// Job state derived from sentinel artifacts. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobState {
    Ready,
    InProgress,
    Done,
    Error,
    Missing,
}

impl JobState {
    pub fn from_probe(probe: &MarkerProbe) -> Self {
        if !probe.source {
            JobState::Missing
        } else if probe.txt {
            JobState::Done
        } else if probe.tmp {
            JobState::InProgress
        } else if probe.err {
            JobState::Error
        } else {
            JobState::Ready
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JobState::Ready => "READY",
            JobState::InProgress => "IN_PROGRESS",
            JobState::Done => "DONE",
            JobState::Error => "ERROR",
            JobState::Missing => "MISSING",
        }
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
