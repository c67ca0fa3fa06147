use std::{fmt, str::FromStr};

/// Raw-text diagnostic dumps exposed next to the JSON API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DebugKind {
    Heap,
    Goroutine,
    Metrics,
}

impl DebugKind {
    pub const ALL: [DebugKind; 3] = [DebugKind::Heap, DebugKind::Goroutine, DebugKind::Metrics];

    /// Path and query relative to the sinker base URL.
    pub fn path(&self) -> &'static str {
        match self {
            DebugKind::Heap => "/debug/pprof/heap?debug=1",
            DebugKind::Goroutine => "/debug/pprof/goroutine?debug=1",
            DebugKind::Metrics => "/metrics",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DebugKind::Heap => "heap",
            DebugKind::Goroutine => "goroutine",
            DebugKind::Metrics => "metrics",
        }
    }
}

impl fmt::Display for DebugKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DebugKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "heap" => Ok(DebugKind::Heap),
            "goroutine" | "goroutines" => Ok(DebugKind::Goroutine),
            "metrics" => Ok(DebugKind::Metrics),
            other => Err(format!(
                "invalid debug kind: '{other}' (valid: heap, goroutine, metrics)"
            )),
        }
    }
}
