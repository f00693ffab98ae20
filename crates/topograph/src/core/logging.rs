//! Logging setup for the topology engine
//!
//! The library only emits `tracing` events: a span per graph build, layout run
//! and trace call, `debug!` stage summaries and `trace!` per skipped edge or
//! visited hop. Binaries install a subscriber with [`init_logging`].
//!
//! Level and format come from the arguments, then `TOPOGRAPH_LOG_LEVEL` /
//! `RUST_LOG` and `TOPOGRAPH_LOG_FORMAT`, then `info` / `compact`.
//!
//! ```bash
//! RUST_LOG="info,topograph::topology::trace=trace" topograph trace -i topology.json --from tag-a
//! ```

use anyhow::Result;
use std::str::FromStr;

#[cfg(not(target_arch = "wasm32"))]
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

/// Shape of emitted log lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// One line per event, no targets
    #[default]
    Compact,
    /// Multi-line with source locations and span enter/exit
    Pretty,
    /// One JSON object per event
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}

/// Install the global subscriber
///
/// Fails on an unknown format or when a subscriber is already installed.
/// Events are written to stderr, leaving stdout to command output.
pub fn init_logging(level: Option<&str>, format: Option<&str>) -> Result<()> {
    #[cfg(target_arch = "wasm32")]
    {
        // The browser console has its own level filter.
        let _ = (level, format);
        tracing_wasm::set_as_global_default();
        Ok(())
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let level = level
            .map(str::to_string)
            .or_else(|| std::env::var("TOPOGRAPH_LOG_LEVEL").ok())
            .or_else(|| std::env::var("RUST_LOG").ok())
            .unwrap_or_else(|| "info".to_string());
        let format = match format
            .map(str::to_string)
            .or_else(|| std::env::var("TOPOGRAPH_LOG_FORMAT").ok())
        {
            Some(name) => LogFormat::from_str(&name).map_err(anyhow::Error::msg)?,
            None => LogFormat::default(),
        };

        let filter = EnvFilter::try_new(&level).unwrap_or_else(|_| EnvFilter::new("info"));

        let compact = (format == LogFormat::Compact).then(|| {
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .compact()
        });
        let pretty = (format == LogFormat::Pretty).then(|| {
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_file(true)
                .with_line_number(true)
                .with_span_events(FmtSpan::ACTIVE)
                .pretty()
        });
        let json = (format == LogFormat::Json).then(|| {
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_span_events(FmtSpan::CLOSE)
                .json()
        });

        Registry::default()
            .with(filter)
            .with(compact)
            .with(pretty)
            .with(json)
            .try_init()?;
        Ok(())
    }
}
