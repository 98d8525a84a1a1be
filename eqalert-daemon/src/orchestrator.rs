//! Daemon assembly, channel wiring, and lifecycle management.
//!
//! ```text
//! reader -> feeder -> mpsc<RawLine> -> ClassificationPipeline -> mpsc<ClassifiedEvent> -> writer
//!                                              |
//!                                     ChannelSink -> diagnostic logger
//! ```
//!
//! # Shutdown
//!
//! The daemon stops when either the input reaches EOF (the worker drains
//! what is queued and exits) or a shutdown signal arrives (the worker is
//! cancelled and queued lines are abandoned).

use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use serde::Serialize;
use tokio::io::{AsyncBufRead, AsyncWrite};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use eqalert_core::config::EqAlertConfig;
use eqalert_core::event::ClassifiedEvent;
use eqalert_core::pipeline::Pipeline;
use eqalert_core::types::RawLine;
use eqalert_log_pipeline::diagnostic::{ChannelSink, Diagnostic, DiagnosticSink, TracingSink};
use eqalert_log_pipeline::{
    ClassificationPipeline, ClassificationPipelineBuilder, PipelineConfig, StatsSnapshot,
    WorkerExit,
};

use crate::{feeder, metrics_server, writer};

/// Load configuration from a file, or from defaults plus environment
/// variables when no path is given.
pub async fn load_config(path: Option<&Path>) -> Result<EqAlertConfig> {
    let config = match path {
        Some(path) => EqAlertConfig::load(path)
            .await
            .map_err(|e| anyhow::anyhow!("failed to load config {}: {}", path.display(), e))?,
        None => EqAlertConfig::from_env()
            .map_err(|e| anyhow::anyhow!("invalid configuration: {}", e))?,
    };
    Ok(config)
}

/// Apply CLI flag overrides (highest precedence) and re-validate.
pub fn apply_cli_overrides(
    config: &mut EqAlertConfig,
    log_level: Option<String>,
    log_format: Option<String>,
) -> Result<()> {
    if let Some(level) = log_level {
        config.general.log_level = level;
    }
    if let Some(format) = log_format {
        config.general.log_format = format;
    }
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("config validation failed: {}", e))
}

/// Why the daemon stopped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum StopReason {
    /// Input reached EOF and every queued line was processed.
    InputExhausted,
    /// A shutdown signal was received.
    Signal { name: &'static str },
}

/// Summary logged when the daemon exits.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub stop: StopReason,
    pub lines_read: u64,
    pub events_written: u64,
    pub stats: StatsSnapshot,
    pub diagnostics_dropped: u64,
    pub uptime_secs: u64,
}

/// The assembled daemon.
pub struct Daemon {
    config: EqAlertConfig,
    pipeline: ClassificationPipeline,
    line_tx: mpsc::Sender<RawLine>,
    event_rx: mpsc::Receiver<ClassifiedEvent>,
    diagnostic_rx: mpsc::Receiver<Diagnostic>,
    diagnostic_sink: Arc<ChannelSink>,
    cancel: CancellationToken,
}

impl Daemon {
    /// Build the daemon from an already-loaded configuration.
    ///
    /// Installs the metrics recorder when `[metrics] enabled = true`.
    pub fn build_from_config(config: EqAlertConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| anyhow::anyhow!("config validation failed: {}", e))?;

        if config.metrics.enabled {
            metrics_server::install_metrics_recorder(&config.metrics)?;
        }

        let pipeline_config = PipelineConfig::from_core(&config.classifier);
        let (line_tx, line_rx) = mpsc::channel(pipeline_config.line_channel_capacity);
        let (diagnostic_sink, diagnostic_rx) =
            ChannelSink::new(pipeline_config.diagnostic_channel_capacity);
        let diagnostic_sink = Arc::new(diagnostic_sink);
        let cancel = CancellationToken::new();

        let (pipeline, event_rx) = ClassificationPipelineBuilder::new()
            .config(pipeline_config)
            .line_receiver(line_rx)
            .diagnostic_sink(diagnostic_sink.clone())
            .cancel_token(cancel.clone())
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build classification pipeline: {}", e))?;
        let event_rx = event_rx.ok_or_else(|| anyhow::anyhow!("pipeline has no event receiver"))?;

        tracing::info!(
            line_capacity = config.classifier.line_channel_capacity,
            event_capacity = config.classifier.event_channel_capacity,
            "daemon initialized"
        );

        Ok(Self {
            config,
            pipeline,
            line_tx,
            event_rx,
            diagnostic_rx,
            diagnostic_sink,
            cancel,
        })
    }

    /// Loaded configuration.
    pub fn config(&self) -> &EqAlertConfig {
        &self.config
    }

    /// Run until EOF or SIGTERM/SIGINT.
    pub async fn run<R, W>(self, reader: R, output: W) -> Result<RunSummary>
    where
        R: AsyncBufRead + Unpin + Send + 'static,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let signals = ShutdownSignal::install()?;
        self.run_until(reader, output, signals.recv()).await
    }

    /// Run until EOF or until `shutdown` resolves with the trigger's name.
    pub async fn run_until<R, W, S>(self, reader: R, output: W, shutdown: S) -> Result<RunSummary>
    where
        R: AsyncBufRead + Unpin + Send + 'static,
        W: AsyncWrite + Unpin + Send + 'static,
        S: Future<Output = &'static str>,
    {
        let Self {
            config: _,
            mut pipeline,
            line_tx,
            event_rx,
            diagnostic_rx,
            diagnostic_sink,
            cancel,
        } = self;
        let start_time = Instant::now();

        let writer_task = tokio::spawn(async move {
            let mut output = output;
            writer::write_events(event_rx, &mut output).await
        });
        let diagnostic_task = tokio::spawn(log_diagnostics(diagnostic_rx));

        pipeline.start().await?;

        let feeder_task = tokio::spawn(feeder::forward_lines(
            reader,
            line_tx,
            cancel.child_token(),
        ));

        tracing::info!("classifying log lines");

        enum Outcome {
            Signal(&'static str),
            Drained(Result<WorkerExit, eqalert_core::error::EqAlertError>),
        }

        tokio::pin!(shutdown);
        let outcome = tokio::select! {
            name = &mut shutdown => Outcome::Signal(name),
            exit = pipeline.wait() => Outcome::Drained(exit),
        };

        let mut worker_error = None;
        let stop = match outcome {
            Outcome::Signal(name) => {
                tracing::info!(signal = name, "shutdown signal received");
                cancel.cancel();
                if let Err(e) = pipeline.stop().await {
                    tracing::error!(error = %e, "failed to stop classification pipeline");
                }
                StopReason::Signal { name }
            }
            Outcome::Drained(Ok(exit)) => {
                tracing::info!(exit = ?exit, "input exhausted");
                StopReason::InputExhausted
            }
            Outcome::Drained(Err(e)) => {
                tracing::error!(error = %e, "classification worker failed");
                worker_error = Some(e);
                StopReason::InputExhausted
            }
        };
        // The worker may also exit because the writer went away; unblock the feeder.
        cancel.cancel();

        let lines_read = match feeder_task.await {
            Ok(Ok(n)) => n,
            Ok(Err(e)) => {
                tracing::error!(error = %e, "failed to read input");
                0
            }
            Err(e) => {
                tracing::error!(error = %e, "line feeder task failed");
                0
            }
        };

        // Closing the pipeline closes the event and diagnostic channels.
        let stats = pipeline.stats();
        drop(pipeline);
        let diagnostics_dropped = diagnostic_sink.dropped_count();
        drop(diagnostic_sink);

        let written = writer_task.await;
        if let Err(e) = diagnostic_task.await {
            tracing::warn!(error = %e, "diagnostic logger task failed");
        }

        if let Some(e) = worker_error {
            return Err(anyhow::anyhow!("classification pipeline failed: {}", e));
        }
        let events_written = written
            .map_err(|e| anyhow::anyhow!("event writer task failed: {}", e))?
            .map_err(|e| anyhow::anyhow!("failed to write events: {}", e))?;

        let summary = RunSummary {
            stop,
            lines_read,
            events_written,
            stats,
            diagnostics_dropped,
            uptime_secs: start_time.elapsed().as_secs(),
        };
        tracing::info!(
            lines_read = summary.lines_read,
            events_written = summary.events_written,
            rejected = summary.stats.rejected,
            faults = summary.stats.faults,
            diagnostics_dropped = summary.diagnostics_dropped,
            "daemon stopped"
        );
        Ok(summary)
    }
}

/// Forward channel diagnostics to the tracing log.
async fn log_diagnostics(mut rx: mpsc::Receiver<Diagnostic>) -> u64 {
    let mut count = 0u64;
    while let Some(diagnostic) = rx.recv().await {
        TracingSink.record(diagnostic);
        count += 1;
    }
    count
}

/// SIGTERM / SIGINT listener, installed before the pipeline starts.
struct ShutdownSignal {
    #[cfg(unix)]
    sigterm: tokio::signal::unix::Signal,
    #[cfg(unix)]
    sigint: tokio::signal::unix::Signal,
}

impl ShutdownSignal {
    #[cfg(unix)]
    fn install() -> Result<Self> {
        use tokio::signal::unix::{SignalKind, signal};

        let sigterm = signal(SignalKind::terminate())
            .map_err(|e| anyhow::anyhow!("failed to install SIGTERM handler: {}", e))?;
        let sigint = signal(SignalKind::interrupt())
            .map_err(|e| anyhow::anyhow!("failed to install SIGINT handler: {}", e))?;
        Ok(Self { sigterm, sigint })
    }

    #[cfg(not(unix))]
    fn install() -> Result<Self> {
        Ok(Self {})
    }

    #[cfg(unix)]
    async fn recv(mut self) -> &'static str {
        tokio::select! {
            _ = self.sigterm.recv() => "SIGTERM",
            _ = self.sigint.recv() => "SIGINT",
        }
    }

    #[cfg(not(unix))]
    async fn recv(self) -> &'static str {
        match tokio::signal::ctrl_c().await {
            Ok(()) => "ctrl-c",
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for ctrl-c");
                std::future::pending().await
            }
        }
    }
}
