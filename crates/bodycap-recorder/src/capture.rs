use bodycap_core::{config::CaptureConfig, error::ConfigError, joint::JointSchema};
use bodycap_zed::{BodyTracker, Poll, Session};
use indicatif::ProgressStyle;
use std::{
    future::Future,
    io::{self, Write},
    time::Duration,
};
use tokio::{
    select,
    time::{self, Instant, MissedTickBehavior},
};
use tracing::{debug, info, instrument, Span};
use tracing_indicatif::span_ext::IndicatifSpanExt;

use crate::{
    error::CaptureError,
    sink::{CsvSink, Sample},
};

/// Sampling schedule of a recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapturePlan {
    pub interval: Duration,
    pub duration: Duration,
    /// Seconds to count down before the first tick.
    pub countdown: u32,
}

impl CapturePlan {
    pub fn from_config(config: &CaptureConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            interval: config.interval()?,
            duration: config.duration()?,
            countdown: config.countdown,
        })
    }

    /// Number of ticks `k` with `k * interval < duration`.
    pub fn ticks(&self) -> u32 {
        let interval = self.interval.as_nanos();
        if interval == 0 {
            return 0;
        }
        let ticks = self.duration.as_nanos().div_ceil(interval);
        u32::try_from(ticks).unwrap_or(u32::MAX)
    }

    /// Elapsed recording time stamped on tick `tick`.
    pub fn timestep(&self, tick: u32) -> Duration {
        self.interval.saturating_mul(tick)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptureSummary {
    pub ticks: u32,
    pub samples: usize,
    pub skipped_grab: u32,
    pub skipped_retrieve: u32,
    pub skipped_stale: u32,
    pub skipped_empty: u32,
    /// Wall-clock time from the first tick to the end of the loop.
    pub elapsed: Duration,
    pub interrupted: bool,
}

/// Opens the session and the output file, records, then releases both.
#[instrument(skip_all, fields(output = %config.output.display()))]
pub async fn run<T, F>(
    tracker: T,
    config: &CaptureConfig,
    shutdown: F,
) -> Result<CaptureSummary, CaptureError>
where
    T: BodyTracker,
    F: Future<Output = ()>,
{
    config.validate()?;
    let schema = config.schema()?;
    let plan = CapturePlan::from_config(config)?;

    let mut session = Session::open(tracker, config)?;
    let mut sink = CsvSink::create(&config.output, &schema, config.joint_columns)?;

    let summary = record(
        &mut session,
        &mut sink,
        &schema,
        &plan,
        &mut io::stdout(),
        shutdown,
    )
    .await?;
    session.close();

    info!(
        rows = sink.rows(),
        ticks = summary.ticks,
        samples = summary.samples,
        skipped_grab = summary.skipped_grab,
        skipped_retrieve = summary.skipped_retrieve,
        skipped_stale = summary.skipped_stale,
        skipped_empty = summary.skipped_empty,
        interrupted = summary.interrupted,
        "capture finished"
    );
    Ok(summary)
}

/// Polls `session` once per tick and appends the first tracked body to `sink`.
///
/// Ticks where the grab or retrieve fails, the result is stale, or nobody is
/// in view produce no row. The countdown, every tick's timestep and the
/// elapsed time go to `console`. Resolving `shutdown` ends the recording early.
#[instrument(skip_all, fields(ticks = plan.ticks()))]
pub async fn record<T, W, C, F>(
    session: &mut Session<T>,
    sink: &mut CsvSink<W>,
    schema: &JointSchema,
    plan: &CapturePlan,
    console: &mut C,
    shutdown: F,
) -> Result<CaptureSummary, CaptureError>
where
    T: BodyTracker,
    W: Write,
    C: Write,
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let mut summary = CaptureSummary::default();

    if plan.countdown > 0 {
        writeln!(console, "Starting record in:")?;
        for remaining in (1..=plan.countdown).rev() {
            writeln!(console, " {remaining}")?;
            select! {
                biased;
                _ = &mut shutdown => {
                    info!("capture cancelled during countdown");
                    summary.interrupted = true;
                    return Ok(summary);
                }
                _ = time::sleep(Duration::from_secs(1)) => {}
            }
        }
    }
    writeln!(console, "Recording...")?;

    let ticks = plan.ticks();
    let span = Span::current();
    span.pb_set_style(&ProgressStyle::default_bar());
    span.pb_set_length(u64::from(ticks));

    let mut interval = time::interval(plan.interval);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let start = Instant::now();

    for tick in 0..ticks {
        select! {
            biased;
            _ = &mut shutdown => {
                info!("capture interrupted");
                summary.interrupted = true;
                break;
            }
            _ = interval.tick() => {}
        }

        let timestep = plan.timestep(tick);
        summary.ticks += 1;
        match session.poll() {
            Poll::GrabFailed(e) => {
                debug!(error=%e, "grab failed");
                summary.skipped_grab += 1;
            }
            Poll::RetrieveFailed(e) => {
                debug!(error=%e, "retrieve failed");
                summary.skipped_retrieve += 1;
            }
            Poll::Bodies(bodies) if !bodies.is_new => summary.skipped_stale += 1,
            // Only the first body is recorded, in whatever order the service lists them.
            Poll::Bodies(bodies) => match bodies.body_list.first() {
                Some(body) => {
                    sink.append(&Sample::from_body(timestep, body, schema))?;
                    summary.samples += 1;
                }
                None => summary.skipped_empty += 1,
            },
        }
        writeln!(console, "{}", timestep.as_secs_f64())?;
        span.pb_inc(1);
    }

    sink.flush()?;
    summary.elapsed = start.elapsed();
    writeln!(console, "Elapsed: {}", summary.elapsed.as_secs_f64())?;
    console.flush()?;
    Ok(summary)
}
