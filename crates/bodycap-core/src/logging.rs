use indicatif::ProgressStyle;
use tracing::level_filters::LevelFilter;
use tracing_indicatif::IndicatifLayer;
use tracing_subscriber::{
    filter::Directive, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

// The binary and every library crate of the recorder.
const TARGETS: [&str; 4] = ["bodycap", "bodycap_core", "bodycap_zed", "bodycap_recorder"];

/// Installs the global subscriber. Log lines go through the indicatif writer so
/// they don't tear the capture progress bar. `debug` lowers the recorder's own
/// targets to DEBUG without touching the SDK-facing dependencies.
pub fn enable_tracing(debug: bool) {
    let progress = IndicatifLayer::new().with_max_progress_bars(1, Some(ProgressStyle::default_bar()));

    let mut filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env()
        .expect("Failed to parse environment filter");
    if debug {
        for directive in debug_directives() {
            filter = filter.add_directive(directive);
        }
    }

    let console = tracing_subscriber::fmt::layer()
        .with_target(debug)
        .with_writer(progress.get_stderr_writer());

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(progress)
        .init();
}

fn debug_directives() -> impl Iterator<Item = Directive> {
    TARGETS.into_iter().map(|target| {
        format!("{target}=debug")
            .parse()
            .expect("Failed to parse directive")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    pub fn test_debug_covers_binary_and_libraries() {
        let directives: Vec<String> = debug_directives().map(|d| d.to_string()).collect();
        assert_eq!(
            directives,
            vec![
                "bodycap=debug",
                "bodycap_core=debug",
                "bodycap_zed=debug",
                "bodycap_recorder=debug",
            ]
        );
    }
}
