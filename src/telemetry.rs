use tracing::Subscriber;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

const DEFAULT_FILTER: &str = "warn";

/// Installs the global subscriber. Logs go to stderr so stdout only carries
/// command output.
pub fn init_logging(config: &Config) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    subscriber(config, env_filter, std::io::stderr).try_init()?;

    tracing::debug!(
        environment = %config.environment,
        report_api = %config.report_api_url,
        "Logging initialized"
    );

    Ok(())
}

/// JSON lines in production, compact text otherwise.
pub(crate) fn subscriber<W>(
    config: &Config,
    env_filter: EnvFilter,
    writer: W,
) -> impl Subscriber + Send + Sync + use<W>
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let fmt_layer = if config.is_production() {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(writer)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .compact()
            .with_target(false)
            .with_writer(writer)
            .boxed()
    };

    tracing_subscriber::registry().with(env_filter).with(fmt_layer)
}
