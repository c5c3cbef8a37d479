// This file is part of Reclaim Wallet.
//
// Reclaim Wallet is free software: you can redistribute it and/or modify it under the
// terms of the GNU Lesser General Public License as published by the Free Software
// Foundation, either version 3 of the License, or (at your option) any later version.
//
// Reclaim Wallet is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.
// See the GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along with Reclaim Wallet.
// If not, see https://www.gnu.org/licenses/.

use std::io;

pub use tracing::*;
use tracing::{subscriber, subscriber::Interest, Metadata, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_log::LogTracer;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, FmtSubscriber, Layer};

use super::LogsArgs;

const DEFAULT_FILTER: &str = "info";

/// Install the global subscriber. Logs are lost once the guard is dropped.
pub fn configure_logging(config: &LogsArgs) -> anyhow::Result<WorkerGuard> {
    let (writer, guard) = match &config.file {
        Some(log_file) => {
            tracing_appender::non_blocking(tracing_appender::rolling::never(".", log_file))
        }
        None => tracing_appender::non_blocking(io::stdout()),
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let builder = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(writer);

    if config.json {
        subscriber::set_global_default(builder.json().finish().with(NoisyTargetFilter))?;
    } else {
        subscriber::set_global_default(builder.pretty().finish().with(NoisyTargetFilter))?;
    }

    // `log` records from dependencies
    LogTracer::init()?;

    Ok(guard)
}

const NOISY_TARGETS: &[&str] = &["h2", "hyper", "reqwest", "tower"];

struct NoisyTargetFilter;

impl<S: Subscriber> Layer<S> for NoisyTargetFilter {
    fn register_callsite(&self, metadata: &'static Metadata<'static>) -> Interest {
        if NOISY_TARGETS
            .iter()
            .any(|target| metadata.target().starts_with(target))
        {
            Interest::never()
        } else {
            Interest::always()
        }
    }
}
