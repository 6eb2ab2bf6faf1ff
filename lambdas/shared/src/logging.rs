//! Tracing setup shared by every Lambda binary

use tracing_subscriber::EnvFilter;

const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Install the global subscriber
///
/// Level comes from `RUST_LOG` (default `info`). CloudWatch adds its own
/// timestamps, so none are printed. `LOG_FORMAT=json` switches to JSON lines.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var(LOG_FORMAT_ENV)
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time();

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
