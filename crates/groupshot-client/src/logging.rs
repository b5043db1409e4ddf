//! Tracing setup for the embedding application shell.

use tracing_subscriber::{fmt, EnvFilter};

/// Initialise the global tracing subscriber.
///
/// Honours `RUST_LOG` when set; otherwise defaults to debug for the client
/// core and info for the supporting crates.  Call once at startup.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(
            "groupshot_client=debug,groupshot_media=info,groupshot_store=info,groupshot_remote=info,warn",
        )
    });

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}
