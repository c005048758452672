//! Tracing setup for the adapter test suites.
//!
//! The adapter's unit tests and every `tests/*.rs` binary call [`init`] from a
//! `ctor` hook, so adapter debug events, redacted SQL statements and
//! dropped-operator warnings show up in captured test output.

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

static INITIALIZED: OnceCell<()> = OnceCell::new();

/// Install the test subscriber once per process.
///
/// Filter: `TEST_LOG`, then `RUST_LOG`, then `warn`. Use
/// `TEST_LOG=auth_sea_adapter=debug` to see each statement the SeaORM
/// repositories build. `TEST_LOG_JSON=1` switches to one JSON object per event.
pub fn init() {
    INITIALIZED.get_or_init(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        let as_json = std::env::var("TEST_LOG_JSON")
            .is_ok_and(|v| v == "1" || v.eq_ignore_ascii_case("true"));

        let builder = fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time();

        // Another harness may have installed a subscriber already.
        let _ = if as_json {
            builder.json().try_init()
        } else {
            builder.try_init()
        };
    });
}
