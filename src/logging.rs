//! Tracing and panic logging for native (non-browser) runs.
//!
//! Browser builds install their console logging through
//! `flexdom_web::logging` instead.

use std::panic::{self, PanicHookInfo};
use std::sync::Once;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

const DEFAULT_FILTER: &str = "info";

static TRACING_INSTALLED: Once = Once::new();
static PANIC_HOOK_INSTALLED: Once = Once::new();

/// Installs a stderr tracing subscriber filtered by `RUST_LOG` (default
/// `info`) and routes panics through tracing. Idempotent.
pub fn init() {
    init_with_filter(DEFAULT_FILTER);
}

/// Like [`init`], with the filter used when `RUST_LOG` is unset.
pub fn init_with_filter(default_filter: &str) {
    TRACING_INSTALLED.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
        let console = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_filter(filter);

        if tracing_subscriber::registry().with(console).try_init().is_err() {
            eprintln!("flexdom: a tracing subscriber is already installed");
        }
    });
    install_panic_hook();
}

fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info: &PanicHookInfo<'_>| {
            tracing_panic::panic_hook(info);
            previous(info);
        }));
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        init();
        init_with_filter("debug");
        tracing::info!("logging installed");
    }
}
