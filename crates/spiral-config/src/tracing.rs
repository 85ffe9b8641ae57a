// SPDX-License-Identifier: AGPL-3.0-or-later
// © 2025 Ryo ∴ SpiralArchitect (kishkavsesvit@icloud.com)
// Part of SpiralTorch — Licensed under AGPL-3.0-or-later.
// Unauthorized derivative works or closed redistribution prohibited under AGPL §13.

use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

static OUTCOME: OnceLock<Result<Subscriber, InitError>> = OnceLock::new();
static CHROME_GUARD: OnceLock<Mutex<Option<tracing_chrome::FlushGuard>>> = OnceLock::new();

/// Which subscriber ends up serving the process after [`init_tracing`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subscriber {
    /// This call installed the scri subscriber.
    Installed,
    /// A subscriber was already in place, ours from an earlier call or one
    /// set by the embedding application.
    AlreadyPresent,
}

/// Ensures a global subscriber is in place for the scri transforms.
///
/// `RUST_LOG` drives the filter (default `info`). When `SCRI_TRACE_CHROME`
/// names a file, a Chrome trace is written there as well and the flush guard
/// is parked for the lifetime of the process.
///
/// Safe to call any number of times. Only the first call does any work; an
/// unreadable `SCRI_TRACE_CHROME` is the one failure, and it is reported on
/// every call.
pub fn init_tracing() -> Result<Subscriber, InitError> {
    let mut first = false;
    let outcome = OUTCOME.get_or_init(|| {
        first = true;
        install()
    });
    match outcome {
        Ok(_) if !first => Ok(Subscriber::AlreadyPresent),
        other => other.clone(),
    }
}

fn install() -> Result<Subscriber, InitError> {
    let ansi = std::io::stderr().is_terminal();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_ansi(ansi)
        .with_writer(std::io::stderr);

    let installed = match chrome_trace_path()? {
        Some(path) => {
            let (chrome_layer, guard) = tracing_chrome::ChromeLayerBuilder::new()
                .file(path)
                .include_args(true)
                .build();
            let installed = Registry::default()
                .with(filter)
                .with(fmt_layer)
                .with(chrome_layer)
                .try_init()
                .is_ok();
            if installed {
                let slot = CHROME_GUARD.get_or_init(|| Mutex::new(None));
                if let Ok(mut slot) = slot.lock() {
                    *slot = Some(guard);
                }
            }
            installed
        }
        None => Registry::default()
            .with(filter)
            .with(fmt_layer)
            .try_init()
            .is_ok(),
    };

    // `try_init` only fails when a global dispatcher is already set.
    Ok(if installed {
        Subscriber::Installed
    } else {
        Subscriber::AlreadyPresent
    })
}

fn chrome_trace_path() -> Result<Option<PathBuf>, InitError> {
    match std::env::var("SCRI_TRACE_CHROME") {
        Ok(raw) if !raw.trim().is_empty() => Ok(Some(PathBuf::from(raw))),
        Ok(_) => Ok(None),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(err) => Err(InitError::Env(err)),
    }
}

/// Errors emitted when configuring the tracing subscriber.
#[derive(Debug, Clone, thiserror::Error)]
pub enum InitError {
    #[error("failed to read SCRI_TRACE_CHROME: {0}")]
    Env(std::env::VarError),
}
