//! Exp compiler back half: syntax tree to typed IR.
//!
//! - [`compile_program`]: the two-pass compiler
//! - [`analyze`]: read-only checks over the finished IR
//! - [`compile`]: the whole pipeline from source text, driven by
//!   [`CompileConfig`]
//!
//! User errors never abort a unit. They are collected as diagnostics and the
//! IR is still produced; only an [`exp_ir::InternalError`] stops compilation.

mod analyzer;
mod compiler;
mod pipeline;

pub use analyzer::analyze;
pub use compiler::{compile_program, MAIN_CLASS, MAIN_METHOD};
pub use pipeline::{compile, compile_str, CompileConfig, CompileError, CompileOutput};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Call this once at startup. Safe to call multiple times.
/// Enable with `RUST_LOG=exp_lower=debug` or `RUST_LOG=exp_grammar=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}
