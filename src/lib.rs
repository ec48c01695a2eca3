#![doc(test(attr(deny(warnings))))]

//! Budget Sim tracks recurring and one-off expenses against an initial
//! balance and keeps a live projection of the month as expenses are paid,
//! ignored or edited.

pub mod cli;
pub mod config;
pub mod core;
pub mod currency;
pub mod domain;
pub mod errors;
pub mod storage;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Budget Sim tracing initialized.");
    });
}
