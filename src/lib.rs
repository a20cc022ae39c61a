//! Single-shot HTTP HEAD checker.
//!
//! [`config::resolve`] validates the command line, [`prober::run`] performs the
//! request through a [`prober::Transport`], and [`report::report`] prints the
//! outcome.

pub mod config;
pub mod error;
pub mod prober;
pub mod report;
pub mod util;

pub use config::{ProbeRequest, Resolution, resolve};
pub use error::ProbeFailure;
pub use prober::http::{HostResolver, ReqwestTransport, SystemResolver};
pub use prober::{ProbeResult, Transport, run};
