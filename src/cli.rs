//! Command line interface for the `mooltilink` binary.
//!
//! The binary inspects captured device traffic and builds request fragments
//! without a live link. This file is also compiled by `build.rs` to render the
//! manual page, so it depends on `clap` alone.

use clap::{Parser, Subcommand};

/// Command line arguments for the `mooltilink` binary.
#[derive(Debug, Parser)]
#[command(
    name = "mooltilink",
    version,
    about = "Inspect and build password manager link fragments"
)]
pub struct Cli {
    /// Fragment size in bytes, header included.
    #[arg(long, global = true, default_value_t = 64)]
    pub fragment_size: usize,
    /// Operation to perform.
    #[command(subcommand)]
    pub command: Commands,
}

/// Subcommands understood by the binary.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Reassemble hex-encoded notifications and decode the response.
    Decode {
        /// Notifications in arrival order, one hex string each.
        #[arg(required = true)]
        fragments: Vec<String>,
        /// Print decoded passwords instead of redacting them.
        #[arg(long)]
        show_password: bool,
    },
    /// Print the hex-encoded fragments of a request.
    Encode {
        /// Request to build.
        #[command(subcommand)]
        request: RequestArg,
    },
}

/// Requests that can be encoded.
#[derive(Debug, Subcommand)]
pub enum RequestArg {
    /// Liveness check.
    Ping,
    /// Lock state query.
    Status,
    /// Credential lookup.
    Credential {
        /// Service to look up.
        service: String,
        /// Login to select when the service has several.
        #[arg(long)]
        login: Option<String>,
    },
}
