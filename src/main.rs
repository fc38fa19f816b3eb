//! `mooltilink` command line tool.
//!
//! Decodes captured notifications and encodes requests using the library's
//! fragment and message layers.

mod cli;

use bytes::Bytes;
use clap::Parser;
use cli::{Cli, Commands, RequestArg};
use mooltilink::{
    Credentials,
    DeviceCodec,
    FragmentOutcome,
    Fragmenter,
    MessageDecoder,
    PacketReassembler,
    Request,
    dispatch::parse_locked,
    engine::Continuation,
    message::Command,
};

type BoxError = Box<dyn std::error::Error>;

fn main() -> Result<(), BoxError> {
    // Applications embedding the library should install their own subscriber.
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let lines = match cli.command {
        Commands::Decode {
            fragments,
            show_password,
        } => decode(&fragments, show_password)?,
        Commands::Encode { request } => encode(&request.into(), cli.fragment_size)?,
    };
    for line in lines {
        println!("{line}");
    }
    Ok(())
}

impl From<RequestArg> for Request {
    fn from(arg: RequestArg) -> Self {
        match arg {
            RequestArg::Ping => Request::Ping,
            RequestArg::Status => Request::Status,
            RequestArg::Credential { service, login } => Request::GetCredential { service, login },
        }
    }
}

fn decode(fragments: &[String], show_password: bool) -> Result<Vec<String>, BoxError> {
    let mut reassembler = PacketReassembler::new();
    let mut lines = Vec::new();
    for (index, text) in fragments.iter().enumerate() {
        let bytes = Bytes::from(hex::decode(text.trim())?);
        match reassembler.on_fragment(bytes) {
            FragmentOutcome::NoData => lines.push(format!("#{index}: no data")),
            FragmentOutcome::Incomplete {
                received,
                expected_count,
            } => lines.push(format!("#{index}: fragment {received} of {expected_count}")),
            FragmentOutcome::Desync(reason) => lines.push(format!("#{index}: desync: {reason}")),
            FragmentOutcome::Complete(message) => {
                let Some(decoded) = DeviceCodec.decode(&message) else {
                    lines.push(format!("#{index}: malformed message"));
                    continue;
                };
                let command = decoded.command();
                lines.push(format!(
                    "#{index}: {} (0x{:04x}) payload {}",
                    command.as_str(),
                    command.code(),
                    hex::encode(decoded.payload())
                ));
                lines.extend(describe(command, decoded.payload(), show_password));
            }
        }
    }
    Ok(lines)
}

fn describe(command: Command, payload: &[u8], show_password: bool) -> Option<String> {
    match command {
        Command::Status => parse_locked(payload).map(|locked| format!("  locked: {locked}")),
        Command::GetCredential if !payload.is_empty() => Some(match Credentials::parse(payload) {
            Some(credentials) if show_password => format!(
                "  username: {} password: {}",
                credentials.username, credentials.password
            ),
            Some(credentials) => format!("  username: {} password: <redacted>", credentials.username),
            None => "  credentials: undecodable".to_owned(),
        }),
        _ => None,
    }
}

fn encode(request: &Request, fragment_size: usize) -> Result<Vec<String>, BoxError> {
    let fragmenter = Fragmenter::new(fragment_size)?;
    let continuation = Continuation::for_request(request, &fragmenter)?;
    Ok(continuation
        .fragments()
        .fragments()
        .iter()
        .map(hex::encode)
        .collect())
}
