//! JavaScript console bridge.
//!
//! Renders console API calls and console input results into HTML fragments,
//! keeps them in an append-only log, and serves that log to a remote observer
//! through index notifications plus a pull-based catch-up request.

pub mod boa;
pub mod client;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod markup;
pub mod message;
pub mod output;
pub mod printer;
pub mod protocol;
pub mod realm;
pub mod transport;

#[cfg(test)]
pub(crate) mod test_support;

pub use boa::BoaEngine;
pub use client::ConsoleClient;
pub use config::ConsoleConfig;
pub use error::{ConsoleError, ConsoleResult};
pub use evaluator::{Evaluator, ParseError, Renderer};
pub use message::{ConsoleMessage, MessageKind, MessageLog};
pub use output::ConsoleOutput;
pub use printer::{LogLevel, PrinterArguments};
pub use protocol::{ConsoleEvent, ConsoleRequest};
pub use realm::{ExecutionContext, RealmSwitch};
pub use transport::{ChannelTransport, ConsoleTransport};
