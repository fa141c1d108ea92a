//! roci-search: a search-grounded Gemini chat assistant.
//!
//! An [`agent::AgentDescriptor`] names the model, instruction and tools. A
//! [`runner::Runner`] drives one turn against a [`session::SessionStore`]
//! and a [`provider::ModelProvider`], streaming [`types::Event`]s.
//! [`turn::ask`] reduces that stream to one displayable string, and
//! [`shell::ChatShell`] keeps the transcript and blocks on one turn at a
//! time.
//!
//! ```no_run
//! use roci_search::prelude::*;
//!
//! # fn example() -> roci_search::error::Result<()> {
//! let config = SearchConfig::load()?;
//! let view = TerminalView::new(std::io::stdout());
//! let mut shell = ChatShell::start(config, ShellOptions::default(), view)?;
//! shell.submit("What is the capital of France?")?;
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod cli;
pub mod config;
pub mod context;
pub mod error;
pub mod logging;
pub mod models;
pub mod prelude;
pub mod provider;
pub mod runner;
pub mod session;
pub mod shell;
pub mod tools;
pub mod turn;
pub mod types;
pub mod util;
