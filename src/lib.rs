//! Colloquy — Rust SDK for the Agent Service API.
//!
//! Drives remote, stateful agent conversations: create agents, attach
//! tools and resources, and exchange chat messages whose processing is
//! asynchronous, long-running, and may be interrupted mid-flight to ask a
//! human or await an external tool callback.
//!
//! # Quick Start
//!
//! ```no_run
//! use colloquy::prelude::*;
//!
//! # async fn example() -> colloquy::error::Result<()> {
//! let client = Client::resolve(None)?;
//! let agent = client
//!     .create_agent(&AgentConfig::builder().name("assistant").build())
//!     .await?;
//! let chat = client.create_unique_chat(&agent.id, "session").await?;
//! let handle = client.chat(&agent.id, &chat.id);
//!
//! let answer = handle.converse("What is 2+2?").await?;
//! println!("{answer}");
//! # Ok(())
//! # }
//! ```
//!
//! For interruptible turns, use the asynchronous path:
//!
//! ```no_run
//! use colloquy::chat::TurnOutcome;
//! # async fn example(handle: colloquy::chat::ChatHandle) -> colloquy::error::Result<()> {
//! let history_id = handle.send("Book me a flight").await?;
//! match handle.wait(&history_id).await? {
//!     TurnOutcome::Answered(entry) => println!("{}", entry.content),
//!     TurnOutcome::Interrupted(pending) => {
//!         // ask the human, then resume the turn
//!         let next = handle.resume(&pending.history_id, "Paris").await?;
//!         let outcome = handle.wait(&next).await?;
//!         println!("{:?}", outcome.answer());
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod chat;
pub mod client;
pub mod config;
pub mod error;
pub mod gate;
pub mod poll;
pub mod transport;
pub mod types;

pub mod prelude;

pub use chat::{ChatHandle, InterruptionKind, PendingInterruption, SendOptions, TurnOutcome};
pub use client::Client;
pub use config::{CredentialStore, Credentials};
pub use error::{ColloquyError, Result};
pub use poll::PollConfig;
