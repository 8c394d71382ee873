//! # tuneplayer - Rendering layer of TuneFlow
//!
//! This crate connects the playback state ([`tunequeue::PlayerStore`]) to an
//! actual audio output. It provides:
//!
//! - **Source resolution**: offline payload first, best network URL second.
//! - **`AudioSink` trait**: the single media output abstracted as an owned
//!   resource.
//! - **`SinkBinding`**: the one component allowed to mutate the sink. It
//!   applies controller events to the sink and feeds sink progress back to
//!   the controller.
//!
//! Every other surface expresses playback *intents* through the store; the
//! binding is the single writer towards the audio output.

pub mod binding;
mod error;
pub mod resolve;
pub mod sink;

pub use binding::SinkBinding;
pub use error::{PlayerError, Result};
pub use resolve::{resolve, PlaybackSource};
pub use sink::AudioSink;
