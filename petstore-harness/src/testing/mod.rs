//! Test doubles for the transport collaborator.
//!
//! [`MockPetStore`] is a real HTTP server for end-to-end runs without a
//! network; [`ScriptedPetApi`] skips HTTP entirely and replays canned results.

mod mock_store;
mod scripted;

pub use mock_store::MockPetStore;
pub use scripted::{RecordedCall, ScriptedPetApi};
