//! Collaborator traits for the hokusai scenario engine.
//!
//! The interpreter talks to the outside world only through the traits in this
//! crate: a reference-counted [`ResourceProvider`] over a raw [`AssetLoader`],
//! the presentation and audio [`ScenarioHost`], the table-readiness
//! [`ScenarioSource`], and the [`ReadHistorySink`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;
mod types;

pub use traits::{AssetLoader, ReadHistorySink, ResourceProvider, ScenarioHost, ScenarioSource};
pub use types::{
    CharacterSprite, CharacterSpriteBuilder, Choice, EndReason, FadeDirection, LoadState, Position,
    ResourceOwner, SavePoint, SoundStream, TextLine, TextLineBuilder, Tween,
};
