//! aztec CLI library

#![forbid(unsafe_code)]
#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

pub mod commands;
pub mod output;
pub mod prompts;

pub use commands::{
    parse_layers, InspectCommand, MakeArtifactCommand, MakeCrudCommand, MakeModuleCommand, PublishStubsCommand,
};
pub use prompts::PromptAugmenter;
