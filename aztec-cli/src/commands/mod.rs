//! CLI command implementations

pub mod inspect;
pub mod make_artifact;
pub mod make_crud;
pub mod make_module;
pub mod publish_stubs;

pub use inspect::InspectCommand;
pub use make_artifact::MakeArtifactCommand;
pub use make_crud::{parse_layers, MakeCrudCommand};
pub use make_module::MakeModuleCommand;
pub use publish_stubs::PublishStubsCommand;
