pub mod config;
pub mod container;
pub mod diff;
pub mod error;
pub mod indent;
pub mod inserter;
pub mod layout;
pub mod naming;
pub mod pattern;
pub mod permissions;
pub mod registry;
pub mod remover;
pub mod scaffolds;
pub mod templates;
pub mod text;
pub mod union_type;
pub mod workspace;


pub use config::Config;
pub use container::{ContainerKind, ContainerMatch, locate};
pub use error::{PatchError, PatchResult};
pub use indent::depth_string;
pub use inserter::{Punctuation, insert_into_assigned_object, insert_into_named_object};
pub use remover::{remove_from_assigned_object, remove_from_named_object};
pub use union_type::{UnionDeclaration, extend_union_type, shrink_union_type};
pub use workspace::{CommitReport, Workspace};
