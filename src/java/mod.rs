#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Structural class file reader.
pub mod classfile;
/// Reference (jar) and candidate (directory) surface loaders.
pub mod loader;
/// Descriptor grammar.
pub mod parsers;
/// Project path configuration helpers.
pub mod paths;
/// Class and member surface model.
pub mod surface;

pub use classfile::{ClassFormatError, ClassInfo};
pub use paths::ProjectPaths;
pub use surface::{
    CandidateSurface, ClassPath, ClassSurface, JavaType, MemberSignature, Modifiers, Primitive,
    ReferenceSurface,
};
