//! # umm-verify
//!
//! Checks that a student's compiled Java project exposes the API an
//! instructor's reference jar requires: packages, classes, and methods with
//! matching parameter types, return types, exceptions and modifiers.

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Runtime configuration resolved by callers.
pub mod config;
/// A module defining a bunch of constant values to be used throughout
pub mod constants;
/// Class files, surfaces and loaders.
pub mod java;
/// Reference artifact sources (local files, folders, URLs).
pub mod source;
/// Utility functions for convenience
pub mod util;
/// The structural conformance verifier.
pub mod verify;

pub use config::VerifyConfig;
pub use source::ReferenceSource;
pub use verify::{
    Diagnostic, ExclusionMarker, Verification, VerificationResult, VerifyError, verify,
};
