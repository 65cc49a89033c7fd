//=========================================================================
// Descriptor Errors
//=========================================================================
//
// Failures raised while reading a descriptor or assembling a tree from it.
// The state machine itself never fails; only this loading boundary does.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::PathBuf;

use thiserror::Error;

//=== DescriptorError =====================================================

/// Errors raised while reading a descriptor or assembling a tree from it.
#[derive(Debug, Error)]
pub enum DescriptorError {
    // === Input Errors ===
    /// Descriptor file could not be read.
    #[error("failed to read descriptor {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Descriptor is not valid JSON or does not match the expected shape.
    #[error("failed to parse descriptor: {0}")]
    Parse(#[from] serde_json::Error),

    // === Structure Errors ===
    /// Two states share a name.
    #[error("state '{name}' is declared more than once")]
    DuplicateState { name: String },

    /// A state names a parent that is not declared.
    #[error("state '{state}' names unknown parent '{parent}'")]
    UnknownParent { state: String, parent: String },

    /// A `children` entry disagrees with the child's own declaration.
    #[error("state '{parent}' lists child '{child}', which is undeclared or declared under another parent")]
    ChildMismatch { parent: String, child: String },

    /// Parent links loop back on themselves.
    #[error("state '{state}' is part of a parent cycle")]
    Cycle { state: String },

    /// The entry state is not declared.
    #[error("main state '{main}' is not declared")]
    UnknownMainState { main: String },

    // === System Errors ===
    /// A system type has no constructor in the factory.
    #[error("system '{system}' on state '{state}' has unregistered type '{system_type}'")]
    UnknownSystemType {
        state: String,
        system: String,
        system_type: String,
    },

    /// Two systems on one state share a name.
    #[error("state '{state}' declares system '{system}' more than once")]
    DuplicateSystem { state: String, system: String },
}
