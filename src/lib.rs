//! Reads the version of a shared library by calling its exported `GetVersion` function
//!
//! The library is loaded for the duration of a single call and always unloaded again,
//! whether the call succeeds or not.

pub use error::{Diagnostic, ProbeError, Result};
pub use probe::{check, check_all, library_file_name, probe, NullPolicy, VersionProbe};
pub use version::Version;

pub mod version_library;
mod error;
mod probe;
mod version;
