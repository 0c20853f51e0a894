use std::ffi::{OsStr, OsString};

use crate::error::{Diagnostic, ProbeError, Result};
use crate::version::Version;
use crate::version_library::{LibraryGuard, GET_VERSION};

/// What to report when `GetVersion` returns a null pointer.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum NullPolicy {
    /// Report [ProbeError::NullResult]
    #[default]
    Fail,
    /// Report an empty version string
    Empty,
}

/// Loads a library, calls its `GetVersion` export and unloads it again.
///
/// Every call is independent: nothing is cached and no state is shared between calls.
#[derive(Copy, Clone, Debug, Default)]
pub struct VersionProbe {
    null_policy: NullPolicy,
}

impl VersionProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn null_policy(mut self, null_policy: NullPolicy) -> Self {
        self.null_policy = null_policy;
        self
    }

    pub fn probe<S: AsRef<OsStr>>(&self, library_path: S) -> Result<Version> {
        let path = library_path.as_ref();
        let library = path.to_string_lossy().into_owned();
        log::debug!("Opening library: '{library}'");
        let guard = LibraryGuard::open(path)
            .map_err(|diagnostic| ProbeError::LoadFailure { library: library.clone(), diagnostic })?;

        let version = guard.call_get_version();
        // nothing borrowed from the library survives past this point
        let release = guard.release();
        self.outcome(library, version, release)
    }

    /// Classifies a finished call; a release failure never changes the classification.
    fn outcome(
        &self,
        library: String,
        version: std::result::Result<Option<Version>, Diagnostic>,
        release: Option<Diagnostic>,
    ) -> Result<Version> {
        match version {
            Err(mut diagnostic) => {
                diagnostic.attach_release(release);
                Err(ProbeError::SymbolNotFound { library, symbol: GET_VERSION, diagnostic })
            }
            Ok(None) if self.null_policy == NullPolicy::Fail => {
                Err(ProbeError::NullResult { library, release })
            }
            Ok(version) => {
                if let Some(release) = release {
                    log::warn!("'{library}': release failed after reading version: {release}");
                }
                let version = version.unwrap_or_default();
                log::debug!("'{library}': version is '{version}'");
                Ok(version)
            }
        }
    }
}

/// Probes `library_path` with the default [VersionProbe].
pub fn probe<S: AsRef<OsStr>>(library_path: S) -> Result<Version> {
    VersionProbe::new().probe(library_path)
}

/// Verifies that a library can be loaded (and unloaded) by the native loader.
pub fn check<S: AsRef<OsStr>>(library_path: S) -> Result<()> {
    let path = library_path.as_ref();
    let library = path.to_string_lossy().into_owned();
    log::debug!("Checking library: '{library}'");
    let guard = LibraryGuard::open(path)
        .map_err(|diagnostic| ProbeError::LoadFailure { library: library.clone(), diagnostic })?;
    match guard.release() {
        None => Ok(()),
        Some(diagnostic) => Err(ProbeError::ReleaseFailure { library, diagnostic }),
    }
}

/// Runs [check] on each library in order and stops at the first failure.
pub fn check_all<I>(libraries: I) -> Result<()>
where
    I: IntoIterator,
    I::Item: AsRef<OsStr>,
{
    libraries.into_iter().try_for_each(check)
}

/// Platform file name of a library, e.g. `foo` becomes `libfoo.so`, `libfoo.dylib` or `foo.dll`.
pub fn library_file_name<S: AsRef<OsStr>>(core_name: S) -> OsString {
    dlopen2::utils::platform_file_name(core_name)
}
