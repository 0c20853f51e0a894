//! Native binding of the `GetVersion` export and scoped ownership of the loaded library
//!

use std::ffi::{CStr, OsStr};
use std::os::raw::c_char;
use std::panic::{self, AssertUnwindSafe};

use dlopen2::raw::Library;
use dlopen2::wrapper::WrapperApi;

use crate::error::Diagnostic;
use crate::version::Version;

/// Name of the export every probed library has to provide.
pub const GET_VERSION: &str = "GetVersion";

#[derive(dlopen2_derive::WrapperApi)]
pub struct VersionApi {
    #[dlopen2_name = "GetVersion"]
    get_version: unsafe extern "C" fn() -> *const c_char,
}

#[cfg(unix)]
const OPEN_FLAGS: Option<i32> = Some(libc::RTLD_NOW | libc::RTLD_LOCAL);
// LoadLibrary resolves imports at load time anyway
#[cfg(not(unix))]
const OPEN_FLAGS: Option<i32> = None;

/// A loaded shared library, released exactly once.
///
/// [LibraryGuard::release] reports a failed unload, dropping the guard releases silently.
pub struct LibraryGuard {
    lib: Option<Library>,
}

impl LibraryGuard {
    /// Loads the library with all of its symbols bound immediately.
    ///
    /// A library whose dependencies leave a symbol unresolved fails here, instead of killing the
    /// process later when the unresolved symbol is first called.
    pub fn open<S: AsRef<OsStr>>(path: S) -> Result<Self, Diagnostic> {
        let lib = Library::open_with_flags(path.as_ref(), OPEN_FLAGS)?;
        Ok(Self { lib: Some(lib) })
    }

    /// Resolves `GetVersion`, calls it and copies its result before anything can unload the library.
    ///
    /// `Ok(None)` means the function returned a null pointer.
    pub fn call_get_version(&self) -> Result<Option<Version>, Diagnostic> {
        let Some(lib) = self.lib.as_ref() else {
            return Err(Diagnostic::new("library already released"));
        };
        // SAFETY: the field type matches the documented contract of `GetVersion`
        let api = unsafe { VersionApi::load(lib) }?;
        log::trace!("calling {GET_VERSION}()");
        let version = unsafe { api.get_version() };
        // SAFETY: `lib` stays loaded for the whole scope of `api`
        Ok(unsafe { pchar_to_version(version) })
    }

    pub fn release(mut self) -> Option<Diagnostic> {
        self.lib.take().and_then(close)
    }
}

impl Drop for LibraryGuard {
    fn drop(&mut self) {
        if let Some(lib) = self.lib.take() {
            if let Some(diagnostic) = close(lib) {
                log::warn!("library release failed: {diagnostic}");
            }
        }
    }
}

/// dlopen2 panics when `dlclose`/`FreeLibrary` fails; that panic is the only signal we get.
///
/// The panic is caught, but the process-wide panic hook still runs first, so with the default
/// hook a failed release also shows up as a "panicked at" line on stderr.
fn close(lib: Library) -> Option<Diagnostic> {
    log::trace!("releasing library");
    panic::catch_unwind(AssertUnwindSafe(move || drop(lib)))
        .err()
        .map(Diagnostic::from_panic)
}

/// Copies the bytes of a NUL-terminated C string into owned storage; `None` for a null pointer.
///
/// # Safety
/// `p` must be null or point to a NUL-terminated string that is valid for the duration of the call.
pub unsafe fn pchar_to_version(p: *const c_char) -> Option<Version> {
    if p.is_null() {
        None
    } else {
        Some(Version::from_bytes(CStr::from_ptr(p).to_bytes()))
    }
}
