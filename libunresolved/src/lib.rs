//! A dynamic library linked against a symbol that no loaded library defines
//!
//! With lazy binding it loads fine and `GetVersion` terminates the process on its first call.
//! Windows cannot link undefined imports, so there it just returns a version.

use std::os::raw::c_uchar;

#[cfg(unix)]
extern "C" {
    fn versionprobe_missing_dependency() -> *const c_uchar;
}

#[allow(non_snake_case)]
#[no_mangle]
pub extern "C" fn GetVersion() -> *const c_uchar {
    #[cfg(unix)]
    unsafe {
        versionprobe_missing_dependency()
    }
    #[cfg(not(unix))]
    {
        "0.0.0 UNRESOLVED\0".as_ptr()
    }
}
