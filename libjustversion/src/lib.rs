//! A dynamic library exposing only function `GetVersion`
//!
//! The returned string lives in the library's static data, so it is only valid while the
//! library stays loaded.

use std::os::raw::c_uchar;

#[allow(non_snake_case)]
#[no_mangle]
pub extern "C" fn GetVersion() -> *const c_uchar {
    "1.4.2\0".as_ptr()
}
