//! A dynamic library whose `GetVersion` exists but returns no data

use std::os::raw::c_uchar;
use std::ptr;

#[allow(non_snake_case)]
#[no_mangle]
pub extern "C" fn GetVersion() -> *const c_uchar {
    ptr::null()
}
