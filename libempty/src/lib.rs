//! A loadable dynamic library without `GetVersion`
//!
//! It still exports something close by, so that a lookup of the right name is what fails.
#![allow(non_snake_case)]

use std::os::raw::c_uchar;

const VERSION: *const u8 = "2.99.99 EMPTY\0".as_ptr();

#[no_mangle]
pub extern "C" fn GetVersionString() -> *const c_uchar {
    VERSION
}

#[no_mangle]
pub extern "C" fn Version() -> *const c_uchar {
    VERSION
}
