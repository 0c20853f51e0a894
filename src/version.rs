use std::borrow::Cow;
use std::fmt;
use std::str::Utf8Error;

/// Owned copy of the bytes `GetVersion` returned, without the terminating NUL.
///
/// The bytes are kept exactly as the library produced them; conversion to text happens on request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Version {
    bytes: Vec<u8>,
}

impl Version {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self { bytes: bytes.into() }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn to_str(&self) -> Result<&str, Utf8Error> {
        std::str::from_utf8(&self.bytes)
    }

    pub fn to_string_lossy(&self) -> Cow<str> {
        String::from_utf8_lossy(&self.bytes)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_lossy())
    }
}
