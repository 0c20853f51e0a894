use std::any::Any;
use std::fmt;
use thiserror::Error as ThisError;

pub type Result<T> = std::result::Result<T, ProbeError>;

/// Description of a failed native loader operation.
///
/// POSIX loaders only report text (`dlerror`), Windows reports a numeric code
/// (`GetLastError`) which the standard library renders into text as well,
/// so the text already mentions the code when there is one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    code: Option<i32>,
    text: String,
    release: Option<String>,
}

impl Diagnostic {
    pub fn new(text: impl Into<String>) -> Self {
        Self { code: None, text: text.into(), release: None }
    }

    pub fn with_code(code: i32, text: impl Into<String>) -> Self {
        Self { code: Some(code), text: text.into(), release: None }
    }

    /// Numeric OS error code, only present on platforms that provide one.
    pub fn code(&self) -> Option<i32> {
        self.code
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Failure reported while unloading the library after this diagnostic was recorded.
    pub fn release_failure(&self) -> Option<&str> {
        self.release.as_deref()
    }

    pub(crate) fn attach_release(&mut self, release: Option<Diagnostic>) {
        if let Some(release) = release {
            self.release = Some(release.to_string());
        }
    }

    /// Turns a panic payload (from a failed `dlclose`/`FreeLibrary`) into a diagnostic.
    pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let text = if let Some(s) = payload.downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "library release failed".to_string()
        };
        Self::new(text)
    }
}

impl From<&std::io::Error> for Diagnostic {
    fn from(e: &std::io::Error) -> Self {
        match e.raw_os_error() {
            Some(code) => Self::with_code(code, e.to_string()),
            None => Self::new(e.to_string()),
        }
    }
}

impl From<dlopen2::Error> for Diagnostic {
    fn from(e: dlopen2::Error) -> Self {
        match &e {
            dlopen2::Error::OpeningLibraryError(io)
            | dlopen2::Error::SymbolGettingError(io)
            | dlopen2::Error::AddrNotMatchingDll(io) => Self::from(io),
            dlopen2::Error::NullSymbol => Self::new("symbol resolved to a null address"),
            _ => Self::new(e.to_string()),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)?;
        if let Some(release) = &self.release {
            write!(f, "; release failed: {release}")?;
        }
        Ok(())
    }
}

#[derive(ThisError, Debug)]
pub enum ProbeError {
    #[error("cannot load library '{library}': {diagnostic}")]
    LoadFailure { library: String, diagnostic: Diagnostic },
    #[error("symbol '{symbol}' not found in '{library}': {diagnostic}")]
    SymbolNotFound { library: String, symbol: &'static str, diagnostic: Diagnostic },
    #[error("'{library}': GetVersion returned no data{}", .release.as_ref().map(|r| format!("; release failed: {r}")).unwrap_or_default())]
    NullResult { library: String, release: Option<Diagnostic> },
    #[error("cannot release library '{library}': {diagnostic}")]
    ReleaseFailure { library: String, diagnostic: Diagnostic },
}

impl ProbeError {
    /// The native diagnostic behind this failure, if the loader produced one.
    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        match self {
            ProbeError::LoadFailure { diagnostic, .. }
            | ProbeError::SymbolNotFound { diagnostic, .. }
            | ProbeError::ReleaseFailure { diagnostic, .. } => Some(diagnostic),
            ProbeError::NullResult { release, .. } => release.as_ref(),
        }
    }

    pub fn library(&self) -> &str {
        match self {
            ProbeError::LoadFailure { library, .. }
            | ProbeError::SymbolNotFound { library, .. }
            | ProbeError::NullResult { library, .. }
            | ProbeError::ReleaseFailure { library, .. } => library,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Error, ErrorKind};
    use super::*;

    #[test]
    fn posix_style_error_has_no_code() {
        let e = Error::new(ErrorKind::Other, "libfoo.so: cannot open shared object file");
        let d = Diagnostic::from(&e);
        assert_eq!(None, d.code());
        assert_eq!("libfoo.so: cannot open shared object file", d.to_string());
    }

    #[test]
    fn windows_style_error_keeps_code() {
        let e = Error::from_raw_os_error(2);
        let d = Diagnostic::from(&e);
        assert_eq!(Some(2), d.code());
        assert!(d.to_string().contains("os error 2"));
    }

    #[test]
    fn release_failure_is_appended() {
        let mut d = Diagnostic::new("undefined symbol: GetVersion");
        d.attach_release(None);
        assert_eq!(None, d.release_failure());
        d.attach_release(Some(Diagnostic::new("Call to dlclose() failed")));
        assert_eq!(Some("Call to dlclose() failed"), d.release_failure());
        assert_eq!("undefined symbol: GetVersion; release failed: Call to dlclose() failed", d.to_string());
    }

    #[test]
    fn panic_payloads() {
        assert_eq!("boom", Diagnostic::from_panic(Box::new("boom")).text());
        assert_eq!("bang", Diagnostic::from_panic(Box::new("bang".to_string())).text());
        assert_eq!("library release failed", Diagnostic::from_panic(Box::new(42)).text());
    }

    #[test]
    fn null_result_message() {
        let e = ProbeError::NullResult { library: "libfoo.so".into(), release: None };
        assert_eq!("'libfoo.so': GetVersion returned no data", e.to_string());
        assert_eq!("libfoo.so", e.library());
        assert!(e.diagnostic().is_none());
    }
}
