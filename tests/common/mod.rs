use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;

use versionprobe::library_file_name;

/// Library exporting `GetVersion` returning "1.4.2"
pub const JUST_VERSION: &str = "justversion";
/// Library without `GetVersion`
pub const EMPTY: &str = "empty";
/// Library whose `GetVersion` returns a null pointer
pub const NULL_VERSION: &str = "nullversion";
/// Library whose `GetVersion` calls a symbol that nothing defines (unix only)
pub const UNRESOLVED: &str = "unresolved";

/// Path to a fixture library, building all of them on first use.
///
/// The fixtures get their own target dir, so this does not wait on the lock of the running build.
pub fn fixture(name: &str) -> PathBuf {
    static FIXTURES: OnceLock<PathBuf> = OnceLock::new();
    let dir = FIXTURES.get_or_init(|| {
        let target_dir = Path::new(env!("CARGO_TARGET_TMPDIR")).join("fixtures");
        let status = Command::new(env!("CARGO"))
            .current_dir(env!("CARGO_MANIFEST_DIR"))
            .args(["build", "-p", JUST_VERSION, "-p", EMPTY, "-p", NULL_VERSION, "-p", UNRESOLVED, "--target-dir"])
            .arg(&target_dir)
            .status()
            .expect("cannot run cargo");
        assert!(status.success(), "fixture libraries failed to build");
        target_dir.join("debug")
    });
    dir.join(library_file_name(name))
}
