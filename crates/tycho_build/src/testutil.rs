//! Test helpers shared across the build crate's test modules.

use std::path::{Path, PathBuf};

/// Writes an executable shell script that mimics a compiler: it finds the
/// `-o <path>` argument, records its full argument list there (one line
/// per argument), and exits with the given status.
pub(crate) fn fake_compiler(dir: &Path, name: &str, exit_code: i32) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    let script = format!(
        "#!/bin/sh\n\
         out=\"\"\n\
         prev=\"\"\n\
         for a in \"$@\"; do\n\
         \tif [ \"$prev\" = \"-o\" ]; then out=\"$a\"; fi\n\
         \tprev=\"$a\"\n\
         done\n\
         if [ -n \"$out\" ]; then printf '%s\\n' \"$@\" > \"$out\"; fi\n\
         if [ {exit_code} -ne 0 ]; then echo 'fake compiler failure' >&2; fi\n\
         exit {exit_code}\n"
    );
    std::fs::write(&path, script).unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path
}
