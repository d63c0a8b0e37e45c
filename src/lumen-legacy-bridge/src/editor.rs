//! Guards deciding whether a path may go to the legacy editor.

use std::cell::Cell;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

/// A plausible editor file ends in a 1-4 character alphanumeric extension.
static EXTENSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\.[0-9A-Za-z]{1,4}$").expect("extension pattern"));

thread_local! {
    static IN_OPEN_IN_EDITOR: Cell<bool> = const { Cell::new(false) };
}

/// Marks the calling thread as inside an open-in-editor call.
///
/// `enter` returns `None` when the thread is already inside one, which is
/// how a recursive self-invocation is refused.
pub(crate) struct ReentryGuard;

impl ReentryGuard {
    pub(crate) fn enter() -> Option<Self> {
        let already = IN_OPEN_IN_EDITOR.with(|flag| flag.replace(true));
        if already { None } else { Some(Self) }
    }
}

impl Drop for ReentryGuard {
    fn drop(&mut self) {
        IN_OPEN_IN_EDITOR.with(|flag| flag.set(false));
    }
}

/// Whether the path looks like a remote URL rather than a local file.
pub fn looks_remote(path: &str) -> bool {
    path.find("://").is_some_and(|index| index > 0)
}

/// Whether the path carries a short alphanumeric extension.
pub fn has_plausible_extension(path: &str) -> bool {
    EXTENSION_RE.is_match(path)
}

/// Whether the file's first 1024 bytes contain a NUL byte.
///
/// A pragmatic heuristic, not an exhaustive test. Unreadable files count as
/// text so the caller falls through to its normal failure path.
pub fn is_binary_file(path: &Path) -> bool {
    let Ok(mut file) = File::open(path) else {
        return false;
    };
    let mut buffer = [0u8; 1024];
    let mut offset = 0;
    while offset < buffer.len() {
        match file.read(&mut buffer[offset..]) {
            Ok(0) => break,
            Ok(count) => offset += count,
            Err(_) => return false,
        }
    }
    buffer[..offset].contains(&0)
}
