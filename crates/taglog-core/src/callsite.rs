//! Call-site resolution
//!
//! Turns a call stack into a [`Location`]. Two kinds of stacks are accepted
//! through [`FrameSource`]:
//!
//! - **Frames**: structured frames, such as the caller location captured by
//!   `#[track_caller]`. No parsing is involved.
//! - **Raw**: stack text, matched line by line against the address grammars
//!   below.
//!
//! ## Raw grammars (tried in order on each line)
//!
//! 1. `<scheme>:<component>/<relative-path>.<ext>:<line>:<col>`
//! 2. `<scheme>:///<absolute-path>.<ext>:<line>:<col>`
//! 3. `at <path>:<line>:<col>` as printed by `std::backtrace::Backtrace`
//!
//! Lines and frames containing any internal-frame substring are skipped.
//! Backtraces print each symbol as a function-name line followed by an
//! `at <path>` line; the `at` line is skipped whenever its name line is. The
//! first match wins; when nothing matches the sentinel location is returned.
//!
//! Paths are compared and reported with `/` separators, whatever the host
//! printed.

use regex::Regex;
use std::fmt::Display;
use std::sync::OnceLock;
use taglog_core_types::Location;

/// Substrings identifying frames that belong to the logging machinery itself
pub const DEFAULT_INTERNAL_FRAMES: &[&str] = &[
    "taglog-core/src/",
    "taglog_core::",
    "/rustc/",
    "library/std/",
    "library/core/",
    "library/alloc/",
    "std::backtrace",
];

/// A single structured stack frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    file: String,
    line: u32,
    column: u32,
    function: Option<String>,
}

impl Frame {
    pub fn new(file: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
            function: None,
        }
    }

    /// Attach the enclosing function name (checked against the denylist too)
    pub fn with_function(mut self, function: impl Into<String>) -> Self {
        self.function = Some(function.into());
        self
    }

    /// The frame of whoever called the current `#[track_caller]` function
    #[track_caller]
    pub fn caller() -> Self {
        Self::from(std::panic::Location::caller())
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn column(&self) -> u32 {
        self.column
    }

    pub fn function(&self) -> Option<&str> {
        self.function.as_deref()
    }
}

impl From<&std::panic::Location<'_>> for Frame {
    fn from(loc: &std::panic::Location<'_>) -> Self {
        Frame::new(loc.file(), loc.line(), loc.column())
    }
}

/// Where a call stack comes from
#[derive(Debug, Clone, Copy)]
pub enum FrameSource<'a> {
    /// Frames already structured by the host
    Frames(&'a [Frame]),
    /// Stack text that needs pattern matching
    Raw(&'a str),
}

/// Resolves call stacks to locations, skipping internal frames
#[derive(Debug, Clone)]
pub struct CallSiteResolver {
    internal_frames: Vec<String>,
}

impl Default for CallSiteResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl CallSiteResolver {
    /// Create a resolver with the default internal-frame denylist
    pub fn new() -> Self {
        Self {
            internal_frames: DEFAULT_INTERNAL_FRAMES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    /// Extend the denylist with additional substrings
    pub fn with_internal_frames<I, S>(mut self, extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.internal_frames.extend(extra.into_iter().map(Into::into));
        self
    }

    pub fn internal_frames(&self) -> &[String] {
        &self.internal_frames
    }

    /// Resolve a call stack to a location
    ///
    /// Never fails: anything unrecognised yields [`Location::unknown`].
    pub fn resolve(&self, source: FrameSource<'_>) -> Location {
        match source {
            FrameSource::Frames(frames) => self.resolve_frames(frames),
            FrameSource::Raw(text) => self.resolve_raw(text),
        }
    }

    fn is_internal(&self, text: &str) -> bool {
        let text = text.replace('\\', "/");
        self.internal_frames
            .iter()
            .any(|needle| !needle.is_empty() && text.contains(needle.as_str()))
            || grammars()
                .published_crate
                .as_ref()
                .is_some_and(|re| re.is_match(&text))
    }

    fn resolve_frames(&self, frames: &[Frame]) -> Location {
        frames
            .iter()
            .find(|frame| {
                !self.is_internal(&frame.file)
                    && !frame.function.as_deref().is_some_and(|f| self.is_internal(f))
            })
            .map(|frame| locate(&frame.file, frame.line, frame.column))
            .unwrap_or_else(Location::unknown)
    }

    fn resolve_raw(&self, text: &str) -> Location {
        let grammars = grammars();
        let mut owner_is_internal = false;

        for line in text.lines() {
            let internal = self.is_internal(line);
            let skip = if line.trim_start().starts_with("at ") {
                let skip = internal || owner_is_internal;
                owner_is_internal = false;
                skip
            } else {
                owner_is_internal = internal;
                internal
            };

            if skip {
                continue;
            }
            if let Some(location) = match_line(grammars, line) {
                return location;
            }
        }
        Location::unknown()
    }
}

struct Grammars {
    package: Option<Regex>,
    file_url: Option<Regex>,
    backtrace: Option<Regex>,
    published_crate: Option<Regex>,
}

// A pattern that fails to compile simply never matches.
fn grammars() -> &'static Grammars {
    static GRAMMARS: OnceLock<Grammars> = OnceLock::new();
    GRAMMARS.get_or_init(|| Grammars {
        package: Regex::new(
            r"(?:^|[\s(@])[A-Za-z][A-Za-z0-9+.\-]*:([^/\s:()]+/[^\s:()]+\.[A-Za-z0-9]+):(\d+):(\d+)",
        )
        .ok(),
        file_url: Regex::new(r"[A-Za-z][A-Za-z0-9+.\-]*:///([^\s:()]+\.[A-Za-z0-9]+):(\d+):(\d+)")
            .ok(),
        backtrace: Regex::new(r"^\s*at\s+(.+?):(\d+):(\d+)\s*$").ok(),
        published_crate: Regex::new(r"taglog-core-\d+\.\d+\.\d+[^/]*/src/").ok(),
    })
}

fn match_line(grammars: &Grammars, line: &str) -> Option<Location> {
    if let Some(caps) = grammars.package.as_ref().and_then(|re| re.captures(line)) {
        let short = format!("{}:{}:{}", &caps[1], &caps[2], &caps[3]);
        return Some(Location::new(short.clone(), short));
    }

    if let Some(caps) = grammars.file_url.as_ref().and_then(|re| re.captures(line)) {
        let path = format!("/{}", &caps[1]);
        return Some(locate(&path, &caps[2], &caps[3]));
    }

    if let Some(caps) = grammars.backtrace.as_ref().and_then(|re| re.captures(line)) {
        return Some(locate(&caps[1], &caps[2], &caps[3]));
    }

    None
}

fn locate(path: &str, line: impl Display, column: impl Display) -> Location {
    let path = path.replace('\\', "/");
    Location::new(
        format!("{}:{}:{}", short_path(&path), line, column),
        format!("{}:{}:{}", path, line, column),
    )
}

/// Last two path segments, or the last one alone for paths of at most two
fn short_path(path: &str) -> String {
    let segments: Vec<&str> = path
        .split('/')
        .filter(|s| !s.is_empty() && *s != ".")
        .collect();

    match segments.as_slice() {
        [] => path.to_string(),
        [only] | [_, only] => only.to_string(),
        [.., parent, last] => format!("{}/{}", parent, last),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(text: &str) -> Location {
        CallSiteResolver::new().resolve(FrameSource::Raw(text))
    }

    #[test]
    fn test_package_grammar() {
        let loc = resolve("#0      main (package:my_app/src/auth/login.dart:12:4)");
        assert_eq!(loc.short(), "my_app/src/auth/login.dart:12:4");
        assert_eq!(loc.full(), loc.short());
    }

    #[test]
    fn test_file_url_grammar_with_long_path() {
        let loc = resolve("#1 run (file:///home/dev/app/lib/service.dart:40:7)");
        assert_eq!(loc.short(), "lib/service.dart:40:7");
        assert_eq!(loc.full(), "/home/dev/app/lib/service.dart:40:7");
    }

    #[test]
    fn test_file_url_grammar_with_short_path() {
        let loc = resolve("file:///app/main.dart:3:1");
        assert_eq!(loc.short(), "main.dart:3:1");
        assert_eq!(loc.full(), "/app/main.dart:3:1");
    }

    #[test]
    fn test_rust_backtrace_grammar() {
        let text = "  12: app::handlers::login\n             at /work/app/src/handlers.rs:88:13";
        let loc = resolve(text);
        assert_eq!(loc.short(), "src/handlers.rs:88:13");
        assert_eq!(loc.full(), "/work/app/src/handlers.rs:88:13");
    }

    #[test]
    fn test_first_match_wins() {
        let text = "package:first/a.dart:1:1\npackage:second/b.dart:2:2";
        assert_eq!(resolve(text).short(), "first/a.dart:1:1");
    }

    #[test]
    fn test_internal_lines_are_skipped() {
        let text = "\
   at /work/taglog/crates/taglog-core/src/registry.rs:10:5
   at /rustc/abc123/library/std/src/rt.rs:1:1
   at /work/app/src/main.rs:4:9";
        let loc = resolve(text);
        assert_eq!(loc.short(), "src/main.rs:4:9");
    }

    #[test]
    fn test_garbage_yields_sentinel() {
        assert!(resolve("").is_unknown());
        assert!(resolve("no frames here\n:::\n").is_unknown());
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let text = "package:app/x.dart:9:9";
        assert_eq!(resolve(text), resolve(text));
    }

    #[test]
    fn test_frames_skip_internal_and_need_no_parsing() {
        let frames = vec![
            Frame::new("crates/taglog-core/src/registry.rs", 1, 1),
            Frame::new("/work/app/src/jobs/sync.rs", 21, 3),
        ];
        let loc = CallSiteResolver::new().resolve(FrameSource::Frames(&frames));
        assert_eq!(loc.short(), "jobs/sync.rs:21:3");
        assert_eq!(loc.full(), "/work/app/src/jobs/sync.rs:21:3");
    }

    #[test]
    fn test_frames_checked_by_function_name() {
        let frames = vec![
            Frame::new("/work/app/src/shim.rs", 1, 1).with_function("taglog_core::registry::x"),
            Frame::new("/work/app/src/main.rs", 2, 2),
        ];
        let loc = CallSiteResolver::new().resolve(FrameSource::Frames(&frames));
        assert_eq!(loc.short(), "src/main.rs:2:2");
    }

    #[test]
    fn test_empty_frames_yield_sentinel() {
        let loc = CallSiteResolver::new().resolve(FrameSource::Frames(&[]));
        assert!(loc.is_unknown());
    }

    #[test]
    fn test_extra_internal_frames() {
        let resolver = CallSiteResolver::new().with_internal_frames(["my_wrapper"]);
        let text = "package:my_wrapper/log.dart:1:1\npackage:app/main.dart:2:2";
        let loc = resolver.resolve(FrameSource::Raw(text));
        assert_eq!(loc.short(), "app/main.dart:2:2");
    }

    #[test]
    fn test_short_path_rules() {
        assert_eq!(short_path("/a/b/c/d.rs"), "c/d.rs");
        assert_eq!(short_path("/a/d.rs"), "d.rs");
        assert_eq!(short_path("d.rs"), "d.rs");
        assert_eq!(short_path("./src/main.rs"), "main.rs");
    }

    #[test]
    fn test_at_line_follows_its_function_line() {
        let text = "\
   2: <taglog_core::stack::BacktraceCapture as taglog_core::stack::StackCapture>::capture
             at ./src/stack.rs:18:9
   3: taglog_core::registry::TagRegistry::record
             at ./src/registry.rs:160:37
   4: app::checkout::pay
             at ./src/checkout.rs:31:5";
        let loc = resolve(text);
        assert_eq!(loc.short(), "checkout.rs:31:5");
        assert_eq!(loc.full(), "./src/checkout.rs:31:5");
    }

    #[test]
    fn test_inlined_symbol_lines_are_paired_too() {
        let text = "\
   5: app::main
             at /work/app/src/lib.rs:9:1
      taglog_core::registry::TagRegistry::append
             at /work/app/src/lib.rs:12:3";
        assert_eq!(resolve(text).short(), "src/lib.rs:9:1");

        let reversed = "\
   5: taglog_core::registry::TagRegistry::append
             at /vendored/logger/src/registry.rs:12:3
      app::main
             at /work/app/src/main.rs:9:1";
        assert_eq!(resolve(reversed).short(), "src/main.rs:9:1");
    }

    #[test]
    fn test_windows_paths_are_normalised() {
        let text = [
            r"   1: taglog_core::stack::capture",
            r"             at C:\work\taglog\crates\taglog-core\src\stack.rs:15:9",
            r"   2: app::main",
            r"             at C:\work\app\src\main.rs:4:9",
        ]
        .join("\n");
        let loc = resolve(&text);
        assert_eq!(loc.short(), "src/main.rs:4:9");
        assert_eq!(loc.full(), "C:/work/app/src/main.rs:4:9");

        let bare = [
            r"at C:\work\taglog\crates\taglog-core\src\stack.rs:15:9",
            r"at C:\work\app\src\main.rs:4:9",
        ]
        .join("\n");
        assert_eq!(resolve(&bare).short(), "src/main.rs:4:9");
    }

    #[test]
    fn test_windows_frame_full_ends_with_short() {
        let frames = [Frame::new(r"C:\w\app\src\main.rs", 1, 2)];
        let loc = CallSiteResolver::new().resolve(FrameSource::Frames(&frames));
        assert_eq!(loc.short(), "src/main.rs:1:2");
        assert_eq!(loc.full(), "C:/w/app/src/main.rs:1:2");
        assert!(loc.full().ends_with(loc.short()));
    }

    #[test]
    fn test_published_crate_paths_are_internal() {
        let text = "\
   at /home/u/.cargo/registry/src/index.crates.io-6f17d22bba15001f/taglog-core-0.1.0/src/registry.rs:1:1
   at /home/u/taglog-core-demo/src/main.rs:7:3";
        let loc = resolve(text);
        assert_eq!(loc.short(), "src/main.rs:7:3");
        assert_eq!(loc.full(), "/home/u/taglog-core-demo/src/main.rs:7:3");
    }
}
