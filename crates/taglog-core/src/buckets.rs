//! Tag bucket storage
//!
//! Storage only exists when capture is compiled in (see
//! [`CAPTURE_ENABLED`](crate::CAPTURE_ENABLED)). Otherwise `Buckets` is a
//! zero-sized stand-in that records nothing.

use crate::entry::LogEntry;

#[cfg(all(feature = "capture", any(debug_assertions, feature = "release-capture")))]
mod store {
    use super::LogEntry;
    use std::collections::HashMap;

    /// Tag name to chronological entries
    #[derive(Debug, Default)]
    pub(crate) struct Buckets {
        map: HashMap<String, Vec<LogEntry>>,
    }

    impl Buckets {
        pub(crate) fn push(&mut self, tag: &str, entry: LogEntry) {
            match self.map.get_mut(tag) {
                Some(bucket) => bucket.push(entry),
                None => {
                    self.map.insert(tag.to_string(), vec![entry]);
                }
            }
        }

        /// Entries of a non-empty bucket
        pub(crate) fn get(&self, tag: &str) -> Option<&[LogEntry]> {
            self.map
                .get(tag)
                .filter(|bucket| !bucket.is_empty())
                .map(Vec::as_slice)
        }

        pub(crate) fn remove(&mut self, tag: &str) -> Option<Vec<LogEntry>> {
            self.map.remove(tag)
        }

        pub(crate) fn names(&self) -> Vec<String> {
            self.map
                .iter()
                .filter(|(_, bucket)| !bucket.is_empty())
                .map(|(name, _)| name.clone())
                .collect()
        }

        pub(crate) fn clear(&mut self) {
            self.map.clear();
        }
    }
}

#[cfg(not(all(feature = "capture", any(debug_assertions, feature = "release-capture"))))]
mod store {
    use super::LogEntry;

    #[derive(Debug, Default)]
    pub(crate) struct Buckets;

    impl Buckets {
        pub(crate) fn push(&mut self, _tag: &str, _entry: LogEntry) {}

        pub(crate) fn get(&self, _tag: &str) -> Option<&[LogEntry]> {
            None
        }

        pub(crate) fn remove(&mut self, _tag: &str) -> Option<Vec<LogEntry>> {
            None
        }

        pub(crate) fn names(&self) -> Vec<String> {
            Vec::new()
        }

        pub(crate) fn clear(&mut self) {}
    }
}

pub(crate) use store::Buckets;
