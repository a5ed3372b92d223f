//! Generated names for uploaded images.
//!
//! A stored name is `<millis>_<sanitized original name>`. The millisecond
//! prefix comes from `StampAllocator`, which hands out strictly increasing
//! values, so two uploads with the same original name never collide even
//! when they land in the same millisecond.

use chrono::{Local, Utc};
use regex::Regex;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::OnceLock;
use unicode_normalization::UnicodeNormalization;

/// Display format of `OutfitRecord::timestamp`.
const TIMESTAMP_FORMAT: &str = "%d/%m/%Y, %I:%M:%S %p";

fn unsafe_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^A-Za-z0-9_.\-]").expect("static regex"))
}

/// Strictly increasing millisecond stamps.
#[derive(Debug, Default)]
pub struct StampAllocator {
    last: AtomicI64,
}

impl StampAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current time in milliseconds, bumped past any stamp already issued.
    pub fn next(&self) -> i64 {
        let now = Utc::now().timestamp_millis();
        let mut last = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(last + 1);
            match self
                .last
                .compare_exchange_weak(last, candidate, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => return candidate,
                Err(actual) => last = actual,
            }
        }
    }
}

/// Lowercased extension after the last dot, if any.
pub fn extension_of(filename: &str) -> Option<String> {
    let (_, ext) = filename.rsplit_once('.')?;
    if ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Reduces a client supplied filename to `[A-Za-z0-9_.-]`.
///
/// The name is NFKD-decomposed first so accented letters keep their base
/// letter. Remaining non-ASCII characters are dropped, path separators
/// become spaces, whitespace runs become a single `_`, and leading or
/// trailing dots and underscores are trimmed. The result may be empty.
pub fn sanitize_filename(original: &str) -> String {
    let ascii: String = original
        .nfkd()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();
    let joined = ascii.split_whitespace().collect::<Vec<_>>().join("_");
    let cleaned = unsafe_chars().replace_all(&joined, "");
    cleaned.trim_matches(|c: char| c == '.' || c == '_').to_string()
}

/// Sanitized name that still carries `ext`, or `image.<ext>` if sanitizing
/// stripped it away.
pub fn stored_name(original: &str, ext: &str) -> String {
    let clean = sanitize_filename(original);
    match extension_of(&clean) {
        Some(found) if found == ext && clean.len() > ext.len() + 1 => clean,
        _ => format!("image.{}", ext),
    }
}

pub fn stamped_name(stamp: i64, stored: &str) -> String {
    format!("{}_{}", stamp, stored)
}

/// Local time rendered the way records display it.
pub fn display_timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Joins a stored filename onto `dir`, refusing anything that is not a single
/// plain path component.
pub fn resolve_in(dir: &Path, filename: &str) -> Option<PathBuf> {
    let mut components = Path::new(filename).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(name)), None) => Some(dir.join(name)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn sanitize_strips_paths_and_unsafe_characters() {
        assert_eq!(sanitize_filename("My Outfit (1).png"), "My_Outfit_1.png");
        assert_eq!(sanitize_filename("../../etc/passwd.png"), "etc_passwd.png");
        assert_eq!(sanitize_filename(r"C:\photos\look.JPG"), "C_photos_look.JPG");
        assert_eq!(sanitize_filename("  .hidden.jpeg "), "hidden.jpeg");
        assert_eq!(sanitize_filename("été.png"), "ete.png");
        assert_eq!(sanitize_filename("ﬁt.jpg"), "fit.jpg");
    }

    #[test]
    fn stored_name_keeps_validated_extension() {
        assert_eq!(stored_name("shoe.png", "png"), "shoe.png");
        assert_eq!(stored_name("Shoe.PNG", "png"), "Shoe.PNG");
        assert_eq!(stored_name("鞋.png", "png"), "image.png");
        assert_eq!(stored_name("Café Look.png", "png"), "Cafe_Look.png");
        assert_eq!(stored_name("...jpg", "jpg"), "image.jpg");
    }

    #[test]
    fn extension_is_lowercased_and_requires_a_dot() {
        assert_eq!(extension_of("a.JPeG").as_deref(), Some("jpeg"));
        assert_eq!(extension_of("archive.tar.gz").as_deref(), Some("gz"));
        assert_eq!(extension_of("png"), None);
        assert_eq!(extension_of("trailing."), None);
    }

    #[test]
    fn stamps_are_unique_under_contention() {
        let allocator = std::sync::Arc::new(StampAllocator::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let allocator = allocator.clone();
                std::thread::spawn(move || (0..500).map(|_| allocator.next()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for stamp in handle.join().unwrap() {
                assert!(seen.insert(stamp), "duplicate stamp {}", stamp);
            }
        }
        assert_eq!(seen.len(), 2000);
    }

    #[test]
    fn identical_names_in_one_millisecond_still_differ() {
        let allocator = StampAllocator::new();
        let a = stamped_name(allocator.next(), &stored_name("shoe.png", "png"));
        let b = stamped_name(allocator.next(), &stored_name("shoe.png", "png"));
        assert_ne!(a, b);
    }

    #[test]
    fn resolve_rejects_traversal() {
        let dir = Path::new("uploads");
        assert_eq!(
            resolve_in(dir, "1_a.png"),
            Some(PathBuf::from("uploads/1_a.png"))
        );
        assert_eq!(resolve_in(dir, "../outfits.json"), None);
        assert_eq!(resolve_in(dir, "/etc/passwd"), None);
        assert_eq!(resolve_in(dir, "a/b.png"), None);
        assert_eq!(resolve_in(dir, ""), None);
    }

    #[test]
    fn timestamp_has_twelve_hour_shape() {
        let ts = display_timestamp();
        let re = Regex::new(r"^\d{2}/\d{2}/\d{4}, \d{2}:\d{2}:\d{2} (AM|PM)$").unwrap();
        assert!(re.is_match(&ts), "unexpected timestamp {}", ts);
    }
}
