//! Title de-duplication -- the one genuinely algorithmic piece of the
//! note store, kept as pure functions over a collection snapshot so it is
//! independently testable.
//!
//! Among notes simultaneously present in the collection no two share an
//! identical title. Collisions are resolved by appending the smallest
//! unused ` (N)` suffix strictly greater than any numbering already in
//! use, with the bare (unsuffixed) title counting as numbering 0.

use regex::Regex;

use crate::note::Note;

/// Compute the next available form of `base` among `notes`.
///
/// `exclude_id` removes one note from the collision scan so a note being
/// renamed can keep its own current title unchanged.
///
/// The scan recognizes titles equal to `base` or equal to `base` followed
/// by a parenthesized integer suffix. `base` is escaped first, so titles
/// containing regex metacharacters (`"Q? (draft)"`) behave as literal
/// text, not as pattern syntax.
pub fn next_available_title(notes: &[Note], base: &str, exclude_id: Option<&str>) -> String {
    let pattern = format!(r"^{}(?: \((\d+)\))?$", regex::escape(base));
    let matcher = Regex::new(&pattern).expect("escaped base title forms a valid pattern");

    let mut collision = false;
    // The bare title counts as numbering 0 when computing the successor.
    let mut max_suffix: u64 = 0;

    for note in notes {
        if exclude_id == Some(note.id.as_str()) {
            continue;
        }
        if let Some(caps) = matcher.captures(&note.title) {
            collision = true;
            if let Some(n) = caps.get(1) {
                // Absurdly large numberings fall back to 0 rather than fail.
                let n: u64 = n.as_str().parse().unwrap_or(0);
                max_suffix = max_suffix.max(n);
            }
        }
    }

    if collision {
        format!("{base} ({})", max_suffix + 1)
    } else {
        base.to_string()
    }
}

/// Strip a single trailing ` (N)` numbering suffix, if present.
///
/// Only the last suffix is removed: `"Notes (1) (2)"` becomes
/// `"Notes (1)"`. This matches the duplicate-title behavior the app has
/// always had; do not "fix" it by stripping repeatedly.
pub fn strip_copy_suffix(title: &str) -> &str {
    let matcher = Regex::new(r"^(.*) \(\d+\)$").expect("static pattern is valid");
    match matcher.captures(title) {
        Some(caps) => caps.get(1).map_or(title, |m| m.as_str()),
        None => title,
    }
}
