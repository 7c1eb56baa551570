//! Index entries and targets.
//!
//! An entry is one symbol's search record: a normalized key, the display
//! label, and every documentation page the symbol occurs on.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One occurrence of a symbol in the generated documentation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Target {
    /// Fully qualified name, e.g. `isce::core::LonLat::forward()`.
    pub qualified_name: String,
    /// Page path relative to the search directory, with optional `#anchor`.
    pub url: String,
    /// False for links into another documentation set (tag-file references).
    #[serde(default = "default_local")]
    pub local: bool,
}

fn default_local() -> bool {
    true
}

impl Target {
    pub fn new(qualified_name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            qualified_name: qualified_name.into(),
            url: url.into(),
            local: true,
        }
    }

    /// The page part of the url (everything before `#`).
    pub fn page(&self) -> &str {
        match self.url.split_once('#') {
            Some((page, _)) => page,
            None => &self.url,
        }
    }

    /// The anchor part of the url, if any.
    pub fn anchor(&self) -> Option<&str> {
        self.url
            .split_once('#')
            .map(|(_, anchor)| anchor)
            .filter(|a| !a.is_empty())
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.qualified_name, self.url)?;
        if !self.local {
            f.write_str(" (external)")?;
        }
        Ok(())
    }
}

/// A symbol's search record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexEntry {
    pub key: String,
    pub label: String,
    /// Never empty; order is declaration order.
    pub targets: Vec<Target>,
}

/// Normalize a query or symbol name into search-key form.
///
/// ASCII letters are lowercased and kept along with digits; any other
/// character becomes `_` followed by the hex of each of its UTF-8 bytes,
/// so `~Orbit` becomes `_7eorbit`.
pub fn normalize_key(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch.to_ascii_lowercase());
        } else {
            let mut buf = [0u8; 4];
            for byte in ch.encode_utf8(&mut buf).bytes() {
                out.push_str(&format!("_{:02x}", byte));
            }
        }
    }
    out
}

/// Decode the HTML character references the generator writes into names.
///
/// Unknown or malformed references are left untouched.
pub fn decode_entities(input: &str) -> String {
    if !input.contains('&') {
        return input.to_string();
    }

    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let candidate = &rest[start..];
        match candidate.find(';').and_then(|end| {
            decode_reference(&candidate[1..end]).map(|ch| (ch, end))
        }) {
            Some((ch, end)) => {
                out.push(ch);
                rest = &candidate[end + 1..];
            }
            None => {
                out.push('&');
                rest = &candidate[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_reference(name: &str) -> Option<char> {
    match name {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some('\u{a0}'),
        _ => {
            let code = if let Some(hex) = name
                .strip_prefix("#x")
                .or_else(|| name.strip_prefix("#X"))
            {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                name.strip_prefix('#')?.parse().ok()?
            };
            char::from_u32(code)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_lowercases_alphanumerics() {
        assert_eq!(normalize_key("FFT2D"), "fft2d");
        assert_eq!(normalize_key("  fftPlan "), "fftplan");
    }

    #[test]
    fn normalize_escapes_symbols() {
        assert_eq!(normalize_key("~Orbit"), "_7eorbit");
        assert_eq!(normalize_key("write_block"), "write_5fblock");
        assert_eq!(normalize_key("operator=="), "operator_3d_3d");
    }

    #[test]
    fn normalize_escapes_non_ascii_per_byte() {
        assert_eq!(normalize_key("é"), "_c3_a9");
    }

    #[test]
    fn decode_named_references() {
        assert_eq!(
            decode_entities("std::valarray&lt; std::complex&lt; T &gt;&gt; &amp;input"),
            "std::valarray< std::complex< T >> &input"
        );
        assert_eq!(decode_entities("&quot;x&quot;"), "\"x\"");
    }

    #[test]
    fn decode_numeric_references() {
        assert_eq!(decode_entities("a&#39;b&#x41;"), "a'bA");
    }

    #[test]
    fn decode_leaves_unknown_references() {
        assert_eq!(decode_entities("a & b &bogus; c"), "a & b &bogus; c");
        assert_eq!(decode_entities("trailing &"), "trailing &");
    }

    #[test]
    fn target_page_and_anchor() {
        let t = Target::new("isce::core::Orbit", "../classisce_1_1core_1_1Orbit.html#a1b2");
        assert_eq!(t.page(), "../classisce_1_1core_1_1Orbit.html");
        assert_eq!(t.anchor(), Some("a1b2"));

        let t = Target::new("F2point", "../classF2point.html");
        assert_eq!(t.page(), "../classF2point.html");
        assert_eq!(t.anchor(), None);
    }

    #[test]
    fn target_display_marks_external() {
        let mut t = Target::new("gpuSignal", "../classgpuSignal.html");
        assert_eq!(t.to_string(), "gpuSignal -> ../classgpuSignal.html");
        t.local = false;
        assert!(t.to_string().ends_with("(external)"));
    }
}
