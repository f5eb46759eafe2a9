use std::fmt;

/// Content substituted for local references when fingerprinting.
///
/// Local files are working-tree content and change all the time, so their
/// fingerprint only covers the declared path.
pub const LOCAL_SENTINEL: &str = "DEFAULT";

const LOCAL_PREFIXES: &[&str] = &["./", "../", "/", "file:", ".\\", "..\\"];

/// Where a package's source lives, classified from the raw manifest string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location<'a> {
    /// `http://` or `https://` URL, fetched over the network.
    Remote(&'a str),
    /// Working-tree reference, fingerprinted by path only.
    Local(&'a str),
    /// Any other path form, read from disk.
    File(&'a str),
}

impl<'a> Location<'a> {
    pub fn classify(raw: &'a str) -> Self {
        if is_remote(raw) {
            Location::Remote(raw)
        } else if is_local(raw) {
            Location::Local(raw)
        } else {
            Location::File(raw)
        }
    }

    #[inline]
    pub fn as_str(&self) -> &'a str {
        match self {
            Location::Remote(s) | Location::Local(s) | Location::File(s) => *s,
        }
    }

    #[inline]
    pub fn is_remote(&self) -> bool {
        matches!(self, Location::Remote(_))
    }

    #[inline]
    pub fn is_local(&self) -> bool {
        matches!(self, Location::Local(_))
    }
}

impl fmt::Display for Location<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn is_remote(raw: &str) -> bool {
    let rest = raw
        .strip_prefix("https://")
        .or_else(|| raw.strip_prefix("http://"));
    match rest {
        Some(host) => !host.is_empty() && !host.starts_with('/'),
        None => false,
    }
}

fn is_local(raw: &str) -> bool {
    LOCAL_PREFIXES.iter().any(|p| raw.starts_with(p)) || has_drive_prefix(raw)
}

/// `C:\`, `d:\` and friends.
fn has_drive_prefix(raw: &str) -> bool {
    let b = raw.as_bytes();
    b.len() >= 3 && b[0].is_ascii_alphabetic() && b[1] == b':' && b[2] == b'\\'
}
