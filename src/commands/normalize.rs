//! `profile-finder normalize` command.

use crate::finder::normalize::{normalize, Normalized};

/// Execute the `normalize` command, printing one line per URL.
pub fn run(urls: &[String]) {
    for raw in urls {
        println!("{}", describe(raw));
    }
}

fn describe(raw: &str) -> String {
    match normalize(raw) {
        Some(Normalized::Profile { handle, url }) => format!("{raw} -> {url} (@{handle})"),
        Some(Normalized::Unrecognized(url)) => format!("{raw} -> {url} (no handle)"),
        None => format!("{raw} -> rejected (not a profile path)"),
    }
}

#[cfg(test)]
mod tests {
    use super::describe;

    #[test]
    fn describes_each_outcome() {
        assert_eq!(
            describe("instagram.com/jane"),
            "instagram.com/jane -> https://www.instagram.com/jane/ (@jane)"
        );
        assert_eq!(
            describe("https://example.com/x"),
            "https://example.com/x -> https://example.com/x/ (no handle)"
        );
        assert!(describe("https://instagram.com/p/abc").ends_with("rejected (not a profile path)"));
    }
}
