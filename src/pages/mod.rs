//! Client-side navigation model.
//!
//! The platform addresses everything by URL path (`/courses/topic/12`,
//! `/library/resource/5`, `/pharmacology/drug/Warfarin`). [`Location`] is the
//! typed form of those paths: suggestion rows and recommendation links are
//! parsed into it, and the chat context serializes it back out.

use std::fmt;

use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};

/// Characters escaped inside a single path segment.
const SEGMENT: &AsciiSet = &CONTROLS.add(b' ').add(b'"').add(b'#').add(b'%').add(b'/').add(b'?');

/// Where the desk currently is, or where a link points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// Course overview with the module list.
    Modules,
    /// A topic page under `/courses/topic/{id}`.
    Topic { id: u64 },
    /// A library resource page under `/library/resource/{id}`.
    Resource { id: u64 },
    /// A drug monograph under `/pharmacology/drug/{name}`.
    Drug { name: String },
    /// The library index, e.g. author-filtered suggestion targets.
    Library,
    /// Any other server path; kept verbatim for display.
    Other(String),
}

impl Location {
    /// Parse a platform URL path, tolerating a query string and
    /// percent-encoded segments. Unrecognized paths become
    /// [`Location::Other`] rather than an error so every suggestion row
    /// stays representable.
    pub fn parse(url: &str) -> Location {
        let path = url.split(['?', '#']).next().unwrap_or("");
        let trimmed = path.trim_end_matches('/');

        if trimmed.is_empty() || trimmed == "/courses" {
            return Location::Modules;
        }
        if trimmed == "/library" {
            return Location::Library;
        }
        if let Some(rest) = trimmed.strip_prefix("/courses/topic/")
            && let Ok(id) = rest.parse::<u64>()
        {
            return Location::Topic { id };
        }
        if let Some(rest) = trimmed.strip_prefix("/library/resource/")
            && let Ok(id) = rest.parse::<u64>()
        {
            return Location::Resource { id };
        }
        if let Some(rest) = trimmed.strip_prefix("/pharmacology/drug/")
            && !rest.is_empty()
            && !rest.contains('/')
        {
            let name = percent_decode_str(rest).decode_utf8_lossy().to_string();
            return Location::Drug { name };
        }
        Location::Other(path.to_string())
    }

    /// Canonical URL path, percent-encoded where needed. This is the value
    /// the chat context reports as the current page.
    pub fn path(&self) -> String {
        match self {
            Location::Modules => "/courses/".to_string(),
            Location::Topic { id } => format!("/courses/topic/{id}"),
            Location::Resource { id } => format!("/library/resource/{id}"),
            Location::Drug { name } => {
                format!("/pharmacology/drug/{}", utf8_percent_encode(name, SEGMENT))
            }
            Location::Library => "/library/".to_string(),
            Location::Other(path) => path.clone(),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_topic_path() {
        assert_eq!(Location::parse("/courses/topic/12"), Location::Topic { id: 12 });
    }

    #[test]
    fn test_parse_resource_path() {
        assert_eq!(Location::parse("/library/resource/5"), Location::Resource { id: 5 });
    }

    #[test]
    fn test_parse_drug_path_decodes_name() {
        assert_eq!(
            Location::parse("/pharmacology/drug/Beta%20Blockers"),
            Location::Drug { name: "Beta Blockers".to_string() }
        );
    }

    #[test]
    fn test_parse_library_with_author_query() {
        assert_eq!(Location::parse("/library/?author=Henry%20Gray"), Location::Library);
    }

    #[test]
    fn test_parse_courses_index() {
        assert_eq!(Location::parse("/courses/"), Location::Modules);
        assert_eq!(Location::parse("/courses"), Location::Modules);
    }

    #[test]
    fn test_parse_unknown_path_preserved() {
        let loc = Location::parse("/library/books");
        assert_eq!(loc, Location::Other("/library/books".to_string()));
        assert_eq!(loc.path(), "/library/books");
    }

    #[test]
    fn test_parse_non_numeric_topic_id_falls_through() {
        assert_eq!(
            Location::parse("/courses/topic/abc"),
            Location::Other("/courses/topic/abc".to_string())
        );
    }

    #[test]
    fn test_path_round_trip_for_drug_names() {
        let loc = Location::Drug { name: "Beta Blockers".to_string() };
        assert_eq!(loc.path(), "/pharmacology/drug/Beta%20Blockers");
        assert_eq!(Location::parse(&loc.path()), loc);
    }

    #[test]
    fn test_display_matches_path() {
        assert_eq!(Location::Topic { id: 3 }.to_string(), "/courses/topic/3");
    }
}
