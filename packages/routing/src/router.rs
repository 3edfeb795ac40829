//! Path to view resolution.
//!
//! A [`RouteTable`] is a static list of `(pattern, view)` pairs. Resolving a path
//! tries, in order:
//!
//! 1. a route whose pattern string equals the path exactly,
//! 2. a route with `:name` captures whose segments line up with the path,
//! 3. the wildcard route `*`.
//!
//! The first candidate in declaration order wins within each step. Trailing
//! slashes are significant: `/login/` does not match `/login`.

use std::fmt;

/// One segment of a parameterised pattern.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    Static(String),
    Capture(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RoutePattern {
    /// `*`, matches anything nothing else did.
    Wildcard,
    Literal(String),
    /// A pattern with at least one `:name` segment.
    Captures { raw: String, segments: Vec<Segment> },
}

impl RoutePattern {
    pub fn parse(pattern: &str) -> Self {
        if pattern == "*" {
            return RoutePattern::Wildcard;
        }
        let segments: Vec<Segment> = split(pattern)
            .map(|segment| match segment.strip_prefix(':') {
                Some(name) if !name.is_empty() => Segment::Capture(name.to_string()),
                _ => Segment::Static(segment.to_string()),
            })
            .collect();
        if segments.iter().any(|s| matches!(s, Segment::Capture(_))) {
            RoutePattern::Captures {
                raw: pattern.to_string(),
                segments,
            }
        } else {
            RoutePattern::Literal(pattern.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            RoutePattern::Wildcard => "*",
            RoutePattern::Literal(raw) | RoutePattern::Captures { raw, .. } => raw,
        }
    }

    /// Captured values if `path` fits this pattern's segments.
    fn captures(&self, path: &str) -> Option<Params> {
        let RoutePattern::Captures { segments, .. } = self else {
            return None;
        };
        let parts: Vec<&str> = split(path).collect();
        if parts.len() != segments.len() {
            return None;
        }
        let mut params = Params::default();
        for (segment, part) in segments.iter().zip(parts) {
            match segment {
                Segment::Static(expected) if expected == part => {}
                Segment::Static(_) => return None,
                Segment::Capture(_) if part.is_empty() => return None,
                Segment::Capture(name) => params.0.push((name.clone(), part.to_string())),
            }
        }
        Some(params)
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn split(path: &str) -> impl Iterator<Item = &str> {
    path.strip_prefix('/').unwrap_or(path).split('/')
}

/// Values captured by `:name` segments.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Params(Vec<(String, String)>);

impl Params {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

struct Route<V> {
    pattern: RoutePattern,
    view: V,
}

/// A resolved route.
#[derive(Debug, PartialEq)]
pub struct RouteMatch<'a, V> {
    pub view: &'a V,
    pub pattern: &'a RoutePattern,
    pub params: Params,
}

pub struct RouteTable<V> {
    routes: Vec<Route<V>>,
}

impl<V> RouteTable<V> {
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    pub fn route(mut self, pattern: &str, view: V) -> Self {
        self.routes.push(Route {
            pattern: RoutePattern::parse(pattern),
            view,
        });
        self
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn patterns(&self) -> impl Iterator<Item = &RoutePattern> {
        self.routes.iter().map(|r| &r.pattern)
    }

    /// The view for `path`, or `None` if nothing matches and there is no wildcard.
    pub fn resolve(&self, path: &str) -> Option<RouteMatch<'_, V>> {
        let found = self
            .routes
            .iter()
            .find(|r| r.pattern.as_str() == path)
            .map(|r| (r, Params::default()))
            .or_else(|| {
                self.routes
                    .iter()
                    .find_map(|r| r.pattern.captures(path).map(|params| (r, params)))
            })
            .or_else(|| {
                self.routes
                    .iter()
                    .find(|r| r.pattern == RoutePattern::Wildcard)
                    .map(|r| (r, Params::default()))
            });

        match found {
            Some((route, params)) => Some(RouteMatch {
                view: &route.view,
                pattern: &route.pattern,
                params,
            }),
            None => {
                tracing::debug!(path, "No route matches");
                None
            }
        }
    }
}

impl<V> Default for RouteTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum View {
        Home,
        Login,
        Detail,
        NotFound,
    }

    fn table() -> RouteTable<View> {
        RouteTable::new()
            .route("*", View::NotFound)
            .route("/", View::Home)
            .route("/login", View::Login)
            .route("/student/injury/:id", View::Detail)
    }

    #[test]
    fn test_exact_match() {
        let table = table();
        assert_eq!(table.resolve("/login").unwrap().view, &View::Login);
        assert_eq!(table.resolve("/").unwrap().view, &View::Home);
    }

    #[test]
    fn test_wildcard_declared_first_does_not_shadow_exact() {
        let table = table();
        let m = table.resolve("/login").unwrap();
        assert_eq!(m.pattern.as_str(), "/login");
    }

    #[test]
    fn test_unknown_path_falls_back_to_wildcard() {
        let table = table();
        let m = table.resolve("/nope").unwrap();
        assert_eq!(m.view, &View::NotFound);
        assert_eq!(m.pattern, &RoutePattern::Wildcard);
    }

    #[test]
    fn test_no_match_without_wildcard() {
        let table = RouteTable::new().route("/", View::Home);
        assert!(table.resolve("/nope").is_none());
    }

    #[test]
    fn test_trailing_slash_is_significant() {
        let table = RouteTable::new().route("/login", View::Login);
        assert!(table.resolve("/login/").is_none());
    }

    #[test]
    fn test_capture_segments() {
        let table = table();
        let m = table.resolve("/student/injury/injury-7").unwrap();
        assert_eq!(m.view, &View::Detail);
        assert_eq!(m.params.get("id"), Some("injury-7"));

        // empty capture and extra segments fall through to the wildcard
        assert_eq!(table.resolve("/student/injury/").unwrap().view, &View::NotFound);
        assert_eq!(
            table.resolve("/student/injury/a/b").unwrap().view,
            &View::NotFound
        );
    }

    #[test]
    fn test_literal_beats_capture() {
        let table = RouteTable::new()
            .route("/student/:page", View::Detail)
            .route("/student/dashboard", View::Home);
        assert_eq!(table.resolve("/student/dashboard").unwrap().view, &View::Home);
        assert_eq!(table.resolve("/student/other").unwrap().view, &View::Detail);
    }

    #[test]
    fn test_parse_patterns() {
        assert_eq!(RoutePattern::parse("*"), RoutePattern::Wildcard);
        assert_eq!(
            RoutePattern::parse("/admin/dashboard"),
            RoutePattern::Literal("/admin/dashboard".into())
        );
        assert_eq!(
            RoutePattern::parse("/a/:x/b/:y"),
            RoutePattern::Captures {
                raw: "/a/:x/b/:y".into(),
                segments: vec![
                    Segment::Static("a".into()),
                    Segment::Capture("x".into()),
                    Segment::Static("b".into()),
                    Segment::Capture("y".into()),
                ],
            }
        );
    }
}
