//! Query-string builder for the row API.
//!
//! Filters use the `column=op.value` form (`id=eq.42`, `status=neq.resolved`).
//! Values are percent-encoded by the HTTP client, not here.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Order {
    Asc,
    Desc,
}

impl Order {
    fn as_str(&self) -> &'static str {
        match self {
            Order::Asc => "asc",
            Order::Desc => "desc",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Query {
    pairs: Vec<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(self, columns: &str) -> Self {
        self.param("select", columns.to_string())
    }

    pub fn eq(self, column: &str, value: &str) -> Self {
        self.filter(column, "eq", value)
    }

    pub fn neq(self, column: &str, value: &str) -> Self {
        self.filter(column, "neq", value)
    }

    pub fn gte(self, column: &str, value: &str) -> Self {
        self.filter(column, "gte", value)
    }

    pub fn order(self, column: &str, order: Order) -> Self {
        self.param("order", format!("{column}.{}", order.as_str()))
    }

    pub fn limit(self, limit: usize) -> Self {
        self.param("limit", limit.to_string())
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    fn filter(self, column: &str, op: &str, value: &str) -> Self {
        self.param(column, format!("{op}.{value}"))
    }

    fn param(mut self, key: &str, value: String) -> Self {
        self.pairs.push((key.to_string(), value));
        self
    }
}

/// Total row count from a `Content-Range` header such as `0-24/3573` or `*/0`.
pub fn parse_content_range(header: &str) -> Option<u64> {
    let (_, total) = header.trim().rsplit_once('/')?;
    total.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builds_pairs_in_order() {
        let query = Query::new()
            .select("*")
            .eq("student_id", "user-1")
            .order("created_at", Order::Desc)
            .limit(5);
        let pairs: Vec<(&str, &str)> = query
            .pairs()
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("select", "*"),
                ("student_id", "eq.user-1"),
                ("order", "created_at.desc"),
                ("limit", "5"),
            ]
        );
    }

    #[test]
    fn test_filters() {
        let query = Query::new()
            .neq("status", "resolved")
            .gte("appointment_date", "2025-01-01T00:00:00Z");
        assert_eq!(query.pairs()[0].1, "neq.resolved");
        assert_eq!(query.pairs()[1].1, "gte.2025-01-01T00:00:00Z");
    }

    #[test]
    fn test_content_range() {
        assert_eq!(parse_content_range("0-24/3573"), Some(3573));
        assert_eq!(parse_content_range("*/0"), Some(0));
        assert_eq!(parse_content_range("0-9/*"), None);
        assert_eq!(parse_content_range("garbage"), None);
    }
}
