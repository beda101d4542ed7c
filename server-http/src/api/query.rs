/// Query string as raw pairs in request order.
///
/// Extracting into this never fails, so repeated keys reach the handler.
pub type QueryPairs = Vec<(String, String)>;

/// First value given for `name`, if any
pub fn first_value(pairs: &[(String, String)], name: &str) -> Option<String> {
    pairs
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> QueryPairs {
        raw.iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_first_value_wins() {
        let query = pairs(&[("status", "a"), ("include", "temp"), ("status", "b")]);
        assert_eq!(first_value(&query, "status").as_deref(), Some("a"));
        assert_eq!(first_value(&query, "include").as_deref(), Some("temp"));
        assert_eq!(first_value(&query, "batchId"), None);
    }
}
