use serde::{Deserialize, Serialize};

/// Tags as clients send them: either a JSON array or a comma-separated string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TagsInput {
    List(Vec<String>),
    Csv(String),
}

impl TagsInput {
    pub fn normalize(&self) -> Vec<String> {
        match self {
            TagsInput::List(items) => normalize_tags(items.iter().map(String::as_str)),
            TagsInput::Csv(raw) => normalize_tags(raw.split(',')),
        }
    }
}

/// Trims every tag, drops empties and keeps the first occurrence of each duplicate.
pub fn normalize_tags<'a, I>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut tags: Vec<String> = Vec::new();
    for tag in raw.into_iter().map(str::trim).filter(|t| !t.is_empty()) {
        if !tags.iter().any(|existing| existing == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

/// Parses a `tags=x,y` query value; same rules as story tags.
pub fn parse_tag_query(raw: &str) -> Vec<String> {
    normalize_tags(raw.split(','))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_is_trimmed_deduplicated_and_ordered() {
        let tags = TagsInput::Csv("a, b ,,b".to_string()).normalize();
        assert_eq!(tags, vec!["a", "b"]);
    }

    #[test]
    fn test_list_gets_same_treatment_as_csv() {
        let tags = TagsInput::List(vec![
            " travel ".to_string(),
            "".to_string(),
            "food".to_string(),
            "travel".to_string(),
        ])
        .normalize();
        assert_eq!(tags, vec!["travel", "food"]);
    }

    #[test]
    fn test_dedup_is_case_sensitive() {
        let tags = normalize_tags(["Paris", "paris"]);
        assert_eq!(tags, vec!["Paris", "paris"]);
    }

    #[test]
    fn test_blank_input_yields_no_tags() {
        assert!(TagsInput::Csv("  , ,".to_string()).normalize().is_empty());
        assert!(parse_tag_query("").is_empty());
    }

    #[test]
    fn test_input_deserializes_from_string_or_array() {
        let csv: TagsInput = serde_json::from_str("\"x, y\"").unwrap();
        assert_eq!(csv.normalize(), vec!["x", "y"]);

        let list: TagsInput = serde_json::from_str("[\"x\", \"y\", \"x\"]").unwrap();
        assert_eq!(list.normalize(), vec!["x", "y"]);
    }
}
