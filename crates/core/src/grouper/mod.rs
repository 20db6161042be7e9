//! Partitions archive names by their leading `[ClientTag]`.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex_lite::Regex;

fn tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\[(.*?)\]").expect("static pattern compiles"))
}

/// Returns the text inside the first bracket pair at the very start of `name`.
///
/// Only the first group counts: `[A][B]x.zip` yields `A`. An empty tag
/// (`[]x.zip`) is treated like a missing one.
pub fn extract_client_tag(name: &str) -> Option<&str> {
    tag_pattern()
        .captures(name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .filter(|tag| !tag.is_empty())
}

/// Archives belonging to one client, in discovery order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientGroup {
    pub client: String,
    pub archives: Vec<String>,
}

/// Groups names by client tag, keeping first-seen order of tags and of
/// names within a tag. Untagged names are dropped.
pub fn group_by_client<I, S>(names: I) -> Vec<ClientGroup>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut groups: Vec<ClientGroup> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for name in names {
        let name = name.as_ref();
        let Some(tag) = extract_client_tag(name) else {
            continue;
        };

        match index.get(tag) {
            Some(&i) => groups[i].archives.push(name.to_string()),
            None => {
                index.insert(tag.to_string(), groups.len());
                groups.push(ClientGroup {
                    client: tag.to_string(),
                    archives: vec![name.to_string()],
                });
            }
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_client_tag() {
        assert_eq!(extract_client_tag("[Acme]a.zip"), Some("Acme"));
        assert_eq!(extract_client_tag("[Acme Corp, Ltd.]x.zip"), Some("Acme Corp, Ltd."));
        assert_eq!(extract_client_tag("[A][B]x.zip"), Some("A"));
        assert_eq!(extract_client_tag("[A]x[B].zip"), Some("A"));
    }

    #[test]
    fn test_extract_client_tag_requires_leading_bracket() {
        assert_eq!(extract_client_tag("a.zip"), None);
        assert_eq!(extract_client_tag("x[Acme].zip"), None);
        assert_eq!(extract_client_tag(" [Acme].zip"), None);
        assert_eq!(extract_client_tag("[Acme.zip"), None);
        assert_eq!(extract_client_tag("[]a.zip"), None);
    }

    #[test]
    fn test_group_preserves_order() {
        let groups = group_by_client([
            "[Globex]c.zip",
            "[Acme]a.zip",
            "untagged.zip",
            "[Acme]b.zip",
        ]);

        assert_eq!(
            groups,
            vec![
                ClientGroup {
                    client: "Globex".to_string(),
                    archives: vec!["[Globex]c.zip".to_string()],
                },
                ClientGroup {
                    client: "Acme".to_string(),
                    archives: vec!["[Acme]a.zip".to_string(), "[Acme]b.zip".to_string()],
                },
            ]
        );
    }

    #[test]
    fn test_group_all_untagged_is_empty() {
        let groups = group_by_client(vec!["a.zip".to_string(), "b.zip".to_string()]);
        assert!(groups.is_empty());
    }
}
