use common::types::Example;

pub const QUERY_PREFIX: &str = "query: ";
pub const PASSAGE_PREFIX: &str = "passage: ";

/// Prefixes the query and both passages the way E5 models expect.
/// A missing negative stays missing.
pub fn format_as_e5(example: &Example) -> Example {
    Example::new(
        format!("{QUERY_PREFIX}{}", example.query()),
        format!("{PASSAGE_PREFIX}{}", example.positive_passage()),
        example
            .negative_passage()
            .map(|negative| format!("{PASSAGE_PREFIX}{negative}")),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_every_present_field() {
        let plain = Example::new("capital of korea", "Seoul is the capital.", Some("Busan is a port.".into()));
        let formatted = format_as_e5(&plain);

        assert_eq!(formatted.query(), "query: capital of korea");
        assert_eq!(formatted.positive_passage(), "passage: Seoul is the capital.");
        assert_eq!(formatted.negative_passage(), Some("passage: Busan is a port."));
        assert_eq!(plain.query(), "capital of korea");
    }

    #[test]
    fn keeps_missing_negative_empty() {
        let formatted = format_as_e5(&Example::new("q", "d", None));
        assert_eq!(formatted.negative_passage(), None);
    }
}
