//! Follow-up actions offered with completion replies

const MAX_SUGGESTIONS: usize = 3;

/// Up to three follow-up actions for a user query.
///
/// Query-specific entries come first so the cap never drops them.
pub fn suggested_actions(query: &str, from_knowledge_base: bool) -> Vec<String> {
    let query = query.to_lowercase();
    let mut suggestions = Vec::with_capacity(5);

    if query.contains("price") || query.contains("cost") {
        suggestions.push("Get custom quote");
    }
    if query.contains("demo") || query.contains("example") {
        suggestions.push("See success stories");
    }

    let base: [&str; 3] = if from_knowledge_base {
        ["Tell me more details", "Book free consultation", "See case studies"]
    } else {
        ["Learn about AI chatbots", "Explore AI agents", "Book strategy session"]
    };
    suggestions.extend(base);

    suggestions
        .into_iter()
        .take(MAX_SUGGESTIONS)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_trio() {
        assert_eq!(
            suggested_actions("tell me about chatbots", true),
            vec!["Tell me more details", "Book free consultation", "See case studies"]
        );
        assert_eq!(
            suggested_actions("hmm", false),
            vec!["Learn about AI chatbots", "Explore AI agents", "Book strategy session"]
        );
    }

    #[test]
    fn test_price_query_keeps_quote() {
        let s = suggested_actions("What does it COST?", true);
        assert_eq!(s.len(), 3);
        assert_eq!(s[0], "Get custom quote");
    }

    #[test]
    fn test_both_keywords() {
        let s = suggested_actions("price of a demo", false);
        assert_eq!(s, vec!["Get custom quote", "See success stories", "Learn about AI chatbots"]);
    }
}
