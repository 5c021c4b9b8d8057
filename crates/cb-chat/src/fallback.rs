//! Offline answers used when no completion API is configured

/// A canned answer with its provenance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FallbackAnswer {
    pub message: &'static str,
    pub from_knowledge_base: bool,
    pub confidence: f32,
}

const SERVICES_TERMS: &[&str] = &["adlync", "services", "what do you", "ai", "chatbot", "automation"];
const GREETING_TERMS: &[&str] = &["hello", "hi", "hey"];

const SERVICES: FallbackAnswer = FallbackAnswer {
    message: "Adlync Solutions: AI automation experts (5+ years). Services: AI chatbots (100+ built), AI agents (50+ deployed), voice systems, workflows. Clients often see 300% lead growth, 4hr to 30sec response times. Free consultation available! 🚀",
    from_knowledge_base: true,
    confidence: 0.8,
};

const GREETING: FallbackAnswer = FallbackAnswer {
    message: "Hello! 👋 Adlync Solutions - AI automation experts. 100+ chatbots, 50+ agents deployed. Clients often achieve 300% lead growth. How can we help automate your business?",
    from_knowledge_base: true,
    confidence: 0.9,
};

const GENERIC: FallbackAnswer = FallbackAnswer {
    message: "Adlync Solutions specializes in AI automation: chatbots, agents, voice systems, workflows. 5+ years expertise, clients often see 300% lead growth. What challenge can we help solve? Free consultation available! 🤖",
    from_knowledge_base: false,
    confidence: 0.5,
};

/// Pick the offline answer for `text`
pub fn offline_answer(text: &str) -> FallbackAnswer {
    let lower = text.to_lowercase();
    let words: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    // Short terms match whole words, phrases match as substrings
    let mentions = |term: &&str| {
        if term.contains(' ') {
            lower.contains(*term)
        } else {
            words.contains(term)
        }
    };

    if SERVICES_TERMS.iter().any(mentions) {
        SERVICES
    } else if GREETING_TERMS.iter().any(mentions) {
        GREETING
    } else {
        GENERIC
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_services_first() {
        assert_eq!(offline_answer("Hi, what services do you offer?"), SERVICES);
        assert_eq!(offline_answer("Tell me about AI"), SERVICES);
        assert_eq!(offline_answer("what do you build"), SERVICES);
    }

    #[test]
    fn test_greeting() {
        assert_eq!(offline_answer("hey there"), GREETING);
    }

    #[test]
    fn test_generic() {
        let answer = offline_answer("this is my situation");
        assert_eq!(answer, GENERIC);
        assert!(!answer.from_knowledge_base);
    }

    #[test]
    fn test_short_terms_are_whole_words() {
        // "said" contains "ai", "this" contains "hi"
        assert_eq!(offline_answer("she said this"), GENERIC);
    }
}
