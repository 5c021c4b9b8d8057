//! Keyword-table chat strategy
//!
//! The table is evaluated top to bottom and the first rule with a matching
//! pattern wins. Rules whose keywords are substrings of a later rule's
//! keywords ("digital marketing" vs "marketing", "book now" vs "book") are
//! ordered ahead of it.

use async_trait::async_trait;
use chrono::Utc;

use crate::{ChatReply, ChatResponder};

/// One predicate over the normalized (trimmed, lower-cased) input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    /// Input is empty
    Empty,
    /// Input equals the keyword
    Exact(&'static str),
    /// Input contains the keyword anywhere
    Contains(&'static str),
    /// Input contains the keyword as a whole word
    Word(&'static str),
}

impl Pattern {
    fn matches(&self, input: &str) -> bool {
        match self {
            Self::Empty => input.is_empty(),
            Self::Exact(k) => input == *k,
            Self::Contains(k) => input.contains(k),
            Self::Word(k) => input
                .split(|c: char| !c.is_alphanumeric())
                .any(|w| w == *k),
        }
    }
}

/// A canned response and the patterns that select it
#[derive(Debug)]
pub struct KeywordRule {
    pub name: &'static str,
    pub patterns: &'static [Pattern],
    pub response: &'static str,
}

impl KeywordRule {
    pub fn matches(&self, input: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(input))
    }

    /// Whether this is the catch-all rule
    pub fn is_default(&self) -> bool {
        std::ptr::eq(self, &DEFAULT_RULE)
    }
}

use Pattern::{Contains, Empty, Exact, Word};

pub const KEYWORD_TABLE: &[KeywordRule] = &[
    KeywordRule {
        name: "website-welcome",
        patterns: &[
            Contains("visited your website"),
            Contains("digital marketing services"),
            Contains("please share details"),
            Contains("would like to know more"),
            Contains("hello! i visited"),
        ],
        response: WEBSITE_WELCOME,
    },
    KeywordRule {
        name: "menu",
        patterns: &[
            Empty,
            Exact("hi"),
            Exact("hii"),
            Exact("hello"),
            Exact("hey"),
            Exact("start"),
            Exact("menu"),
            Word("hi"),
            Word("hello"),
            Word("hey"),
        ],
        response: MAIN_MENU,
    },
    KeywordRule {
        name: "ai-videos",
        patterns: &[Exact("1"), Contains("ai video"), Contains("avatar")],
        response: AI_VIDEOS,
    },
    KeywordRule {
        name: "digital-marketing",
        patterns: &[Exact("3"), Contains("digital marketing"), Contains("seo")],
        response: DIGITAL_MARKETING,
    },
    KeywordRule {
        name: "social-media",
        patterns: &[Exact("2"), Contains("social media"), Contains("marketing")],
        response: SOCIAL_MEDIA,
    },
    KeywordRule {
        name: "portfolio",
        patterns: &[
            Exact("4"),
            Contains("portfolio"),
            Contains("case studies"),
            Exact("samples"),
        ],
        response: PORTFOLIO,
    },
    KeywordRule {
        name: "pricing",
        patterns: &[
            Exact("5"),
            Contains("pricing"),
            Contains("cost"),
            Contains("price"),
        ],
        response: PRICING,
    },
    KeywordRule {
        name: "book-now",
        patterns: &[Exact("book now"), Exact("order")],
        response: BOOK_NOW,
    },
    KeywordRule {
        name: "consultation",
        patterns: &[
            Exact("6"),
            Contains("consultation"),
            Contains("book"),
            Exact("quote"),
        ],
        response: CONSULTATION,
    },
    KeywordRule {
        name: "contact",
        patterns: &[
            Exact("7"),
            Contains("contact"),
            Contains("phone"),
            Contains("email"),
        ],
        response: CONTACT,
    },
    KeywordRule {
        name: "about",
        patterns: &[Exact("8"), Contains("about"), Contains("company")],
        response: ABOUT,
    },
    KeywordRule {
        name: "help",
        patterns: &[Contains("help"), Contains("support"), Exact("urgent")],
        response: HELP,
    },
];

pub static DEFAULT_RULE: KeywordRule = KeywordRule {
    name: "default",
    patterns: &[],
    response: DEFAULT_RESPONSE,
};

/// Select the rule for `text`. Total: unmatched input gets [`DEFAULT_RULE`].
pub fn match_keyword(text: &str) -> &'static KeywordRule {
    let input = text.trim().to_lowercase();
    KEYWORD_TABLE
        .iter()
        .find(|rule| rule.matches(&input))
        .unwrap_or(&DEFAULT_RULE)
}

/// Stateless responder over [`KEYWORD_TABLE`]
#[derive(Debug, Default, Clone, Copy)]
pub struct KeywordResponder;

impl KeywordResponder {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ChatResponder for KeywordResponder {
    async fn respond(
        &self,
        text: &str,
        session_id: Option<&str>,
        _user_id: Option<&str>,
    ) -> ChatReply {
        let rule = match_keyword(text);
        tracing::debug!("Keyword rule '{}' matched", rule.name);

        ChatReply {
            message: rule.response.to_string(),
            session_id: session_id.map(str::to_string),
            from_knowledge_base: !rule.is_default(),
            confidence: (!rule.is_default()).then_some(1.0),
            suggested_actions: Vec::new(),
            timestamp: Utc::now(),
        }
    }

    fn strategy(&self) -> &'static str {
        "keyword"
    }
}

const WEBSITE_WELCOME: &str = r#"🚀 *Welcome to Adlync Solutions!*

Thank you for visiting our website! I'm your AI assistant ready to help.

*Our Digital Marketing Services:*

🎬 *AI Videos & Content Creation*
• AI Avatar Spokesperson Videos
• Product Demo Videos
• Social Media Content
• Starting from ₹5,000

📱 *Social Media Marketing*
• Instagram & Facebook Management
• Content Creation & Design
• Paid Advertising Campaigns
• Packages from ₹15,000/month

🎯 *Complete Digital Solutions*
• SEO & Google Ads
• Website Development
• Lead Generation Systems
• Custom packages from ₹25,000/month

*Quick Actions:*
• Type *"pricing"* for detailed pricing
• Type *"portfolio"* to see our work
• Type *"consultation"* for free strategy session
• Type *"services"* for complete service list

*For complete interactive menu with all options, just type* *"hi"*

*What specific service interests you most?*

Our team will respond within 5 minutes! 💬"#;

const MAIN_MENU: &str = r#"Welcome to Adlync Solutions AI Assistant!

Hi there! I am here to help you with our digital marketing services.

Please choose an option:

1 - AI Videos and Avatar Videos
2 - Social Media Marketing
3 - Digital Marketing Solutions
4 - Our Portfolio and Case Studies
5 - Pricing and Packages
6 - Book Free Consultation
7 - Contact Information
8 - About Adlync Solutions

Just type the number (1-8) or keyword!

Type "menu" anytime to see options again."#;

const AI_VIDEOS: &str = r#"🎬 *AI Videos & Avatar Videos*

We create stunning AI-powered videos:

✨ *Our AI Video Services:*
• AI Avatar Spokesperson Videos
• AI-Generated Product Demos
• Personalized Video Messages
• Animated Explainer Videos
• AI Voice-over & Dubbing

🎯 *Benefits:*
• Cost-effective than traditional videos
• Quick turnaround (24-48 hours)
• Multiple languages support
• Unlimited revisions
• Professional quality

💰 *Starting from ₹5,000 per video*

*Want to see samples?* Type *"samples"*
*Ready to order?* Type *"order"*
*Back to menu?* Type *"menu"*"#;

const SOCIAL_MEDIA: &str = r#"📱 *Social Media Marketing*

Grow your business with our expert social media strategies:

🚀 *Our Services:*
• Instagram & Facebook Management
• Content Creation & Design
• Paid Advertising Campaigns
• Influencer Marketing
• Analytics & Reporting
• Community Management

📊 *What You Get:*
• 30 posts per month
• Daily story updates
• Targeted ad campaigns
• Monthly performance reports
• 24/7 support

💰 *Packages starting from ₹15,000/month*

*Want custom package?* Type *"custom"*
*See our work?* Type *"portfolio"*
*Back to menu?* Type *"menu"*"#;

const DIGITAL_MARKETING: &str = r#"🚀 *Digital Marketing Solutions*

Complete digital transformation for your business:

🎯 *Our Expertise:*
• Search Engine Optimization (SEO)
• Google Ads & PPC Campaigns
• Website Development & Design
• Email Marketing Automation
• Brand Strategy & Development
• Lead Generation Systems

📈 *Results We Deliver:*
• 300% increase in website traffic
• 250% boost in lead generation
• 400% improvement in ROI
• Top Google rankings

💰 *Custom packages from ₹25,000/month*

*Free audit?* Type *"audit"*
*Case studies?* Type *"results"*
*Back to menu?* Type *"menu"*"#;

const PORTFOLIO: &str = r#"🏆 *Our Portfolio & Success Stories*

See how we've transformed businesses:

📊 *Recent Success Stories:*

*Case Study 1: E-commerce Brand*
• 500% increase in online sales
• 10x growth in social media followers
• ₹50L revenue in 6 months

*Case Study 2: Tech Startup*
• Generated 1000+ qualified leads
• Achieved #1 Google ranking
• 300% ROI on ad spend

*Case Study 3: Restaurant Chain*
• 200% increase in foot traffic
• Viral social media campaigns
• 15 new locations opened

🎬 *View Our Work:*
• AI Video Samples: bit.ly/adlync-videos
• Social Media: @adlyncsolutions
• Website Portfolio: adlyncsolutions.com

*Impressed?* Type *"consultation"*
*Back to menu?* Type *"menu"*"#;

const PRICING: &str = r#"💰 *Pricing & Packages*

Transparent pricing for all budgets:

🎬 *AI Video Packages:*
• Basic: ₹5,000 (30-sec video)
• Standard: ₹10,000 (60-sec + revisions)
• Premium: ₹20,000 (Multiple videos)

📱 *Social Media Packages:*
• Starter: ₹15,000/month
• Growth: ₹25,000/month
• Enterprise: ₹50,000/month

🚀 *Digital Marketing:*
• SEO Package: ₹20,000/month
• Complete Solution: ₹40,000/month
• Custom Enterprise: ₹1,00,000+/month

🎁 *Special Offers:*
• 20% off first month
• Free consultation worth ₹5,000
• No setup fees

*Custom quote?* Type *"quote"*
*Ready to start?* Type *"order"*
*Back to menu?* Type *"menu"*"#;

const CONSULTATION: &str = r#"📅 *Book Your FREE Consultation*

Get expert advice tailored to your business:

🎯 *What You'll Get:*
• 30-minute strategy session
• Business analysis & audit
• Custom marketing plan
• ROI projections
• No-obligation proposal

📞 *Book Now:*
• Call: +91-XXXX-XXXX-XXX
• Email: consultation@adlyncsolutions.com
• WhatsApp: Just reply "BOOK NOW"

⏰ *Available Slots:*
• Monday-Friday: 10 AM - 6 PM
• Saturday: 10 AM - 2 PM
• Emergency: 24/7 support

*Book immediately?* Type *"BOOK NOW"*
*Questions first?* Type *"questions"*
*Back to menu?* Type *"menu"*"#;

const CONTACT: &str = r#"📞 *Contact Adlync Solutions*

Get in touch with our team:

🏢 *Office Address:*
Adlync Solutions Pvt. Ltd.
123 Business Park, Sector 18
Gurgaon, Haryana 122001

📱 *Contact Details:*
• Phone: +91-XXXX-XXXX-XXX
• WhatsApp: +91-XXXX-XXXX-XXX
• Email: info@adlyncsolutions.com
• Website: www.adlyncsolutions.com

🕒 *Business Hours:*
• Monday-Friday: 9 AM - 7 PM
• Saturday: 10 AM - 4 PM
• Sunday: Emergency support only

🌐 *Follow Us:*
• Instagram: @adlyncsolutions
• LinkedIn: Adlync Solutions
• Facebook: AdlyncSolutions

*Emergency support?* Type *"urgent"*
*Back to menu?* Type *"menu"*"#;

const ABOUT: &str = r#"🏢 *About Adlync Solutions*

Your trusted digital marketing partner:

🚀 *Our Story:*
Founded in 2020, we've helped 500+ businesses transform their digital presence with cutting-edge AI technology and proven marketing strategies.

👥 *Our Team:*
• 25+ Digital Marketing Experts
• AI Technology Specialists
• Creative Content Creators
• Data Analytics Professionals

🏆 *Achievements:*
• 500+ Successful Projects
• 300% Average ROI for clients
• 50+ Industry Awards
• 99% Client Satisfaction Rate

🎯 *Our Mission:*
To democratize digital marketing with AI-powered solutions that deliver measurable results for businesses of all sizes.

💡 *Why Choose Us:*
• Proven track record
• Latest AI technology
• Transparent reporting
• 24/7 support

*Join our success story?* Type *"start"*
*Back to menu?* Type *"menu"*"#;

const BOOK_NOW: &str = r#"🎉 *Excellent Choice!*

Our team will contact you within 2 hours to discuss your requirements.

📋 *Next Steps:*
1. Our expert will call you
2. Free consultation & strategy session
3. Custom proposal & timeline
4. Project kickoff

📞 *Immediate Assistance:*
Call us now: +91-XXXX-XXXX-XXX

*Urgent requirement?* Type *"urgent"*
*Change contact details?* Type *"contact"*

Thank you for choosing Adlync Solutions! 🚀"#;

const HELP: &str = r#"🆘 *Need Help?*

Our support team is here for you:

📞 *Immediate Support:*
• Call: +91-XXXX-XXXX-XXX
• WhatsApp: This number
• Email: support@adlyncsolutions.com

❓ *Common Questions:*
• Pricing: Type *"5"*
• Services: Type *"menu"*
• Portfolio: Type *"4"*
• Consultation: Type *"6"*

🕒 *Response Time:*
• WhatsApp: Within 5 minutes
• Phone: Immediate
• Email: Within 2 hours

*Back to main menu?* Type *"menu"*"#;

const DEFAULT_RESPONSE: &str = r#"🤖 I didn't quite understand that.

Here are some things you can try:

• Type *"menu"* for main options
• Type *"help"* for assistance
• Type *"contact"* for our details
• Use numbers 1-8 for specific services

Or simply tell me what you're looking for, and I'll help you find the right solution!

*What can I help you with today?* 🚀"#;

#[cfg(test)]
mod tests {
    use super::*;

    fn rule_for(text: &str) -> &'static str {
        match_keyword(text).name
    }

    #[test]
    fn test_every_rule_reachable() {
        for rule in KEYWORD_TABLE {
            let sample = match rule.patterns[0] {
                Empty => String::new(),
                Exact(k) | Contains(k) | Word(k) => k.to_string(),
            };
            assert_eq!(
                match_keyword(&sample).name,
                rule.name,
                "first pattern of '{}' is shadowed",
                rule.name
            );
        }
    }

    #[test]
    fn test_menu() {
        assert_eq!(rule_for("hi"), "menu");
        assert_eq!(rule_for("  HELLO  "), "menu");
        assert_eq!(rule_for(""), "menu");
        assert_eq!(rule_for("hi there"), "menu");
        assert!(match_keyword("hi").response.contains("1 - AI Videos"));
    }

    #[test]
    fn test_hi_is_a_word_match() {
        // "this" and "ship" contain "hi" but are not greetings
        assert_eq!(rule_for("this"), "default");
        assert_eq!(rule_for("ship my order"), "default");
    }

    #[test]
    fn test_digits() {
        let expected = [
            ("1", "ai-videos"),
            ("2", "social-media"),
            ("3", "digital-marketing"),
            ("4", "portfolio"),
            ("5", "pricing"),
            ("6", "consultation"),
            ("7", "contact"),
            ("8", "about"),
        ];
        for (digit, name) in expected {
            assert_eq!(rule_for(digit), name, "digit {}", digit);
        }
        assert_eq!(rule_for("9"), "default");
    }

    #[test]
    fn test_topic_keywords() {
        assert_eq!(rule_for("what is your pricing"), "pricing");
        assert_eq!(rule_for("Need SEO"), "digital-marketing");
        assert_eq!(rule_for("I want digital marketing"), "digital-marketing");
        assert_eq!(rule_for("influencer marketing"), "social-media");
        assert_eq!(rule_for("book now"), "book-now");
        assert_eq!(rule_for("Order"), "book-now");
        assert_eq!(rule_for("can I book a call"), "consultation");
        assert_eq!(rule_for("need support"), "help");
        assert_eq!(rule_for("urgent"), "help");
    }

    #[test]
    fn test_website_welcome_wins() {
        assert_eq!(
            rule_for("Hello! I visited your website and would like to know more"),
            "website-welcome"
        );
        assert_eq!(rule_for("Tell me about digital marketing services"), "website-welcome");
    }

    #[test]
    fn test_deterministic() {
        let a = match_keyword("5").response;
        let b = match_keyword("5").response;
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_responder_reply() {
        let responder = KeywordResponder::new();
        let reply = responder.respond("pricing", Some("s-1"), None).await;
        assert!(reply.message.contains("Pricing & Packages"));
        assert_eq!(reply.session_id.as_deref(), Some("s-1"));
        assert!(reply.from_knowledge_base);
        assert_eq!(responder.strategy(), "keyword");

        let reply = responder.respond("qwerty", None, None).await;
        assert!(reply.message.contains("didn't quite understand"));
        assert!(!reply.from_knowledge_base);
    }
}
