//! Built-in category definitions.
//!
//! A workable starting set for a university inbox: placement drives, NPTEL
//! course mail, department notices, portal credentials, promotions, campus
//! events, professor correspondence, and a catch-all. Deployments normally
//! source categories from their own store; this set keeps the binary useful
//! out of the box and feeds the integration tests.

use crate::category::{Category, LabelMapping, MatchType, PriorityTier, SenderPatterns};

fn strs(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn placement() -> Category {
    Category {
        name: "Placement".to_string(),
        priority: PriorityTier::High,
        weight: 1.3,
        primary_keywords: strs(&[
            "placement",
            "recruitment",
            "interview",
            "career",
            "shortlisting",
            "hiring",
            "vacancy",
            "resume",
            "campus drive",
            "offer letter",
            "walk-in drive",
        ]),
        secondary_keywords: strs(&[
            "company",
            "salary",
            "package",
            "ctc",
            "internship",
            "recruiter",
            "aptitude",
            "stipend",
            "placement cell",
            "tpo",
        ]),
        phrases: strs(&[
            "placement drive",
            "job opportunity",
            "campus recruitment",
            "selection process",
            "resume shortlisting",
            "interview scheduled",
            "pre-placement offer",
            "we are hiring",
        ]),
        exclusion_keywords: strs(&[
            "nptel course",
            "hod notice",
            "servicenow",
            "nowlearning",
            "head of department",
        ]),
        subject_aliases: strs(&["placement"]),
        sender_patterns: SenderPatterns {
            domains: strs(&["naukri.com", "linkedin.com", "shardainformatics.com"]),
            names: strs(&[
                "placement cell",
                "recruitment team",
                "career services",
                "training and placement",
                "talent acquisition",
            ]),
            exclude_domains: strs(&["service-now.com", "servicenow.com", "nowlearning.com"]),
            exclude_names: strs(&["servicenow", "nowlearning"]),
            specific_sender_regexes: Vec::new(),
        },
        trust_on_sender: false,
    }
}

fn nptel() -> Category {
    Category {
        name: "NPTEL".to_string(),
        priority: PriorityTier::High,
        weight: 1.4,
        primary_keywords: strs(&[
            "nptel",
            "course",
            "lecture",
            "enrollment",
            "certificate",
            "assignment",
            "proctored",
            "swayam",
        ]),
        secondary_keywords: strs(&[
            "iit",
            "mooc",
            "quiz",
            "syllabus",
            "hall ticket",
            "exam slot",
            "passing criteria",
        ]),
        phrases: strs(&[
            "course registration",
            "certificate exam",
            "nptel newsletter",
            "weekly assignment",
            "verified certificate",
            "exam registration open",
        ]),
        exclusion_keywords: strs(&["placement drive", "servicenow", "nowlearning"]),
        subject_aliases: strs(&["nptel"]),
        sender_patterns: SenderPatterns {
            domains: strs(&["nptel.ac.in", "nptel.iitm.ac.in", "swayam.gov.in"]),
            names: strs(&["nptel", "iit madras", "swayam"]),
            exclude_domains: strs(&["service-now.com", "servicenow.com", "nowlearning.com"]),
            exclude_names: strs(&["servicenow"]),
            specific_sender_regexes: Vec::new(),
        },
        trust_on_sender: false,
    }
}

fn hod() -> Category {
    Category {
        name: "HOD".to_string(),
        priority: PriorityTier::Low,
        weight: 1.4,
        primary_keywords: strs(&[
            "hod",
            "notice",
            "circular",
            "announcement",
            "mandatory",
            "reschedule",
        ]),
        secondary_keywords: strs(&[
            "department meeting",
            "all students",
            "academic calendar",
            "evaluation date",
            "urgent",
        ]),
        phrases: strs(&[
            "head of department",
            "department notice",
            "hod office",
            "all students are requested",
            "mandatory attendance",
        ]),
        exclusion_keywords: strs(&["placement drive", "nptel course", "promotion offer"]),
        subject_aliases: strs(&["hod"]),
        sender_patterns: SenderPatterns {
            domains: strs(&["sharda.ac.in", "cse.sharda.ac.in"]),
            names: strs(&["hod", "head of department", "department head"]),
            exclude_domains: Vec::new(),
            exclude_names: Vec::new(),
            specific_sender_regexes: Vec::new(),
        },
        trust_on_sender: true,
    }
}

fn e_zone() -> Category {
    Category {
        name: "E-Zone".to_string(),
        priority: PriorityTier::High,
        weight: 1.5,
        primary_keywords: strs(&[
            "e-zone",
            "ezone",
            "portal",
            "otp",
            "password reset",
            "login credentials",
        ]),
        secondary_keywords: strs(&[
            "verification code",
            "account verification",
            "student portal",
            "valid for today",
        ]),
        phrases: strs(&[
            "sharda e-zone",
            "one time password",
            "reset your password",
            "portal login",
            "account access",
        ]),
        exclusion_keywords: strs(&["placement", "nptel", "chatgpt", "openai"]),
        subject_aliases: strs(&["e-zone", "ezone"]),
        sender_patterns: SenderPatterns {
            domains: strs(&["ezone.sharda.ac.in", "ezone.shardauniversity.com"]),
            names: strs(&["e-zone", "student portal", "portal admin"]),
            exclude_domains: strs(&["openai.com", "email.openai.com", "chatgpt.com"]),
            exclude_names: strs(&["chatgpt", "openai"]),
            specific_sender_regexes: Vec::new(),
        },
        trust_on_sender: true,
    }
}

fn promotions() -> Category {
    Category {
        name: "Promotions".to_string(),
        priority: PriorityTier::High,
        weight: 1.2,
        primary_keywords: strs(&[
            "offer",
            "discount",
            "sale",
            "promotion",
            "unsubscribe",
            "exclusive",
            "promo",
        ]),
        secondary_keywords: strs(&[
            "free screening",
            "health checkup",
            "medical camp",
            "wellness",
            "consultation",
        ]),
        phrases: strs(&[
            "limited time offer",
            "special discount",
            "buy now",
            "flash sale",
            "free consultation",
        ]),
        exclusion_keywords: strs(&["placement drive", "nptel course", "exam schedule"]),
        subject_aliases: strs(&["promotions", "promotion"]),
        sender_patterns: SenderPatterns {
            domains: strs(&["shardacare.com", "offers.com", "deals.com"]),
            names: strs(&["promotions", "offers", "marketing team", "shardacare"]),
            exclude_domains: Vec::new(),
            exclude_names: Vec::new(),
            specific_sender_regexes: Vec::new(),
        },
        trust_on_sender: false,
    }
}

fn whats_happening() -> Category {
    Category {
        name: "Whats happening".to_string(),
        priority: PriorityTier::High,
        weight: 1.2,
        primary_keywords: strs(&[
            "event",
            "workshop",
            "seminar",
            "hackathon",
            "fest",
            "webinar",
            "competition",
        ]),
        secondary_keywords: strs(&[
            "volunteers",
            "guest lecture",
            "orientation",
            "convocation",
            "registration open",
            "tree plantation",
        ]),
        phrases: strs(&[
            "campus event",
            "what's happening",
            "register for event",
            "join us for",
            "limited seats",
            "last date to register",
        ]),
        exclusion_keywords: strs(&["placement drive", "job opportunity", "nptel course"]),
        subject_aliases: strs(&["what's happening", "whats happening"]),
        sender_patterns: SenderPatterns {
            domains: strs(&["events.sharda.ac.in", "dsw.sharda.ac.in"]),
            names: strs(&["what's happening", "whats happening", "events team", "dsw"]),
            exclude_domains: Vec::new(),
            exclude_names: Vec::new(),
            specific_sender_regexes: Vec::new(),
        },
        trust_on_sender: false,
    }
}

fn professor() -> Category {
    Category {
        name: "Professor".to_string(),
        priority: PriorityTier::High,
        weight: 1.3,
        primary_keywords: strs(&[
            "professor",
            "faculty",
            "evaluation",
            "attendance",
            "assessment",
            "viva",
            "lecturer",
        ]),
        secondary_keywords: strs(&[
            "project submission",
            "assignment submission",
            "office hours",
            "internal assessment",
            "thesis",
        ]),
        phrases: strs(&[
            "assistant professor",
            "associate professor",
            "project evaluation",
            "check attendance",
            "dear students",
            "start your exam",
        ]),
        exclusion_keywords: strs(&["placement drive", "job opportunity", "promotion offer"]),
        subject_aliases: strs(&["professor"]),
        sender_patterns: SenderPatterns {
            // No bare university domain here: it would swallow every
            // departmental sender ahead of the lower-tier categories.
            domains: Vec::new(),
            names: strs(&["professor", "faculty", "lecturer"]),
            exclude_domains: Vec::new(),
            exclude_names: Vec::new(),
            // Title-prefixed personal names and parenthesized faculty roles.
            specific_sender_regexes: strs(&[
                r"dr\.\s+\w+\s+\w+",
                r"\((?:assistant|associate)?\s*professor\)",
            ]),
        },
        trust_on_sender: true,
    }
}

fn other() -> Category {
    Category {
        name: "Other".to_string(),
        priority: PriorityTier::Normal,
        weight: 0.5,
        primary_keywords: strs(&[
            "servicenow",
            "nowlearning",
            "chatgpt",
            "openai",
            "past due",
            "learning content",
        ]),
        secondary_keywords: strs(&[
            "system notification",
            "automated message",
            "do not reply",
            "auto-generated",
        ]),
        phrases: strs(&[
            "assigned to you is past due",
            "learning content has been assigned",
            "upgrade now for advanced access",
        ]),
        exclusion_keywords: Vec::new(),
        subject_aliases: Vec::new(),
        sender_patterns: SenderPatterns {
            domains: strs(&[
                "service-now.com",
                "servicenow.com",
                "nowlearning.com",
                "openai.com",
                "email.openai.com",
            ]),
            names: strs(&["servicenow", "nowlearning", "chatgpt", "openai"]),
            exclude_domains: Vec::new(),
            exclude_names: Vec::new(),
            specific_sender_regexes: Vec::new(),
        },
        trust_on_sender: true,
    }
}

/// The full built-in category set, in evaluation-friendly order.
pub fn default_categories() -> Vec<Category> {
    vec![
        placement(),
        nptel(),
        e_zone(),
        promotions(),
        whats_happening(),
        professor(),
        other(),
        hod(),
    ]
}

/// Sample label mappings matching the built-in categories.
pub fn default_label_mappings() -> Vec<LabelMapping> {
    vec![
        LabelMapping {
            source_label: "Job-Fair".to_string(),
            category_name: "Placement".to_string(),
            match_type: MatchType::Exact,
            regex_pattern: None,
            priority: 10,
            is_active: true,
        },
        LabelMapping {
            source_label: "nptel".to_string(),
            category_name: "NPTEL".to_string(),
            match_type: MatchType::Contains,
            regex_pattern: None,
            priority: 5,
            is_active: true,
        },
        LabelMapping {
            source_label: "campus events".to_string(),
            category_name: "Whats happening".to_string(),
            match_type: MatchType::Regex,
            regex_pattern: Some(r"^event[-_ ]".to_string()),
            priority: 1,
            is_active: true,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{Classifier, InMemoryStore};
    use crate::config::ClassifierConfig;
    use crate::category::Message;
    use std::sync::Arc;

    fn default_classifier() -> Classifier {
        Classifier::new(
            Arc::new(InMemoryStore::new(
                default_categories(),
                default_label_mappings(),
            )),
            ClassifierConfig::default(),
        )
    }

    #[test]
    fn test_default_set_is_consistent() {
        let categories = default_categories();
        assert_eq!(categories.len(), 8);
        let fallback_exists = categories.iter().any(|c| c.name == "Other");
        assert!(fallback_exists);
        for mapping in default_label_mappings() {
            assert!(categories.iter().any(|c| c.name == mapping.category_name));
        }
    }

    #[test]
    fn test_default_set_classifies_hod_notice() {
        let clf = default_classifier();
        let result = clf.classify(
            &Message {
                subject: "Exam Reschedule Notice".to_string(),
                from: "HOD CSE <hod.cse@sharda.ac.in>".to_string(),
                ..Default::default()
            },
            "default",
        );
        assert_eq!(result.label, "HOD");
        assert_eq!(result.method, "sender-domain");
    }

    #[test]
    fn test_default_set_excludes_openai_from_ezone() {
        let clf = default_classifier();
        let result = clf.classify(
            &Message {
                subject: "Your login details".to_string(),
                from: "ChatGPT <noreply@email.openai.com>".to_string(),
                body: "portal login credentials for account access".to_string(),
                ..Default::default()
            },
            "default",
        );
        assert_ne!(result.label, "E-Zone");
        assert_eq!(result.label, "Other");
    }

    #[test]
    fn test_default_set_keyword_path() {
        let clf = default_classifier();
        let result = clf.classify(
            &Message {
                subject: "Campus recruitment: interview shortlisting".to_string(),
                from: "hr@techcorp.example".to_string(),
                snippet: "resume shortlisting for the campus drive".to_string(),
                body: "the selection process starts Monday".to_string(),
                ..Default::default()
            },
            "default",
        );
        assert_eq!(result.label, "Placement");
        assert!(result.confidence >= 0.75);
    }
}
