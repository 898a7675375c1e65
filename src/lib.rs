pub mod cache;
pub mod category;
pub mod classifier;
pub mod config;
pub mod defaults;
pub mod keywords;
pub mod labels;
pub mod registry;
pub mod sender;

pub use category::{
    Category, ClassificationResult, Evidence, LabelMapping, MatchType, Message, PriorityTier,
    SenderPatterns,
};
pub use classifier::{CategoryStore, Classifier, InMemoryStore};
pub use config::{ClassifierConfig, PromotionRule};
pub use registry::CategoryRegistry;
