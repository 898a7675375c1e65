use clap::{Arg, Command};
use log::LevelFilter;
use mailsift::classifier::{Classifier, InMemoryStore};
use mailsift::config::ClassifierConfig;
use mailsift::{defaults, Category, LabelMapping, Message};
use std::process;
use std::sync::Arc;

fn main() {
    let matches = Command::new("mailsift")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Deterministic rule-based mail classification")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Classifier tuning file (YAML); defaults apply when omitted"),
        )
        .arg(
            Arg::new("categories")
                .long("categories")
                .value_name("FILE")
                .help("Category definitions (YAML list); built-in set when omitted"),
        )
        .arg(
            Arg::new("mappings")
                .long("mappings")
                .value_name("FILE")
                .help("Label mappings (YAML list); built-in set when omitted"),
        )
        .arg(
            Arg::new("message")
                .short('m')
                .long("message")
                .value_name("FILE")
                .help("Message to classify (JSON object, or JSON array for a batch)"),
        )
        .arg(
            Arg::new("scope")
                .long("scope")
                .value_name("SCOPE")
                .default_value("default")
                .help("Owner scope for category and mapping lookups"),
        )
        .arg(
            Arg::new("generate-config")
                .long("generate-config")
                .value_name("FILE")
                .help("Write the default classifier tuning file and exit"),
        )
        .arg(
            Arg::new("test-config")
                .long("test-config")
                .help("Validate configuration and category files, then exit")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging with match traces")
                .action(clap::ArgAction::SetTrue),
        )
        .get_matches();

    let log_level = if matches.get_flag("verbose") {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    if let Some(path) = matches.get_one::<String>("generate-config") {
        let config = ClassifierConfig::default();
        match config.to_file(path) {
            Ok(()) => {
                println!("Default configuration written to {path}");
                return;
            }
            Err(e) => {
                eprintln!("Failed to write configuration: {e}");
                process::exit(1);
            }
        }
    }

    let config = match matches.get_one::<String>("config") {
        Some(path) => match ClassifierConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load configuration from {path}: {e}");
                process::exit(1);
            }
        },
        None => ClassifierConfig::default(),
    };

    let categories = match matches.get_one::<String>("categories") {
        Some(path) => match load_yaml::<Vec<Category>>(path) {
            Ok(categories) => categories,
            Err(e) => {
                eprintln!("Failed to load categories from {path}: {e}");
                process::exit(1);
            }
        },
        None => defaults::default_categories(),
    };

    let mappings = match matches.get_one::<String>("mappings") {
        Some(path) => match load_yaml::<Vec<LabelMapping>>(path) {
            Ok(mappings) => mappings,
            Err(e) => {
                eprintln!("Failed to load label mappings from {path}: {e}");
                process::exit(1);
            }
        },
        None => defaults::default_label_mappings(),
    };

    if matches.get_flag("test-config") {
        // Compilation surfaces every invalid pattern in the logs; the run
        // itself succeeds because bad rules are skipped, not fatal.
        let registry = mailsift::CategoryRegistry::compile(categories.clone());
        println!(
            "Configuration OK: {} categories, {} label mappings, fallback '{}'",
            registry.len(),
            mappings.len(),
            config.fallback_category
        );
        return;
    }

    let scope = matches.get_one::<String>("scope").unwrap().clone();
    let classifier = Classifier::new(Arc::new(InMemoryStore::new(categories, mappings)), config);

    let message_path = match matches.get_one::<String>("message") {
        Some(path) => path,
        None => {
            eprintln!("No message file given; use --message FILE (see --help)");
            process::exit(2);
        }
    };

    let content = match std::fs::read_to_string(message_path) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Failed to read {message_path}: {e}");
            process::exit(1);
        }
    };

    // A JSON array classifies as an order-preserving batch.
    let output = if content.trim_start().starts_with('[') {
        match serde_json::from_str::<Vec<Message>>(&content) {
            Ok(messages) => {
                serde_json::to_string_pretty(&classifier.classify_batch(&messages, &scope))
            }
            Err(e) => {
                eprintln!("Failed to parse message batch: {e}");
                process::exit(1);
            }
        }
    } else {
        match serde_json::from_str::<Message>(&content) {
            Ok(message) => serde_json::to_string_pretty(&classifier.classify(&message, &scope)),
            Err(e) => {
                eprintln!("Failed to parse message: {e}");
                process::exit(1);
            }
        }
    };

    match output {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Failed to serialize result: {e}");
            process::exit(1);
        }
    }
}

fn load_yaml<T: serde::de::DeserializeOwned>(path: &str) -> anyhow::Result<T> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_yaml::from_str(&content)?)
}
