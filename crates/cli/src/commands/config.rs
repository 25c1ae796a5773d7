use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use catalog_core::config::{AppConfig, DiscountRuleKind};
use toml::Value;

use crate::commands::{load_config, CommandResult};

struct Sources {
    path: Option<PathBuf>,
    doc: Option<Value>,
}

impl Sources {
    fn detect() -> Self {
        let path = detect_config_path();
        let doc = load_config_file_doc(path.as_deref());
        Self { path, doc }
    }

    fn field(&self, key_path: &str, env_keys: &[&str]) -> String {
        field_source(key_path, env_keys, self.doc.as_ref(), self.path.as_deref())
    }
}

pub fn run() -> CommandResult {
    let config = match load_config("config") {
        Ok(config) => config,
        Err(failure) => return failure,
    };

    CommandResult::success("config", render(&config, &Sources::detect()))
}

fn render(config: &AppConfig, sources: &Sources) -> String {
    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];

    lines.push(render_line(
        "database.url",
        &config.database.url,
        sources.field("database.url", &["CATALOG_DATABASE_URL"]),
    ));
    lines.push(render_line(
        "database.max_connections",
        &config.database.max_connections.to_string(),
        sources.field("database.max_connections", &["CATALOG_DATABASE_MAX_CONNECTIONS"]),
    ));
    lines.push(render_line(
        "database.timeout_secs",
        &config.database.timeout_secs.to_string(),
        sources.field("database.timeout_secs", &["CATALOG_DATABASE_TIMEOUT_SECS"]),
    ));

    lines.push(render_line(
        "server.bind_address",
        &config.server.bind_address,
        sources.field("server.bind_address", &["CATALOG_SERVER_BIND_ADDRESS"]),
    ));
    lines.push(render_line(
        "server.port",
        &config.server.port.to_string(),
        sources.field("server.port", &["CATALOG_SERVER_PORT"]),
    ));
    lines.push(render_line(
        "server.graceful_shutdown_secs",
        &config.server.graceful_shutdown_secs.to_string(),
        sources.field("server.graceful_shutdown_secs", &["CATALOG_SERVER_GRACEFUL_SHUTDOWN_SECS"]),
    ));

    lines.push(render_line(
        "logging.level",
        &config.logging.level,
        sources.field("logging.level", &["CATALOG_LOGGING_LEVEL", "CATALOG_LOG_LEVEL"]),
    ));
    lines.push(render_line(
        "logging.format",
        &format!("{:?}", config.logging.format),
        sources.field("logging.format", &["CATALOG_LOGGING_FORMAT", "CATALOG_LOG_FORMAT"]),
    ));

    let rules_source = sources.field("discounts.rules", &[]);
    if config.discounts.rules.is_empty() {
        lines.push(render_line("discounts.rules", "<none>", rules_source.clone()));
    }
    for (index, rule) in config.discounts.rules.iter().enumerate() {
        let kind = match rule.kind {
            DiscountRuleKind::Category => "category",
            DiscountRuleKind::Sku => "sku",
        };
        lines.push(render_line(
            &format!("discounts.rules[{index}]"),
            &format!("{kind} {} {}%", rule.code, rule.percentage),
            rules_source.clone(),
        ));
    }

    lines.join("\n")
}

fn detect_config_path() -> Option<PathBuf> {
    let root = PathBuf::from("catalog.toml");
    if root.exists() {
        return Some(root);
    }

    let nested = PathBuf::from("config/catalog.toml");
    if nested.exists() {
        return Some(nested);
    }

    None
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use catalog_core::config::AppConfig;
    use toml::Value;

    use super::{contains_path, field_source, render, Sources};

    #[test]
    fn file_keys_are_attributed_to_the_file() {
        let doc: Value = "[database]\nurl = \"sqlite://x.db\"\n".parse().expect("toml");

        let source = field_source(
            "database.url",
            &["CATALOG_TEST_UNSET_VARIABLE"],
            Some(&doc),
            Some(Path::new("catalog.toml")),
        );

        assert_eq!(source, "file (catalog.toml)");
        assert_eq!(field_source("server.port", &[], Some(&doc), None), "default");
    }

    #[test]
    fn nested_paths_require_every_segment() {
        let doc: Value = "[discounts]\nrules = []\n".parse().expect("toml");

        assert!(contains_path(&doc, "discounts.rules"));
        assert!(!contains_path(&doc, "discounts.rules.kind"));
        assert!(!contains_path(&doc, "logging"));
    }

    #[test]
    fn render_lists_discount_rules_in_order() {
        let sources = Sources { path: None, doc: None };

        let rendered = render(&AppConfig::default(), &sources);

        let rules: Vec<&str> =
            rendered.lines().filter(|line| line.starts_with("- discounts.rules")).collect();
        assert_eq!(
            rules,
            [
                "- discounts.rules[0] = category boots 30% (source: default)",
                "- discounts.rules[1] = sku 000003 15% (source: default)",
            ]
        );
    }
}
