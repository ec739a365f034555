//! Load game rules from TOML files

use std::fs;
use std::path::Path;

use crate::core::error::{Result, SimError};
use crate::rules::GameRules;

/// Load and validate a rules file
pub fn load_rules(path: &Path) -> Result<GameRules> {
    let content = fs::read_to_string(path)
        .map_err(|e| SimError::Config(format!("Failed to read {}: {}", path.display(), e)))?;
    parse_rules(&content)
        .map_err(|e| SimError::Config(format!("{}: {}", path.display(), e)))
}

/// Parse and validate rules from TOML text
pub fn parse_rules(content: &str) -> Result<GameRules> {
    let rules: GameRules = toml::from_str(content)?;
    validate(&rules)?;
    Ok(rules)
}

/// Reject templates and types that would break invariants later
fn validate(rules: &GameRules) -> Result<()> {
    let mut errors = Vec::new();

    for (key, t) in &rules.mobs {
        if !(t.max_health > 0.0) {
            errors.push(format!("mob '{}': max_health must be positive", key));
        }
        if t.speed < 0.0 || !t.speed.is_finite() {
            errors.push(format!("mob '{}': speed must be finite and >= 0", key));
        }
        if t.gold < 0 {
            errors.push(format!("mob '{}': gold must be >= 0", key));
        }
        if let Some(fav) = &t.favorite_item {
            if !rules.items.contains_key(fav) {
                errors.push(format!("mob '{}': unknown favorite item '{}'", key, fav));
            }
        }
    }

    for (key, t) in &rules.items {
        for spec in &t.on_tick {
            if spec.action.is_empty() {
                errors.push(format!("item '{}': on_tick entry without action", key));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(SimError::Config(errors.join(", ")))
    }
}
