use std::fs;
use std::path::Path;

use moto_finance_core::FinancingConfig;

use crate::input::resolve_path;

/// Load the dealer financing configuration, or the defaults when no file is
/// given. `.json` files are parsed as JSON, anything else as TOML.
pub fn load(path: Option<&str>) -> Result<FinancingConfig, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        tracing::debug!("no config file given; using defaults");
        return Ok(FinancingConfig::default());
    };

    let canonical = resolve_path(path)?;
    let contents = fs::read_to_string(&canonical)
        .map_err(|e| format!("Failed to read config '{}': {}", canonical.display(), e))?;

    let config = if is_json(&canonical) {
        FinancingConfig::from_json(&contents)?
    } else {
        let parsed: FinancingConfig = toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse config '{}': {}", canonical.display(), e))?;
        parsed.validate()?;
        parsed
    };

    tracing::info!(
        path = %canonical.display(),
        monthly_rate = %config.monthly_rate,
        terms = ?config.offered_terms,
        "financing config loaded"
    );
    Ok(config)
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_toml_config_overrides_defaults() {
        let parsed: FinancingConfig = toml::from_str(
            r#"
            monthly_rate = "0.0199"
            offered_terms = [12, 24, 36]
            default_term_months = 36
            locale = "en-US"
            "#,
        )
        .unwrap();
        assert!(parsed.validate().is_ok());
        assert_eq!(parsed.monthly_rate, dec!(0.0199));
        assert_eq!(parsed.default_entry_pct, dec!(0.30));
        assert_eq!(parsed.locale, moto_finance_core::format::CurrencyLocale::EnUs);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(load(Some("does/not/exist.toml")).is_err());
    }

    #[test]
    fn test_no_file_means_defaults() {
        assert_eq!(load(None).unwrap(), FinancingConfig::default());
    }
}
