//! # Discount Rules
//!
//! Rule set compilation and discount evaluation.
//!
//! ## Evaluation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Product { sku: "ELEC-005", category: "Electronics", price: 120.00 }   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Every rule is checked independently:                                  │
//! │    CATEGORY    = "Electronics"     → applies (15)                      │
//! │    CATEGORY    = "Home & Kitchen"  → no                                │
//! │    SKU_PATTERN = ".*5$"            → applies (30)                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  max(15, 30) = 30   (0 when nothing applies)                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  final price = 120.00 * 70 / 100 = 84.00                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rules are compiled once at startup. A malformed pattern or an
//! out-of-range percentage is a [`ConfigError`] there, never a per-request
//! failure.

use regex::Regex;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::ConfigError;
use crate::types::{EnrichedProduct, Product};

// =============================================================================
// Rule Configuration
// =============================================================================

/// How a rule selects products.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleKind {
    /// Case-insensitive exact match on the product category.
    Category,
    /// Full-match regular expression on the product SKU.
    SkuPattern,
}

/// A discount rule as it appears in configuration, before compilation.
///
/// ```toml
/// [[discount.rules]]
/// name = "SKU Ending with 5"
/// kind = "SKU_PATTERN"
/// condition = ".*5$"
/// percentage = 30
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DiscountRuleConfig {
    /// Informational only.
    pub name: String,
    #[serde(alias = "type")]
    pub kind: RuleKind,
    /// Category name or SKU regular expression, depending on `kind`.
    pub condition: String,
    /// Checked against 0..=100 when the rule is compiled.
    pub percentage: i64,
}

impl DiscountRuleConfig {
    pub fn new(
        name: impl Into<String>,
        kind: RuleKind,
        condition: impl Into<String>,
        percentage: i64,
    ) -> Self {
        DiscountRuleConfig {
            name: name.into(),
            kind,
            condition: condition.into(),
            percentage,
        }
    }
}

// =============================================================================
// Compiled Rules
// =============================================================================

#[derive(Debug, Clone)]
enum Matcher {
    Category(String),
    SkuPattern(Regex),
}

/// A compiled, validated discount rule.
#[derive(Debug, Clone)]
pub struct DiscountRule {
    name: String,
    matcher: Matcher,
    percentage: u8,
}

impl DiscountRule {
    /// Validates and compiles one rule.
    pub fn compile(config: &DiscountRuleConfig) -> Result<Self, ConfigError> {
        let percentage = u8::try_from(config.percentage)
            .ok()
            .filter(|p| *p <= 100)
            .ok_or_else(|| ConfigError::PercentageOutOfRange {
                rule: config.name.clone(),
                percentage: config.percentage,
            })?;

        if config.condition.trim().is_empty() {
            return Err(ConfigError::BlankCondition {
                rule: config.name.clone(),
            });
        }

        let matcher = match config.kind {
            RuleKind::Category => Matcher::Category(config.condition.clone()),
            RuleKind::SkuPattern => {
                // Full match: "5" must not match "SKU-50"
                let anchored = format!("^(?:{})$", config.condition);
                let regex = Regex::new(&anchored).map_err(|e| ConfigError::InvalidPattern {
                    rule: config.name.clone(),
                    pattern: config.condition.clone(),
                    reason: e.to_string(),
                })?;
                Matcher::SkuPattern(regex)
            }
        };

        Ok(DiscountRule {
            name: config.name.clone(),
            matcher,
            percentage,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> RuleKind {
        match self.matcher {
            Matcher::Category(_) => RuleKind::Category,
            Matcher::SkuPattern(_) => RuleKind::SkuPattern,
        }
    }

    pub fn percentage(&self) -> u8 {
        self.percentage
    }

    /// Whether this rule applies to the product.
    pub fn applies_to(&self, product: &Product) -> bool {
        match &self.matcher {
            Matcher::Category(category) => product.category().matches_ignore_case(category),
            Matcher::SkuPattern(regex) => regex.is_match(product.sku().as_str()),
        }
    }
}

/// Ordered, immutable collection of compiled rules.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<DiscountRule>,
}

impl RuleSet {
    /// Compiles every rule, failing on the first invalid one.
    ///
    /// No partially valid rule set is ever returned.
    pub fn compile(configs: &[DiscountRuleConfig]) -> Result<Self, ConfigError> {
        let rules = configs
            .iter()
            .map(|config| {
                let rule = DiscountRule::compile(config)?;
                debug!(
                    rule = %rule.name(),
                    kind = ?rule.kind(),
                    percentage = rule.percentage(),
                    "Compiled discount rule"
                );
                Ok(rule)
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        info!(count = rules.len(), "Discount rule set loaded");
        Ok(RuleSet { rules })
    }

    pub fn rules(&self) -> &[DiscountRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

// =============================================================================
// Engine
// =============================================================================

/// Evaluates a [`RuleSet`] against products.
///
/// Pure and read-only: one instance is built at startup and shared behind an
/// `Arc` by every request.
#[derive(Debug, Clone, Default)]
pub struct DiscountEngine {
    rules: RuleSet,
}

impl DiscountEngine {
    pub fn new(rules: RuleSet) -> Self {
        DiscountEngine { rules }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Highest percentage among applicable rules, or 0.
    pub fn calculate_discount(&self, product: &Product) -> u8 {
        self.rules
            .rules()
            .iter()
            .filter(|rule| rule.applies_to(product))
            .map(DiscountRule::percentage)
            .max()
            .unwrap_or(0)
    }

    /// Computes the discount and final price for a product.
    pub fn enrich(&self, product: Product) -> EnrichedProduct {
        let discount_percent = self.calculate_discount(&product);
        let final_price = product
            .price()
            .apply_discount_percent(discount_percent)
            // Compiled rules are always within 0..=100
            .unwrap_or_else(|_| product.price());

        EnrichedProduct {
            product,
            discount_percent,
            final_price,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_rules() -> Vec<DiscountRuleConfig> {
        vec![
            DiscountRuleConfig::new("Electronics Category", RuleKind::Category, "Electronics", 15),
            DiscountRuleConfig::new(
                "Home & Kitchen Category",
                RuleKind::Category,
                "Home & Kitchen",
                25,
            ),
            DiscountRuleConfig::new("SKU Ending with 5", RuleKind::SkuPattern, ".*5$", 30),
        ]
    }

    fn engine() -> DiscountEngine {
        DiscountEngine::new(RuleSet::compile(&reference_rules()).unwrap())
    }

    fn product(sku: &str, cents: i64, category: &str) -> Product {
        Product::from_parts(sku, cents, "Test product", category).unwrap()
    }

    #[test]
    fn test_electronics_gets_fifteen_percent() {
        let enriched = engine().enrich(product("ELEC-001", 10000, "Electronics"));
        assert_eq!(enriched.discount_percent, 15);
        assert_eq!(enriched.final_price.to_string(), "85.00");
    }

    #[test]
    fn test_home_and_kitchen_gets_twenty_five_percent() {
        let enriched = engine().enrich(product("HOME-001", 10000, "Home & Kitchen"));
        assert_eq!(enriched.discount_percent, 25);
        assert_eq!(enriched.final_price.to_string(), "75.00");
    }

    #[test]
    fn test_sku_pattern_beats_category() {
        let enriched = engine().enrich(product("ELEC-005", 12000, "Electronics"));
        assert_eq!(enriched.discount_percent, 30);
        assert_eq!(enriched.final_price.to_string(), "84.00");
    }

    #[test]
    fn test_no_rule_applies() {
        let enriched = engine().enrich(product("CLOTH-001", 5000, "Clothing"));
        assert_eq!(enriched.discount_percent, 0);
        assert_eq!(enriched.final_price.to_string(), "50.00");
    }

    #[test]
    fn test_final_price_rounded_to_two_places() {
        let enriched = engine().enrich(product("ELEC-001", 1999, "Electronics"));
        assert_eq!(enriched.discount_percent, 15);
        assert_eq!(enriched.final_price.to_decimal().to_string(), "16.99");
        assert_eq!(enriched.final_price.to_decimal().scale(), 2);
    }

    #[test]
    fn test_category_match_is_case_insensitive_and_exact() {
        let engine = engine();
        assert_eq!(engine.calculate_discount(&product("A-1", 100, "ELECTRONICS")), 15);
        assert_eq!(engine.calculate_discount(&product("A-1", 100, "electronics")), 15);
        assert_eq!(engine.calculate_discount(&product("A-1", 100, "Consumer Electronics")), 0);
        assert_eq!(engine.calculate_discount(&product("A-1", 100, "Electronic")), 0);
    }

    #[test]
    fn test_sku_pattern_uses_full_match() {
        let rules = RuleSet::compile(&[DiscountRuleConfig::new(
            "Exactly five",
            RuleKind::SkuPattern,
            "5",
            40,
        )])
        .unwrap();
        let engine = DiscountEngine::new(rules);

        assert_eq!(engine.calculate_discount(&product("5", 100, "Misc")), 40);
        assert_eq!(engine.calculate_discount(&product("SKU-5", 100, "Misc")), 0);
        assert_eq!(engine.calculate_discount(&product("50", 100, "Misc")), 0);
    }

    #[test]
    fn test_alternation_is_anchored_as_a_whole() {
        let rules = RuleSet::compile(&[DiscountRuleConfig::new(
            "Either prefix",
            RuleKind::SkuPattern,
            "A.*|B-1",
            10,
        )])
        .unwrap();
        let engine = DiscountEngine::new(rules);

        assert_eq!(engine.calculate_discount(&product("B-1", 100, "Misc")), 10);
        assert_eq!(engine.calculate_discount(&product("B-10", 100, "Misc")), 0);
        assert_eq!(engine.calculate_discount(&product("XA", 100, "Misc")), 0);
    }

    #[test]
    fn test_empty_rule_set_gives_no_discount() {
        let engine = DiscountEngine::default();
        assert_eq!(engine.calculate_discount(&product("ELEC-005", 100, "Electronics")), 0);
    }

    #[test]
    fn test_malformed_pattern_fails_at_load() {
        let err = RuleSet::compile(&[DiscountRuleConfig::new(
            "Broken",
            RuleKind::SkuPattern,
            "([unclosed",
            10,
        )])
        .unwrap_err();

        assert!(matches!(err, ConfigError::InvalidPattern { ref rule, .. } if rule == "Broken"));
    }

    #[test]
    fn test_percentage_out_of_range_fails_at_load() {
        for percentage in [-1, 101, 1000] {
            let err = RuleSet::compile(&[DiscountRuleConfig::new(
                "Bad",
                RuleKind::Category,
                "Electronics",
                percentage,
            )])
            .unwrap_err();
            assert_eq!(
                err,
                ConfigError::PercentageOutOfRange {
                    rule: "Bad".to_string(),
                    percentage
                }
            );
        }
    }

    #[test]
    fn test_one_bad_rule_rejects_whole_set() {
        let mut configs = reference_rules();
        configs.push(DiscountRuleConfig::new("Blank", RuleKind::Category, " ", 5));
        assert!(matches!(
            RuleSet::compile(&configs),
            Err(ConfigError::BlankCondition { .. })
        ));
    }

    #[test]
    fn test_rule_config_accepts_type_alias() {
        let json = r#"{"name":"SKU Ending with 5","type":"SKU_PATTERN","condition":".*5$","percentage":30}"#;
        let config: DiscountRuleConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.kind, RuleKind::SkuPattern);
        assert_eq!(config.percentage, 30);
    }

    #[test]
    fn test_rule_order_is_preserved() {
        let rules = RuleSet::compile(&reference_rules()).unwrap();
        let names: Vec<_> = rules.rules().iter().map(DiscountRule::name).collect();
        assert_eq!(
            names,
            vec!["Electronics Category", "Home & Kitchen Category", "SKU Ending with 5"]
        );
    }
}
