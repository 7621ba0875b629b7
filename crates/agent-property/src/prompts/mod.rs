//! Property research prompt templates
//!
//! - `system`: role backstories for the four agents
//! - `task`: task descriptions rendered from a property's fields

pub mod system;
pub mod task;

use agent_prompt::{PromptRegistry, Result};

/// Register every property template with `registry`
///
/// ```
/// use agent_prompt::PromptRegistry;
/// use agent_property::prompts::register_prompts;
///
/// let registry = PromptRegistry::new();
/// register_prompts(&registry).unwrap();
/// assert!(registry.contains("property.task.report"));
/// ```
pub fn register_prompts(registry: &PromptRegistry) -> Result<()> {
    registry.register(system::data_analyst()?);
    registry.register(system::web_researcher()?);
    registry.register(system::market_analyst()?);
    registry.register(system::report_generator()?);

    registry.register(task::data_analysis()?);
    registry.register(task::research()?);
    registry.register(task::market_research()?);
    registry.register(task::financial_analysis()?);
    registry.register(task::development_recommendations()?);
    registry.register(task::report()?);
    registry.register(task::executive_summary()?);
    registry.register(task::investment_summary()?);
    registry.register(task::comparison()?);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::PropertyRecord;
    use serde_json::json;

    fn registry() -> PromptRegistry {
        let registry = PromptRegistry::new();
        register_prompts(&registry).unwrap();
        registry
    }

    fn batavia() -> PropertyRecord {
        PropertyRecord::from_pairs([
            ("StockNumber", "5001"),
            ("Property Address", "8053 Oak Orchard Rd"),
            ("City", "Batavia"),
            ("County Name", "Genesee"),
            ("State", "NY"),
            ("Zip", "14020"),
            ("Land Area (AC)", "10"),
            ("For Sale Price", "$250,000"),
            ("2024 Population(5m)", "18,400"),
        ])
    }

    #[test]
    fn test_register_all_prompts() {
        let registry = registry();
        assert_eq!(registry.len(), 13);
        for name in [
            system::DATA_ANALYST,
            system::WEB_RESEARCHER,
            system::MARKET_ANALYST,
            system::REPORT_GENERATOR,
            task::DATA_ANALYSIS,
            task::RESEARCH,
            task::MARKET_RESEARCH,
            task::FINANCIAL_ANALYSIS,
            task::DEVELOPMENT_RECOMMENDATIONS,
            task::REPORT,
            task::EXECUTIVE_SUMMARY,
            task::INVESTMENT_SUMMARY,
            task::COMPARISON,
        ] {
            assert!(registry.contains(name), "{name}");
        }
    }

    #[test]
    fn test_property_facts_rendered() {
        let text = registry()
            .render(task::DATA_ANALYSIS, &batavia().template_vars())
            .unwrap();

        assert!(text.starts_with("Property: 8053 Oak Orchard Rd, Batavia, NY 14020"));
        assert!(text.contains("- County: Genesee"));
        assert!(text.contains("- Size: 10.0 acres"));
        assert!(text.contains("- Listed price: $250,000"));
        assert!(text.contains("- Zoning: N/A"));
        assert!(text.contains("- 2024 Population(5m): 18,400"));
        assert!(!text.contains("Proposed use"));
    }

    #[test]
    fn test_financial_analysis_lot_economics() {
        let text = registry()
            .render(task::FINANCIAL_ANALYSIS, &batavia().template_vars())
            .unwrap();

        // 10 acres at 3.5 lots/acre, $55,000 per lot
        assert!(text.contains("35.0 potential lots"));
        assert!(text.contains("Development cost at $55,000 per lot: $1,925,000"));
        assert!(text.contains("Total investment: $2,175,000"));
    }

    #[test]
    fn test_comparison_prompt() {
        let other = PropertyRecord::from_pairs([
            ("StockNumber", "5002"),
            ("Property Address", "1 Main St"),
            ("City", "Le Roy"),
            ("State", "NY"),
        ]);
        let vars = json!({
            "properties": [batavia().template_vars(), other.template_vars()],
            "criteria": [
                { "name": "land_cost_per_acre", "weight": 0.25 },
                { "name": "regulatory_environment", "weight": 0.15 },
            ],
        });

        let text = registry().render(task::COMPARISON, &vars).unwrap();
        assert!(text.contains("Property 1: 8053 Oak Orchard Rd, Batavia, NY"));
        assert!(text.contains("Property 2: 1 Main St, Le Roy, NY"));
        assert!(text.contains("- Price: N/A"));
        assert!(text.contains("- land_cost_per_acre: 25%"));
        assert!(text.contains("- regulatory_environment: 15%"));
    }

    #[test]
    fn test_system_prompt_renders_without_vars() {
        let text = registry().render(system::WEB_RESEARCHER, &json!({})).unwrap();
        assert!(text.contains("categorized_search"));
    }
}
