//! Role agents for property analysis
//!
//! Four roles share one [`AgentRuntime`]: the data analyst and the web
//! researcher can call dataset and search tools, the market analyst and the
//! report generator answer from the prompt alone.

use agent_core::Agent;
use agent_prompt::PromptRegistry;
use agent_runtime::{AgentProfile, AgentRuntime};
use serde_json::json;
use std::sync::Arc;

use crate::error::Result;
use crate::prompts::system;
use crate::tools::{CATEGORIZED_SEARCH, PROPERTY_LOOKUP, PROPERTY_SEARCH, PROPERTY_WEB_RESEARCH};

pub const DATA_ANALYST: &str = "data-analyst";
pub const WEB_RESEARCHER: &str = "web-researcher";
pub const MARKET_ANALYST: &str = "market-analyst";
pub const REPORT_GENERATOR: &str = "report-generator";

/// The four role agents used by the crew
#[derive(Clone)]
pub struct PropertyAgents {
    pub data_analyst: Arc<dyn Agent>,
    pub web_researcher: Arc<dyn Agent>,
    pub market_analyst: Arc<dyn Agent>,
    pub report_generator: Arc<dyn Agent>,
}

impl PropertyAgents {
    /// Build every role, rendering backstories from `prompts`
    pub fn new(runtime: &AgentRuntime, prompts: &PromptRegistry) -> Result<Self> {
        let data_analyst = runtime.create_tool_agent(
            data_analyst_profile(prompts)?,
            &[PROPERTY_LOOKUP, PROPERTY_SEARCH],
            DATA_ANALYST,
        );
        let web_researcher = runtime.create_tool_agent(
            web_researcher_profile(prompts)?,
            &[PROPERTY_LOOKUP, CATEGORIZED_SEARCH, PROPERTY_WEB_RESEARCH],
            WEB_RESEARCHER,
        );
        let market_analyst =
            runtime.create_simple_agent(market_analyst_profile(prompts)?, MARKET_ANALYST);
        let report_generator =
            runtime.create_simple_agent(report_generator_profile(prompts)?, REPORT_GENERATOR);

        Ok(Self {
            data_analyst: Arc::new(data_analyst),
            web_researcher: Arc::new(web_researcher),
            market_analyst: Arc::new(market_analyst),
            report_generator: Arc::new(report_generator),
        })
    }
}

fn backstory(prompts: &PromptRegistry, name: &str) -> Result<String> {
    Ok(prompts.render(name, &json!({}))?)
}

pub fn data_analyst_profile(prompts: &PromptRegistry) -> Result<AgentProfile> {
    Ok(AgentProfile::new(
        "Property Data Analyst",
        "Analyze property data to determine investment potential and highest best use",
    )
    .with_backstory(backstory(prompts, system::DATA_ANALYST)?))
}

pub fn web_researcher_profile(prompts: &PromptRegistry) -> Result<AgentProfile> {
    Ok(AgentProfile::new(
        "Web Researcher",
        "Research property details, market data, and development potential",
    )
    .with_backstory(backstory(prompts, system::WEB_RESEARCHER)?))
}

pub fn market_analyst_profile(prompts: &PromptRegistry) -> Result<AgentProfile> {
    Ok(AgentProfile::new(
        "Real Estate Market Analyst",
        "Analyze market trends and identify optimal property development strategies",
    )
    .with_backstory(backstory(prompts, system::MARKET_ANALYST)?))
}

pub fn report_generator_profile(prompts: &PromptRegistry) -> Result<AgentProfile> {
    Ok(AgentProfile::new(
        "Property Development Report Generator",
        "Create comprehensive, data-driven property development reports with clear recommendations",
    )
    .with_backstory(backstory(prompts, system::REPORT_GENERATOR)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompts::register_prompts;
    use agent_llm::providers::MockProvider;
    use agent_tools::ToolRegistry;

    fn prompts() -> PromptRegistry {
        let registry = PromptRegistry::new();
        register_prompts(&registry).unwrap();
        registry
    }

    #[test]
    fn test_profiles() {
        let prompts = prompts();
        let researcher = web_researcher_profile(&prompts).unwrap();
        assert_eq!(researcher.role, "Web Researcher");
        assert!(researcher.system_prompt().contains("property_web_research"));

        let writer = report_generator_profile(&prompts).unwrap();
        assert!(writer.system_prompt().starts_with(
            "You are a Property Development Report Generator.\nYour goal: Create comprehensive"
        ));
    }

    #[test]
    fn test_missing_backstory_template() {
        let empty = PromptRegistry::new();
        assert!(data_analyst_profile(&empty).is_err());
    }

    #[test]
    fn test_build_agents() {
        let runtime = AgentRuntime::builder()
            .provider(Arc::new(MockProvider::new()))
            .tool_registry(Arc::new(ToolRegistry::new()))
            .build()
            .unwrap();

        let agents = PropertyAgents::new(&runtime, &prompts()).unwrap();
        assert_eq!(agents.data_analyst.name(), DATA_ANALYST);
        assert_eq!(agents.web_researcher.role(), "Web Researcher");
        assert_eq!(agents.market_analyst.role(), "Real Estate Market Analyst");
        assert_eq!(agents.report_generator.name(), REPORT_GENERATOR);
    }
}
