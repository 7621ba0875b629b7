//! Multi-agent analysis runs over one or more parcels

use agent_core::{Agent, Context};
use agent_prompt::PromptRegistry;
use agent_runtime::AgentRuntime;
use agent_workflow::{FailurePolicy, Task, TaskGraph, TaskOutputs};
use chrono::Local;
use futures::future::join_all;
use serde::Serialize;
use serde_json::{Value, json};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

use crate::agents::PropertyAgents;
use crate::config::PropertyConfig;
use crate::error::{PropertyError, Result};
use crate::loader::PropertyDataLoader;
use crate::prompts::task;
use crate::record::PropertyRecord;
use crate::reports::{self, PropertyReport};

/// Task names used in the task graphs
pub mod tasks {
    pub const RESEARCH: &str = "research";
    pub const REPORT: &str = "report";
    pub const EXECUTIVE_SUMMARY: &str = "executive_summary";
    pub const INVESTMENT_SUMMARY: &str = "investment_summary";

    pub const DATA_ANALYSIS: &str = "data_analysis";
    pub const MARKET_RESEARCH: &str = "market_research";
    pub const FINANCIAL_ANALYSIS: &str = "financial_analysis";
    pub const DEVELOPMENT_RECOMMENDATIONS: &str = "development_recommendations";
}

/// Weights used when comparing parcels; they sum to 1
pub const COMPARISON_CRITERIA: [(&str, f64); 5] = [
    ("land_cost_per_acre", 0.25),
    ("location_quality", 0.20),
    ("development_capacity", 0.20),
    ("regulatory_environment", 0.15),
    ("market_strength", 0.20),
];

/// Result of [`PropertyAnalysisCrew::analyze_property`]
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisOutcome {
    pub report: PropertyReport,
    pub path: PathBuf,
    /// The run failed and the fallback report was written instead
    pub failed: bool,
}

/// Result of [`PropertyAnalysisCrew::run_pipeline`]
#[derive(Debug, Clone, Serialize)]
pub struct PipelineOutcome {
    pub outputs: TaskOutputs,
    pub report: PropertyReport,
    pub dir: PathBuf,
}

/// Result of [`PropertyAnalysisCrew::compare_properties`]
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonOutcome {
    pub comparison: String,
    pub path: PathBuf,
}

/// The four role agents wired to the dataset, templates and output paths
pub struct PropertyAnalysisCrew {
    agents: PropertyAgents,
    prompts: Arc<PromptRegistry>,
    loader: Arc<PropertyDataLoader>,
    config: Arc<PropertyConfig>,
}

impl PropertyAnalysisCrew {
    /// Build the crew; `runtime` should already carry the property tools
    pub fn new(
        runtime: &AgentRuntime,
        prompts: Arc<PromptRegistry>,
        loader: Arc<PropertyDataLoader>,
        config: Arc<PropertyConfig>,
    ) -> Result<Self> {
        let agents = PropertyAgents::new(runtime, &prompts)?;
        Ok(Self {
            agents,
            prompts,
            loader,
            config,
        })
    }

    pub fn loader(&self) -> &PropertyDataLoader {
        &self.loader
    }

    fn context(&self, record: &PropertyRecord) -> Context {
        Context::new()
            .with_property_id(record.stock_number())
            .with_output_dir(self.config.output_dir.display().to_string())
            .with_run_id(Local::now().format("%Y%m%d_%H%M%S").to_string())
            .with_mock_mode(self.config.use_mock)
    }

    fn task(
        &self,
        name: &str,
        template: &str,
        vars: &Value,
        agent: &Arc<dyn Agent>,
    ) -> Result<Task> {
        let description = self.prompts.render(template, vars)?;
        Ok(Task::new(name, description, agent.clone()))
    }

    /// Research, full report, executive summary and investment summary for
    /// one parcel, saved as a single Markdown file
    ///
    /// A failed research step flows into the report as an error note. Any
    /// other failure writes the fallback report to `error_report_<ts>.md`;
    /// an unknown stock number is the only error returned.
    #[instrument(skip(self))]
    pub async fn analyze_property(&self, stock_number: &str) -> Result<AnalysisOutcome> {
        let record = self.loader.require(stock_number)?;
        info!(property = %record.display_location(), "analyzing property");

        match self.run_analysis(record).await {
            Ok(report) => {
                let path = reports::save_report(
                    &self.config.reports_dir(),
                    record.address(),
                    &report,
                    None,
                )?;
                Ok(AnalysisOutcome {
                    report: report.with_defaults(),
                    path,
                    failed: false,
                })
            }
            Err(e) => {
                error!(stock_number, error = %e, "property analysis failed");
                let report = PropertyReport::failed();
                let filename = reports::error_report_filename(Local::now());
                let path = reports::save_report(
                    &self.config.reports_dir(),
                    record.address(),
                    &report,
                    Some(&filename),
                )?;
                Ok(AnalysisOutcome {
                    report,
                    path,
                    failed: true,
                })
            }
        }
    }

    async fn run_analysis(&self, record: &PropertyRecord) -> Result<PropertyReport> {
        let vars = record.template_vars();
        let researcher = &self.agents.web_researcher;
        let writer = &self.agents.report_generator;

        let graph = TaskGraph::builder()
            .task(
                self.task(tasks::RESEARCH, task::RESEARCH, &vars, researcher)?
                    .expected_output("Findings on zoning, demographics, regulation, competition and outlook, with sources"),
            )
            .task(
                self.task(tasks::REPORT, task::REPORT, &vars, writer)?
                    .expected_output("A complete Markdown investment analysis report")
                    .context([tasks::RESEARCH]),
            )
            .task(
                self.task(tasks::EXECUTIVE_SUMMARY, task::EXECUTIVE_SUMMARY, &vars, writer)?
                    .expected_output("A 500 to 800 word Markdown executive summary")
                    .context([tasks::RESEARCH, tasks::REPORT]),
            )
            .task(
                self.task(tasks::INVESTMENT_SUMMARY, task::INVESTMENT_SUMMARY, &vars, writer)?
                    .expected_output("A one-page Markdown investment summary")
                    .context([tasks::RESEARCH, tasks::EXECUTIVE_SUMMARY]),
            )
            .on_failure(FailurePolicy::RecordError)
            .build()?;

        let mut context = self.context(record);
        let outputs = graph.run(&mut context).await?;

        let failed: Vec<&str> = outputs
            .iter()
            .filter(|o| o.failed && o.task != tasks::RESEARCH)
            .map(|o| o.task.as_str())
            .collect();
        if !failed.is_empty() {
            return Err(PropertyError::Agent(format!(
                "tasks failed: {}",
                failed.join(", ")
            )));
        }

        Ok(PropertyReport::new(
            outputs.get(tasks::REPORT).unwrap_or_default(),
            outputs.get(tasks::EXECUTIVE_SUMMARY).unwrap_or_default(),
            outputs.get(tasks::INVESTMENT_SUMMARY).unwrap_or_default(),
        ))
    }

    /// Five-step development analysis, every step seeing the ones before it
    ///
    /// Stops at the first failed task. The sections are written to
    /// `property_<id>/`.
    #[instrument(skip(self))]
    pub async fn run_pipeline(&self, stock_number: &str) -> Result<PipelineOutcome> {
        let record = self.loader.require(stock_number)?;
        let vars = record.template_vars();
        let analyst = &self.agents.data_analyst;
        let market = &self.agents.market_analyst;
        let writer = &self.agents.report_generator;

        let graph = TaskGraph::builder()
            .task(self.task(tasks::DATA_ANALYSIS, task::DATA_ANALYSIS, &vars, analyst)?)
            .task(
                self.task(tasks::MARKET_RESEARCH, task::MARKET_RESEARCH, &vars, market)?
                    .context([tasks::DATA_ANALYSIS]),
            )
            .task(
                self.task(tasks::FINANCIAL_ANALYSIS, task::FINANCIAL_ANALYSIS, &vars, analyst)?
                    .context([tasks::DATA_ANALYSIS, tasks::MARKET_RESEARCH]),
            )
            .task(
                self.task(
                    tasks::DEVELOPMENT_RECOMMENDATIONS,
                    task::DEVELOPMENT_RECOMMENDATIONS,
                    &vars,
                    market,
                )?
                .context([
                    tasks::DATA_ANALYSIS,
                    tasks::MARKET_RESEARCH,
                    tasks::FINANCIAL_ANALYSIS,
                ]),
            )
            .task(
                self.task(tasks::EXECUTIVE_SUMMARY, task::EXECUTIVE_SUMMARY, &vars, writer)?
                    .context([
                        tasks::DATA_ANALYSIS,
                        tasks::MARKET_RESEARCH,
                        tasks::FINANCIAL_ANALYSIS,
                        tasks::DEVELOPMENT_RECOMMENDATIONS,
                    ]),
            )
            .on_failure(FailurePolicy::Abort)
            .build()?;

        info!(property = %record.display_location(), steps = graph.len(), "running pipeline");
        let mut context = self.context(record);
        let outputs = graph.run(&mut context).await?;

        let mut full_report = String::new();
        for (heading, name) in [
            ("Data Analysis", tasks::DATA_ANALYSIS),
            ("Market Research", tasks::MARKET_RESEARCH),
            ("Financial Analysis", tasks::FINANCIAL_ANALYSIS),
            ("Development Recommendations", tasks::DEVELOPMENT_RECOMMENDATIONS),
        ] {
            let body = outputs.get(name).unwrap_or_default();
            full_report.push_str(&format!("## {heading}\n\n{}\n\n", body.trim()));
        }
        let report = PropertyReport::new(
            full_report.trim_end(),
            outputs.get(tasks::EXECUTIVE_SUMMARY).unwrap_or_default(),
            outputs.get(tasks::FINANCIAL_ANALYSIS).unwrap_or_default(),
        );

        let dir = reports::save_report_parts(&self.config.reports_dir(), record.stock_number(), &report)?;
        Ok(PipelineOutcome {
            outputs,
            report,
            dir,
        })
    }

    /// Weighted comparison of two or more parcels
    ///
    /// Each parcel gets its own data analysis first, run concurrently; the
    /// analyses that succeed are handed to the comparison as context.
    #[instrument(skip(self))]
    pub async fn compare_properties(&self, stock_numbers: &[String]) -> Result<ComparisonOutcome> {
        if stock_numbers.len() < 2 {
            return Err(PropertyError::Config(
                "comparison needs at least two properties".to_string(),
            ));
        }
        let records = stock_numbers
            .iter()
            .map(|id| self.loader.require(id))
            .collect::<Result<Vec<_>>>()?;

        let analyses = join_all(records.iter().map(|record| self.analyze_one(record))).await;
        let upstream: Vec<(String, String)> = records
            .iter()
            .zip(analyses)
            .filter_map(|(record, analysis)| match analysis {
                Ok(text) => Some((format!("data analysis of {}", record.stock_number()), text)),
                Err(e) => {
                    warn!(stock_number = %record.stock_number(), error = %e, "data analysis failed");
                    None
                }
            })
            .collect();

        let vars = json!({
            "properties": records.iter().map(|r| r.template_vars()).collect::<Vec<_>>(),
            "criteria": COMPARISON_CRITERIA
                .iter()
                .map(|(name, weight)| json!({ "name": name, "weight": weight }))
                .collect::<Vec<_>>(),
        });
        let comparison_task = self.task(
            task::COMPARISON,
            task::COMPARISON,
            &vars,
            &self.agents.data_analyst,
        )?;
        let prompt = comparison_task.prompt(upstream.iter().map(|(t, o)| (t.as_str(), o.as_str())));

        info!(properties = records.len(), analyses = upstream.len(), "comparing properties");
        let mut context = Context::new().with_mock_mode(self.config.use_mock);
        let comparison = self.agents.data_analyst.process(prompt, &mut context).await?;

        let path = reports::save_comparison(&self.config.reports_dir(), &comparison)?;
        Ok(ComparisonOutcome { comparison, path })
    }

    async fn analyze_one(&self, record: &PropertyRecord) -> Result<String> {
        let description = self.prompts.render(task::DATA_ANALYSIS, &record.template_vars())?;
        let mut context = self.context(record);
        Ok(self.agents.data_analyst.process(description, &mut context).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompts::register_prompts;
    use crate::reports::{EXECUTIVE_SUMMARY_FAILED, MOCK_REPORT};
    use crate::tools::register_property_tools;
    use agent_llm::providers::MockProvider;
    use agent_llm::{CompletionRequest, CompletionResponse, LLMError, LLMProvider};
    use agent_tools::ToolRegistry;
    use async_trait::async_trait;
    use mockall::mock;
    use std::fs;

    mock! {
        Llm {}

        #[async_trait]
        impl LLMProvider for Llm {
            async fn complete(&self, request: CompletionRequest) -> agent_llm::Result<CompletionResponse>;
            fn name(&self) -> &'static str;
        }
    }

    const CSV: &str = "\
StockNumber,Property Address,City,County Name,State,Zip,Land Area (AC),For Sale Price
12345,123 Test St,Austin,Travis,TX,78701,10,\"$250,000\"
67890,456 Oak Ave,Dallas,Dallas,TX,75201,4,\"$90,000\"
";

    fn crew(provider: Arc<dyn LLMProvider>, output: &std::path::Path) -> PropertyAnalysisCrew {
        let loader = Arc::new(PropertyDataLoader::from_reader(CSV.as_bytes()).unwrap());
        let config = Arc::new(PropertyConfig::builder().output_dir(output).build().unwrap());

        let registry = Arc::new(ToolRegistry::new());
        register_property_tools(&registry, loader.clone(), None, &config).unwrap();
        let runtime = AgentRuntime::builder()
            .provider(provider)
            .tool_registry(registry)
            .build()
            .unwrap();

        let prompts = Arc::new(PromptRegistry::new());
        register_prompts(&prompts).unwrap();
        PropertyAnalysisCrew::new(&runtime, prompts, loader, config).unwrap()
    }

    #[tokio::test]
    async fn test_analyze_property_with_mock_model() {
        let dir = tempfile::tempdir().unwrap();
        let provider = Arc::new(MockProvider::new());
        let crew = crew(provider.clone(), dir.path());

        let outcome = crew.analyze_property("12345").await.unwrap();
        assert!(!outcome.failed);
        assert_eq!(provider.call_count(), 4);

        let name = outcome.path.file_name().unwrap().to_str().unwrap().to_string();
        assert!(name.ends_with("_123_test_st_analysis.md"), "{name}");
        let text = fs::read_to_string(&outcome.path).unwrap();
        assert!(text.starts_with("# PROPERTY ANALYSIS REPORT"));
        assert!(text.contains("## FULL ANALYSIS REPORT"));
    }

    #[tokio::test]
    async fn test_analyze_property_failure_writes_error_report() {
        let dir = tempfile::tempdir().unwrap();
        let mut llm = MockLlm::new();
        llm.expect_complete()
            .returning(|_| Err(LLMError::RequestFailed("connection refused".to_string())));
        let crew = crew(Arc::new(llm), dir.path());

        let outcome = crew.analyze_property("12345").await.unwrap();
        assert!(outcome.failed);
        let name = outcome.path.file_name().unwrap().to_str().unwrap().to_string();
        assert!(name.starts_with("error_report_"));

        let text = fs::read_to_string(&outcome.path).unwrap();
        assert!(text.contains(EXECUTIVE_SUMMARY_FAILED));
        assert!(text.contains(MOCK_REPORT.trim()));
    }

    #[tokio::test]
    async fn test_unknown_property() {
        let dir = tempfile::tempdir().unwrap();
        let crew = crew(Arc::new(MockProvider::new()), dir.path());

        let result = crew.analyze_property("404").await;
        assert!(matches!(result, Err(PropertyError::PropertyNotFound(_))));
    }

    #[tokio::test]
    async fn test_pipeline_order_and_parts() {
        let dir = tempfile::tempdir().unwrap();
        let crew = crew(Arc::new(MockProvider::new()), dir.path());

        let outcome = crew.run_pipeline("12345").await.unwrap();
        let order: Vec<&str> = outcome.outputs.iter().map(|o| o.task.as_str()).collect();
        assert_eq!(
            order,
            vec![
                tasks::DATA_ANALYSIS,
                tasks::MARKET_RESEARCH,
                tasks::FINANCIAL_ANALYSIS,
                tasks::DEVELOPMENT_RECOMMENDATIONS,
                tasks::EXECUTIVE_SUMMARY,
            ]
        );
        assert_eq!(outcome.dir, dir.path().join("reports").join("property_12345"));
        let full = fs::read_to_string(outcome.dir.join("full_report.md")).unwrap();
        assert!(full.starts_with("## Data Analysis"));
        assert!(full.contains("## Development Recommendations"));
    }

    #[tokio::test]
    async fn test_pipeline_aborts_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let mut llm = MockLlm::new();
        llm.expect_complete()
            .times(1)
            .returning(|_| Err(LLMError::RequestFailed("down".to_string())));
        let crew = crew(Arc::new(llm), dir.path());

        assert!(crew.run_pipeline("12345").await.is_err());
        assert!(!dir.path().join("reports").join("property_12345").exists());
    }

    #[tokio::test]
    async fn test_compare_properties() {
        let dir = tempfile::tempdir().unwrap();
        let provider = Arc::new(MockProvider::new());
        let crew = crew(provider.clone(), dir.path());

        let ids = vec!["12345".to_string(), "67890".to_string()];
        let outcome = crew.compare_properties(&ids).await.unwrap();
        assert_eq!(provider.call_count(), 3);
        assert_eq!(outcome.path, dir.path().join("reports").join("property_comparison.md"));
        assert_eq!(fs::read_to_string(&outcome.path).unwrap(), outcome.comparison);

        let single = crew.compare_properties(&ids[..1]).await;
        assert!(matches!(single, Err(PropertyError::Config(_))));
    }

    #[test]
    fn test_criteria_weights_sum_to_one() {
        let total: f64 = COMPARISON_CRITERIA.iter().map(|(_, w)| w).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }
}
