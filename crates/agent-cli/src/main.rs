//! `property-research`: analyze land parcels with a crew of LLM agents

mod display;
mod provider;

use agent_prompt::PromptRegistry;
use agent_property::charts::{DemographicCharts, save_charts};
use agent_property::tools::register_property_tools;
use agent_property::{
    EnhancedWebResearch, PropertyAnalysisCrew, PropertyConfig, PropertyDataLoader, PropertyFilter,
    SearchCategory,
};
use agent_runtime::AgentRuntime;
use agent_tools::ToolRegistry;
use agent_utils::LogFormat;
use anyhow::{Context as _, Result};
use clap::{CommandFactory, Parser};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "property-research", version)]
#[command(about = "Property research with LLM agents", long_about = None)]
struct Args {
    /// List the properties in the dataset
    #[arg(long)]
    list: bool,

    /// Search properties by address, city, state, zip or county
    #[arg(long, value_name = "TEXT")]
    search: Option<String>,

    /// Show the details of one property
    #[arg(long, value_name = "STOCK_NUMBER")]
    stock: Option<String>,

    /// Research a property and write the full report
    #[arg(long, value_name = "STOCK_NUMBER")]
    analyze: Option<String>,

    /// Run the five-step development pipeline for a property
    #[arg(long, value_name = "STOCK_NUMBER")]
    pipeline: Option<String>,

    /// Compare two or more properties
    #[arg(long, value_name = "STOCK_NUMBER", num_args = 2..)]
    compare: Vec<String>,

    /// List properties matching the filter options below
    #[arg(long)]
    filter: bool,

    #[arg(long, requires = "filter")]
    state: Option<String>,

    /// May be repeated
    #[arg(long, requires = "filter")]
    city: Vec<String>,

    /// May be repeated
    #[arg(long, requires = "filter")]
    county: Vec<String>,

    #[arg(long, requires = "filter")]
    min_acres: Option<f64>,

    #[arg(long, requires = "filter")]
    max_acres: Option<f64>,

    #[arg(long, requires = "filter")]
    min_price: Option<f64>,

    #[arg(long, requires = "filter")]
    max_price: Option<f64>,

    /// Run only the categorized web search around a property
    #[arg(long, value_name = "STOCK_NUMBER")]
    research: Option<String>,

    /// Limit --research to one category
    #[arg(long, requires = "research")]
    category: Option<SearchCategory>,

    /// Write demographic tables for a property
    #[arg(long, value_name = "STOCK_NUMBER")]
    charts: Option<String>,

    /// Check that the Ollama server is running and the model is installed
    #[arg(long)]
    check_ollama: bool,

    /// Property CSV (default: data/master.csv or PROPERTY_DATA_PATH)
    #[arg(long, value_name = "PATH")]
    data: Option<PathBuf>,

    /// Output directory (default: outputs or PROPERTY_OUTPUT_DIR)
    #[arg(long, value_name = "DIR")]
    output: Option<PathBuf>,

    /// Use the canned mock model instead of Ollama
    #[arg(long)]
    mock: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn property_filter(&self) -> PropertyFilter {
        PropertyFilter {
            min_acres: self.min_acres,
            max_acres: self.max_acres,
            min_price: self.min_price,
            max_price: self.max_price,
            state: self.state.clone(),
            cities: self.city.clone(),
            counties: self.county.clone(),
        }
    }

    fn config(&self) -> PropertyConfig {
        let mut config = PropertyConfig::from_env();
        if let Some(data) = &self.data {
            config.data_path.clone_from(data);
        }
        if let Some(output) = &self.output {
            config.output_dir.clone_from(output);
        }
        if self.mock {
            config.use_mock = true;
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let directive = if args.verbose {
        "debug"
    } else {
        "warn,agent_property=info"
    };
    agent_utils::init_tracing_with(directive, LogFormat::Pretty);

    if args.check_ollama {
        println!("{}", provider::ollama_status().await?);
        return Ok(());
    }

    let config = Arc::new(args.config());
    config.validate()?;

    let loader = match PropertyDataLoader::from_path(&config.data_path) {
        Ok(loader) => Arc::new(loader),
        Err(e) => {
            eprintln!("Error loading property data: {e}");
            eprintln!(
                "Place the dataset at {} or pass --data <path>.",
                config.data_path.display()
            );
            std::process::exit(1);
        }
    };
    info!(properties = loader.len(), path = %config.data_path.display(), "dataset loaded");

    if args.list {
        println!("{}", display::property_list(loader.property_list()));
    } else if let Some(text) = &args.search {
        let found = loader.search_properties(text);
        println!("{}", display::property_table(found.iter().copied()));
        println!("Found {} properties matching '{text}'", found.len());
    } else if args.filter {
        let found = loader.filter_properties(&args.property_filter());
        println!("{}", display::property_table(found.iter().copied()));
        println!("Found {} properties", found.len());
    } else if let Some(id) = &args.stock {
        println!("{}", display::property_details(loader.require(id)?));
    } else if let Some(id) = &args.research {
        research(&config, &loader, id, args.category).await?;
    } else if let Some(id) = &args.charts {
        charts(&config, &loader, id)?;
    } else if let Some(id) = &args.analyze {
        let crew = build_crew(config, loader).await?;
        let outcome = crew.analyze_property(id).await?;
        if outcome.failed {
            println!("Analysis failed; a fallback report was written.");
        }
        println!("{}", outcome.report.executive_summary);
        println!("\nReport saved to: {}", outcome.path.display());
    } else if let Some(id) = &args.pipeline {
        let crew = build_crew(config, loader).await?;
        let outcome = crew.run_pipeline(id).await?;
        println!("{}", outcome.report.executive_summary);
        println!("\nReport sections saved to: {}", outcome.dir.display());
    } else if !args.compare.is_empty() {
        for (i, record) in args
            .compare
            .iter()
            .filter_map(|id| loader.property_data(id))
            .enumerate()
        {
            println!("{}. {}", i + 1, record.display_location());
        }
        let crew = build_crew(config, loader).await?;
        let outcome = crew.compare_properties(&args.compare).await?;
        println!("\n{}", outcome.comparison);
        println!("\nComparison report saved to: {}", outcome.path.display());
    } else {
        Args::command().print_help()?;
    }

    Ok(())
}

async fn build_crew(
    config: Arc<PropertyConfig>,
    loader: Arc<PropertyDataLoader>,
) -> Result<PropertyAnalysisCrew> {
    let model = provider::select_model(&config).await?;
    let search = if config.use_mock {
        None
    } else {
        Some(provider::web_search(&config)?)
    };

    let registry = Arc::new(ToolRegistry::new());
    register_property_tools(&registry, loader.clone(), search, &config)?;
    let runtime = AgentRuntime::builder()
        .provider(model.provider)
        .tool_registry(registry)
        .default_model(model.model)
        .default_max_iterations(config.max_iterations)
        .default_max_tokens(config.max_tokens)
        .build()?;

    let prompts = Arc::new(PromptRegistry::new());
    agent_property::prompts::register_prompts(&prompts)?;

    PropertyAnalysisCrew::new(&runtime, prompts, loader, config).context("failed to assemble the crew")
}

async fn research(
    config: &PropertyConfig,
    loader: &PropertyDataLoader,
    id: &str,
    category: Option<SearchCategory>,
) -> Result<()> {
    let record = loader.require(id)?;
    let mut research = EnhancedWebResearch::new(provider::web_search(config)?);
    let outcome = research
        .execute_search_strategy(record, category, config.max_results_per_query, config.max_queries)
        .await;

    println!("{}", serde_json::to_string_pretty(&outcome)?);
    info!(queries = research.executed_queries(), "research finished");
    Ok(())
}

fn charts(config: &PropertyConfig, loader: &PropertyDataLoader, id: &str) -> Result<()> {
    let record = loader.require(id)?;
    let tables = DemographicCharts::from_record(record);
    if tables.is_empty() {
        println!("No demographic data for {}", record.display_location());
        return Ok(());
    }

    for (name, table) in tables.tables() {
        println!("{name}\n{table}\n");
    }
    let paths = save_charts(&config.charts_dir(), record)?;
    println!("Saved {} tables to {}", paths.len(), config.charts_dir().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_compare_needs_two_properties() {
        assert!(Args::try_parse_from(["property-research", "--compare", "1"]).is_err());

        let args = Args::try_parse_from(["property-research", "--compare", "1", "2", "3"]).unwrap();
        assert_eq!(args.compare, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_filter_options() {
        let args = Args::try_parse_from([
            "property-research",
            "--filter",
            "--state",
            "NY",
            "--city",
            "Batavia",
            "--city",
            "Le Roy",
            "--min-acres",
            "5",
        ])
        .unwrap();

        let filter = args.property_filter();
        assert_eq!(filter.state.as_deref(), Some("NY"));
        assert_eq!(filter.cities, vec!["Batavia", "Le Roy"]);
        assert_eq!(filter.min_acres, Some(5.0));
        assert!(filter.max_price.is_none());

        assert!(Args::try_parse_from(["property-research", "--state", "NY"]).is_err());
    }

    #[test]
    fn test_research_category() {
        let args = Args::try_parse_from([
            "property-research",
            "--research",
            "12345",
            "--category",
            "housing_market",
        ])
        .unwrap();
        assert_eq!(args.category, Some(SearchCategory::HousingMarket));

        assert!(
            Args::try_parse_from(["property-research", "--research", "1", "--category", "weather"])
                .is_err()
        );
    }

    #[test]
    fn test_flag_overrides() {
        let args = Args::try_parse_from([
            "property-research",
            "--mock",
            "--data",
            "fixtures/parcels.csv",
            "--output",
            "/tmp/out",
        ])
        .unwrap();

        let config = args.config();
        assert!(config.use_mock);
        assert_eq!(config.data_path, PathBuf::from("fixtures/parcels.csv"));
        assert_eq!(config.reports_dir(), PathBuf::from("/tmp/out/reports"));
    }
}
