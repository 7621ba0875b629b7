//! Task descriptions for the analysis pipelines
//!
//! Every template except the comparison expects the variables of
//! [`PropertyRecord::template_vars`](crate::record::PropertyRecord::template_vars).
//! Outputs of earlier tasks are appended by the task graph, not interpolated
//! here.

use agent_prompt::{JinjaTemplate, Result};

pub const DATA_ANALYSIS: &str = "property.task.data_analysis";
pub const RESEARCH: &str = "property.task.research";
pub const MARKET_RESEARCH: &str = "property.task.market_research";
pub const FINANCIAL_ANALYSIS: &str = "property.task.financial_analysis";
pub const DEVELOPMENT_RECOMMENDATIONS: &str = "property.task.development_recommendations";
pub const REPORT: &str = "property.task.report";
pub const EXECUTIVE_SUMMARY: &str = "property.task.executive_summary";
pub const INVESTMENT_SUMMARY: &str = "property.task.investment_summary";
pub const COMPARISON: &str = "property.task.comparison";

const PROPERTY_FACTS: &str = r#"Property: {{ address }}, {{ city }}, {{ state }} {{ zip }}
- Stock number: {{ stock_number }}
- County: {{ county or "N/A" }}
- Size: {{ acres if acres is not none else "N/A" }} acres
- Listed price: {{ price | money }}
- Zoning: {{ zoning or "N/A" }}
{%- if proposed_use %}
- Proposed use: {{ proposed_use }}
{%- endif %}
{%- if demographics %}

Area demographics:
{%- for name, value in demographics | items %}
- {{ name }}: {{ value }}
{%- endfor %}
{%- endif %}"#;

fn with_facts(name: &str, body: &str) -> Result<JinjaTemplate> {
    JinjaTemplate::new(name, format!("{PROPERTY_FACTS}\n\n{body}"))
}

/// Create the data analysis task template
pub fn data_analysis() -> Result<JinjaTemplate> {
    with_facts(
        DATA_ANALYSIS,
        r"Analyze the data for this property and judge its potential for residential development.

Cover:
1. Development capacity: likely unit count from size and zoning, suitable housing types
2. Demographic fit: how the area figures support demand
3. Risks specific to this parcel and how to mitigate them
4. An opportunity score from 1 to 10 with the factors behind it",
    )
}

/// Create the web research task template
pub fn research() -> Result<JinjaTemplate> {
    with_facts(
        RESEARCH,
        r"Research the property and its surroundings using your search tools.

Cover:
1. Property details and zoning: regulations, prior use, flood zones, utilities, access
2. Local demographics and economy: population, income, employment, housing demand
3. Regulatory environment: attitude to development, incentives, approval timelines
4. Competition: similar parcels, recent land sales, planned developments
5. Outlook: planned infrastructure and anything likely to move the property's value",
    )
}

/// Create the market research task template
pub fn market_research() -> Result<JinjaTemplate> {
    with_facts(
        MARKET_RESEARCH,
        r"Analyze the local real estate market around this property.

Cover:
1. Market overview: price trends, supply and demand, position in the cycle
2. Demographics: population trend, income levels, migration affecting demand
3. Competitive landscape: comparable listings and recent sales
4. Projections for the next 12 to 36 months
5. Highest and best use and its target buyers or renters",
    )
}

/// Create the financial analysis task template, with lot economics
pub fn financial_analysis() -> Result<JinjaTemplate> {
    with_facts(
        FINANCIAL_ANALYSIS,
        r"Build the financial picture for this property.

Baseline lot economics at {{ economics.potential_lots | round(1) }} potential lots (3.5 per acre):
- Land price: {{ economics.land_price | money }}
- Development cost at $55,000 per lot: {{ economics.development_cost | money }}
- Total investment: {{ economics.total_investment | money }}

Cover:
1. Current valuation against comparable land
2. Development scenarios with cost and revenue estimates
3. Five and ten year return projections for each scenario
4. Key financial risks and sensitivity to price and cost changes

Document every assumption.",
    )
}

/// Create the development recommendations task template
pub fn development_recommendations() -> Result<JinjaTemplate> {
    with_facts(
        DEVELOPMENT_RECOMMENDATIONS,
        r"Using the analyses so far, recommend how to develop this property.

Cover:
1. The recommended development type and density
2. Phasing and a realistic timeline including approvals
3. Required infrastructure and entitlement work
4. Expected return and the conditions it depends on
5. Alternatives if the preferred plan is not approved",
    )
}

/// Create the full report task template
pub fn report() -> Result<JinjaTemplate> {
    with_facts(
        REPORT,
        r"Write a complete investment analysis report for this property from the research provided.

Sections:
1. Executive summary
2. Property overview: location, current status, zoning and legal considerations
3. Market analysis
4. Development potential with scenarios and their trade-offs
5. Financial analysis: valuation, costs, revenue and returns
6. Investment recommendations: strategy, timeline, exit options
7. Sources and methodology

Write in Markdown for sophisticated real estate investors.",
    )
}

/// Create the executive summary task template
pub fn executive_summary() -> Result<JinjaTemplate> {
    JinjaTemplate::new(
        EXECUTIVE_SUMMARY,
        r"Write a concise executive summary for the property at {{ address }}, {{ city }}, {{ state }}.

Include:
1. Property overview
2. Key findings
3. Top two or three development recommendations
4. Critical considerations
5. Next steps

Keep it to 500 to 800 words of Markdown. Use bullet points where they help.",
    )
}

/// Create the investment summary task template
pub fn investment_summary() -> Result<JinjaTemplate> {
    JinjaTemplate::new(
        INVESTMENT_SUMMARY,
        r"Write an investment summary for the property at {{ address }}, {{ city }}, {{ state }}, listed at {{ price | money }}.

Include:
1. Key financial metrics: ROI, IRR, NPV and payback period
2. Best, likely and worst case scenarios
3. How the property compares with similar land
4. Recommended strategy: development type, phasing and timeline
5. Risk factors and mitigations

Format it in Markdown for presentation to investors.",
    )
}

/// Create the property comparison task template
///
/// Expects `properties` (a list of record template variables) and
/// `criteria` (a list of `{name, weight}`).
pub fn comparison() -> Result<JinjaTemplate> {
    JinjaTemplate::new(
        COMPARISON,
        r#"Compare the following properties for development potential.
{% for p in properties %}
Property {{ loop.index }}: {{ p.address }}, {{ p.city }}, {{ p.state }}
- Size: {{ p.acres if p.acres is not none else "N/A" }} acres
- Price: {{ p.price | money }}
- Zoning: {{ p.zoning or "N/A" }}
{%- if p.economics.potential_lots %}
- Total investment for {{ p.economics.potential_lots | round(1) }} lots: {{ p.economics.total_investment | money }}
{%- endif %}
{% endfor %}
Weight the evaluation as follows:
{%- for c in criteria %}
- {{ c.name }}: {{ (c.weight * 100) | round | int }}%
{%- endfor %}

Score each property on every criterion from 1 to 10, compute the weighted total and
present the scores in a table. Rank the properties and recommend the best
opportunity with your reasoning."#,
    )
}
