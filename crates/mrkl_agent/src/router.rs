use crate::types::ToolId;
use tracing::debug;

/// One row of the routing table: if any keyword occurs in the lower-cased
/// query, the query goes to `tool`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingRule {
    pub tool: ToolId,
    pub keywords: Vec<String>,
    pub justification: String,
}

impl RoutingRule {
    pub fn new(tool: ToolId, keywords: &[&str], justification: &str) -> Self {
        Self {
            tool,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            justification: justification.to_string(),
        }
    }

    pub fn matches(&self, query_lower: &str) -> bool {
        self.keywords.iter().any(|k| query_lower.contains(k.as_str()))
    }
}

/// Ordered keyword rules, first match wins, with a fallback for queries no
/// rule claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingTable {
    rules: Vec<RoutingRule>,
    fallback: RouteDecision,
}

impl RoutingTable {
    pub fn new(rules: Vec<RoutingRule>, fallback: RouteDecision) -> Self {
        Self { rules, fallback }
    }

    pub fn rules(&self) -> &[RoutingRule] {
        &self.rules
    }

    pub fn fallback(&self) -> &RouteDecision {
        &self.fallback
    }

    pub fn route(&self, query: &str) -> RouteDecision {
        let query_lower = query.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&query_lower))
            .map(|rule| RouteDecision {
                tool: rule.tool,
                justification: rule.justification.clone(),
            })
            .unwrap_or_else(|| self.fallback.clone())
    }
}

impl Default for RoutingTable {
    fn default() -> Self {
        Self::new(
            vec![
                RoutingRule::new(
                    ToolId::Calculator,
                    &[
                        "calculate", "math", "+", "-", "*", "/", "=", "sum", "multiply", "divide",
                        "compute", "formula",
                    ],
                    "Detected mathematical operations - selecting Calculator tool",
                ),
                RoutingRule::new(
                    ToolId::Weather,
                    &[
                        "weather", "temperature", "rain", "sunny", "climate", "forecast",
                        "humidity", "wind",
                    ],
                    "Detected weather-related query - selecting Weather tool",
                ),
                RoutingRule::new(
                    ToolId::News,
                    &[
                        "news", "latest", "recent", "current events", "breaking", "today",
                        "yesterday", "happening",
                    ],
                    "Detected news/current events request - selecting News tool",
                ),
                RoutingRule::new(
                    ToolId::Search,
                    &[
                        "what is", "tell me about", "define", "explain", "information", "who is",
                        "when did", "where is", "how does",
                    ],
                    "Detected general information request - selecting Search tool",
                ),
            ],
            RouteDecision {
                tool: ToolId::Search,
                justification:
                    "General query detected - defaulting to Search tool for comprehensive information"
                        .to_string(),
            },
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDecision {
    pub tool: ToolId,
    pub justification: String,
}

/// Picks the tool for a query that already passed input validation.
#[derive(Debug, Clone, Default)]
pub struct ToolRouter {
    table: RoutingTable,
}

impl ToolRouter {
    pub fn new(table: RoutingTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &RoutingTable {
        &self.table
    }

    pub fn select_tool(&self, query: &str) -> RouteDecision {
        if is_university_events_query(query) {
            debug!("Routing to university knowledge base");
            return RouteDecision {
                tool: ToolId::KnowledgeBase,
                justification:
                    "Detected specific question about current events at Heriot-Watt University"
                        .to_string(),
            };
        }

        let decision = self.table.route(query);
        debug!("Routing {query:?} to {}", decision.tool);
        decision
    }
}

/// Questions about what is going on at Heriot-Watt get a canned answer.
pub fn is_university_events_query(query: &str) -> bool {
    let q = query.to_lowercase();
    q.contains("heriot")
        && q.contains("watt")
        && (q.contains("current") || q.contains("event") || q.contains("happening"))
}
