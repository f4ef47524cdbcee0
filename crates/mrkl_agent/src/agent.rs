use crate::composer::{HostedModelComposer, PassThroughComposer, ResponseComposer};
use crate::config::AgentConfig;
use crate::input_validator::is_meaningless;
use crate::params::extract_parameters;
use crate::reflector::{Reflector, ValidationSummary};
use crate::router::{is_university_events_query, ToolRouter};
use crate::tools::{ToolExecutor, ToolRegistry};
use crate::types::{AgentResponse, ReasoningTrace, ToolId};
use tracing::{debug, info};
use web::InferenceClient;

pub const INVALID_INPUT_GUIDANCE: &str = "I'm sorry, but your input appears to be random characters or doesn't contain recognizable words. Could you please provide a clear question or request? For example:\n\n• Ask for a calculation: 'What is 25 * 4 + 100?'\n• Request weather: 'What's the weather in London?'\n• Search for information: 'What is quantum computing?'\n• Get news: 'Latest news about AI'";

pub const INVALID_INPUT_PARAMETERS: &str = "invalid_input_detected";

const UNIVERSITY_EVENTS_ANSWER: &str = "The Rabbitron Lab is hosting a workshop about AI agents where students and researchers can learn about artificial intelligence, autonomous systems, and intelligent agent development.";
const UNIVERSITY_EVENTS_PARAMETERS: &str = "Heriot-Watt University Current Events";

/// Runs a query through validation, routing, tool execution, composition and
/// reflection. Takes `&mut self`, so queries are processed one at a time.
pub struct MrklAgent {
    registry: ToolRegistry,
    router: ToolRouter,
    composer: Box<dyn ResponseComposer>,
    reflector: Reflector,
    trace: ReasoningTrace,
}

impl MrklAgent {
    /// Agent with the default tools. Responses are phrased by the hosted
    /// model when a token is configured.
    pub fn new(config: &AgentConfig) -> Self {
        let composer: Box<dyn ResponseComposer> = match &config.huggingface_token {
            Some(token) => {
                info!("Using hosted model to compose responses");
                Box::new(HostedModelComposer::new(InferenceClient::with_base_url(
                    token.clone(),
                    config.endpoints.inference_url.clone(),
                    config.inference_timeout,
                )))
            }
            None => Box::new(PassThroughComposer),
        };

        Self::with_components(
            ToolRegistry::with_default_tools(config),
            ToolRouter::default(),
            composer,
            Reflector::new(config.history_capacity),
        )
    }

    pub fn with_components(
        registry: ToolRegistry,
        router: ToolRouter,
        composer: Box<dyn ResponseComposer>,
        reflector: Reflector,
    ) -> Self {
        Self {
            registry,
            router,
            composer,
            reflector,
            trace: ReasoningTrace::new(),
        }
    }

    pub async fn process_query(&mut self, query: &str) -> AgentResponse {
        self.trace.clear();
        info!("Processing query: {query:?}");

        if is_university_events_query(query) {
            return self.answer_university_events(query);
        }

        self.trace
            .record("Query Analysis", format!("Analyzing user query: '{query}'"));

        if is_meaningless(query) {
            return self.reject(query);
        }

        let decision = self.router.select_tool(query);
        self.trace
            .record("Tool Selection", decision.justification.as_str());

        let parameters = extract_parameters(query, decision.tool);
        self.trace
            .record("Parameter Extraction", format!("Extracted parameters: {parameters}"));

        let tool_result = ToolExecutor::new(&self.registry)
            .execute(decision.tool, &parameters, &mut self.trace)
            .await;

        let response = self.composer.compose(query, &tool_result).await;
        self.trace.record("Final Response", response.as_str());

        let validation = self.reflector.validate(query, &response, &self.trace);
        debug!(
            "Answer for {query:?} validated as {} ({}%)",
            validation.validation_status, validation.confidence_level
        );

        AgentResponse {
            response,
            reasoning_steps: self.trace.clone(),
            tool_used: decision.tool,
            parameters,
            validation,
        }
    }

    fn reject(&mut self, query: &str) -> AgentResponse {
        info!("Rejecting meaningless input {query:?}");
        self.trace.record(
            "Input Validation",
            "Detected meaningless or random input - cannot process",
        );
        self.trace.record(
            "Input Validation Failed",
            "Query appears to be random characters or meaningless input",
        );

        let validation =
            self.reflector
                .record_rejection(query, INVALID_INPUT_GUIDANCE, &self.trace);

        AgentResponse {
            response: INVALID_INPUT_GUIDANCE.to_string(),
            reasoning_steps: self.trace.clone(),
            tool_used: ToolId::InputValidator,
            parameters: INVALID_INPUT_PARAMETERS.to_string(),
            validation,
        }
    }

    fn answer_university_events(&mut self, query: &str) -> AgentResponse {
        self.trace.record(
            "Query Analysis",
            "Detected specific question about current events at Heriot-Watt University",
        );
        self.trace.record(
            "Knowledge Retrieval",
            "Accessing prepared information about Rabbitron Lab activities",
        );
        self.trace
            .record("Response Generation", "Providing current workshop information");

        let validation = self
            .reflector
            .validate(query, UNIVERSITY_EVENTS_ANSWER, &self.trace);

        AgentResponse {
            response: UNIVERSITY_EVENTS_ANSWER.to_string(),
            reasoning_steps: self.trace.clone(),
            tool_used: ToolId::KnowledgeBase,
            parameters: UNIVERSITY_EVENTS_PARAMETERS.to_string(),
            validation,
        }
    }

    pub fn validation_summary(&self) -> Option<ValidationSummary> {
        self.reflector.summary()
    }

    /// Steps recorded for the most recent query.
    pub fn reasoning_trace(&self) -> &ReasoningTrace {
        &self.trace
    }

    pub fn reflector(&self) -> &Reflector {
        &self.reflector
    }
}
