// Tool implementations
pub mod calculator;
pub mod news;
pub mod search;
pub mod weather;

// Re-export all tools for registration
pub use calculator::CalculatorTool;
pub use news::NewsTool;
pub use search::SearchTool;
pub use weather::WeatherTool;
