use anyhow::Result;
use mrkl_agent::cli::{self, Args, Command, DEMO_SCENARIOS};
use mrkl_agent::logging::setup_logging;
use mrkl_agent::{AgentConfig, MrklAgent};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::time::Duration;
use tracing::debug;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.verbose);

    let config = AgentConfig::from_env();
    debug!("History capacity: {}", config.history_capacity);
    let mut agent = MrklAgent::new(&config);

    match args.command() {
        Command::Demo => run_demo(&mut agent).await,
        Command::Ask { query, json } => {
            let result = agent.process_query(&query).await;
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print!("{}", cli::format_response(&result));
            }
        }
        Command::Interactive => run_interactive(&mut agent).await?,
        Command::Summary => {
            run_demo(&mut agent).await;
            println!("\nValidation summary");
            print!("{}", cli::format_summary(agent.validation_summary().as_ref()));
        }
    }

    Ok(())
}

async fn run_demo(agent: &mut MrklAgent) {
    println!("MRKL Agent Demo");
    println!("{}", "=".repeat(60));

    for (i, query) in DEMO_SCENARIOS.iter().enumerate() {
        println!("\nDemo Scenario {}", i + 1);
        println!("Question: {query}");

        let result = agent.process_query(query).await;

        println!("\nReasoning Steps:");
        print!("{}", cli::format_trace(&result.reasoning_steps));
        println!("\nFinal Response: {}", result.response);
        println!(
            "Validation: {} ({}% confidence)",
            result.validation.validation_status, result.validation.confidence_level
        );
        println!("{}", "-".repeat(60));

        if i + 1 < DEMO_SCENARIOS.len() {
            tokio::time::sleep(Duration::from_secs(1)).await;
        }
    }
}

async fn run_interactive(agent: &mut MrklAgent) -> Result<()> {
    let mut editor = DefaultEditor::new()?;

    println!("MRKL Agent - Interactive Mode");
    println!("Type 'quit' to exit, 'demo' for predefined scenarios, 'summary' for validation stats");
    println!("{}", "=".repeat(50));

    loop {
        let line = match editor.readline("\nYour question: ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        };
        let query = line.trim();
        if query.is_empty() {
            continue;
        }
        let _ = editor.add_history_entry(query);

        match query.to_lowercase().as_str() {
            "quit" | "exit" | "q" => break,
            "demo" => run_demo(agent).await,
            "summary" => print!("{}", cli::format_summary(agent.validation_summary().as_ref())),
            _ => {
                let result = agent.process_query(query).await;
                print!("{}", cli::format_response(&result));
                println!("\nReasoning:");
                print!("{}", cli::format_trace(&result.reasoning_steps));
            }
        }
    }

    println!("Goodbye!");
    Ok(())
}
