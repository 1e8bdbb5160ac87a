//! Interactive chat command.

use super::ask::build_session;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use anyhow::Result;
use console::style;
use futures::StreamExt;
use std::io::{self, BufRead, Write};

/// Run the interactive chat command.
pub async fn run_chat(twin: &str, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Ask, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'stemme doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let mut session = build_session(&settings, twin, None)?;
    let twin_title = session.twin().title.clone();

    println!("\n{}", style(format!("Chatting with {}", twin_title)).bold().cyan());
    println!(
        "{}\n",
        style("Type your questions, or 'exit' to quit. Use 'clear' to reset conversation.").dim()
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{} ", style("You:").green().bold());
        stdout.flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            break;
        }

        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            Output::info("Goodbye!");
            break;
        }

        if input.eq_ignore_ascii_case("clear") {
            session.clear_history();
            Output::info("Conversation history cleared.");
            continue;
        }

        match session.send(input).await {
            Ok(mut stream) => {
                print!("\n{} ", style(format!("{}:", twin_title)).cyan().bold());
                stdout.flush()?;

                let mut answer = String::new();
                while let Some(fragment) = stream.next().await {
                    match fragment {
                        Ok(text) => {
                            print!("{}", text);
                            stdout.flush()?;
                            answer.push_str(&text);
                        }
                        Err(e) => {
                            println!();
                            Output::error(&format!("Answer stream ended early: {}", e));
                            break;
                        }
                    }
                }
                println!("\n");
                session.record_answer(&answer);
            }
            Err(e) => {
                Output::error(&format!("Error: {}", e));
            }
        }
    }

    Ok(())
}
