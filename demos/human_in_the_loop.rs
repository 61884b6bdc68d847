//! Drive an interruptible turn: the agent may pause to ask the human a
//! question, which is answered via `resume`.

use std::io::Write;

use colloquy::prelude::*;

#[tokio::main]
async fn main() -> colloquy::error::Result<()> {
    let client = Client::resolve(None)?;

    let agent = client
        .create_agent(
            &AgentConfig::builder()
                .name("trip-planner")
                .initial_instructions(
                    "Plan trips. When details are missing, ask the user instead of guessing.",
                )
                .build(),
        )
        .await?;
    client
        .create_tool(&agent.id, &ToolConfig::new("ask-user", ToolKind::Human))
        .await?;

    let chat = client.create_unique_chat(&agent.id, "trip").await?;
    let handle = client.chat(&agent.id, &chat.id);

    let mut outcome = handle
        .send_and_wait("Book me a weekend trip", &SendOptions::default())
        .await?;

    // Keep answering until the agent produces a final answer.
    while let TurnOutcome::Interrupted(pending) = outcome {
        println!("agent asks: {}", pending.question);
        print!("you: ");
        std::io::stdout().flush()?;
        let mut reply = String::new();
        std::io::stdin().read_line(&mut reply)?;

        outcome = handle
            .resume_and_wait(&pending.history_id, reply.trim())
            .await?;
    }

    if let TurnOutcome::Answered(entry) = outcome {
        println!("agent: {}", entry.content);
    }

    Ok(())
}
