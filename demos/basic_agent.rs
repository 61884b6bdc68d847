//! Create an agent, open a chat, and ask a question synchronously.

use colloquy::prelude::*;

#[tokio::main]
async fn main() -> colloquy::error::Result<()> {
    let client = Client::resolve(None)?;

    let agent = client
        .create_agent(
            &AgentConfig::builder()
                .name("math-helper")
                .expert_in("arithmetic")
                .initial_instructions("Answer math questions concisely.")
                .build(),
        )
        .await?;
    println!("agent ready: {} ({})", agent.name, agent.id);

    let chat = client.create_unique_chat(&agent.id, "demo").await?;
    let handle = client.chat(&agent.id, &chat.id);

    let answer = handle.converse("What is 2+2?").await?;
    println!("agent: {answer}");

    Ok(())
}
