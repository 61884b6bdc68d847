//! Upload a document and ask questions grounded in it.

use colloquy::prelude::*;

const HANDBOOK: &str = "\
# Office handbook
Core hours are 10:00-16:00. The coffee machine is cleaned every Friday.
";

#[tokio::main]
async fn main() -> colloquy::error::Result<()> {
    let client = Client::resolve(None)?;

    let agent = client
        .create_agent(
            &AgentConfig::builder()
                .name("handbook-qa")
                .initial_instructions("Answer questions using the attached documents only.")
                .build(),
        )
        .await?;

    let resource = client
        .add_document(&agent.id, "handbook.md", HANDBOOK.as_bytes(), "text/markdown")
        .await?;
    println!("document processed: {} ({})", resource.name, resource.id);

    let chat = client.create_unique_chat(&agent.id, "handbook").await?;
    let handle = client.chat(&agent.id, &chat.id);

    let answer = handle.converse("What are the core hours?").await?;
    println!("agent: {answer}");

    Ok(())
}
