// Terminal front-end for the catalog metadata-search chat
use std::io::{self, Write};

use datacat::chat::{ChatFrontend, QueryApiClient};
use datacat::config::ChatConfig;
use datacat::models::ChatMessage;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    println!("💬 datacat - Catalog Search Chat");
    println!("================================");

    let config = ChatConfig::from_env();
    println!("API base: {}", config.base_url);

    let mut chat = ChatFrontend::new(QueryApiClient::from_config(&config));
    chat.connect().await;

    if let Some(banner) = chat.error() {
        eprintln!("❌ {}", banner);
        return Ok(());
    }
    print_messages(chat.messages(), 0);

    println!("Type a question, or /quit to leave.");
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line == "/quit" {
            break;
        }

        let before = chat.messages().len();
        if !chat.send(line).await {
            continue;
        }
        // The submitted line was echoed into the log; print what came after it.
        print_messages(chat.messages(), before + 1);
        if let Some(banner) = chat.error() {
            eprintln!("⚠️  {}", banner);
            chat.dismiss_error();
        }
    }

    println!("Bye!");
    Ok(())
}

fn print_messages(messages: &[ChatMessage], from: usize) {
    for message in &messages[from..] {
        println!("{}: {}", message.role.as_str(), message.content);
    }
}
