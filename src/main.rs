use clap::Parser;
use futures::{StreamExt, TryStreamExt};
use reactor_workshop::utils::error::ErrorSeverity;
use reactor_workshop::utils::logger;
use reactor_workshop::{CliConfig, Command, FluxExt, MonoExt, Result, TodoApi, TodoClient};
use serde::Serialize;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting reactor-workshop");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    match run(&cli).await {
        Ok(()) => Ok(()),
        Err(e) => {
            tracing::error!(
                "❌ Request failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());

            // 根據錯誤嚴重程度決定退出碼
            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0, // 找不到資源，僅警告
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
            Ok(())
        }
    }
}

async fn run(cli: &CliConfig) -> Result<()> {
    let config = cli.resolve()?;
    let client = TodoClient::from_config(&config)?;
    tracing::debug!("Using base URL {}", client.base_url());

    match &cli.command {
        Command::Todo { id } => {
            let name = format!("getTodo({})", id);
            let todo = client.get_todo(id).traced(&name).await?;
            print_json(&todo)?;
        }
        Command::Todos { limit } => {
            let todos: Vec<_> = client
                .get_todos()
                .traced("getTodos()")
                .take(limit.unwrap_or(usize::MAX))
                .try_collect()
                .await?;
            tracing::info!("Fetched {} todos", todos.len());
            print_json(&todos)?;
        }
        Command::Users => {
            let users: Vec<_> = client.get_users().traced("getUsers()").try_collect().await?;
            tracing::info!("Fetched {} users", users.len());
            print_json(&users)?;
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
