use anyhow::Context;
use study_companion::{
    agents::Companion,
    api::routes::build_app,
    cli::{
        chat::{self, ChatSession},
        output::Output,
        Cli, Commands,
    },
    types::AgentPreference,
    utils::logging::{init_file_logging, init_logging},
    AppState, ConfigManager, ProviderRegistry, RateLimiter,
};
use tokio::io::BufReader;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // API keys such as GOOGLE_API_KEY usually live in .env
    dotenvy::dotenv().ok();

    let cli = Cli::parse_args();
    let output = if cli.no_color {
        Output::no_color()
    } else {
        Output::new()
    };

    match &cli.command {
        Some(Commands::Config { validate }) => show_config(&cli, *validate, &output),
        Some(Commands::Chat { agent, user }) => {
            let preference: AgentPreference = agent.parse()?;
            run_chat(&cli, preference, user, &output).await
        }
        Some(Commands::Serve) | None => serve(&cli).await,
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<ConfigManager> {
    ConfigManager::new(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))
}

async fn build_companion(config_manager: &ConfigManager) -> anyhow::Result<Companion> {
    let config = config_manager.config();
    let registry = ProviderRegistry::from_config(&config);
    Ok(Companion::from_config(&config, &registry).await?)
}

async fn serve(cli: &Cli) -> anyhow::Result<()> {
    let config_manager = load_config(cli)?;
    let config = config_manager.config();

    let level = if cli.verbose {
        "debug"
    } else {
        config.server.log_level.as_str()
    };
    init_logging(level, &config.logging).context("Failed to open log file")?;

    let companion = build_companion(&config_manager).await?;
    let state = AppState::new(config_manager.clone(), companion);

    #[cfg(unix)]
    tokio::spawn(reload_on_hangup(state.clone()));

    let app = build_app(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Study companion listening on http://{}", addr);
    tracing::info!(
        "Rate limit: {} requests per {}s (enabled: {})",
        config.rate_limit.max_requests,
        config.rate_limit.window_secs,
        config.rate_limit.enabled
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn run_chat(
    cli: &Cli,
    preference: AgentPreference,
    user: &str,
    output: &Output,
) -> anyhow::Result<()> {
    let config_manager = load_config(cli)?;
    let config = config_manager.config();

    // Keep the terminal for the conversation; logs only go to the file
    let level = if cli.verbose { "debug" } else { "info" };
    init_file_logging(level, &config.logging).context("Failed to open log file")?;

    let companion = build_companion(&config_manager).await?;
    let limiter = RateLimiter::from_config(&config.rate_limit);

    let session = ChatSession::new(&companion, &limiter, user, preference);
    chat::run(session, BufReader::new(tokio::io::stdin()), output).await?;
    Ok(())
}

fn show_config(cli: &Cli, validate: bool, output: &Output) -> anyhow::Result<()> {
    let config_manager = match load_config(cli) {
        Ok(manager) => manager,
        Err(e) => {
            output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };
    let config = config_manager.config();

    output.header("Configuration");
    output.kv("file", &config_manager.path().display().to_string());
    output.kv(
        "server",
        &format!("{}:{}", config.server.host, config.server.port),
    );
    output.kv("log level", &config.server.log_level);
    output.kv(
        "history window",
        &config.chat.history_window.to_string(),
    );
    output.kv(
        "rate limit",
        &format!(
            "{} requests / {}s{}",
            config.rate_limit.max_requests,
            config.rate_limit.window_secs,
            if config.rate_limit.enabled { "" } else { " (disabled)" }
        ),
    );

    output.header("Agents");
    for (name, agent) in [
        ("motivation", &config.agents.motivation),
        ("teaching", &config.agents.teaching),
        ("router", &config.agents.router),
    ] {
        let prompt = if agent.system_prompt.is_some() {
            " (custom prompt)"
        } else {
            ""
        };
        output.list_item(&format!("{} -> {}{}", name, agent.model, prompt));
    }

    if validate {
        output.newline();
        let warnings = config.validate_with_warnings()?;
        for warning in &warnings {
            output.warning(&warning.to_string());
        }
        output.success("Configuration is valid");
    }

    Ok(())
}

/// Reload the configuration and rebuild the agents on every SIGHUP.
#[cfg(unix)]
async fn reload_on_hangup(state: AppState) {
    use tokio::signal::unix::{signal, SignalKind};

    let mut hangup = match signal(SignalKind::hangup()) {
        Ok(signal) => signal,
        Err(e) => {
            tracing::error!("Failed to install SIGHUP handler: {}", e);
            return;
        }
    };

    while hangup.recv().await.is_some() {
        if let Err(e) = state.reload().await {
            tracing::error!(error = %e, "Reload failed");
        }
    }
}

/// Wait for Ctrl+C or SIGTERM for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
