// emailrisk — inline email-address risk validation for signup flows.
//
// Modes:
//   serve  — run the HTTP validation + admin API (production)
//   check  — validate a single address and exit with a decision code
//   eval   — run the synthetic batch detection-rate harness

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use emailrisk::config::{ConfigStore, SecretsConfig};
use emailrisk::eval::Evaluator;
use emailrisk::http::{self, AppState};
use emailrisk::kv::MemoryKv;
use emailrisk::markov::Ensemble;
use emailrisk::orchestrator::Orchestrator;
use emailrisk::otel::Metrics;
use emailrisk::recorder::Recorder;
use emailrisk::reference::ReferenceData;
use emailrisk::types::{Decision, RawEmail, RequestMeta};

#[derive(Parser)]
#[command(
    name = "emailrisk",
    about = "Inline email-address risk validation for account-signup flows",
    version = env!("CARGO_PKG_VERSION"),
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP validation + admin API.
    Serve {
        #[arg(long, default_value = "0.0.0.0:8080")]
        addr: SocketAddr,
        #[arg(long, default_value = "/tmp/emailrisk_decisions.jsonl")]
        sink_path: PathBuf,
        #[arg(long, env = "EMAILRISK_ADMIN_KEY", default_value = "")]
        admin_api_key: String,
        #[arg(long, env = "EMAILRISK_FORWARD_KEY", default_value = "dev-key")]
        forward_key: String,
    },
    /// Validate a single address from the command line and exit with a
    /// decision-coded exit status: 0 allow/warn, 1 block, 2 invalid
    /// input, 3 internal error.
    Check {
        email: String,
    },
    /// Run the synthetic batch detection-rate harness.
    Eval {
        #[arg(long, default_value = "1000")]
        samples: usize,
    },
}

fn build_orchestrator(sink_path: PathBuf, forward_key: String) -> Arc<Orchestrator> {
    let metrics = Metrics::new();
    Arc::new(Orchestrator {
        config: Arc::new(ConfigStore::new(Arc::new(MemoryKv::new()))),
        reference: ReferenceData::new(),
        markov: Arc::new(Ensemble::new()),
        recorder: Arc::new(Recorder::new(sink_path, Arc::clone(&metrics), forward_key)),
        metrics,
    })
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("emailrisk=info".parse().unwrap()),
        )
        .compact()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve { addr, sink_path, admin_api_key, forward_key } => {
            let orchestrator = build_orchestrator(sink_path, forward_key);
            let metrics = Arc::clone(&orchestrator.metrics);

            if !admin_api_key.is_empty() {
                let secrets = SecretsConfig { admin_api_key, ..Default::default() };
                if let Err(e) = orchestrator.config.seed_secrets(secrets).await {
                    eprintln!("failed to seed admin API key: {e}");
                    return ExitCode::from(3);
                }
            }

            let reference = Arc::clone(&orchestrator.reference);
            tokio::spawn(reference.refresh_loop(
                "https://reference.internal".to_string(),
                emailrisk::reference::DEFAULT_REFRESH_INTERVAL,
            ));

            let state = Arc::new(AppState { orchestrator, metrics });
            let app = http::router(state);

            info!("listening on {addr}");
            let listener = match tokio::net::TcpListener::bind(addr).await {
                Ok(l) => l,
                Err(e) => {
                    eprintln!("failed to bind {addr}: {e}");
                    return ExitCode::from(3);
                }
            };
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("server error: {e}");
                return ExitCode::from(3);
            }
            ExitCode::SUCCESS
        }

        Command::Check { email } => {
            let orchestrator = build_orchestrator("/tmp/emailrisk_decisions.jsonl".into(), "dev-key".into());
            let meta = RequestMeta::default();
            match orchestrator.validate(&RawEmail::from(email), meta, "cli".into(), "check".into()).await {
                Ok(result) => {
                    println!("{}", serde_json::to_string_pretty(&result.signals).unwrap_or_default());
                    println!("decision={} risk_score={:.4}", result.decision, result.risk_score);
                    match result.decision {
                        Decision::Allow | Decision::Warn => ExitCode::SUCCESS,
                        Decision::Block => ExitCode::from(1),
                    }
                }
                Err(e) => {
                    eprintln!("invalid input: {e}");
                    ExitCode::from(2)
                }
            }
        }

        Command::Eval { samples } => {
            let config_store = ConfigStore::new(Arc::new(MemoryKv::new()));
            let evaluator =
                Evaluator::new(&config_store, ReferenceData::new(), Arc::new(Ensemble::new())).await;
            let report = evaluator.run(samples).await;
            report.print_report();
            ExitCode::SUCCESS
        }
    }
}
