//! Reconciliation dashboard CLI
//!
//! Command-line views over the reconciliation backend: anomaly review,
//! augmentation and validation reports, and category normalization

use clap::{Parser, Subcommand};
use recondash::config::{LoggingConfig, Settings};
use recondash::models::anomaly::*;
use recondash::models::augmentation::{AugmentationMetrics, AugmentationRequest};
use recondash::models::validation::{ValidationReport, ValidationRunRequest};
use recondash::services::{
    normalize_financial_categories, AnomalyService, ApiClient, AugmentationService, JsonApi,
    ValidationService,
};
use recondash::utils::error::{helpers::validation_error, AppError, AppResult};
use recondash::utils::format::{format_currency, format_percentage, format_timestamp};
use recondash::CategoryAmount;
use serde::Serialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Parser)]
#[command(name = "recondash", version, about = "Financial reconciliation dashboard client")]
struct Cli {
    /// Print raw JSON instead of formatted text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Review reconciliation anomalies
    Anomalies {
        #[command(subcommand)]
        command: AnomalyCommand,
    },
    /// Data augmentation reports
    Augmentation {
        #[command(subcommand)]
        command: AugmentationCommand,
    },
    /// Validation reports and ad-hoc runs
    Validation {
        #[command(subcommand)]
        command: ValidationCommand,
    },
    /// Normalize a category payload read from FILE (or stdin)
    Categories {
        file: Option<PathBuf>,
        /// JSON pointer to the categories inside the document, e.g. /data/categories
        #[arg(long)]
        pointer: Option<String>,
    },
    /// Print the base URL requests are sent to
    BaseUrl,
}

#[derive(Subcommand)]
enum AnomalyCommand {
    /// List anomalies
    List {
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        severity: Option<String>,
        #[arg(long)]
        status: Option<String>,
    },
    /// Aggregate counts
    Stats,
    /// Suggested resolution for an anomaly
    Suggestions { id: String },
    /// Record a decision
    Review {
        id: String,
        #[arg(long)]
        decision: ReviewDecision,
        #[arg(long)]
        notes: Option<String>,
        #[arg(long)]
        reviewer: Option<String>,
    },
    /// Escalate to another reviewer
    Escalate {
        id: String,
        #[arg(long = "to")]
        escalate_to: String,
        #[arg(long)]
        reason: Option<String>,
    },
    /// Apply one decision to several anomalies
    BatchReview {
        #[arg(long, value_delimiter = ',', required = true)]
        ids: Vec<String>,
        #[arg(long)]
        decision: ReviewDecision,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Trigger a detection run
    Detect {
        #[arg(long)]
        start_date: Option<String>,
        #[arg(long)]
        end_date: Option<String>,
        #[arg(long)]
        account_id: Option<String>,
        #[arg(long)]
        sensitivity: Option<f64>,
    },
}

#[derive(Subcommand)]
enum AugmentationCommand {
    /// Current augmentation report
    Metrics,
    /// Start an augmentation run, with optional request body from FILE
    Run {
        file: Option<PathBuf>,
        #[arg(long)]
        method: Option<String>,
        #[arg(long)]
        factor: Option<u32>,
    },
}

#[derive(Subcommand)]
enum ValidationCommand {
    /// Latest validation results
    Results,
    /// Validate records read from FILE (or stdin)
    Run {
        file: Option<PathBuf>,
        #[arg(long, value_delimiter = ',')]
        rules: Vec<String>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let settings = match Settings::new() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error [config_error]: {:#}", e);
            std::process::exit(3);
        }
    };

    init_logging(&settings.logging);

    let json = cli.json;
    if let Err(e) = run(cli, settings).await {
        report_error(&e, json);
        std::process::exit(e.exit_code());
    }
}

/// Initialize logging system
///
/// Logs go to stderr so stdout only carries command output.
fn init_logging(config: &LoggingConfig) {
    let subscriber: Box<dyn tracing::Subscriber + Send + Sync> = if config.format == "json" {
        // JSON format logs
        Box::new(tracing_subscriber::fmt()
            .with_env_filter(config.level.clone())
            .with_writer(std::io::stderr)
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .finish())
    } else {
        // Human readable format
        Box::new(tracing_subscriber::fmt()
            .with_env_filter(config.level.clone())
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false)
            .finish())
    };

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    debug!("Logging system initialized");
}

async fn run(cli: Cli, settings: Settings) -> AppResult<()> {
    let client = ApiClient::new(&settings.api)?;
    info!("{} ({} runtime)", recondash::version_info(), settings.api.mode);
    let api: Arc<dyn JsonApi> = Arc::new(client);
    let json = cli.json;

    match cli.command {
        Command::Anomalies { command } => run_anomalies(AnomalyService::new(api), command, json).await,
        Command::Augmentation { command } => {
            run_augmentation(AugmentationService::new(api), command, json).await
        }
        Command::Validation { command } => {
            run_validation(ValidationService::new(api), command, json).await
        }
        Command::Categories { file, pointer } => {
            let document = read_json(file.as_deref())?;
            let target = match pointer.as_deref() {
                Some(p) => document.pointer(p),
                None => Some(&document),
            };
            print_json(&normalize_financial_categories(target))
        }
        Command::BaseUrl => {
            let base = api.base_url();
            if base.is_empty() {
                println!(
                    "(same origin: {})",
                    settings.api.origin.as_deref().unwrap_or("not configured")
                );
            } else {
                println!("{}", base);
            }
            Ok(())
        }
    }
}

async fn run_anomalies(service: AnomalyService, command: AnomalyCommand, json: bool) -> AppResult<()> {
    match command {
        AnomalyCommand::List { page, limit, severity, status } => {
            let query = AnomalyQuery { page, limit, severity, status };
            let page = service.list(&query).await?;
            if json {
                return print_json(&page);
            }
            print_anomaly_page(&page);
            Ok(())
        }
        AnomalyCommand::Stats => {
            let stats = service.statistics().await?;
            if json {
                return print_json(&stats);
            }
            println!("Total de anomalias: {}", stats.total_count());
            print_breakdown("Por severidade", &stats.severity_breakdown());
            print_breakdown("Por status", &stats.status_breakdown());
            Ok(())
        }
        AnomalyCommand::Suggestions { id } => {
            let suggestion = service.suggestions(&id).await?;
            if json {
                return print_json(&suggestion);
            }
            print_suggestion(&id, &suggestion);
            Ok(())
        }
        AnomalyCommand::Review { id, decision, notes, reviewer } => {
            let request = ReviewRequest { decision, notes, reviewer };
            let outcome = service.review(&id, &request).await?;
            if !json {
                println!("Anomalia {}: {}", id, decision.label());
            }
            print_json(&outcome)
        }
        AnomalyCommand::Escalate { id, escalate_to, reason } => {
            let request = EscalationRequest { escalate_to, reason };
            print_json(&service.escalate(&id, &request).await?)
        }
        AnomalyCommand::BatchReview { ids, decision, notes } => {
            let request = BatchReviewRequest { anomaly_ids: ids, decision, notes };
            print_json(&service.batch_review(&request).await?)
        }
        AnomalyCommand::Detect { start_date, end_date, account_id, sensitivity } => {
            let request = DetectionRequest { start_date, end_date, account_id, sensitivity };
            print_json(&service.detect(&request).await?)
        }
    }
}

async fn run_augmentation(
    service: AugmentationService,
    command: AugmentationCommand,
    json: bool,
) -> AppResult<()> {
    match command {
        AugmentationCommand::Metrics => {
            let metrics = service.metrics().await?;
            if json {
                return print_json(&metrics);
            }
            print_augmentation_metrics(&metrics);
            Ok(())
        }
        AugmentationCommand::Run { file, method, factor } => {
            let mut request: AugmentationRequest = match file {
                Some(path) => serde_json::from_value(read_json(Some(&path))?)?,
                None => AugmentationRequest::default(),
            };
            if method.is_some() {
                request.method = method;
            }
            if factor.is_some() {
                request.factor = factor;
            }
            print_json(&service.augment(&request).await?)
        }
    }
}

async fn run_validation(service: ValidationService, command: ValidationCommand, json: bool) -> AppResult<()> {
    let report = match command {
        ValidationCommand::Results => service.results().await?,
        ValidationCommand::Run { file, rules } => {
            let data = read_json(file.as_deref())?;
            service.validate(&ValidationRunRequest { data, rules }).await?
        }
    };

    if json {
        return print_json(&report);
    }
    print_validation_report(&report);
    Ok(())
}

/// Read a JSON document from a file, or from stdin when no path is given
fn read_json(path: Option<&Path>) -> AppResult<Value> {
    let content = match path {
        Some(path) => std::fs::read_to_string(path)?,
        None => std::io::read_to_string(std::io::stdin())?,
    };
    if content.trim().is_empty() {
        return Err(validation_error("input is empty"));
    }
    Ok(serde_json::from_str(&content)?)
}

fn print_json<T: Serialize>(value: &T) -> AppResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_anomaly_page(page: &AnomalyPage) {
    println!(
        "Página {}/{} ({} anomalias)",
        page.page.max(1),
        page.page_count().max(1),
        page.total
    );
    for anomaly in &page.anomalies {
        let amount = anomaly.amount.map(format_currency).unwrap_or_else(|| "-".to_string());
        let detected = anomaly
            .detected_at
            .as_deref()
            .map(format_timestamp)
            .unwrap_or_else(|| "-".to_string());
        println!(
            "[{:<12}] {:<10} {:<12} {:>16}  {}  {}",
            anomaly.severity.label(),
            anomaly.id,
            anomaly.status.label(),
            amount,
            detected,
            anomaly.description.as_deref().unwrap_or("")
        );
    }
}

fn print_breakdown(title: &str, rows: &[CategoryAmount]) {
    println!("{}:", title);
    if rows.is_empty() {
        println!("  (sem dados)");
    }
    for row in rows {
        println!("  {:<20} {}", row.name, row.value);
    }
}

fn print_suggestion(id: &str, suggestion: &ResolutionSuggestion) {
    println!("Sugestão para a anomalia {}", id);
    if let Some(text) = &suggestion.suggestion {
        println!("  {}", text);
    }
    if let Some(action) = suggestion.recommended_action() {
        println!("  Ação recomendada: {}", action);
    }
    if let Some(confidence) = suggestion.confidence {
        println!("  Confiança: {}", format_percentage(confidence));
    }
    if let Some(reasoning) = suggestion.explanation() {
        println!("  Justificativa: {}", reasoning);
    }
}

fn print_augmentation_metrics(metrics: &AugmentationMetrics) {
    println!("Amostras originais: {}", metrics.original_samples());
    println!("Amostras aumentadas: {}", metrics.augmented_samples());
    if let Some(ratio) = metrics.augmentation_ratio() {
        println!("Fator de aumento: {:.2}x", ratio);
    }
    if let Some(score) = metrics.quality_score {
        println!("Qualidade: {}", format_percentage(score));
    }
    if let Some(last_run) = &metrics.last_run {
        println!("Última execução: {}", format_timestamp(last_run));
    }
    print_breakdown("Distribuição por categoria", &metrics.category_distribution());
}

fn print_validation_report(report: &ValidationReport) {
    println!(
        "Validações: {} (falhas: {}, avisos: {})",
        report.effective_total(),
        report.failed,
        report.warnings
    );
    if let Some(rate) = report.pass_rate() {
        println!("Taxa de aprovação: {}", format_percentage(rate));
    }
    for failure in report.failures() {
        println!(
            "  ✗ {} {}",
            failure.rule_name(),
            failure.message.as_deref().unwrap_or("")
        );
    }
}

fn report_error(error: &AppError, json: bool) {
    match error.api_error() {
        Some(api) if json => eprintln!("{}", api.to_json()),
        Some(api) => eprintln!(
            "Error [{}] (status {}): {}",
            error.error_type(),
            api.status(),
            api.message()
        ),
        None => eprintln!("Error [{}]: {}", error.error_type(), error),
    }
}
