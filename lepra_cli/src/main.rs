//! # Lepra Screen CLI Application
//!
//! Terminal interface to the screening form. Runs the same controller as the
//! GUI, so navigation, validation and notices behave identically.
//!
//! ```text
//! lepra fill                          # prompt section by section
//! lepra submit --values patient.json  # submit a prepared set of answers
//! lepra schema                        # print the form schema as JSON
//! ```

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use lepra_core::config::{self, AppConfig};
use lepra_core::form::{FieldKind, FieldSpec};
use lepra_core::{
    file_io, render_report_pdf, FormController, NavOutcome, PredictionClient, SubmissionOutcome,
};

#[derive(Parser)]
#[command(name = "lepra")]
#[command(about = "Leprosy screening form and report CLI")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fill the form interactively, then submit it
    Fill(SubmitArgs),
    /// Submit answers from a JSON file of field name to value
    Submit {
        /// JSON object of field values
        #[arg(long)]
        values: PathBuf,
        #[command(flatten)]
        args: SubmitArgs,
    },
    /// Print the form schema as JSON
    Schema,
}

#[derive(Args)]
struct SubmitArgs {
    /// Base URL of the prediction service (overrides config and LEPRA_ENDPOINT)
    #[arg(long)]
    endpoint: Option<String>,
    /// Directory for the PDF report
    #[arg(long)]
    out: Option<PathBuf>,
    /// Skip writing the PDF report
    #[arg(long)]
    no_report: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Schema => {
            let controller = FormController::leprosy_screening();
            println!("{}", serde_json::to_string_pretty(controller.schema())?);
            Ok(())
        }
        Commands::Fill(args) => {
            let config = load_config();
            let client = build_client(&config, &args)?;
            let mut controller = FormController::leprosy_screening();
            fill_interactively(&mut controller, &client).await?;
            finish(&controller, &config, &args)
        }
        Commands::Submit { values, args } => {
            let config = load_config();
            let client = build_client(&config, &args)?;
            let values = file_io::load_form_values(&values)
                .with_context(|| format!("loading {}", values.display()))?;
            let mut controller = FormController::leprosy_screening().with_values(values);
            submit_prepared(&mut controller, &client).await?;
            finish(&controller, &config, &args)
        }
    }
}

fn load_config() -> AppConfig {
    config::load_config().unwrap_or_else(|e| {
        tracing::warn!(%e, "could not load config, using defaults");
        AppConfig::default()
    })
}

fn build_client(config: &AppConfig, args: &SubmitArgs) -> anyhow::Result<PredictionClient> {
    let endpoint = args.endpoint.as_deref().unwrap_or(&config.endpoint);
    Ok(PredictionClient::new(endpoint)?)
}

// ============================================================================
// Interactive wizard
// ============================================================================

async fn fill_interactively(
    controller: &mut FormController,
    client: &PredictionClient,
) -> anyhow::Result<()> {
    println!("Leprosy Screening");
    println!("=================");
    println!("Press Enter to keep the value shown in brackets.");

    loop {
        let section = controller.current_section().clone();
        println!();
        println!(
            "── {} ({} of {}) ──",
            section.title,
            controller.current_index() + 1,
            controller.section_count()
        );

        for field in &section.fields {
            let answer = prompt_field(field, controller.value(&field.name))?;
            controller.set_value(field.name.clone(), answer);
        }

        if controller.is_last_section() {
            match controller.submit(client).await {
                SubmissionOutcome::Rendered(rendered) => {
                    println!();
                    print!("{}", rendered.to_text());
                    return Ok(());
                }
                SubmissionOutcome::Blocked(notice) => {
                    println!();
                    println!("{}", notice.message());
                    print_marked(controller);
                }
                SubmissionOutcome::Failed { notice, error } => {
                    tracing::debug!(%error, "prediction failed");
                    bail!("{}", notice.message());
                }
            }
        } else if let NavOutcome::Blocked(notice) = controller.advance() {
            println!();
            println!("{}", notice.message());
            print_marked(controller);
        }
    }
}

fn prompt_field(field: &FieldSpec, current: &str) -> anyhow::Result<String> {
    loop {
        let answer = match &field.kind {
            FieldKind::Select { options } => {
                let prompt = format!("{} ({}) [{}]: ", field.label, options.join("/"), current);
                let input = prompt_line(&prompt)?;
                if input.is_empty() {
                    return Ok(current.to_string());
                }
                match options.iter().find(|o| o.eq_ignore_ascii_case(&input)) {
                    Some(option) => option.clone(),
                    None => {
                        println!("  Choose one of: {}", options.join(", "));
                        continue;
                    }
                }
            }
            FieldKind::Date => {
                let input = prompt_line(&format!("{} (YYYY-MM-DD, optional) [{}]: ", field.label, current))?;
                if input.is_empty() {
                    current.to_string()
                } else {
                    input
                }
            }
            FieldKind::Text | FieldKind::Number => {
                let input = prompt_line(&format!("{} [{}]: ", field.label, current))?;
                if input.is_empty() {
                    current.to_string()
                } else {
                    input
                }
            }
        };
        return Ok(answer);
    }
}

fn prompt_line(prompt: &str) -> anyhow::Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    if io::stdin().lock().read_line(&mut input)? == 0 {
        bail!("input closed before the form was complete");
    }
    Ok(input.trim().to_string())
}

fn print_marked(controller: &FormController) {
    for field in &controller.current_section().fields {
        if controller.is_marked(&field.name) {
            println!("  missing: {}", field.label);
        }
    }
}

// ============================================================================
// File-driven submission
// ============================================================================

async fn submit_prepared(
    controller: &mut FormController,
    client: &PredictionClient,
) -> anyhow::Result<()> {
    while !controller.is_last_section() {
        if let NavOutcome::Blocked(notice) = controller.advance() {
            print_marked(controller);
            bail!("{} (section: {})", notice.message(), controller.current_section().title);
        }
    }

    match controller.submit(client).await {
        SubmissionOutcome::Rendered(rendered) => {
            print!("{}", rendered.to_text());
            Ok(())
        }
        SubmissionOutcome::Blocked(notice) => {
            print_marked(controller);
            bail!("{} (section: {})", notice.message(), controller.current_section().title)
        }
        SubmissionOutcome::Failed { notice, error } => {
            tracing::debug!(%error, "prediction failed");
            bail!("{}", notice.message())
        }
    }
}

// ============================================================================
// Report
// ============================================================================

fn finish(controller: &FormController, config: &AppConfig, args: &SubmitArgs) -> anyhow::Result<()> {
    if args.no_report {
        return Ok(());
    }

    let Some(report) = controller.build_report(chrono::Local::now()) else {
        return Ok(());
    };

    let out_dir = args
        .out
        .as_deref()
        .or(config.report_dir.as_deref())
        .unwrap_or(Path::new("."));

    let pdf = render_report_pdf(&report)?;
    let path = file_io::write_report(out_dir, &report.filename(), &pdf)?;
    println!();
    println!("Report saved: {}", path.display());
    Ok(())
}
