use clap::{Parser, Subcommand};
use fhir::CdsRequest;
use pama_core::{CoreConfig, PamaImagingService};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "pama")]
#[command(about = "PAMA imaging appropriate-use CLI")]
struct Cli {
    /// Consult-method marker written onto rated orders
    #[arg(long, global = true, env = "PAMA_CONSULT_METHOD")]
    consult_method: Option<String>,
    /// SMART app URL offered on every card
    #[arg(long, global = true, env = "PAMA_APP_URL")]
    app_url: Option<String>,
    /// Label of the SMART app link
    #[arg(long, global = true, env = "PAMA_APP_LABEL")]
    app_label: Option<String>,
    /// Guideline table YAML (built-in table if omitted)
    #[arg(long, global = true, env = "PAMA_GUIDELINES_FILE")]
    guidelines_file: Option<String>,
    /// Recommendation catalog YAML (built-in catalog if omitted)
    #[arg(long, global = true, env = "PAMA_RECOMMENDATIONS_FILE")]
    recommendations_file: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Rate a procedure for a set of indications
    Rate {
        /// CPT procedure code
        #[arg(long)]
        procedure: String,
        /// SNOMED CT indication code; the first one is the primary indication
        #[arg(long = "indication")]
        indications: Vec<String>,
    },
    /// Evaluate an order-select hook request and print the response JSON
    Evaluate {
        /// Path to the request JSON
        request: PathBuf,
    },
    /// List the loaded guideline table
    Guidelines,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let cfg = CoreConfig::from_env_values(
        cli.consult_method,
        cli.app_url,
        cli.app_label,
        cli.guidelines_file,
        cli.recommendations_file,
    )?;
    let service = PamaImagingService::new(Arc::new(cfg))?;

    match cli.command {
        Some(Commands::Rate {
            procedure,
            indications,
        }) => match service.rate_codes(&procedure, &indications) {
            Some(rating) => println!("{}", rating),
            None => println!("no rating"),
        },
        Some(Commands::Evaluate { request }) => {
            let text = std::fs::read_to_string(&request)
                .map_err(|e| anyhow::anyhow!("failed to read {}: {}", request.display(), e))?;
            let request = CdsRequest::from_json(&text)?;
            let response = service.evaluate(&request);
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        Some(Commands::Guidelines) => {
            let table = service.guidelines();
            if table.is_empty() {
                println!("No guidelines loaded.");
            }
            for (procedure, guideline) in table.iter() {
                println!("{}", procedure);
                for set in guideline.appropriate() {
                    println!("  appropriate: {}", join(set));
                }
                for set in guideline.not_appropriate() {
                    println!("  not appropriate: {}", join(set));
                }
            }
        }
        None => {
            println!("Use 'pama --help' for commands");
        }
    }

    Ok(())
}

fn join<'a>(codes: impl IntoIterator<Item = &'a String>) -> String {
    codes
        .into_iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
