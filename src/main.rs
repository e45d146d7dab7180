use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use miette::{IntoDiagnostic, Result, WrapErr};
use tokio_util::sync::CancellationToken;

use zunzuneo::config::AppConfig;
use zunzuneo::core::logging;
use zunzuneo::core::persona_gen::{
    DemographicField, DemographicSeed, GenerationRequest, PersonaPipeline, PersonalityGenerator,
};

/// World state used when no context is supplied.
const DEFAULT_CONTEXT: &str = "The year is 2029. Not much advancement has occurred in the world \
past your knowledge cutoff. Notably, in the NBA, the Oklahoma City Thunder have won the last 3 \
NBA championships.";

#[derive(Parser)]
#[command(name = "zunzuneo", version)]
#[command(about = "Generate synthetic social-media personas with an LLM")]
struct Cli {
    /// Config file (defaults to ~/.config/zunzuneo/config.toml)
    #[arg(long, global = true, env = "ZUNZUNEO_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate one persona and print it as JSON
    Generate(PersonaArgs),
    /// Print the prompt that would be sent, without calling the model
    Prompt(PersonaArgs),
}

#[derive(Args)]
struct PersonaArgs {
    /// World-state context
    #[arg(long, conflicts_with = "context_file")]
    context: Option<String>,

    /// Read the world-state context from a file
    #[arg(long)]
    context_file: Option<PathBuf>,

    /// Request a city; pass a value to pin it
    #[arg(long, num_args = 0..=1)]
    city: Option<Option<String>>,

    /// Request a gender; pass a value to pin it
    #[arg(long, num_args = 0..=1)]
    gender: Option<Option<String>>,

    /// Seed the personality sampler for reproducible runs
    #[arg(long)]
    seed: Option<u64>,
}

impl PersonaArgs {
    fn context(&self) -> Result<String> {
        if let Some(path) = &self.context_file {
            return std::fs::read_to_string(path)
                .into_diagnostic()
                .wrap_err_with(|| format!("reading context from {}", path.display()));
        }
        Ok(self
            .context
            .clone()
            .unwrap_or_else(|| DEFAULT_CONTEXT.to_string()))
    }

    fn demographic(&self) -> DemographicSeed {
        let mut seed = DemographicSeed::new();
        if let Some(city) = &self.city {
            seed = seed.with_city(DemographicField::from_hint(city.clone()));
        }
        if let Some(gender) = &self.gender {
            seed = seed.with_gender(DemographicField::from_hint(gender.clone()));
        }
        seed
    }

    fn personality_generator(&self, config: &AppConfig) -> Result<PersonalityGenerator> {
        let bound = config.trait_bound().into_diagnostic()?;
        Ok(match self.seed {
            Some(seed) => PersonalityGenerator::seeded(bound, seed),
            None => PersonalityGenerator::new(bound),
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    }
    .into_diagnostic()
    .wrap_err("loading configuration")?;

    let _log_guard = logging::init(&config);
    log::info!("{} v{} starting", zunzuneo::NAME, zunzuneo::VERSION);

    match cli.command {
        Command::Generate(args) => generate(&config, &args).await,
        Command::Prompt(args) => print_prompt(&config, &args),
    }
}

async fn generate(config: &AppConfig, args: &PersonaArgs) -> Result<()> {
    let client = config.generation_client().into_diagnostic()?;
    let pipeline = PersonaPipeline::new(client)
        .with_personality_generator(args.personality_generator(config)?)
        .with_composer(config.prompt_composer().into_diagnostic()?)
        .with_min_interests(config.generation.min_interests);

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("Interrupt received, cancelling generation");
            on_signal.cancel();
        }
    });

    let context = args.context()?;
    let persona = pipeline
        .generate(&context, Some(&args.demographic()), Some(&cancel))
        .await
        .into_diagnostic()
        .wrap_err("generating persona")?;

    let json = serde_json::to_string_pretty(&persona).into_diagnostic()?;
    println!("{json}");
    Ok(())
}

fn print_prompt(config: &AppConfig, args: &PersonaArgs) -> Result<()> {
    let personality = args.personality_generator(config)?.generate();
    let request = GenerationRequest::new(args.context()?, personality)
        .with_demographic(Some(args.demographic()));
    let prompt = config.prompt_composer().into_diagnostic()?.compose_request(&request);
    println!("{prompt}");
    Ok(())
}
