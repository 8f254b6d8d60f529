//! Application entry point: Language Ninja.
//!
//! # Startup sequence
//!
//! 1. Load `.env` (if any) so `OPENAI_API_KEY` and `PORT` can live there.
//! 2. Initialise logging (`RUST_LOG`, default `info`).
//! 3. Load [`AppConfig`] from `--config` or the platform settings file.
//! 4. Create the [`tokio`] runtime and run the chosen subcommand.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use language_ninja::{
    audio::AudioPostprocessor,
    config::{AppConfig, AppPaths},
    generator::{run_batches, BatchOptions, GenerationMode},
    llm::ApiClient,
    server,
    speech::{Rate, SpeechRenderer},
    store::{load_word_list, validate_key, SentenceSelector, WordStore},
};

#[derive(Parser, Debug)]
#[command(name = "language-ninja", version, about = "Vocabulary trainer: generate, serve and speak words")]
struct Cli {
    /// Settings file (defaults to the platform config directory).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the JSON API, the UI and the audio directory.
    Serve {
        /// Overrides server.port (and PORT).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Generate translations or example sentences for a word list.
    Generate {
        /// words or sentences.
        #[arg(default_value = "words")]
        mode: GenerationMode,

        /// One lemma per line; defaults to generator.word_list.
        #[arg(short, long)]
        word_list: Option<PathBuf>,

        /// Build prompts without calling the LLM or writing anything.
        #[arg(long)]
        simulate: bool,

        #[arg(short, long)]
        batch_size: Option<usize>,

        #[arg(long)]
        max_iterations: Option<usize>,
    },

    /// Speak a word (or one of its sentences) through the OS voice.
    Say {
        key: String,

        #[arg(short, long, default_value = "en")]
        lang: String,

        /// Sentence index or "random"; omit for the word itself.
        #[arg(short, long)]
        sentence: Option<SentenceSelector>,

        #[arg(short, long, default_value = "normal")]
        rate: Rate,

        /// Render to data/audio/<key>_<lang>.<container> instead of playing.
        #[arg(long)]
        save: bool,
    },

    /// Transcode rendered speech files to compressed mono audio.
    ConvertAudio {
        /// Root to scan; defaults to data/audio.
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// Print a word's translations and sentences as JSON.
    Show { key: String },
}

fn main() -> Result<()> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("warning: could not read .env: {e}");
        }
    }

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let settings_file = cli
        .config
        .clone()
        .unwrap_or_else(AppPaths::default_settings_file);
    let mut config = AppConfig::load_from(&settings_file)
        .with_context(|| format!("loading {}", settings_file.display()))?;
    log::debug!("settings: {}", settings_file.display());

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    match cli.command {
        Command::Serve { port } => {
            if let Some(port) = port {
                std::env::set_var("PORT", port.to_string());
            }
            rt.block_on(server::serve(&config))
        }

        Command::Generate {
            mode,
            word_list,
            simulate,
            batch_size,
            max_iterations,
        } => {
            let Some(path) = word_list.or_else(|| config.generator.word_list.clone()) else {
                bail!("no word list given (use --word-list or set generator.word_list)");
            };
            let words = load_word_list(&path)?;
            if let Some(n) = batch_size {
                config.generator.batch_size = n;
            }
            if let Some(n) = max_iterations {
                config.generator.max_iterations = n;
            }

            let opts = BatchOptions {
                mode,
                batch_size: config.generator.batch_size,
                max_iterations: config.generator.max_iterations,
                simulate,
            };
            let store = WordStore::from_paths(&config.paths());
            let llm = Arc::new(ApiClient::from_config(&config.llm));

            let report = rt.block_on(run_batches(store, llm, &words, &opts));
            println!(
                "{mode}: {} generated, {} saved, {} skipped, {} failed",
                report.generated, report.saved, report.skipped, report.failed
            );
            Ok(())
        }

        Command::Say {
            key,
            lang,
            sentence,
            rate,
            save,
        } => {
            let paths = config.paths();
            let store = WordStore::from_paths(&paths);
            validate_key(&key)?;
            let word = store.load_word(&key);
            let renderer = SpeechRenderer::from_config(&config.speech, &paths.audio_dir);

            let rendered = renderer.render(&word, &lang, sentence.unwrap_or_default(), rate, save)?;
            println!("{}", rendered.text.display_line());
            if let Some(path) = rendered.saved {
                println!("saved {}", path.display());
            }
            Ok(())
        }

        Command::ConvertAudio { dir } => {
            let root = dir.unwrap_or_else(|| config.paths().audio_dir);
            let summary = AudioPostprocessor::from_config(&config.transcode).convert_all(&root);
            println!(
                "{} converted, {} skipped, {} failed",
                summary.converted, summary.skipped, summary.failed
            );
            Ok(())
        }

        Command::Show { key } => {
            let store = WordStore::from_paths(&config.paths());
            if !store.word_exists(&key) {
                bail!("no translations for '{key}'");
            }
            let word = store.load_word(&key);
            println!("{}", serde_json::to_string_pretty(&word)?);
            Ok(())
        }
    }
}
