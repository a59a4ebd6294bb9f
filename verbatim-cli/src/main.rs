//! Verbatim: command-line front end of the translation memory.
//!
//! Owns the [`Registry`] for the configured database root and exposes every
//! operation of the memory as a subcommand. Catalogs are read and written as
//! JSON (see [`verbatim_store::Catalog`]).

mod config;

use clap::{Parser, Subcommand};
use log::info;
use std::path::PathBuf;

use verbatim_core::{FuzzyParams, MAX_FUZZINESS};
use verbatim_store::{
    pretranslate, PretranslateOptions, Progress, Registry, TranslationMemory, Updater,
    GOOD_QUALITY_SCORE,
};

#[derive(Parser)]
#[command(name = "verbatim", version, about = "Verbatim translation memory")]
struct Cli {
    /// Database root (overrides the config file)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Remember a translation
    Store {
        lang: String,
        source: String,
        translation: String,
    },
    /// Find translations of a sentence
    Lookup {
        lang: String,
        query: String,
        /// Query words that may be ignored
        #[arg(long, value_parser = clap::value_parser!(u32).range(..=i64::from(MAX_FUZZINESS)))]
        max_omits: Option<u32>,
        /// Extra words a match may have
        #[arg(long, value_parser = clap::value_parser!(u32).range(..=i64::from(MAX_FUZZINESS)))]
        max_delta: Option<u32>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Learn from translated JSON catalogs
    Import {
        lang: String,
        #[arg(required = true)]
        catalogs: Vec<PathBuf>,
    },
    /// Fill untranslated entries of a JSON catalog
    Pretranslate {
        lang: String,
        catalog: PathBuf,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Only fill in exact matches
        #[arg(long)]
        only_exact: bool,
        /// Don't mark exact matches as fuzzy
        #[arg(long)]
        exact_not_fuzzy: bool,
        /// Ignore matches scoring below the good-quality threshold
        #[arg(long)]
        good_quality: bool,
    },
    /// Dump every entry as JSON
    Export {
        lang: String,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Entry count and disk usage
    Stats { lang: String },
    /// List languages with a store
    Languages,
    /// Check whether a language (or a close variant) has a store
    Supported { lang: String },
    /// Move stores from an old database root
    Migrate {
        from: PathBuf,
        /// Colon-separated languages to move (default: all)
        #[arg(long, value_delimiter = ':')]
        languages: Option<Vec<String>>,
    },
}

/// Reports catalog progress through the log.
struct LogProgress {
    total: usize,
    done: usize,
}

impl Progress for LogProgress {
    fn set_total(&mut self, total: usize) {
        self.total = total;
    }

    fn message(&mut self, message: &str) {
        info!("[{}/{}] {message}", self.done + 1, self.total);
    }

    fn advance(&mut self) {
        self.done += 1;
    }
}

fn open(registry: &Registry, lang: &str) -> anyhow::Result<TranslationMemory> {
    Ok(registry.open(lang)?)
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = config::load_config(cli.config.as_deref(), cli.db)?;
    info!("Using translation memory at {}", config.database_dir.display());
    let registry = Registry::new(config);

    match cli.command {
        Commands::Store {
            lang,
            source,
            translation,
        } => {
            let tm = open(&registry, &lang)?;
            tm.store(&source, &translation)?;
            tm.release()?;
        }

        Commands::Lookup {
            lang,
            query,
            max_omits,
            max_delta,
            json,
        } => {
            let mut tm = open(&registry, &lang)?;
            let defaults = tm.params();
            tm.set_params(FuzzyParams::new(
                max_omits.unwrap_or(defaults.max_omits),
                max_delta.unwrap_or(defaults.max_delta),
            ));
            let result = tm.lookup(&query)?;
            if json {
                config::write_json(None, &result)?;
            } else {
                for translation in &result.translations {
                    println!("{}\t{translation}", result.score);
                }
            }
        }

        Commands::Import { lang, catalogs } => {
            let tm = open(&registry, &lang)?;
            let catalogs = catalogs
                .iter()
                .map(|path| config::read_catalog(path))
                .collect::<anyhow::Result<Vec<_>>>()?;

            let progress = LogProgress { total: 0, done: 0 };
            let stats = Updater::with_progress(&tm, progress).update(&catalogs)?;
            println!("stored {}, skipped {}", stats.stored, stats.skipped);
            tm.release()?;
        }

        Commands::Pretranslate {
            lang,
            catalog,
            output,
            only_exact,
            exact_not_fuzzy,
            good_quality,
        } => {
            let tm = open(&registry, &lang)?;
            let mut catalog = config::read_catalog(&catalog)?;
            let options = PretranslateOptions {
                only_exact,
                exact_not_fuzzy,
                min_score: if good_quality { GOOD_QUALITY_SCORE } else { 0 },
            };
            let stats = pretranslate(&tm, &mut catalog.entries, &options)?;
            config::write_json(output.as_deref(), &catalog)?;
            info!("{} exact, {} fuzzy", stats.exact, stats.fuzzy);
        }

        Commands::Export { lang, output } => {
            let tm = open(&registry, &lang)?;
            config::write_json(output.as_deref(), &tm.entries()?)?;
        }

        Commands::Stats { lang } => {
            let tm = open(&registry, &lang)?;
            config::write_json(None, &tm.stats()?)?;
        }

        Commands::Languages => {
            for lang in registry.languages()? {
                println!("{lang}");
            }
        }

        Commands::Supported { lang } => {
            let supported = registry.is_supported(&lang);
            println!("{supported}");
            if !supported {
                std::process::exit(1);
            }
        }

        Commands::Migrate { from, languages } => {
            let report = registry.migrate_legacy(&from, languages.as_deref())?;
            config::write_json(None, &report)?;
            if !report.is_complete() {
                anyhow::bail!(
                    "Some languages could not be moved; check {} and {}",
                    from.display(),
                    registry.database_dir().display()
                );
            }
        }
    }

    Ok(())
}
