//! `conforma` — compliance document analysis over a JSON corpus.
//!
//! The corpus file is a JSON array of `DocumentRecord`s, the shape the web
//! layer stores. Reports are computed on demand against the built-in ISO
//! 9001:2015 / ISO 27001:2022 catalogs.

mod display;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand, ValueEnum};

use conforma_core::{DocumentRecord, Standard};
use conforma_ingest::{TextOnlyExtractor, classify_sections, parse_document};
use conforma_match::{DuplicateDetector, MissingDocumentFinder, RelationshipMatcher};
use conforma_store::{DocumentStore, InMemoryCatalog, InMemoryStore, RequirementCatalog};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StandardArg {
    Iso9001,
    Iso27001,
}

impl From<StandardArg> for Standard {
    fn from(arg: StandardArg) -> Self {
        match arg {
            StandardArg::Iso9001 => Standard::Iso9001_2015,
            StandardArg::Iso27001 => Standard::Iso27001_2022,
        }
    }
}

#[derive(Parser)]
#[command(name = "conforma", version, about = "Compliance document analysis")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a text document, extract its sections, and propose clause
    /// mappings.
    Classify {
        #[arg(long)]
        file: PathBuf,
        #[arg(long, value_enum)]
        standard: StandardArg,
    },
    /// Report which required documents an organization is missing.
    Missing {
        #[arg(long)]
        corpus: PathBuf,
        #[arg(long)]
        org: String,
        #[arg(long, value_enum)]
        standard: Option<StandardArg>,
    },
    /// Group likely duplicate documents within an organization.
    Duplicates {
        #[arg(long)]
        corpus: PathBuf,
        #[arg(long)]
        org: String,
    },
    /// Check whether one catalog requirement is fulfilled, with the
    /// match-type explanation.
    Match {
        #[arg(long)]
        corpus: PathBuf,
        #[arg(long)]
        org: String,
        #[arg(long)]
        requirement: String,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    tracing::info!("conforma v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    match cli.command {
        Command::Classify { file, standard } => classify(&file, standard.into()),
        Command::Missing {
            corpus,
            org,
            standard,
        } => missing(&corpus, &org, standard.map(Into::into)),
        Command::Duplicates { corpus, org } => duplicates(&corpus, &org),
        Command::Match {
            corpus,
            org,
            requirement,
        } => check_requirement(&corpus, &org, &requirement),
    }
}

fn classify(file: &PathBuf, standard: Standard) -> anyhow::Result<()> {
    let bytes = fs::read(file).with_context(|| format!("reading {}", file.display()))?;
    let filename = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let parsed = parse_document(&bytes, "text/plain", &filename, &TextOnlyExtractor)?;
    let catalog = InMemoryCatalog::seeded();
    let proposals = classify_sections(&parsed, standard, &catalog);
    display::classification(&filename, standard, &parsed, &proposals);
    Ok(())
}

fn missing(corpus: &PathBuf, org: &str, standard: Option<Standard>) -> anyhow::Result<()> {
    let store = load_corpus(corpus)?;
    let catalog = InMemoryCatalog::seeded();
    let report = MissingDocumentFinder::new(&store, &catalog).find_missing(org, standard);
    display::missing(org, standard, &report);
    Ok(())
}

fn duplicates(corpus: &PathBuf, org: &str) -> anyhow::Result<()> {
    let store = load_corpus(corpus)?;
    let report = DuplicateDetector::new(&store).detect(org)?;
    display::duplicates(org, &report);
    Ok(())
}

fn check_requirement(corpus: &PathBuf, org: &str, requirement_id: &str) -> anyhow::Result<()> {
    let store = load_corpus(corpus)?;
    let catalog = InMemoryCatalog::seeded();
    let Some(requirement) = catalog
        .all()
        .into_iter()
        .find(|r| r.id == requirement_id)
    else {
        bail!("unknown requirement id: {requirement_id}");
    };

    let result = RelationshipMatcher::with_catalog(&store, &catalog)
        .check_requirement_fulfillment(&requirement, org)?;
    display::fulfillment(org, &requirement, &result);
    Ok(())
}

fn load_corpus(path: &PathBuf) -> anyhow::Result<InMemoryStore> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let documents: Vec<DocumentRecord> =
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))?;

    let store = InMemoryStore::new();
    for document in documents {
        store
            .create(document)
            .with_context(|| format!("loading corpus {}", path.display()))?;
    }
    Ok(store)
}
