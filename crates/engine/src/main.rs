//! Grimoire Engine - command-line entry point.

use std::path::PathBuf;

use anyhow::{bail, Context};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use grimoire_domain::{CharacterId, CharacterLevel, CompletionStatus, LevelGate, Subclass};
use grimoire_engine::app::catalog_source;
use grimoire_engine::infrastructure::config::EngineConfig;
use grimoire_engine::infrastructure::importers::CatalogImporter;
use grimoire_engine::App;
use grimoire_shared::SelectionDocument;

const USAGE: &str = "\
Usage: grimoire-engine <command>

Commands:
  list                                     List the subclasses in the catalog
  report <subclass> [level] [selections]   Completion report for a selection file
  migrate                                  Print the catalog with explicit options
  help                                     Show this message

Environment:
  GRIMOIRE_CATALOG_PATH      Catalog JSON file (default: embedded catalog)
  GRIMOIRE_STRICT_CATALOG    Abort on malformed subclasses (default: false)
  GRIMOIRE_CHARACTER_LEVEL   Level used when none is given (default: 1)
  RUST_LOG                   Log filter (default: grimoire_engine=info)";

/// A parsed command line.
#[derive(Debug)]
enum Command {
    List,
    Report {
        subclass: String,
        level: CharacterLevel,
        selections: Option<PathBuf>,
    },
    Migrate,
    Help,
}

impl Command {
    fn parse(args: &[String], default_level: CharacterLevel) -> anyhow::Result<Self> {
        let Some((command, rest)) = args.split_first() else {
            return Ok(Self::Help);
        };

        match command.as_str() {
            "list" => Ok(Self::List),
            "migrate" => Ok(Self::Migrate),
            "help" | "--help" | "-h" => Ok(Self::Help),
            "report" => {
                let Some(subclass) = rest.first() else {
                    bail!("report needs a subclass name\n\n{}", USAGE);
                };
                let level = match rest.get(1) {
                    Some(raw) => raw
                        .parse()
                        .with_context(|| format!("invalid character level '{}'", raw))?,
                    None => default_level,
                };
                Ok(Self::Report {
                    subclass: subclass.clone(),
                    level,
                    selections: rest.get(2).map(PathBuf::from),
                })
            }
            other => bail!("unknown command '{}'\n\n{}", other, USAGE),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root, then the working directory.
    load_dotenv_from_repo_root();

    // Initialize logging (stderr, so reports stay pipeable)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "grimoire_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = EngineConfig::from_env();
    let args: Vec<String> = std::env::args().skip(1).collect();

    match Command::parse(&args, config.default_level)? {
        Command::Help => println!("{}", USAGE),
        Command::List => {
            let app = App::load(config).await?;
            print_catalog(&app);
        }
        Command::Migrate => {
            let source = catalog_source(&config);
            let catalog = CatalogImporter::new()
                .with_strict(config.strict_catalog)
                .import(source.as_ref())
                .await?;
            let subclasses: Vec<&Subclass> = catalog.subclasses().map(|s| s.as_ref()).collect();
            let migrated = serde_json::json!({ "subclasses": subclasses });
            println!("{}", serde_json::to_string_pretty(&migrated)?);
        }
        Command::Report {
            subclass,
            level,
            selections,
        } => {
            let app = App::load(config).await?;
            report(&app, &subclass, level, selections).await?;
        }
    }

    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
    let _ = dotenvy::dotenv();
}

fn print_catalog(app: &App) {
    for subclass in app.catalog.subclasses() {
        let levels: Vec<String> = subclass.level_numbers().map(|l| l.to_string()).collect();
        println!("{:<20} levels {}", subclass.name(), levels.join(", "));
    }
    for refused in app.catalog.refused() {
        println!("{:<20} REFUSED: {}", refused.name, refused.reason);
    }
}

async fn report(
    app: &App,
    subclass: &str,
    level: CharacterLevel,
    selections: Option<PathBuf>,
) -> anyhow::Result<()> {
    let uc = &app.use_cases.progression;
    let character = CharacterId::new();
    uc.select_subclass(character, subclass)?;

    if let Some(path) = selections {
        let text = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;
        let loaded = SelectionDocument::from_json(&text)?;

        if let Some(stored) = loaded.document.subclass.as_deref() {
            if stored != subclass {
                tracing::warn!(
                    stored,
                    requested = subclass,
                    "Selection file belongs to another subclass; evaluating it anyway"
                );
            }
        }
        for unrecognized in &loaded.unrecognized_levels {
            tracing::warn!(level = unrecognized, "Selection has an unrecognized shape");
        }

        let document = SelectionDocument {
            subclass: Some(subclass.to_string()),
            ..loaded.document
        };
        uc.load_document(character, document)?;
    }

    let gate = uc.level_gate(subclass, level.value())?;
    let status = uc.status(character, level.value())?;
    print_report(subclass, &gate, &status);
    Ok(())
}

fn print_report(subclass: &str, gate: &LevelGate, status: &CompletionStatus) {
    println!("{} at character level {}", subclass, status.character_level);
    println!("  available levels: {}", join_levels(&gate.available));
    println!("  locked levels:    {}", join_levels(&gate.locked));
    if let Some(next) = gate.next_unlock() {
        println!("  next unlock:      level {}", next);
    }
    println!(
        "  choices:          {}/{} complete",
        status.completed(),
        status.total
    );

    for (level, missing) in &status.missing_by_level {
        println!(
            "  level {:>2} missing ({:?}): {}",
            level,
            missing.reason,
            missing.choices.join(" | ")
        );
    }
    for unmet in &status.unmet_prerequisites {
        println!(
            "  note: '{}' at level {} expects '{}' from an earlier level",
            unmet.choice, unmet.level, unmet.requirement
        );
    }

    if status.is_complete {
        println!("  status: complete");
    } else {
        println!("  status: incomplete");
    }
}

fn join_levels(levels: &[u8]) -> String {
    if levels.is_empty() {
        return "-".to_string();
    }
    levels
        .iter()
        .map(|l| l.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
