use std::path::{Path, PathBuf};

use auth_sea_adapter::schema::{write_entities, DEFAULT_OUTPUT_DIR};
use auth_sea_adapter::{AdapterError, AuthSchema};
use clap::Parser;
use tracing::info;

#[derive(Parser)]
#[command(name = "auth-entity-gen")]
#[command(about = "Generate SeaORM entity modules for the auth schema")]
struct Args {
    /// Directory the entity modules are written to
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    out: PathBuf,

    /// Schema JSON file (`{ "tables": { ... } }`); defaults to the core auth tables
    #[arg(short, long)]
    schema: Option<PathBuf>,

    /// Pluralize table names (`user` becomes `users`)
    #[arg(long)]
    plural: bool,
}

async fn load_schema(path: Option<&Path>, plural: bool) -> Result<AuthSchema, AdapterError> {
    let schema = match path {
        Some(path) => {
            let raw = tokio::fs::read_to_string(path)
                .await
                .map_err(|e| AdapterError::io(path, e))?;
            AuthSchema::from_json_str(&raw)?
        }
        None => AuthSchema::core(),
    };
    Ok(if plural { schema.pluralized() } else { schema })
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .with_env_filter("auth_entity_gen=info,auth_sea_adapter=info")
        .init();

    let args = Args::parse();

    let schema = match load_schema(args.schema.as_deref(), args.plural).await {
        Ok(schema) => schema,
        Err(e) => {
            eprintln!("Failed to load schema: {e}");
            std::process::exit(1);
        }
    };
    info!(tables = schema.tables.len(), out = %args.out.display(), "generating entities");

    let mut stdout = std::io::stdout();
    if let Err(e) = write_entities(&args.out, &schema, &mut stdout).await {
        eprintln!("Entity generation failed: {e}");
        std::process::exit(1);
    }
}
