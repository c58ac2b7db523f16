use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ddl2dbt::util::split_name_list;
use ddl2dbt::{convert_file, ConvertOptions, ModelKind, OutputFormat, DEFAULT_SCHEMA_VERSION};

#[derive(Parser)]
#[command(name = "ddl2dbt")]
#[command(author, about = "Convert a SQL Server CREATE TABLE script into a dbt schema.yml")]
struct Cli {
    /// Enable debug diagnostics on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Dimension model with business/surrogate keys and unknown members
    Dim {
        #[command(flatten)]
        common: CommonArgs,

        /// Comma-separated business key columns, replacing the inferred key
        #[arg(long)]
        business_key: Option<String>,

        /// Surrogate key column, replacing the inferred key
        #[arg(long)]
        surrogate_key: Option<String>,
    },
    /// Staging model with a primary key and a schema version
    Stage {
        #[command(flatten)]
        common: CommonArgs,

        /// Comma-separated primary key columns, used when the DDL declares none
        #[arg(long = "pk", visible_alias = "primary-key")]
        primary_key: Option<String>,

        /// Value of the top-level `version` key
        #[arg(long, default_value_t = DEFAULT_SCHEMA_VERSION)]
        version: f64,
    },
}

#[derive(Args)]
struct CommonArgs {
    /// Path to the .sql file holding the CREATE TABLE statement
    sql_file: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Yaml)]
    format: OutputFormat,

    /// Write the document here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Only apply ALTER TABLE ... DEFAULT statements that target the parsed table
    #[arg(long)]
    scope_defaults: bool,
}

impl CommonArgs {
    fn into_options(self, kind: ModelKind) -> ConvertOptions {
        let mut options = ConvertOptions::new(self.sql_file, kind);
        options.output_path = self.output;
        options.format = self.format;
        options.scope_defaults = self.scope_defaults;
        options
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(1)
        }
    }
}

fn run(command: Commands) -> Result<()> {
    let options = match command {
        Commands::Dim {
            common,
            business_key,
            surrogate_key,
        } => {
            let mut options = common.into_options(ModelKind::Dimension);
            options.business_key = business_key.as_deref().map(split_name_list).unwrap_or_default();
            options.surrogate_key = surrogate_key;
            options
        }
        Commands::Stage {
            common,
            primary_key,
            version,
        } => {
            let mut options = common.into_options(ModelKind::Staging);
            options.primary_key = primary_key.as_deref().map(split_name_list).unwrap_or_default();
            options.version = version;
            options
        }
    };

    if let Some(rendered) = convert_file(&options)? {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(rendered.as_bytes())?;
        stdout.flush()?;
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "ddl2dbt=debug" } else { "ddl2dbt=warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
