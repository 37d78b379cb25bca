use clap::{Parser, Subcommand, ValueEnum};
use form_host::{
    FormController, SchemaTransport, SubmissionTransport, SubmitOutcome, TransportError,
};
use form_spec::{
    Link, MapperOptions, MemoryRenderTarget, MemoryWidget, WidgetBank, build_form_plan,
    document_from_value, extract, raw_extract, render_json_plan, render_text_plan, validate_all,
};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Schema-driven form toolkit",
    long_about = "Resolves JSON schemas into form plans, validates form data, and exercises the full submit pipeline from the command line"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum RenderMode {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve a schema into its ordered widget plan.
    Plan {
        /// Path to the schema JSON.
        #[arg(long, value_name = "SCHEMA")]
        schema: PathBuf,
        /// Output format for the plan.
        #[arg(long, value_enum, default_value_t = RenderMode::Text)]
        format: RenderMode,
    },
    /// Validate a data object against a schema.
    Validate {
        /// Path to the schema JSON.
        #[arg(long, value_name = "SCHEMA")]
        schema: PathBuf,
        /// Path to the data JSON file.
        #[arg(long, value_name = "DATA")]
        data: PathBuf,
    },
    /// Coerce raw widget values into structured form data.
    Extract {
        /// Path to the schema JSON.
        #[arg(long, value_name = "SCHEMA")]
        schema: PathBuf,
        /// JSON object mapping field names to raw widget values.
        #[arg(long, value_name = "VALUES")]
        values: PathBuf,
        /// Emit the raw snapshot instead of submission data.
        #[arg(long)]
        raw: bool,
    },
    /// Run the full pipeline: load, bind, validate, and dry-run submit.
    Submit {
        /// Path to the schema JSON.
        #[arg(long, value_name = "SCHEMA")]
        schema: PathBuf,
        /// Path to the data JSON file.
        #[arg(long, value_name = "DATA")]
        data: PathBuf,
        /// Link rel to submit through (defaults to the schema's action link).
        #[arg(long, value_name = "REL")]
        rel: Option<String>,
    },
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Plan { schema, format } => run_plan(schema, format),
        Command::Validate { schema, data } => run_validate(schema, data),
        Command::Extract {
            schema,
            values,
            raw,
        } => run_extract(schema, values, raw),
        Command::Submit { schema, data, rel } => run_submit(schema, data, rel),
    }
}

fn read_json(path: &Path) -> CliResult<Value> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

fn run_plan(schema_path: PathBuf, format: RenderMode) -> CliResult<()> {
    let schema = document_from_value(read_json(&schema_path)?)?;
    let plan = build_form_plan(&schema, &MapperOptions::default())?;
    match format {
        RenderMode::Text => println!("{}", render_text_plan(&plan)),
        RenderMode::Json => println!("{}", serde_json::to_string_pretty(&render_json_plan(&plan))?),
    }
    Ok(())
}

fn run_validate(schema_path: PathBuf, data_path: PathBuf) -> CliResult<()> {
    let schema = document_from_value(read_json(&schema_path)?)?;
    let data = read_json(&data_path)?;

    let outcome = validate_all(&schema, &data);
    println!(
        "Validation result: {}",
        if outcome.valid { "valid" } else { "invalid" }
    );
    if !outcome.errors.is_empty() {
        println!("Errors:");
        for (field, message) in &outcome.errors {
            println!("  {} - {}", field, message);
        }
    }

    if outcome.valid {
        Ok(())
    } else {
        Err("validation failed".into())
    }
}

/// Builds an in-memory widget per value: booleans land on the checked state,
/// structured values attach verbatim, everything else binds as display text.
fn widget_from_value(value: &Value) -> MemoryWidget {
    let mut widget = MemoryWidget::default();
    match value {
        Value::Bool(flag) => widget.checked = *flag,
        Value::Array(_) | Value::Object(_) => widget.attached = Some(value.clone()),
        Value::String(text) => widget.value = text.clone(),
        Value::Number(num) => widget.value = num.to_string(),
        Value::Null => {}
    }
    widget
}

fn run_extract(schema_path: PathBuf, values_path: PathBuf, raw: bool) -> CliResult<()> {
    let schema = document_from_value(read_json(&schema_path)?)?;
    let values = read_json(&values_path)?;
    let Some(entries) = values.as_object() else {
        return Err("values file must contain a JSON object".into());
    };

    let mut bank = WidgetBank::new();
    for (name, value) in entries {
        bank.insert(name.clone(), Box::new(widget_from_value(value)));
    }

    let data = if raw {
        raw_extract(&schema, &bank)?
    } else {
        extract(&schema, &bank, &Map::new())?
    };
    println!("{}", serde_json::to_string_pretty(&Value::Object(data))?);
    Ok(())
}

/// Resolves schema URLs as local file paths.
struct FileTransport;

impl SchemaTransport for FileTransport {
    fn fetch_schema(&self, url: &str) -> Result<Value, TransportError> {
        let contents =
            fs::read_to_string(url).map_err(|err| TransportError::failed(url, err.to_string()))?;
        serde_json::from_str(&contents).map_err(|err| TransportError::failed(url, err.to_string()))
    }
}

/// Announces the delivery instead of performing it, echoing the payload back.
struct DryRunTransport;

impl SubmissionTransport for DryRunTransport {
    fn submit(&self, link: &Link, payload: &Value) -> Result<Value, TransportError> {
        println!(
            "{} {} ({})",
            link.resolved_method(),
            link.href,
            link.resolved_enctype()
        );
        Ok(payload.clone())
    }
}

fn run_submit(schema_path: PathBuf, data_path: PathBuf, rel: Option<String>) -> CliResult<()> {
    let data = read_json(&data_path)?;
    let Value::Object(data) = data else {
        return Err("data file must contain a JSON object".into());
    };

    let mut controller = FormController::new(
        Box::new(FileTransport),
        Box::new(DryRunTransport),
        Box::new(MemoryRenderTarget::default()),
    );
    let schema_url = schema_path.to_string_lossy().into_owned();
    controller.load_from(&schema_url)?;
    controller.set_value(&data)?;

    match controller.submit(rel.as_deref())? {
        SubmitOutcome::Completed { body } => {
            println!("Delivered payload:");
            println!("{}", serde_json::to_string_pretty(&body)?);
            Ok(())
        }
        SubmitOutcome::ChainedSchema => {
            println!("Response chained into a follow-up schema.");
            Ok(())
        }
        SubmitOutcome::Blocked => {
            println!("Validation result: invalid");
            println!("Errors:");
            for (field, message) in controller.errors() {
                println!("  {} - {}", field, message);
            }
            Err("validation failed".into())
        }
        SubmitOutcome::Cancelled => Err("submission cancelled".into()),
    }
}
