use anyhow::{anyhow, Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use clap::{Parser, Subcommand};
use conductor_base::codec::UseWireCodec;
use conductor_base::config::ValidationConfig;
use proto::{enum_name, EnumKind, TaskDef, TaskDefField};
use strum::IntoEnumIterator;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Encode a JSON task definition (file path or inline json) to base64 wire bytes.
    Encode {
        #[arg(long, short)]
        input: String,
    },
    /// Decode base64 wire bytes to a JSON task definition.
    Decode {
        #[arg(long, short)]
        payload: String,
    },
    /// Check a JSON task definition against the registration rules.
    Validate {
        #[arg(long, short)]
        input: String,
        /// Skip the response timeout rules.
        #[arg(long)]
        lenient: bool,
    },
    /// Print the name of an enum value (timeout-policy, retry-logic).
    EnumName {
        #[arg(long, short)]
        kind: EnumKind,
        #[arg(long, short, allow_hyphen_values = true)]
        value: i32,
    },
    /// Print every TaskDef field with its default value.
    Defaults,
}

// args.input: filepath or json string
fn load_task_def(input: &str) -> Result<TaskDef> {
    let json = match std::fs::read_to_string(input) {
        Ok(content) => content,
        Err(_) => input.to_string(),
    };
    TaskDef::from_json_str(&json).context("cannot parse task definition json")
}

pub fn run(
    command: &Command,
    codec: &impl UseWireCodec,
    validation: &ValidationConfig,
) -> Result<String> {
    match command {
        Command::Encode { input } => {
            let def = load_task_def(input)?;
            let bytes = codec.serialize_message(&def);
            tracing::debug!("encoded TaskDef '{}' ({} bytes)", def.name, bytes.len());
            Ok(STANDARD.encode(bytes))
        }
        Command::Decode { payload } => {
            let bytes = STANDARD
                .decode(payload.trim())
                .context("payload is not valid base64")?;
            let def: TaskDef = codec.deserialize_message(&bytes)?;
            if !def.unknown_fields.is_empty() {
                tracing::warn!(
                    "payload carries fields unknown to this schema: {:?} (not shown in json)",
                    def.unknown_fields.numbers()
                );
            }
            Ok(serde_json::to_string_pretty(&def)?)
        }
        Command::Validate { input, lenient } => {
            let def = load_task_def(input)?;
            let config = if *lenient {
                ValidationConfig::lenient()
            } else {
                validation.clone()
            };
            let violations = def.violations(&config);
            if violations.is_empty() {
                Ok(format!("TaskDef '{}' is valid", def.name))
            } else {
                tracing::warn!("rejected TaskDef '{}'", def.name);
                Err(anyhow!(
                    "TaskDef '{}' is invalid:\n  {}",
                    def.name,
                    violations.join("\n  ")
                ))
            }
        }
        Command::EnumName { kind, value } => Ok(enum_name(*kind, *value).into_owned()),
        Command::Defaults => Ok(TaskDefField::iter()
            .map(|f| format!("{} ({}): {}", f, f.number(), f.default_value()))
            .collect::<Vec<_>>()
            .join("\n")),
    }
}
