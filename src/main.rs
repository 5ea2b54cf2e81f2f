//! Purpose: `solmsg` CLI entry point and command dispatch.
//! Role: Binary crate root; parses args, runs commands, emits JSON on stdout.
//! Invariants: Non-interactive errors are emitted as a JSON envelope on stderr.
//! Invariants: Process exit code is derived from `api::to_exit_code`.
//! Invariants: All message assembly goes through the `api` template catalog.
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};

use clap::{CommandFactory, Parser, Subcommand, ValueHint, error::ErrorKind as ClapErrorKind};
use clap_complete::aot::Shell;
use serde_json::{Value, json};
use tracing_subscriber::EnvFilter;

use solmsg::api::{
    Error, ErrorKind, ExecutionContext, Outputs, REQUEST_TEMPLATES, RESPONSE_TEMPLATES,
    flatten_property_map, request_template, response_template, to_exit_code,
};

#[derive(Copy, Clone, Debug)]
struct RunOutcome {
    exit_code: i32,
}

impl RunOutcome {
    fn ok() -> Self {
        Self { exit_code: 0 }
    }

    fn with_code(exit_code: i32) -> Self {
        Self { exit_code }
    }
}

fn main() {
    init_tracing();
    let exit_code = match run() {
        Ok(outcome) => outcome.exit_code,
        Err(err) => {
            emit_error(&err);
            to_exit_code(err.kind())
        }
    };
    std::process::exit(exit_code);
}

fn run() -> Result<RunOutcome, Error> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => match err.kind() {
            ClapErrorKind::DisplayHelp
            | ClapErrorKind::DisplayVersion
            | ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                err.print().map_err(|io_err| {
                    Error::new(ErrorKind::Io)
                        .with_message("failed to write help")
                        .with_source(io_err)
                })?;
                let exit_code = if matches!(
                    err.kind(),
                    ClapErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
                ) {
                    2
                } else {
                    0
                };
                return Ok(RunOutcome::with_code(exit_code));
            }
            _ => {
                return Err(Error::new(ErrorKind::Usage)
                    .with_message(err.to_string())
                    .with_hint("Run `solmsg --help` for usage."));
            }
        },
    };

    dispatch_command(cli.command)
}

#[derive(Parser)]
#[command(
    name = "solmsg",
    version,
    about = "Build and flatten ETSI SOL003/SOL005 lifecycle message bodies",
    long_about = None,
    after_help = r#"EXAMPLES
  $ solmsg build CreateNsRequest --prop nsdId=nsd-1 --prop nsName=edge
  $ solmsg build InstantiateVnfRequest --props-file props.json --pretty
  $ curl -s $VNFM/vnf_instances/42 | solmsg flatten --template VnfInstance
  $ solmsg templates"#,
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    #[command(
        about = "Build an outbound request body from flat properties",
        after_help = r#"Properties are text; `true`/`false` and plain numbers are coerced.
Dotted names (`additionalParams.x`, `extVirtualLinks.0.vimId`) nest."#
    )]
    Build {
        #[arg(help = "Request template name (see `solmsg templates`)")]
        template: String,
        #[arg(
            long = "prop",
            value_name = "KEY=VALUE",
            help = "One context property; repeatable"
        )]
        props: Vec<String>,
        #[arg(
            long,
            value_name = "FILE",
            value_hint = ValueHint::FilePath,
            help = "Properties from a file: `key=value` lines or a JSON object"
        )]
        props_file: Option<PathBuf>,
        #[arg(long, help = "Pretty-print the body instead of one compact line")]
        pretty: bool,
    },
    #[command(
        about = "Flatten an inbound response body into dotted properties",
        after_help = "Reads FILE, or stdin when no file is given."
    )]
    Flatten {
        #[arg(value_hint = ValueHint::FilePath, help = "Response JSON file (default: stdin)")]
        file: Option<PathBuf>,
        #[arg(
            long,
            value_name = "NAME",
            help = "Response template to apply (adds the instance-id output)"
        )]
        template: Option<String>,
        #[arg(long, help = "Pretty-print the outputs object")]
        pretty: bool,
    },
    #[command(about = "List the request and response template catalog")]
    Templates,
    #[command(about = "Generate shell completions")]
    Completion {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn dispatch_command(command: Command) -> Result<RunOutcome, Error> {
    match command {
        Command::Build {
            template,
            props,
            props_file,
            pretty,
        } => {
            let context = load_context(&props, props_file.as_deref())?;
            let template = request_template(&template)?;
            let body = template.build(&context)?;
            print_json_text(&body, pretty)?;
            Ok(RunOutcome::ok())
        }
        Command::Flatten {
            file,
            template,
            pretty,
        } => {
            let text = read_input(file.as_deref())?;
            let outputs = match template {
                Some(name) => {
                    let template = response_template(&name)?;
                    let mut outputs = Outputs::new();
                    template.parse(&text, &mut outputs)?;
                    Value::Object(outputs.into_json_object())
                }
                None => {
                    let tree: Value = serde_json::from_str(&text).map_err(|err| {
                        Error::new(ErrorKind::Json)
                            .with_message("input is not valid JSON")
                            .with_source(err)
                    })?;
                    Value::Object(flatten_property_map(&tree).into_iter().collect())
                }
            };
            emit_value(&outputs, pretty)?;
            Ok(RunOutcome::ok())
        }
        Command::Templates => {
            let requests: Vec<Value> = REQUEST_TEMPLATES
                .iter()
                .map(|template| {
                    json!({
                        "name": template.name,
                        "spec": template.spec,
                        "copyFields": template
                            .copy_fields
                            .iter()
                            .map(|copy| {
                                if copy.from == copy.to {
                                    json!(copy.from)
                                } else {
                                    json!({"from": copy.from, "to": copy.to})
                                }
                            })
                            .collect::<Vec<Value>>(),
                        "collectPrefixes": template.collect_prefixes,
                    })
                })
                .collect();
            let responses: Vec<Value> = RESPONSE_TEMPLATES
                .iter()
                .map(|template| {
                    json!({
                        "name": template.name,
                        "spec": template.spec,
                        "idOutput": template.id_output,
                    })
                })
                .collect();
            emit_value(&json!({"requests": requests, "responses": responses}), false)?;
            Ok(RunOutcome::ok())
        }
        Command::Completion { shell } => {
            let mut cmd = Cli::command();
            clap_complete::aot::generate(shell, &mut cmd, "solmsg", &mut io::stdout());
            Ok(RunOutcome::ok())
        }
    }
}

fn load_context(props: &[String], props_file: Option<&Path>) -> Result<ExecutionContext, Error> {
    let mut context = match props_file {
        Some(path) => context_from_file(path)?,
        None => ExecutionContext::new(),
    };

    // --prop wins over the file on duplicate keys.
    for prop in props {
        let Some((key, value)) = prop.split_once('=') else {
            return Err(Error::new(ErrorKind::Usage)
                .with_message(format!("invalid property: {prop}"))
                .with_hint("Use --prop key=value."));
        };
        if key.is_empty() {
            return Err(Error::new(ErrorKind::Usage)
                .with_message(format!("invalid property: {prop}"))
                .with_hint("Property keys must not be empty."));
        }
        context.set(key, value);
    }
    Ok(context)
}

fn context_from_file(path: &Path) -> Result<ExecutionContext, Error> {
    let text = std::fs::read_to_string(path).map_err(|err| {
        Error::new(ErrorKind::Io)
            .with_message(format!("failed to read {}", path.display()))
            .with_source(err)
    })?;

    if text.trim_start().starts_with('{') {
        let value: Value = serde_json::from_str(&text).map_err(|err| {
            Error::new(ErrorKind::Json)
                .with_message(format!("{} is not valid JSON", path.display()))
                .with_source(err)
        })?;
        return ExecutionContext::from_json_object(&value);
    }

    let mut context = ExecutionContext::new();
    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            return Err(Error::new(ErrorKind::Usage)
                .with_message(format!(
                    "{}:{}: expected key=value",
                    path.display(),
                    line_no + 1
                ))
                .with_hint("Property files are `key=value` lines or one JSON object."));
        };
        context.set(key.trim(), value.trim());
    }
    Ok(context)
}

fn read_input(file: Option<&Path>) -> Result<String, Error> {
    match file {
        Some(path) => std::fs::read_to_string(path).map_err(|err| {
            Error::new(ErrorKind::Io)
                .with_message(format!("failed to read {}", path.display()))
                .with_source(err)
        }),
        None => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text).map_err(|err| {
                Error::new(ErrorKind::Io)
                    .with_message("failed to read stdin")
                    .with_source(err)
            })?;
            Ok(text)
        }
    }
}

fn print_json_text(body: &str, pretty: bool) -> Result<(), Error> {
    if pretty {
        let value: Value = serde_json::from_str(body)?;
        emit_value(&value, true)
    } else {
        println!("{body}");
        Ok(())
    }
}

fn emit_value(value: &Value, pretty: bool) -> Result<(), Error> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{text}");
    Ok(())
}

fn emit_error(err: &Error) {
    if io::stderr().is_terminal() {
        eprintln!("error: {err}");
        if let Some(hint) = err.hint() {
            eprintln!("hint: {hint}");
        }
        return;
    }

    let mut envelope = serde_json::Map::new();
    envelope.insert("kind".to_string(), json!(format!("{:?}", err.kind())));
    envelope.insert("message".to_string(), json!(err.to_string()));
    if let Some(path) = err.property_path() {
        envelope.insert("path".to_string(), json!(path));
    }
    if let Some(hint) = err.hint() {
        envelope.insert("hint".to_string(), json!(hint));
    }
    let value = json!({"error": envelope});
    let text = serde_json::to_string(&value).unwrap_or_else(|_| {
        "{\"error\":{\"kind\":\"Internal\",\"message\":\"json encode failed\"}}".to_string()
    });
    eprintln!("{text}");
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}
