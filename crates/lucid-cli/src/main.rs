use std::{env, process::ExitCode, time::Instant};

use lucid::{ExplainConfig, Explainer, FaultRecord, PatternRedactor, RuntimeVersion, StderrTracer};

const USAGE: &str = "usage: lucid [--version X.Y] [--trace] [--json] [--hide-secrets] <fault.json>";

#[derive(Debug, Default)]
struct Options {
    record_path: Option<String>,
    version: Option<RuntimeVersion>,
    trace: bool,
    json: bool,
    hide_secrets: bool,
}

fn main() -> ExitCode {
    let options = match parse_args(env::args().skip(1)) {
        Ok(options) => options,
        Err(err) => {
            eprintln!("error: {err}\n{USAGE}");
            return ExitCode::FAILURE;
        }
    };
    let Some(path) = options.record_path.as_deref() else {
        eprintln!("{USAGE}");
        return ExitCode::FAILURE;
    };
    let record = match FaultRecord::load(path) {
        Ok(record) => record,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let mut config = ExplainConfig::new();
    if let Some(version) = options.version {
        config = config.with_version(version);
    }
    let mut explainer = Explainer::with_config(config);
    if options.hide_secrets {
        explainer = explainer.with_redactor(PatternRedactor::secrets());
    }

    let start = Instant::now();
    let explanation = if options.trace {
        let mut explainer = explainer.with_tracer(StderrTracer::new());
        record.with_fault(|fault| explainer.explain(fault))
    } else {
        record.with_fault(|fault| explainer.explain(fault))
    };
    let elapsed = start.elapsed();

    if options.json {
        match serde_json::to_string_pretty(&explanation) {
            Ok(json) => println!("{json}"),
            Err(err) => {
                eprintln!("error: {err}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        println!("{}: {}\n", record.kind, record.message);
        println!("{explanation}");
    }
    if options.trace {
        eprintln!("explained as `{}` in {elapsed:?}", explanation.category);
    }
    ExitCode::SUCCESS
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Options, String> {
    let mut options = Options::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        if let Some(flag) = arg.strip_prefix("--") {
            match flag {
                "version" => {
                    let value = args.next().ok_or("--version needs a value")?;
                    options.version = Some(value.parse()?);
                }
                "trace" => options.trace = true,
                "json" => options.json = true,
                "hide-secrets" => options.hide_secrets = true,
                _ => return Err(format!("unknown flag {arg}")),
            }
        } else if options.record_path.is_some() {
            return Err(format!("unexpected argument {arg}"));
        } else {
            options.record_path = Some(arg);
        }
    }
    Ok(options)
}
