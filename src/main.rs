#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! # umm-verify
//!
//! Verifies that a compiled Java project matches the API of an instructor's
//! reference jar, reporting the first thing that does not match.

use std::{path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use bpaf::*;
use dotenvy::dotenv;
use tracing::{Level, metadata::LevelFilter};
use tracing_subscriber::{fmt, prelude::*, util::SubscriberInitExt};
use umm_verify::{
    ReferenceSource, Verification, VerificationResult, VerifyConfig,
    constants::INTERNAL_ERROR_EXIT_CODE,
    java::loader::load_path,
    verify::{ExclusionFilter, report},
};

/// Arguments for `check`.
#[derive(Debug, Clone)]
struct CheckArgs {
    /// Reference jar path, folder or URL.
    reference: Option<String>,
    /// Directory of compiled classes.
    classes:   Option<PathBuf>,
    /// Exclusion annotation.
    marker:    Option<String>,
    /// Print JSON instead of text.
    json:      bool,
}

/// Top-level CLI commands.
#[derive(Debug, Clone)]
enum Cmd {
    /// Verify a project against a reference
    Check(CheckArgs),
    /// Print the surface of a jar or class directory
    Inspect {
        /// Jar file or class directory.
        path:   PathBuf,
        /// Exclusion annotation used to flag members.
        marker: Option<String>,
        /// Print JSON instead of a table.
        json:   bool,
    },
}

/// Parse the command line arguments and return the verbosity plus command
fn options() -> (bool, Cmd) {
    /// parses the exclusion marker
    fn m() -> impl Parser<Option<String>> {
        long("marker")
            .help("Annotation that excludes reference classes and methods")
            .argument::<String>("NAME")
            .optional()
    }

    /// parses the json switch
    fn j() -> impl Parser<bool> {
        long("json").help("Print machine-readable JSON").switch()
    }

    let check = {
        let reference = long("reference")
            .short('r')
            .help("Reference jar: a file, a folder containing one, or a URL")
            .argument::<String>("SRC")
            .optional();
        let classes = long("classes")
            .short('c')
            .help("Directory of compiled classes (defaults to ./target)")
            .argument::<PathBuf>("DIR")
            .optional();
        let marker = m();
        let json = j();
        construct!(CheckArgs {
            reference,
            classes,
            marker,
            json,
        })
    }
    .map(Cmd::Check)
    .to_options()
    .command("check")
    .help("Verify compiled classes against a reference jar");

    let inspect = {
        let path = positional::<PathBuf>("PATH").help("Jar file or class directory");
        let marker = m();
        let json = j();
        construct!(Cmd::Inspect { path, marker, json })
    }
    .to_options()
    .command("inspect")
    .help("Print the classes and methods found in a jar or class directory");

    let verbose = short('v')
        .long("verbose")
        .help("Show debug logging")
        .switch();
    let cmd = construct!([check, inspect]);

    construct!(verbose, cmd)
        .to_options()
        .descr("Structural API verification for Java submissions")
        .run()
}

/// Resolves the reference, then runs the verifier off the async runtime.
async fn check(args: CheckArgs) -> Result<ExitCode> {
    let config = VerifyConfig::from_env().with_overrides(args.reference, args.classes, args.marker);

    let reference = match config.reference() {
        Some(value) => {
            let source = ReferenceSource::parse(value);
            tracing::debug!("Fetching reference artifact from {source}");
            source.fetch(config.fetch_timeout()).await?
        }
        None => None,
    };

    let verification = Verification::builder()
        .reference(reference)
        .candidate_root(config.candidate_root())
        .marker(config.marker().clone())
        .build();

    let result = tokio::task::spawn_blocking(move || verification.run())
        .await
        .context("Verification task panicked")?
        .context("Verification could not be completed")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", report::render_result(&result));
    }

    Ok(match result {
        VerificationResult::Fail(_) => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    })
}

/// Loads and prints a surface.
fn inspect(path: PathBuf, marker: Option<String>, json: bool) -> Result<()> {
    let config = VerifyConfig::from_env().with_overrides(None, None, marker);
    let mut classes =
        load_path(&path).with_context(|| format!("Could not inspect {}", path.display()))?;
    ExclusionFilter::new(config.marker().clone()).mark(&mut classes);

    if json {
        println!("{}", serde_json::to_string_pretty(&classes)?);
    } else {
        println!("{}", report::surface_table(&path.display().to_string(), &classes));
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();

    let (verbose, cmd) = options();

    let fmt = fmt::layer()
        .without_time()
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr);
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::registry()
        .with(fmt)
        .with(LevelFilter::from_level(level))
        .init();

    let outcome = match cmd {
        Cmd::Check(args) => check(args).await,
        Cmd::Inspect { path, marker, json } => {
            inspect(path, marker, json).map(|_| ExitCode::SUCCESS)
        }
    };

    match outcome {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{e:?}");
            ExitCode::from(INTERNAL_ERROR_EXIT_CODE)
        }
    }
}
