//! bokigrade CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "bokigrade", version, about = "Bookkeeping exam grading")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Grade a submission against an exam
    Grade {
        /// Path to the exam .toml file
        #[arg(long)]
        exam: PathBuf,

        /// Path to the submitted answers .json file
        #[arg(long)]
        answers: PathBuf,

        /// Score required to pass, out of 100
        #[arg(long, default_value_t = bokigrade_core::report::DEFAULT_PASS_MARK)]
        pass_mark: u32,

        /// Write the grade report as JSON to this path
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Validate exam definition TOML files
    Validate {
        /// Path to an exam file or directory
        #[arg(long)]
        exam: PathBuf,
    },

    /// List exams in a catalog directory
    List {
        /// Directory of exam .toml files
        #[arg(long)]
        exams: PathBuf,
    },

    /// Create a starter exam and answers template
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("bokigrade_core=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Grade {
            exam,
            answers,
            pass_mark,
            output,
            format,
        } => commands::grade::execute(exam, answers, pass_mark, output, format),
        Commands::Validate { exam } => commands::validate::execute(exam),
        Commands::List { exams } => commands::list::execute(exams),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
