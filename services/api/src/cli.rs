use crate::entry::{run_submit, run_validate, SubmitArgs, ValidateArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use identity_intake::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Identity Intake",
    about = "Validate applicant identity forms and forward them for evaluation",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Check a form submission against the field rules without sending it
    Validate(ValidateArgs),
    /// Validate a form submission, then post it to a running intake service
    Submit(SubmitArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Validate(args) => run_validate(args),
        Command::Submit(args) => run_submit(args).await,
    }
}
