mod cli;
mod entry;
mod infra;
mod routes;
mod server;

use identity_intake::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
