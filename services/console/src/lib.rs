mod cli;
mod infra;
mod render;

use partner_review::error::AppError;

pub async fn run() -> Result<(), AppError> {
    cli::run().await
}
