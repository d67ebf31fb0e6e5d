use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    aivan_cli::run().await
}
