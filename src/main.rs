use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match baobrew::cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("❌ {:#}", e);
            ExitCode::FAILURE
        }
    }
}
