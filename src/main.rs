use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    smart_leads_lib::run().await
}
