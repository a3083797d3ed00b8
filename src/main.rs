use gemledger_api::cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    cli::run_with_sys_args().await
}
