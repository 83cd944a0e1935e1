use tokio::io::{stdin, stdout, BufReader};
use tracing::{error, info};
use lms::catalog::controller::ShellController;
use lms::catalog::factory::create_catalog_service;
use lms::core::domain::Configuration;
use lms::core::library::LibraryResult;
use lms::utils::logs::setup_tracing;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let config = Configuration::from_env();
    if let Err(err) = setup_tracing(&config.log_file) {
        eprintln!("logging disabled: {}", err);
    }
    info!("Program started");

    if let Err(err) = run(&config).await {
        error!("Unexpected error: {}", err);
        println!("Some error happened, please check log file.");
    }
}

async fn run(config: &Configuration) -> LibraryResult<()> {
    let catalog_service = create_catalog_service(config).await;
    let mut shell = ShellController::new(catalog_service, BufReader::new(stdin()), stdout());
    shell.run().await
}
