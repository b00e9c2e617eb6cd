use application::api::router::MainRouter;
use config::Config;
use domain::person::PersonManager;
use dotenv::dotenv;
use infrastructure::{
    database::{self, Backend},
    person::sql::SqlPersonRepository,
};
use tokio::runtime::Runtime;

mod application;
mod config;
mod domain;
mod infrastructure;
mod logging;

fn main() {
    dotenv().ok();
    // Check of env variables before starting the app.
    let config = Config::from_env().expect("Invalid configuration");
    logging::init_logging(&config.log_level);
    let backend = Backend::from_url(&config.database_url)
        .expect("DATABASE_URL must be a postgres:// or sqlite: url");

    let rt = Runtime::new().expect("Cannot start the tokio runtime");
    rt.block_on(async {
        let pool = database::connect(
            &config.database_url,
            config.database_timeout,
            config.database_max_connections,
        )
        .await
        .expect("Cannot connect to the DB");
        let person_repository = SqlPersonRepository::new(pool, backend)
            .await
            .expect("Cannot prepare the person table");
        let person_manager = PersonManager::new(Box::new(person_repository));
        let main_router = MainRouter::new(person_manager, config.bind_address);
        if let Err(e) = main_router.run().await {
            tracing::error!(error = ?e, "server stopped");
        }
    })
}
