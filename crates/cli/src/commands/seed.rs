use crate::commands::{
    build_runtime, load_config, CommandResult, StepFailure, EXIT_CONNECTIVITY, EXIT_DATA,
};
use catalog_db::{connect_with_settings, migrations, CatalogSeedDataset, SeedResult};

pub fn run() -> CommandResult {
    let config = match load_config("seed") {
        Ok(config) => config,
        Err(failure) => return failure,
    };
    let runtime = match build_runtime("seed") {
        Ok(runtime) => runtime,
        Err(failure) => return failure,
    };

    let result = runtime.block_on(async {
        let pool = connect_with_settings(
            &config.database.url,
            config.database.max_connections,
            config.database.timeout_secs,
        )
        .await
        .map_err(|error| ("db_connectivity", error.to_string(), EXIT_CONNECTIVITY))?;

        migrations::run_pending(&pool)
            .await
            .map_err(|error| ("migration", error.to_string(), EXIT_DATA))?;

        let seeded = CatalogSeedDataset::load(&pool)
            .await
            .map_err(|error| ("seed_execution", error.to_string(), EXIT_DATA))?;

        let verification = CatalogSeedDataset::verify(&pool)
            .await
            .map_err(|error| ("seed_verification", error.to_string(), EXIT_DATA))?;

        pool.close().await;

        let missing = verification.missing().collect::<Vec<_>>();
        if missing.is_empty() {
            Ok::<SeedResult, StepFailure>(seeded)
        } else {
            Err(("seed_verification", verification_failure_message(&missing), EXIT_DATA))
        }
    });

    match result {
        Ok(seeded) => CommandResult::success("seed", summary(&seeded)),
        Err((error_class, message, exit_code)) => {
            CommandResult::failure("seed", error_class, message, exit_code)
        }
    }
}

fn summary(seeded: &SeedResult) -> String {
    format!(
        "catalog fixture loaded: {} categories, {} products, {} variants",
        seeded.categories_seeded, seeded.products_seeded, seeded.variants_seeded
    )
}

fn verification_failure_message(missing: &[&str]) -> String {
    format!("seed verification failed for checks: {}", missing.join(", "))
}
