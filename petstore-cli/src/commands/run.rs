use colored::Colorize;
use petstore_harness::config::HarnessConfig;
use petstore_harness::fixtures::generate_default_pet;
use petstore_harness::observability::TracingConfig;
use petstore_harness::scenario::run_lifecycle;
use petstore_harness::service::PetStoreService;
use petstore_harness::transport::TrafficLevel;

/// Flags of `petstore run`. Unset values fall back to the environment.
#[derive(Debug, Default)]
pub struct RunOptions {
    pub base_url: Option<String>,
    pub traffic: Option<TrafficLevel>,
    pub id: Option<i64>,
    pub json_logs: bool,
}

/// Runs the lifecycle scenario once and prints a step summary.
pub fn execute(options: RunOptions) -> Result<(), String> {
    let config = resolve_config(options.base_url, options.traffic, options.json_logs)?;
    TracingConfig::from_harness(&config).init();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("Failed to start runtime: {}", e))?;

    let mut pet = generate_default_pet();
    if let Some(id) = options.id {
        pet = pet.with_id(id);
    }

    println!();
    println!("  {} {}", "→".cyan(), config.base_url.bold());
    println!();

    let service = PetStoreService::connect(&config);
    match runtime.block_on(run_lifecycle(&service, pet)) {
        Ok(report) => {
            for step in &report.steps {
                println!(
                    "  {} {} {}",
                    "✓".green(),
                    step.name,
                    format!("({}ms)", step.elapsed.as_millis()).dimmed()
                );
            }
            println!();
            println!(
                "  {} lifecycle passed for pet {} in {}ms",
                "✓".green().bold(),
                report.pet.id.unwrap_or_default(),
                report.total().as_millis()
            );
            println!();
            Ok(())
        }
        Err(failure) => {
            for step in &failure.completed {
                println!("  {} {}", "✓".green(), step.name);
            }
            println!("  {} {}", "✗".red(), failure.step);
            println!();
            Err(failure.error.to_string())
        }
    }
}

fn resolve_config(
    base_url: Option<String>,
    traffic: Option<TrafficLevel>,
    json_logs: bool,
) -> Result<HarnessConfig, String> {
    let mut config = HarnessConfig::from_env().map_err(|e| e.to_string())?;
    if let Some(base_url) = base_url {
        config = config.base_url(base_url);
    }
    if let Some(traffic) = traffic {
        config = config.traffic(traffic);
    }
    if json_logs {
        config = config.json_logs(true);
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_environment() {
        let config = resolve_config(
            Some("http://127.0.0.1:8080/v2/".to_string()),
            Some(TrafficLevel::Headers),
            true,
        )
        .unwrap();

        assert_eq!(config.base_url, "http://127.0.0.1:8080/v2");
        assert_eq!(config.traffic, TrafficLevel::Headers);
        assert!(config.json_logs);
    }
}
