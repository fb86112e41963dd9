use clap::Parser;
use meli_pricer::utils::error::ErrorSeverity;
use meli_pricer::utils::{logger, validation::Validate};
use meli_pricer::{CancellationToken, CliConfig, PriceResolver};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting meli-pricer for {} product(s)", cli.product_ids.len());
    tracing::debug!("Product ids: {:?}", cli.product_ids);

    let config = match cli.validate().and_then(|_| cli.resolver_config()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(exit_code(ErrorSeverity::Critical));
        }
    };

    let resolver = match PriceResolver::from_config(&config) {
        Ok(resolver) => resolver,
        Err(e) => {
            tracing::error!("❌ Failed to build HTTP client: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(exit_code(ErrorSeverity::Critical));
        }
    };

    let cancel = CancellationToken::new();
    let on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("🛑 Interrupted, cancelling in-flight resolutions");
            on_ctrl_c.cancel();
        }
    });

    let results = resolver.resolve_many(&cancel, &cli.product_ids).await;

    let mut worst: Option<ErrorSeverity> = None;
    for (product_id, result) in &results {
        match result {
            Ok(price) if cli.json => {
                let line = serde_json::json!({"product_id": product_id, "result": price});
                println!("{}", line);
            }
            Ok(price) => {
                println!(
                    "✅ {}: {:.2} ({}) {}",
                    product_id, price.price, price.listing_id, price.permalink
                );
            }
            Err(e) => {
                if cli.json {
                    let line = serde_json::json!({
                        "product_id": product_id,
                        "error": e.to_string(),
                        "kind": format!("{:?}", e.kind()),
                        "stage": e.stage.to_string(),
                    });
                    println!("{}", line);
                } else {
                    eprintln!("❌ {}", e);
                }
                worst = worst.max(Some(e.severity()));
            }
        }
    }

    if let Some(severity) = worst {
        let code = exit_code(severity);
        if code > 0 {
            std::process::exit(code);
        }
    }

    Ok(())
}

fn exit_code(severity: ErrorSeverity) -> i32 {
    match severity {
        ErrorSeverity::Low => 0,      // no active listing is a valid answer
        ErrorSeverity::Medium => 2,   // transport trouble, worth re-running
        ErrorSeverity::High => 1,     // data problem
        ErrorSeverity::Critical => 3, // configuration problem
    }
}
