//! Init command implementation
//!
//! Creates a new document with the root metadata filled in and, optionally, a
//! first measurement location.

use super::shared::{CommandStats, load_configuration, log_completion, setup_logging};
use crate::app::models::{MeasurementLocation, WraDocument};
use crate::app::services::document::save_document;
use crate::cli::args::InitArgs;
use crate::{Error, Result};
use std::time::Instant;
use tracing::{debug, info};

/// Init command runner
pub async fn run_init(args: InitArgs) -> Result<CommandStats> {
    let start_time = Instant::now();

    let config = load_configuration(args.common.config_file.as_deref())?;
    setup_logging(&args.common, &config)?;
    debug!("Init arguments: {:?}", args);

    args.validate()?;

    if args.document.exists() && !args.force {
        return Err(Error::configuration(format!(
            "Document {} already exists (use --force to overwrite)",
            args.document.display()
        )));
    }

    let document = build_document(&args);
    save_document(&args.document, &document).await?;

    if !args.common.quiet {
        println!(
            "Created {} with {} measurement location(s)",
            args.document.display(),
            document.measurement_location.len()
        );
    }
    info!("Initialized document {}", args.document.display());

    let stats = CommandStats {
        documents_processed: 1,
        processing_time: start_time.elapsed(),
        ..Default::default()
    };
    log_completion("init", &stats);
    Ok(stats)
}

fn build_document(args: &InitArgs) -> WraDocument {
    let date = args
        .date
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    let mut document = WraDocument::skeleton(args.author.trim(), args.organisation.trim(), date);
    document.plant_name = args.plant_name.clone();
    document.plant_type = args.plant_type.clone();

    if let (Some(name), Some(latitude), Some(longitude)) =
        (&args.location_name, args.latitude, args.longitude)
    {
        document.measurement_location.push(MeasurementLocation::new(
            name.trim(),
            latitude,
            longitude,
            args.station_type.as_str(),
        ));
    }

    document
}
