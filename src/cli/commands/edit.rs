//! Edit command implementation
//!
//! Applies one bulk edit, or a removal, to the selected measurement points of a
//! location and saves the document.

use super::shared::{CommandStats, load_configuration, log_completion, setup_logging};
use crate::app::services::document::{apply_bulk_edit, load_document, remove_points, save_document};
use crate::cli::args::EditArgs;
use crate::Result;
use std::time::Instant;
use tracing::{debug, warn};

/// Edit command runner
pub async fn run_edit(args: EditArgs) -> Result<CommandStats> {
    let start_time = Instant::now();

    let config = load_configuration(args.common.config_file.as_deref())?;
    setup_logging(&args.common, &config)?;
    debug!("Edit arguments: {:?}", args);

    args.validate()?;

    let mut document = load_document(&args.document).await?;
    let selector = args.selector();
    let location = document.location_mut(args.location)?;

    let affected = if args.remove {
        remove_points(location, &selector)
    } else {
        apply_bulk_edit(location, &selector, &args.bulk_edit())?
    };

    if affected == 0 {
        warn!("No measurement points matched the selection; document left unchanged");
    } else {
        save_document(&args.document, &document).await?;
    }

    if !args.common.quiet {
        let action = if args.remove { "Removed" } else { "Updated" };
        println!(
            "{} {} point(s) in {}",
            action,
            affected,
            args.document.display()
        );
    }

    let stats = CommandStats {
        documents_processed: 1,
        points_affected: affected,
        processing_time: start_time.elapsed(),
        ..Default::default()
    };
    log_completion("edit", &stats);
    Ok(stats)
}
