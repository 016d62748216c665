//! Integration tests for the import-to-export workflow
//!
//! These tests drive the CLI command runners against real files in a temporary
//! directory: a document is created, a logger CSV is imported, points are edited
//! and the export is attempted before and after the document is complete.

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use wra_station_config::Error;
use wra_station_config::app::models::{Sensor, WraDocument};
use wra_station_config::app::services::csv_import::{
    BuildOptions, PointGrouping, build_points, read_csv_rows, validate_csv_structure,
};
use wra_station_config::app::services::document::{
    ensure_logger, load_document, merge_imported_points, save_document,
};
use wra_station_config::app::services::validation::{SchemaValidator, check_export};
use wra_station_config::cli::args::Args;
use wra_station_config::cli::commands;

const LOGGER_CSV: &str = "\
Station,North Ridge,,,,
Timestamp,WS_80m_Avg,WS_80m_SD,WD_78m,Temp_2m,Pressure_hPa
2024-03-01 00:00:00,7.12,0.81,245,6.4,1002.1
2024-03-01 00:10:00,7.40,0.77,248,6.3,1002.0
2024-03-01 00:20:00,6.95,0.92,251,6.3,1001.9
";

/// Temporary workspace with an empty configuration file
struct Workspace {
    dir: TempDir,
    config: PathBuf,
}

impl Workspace {
    fn new() -> Result<Self> {
        let dir = TempDir::new()?;
        let config = dir.path().join("config.toml");
        std::fs::write(&config, "[logging]\nlevel = \"warn\"\n")?;
        Ok(Self { dir, config })
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn path_str(&self, name: &str) -> String {
        self.path(name).display().to_string()
    }

    /// Run a command with `-q` and the workspace configuration
    async fn run(&self, argv: &[&str]) -> wra_station_config::Result<commands::CommandStats> {
        let config = self.config.display().to_string();
        let mut full = vec!["wra-config"];
        full.extend_from_slice(argv);
        full.extend_from_slice(&["-q", "-c", config.as_str()]);

        let args = Args::try_parse_from(full)
            .map_err(|e| Error::configuration(e.to_string()))?;
        commands::run(args).await
    }
}

async fn create_and_import(workspace: &Workspace) -> Result<PathBuf> {
    let document = workspace.path_str("station.json");
    workspace
        .run(&[
            "init",
            &document,
            "--author",
            "Jane Analyst",
            "--organisation",
            "Example Wind Ltd",
            "--date",
            "2024-03-01",
            "--location-name",
            "North Ridge Mast",
            "--latitude",
            "56.123",
            "--longitude",
            "-3.456",
        ])
        .await
        .context("init failed")?;

    let csv_path = workspace.path("logger.csv");
    std::fs::write(&csv_path, LOGGER_CSV)?;
    let csv_path = csv_path.display().to_string();

    let stats = workspace
        .run(&["import", &document, &csv_path, "--logger", "LOG-1"])
        .await
        .context("import failed")?;
    assert_eq!(stats.points_affected, 5);

    Ok(PathBuf::from(document))
}

/// Fill in what an import cannot infer: the logger manufacturer and a sensor
async fn complete_hardware(path: &Path) -> Result<()> {
    let mut document = load_document(path).await?;
    let location = document.location_mut(0)?;

    location.logger_main_config[0].logger_oem_id = Some("Campbell Scientific".to_string());
    location.measurement_point[0].sensor.push(Sensor {
        oem: Some("Thies Clima".to_string()),
        model: Some("First Class Advanced".to_string()),
        serial_number: Some("S-001".to_string()),
        sensor_type_id: Some("anemometer".to_string()),
        date_from: Some("2024-01-01T00:00:00Z".to_string()),
        ..Default::default()
    });

    save_document(path, &document).await?;
    Ok(())
}

#[tokio::test]
async fn test_import_builds_points_and_stub_logger() -> Result<()> {
    let workspace = Workspace::new()?;
    let path = create_and_import(&workspace).await?;

    let document = load_document(&path).await?;
    let location = &document.measurement_location[0];

    let names: Vec<_> = location
        .measurement_point
        .iter()
        .filter_map(|point| point.name.as_deref())
        .collect();
    assert_eq!(
        names,
        vec!["WS_80m_Avg", "WS_80m_SD", "WD_78m", "Temp_2m", "Pressure_hPa"]
    );

    let direction = &location.measurement_point[2];
    assert_eq!(direction.measurement_type_id.as_deref(), Some("wind_direction"));
    assert_eq!(direction.height_m, Some(78.0));

    let logger = &location.logger_main_config[0];
    assert_eq!(logger.logger_id.as_deref(), Some("LOG-1"));
    assert!(logger.logger_oem_id.is_none());
    Ok(())
}

#[tokio::test]
async fn test_reimport_replaces_points_of_the_same_logger() -> Result<()> {
    let workspace = Workspace::new()?;
    let path = create_and_import(&workspace).await?;
    let document = path.display().to_string();
    let csv_path = workspace.path_str("logger.csv");

    let stats = workspace
        .run(&["import", &document, &csv_path, "--logger", "LOG-1"])
        .await?;
    assert_eq!(stats.points_affected, 5);

    let reloaded = load_document(&path).await?;
    assert_eq!(reloaded.point_count(), 5);
    assert_eq!(reloaded.measurement_location[0].logger_main_config.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_reimport_by_serial_number_replaces_points() -> Result<()> {
    let workspace = Workspace::new()?;
    let path = create_and_import(&workspace).await?;

    let mut document = load_document(&path).await?;
    document.location_mut(0)?.logger_main_config[0].logger_serial_number =
        Some("SN-77".to_string());
    save_document(&path, &document).await?;

    workspace
        .run(&[
            "import",
            &path.display().to_string(),
            &workspace.path_str("logger.csv"),
            "--logger",
            "SN-77",
        ])
        .await?;

    let reloaded = load_document(&path).await?;
    let location = &reloaded.measurement_location[0];
    assert_eq!(reloaded.point_count(), 5);
    assert_eq!(location.logger_main_config.len(), 1);
    assert!(
        location
            .measurement_point
            .iter()
            .all(|point| point.is_owned_by("LOG-1"))
    );
    Ok(())
}

#[tokio::test]
async fn test_structural_error_leaves_document_untouched() -> Result<()> {
    let workspace = Workspace::new()?;
    let path = create_and_import(&workspace).await?;
    let before = std::fs::read_to_string(&path)?;

    let bad_csv = workspace.path("header_only.csv");
    std::fs::write(&bad_csv, "Timestamp,WS_80m_Avg\n")?;

    let result = workspace
        .run(&[
            "import",
            &path.display().to_string(),
            &bad_csv.display().to_string(),
            "--logger",
            "LOG-2",
        ])
        .await;

    assert!(matches!(result, Err(Error::CsvStructure { .. })));
    assert_eq!(std::fs::read_to_string(&path)?, before);
    Ok(())
}

#[tokio::test]
async fn test_export_blocked_until_document_is_complete() -> Result<()> {
    let workspace = Workspace::new()?;
    let path = create_and_import(&workspace).await?;
    let document = path.display().to_string();
    let output = workspace.path_str("iea-task43-data.json");

    let blocked = workspace
        .run(&["export", &document, "--output", &output])
        .await;
    match blocked {
        Err(Error::ExportBlocked {
            required_errors, ..
        }) => assert!(required_errors >= 2),
        other => panic!("expected blocked export, got {:?}", other),
    }
    assert!(!Path::new(&output).exists());

    complete_hardware(&path).await?;
    workspace
        .run(&["export", &document, "--output", &output])
        .await
        .context("export of complete document failed")?;

    let exported: Value = serde_json::from_str(&std::fs::read_to_string(&output)?)?;
    assert_eq!(exported["author"], "Jane Analyst");
    let point = &exported["measurement_location"][0]["measurement_point"][0];
    assert!(point.get("unit").is_none());
    assert!(point.get("statistic_type_id").is_none());
    assert_eq!(
        point["logger_measurement_config"][0]["column_name"][0]["statistic_type_id"],
        "avg"
    );

    // A second export needs --force
    let again = workspace
        .run(&["export", &document, "--output", &output])
        .await;
    assert!(matches!(again, Err(Error::Configuration { .. })));
    workspace
        .run(&["export", &document, "--output", &output, "--force"])
        .await?;
    Ok(())
}

#[tokio::test]
async fn test_edit_then_validate() -> Result<()> {
    let workspace = Workspace::new()?;
    let path = create_and_import(&workspace).await?;
    let document = path.display().to_string();

    let stats = workspace
        .run(&[
            "edit",
            &document,
            "--type",
            "air_pressure",
            "--set-height",
            "1.5",
            "--set-notes",
            "barometer in logger enclosure",
        ])
        .await?;
    assert_eq!(stats.points_affected, 1);

    let edited = load_document(&path).await?;
    let pressure = edited.measurement_location[0]
        .measurement_point
        .iter()
        .find(|point| point.name.as_deref() == Some("Pressure_hPa"))
        .context("pressure point missing")?;
    assert_eq!(pressure.height_m, Some(1.5));

    let failing = workspace.run(&["validate", &document]).await;
    assert!(matches!(failing, Err(Error::DataValidation { .. })));

    complete_hardware(&path).await?;
    let stats = workspace.run(&["validate", &document]).await?;
    assert_eq!(stats.errors_found, 0);
    assert_eq!(stats.documents_processed, 1);
    Ok(())
}

#[tokio::test]
async fn test_grouped_import_through_library() -> Result<()> {
    let rows = read_csv_rows(LOGGER_CSV, None, "logger.csv")?;
    let structure = validate_csv_structure(&rows).into_structure("logger.csv")?;
    assert_eq!(structure.header_row_index, 1);

    let now = chrono::Utc::now();
    let options = BuildOptions::new("LOG-1", now).with_grouping(PointGrouping::ByTypeAndHeight);
    let points = build_points(&structure.headers, structure.timestamp_column, &options);

    // WS_80m_Avg and WS_80m_SD share one point
    assert_eq!(points.len(), 4);
    assert_eq!(points[0].column_names().count(), 2);

    let mut document = WraDocument::skeleton(
        "Jane Analyst",
        "Example Wind Ltd",
        chrono::NaiveDate::from_ymd_opt(2024, 3, 1).context("valid date")?,
    );
    document
        .measurement_location
        .push(wra_station_config::MeasurementLocation::new(
            "North Ridge Mast",
            56.123,
            -3.456,
            "mast",
        ));

    let location = document.location_mut(0)?;
    assert!(ensure_logger(location, "LOG-1", now));
    let summary = merge_imported_points(location, "LOG-1", points);
    assert_eq!(summary.added, 4);

    let report = check_export(&document, &SchemaValidator::builtin()?)?;
    assert!(!report.can_export());
    assert!(
        report
            .required_fields
            .errors
            .iter()
            .any(|issue| issue.path == "measurement_location[0].logger_main_config[0].logger_oem_id")
    );
    Ok(())
}
