use capacity_util::domain::model::CapacityStatus;
use capacity_util::presentation::{console, email, ops};
use capacity_util::{
    Audience, CapacityEngine, CapacityError, CsvSource, LocalStorage, OpsDailyCapacityResult,
    ReportArchive,
};
use chrono::NaiveDate;
use std::path::Path;
use tempfile::TempDir;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn write(dir: &Path, name: &str, content: &str) {
    std::fs::write(dir.join(name), content).unwrap();
}

/// Three active sites on 2026-01-16: NORTH lands exactly on 105%, SOUTH is
/// under, EAST has no benchmark. WEST has capacity but nothing scheduled.
fn write_fixture(dir: &Path) {
    write(
        dir,
        "governance.csv",
        "modality,weight,effective_start,effective_end\n\
         MRI,2.5,2025-01-01,\n\
         CT,1.5,2025-01-01,\n\
         XR,1.0,2025-01-01,\n",
    );
    write(
        dir,
        "capacity_location.csv",
        "location,capacity\nNORTH,100\nSOUTH,200\nWEST,100\n",
    );
    write(
        dir,
        "capacity_modality.csv",
        "location,modality,capacity\nNORTH,MRI,60\nSOUTH,CT,120\n",
    );
    write(
        dir,
        "scheduled.csv",
        "location,modality,volume,service_date,captured_on\n\
         NORTH,MRI,30,2026-01-16,2026-01-15\n\
         NORTH,CT,20,2026-01-16,2026-01-15\n\
         SOUTH,CT,90,2026-01-16,2026-01-15\n\
         SOUTH,XRAY-ER,10,2026-01-16,2026-01-15\n\
         EAST,xr,12,2026-01-16,2026-01-15\n",
    );
    write(
        dir,
        "completed.csv",
        "location,modality,volume,service_date\n\
         NORTH,MRI,28,2026-01-16\n\
         NORTH,CT,20,2026-01-16\n\
         SOUTH,CT,80,2026-01-16\n\
         EAST,XR,12,2026-01-16\n\
         EAST,XR,99,2026-01-15\n",
    );
}

fn engine(
    dir: &TempDir,
) -> CapacityEngine<CsvSource<LocalStorage>, CsvSource<LocalStorage>, CsvSource<LocalStorage>> {
    let storage = LocalStorage::new(dir.path().to_str().unwrap().to_string());
    CapacityEngine::from_source(CsvSource::new(storage))
}

#[tokio::test]
async fn test_daily_report_for_future_dos() {
    let dir = TempDir::new().unwrap();
    write_fixture(dir.path());

    let result = engine(&dir)
        .run_daily(date(2026, 1, 16), date(2026, 1, 15))
        .await
        .unwrap();
    let s = &result.summary;

    assert_eq!(result.snapshot_date, Some(date(2026, 1, 15)));
    assert_eq!(s.report_date, date(2026, 1, 15));
    assert_eq!(s.total_active_sites, 3);
    assert_eq!(s.scheduled_weighted, 252.0);
    assert_eq!(s.capacity, 400.0);
    assert_eq!(s.utilization_pct, 63.0);
    assert_eq!((s.sites_over, s.sites_at, s.sites_under), (0, 1, 2));
    assert_eq!(s.completed_weighted, None);
    assert_eq!(s.execution_delta_weighted, None);

    let names: Vec<&str> = result.locations.iter().map(|l| l.location.as_str()).collect();
    assert_eq!(names, vec!["NORTH", "SOUTH", "EAST"]);
    assert_eq!(result.locations[0].pct_of_capacity, Some(1.05));
    assert_eq!(result.locations[0].status, CapacityStatus::At);
    assert_eq!(result.locations[2].status, CapacityStatus::NoCap);

    assert!(result.unknown_modalities.contains("XRAY-ER"));
    let xray = result
        .modalities
        .iter()
        .find(|m| m.modality == "XRAY-ER")
        .unwrap();
    assert_eq!(xray.weighted_units, 0.0);
}

#[tokio::test]
async fn test_future_dos_does_not_need_completed_data() {
    let dir = TempDir::new().unwrap();
    write_fixture(dir.path());
    std::fs::remove_file(dir.path().join("completed.csv")).unwrap();

    let result = engine(&dir)
        .run_daily(date(2026, 1, 16), date(2026, 1, 15))
        .await;
    assert!(result.is_ok());
}

#[tokio::test]
async fn test_past_dos_measures_execution_delta() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    write_fixture(dir.path());

    let result = engine(&dir)
        .run_daily(date(2026, 1, 16), date(2026, 1, 17))
        .await?;
    let s = &result.summary;

    assert_eq!(s.completed_weighted, Some(232.0));
    assert_eq!(s.completed_utilization_pct, Some(58.0));
    assert_eq!(s.execution_delta_weighted, Some(-20.0));
    assert_eq!(s.execution_delta_pct_points, Some(-5.0));

    let ops = OpsDailyCapacityResult::from_daily(&result);
    let text = ops::render_ops_capacity_text(&ops);
    assert!(text.contains("Completed - Scheduled: -20.00 weighted (-5.0 pts)"));
    Ok(())
}

#[tokio::test]
async fn test_missing_governance_aborts_without_result() {
    let dir = TempDir::new().unwrap();
    write_fixture(dir.path());
    std::fs::remove_file(dir.path().join("governance.csv")).unwrap();

    let err = engine(&dir)
        .run_daily(date(2026, 1, 16), date(2026, 1, 15))
        .await
        .unwrap_err();
    assert!(matches!(err, CapacityError::SourceUnavailable { .. }));
    assert!(err.is_fatal());
}

#[tokio::test]
async fn test_identical_inputs_give_identical_output() {
    let dir = TempDir::new().unwrap();
    write_fixture(dir.path());
    let engine = engine(&dir);

    let first = engine.run_daily(date(2026, 1, 16), date(2026, 1, 17)).await.unwrap();
    let second = engine.run_daily(date(2026, 1, 16), date(2026, 1, 17)).await.unwrap();

    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
    assert_eq!(
        console::render_daily_capacity(&first),
        console::render_daily_capacity(&second)
    );
    assert_eq!(
        email::build_capacity_email(&first, Audience::Scheduling),
        email::build_capacity_email(&second, Audience::Scheduling)
    );
}

#[tokio::test]
async fn test_range_accumulates_days() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    write_fixture(dir.path());

    let range = engine(&dir)
        .run_range(date(2026, 1, 16), date(2026, 1, 17), date(2026, 1, 17))
        .await?;
    let t = &range.totals;

    assert_eq!(t.days, 2);
    assert_eq!(t.site_days, 3);
    assert_eq!(t.capacity, 800.0);
    assert_eq!(t.scheduled_weighted, 252.0);
    assert_eq!(t.utilization_pct, 31.5);
    assert_eq!(t.completed_weighted, Some(232.0));
    assert_eq!(t.execution_delta_weighted, Some(-20.0));
    assert_eq!(t.completed_utilization_pct, Some(29.0));
    assert_eq!(t.execution_delta_pct_points, Some(-2.5));
    assert!(range.unknown_modalities.contains("XRAY-ER"));
    assert_eq!(range.days[1].summary.total_active_sites, 0);

    let text = console::render_range_capacity(&range);
    assert!(text.contains("Completed Util:     29.0%"));
    assert!(text.contains("Execution Delta:    -20.00 weighted (-2.5 pts)"));
    Ok(())
}

#[tokio::test]
async fn test_inverted_window_is_rejected() {
    let dir = TempDir::new().unwrap();
    write_fixture(dir.path());

    let err = engine(&dir)
        .run_range(date(2026, 1, 17), date(2026, 1, 16), date(2026, 1, 17))
        .await
        .unwrap_err();
    assert!(matches!(err, CapacityError::InvalidDateInput { .. }));
}

#[tokio::test]
async fn test_archive_bundles_daily_result() {
    let data = TempDir::new().unwrap();
    write_fixture(data.path());
    let out = TempDir::new().unwrap();

    let result = engine(&data)
        .run_daily(date(2026, 1, 16), date(2026, 1, 17))
        .await
        .unwrap();
    let archive = ReportArchive::new(LocalStorage::new(out.path().to_str().unwrap().to_string()));
    let name = archive.write(&result).await.unwrap();

    let zip_data = std::fs::read(out.path().join(&name)).unwrap();
    let mut zip = zip::ZipArchive::new(std::io::Cursor::new(zip_data)).unwrap();
    assert_eq!(zip.len(), 5);

    let mut report = String::new();
    std::io::Read::read_to_string(&mut zip.by_name("report.txt").unwrap(), &mut report).unwrap();
    assert!(report.contains("Scheduled For:           2026-01-16"));
    assert!(report.contains("WARNING: Unknown modalities"));
}

#[tokio::test]
async fn test_only_latest_capture_of_a_day_is_counted() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "governance.csv",
        "modality,weight,effective_start,effective_end\nMRI,2.0,2025-01-01,\n",
    );
    write(dir.path(), "capacity_location.csv", "location,capacity\nNORTH,100\n");
    write(dir.path(), "capacity_modality.csv", "location,modality,capacity\n");
    write(
        dir.path(),
        "scheduled.csv",
        "location,modality,volume,service_date,captured_on\n\
         NORTH,MRI,40,2026-01-16,2026-01-14\n\
         NORTH,MRI,50,2026-01-16,2026-01-15\n",
    );

    let result = engine(&dir)
        .run_daily(date(2026, 1, 16), date(2026, 1, 15))
        .await
        .unwrap();

    assert_eq!(result.snapshot_date, Some(date(2026, 1, 15)));
    assert_eq!(result.summary.scheduled_weighted, 100.0);
    assert_eq!(result.locations[0].status, CapacityStatus::At);
}
