mod common;

use camino::Utf8PathBuf;
use hifitime::Duration;
use serde_json::Value;

use common::{occultation, shared, GridInstrument, MemoryArchive, SyntheticReader};
use rocolloc::constants::{ARCHIVE_FILE_TYPE, FILL_VALUE};
use rocolloc::{
    brute_force, ArchiveOptions, BruteForceParams, CollocationArchive, CollocationList, OccList,
    ProcessingCenter,
};

fn matched() -> CollocationList {
    let (_, instrument) = shared(GridInstrument::track(40, 10));
    let occs = OccList::new(vec![
        occultation("ar-2", -5.0, 5.0, "2023-01-01-00-04"),
        occultation("ar-1", -7.0, -2.5, "2023-01-01-00-02"),
    ]);
    let params = BruteForceParams::builder()
        .time_tolerance(Duration::from_seconds(20.0))
        .spatial_tolerance(50.0e3)
        .build()
        .unwrap();
    brute_force(instrument, &occs, &params).unwrap()
}

fn options() -> ArchiveOptions {
    ArchiveOptions {
        author: Some("RO validation team".into()),
        time_tolerance: Some(Duration::from_seconds(20.0)),
    }
}

#[test]
fn test_archive_groups() {
    let mut collocations = matched();
    let ro = MemoryArchive::complete(ProcessingCenter::Ucar, &["ar-1", "ar-2"]);

    let archive = CollocationArchive::assemble(
        &mut collocations,
        &ro,
        &SyntheticReader,
        ProcessingCenter::Ucar,
        &options(),
    )
    .unwrap();

    assert_eq!(archive.len(), 2);
    assert_eq!(archive.file_type, ARCHIVE_FILE_TYPE);
    assert!(archive.creation_time.ends_with('Z'));
    assert_eq!(archive.time_tolerance_seconds, Some(20.0));

    let group = archive.group("ar-1+NOAA-20-ATMS").unwrap();
    assert_eq!(group.status, "assembled");
    assert_eq!(group.time, "2023-01-01T00:02:00");
    assert!(group.occultation.get("level2a_bendingAngle").is_some());
    assert!(group.sounder.get("brightness_temperature").is_some());

    // The candidates keep their assembled data
    assert!(collocations.iter().all(|c| c.data().is_some()));
}

#[test]
fn test_archive_json_layout() {
    let mut collocations = matched();
    let ro = MemoryArchive::complete(ProcessingCenter::Ucar, &["ar-1", "ar-2"]);
    let archive = CollocationArchive::assemble(
        &mut collocations,
        &ro,
        &SyntheticReader,
        ProcessingCenter::Ucar,
        &options(),
    )
    .unwrap();

    let mut buffer = Vec::new();
    archive.write_to(&mut buffer).unwrap();
    let json: Value = serde_json::from_slice(&buffer).unwrap();

    assert_eq!(json["file_type"], ARCHIVE_FILE_TYPE);
    assert_eq!(json["author"], "RO validation team");
    let group = &json["groups"][0];
    assert_eq!(group["name"], "ar-2+NOAA-20-ATMS");

    let variables = group["occultation"]["variables"].as_array().unwrap();
    let bending = variables
        .iter()
        .find(|v| v["name"] == "level2a_bendingAngle")
        .unwrap();
    assert_eq!(bending["units"], "radians");
    assert_eq!(bending["_FillValue"], FILL_VALUE);
    assert_eq!(bending["values"][2], FILL_VALUE);
    assert_eq!(group["occultation"]["attributes"]["receiver"], "cosmic2e3");

    let radius = variables
        .iter()
        .find(|v| v["name"] == "level2a_radiusOfCurvature")
        .unwrap();
    assert_eq!(radius["values"], 6.371e6);
    assert!(radius.get("dimension").is_none());
}

#[test]
fn test_archive_write_file() {
    let mut collocations = matched();
    let ro = MemoryArchive::complete(ProcessingCenter::Ucar, &["ar-1", "ar-2"]);
    let archive = CollocationArchive::assemble(
        &mut collocations,
        &ro,
        &SyntheticReader,
        ProcessingCenter::Ucar,
        &ArchiveOptions::default(),
    )
    .unwrap();

    let path = Utf8PathBuf::from_path_buf(std::env::temp_dir())
        .unwrap()
        .join(format!("rocolloc-archive-{}.json", std::process::id()));
    archive.write_file(&path).unwrap();

    let json: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["groups"].as_array().unwrap().len(), 2);
    assert!(json.get("author").is_none());
    std::fs::remove_file(&path).unwrap();

    let missing_dir = path.join("missing").join("archive.json");
    assert_eq!(archive.write_file(&missing_dir).unwrap_err().kind(), "IoError");
}

#[test]
fn test_archive_errors() {
    let ro = MemoryArchive::complete(ProcessingCenter::Ucar, &["ar-1"]);

    let err = CollocationArchive::assemble(
        &mut CollocationList::default(),
        &ro,
        &SyntheticReader,
        ProcessingCenter::Ucar,
        &options(),
    )
    .unwrap_err();
    assert_eq!(err.kind(), "InvalidArgument");

    // ar-2 has no retrieval
    let err = CollocationArchive::assemble(
        &mut matched(),
        &ro,
        &SyntheticReader,
        ProcessingCenter::Ucar,
        &options(),
    )
    .unwrap_err();
    assert_eq!(err.kind(), "InvalidOccultation");
}
