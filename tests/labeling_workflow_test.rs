//! End-to-end labeling workflows against real CSV files.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use vessel_labelkit::{persist, selection, store, Color, LabelingConfig, LabelingSession};

fn write_csv(dir: &Path, rows: usize, labels: impl Fn(usize) -> Option<&'static str>) -> PathBuf {
    let with_labels = (0..rows).any(|i| labels(i).is_some());
    let mut csv = String::from("cfr,datetime,latitude,longitude,sog,heading,port");
    if with_labels {
        csv.push_str(",label");
    }
    csv.push('\n');
    for i in 0..rows {
        let (h, m, s) = (i / 3600, (i / 60) % 60, i % 60);
        csv.push_str(&format!(
            "NOR123,2024-05-01 {:02}:{:02}:{:02},{:.4},{:.4},{:.1},{},Bergen",
            h,
            m,
            s,
            60.0 + i as f64 * 0.001,
            5.0 + i as f64 * 0.002,
            (i % 12) as f64,
            (i * 7) % 360
        ));
        if with_labels {
            csv.push(',');
            csv.push_str(labels(i).unwrap_or(""));
        }
        csv.push('\n');
    }
    let path = dir.join("NOR123.csv");
    fs::write(&path, csv).unwrap();
    path
}

#[test]
fn thousand_points_labeled_window_gives_ten_percent() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(dir.path(), 1000, |_| None);

    let mut session = LabelingSession::new(LabelingConfig::default()).unwrap();
    session.open(&path).unwrap();
    let window = session.selection().unwrap();
    assert_eq!((window.start(), window.end()), (0, 999));

    session.select(Some(100), Some(199)).unwrap();
    session.label("Searching").unwrap();

    let trajectory = session.trajectory().unwrap();
    let searching = trajectory
        .points()
        .iter()
        .filter(|p| p.label.as_deref() == Some("Searching"))
        .count();
    let unset = trajectory.points().iter().filter(|p| p.label.is_none()).count();
    assert_eq!(searching, 100);
    assert_eq!(unset, 900);
    assert_eq!(session.coverage().unwrap().labeled_percentage, 10.0);
}

#[test]
fn saving_keeps_labels_from_earlier_sessions() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(dir.path(), 200, |i| (i < 50).then_some("In port"));

    let mut session = LabelingSession::new(LabelingConfig::default()).unwrap();
    session.open(&path).unwrap();
    session.select(Some(50), Some(99)).unwrap();
    session.label_segment("Searching").unwrap();

    let config = LabelingConfig::default();
    let reloaded = store::load(&path, &config).unwrap();
    for (i, p) in reloaded.points().iter().enumerate() {
        let expected = match i {
            0..=49 => Some("In port"),
            50..=99 => Some("Searching"),
            _ => None,
        };
        assert_eq!(p.label.as_deref(), expected, "row {}", i);
    }
    // untouched columns survive the round trip
    assert_eq!(
        reloaded.frame().column("port").unwrap().str().unwrap().get(150),
        Some("Bergen")
    );
}

#[test]
fn labels_written_by_someone_else_are_not_clobbered() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(dir.path(), 100, |_| None);
    let config = LabelingConfig::default();

    // both analysts load the same unlabeled file
    let mut first = LabelingSession::new(config.clone()).unwrap();
    let mut second = LabelingSession::new(config.clone()).unwrap();
    first.open(&path).unwrap();
    second.open(&path).unwrap();

    first.select(Some(0), Some(9)).unwrap();
    first.label_segment("In port").unwrap();

    second.select(Some(90), Some(99)).unwrap();
    second.label_segment("In transit to port").unwrap();

    // the second save picked up the first analyst's rows
    let stats = second.coverage().unwrap();
    assert_eq!(stats.labeled_rows, 20);
    assert_eq!(stats.by_label["In port"], 10);
    assert_eq!(stats.by_label["In transit to port"], 10);

    let on_disk = store::coverage(&store::load(&path, &config).unwrap());
    assert_eq!(on_disk, stats);
}

#[test]
fn merge_is_stable_against_the_written_file() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(dir.path(), 30, |i| (i % 3 == 0).then_some("Unknown"));
    let config = LabelingConfig::default();

    let trajectory = store::load(&path, &config).unwrap();
    let range = selection::select(&trajectory, Some(10), Some(20), config.default_window).unwrap();
    let category = "GNS - Set gillnets (anchored)".try_into().unwrap();
    let labeled = vessel_labelkit::editor::apply(&trajectory, range, &category).unwrap();

    let current = labeled.to_frame().unwrap();
    let written = persist::save(&labeled).unwrap();
    let again = persist::merge(&current, Some(&written)).unwrap();
    assert!(again.equals_missing(&written));
}

#[test]
fn view_follows_the_selection_and_labels() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(dir.path(), 40, |_| None);

    let mut session = LabelingSession::new(LabelingConfig::default()).unwrap();
    session.open(&path).unwrap();
    session.select(Some(10), Some(14)).unwrap();
    session.label("Searching").unwrap();
    session.select(Some(8), Some(16)).unwrap();

    let vm = session.view().unwrap();
    assert_eq!(vm.table.first().unwrap().index, 8);
    assert_eq!(vm.table.last().unwrap().index, 16);
    assert_eq!(vm.markers.len(), 9);

    let green: Vec<(usize, usize)> = vm
        .segments
        .iter()
        .filter(|s| s.color == Color::Green)
        .map(|s| (s.from_index, s.to_index))
        .collect();
    assert_eq!(green, vec![(10, 11), (11, 12), (12, 13), (13, 14)]);

    let timeline_green: Vec<(usize, usize)> = vm
        .timeline
        .segments
        .iter()
        .filter(|s| s.color == Color::Green)
        .map(|s| (s.from_index, s.to_index))
        .collect();
    assert_eq!(timeline_green, green);

    let sw = vm.bounds.south_west();
    let ne = vm.bounds.north_east();
    assert!((sw[0] - 60.008).abs() < 1e-9);
    assert!((ne[0] - 60.016).abs() < 1e-9);
    // stopped at rows 12 and 24 -> black markers
    assert_eq!(vm.markers[4].index, 12);
    assert_eq!(vm.markers[4].color, Color::Black);
}

#[test]
fn unreadable_selection_and_label_errors_are_reported() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(dir.path(), 10, |_| None);
    let mut session = LabelingSession::new(LabelingConfig::default()).unwrap();

    assert!(session.open(&dir.path().join("missing.csv")).is_err());
    session.open(&path).unwrap();

    let err = session.select(Some(7), Some(2)).unwrap_err();
    assert!(err.is_recoverable());
    let err = session.label("").unwrap_err();
    assert!(err.is_recoverable());
    assert_eq!(session.coverage().unwrap().labeled_rows, 0);
}
