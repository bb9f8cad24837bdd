mod common;

use std::collections::BTreeSet;
use std::sync::Arc;

use hifitime::Duration;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use common::{occultation, shared, GridInstrument};
use rocolloc::{
    collocation_confusion, Collocation, CollocationList, ConfusionMatrix, NadirSatelliteInstrument,
    OccList, RefineParams, SortMethod,
};

fn candidate(
    instrument: &Arc<dyn NadirSatelliteInstrument>,
    occid: &str,
    scan_angle: f64,
) -> Collocation {
    Collocation::builder(
        OccList::new(vec![occultation(occid, 10.0, -5.0, "2023-01-01-00-00")]),
        instrument.clone(),
    )
    .scan_angle(scan_angle)
    .build()
    .unwrap()
}

fn list(
    instrument: &Arc<dyn NadirSatelliteInstrument>,
    occids: &[String],
    marker: f64,
) -> CollocationList {
    occids.iter().map(|id| candidate(instrument, id, marker)).collect()
}

fn occid(i: usize) -> String {
    format!("occ-{i:03}")
}

#[test]
fn test_union_and_intersection_keep_first_list() {
    let (_, instrument) = shared(GridInstrument::track(4, 3));
    let a = list(&instrument, &["c".into(), "a".into(), "b".into()], 1.0);
    let b = list(&instrument, &["d".into(), "b".into()], 2.0);

    let union = a.union(&b).unwrap();
    assert_eq!(union.occids(), vec!["a", "b", "c", "d"]);
    assert_eq!(union.get(1).unwrap().scan_angle(), Some(1.0));
    assert_eq!(union.get(3).unwrap().scan_angle(), Some(2.0));

    let intersection = a.intersection(&b).unwrap();
    assert_eq!(intersection.occids(), vec!["b"]);
    assert_eq!(intersection.get(0).unwrap().scan_angle(), Some(1.0));

    let reversed = b.intersection(&a).unwrap();
    assert_eq!(reversed.get(0).unwrap().scan_angle(), Some(2.0));
}

#[test]
fn test_set_algebra_rejects_empty_lists() {
    let (_, instrument) = shared(GridInstrument::track(4, 3));
    let a = list(&instrument, &["a".into()], 1.0);
    let empty = CollocationList::default();

    assert_eq!(a.union(&empty).unwrap_err().kind(), "InvalidArgument");
    assert_eq!(empty.intersection(&a).unwrap_err().kind(), "InvalidArgument");
}

#[test]
fn test_set_algebra_identities_on_random_lists() {
    let (_, instrument) = shared(GridInstrument::track(4, 3));
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..25 {
        let pick = |rng: &mut StdRng| -> Vec<String> {
            let mut ids: Vec<String> =
                (0..30).filter(|_| rng.random_bool(0.4)).map(occid).collect();
            if ids.is_empty() {
                ids.push(occid(0));
            }
            ids
        };
        let a = list(&instrument, &pick(&mut rng), 1.0);
        let b = list(&instrument, &pick(&mut rng), 2.0);

        let union = a.union(&b).unwrap();
        let intersection = a.intersection(&b).unwrap();
        assert_eq!(union.len(), a.len() + b.len() - intersection.len());

        let ids = |l: &CollocationList| -> Vec<String> {
            l.occids().into_iter().map(String::from).collect()
        };
        assert_eq!(ids(&union), ids(&b.union(&a).unwrap()));
        assert_eq!(ids(&intersection), ids(&b.intersection(&a).unwrap()));

        let sorted: BTreeSet<String> = ids(&union).into_iter().collect();
        assert_eq!(sorted.into_iter().collect::<Vec<_>>(), ids(&union));
        assert!(intersection.iter().all(|c| c.scan_angle() == Some(1.0)));
    }
}

#[test]
fn test_set_algebra_rejects_repeated_identifiers() {
    let (_, instrument) = shared(GridInstrument::track(4, 3));
    let occultations = OccList::new(
        ["a", "b", "c"]
            .iter()
            .map(|id| occultation(id, 0.0, 0.0, "2023-01-01-00-00"))
            .collect(),
    );
    let repeated = list(&instrument, &["a".into(), "a".into()], 1.0);
    let other = list(&instrument, &["b".into()], 2.0);

    assert_eq!(repeated.union(&other).unwrap_err().kind(), "InvalidArgument");
    assert_eq!(other.union(&repeated).unwrap_err().kind(), "InvalidArgument");
    assert_eq!(repeated.intersection(&other).unwrap_err().kind(), "InvalidArgument");
    assert_eq!(
        collocation_confusion(&occultations, &repeated, &other)
            .unwrap_err()
            .kind(),
        "InvalidArgument"
    );
}

#[test]
fn test_confusion_matrix_scenario() {
    let (_, instrument) = shared(GridInstrument::track(4, 3));
    let occultations = OccList::new(
        (0..100)
            .map(|i| occultation(&occid(i), 0.0, 0.0, "2023-01-01-00-00"))
            .collect(),
    );
    let brute: Vec<String> = (0..10).map(occid).collect();
    let rotation: Vec<String> = (2..11).map(occid).collect();

    let cm = collocation_confusion(
        &occultations,
        &list(&instrument, &brute, 0.0),
        &list(&instrument, &rotation, 0.0),
    )
    .unwrap();

    assert_eq!(
        cm,
        ConfusionMatrix {
            true_positive: 8,
            false_negative: 2,
            false_positive: 1,
            true_negative: 89,
        }
    );
    assert_eq!(cm.true_positive + cm.false_negative, brute.len());
    assert_eq!(cm.true_positive + cm.false_positive, rotation.len());
    assert_eq!(cm.total(), occultations.len());
}

#[test]
fn test_confusion_matrix_rejects_too_few_occultations() {
    let (_, instrument) = shared(GridInstrument::track(4, 3));
    let occultations = OccList::new(vec![occultation("a", 0.0, 0.0, "2023-01-01-00-00")]);
    let brute = list(&instrument, &["a".into(), "b".into()], 0.0);
    let rotation = list(&instrument, &["c".into()], 0.0);

    assert_eq!(
        collocation_confusion(&occultations, &brute, &rotation)
            .unwrap_err()
            .kind(),
        "InvalidArgument"
    );
}

#[test]
fn test_sort_methods() {
    let (grid, instrument) = shared(GridInstrument::track(4, 3));
    let make = |id: &str, datetime: &str, time: Option<usize>| {
        let builder = Collocation::builder(
            OccList::new(vec![occultation(id, 0.0, 0.0, datetime)]),
            instrument.clone(),
        );
        let builder = match time {
            Some(i) => builder.time(grid.mid_time(i)),
            None => builder,
        };
        builder.build().unwrap()
    };

    let mut collocations = CollocationList::new(vec![
        make("b", "2023-01-01-00-10", Some(2)),
        make("c", "2023-01-01-00-05", Some(0)),
        make("a", "2023-01-01-00-20", Some(1)),
    ]);

    collocations.sort(SortMethod::OccId).unwrap();
    assert_eq!(collocations.occids(), vec!["a", "b", "c"]);

    collocations.sort(SortMethod::OccTime).unwrap();
    assert_eq!(collocations.occids(), vec!["c", "b", "a"]);

    collocations.sort(SortMethod::SounderTime).unwrap();
    assert_eq!(collocations.occids(), vec!["c", "a", "b"]);

    collocations.push(make("d", "2023-01-01-00-00", None));
    let err = collocations.sort(SortMethod::SounderTime).unwrap_err();
    assert_eq!(err.kind(), "MissingData");
    assert_eq!(collocations.occids(), vec!["c", "a", "b", "d"]);
}

#[test]
fn test_refine_all_reports_each_candidate() {
    let (grid, instrument) = shared(GridInstrument::track(40, 10));

    let mut collocations: CollocationList = (0..6)
        .map(|k| {
            let iscan = 5 + 5 * k;
            let (lon, lat) = grid.location(iscan, k);
            let builder = Collocation::builder(
                OccList::new(vec![occultation(&occid(k), lon, lat, "2023-01-01-00-00")]),
                instrument.clone(),
            )
            .time(grid.mid_time(iscan) + Duration::from_seconds(1.0));
            // The last candidate cannot be refined
            let builder = if k < 5 { builder.scan_angle(0.0) } else { builder };
            builder.build().unwrap()
        })
        .collect();

    let results = collocations.refine_all(&RefineParams::default());

    assert_eq!(results.len(), 6);
    assert!(results[..5].iter().all(Result::is_ok));
    assert_eq!(results[5].as_ref().unwrap_err().kind(), "MissingData");

    for (k, c) in collocations.iter().enumerate().take(5) {
        let meta = c.scan_metadata().unwrap();
        assert_eq!(meta.mid_time(c.iscan().unwrap()), grid.mid_time(5 + 5 * k));
        assert_eq!(c.ifootprint(), Some(k));
    }
    assert_eq!(collocations.get(5).unwrap().iscan(), None);
}
