use credal_core::{
    CombinationMethod, CredalError, DecisionRule, FusionCfg, IncompatiblePolicy,
};
use credal_ensemble::*;

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn smoothing_rule_matches_counts() {
    let builder = SmoothedCountBuilder::default();
    assert_eq!(builder.smoothing, DEFAULT_SMOOTHING);

    let p = builder.build(&[3.0, 1.0, 0.0]).unwrap();
    assert_eq!(p.lower(), &[0.375, 0.125, 0.0]);
    assert_eq!(p.upper(), &[0.875, 0.625, 0.5]);
    assert!(p.is_proper());
}

#[test]
fn adapter_rejects_bad_input() {
    let builder = SmoothedCountBuilder::default();
    assert_eq!(
        builder.build(&[1.0, -2.0]).unwrap_err(),
        EnsembleError::InvalidCount { class: 1, value: -2.0 }
    );
    assert_eq!(
        builder.build(&[]).unwrap_err(),
        EnsembleError::Core(CredalError::Shape { expected: 1, actual: 0 })
    );
    assert_eq!(
        SmoothedCountBuilder::new(0.0).unwrap_err(),
        EnsembleError::InvalidSmoothing(0.0)
    );

    let unchecked = SmoothedCountBuilder { smoothing: f64::INFINITY };
    assert!(matches!(
        unchecked.build(&[1.0]),
        Err(EnsembleError::InvalidSmoothing(_))
    ));
}

#[test]
fn agreeing_trees_fuse_to_clear_winner() {
    let fuser = EnsembleFuser::new(2, FusionCfg::default());
    let builder = SmoothedCountBuilder::default();

    let out = fuser
        .fuse_counts(&builder, &[vec![8.0, 0.0], vec![7.0, 1.0]])
        .unwrap();
    assert_eq!(out.point, 0);
    assert_eq!(out.maximal, vec![true, false]);
    assert!(out.combined.is_reachable_within(credal_core::TOLERANCE));
    assert!(close(out.combined.lower()[0], 8.0 / 12.0));
    assert!(close(out.combined.upper()[1], 4.0 / 12.0));

    let mut most = fuser.clone();
    most.set_cfg(FusionCfg {
        method: CombinationMethod::MostPopulatedCoherent,
        ..FusionCfg::default()
    });
    let same = most
        .fuse_counts(&builder, &[vec![8.0, 0.0], vec![7.0, 1.0]])
        .unwrap();
    assert_eq!(same.point, 0);
    assert_eq!(same.maximal, vec![true, false]);
}

#[test]
fn undecided_trees_keep_both_classes() {
    let fuser = EnsembleFuser::new(2, FusionCfg::default());
    let out = fuser
        .fuse_counts(&SmoothedCountBuilder::default(), &[vec![6.0, 3.0], vec![6.0, 3.0]])
        .unwrap();
    assert_eq!(out.point, 0);
    assert_eq!(out.maximal, vec![true, true]);
}

#[test]
fn disagreeing_trees_depend_on_strategy() {
    let builder = SmoothedCountBuilder::default();
    let votes = [vec![8.0, 0.0], vec![0.0, 8.0]];

    let strict = EnsembleFuser::new(
        2,
        FusionCfg {
            method: CombinationMethod::Conjunction,
            incompatible: IncompatiblePolicy::Fail,
            point_rule: DecisionRule::Maximin,
        },
    );
    assert_eq!(
        strict.fuse_counts(&builder, &votes).unwrap_err(),
        EnsembleError::Core(CredalError::IncompatibleSet)
    );

    let lenient = EnsembleFuser::new(
        2,
        FusionCfg {
            method: CombinationMethod::Conjunction,
            incompatible: IncompatiblePolicy::Discount,
            point_rule: DecisionRule::Maximin,
        },
    );
    let out = lenient.fuse_counts(&builder, &votes).unwrap();
    assert!(out.combined.is_proper());
    assert!(out.maximal.iter().all(|&m| m));

    // one group per tree, merged by disjunction: nearly vacuous
    let almost = EnsembleFuser::new(2, FusionCfg::default());
    let out = almost.fuse_counts(&builder, &votes).unwrap();
    assert!(out.combined.lower().iter().all(|&l| l < 1e-9));
    assert!(out.combined.upper().iter().all(|&u| close(u, 1.0)));
    assert_eq!(out.maximal, vec![true, true]);
    assert!(out.point < 2);
}

#[test]
fn point_rule_maximality_takes_first_retained() {
    let fuser = EnsembleFuser::new(
        3,
        FusionCfg {
            point_rule: DecisionRule::Maximality,
            ..FusionCfg::default()
        },
    );
    let out = fuser
        .fuse_counts(&SmoothedCountBuilder::default(), &[vec![0.0, 9.0, 8.0]])
        .unwrap();
    assert_eq!(out.maximal, vec![false, true, true]);
    assert_eq!(out.point, 1);
}

#[test]
fn frame_size_is_enforced() {
    let fuser = EnsembleFuser::new(3, FusionCfg::default());
    assert_eq!(
        fuser
            .fuse_counts(&SmoothedCountBuilder::default(), &[vec![1.0, 2.0]])
            .unwrap_err(),
        EnsembleError::Core(CredalError::Shape { expected: 3, actual: 2 })
    );
    assert_eq!(
        fuser.fuse(&[]).unwrap_err(),
        EnsembleError::Core(CredalError::EmptyCollection)
    );
}

#[test]
fn ingest_groups_by_sample_in_order() {
    let fuser = EnsembleFuser::new(2, FusionCfg::default());
    let builder = SmoothedCountBuilder::default();

    let events = vec![
        VoteEvent::new("sample:b", "tree:0", vec![0.0, 8.0]),
        VoteEvent::new("sample:a", "tree:0", vec![8.0, 0.0]),
        VoteEvent::new("sample:c", "tree:0", vec![1.0, -1.0]),
        VoteEvent::new("sample:a", "tree:1", vec![7.0, 1.0]),
        VoteEvent::new("sample:b", "tree:1", vec![1.0, 7.0]),
    ];
    let outcomes = fuser.ingest(&builder, &events);

    let ids: Vec<&str> = outcomes.iter().map(|o| o.sample_id.as_str()).collect();
    assert_eq!(ids, vec!["sample:a", "sample:b", "sample:c"]);
    assert_eq!(outcomes[0].sources, vec!["tree:0", "tree:1"]);
    assert_eq!(outcomes[1].sources, vec!["tree:0", "tree:1"]);
    assert_eq!(outcomes[2].sources, vec!["tree:0"]);

    assert_eq!(outcomes[0].result.as_ref().unwrap().point, 0);
    assert_eq!(outcomes[1].result.as_ref().unwrap().point, 1);
    assert_eq!(
        outcomes[2].result.as_ref().unwrap_err(),
        &EnsembleError::InvalidCount { class: 1, value: -1.0 }
    );
}

#[test]
fn scoreboard_tallies_three_accuracies() {
    let fuser = EnsembleFuser::new(2, FusionCfg::default());
    let builder = SmoothedCountBuilder::default();
    let mut board = Scoreboard::default();

    // decisive, correct
    let sure = fuser.fuse_counts(&builder, &[vec![8.0, 0.0], vec![7.0, 1.0]]);
    board.record_result(&sure, 0).unwrap();
    // undecided set of two, truth is the runner-up
    let unsure = fuser.fuse_counts(&builder, &[vec![6.0, 3.0], vec![6.0, 3.0]]);
    board.record_result(&unsure, 1).unwrap();
    // failed sample
    let failed = fuser.fuse_counts(&builder, &[vec![-1.0, 0.0]]);
    board.record_result(&failed, 0).unwrap();

    assert_eq!(board.scored, 2);
    assert_eq!(board.skipped, 1);
    assert!(close(board.accuracy(), 0.5));
    assert!(close(board.set_accuracy(), 1.0));
    assert!(close(board.discounted_accuracy(), 0.75));

    let outcome = sure.unwrap();
    assert_eq!(
        board.record(&outcome, 5).unwrap_err(),
        EnsembleError::TruthOutOfRange { truth: 5, frame_size: 2 }
    );
}

#[test]
fn empty_scoreboard_reports_zero() {
    let board = Scoreboard::default();
    assert_eq!(board.accuracy(), 0.0);
    assert_eq!(board.set_accuracy(), 0.0);
    assert_eq!(board.discounted_accuracy(), 0.0);
}
