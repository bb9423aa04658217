use std::collections::BTreeSet;

use drillform::{Command, CommandKind, Drill, DrillError, Point, RankPosition, consolidate};

fn drill_with(budget: u32) -> Drill {
    let mut drill = Drill::new("reconcile", budget).unwrap();
    drill
        .add_rank(
            "A",
            RankPosition::line(Point::new(0.0, 0.0), Point::new(4.0, 0.0)),
        )
        .unwrap();
    drill
        .add_rank(
            "B",
            RankPosition::line(Point::new(0.0, 4.0), Point::new(4.0, 4.0)),
        )
        .unwrap();
    drill
}

fn both() -> BTreeSet<String> {
    ["A".to_string(), "B".to_string()].into()
}

#[test]
fn a_shared_prefix_with_diverging_tails_reads_as_one_conflict() {
    let mut drill = drill_with(32);
    drill
        .add_command(0, "A", Command::new(CommandKind::MarkTime, 12))
        .unwrap();
    drill
        .add_command(0, "A", Command::new(CommandKind::Forward, 8))
        .unwrap();
    drill
        .add_command(0, "B", Command::new(CommandKind::MarkTime, 12))
        .unwrap();
    drill
        .add_command(0, "B", Command::new(CommandKind::Back, 8))
        .unwrap();

    let cons = consolidate(&drill.moves[0], &both()).unwrap();
    assert_eq!(cons.len(), 2);
    assert_eq!(cons.commands()[0].kind, CommandKind::MarkTime);
    assert_eq!(cons.commands()[0].counts, 12);
    assert!(cons.is_conflict(1));
    assert_eq!(cons.commands()[1].counts, 8);
}

#[test]
fn a_disputed_middle_interval_stays_bracketed_by_agreements() {
    let mut drill = drill_with(16);
    for (rank, middle) in [("A", CommandKind::Forward), ("B", CommandKind::Back)] {
        drill
            .add_command(0, rank, Command::new(CommandKind::MarkTime, 4))
            .unwrap();
        drill
            .add_command(0, rank, Command::new(middle, 4))
            .unwrap();
        drill
            .add_command(0, rank, Command::new(CommandKind::MarkTime, 4))
            .unwrap();
    }

    let cons = consolidate(&drill.moves[0], &both()).unwrap();
    assert_eq!(cons.len(), 3);
    assert!(!cons.is_conflict(0));
    assert!(cons.is_conflict(1));
    assert!(!cons.is_conflict(2));
    assert_eq!(cons.commands()[1].counts, 4);
    assert_eq!(cons.source_indices(2).unwrap()["A"], 2);
    assert_eq!(cons.source_indices(2).unwrap()["B"], 2);
}

#[test]
fn three_ranks_must_all_agree() {
    let mut drill = drill_with(16);
    drill
        .add_rank(
            "C",
            RankPosition::line(Point::new(0.0, 8.0), Point::new(4.0, 8.0)),
        )
        .unwrap();
    let ranks: BTreeSet<String> = ["A".to_string(), "B".to_string(), "C".to_string()].into();
    drill
        .add_command(0, "A", Command::new(CommandKind::MarkTime, 4))
        .unwrap();
    drill
        .add_command(0, "B", Command::new(CommandKind::MarkTime, 4))
        .unwrap();
    drill
        .add_command(0, "C", Command::new(CommandKind::Forward, 4))
        .unwrap();

    let cons = consolidate(&drill.moves[0], &ranks).unwrap();
    assert_eq!(cons.len(), 1);
    assert!(cons.is_conflict(0));
}

#[test]
fn group_rename_follows_each_ranks_own_indices() {
    let mut drill = drill_with(16);
    drill
        .add_command(0, "A", Command::new(CommandKind::Back, 4))
        .unwrap();
    drill
        .add_command(0, "A", Command::new(CommandKind::Forward, 8))
        .unwrap();
    drill
        .add_command(0, "B", Command::new(CommandKind::MarkTime, 2))
        .unwrap();
    drill
        .add_command(0, "B", Command::new(CommandKind::MarkTime, 2))
        .unwrap();
    drill
        .add_command(0, "B", Command::new(CommandKind::Forward, 8))
        .unwrap();

    // The timelines disagree for the first four counts, then realign on the
    // shared push downfield.
    let cons = consolidate(&drill.moves[0], &both()).unwrap();
    assert_eq!(cons.len(), 2);
    assert!(cons.is_conflict(0));
    assert_eq!(cons.commands()[1].kind, CommandKind::Forward);

    drill
        .group_rename_command(0, &both(), 1, Some("push".to_string()))
        .unwrap();
    assert_eq!(drill.moves[0].track("A").unwrap().commands[1].label(), "push");
    assert_eq!(drill.moves[0].track("B").unwrap().commands[2].label(), "push");
    drill.validate().unwrap();
}

#[test]
fn group_edits_through_a_conflict_are_rejected() {
    let mut drill = drill_with(16);
    drill
        .add_command(0, "A", Command::new(CommandKind::Forward, 8))
        .unwrap();
    drill
        .add_command(0, "B", Command::new(CommandKind::Back, 8))
        .unwrap();
    let before = drill.clone();

    assert!(matches!(
        drill.group_rename_command(0, &both(), 0, Some("x".to_string())),
        Err(DrillError::ConflictTarget)
    ));
    assert!(matches!(
        drill.group_split_command(0, &both(), 0, 4),
        Err(DrillError::ConflictTarget)
    ));
    assert!(matches!(
        drill.group_remove_commands(0, &both(), &[0]),
        Err(DrillError::ConflictTarget)
    ));
    assert_eq!(drill, before);
}

#[test]
fn group_remove_edits_every_selected_rank() {
    let mut drill = drill_with(16);
    drill.add_move(8, 1).unwrap();
    for rank in ["A", "B"] {
        drill
            .add_command(0, rank, Command::new(CommandKind::MarkTime, 4))
            .unwrap();
        drill
            .add_command(0, rank, Command::new(CommandKind::Forward, 8))
            .unwrap();
    }

    drill.group_remove_commands(0, &both(), &[0]).unwrap();

    for rank in ["A", "B"] {
        let track = drill.moves[0].track(rank).unwrap();
        assert_eq!(track.commands.len(), 1);
        assert_eq!(track.commands[0].kind, CommandKind::Forward);
    }
    // Both ranks' downstream starts moved up by the dropped mark time.
    assert_eq!(
        drill.moves[1].track("A").unwrap().start.head,
        Point::new(0.0, 8.0)
    );
    assert_eq!(
        drill.moves[1].track("B").unwrap().start.head,
        Point::new(0.0, 12.0)
    );
    drill.validate().unwrap();
}

#[test]
fn group_merge_and_split_round_through_the_consolidated_view() {
    let mut drill = drill_with(16);
    for rank in ["A", "B"] {
        drill
            .add_command(0, rank, Command::new(CommandKind::Forward, 4))
            .unwrap();
        drill
            .add_command(0, rank, Command::new(CommandKind::Forward, 8))
            .unwrap();
    }

    drill.group_merge_commands(0, &both(), &[0, 1]).unwrap();
    for rank in ["A", "B"] {
        let track = drill.moves[0].track(rank).unwrap();
        assert_eq!(track.commands.len(), 1);
        assert_eq!(track.commands[0].counts, 12);
    }

    drill.group_split_command(0, &both(), 0, 5).unwrap();
    for rank in ["A", "B"] {
        let track = drill.moves[0].track(rank).unwrap();
        assert_eq!(track.commands.len(), 2);
        assert_eq!(track.commands[0].counts, 5);
        assert_eq!(track.commands[1].counts, 7);
    }
    drill.validate().unwrap();
}

#[test]
fn group_merge_of_mixed_kinds_fails_without_side_effects() {
    let mut drill = drill_with(16);
    for rank in ["A", "B"] {
        drill
            .add_command(0, rank, Command::new(CommandKind::Forward, 4))
            .unwrap();
        drill
            .add_command(0, rank, Command::new(CommandKind::Back, 4))
            .unwrap();
    }
    let before = drill.clone();

    assert!(matches!(
        drill.group_merge_commands(0, &both(), &[0, 1]),
        Err(DrillError::HeterogeneousMerge)
    ));
    assert_eq!(drill, before);
}

#[test]
fn group_add_appends_even_where_timelines_disagree() {
    let mut drill = drill_with(16);
    drill
        .add_command(0, "A", Command::new(CommandKind::Forward, 8))
        .unwrap();

    drill
        .group_add_command(0, &both(), Command::new(CommandKind::MarkTime, 4))
        .unwrap();

    assert_eq!(drill.moves[0].track("A").unwrap().commands.len(), 2);
    assert_eq!(drill.moves[0].track("B").unwrap().commands.len(), 1);
    drill.validate().unwrap();
}

#[test]
fn group_reorder_translates_indices_for_every_rank() {
    let mut drill = drill_with(16);
    for rank in ["A", "B"] {
        drill
            .add_command(0, rank, Command::new(CommandKind::MarkTime, 4))
            .unwrap();
        drill
            .add_command(0, rank, Command::new(CommandKind::Forward, 8))
            .unwrap();
    }

    drill.group_move_up(0, &both(), &[1]).unwrap();
    for rank in ["A", "B"] {
        let kinds: Vec<_> = drill.moves[0]
            .track(rank)
            .unwrap()
            .commands
            .iter()
            .map(|c| c.kind)
            .collect();
        assert_eq!(kinds, vec![CommandKind::Forward, CommandKind::MarkTime]);
    }
    drill.validate().unwrap();
}
