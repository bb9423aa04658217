use std::path::PathBuf;

use drillform::{Command, CommandKind, DrillBuilder, Point, RankPosition};

fn exe() -> PathBuf {
    std::env::var_os("CARGO_BIN_EXE_drillform")
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            let mut p = PathBuf::from("target").join("debug");
            p.push(if cfg!(windows) {
                "drillform.exe"
            } else {
                "drillform"
            });
            p
        })
}

#[test]
fn cli_reads_summarizes_and_reconciles_a_drill() {
    let dir = PathBuf::from("target").join("cli_smoke");
    std::fs::create_dir_all(&dir).unwrap();
    let drill_path = dir.join("drill.json");

    let drill = DrillBuilder::new("cli smoke entry", 16)
        .unwrap()
        .rank(
            "alpha",
            RankPosition::line(Point::new(0.0, 0.0), Point::new(4.0, 0.0)),
        )
        .unwrap()
        .rank(
            "bravo",
            RankPosition::line(Point::new(0.0, 4.0), Point::new(4.0, 4.0)),
        )
        .unwrap()
        .comment("hold, then the lines disagree")
        .command("alpha", Command::new(CommandKind::MarkTime, 8))
        .unwrap()
        .command("alpha", Command::new(CommandKind::Forward, 8))
        .unwrap()
        .command("bravo", Command::new(CommandKind::MarkTime, 8))
        .unwrap()
        .command("bravo", Command::new(CommandKind::Back, 8))
        .unwrap()
        .build()
        .unwrap();

    let f = std::fs::File::create(&drill_path).unwrap();
    serde_json::to_writer_pretty(f, &drill).unwrap();
    let in_arg = drill_path.to_string_lossy().to_string();

    let out = std::process::Command::new(exe())
        .args(["validate", "--in", in_arg.as_str()])
        .output()
        .unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("ok: cli smoke entry"), "{stdout}");

    let out = std::process::Command::new(exe())
        .args(["info", "--in", in_arg.as_str()])
        .output()
        .unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("cli smoke entry"), "{stdout}");
    assert!(stdout.contains("ranks: alpha, bravo"), "{stdout}");
    assert!(stdout.contains("MT 8, FM 8"), "{stdout}");

    let out = std::process::Command::new(exe())
        .args([
            "chart",
            "--in",
            in_arg.as_str(),
            "--move",
            "0",
            "--count",
            "12",
        ])
        .output()
        .unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("alpha: head (0.00, 4.00)"), "{stdout}");

    let out = std::process::Command::new(exe())
        .args([
            "reconcile",
            "--in",
            in_arg.as_str(),
            "--move",
            "0",
            "--ranks",
            "alpha,bravo",
        ])
        .output()
        .unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("0: MT 8"), "{stdout}");
    assert!(stdout.contains("1: <conflict> 8"), "{stdout}");
}
