use drillform::{Command, CommandKind, DrillBuilder, Point, RankPosition};

fn main() -> anyhow::Result<()> {
    let drill = DrillBuilder::new("halftime opener", 32)?
        .rank(
            "alpha",
            RankPosition::line(Point::new(0.0, 0.0), Point::new(4.0, 0.0)),
        )?
        .rank(
            "bravo",
            RankPosition::curve(
                Point::new(8.0, 0.0),
                Point::new(12.0, 0.0),
                Point::new(10.0, 3.0),
            ),
        )?
        .tempo_change(1, 144)?
        .comment("step off together")
        .command("alpha", Command::new(CommandKind::Forward, 16))?
        .command("bravo", Command::new(CommandKind::Forward, 16))?
        .next_move(32)?
        .comment("alpha wheels while bravo straightens")
        .command("alpha", Command::new(CommandKind::GateHeadCw, 8))?
        .command("bravo", Command::new(CommandKind::FlattenToMid, 8).named("settle"))?
        .build()?;

    println!("{}", serde_json::to_string_pretty(&drill)?);
    Ok(())
}
