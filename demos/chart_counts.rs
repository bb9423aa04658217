use drillform::Drill;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let s = include_str!("../tests/data/drill.json");
    let drill: Drill = serde_json::from_str(s)?;
    drill.validate()?;

    for c in [0.0f64, 4.0, 8.0, 12.0, 16.0] {
        for rank in &drill.ranks {
            let pos = drill.position_at_partial_count(0, rank, c)?;
            println!(
                "count {c}: {rank} head ({:.2}, {:.2}) tail ({:.2}, {:.2})",
                pos.head.x, pos.head.y, pos.tail.x, pos.tail.y
            );
        }
    }

    Ok(())
}
