use comfy_table::{ContentArrangement, Table};
use cp_mechanics::{DieSize, Roller};

pub fn run(rolls: u32, seed: Option<u64>) -> Result<(), String> {
    if rolls == 0 {
        return Err("--rolls must be at least 1".into());
    }
    let mut roller = match seed {
        Some(seed) => Roller::seeded(seed),
        None => Roller::from_entropy(),
    };
    for size in DieSize::ALL {
        for _ in 0..rolls {
            roller.roll(size);
        }
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Die", "Rolls", "Faces"]);

    for size in roller.rolled_sizes() {
        let dist = roller.distribution(size);
        let total: u64 = dist.iter().map(|(_, n)| n).sum();
        let faces = dist
            .iter()
            .map(|(face, n)| format!("{face}: {:.1}%", *n as f64 * 100.0 / total as f64))
            .collect::<Vec<_>>()
            .join(", ");
        table.add_row(vec![size.to_string(), total.to_string(), faces]);
    }

    println!("{table}");
    println!();
    println!("  {} dice rolled", roller.total_rolls());
    Ok(())
}
