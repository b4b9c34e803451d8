//! Win-probability table shown before play.

use comfy_table::{presets::UTF8_FULL, Table};
use fairdice_core::{win_rate_table, DieSet};

pub fn render(dice: &DieSet, trials: u32) -> Table {
    let rates = win_rate_table(dice, trials, &mut rand::thread_rng());

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);

    let mut header = vec!["Die".to_string()];
    header.extend(dice.iter().map(|die| die.to_string()));
    table.set_header(header);

    for (die, row) in dice.iter().zip(rates) {
        let mut cells = vec![die.to_string()];
        cells.extend(row.into_iter().map(|rate| match rate {
            Some(pct) => format!("{:.1}%", pct),
            None => "-".to_string(),
        }));
        table.add_row(cells);
    }
    table
}
