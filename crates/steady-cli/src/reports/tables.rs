use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use steady_core::bridge::MemoryBridge;
use steady_core::simulation::SimulationReport;
use steady_core::stats::{Severity, TremorProfile};
use steady_core::trace::WindowReport;

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn severity_cell(severity: Severity) -> Cell {
    let color = match severity {
        Severity::Severe => Color::Red,
        Severity::Moderate => Color::Yellow,
        Severity::Mild => Color::Cyan,
        Severity::None => Color::Green,
        Severity::Unknown => Color::DarkGrey,
    };
    Cell::new(severity).fg(color)
}

pub fn demo_outcomes(report: &SimulationReport) {
    let mut table = new_table();
    table.set_header(vec![
        Cell::new("Target").add_attribute(Attribute::Bold),
        Cell::new("Clicked"),
        Cell::new("Assisted"),
        Cell::new("Reason"),
        Cell::new("Result").add_attribute(Attribute::Bold),
    ]);

    for o in &report.outcomes {
        let hit = o.clicked == Some(o.target);
        let (assisted, reason) = match o.assisted {
            Some((el, reason)) => (el.to_string(), reason.to_string()),
            None => ("-".to_string(), "-".to_string()),
        };
        table.add_row(vec![
            Cell::new(o.target).add_attribute(Attribute::Bold),
            Cell::new(o.clicked.map_or("-".to_string(), |el| el.to_string())),
            Cell::new(assisted),
            Cell::new(reason),
            if hit {
                Cell::new("hit").fg(Color::Green)
            } else {
                Cell::new("miss").fg(Color::Red)
            },
        ]);
    }
    println!("{table}");
}

pub fn session_summary(report: &SimulationReport, bridge: &MemoryBridge) {
    let s = &report.stats;
    let mut table = new_table();
    table.set_header(vec![
        Cell::new("Metric").add_attribute(Attribute::Bold),
        Cell::new("Value").add_attribute(Attribute::Bold),
    ]);
    if let Some(col) = table.column_mut(1) {
        col.set_cell_alignment(CellAlignment::Right);
    }

    let rate = s
        .success_rate()
        .map_or("-".to_string(), |r| format!("{:.0}%", r * 100.0));

    table.add_row(vec![Cell::new("Pointer moves"), Cell::new(report.moves)]);
    table.add_row(vec![
        Cell::new("Simulated time"),
        Cell::new(format!("{} ms", report.elapsed_ms)),
    ]);
    table.add_row(vec![Cell::new("Clicks"), Cell::new(s.click_count)]);
    table.add_row(vec![
        Cell::new("Assisted clicks"),
        Cell::new(report.assisted_clicks()),
    ]);
    table.add_row(vec![Cell::new("Assists"), Cell::new(s.assist_count)]);
    table.add_row(vec![
        Cell::new("Successful"),
        Cell::new(s.successful_clicks).fg(Color::Green),
    ]);
    table.add_row(vec![
        Cell::new("Missed"),
        Cell::new(s.missed_clicks).fg(Color::Red),
    ]);
    table.add_row(vec![Cell::new("Success rate"), Cell::new(rate)]);
    table.add_row(vec![
        Cell::new("Confidence"),
        Cell::new(s.confidence_level).fg(Color::Cyan),
    ]);
    table.add_row(vec![
        Cell::new("Tremor"),
        severity_cell(report.profile.severity),
    ]);
    table.add_row(vec![
        Cell::new("Messages published"),
        Cell::new(bridge.published.len()),
    ]);
    table.add_row(vec![Cell::new("Storage writes"), Cell::new(bridge.writes)]);
    println!("{table}");
}

pub fn windows(reports: &[WindowReport]) {
    let mut table = new_table();
    table.set_header(vec![
        Cell::new("Sample").add_attribute(Attribute::Bold),
        Cell::new("Start ms"),
        Cell::new("End ms"),
        Cell::new("Speed px/s"),
        Cell::new("Severity").add_attribute(Attribute::Bold),
        Cell::new("Freq Hz"),
        Cell::new("Amp px"),
    ]);
    for i in [0, 1, 2, 3, 5, 6] {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }

    for r in reports {
        table.add_row(vec![
            Cell::new(r.end_index + 1),
            Cell::new(r.start_ms),
            Cell::new(r.end_ms),
            Cell::new(format!("{:.1}", r.speed_px_s)),
            severity_cell(r.profile.severity),
            Cell::new(format!("{:.2}", r.profile.frequency_hz)),
            Cell::new(format!("{:.2}", r.profile.amplitude_px)),
        ]);
    }
    println!("{table}");
}

pub fn trace_summary(samples: usize, worst: &TremorProfile, level: u8) {
    println!("Samples:           {}", samples);
    println!("Worst tremor:      {}", worst.severity);
    if worst.is_known() {
        println!(
            "  frequency {:.2} Hz, amplitude {:.2} px",
            worst.frequency_hz, worst.amplitude_px
        );
    }
    println!("Recommended level: {}", level);
}
