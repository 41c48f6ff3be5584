use comfy_table::{Cell, Color, ContentArrangement, Table, presets::UTF8_FULL};
use textplots::Plot;

use pronostic_db::models::{DrawRecord, GeneratedGrid, NumberKind, format_numbers};
use pronostic_db::store::LoadReport;

use crate::analysis::FrequencyRanking;
use crate::analysis::generator::{GenerationError, Strategy};
use crate::session::Session;

pub fn display_load_report(report: &LoadReport) {
    println!("Données chargées : {} tirages", report.kept);
    println!("  Lignes lues        : {}", report.rows_read);
    if report.bad_date > 0 {
        println!("  Dates illisibles   : {}", report.bad_date);
    }
    if report.out_of_window > 0 {
        println!("  Hors fenêtre       : {}", report.out_of_window);
    }
    if report.invalid_numbers > 0 {
        println!("  Numéros invalides  : {}", report.invalid_numbers);
    }
}

pub fn display_empty_warning() {
    println!("⚠️  Aucun tirage exploitable. Vérifie le fichier CSV ou le chemin.");
}

pub fn display_summary(session: &Session, top_balls: usize, top_stars: usize) {
    if session.is_empty() {
        display_empty_warning();
        return;
    }
    println!("\nAnalyse sur {} tirages", session.record_count());
    for (kind, n) in [(NumberKind::Balls, top_balls), (NumberKind::Stars, top_stars)] {
        let ranking = session.ranking(kind);
        let top = session
            .top(kind, n)
            .iter()
            .map(|&number| format!("{} ({}×)", number, ranking.count(number)))
            .collect::<Vec<_>>()
            .join(", ");
        println!("Top {} {} les plus fréquentes : {}", n, kind.label().to_lowercase(), top);
    }
}

pub fn display_frequencies(ranking: &FrequencyRanking, kind: NumberKind, retention_days: u32) {
    println!(
        "\n📊 Fréquence des {} (1-{}, {} jours, {} numéros tirés)\n",
        kind.label().to_lowercase(),
        kind.max(),
        retention_days,
        ranking.total()
    );

    if ranking.is_empty() {
        println!("  (Pas de données à afficher)");
        return;
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Numéro", "Fréquence", ""]);

    let max = ranking.ordered().first().map_or(1, |c| c.count.max(1));
    for stat in ranking.ordered() {
        let bar = "█".repeat((stat.count * 30 / max) as usize);
        table.add_row(vec![
            format!("{:2}", stat.number),
            stat.count.to_string(),
            bar,
        ]);
    }
    println!("{table}");

    let points: Vec<(f32, f32)> = ranking
        .by_number()
        .iter()
        .map(|c| (c.number as f32, c.count as f32))
        .collect();
    let (y_min, y_max) = chart_y_range(ranking);
    let shape = textplots::Shape::Bars(&points);
    let mut chart = textplots::Chart::new_with_y_range(120, 40, 0.0, kind.max() as f32 + 1.0, y_min, y_max);
    println!("{}", chart.lineplot(&shape));
}

/// Axe vertical partant de zéro, avec une marge au-dessus du maximum
/// (une distribution plate garde ainsi une hauteur lisible).
fn chart_y_range(ranking: &FrequencyRanking) -> (f32, f32) {
    let max = ranking.ordered().first().map_or(0, |c| c.count);
    (0.0, max as f32 + 1.0)
}

pub fn display_history(records: &[&DrawRecord]) {
    if records.is_empty() {
        println!("Aucun tirage à afficher.");
        return;
    }

    println!("\n📅 Historique récent des tirages\n");

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Date", "Boules", "Étoiles"]);

    for draw in records {
        table.add_row(vec![
            draw.date.format("%d/%m/%Y").to_string(),
            format_numbers(&draw.balls),
            format_numbers(&draw.stars),
        ]);
    }

    println!("{table}");
}

pub fn display_grid(strategy: Strategy, result: &Result<GeneratedGrid, GenerationError>) {
    match result {
        Ok(grid) => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["Stratégie", "Boules", "Étoiles"]);
            table.add_row(vec![
                Cell::new(strategy.label()),
                Cell::new(format_numbers(&grid.balls)).fg(Color::Green),
                Cell::new(format_numbers(&grid.stars)).fg(Color::Yellow),
            ]);
            println!("{table}");
        }
        Err(e) => {
            println!("❌ Impossible de générer une grille ({}) : {}", strategy.label(), e);
        }
    }
}
