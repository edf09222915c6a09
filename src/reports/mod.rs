use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use cutplan::api::RawDemandRow;
use cutplan::error::CpResult;
use cutplan::plan::{fmt_mm, PlanSummary, ProfilePlan};
use serde::Serialize;
use std::path::Path;

fn right_align(table: &mut Table, cols: std::ops::RangeInclusive<usize>) {
    for i in cols {
        if let Some(col) = table.column_mut(i) {
            col.set_cell_alignment(CellAlignment::Right);
        }
    }
}

pub fn print_profile_plan(plan: &ProfilePlan) {
    println!(
        "\nProfil: {} ({}) | Boy: {} mm{}",
        plan.profile_name,
        plan.profile_id,
        fmt_mm(plan.stock_length_mm),
        if plan.painted {
            format!(" | Boyali, pay {} mm", fmt_mm(plan.paint_margin_mm))
        } else {
            String::new()
        }
    );

    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec![
        Cell::new("Boy").add_attribute(Attribute::Bold),
        Cell::new("Kesimler"),
        Cell::new("Adet"),
        Cell::new("Kullanilan"),
        Cell::new("Fire").fg(Color::Red),
    ]);

    for bar in &plan.bars {
        let cuts: Vec<String> = bar.cuts.iter().map(|c| fmt_mm(*c)).collect();
        table.add_row(vec![
            Cell::new(bar.index).add_attribute(Attribute::Bold),
            Cell::new(cuts.join(" + ")),
            Cell::new(bar.cuts.len()),
            Cell::new(fmt_mm(bar.used_mm())),
            Cell::new(fmt_mm(bar.waste_mm)).fg(Color::Red),
        ]);
    }
    right_align(&mut table, 2..=4);
    println!("{}", table);

    if !plan.unplaced.is_empty() {
        let pieces: Vec<String> = plan.unplaced.iter().map(|c| fmt_mm(*c)).collect();
        println!(
            "⚠️  Boydan uzun parcalar (kesilemedi): {}",
            pieces.join(", ")
        );
    }
}

pub fn print_legacy_lines(plan: &ProfilePlan) {
    println!(
        "\n{} ({}): {} boy",
        plan.profile_name, plan.profile_id, plan.total_bars
    );
    for line in plan.bar_lines() {
        println!("  {}", line);
    }
}

pub fn print_summary(plans: &[ProfilePlan]) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.add_row(vec![
        Cell::new("Profil").add_attribute(Attribute::Bold),
        Cell::new("Isim"),
        Cell::new("Boyali"),
        Cell::new("Boy Sayisi").fg(Color::Cyan),
        Cell::new("Parca"),
        Cell::new("Fire mm").fg(Color::Red),
        Cell::new("Verim %").fg(Color::Green),
        Cell::new("Agirlik kg"),
    ]);

    for p in plans {
        table.add_row(vec![
            Cell::new(&p.profile_id).add_attribute(Attribute::Bold),
            Cell::new(&p.profile_name),
            Cell::new(if p.painted { "evet" } else { "hayir" }),
            Cell::new(p.total_bars).fg(Color::Cyan),
            Cell::new(p.placed_pieces()),
            Cell::new(fmt_mm(p.total_waste_mm())).fg(Color::Red),
            Cell::new(format!("{:.1}", p.efficiency_pct())).fg(Color::Green),
            Cell::new(format!("{:.2}", p.stock_weight_kg())),
        ]);
    }

    let s = PlanSummary::from_plans(plans);
    table.add_row(vec![
        Cell::new("TOPLAM").add_attribute(Attribute::Bold),
        Cell::new(format!("{} profil", s.profiles)),
        Cell::new(""),
        Cell::new(s.bars).add_attribute(Attribute::Bold),
        Cell::new(s.pieces),
        Cell::new(fmt_mm(s.waste_mm)),
        Cell::new(""),
        Cell::new(format!("{:.2}", s.stock_weight_kg)),
    ]);
    right_align(&mut table, 3..=7);
    println!("\n{}", table);

    if s.unplaced > 0 {
        println!("⚠️  {} parca hicbir boya sigmadi.", s.unplaced);
    }
}

/// Cut-count passthrough shown when no plan could be built.
pub fn print_fallback(reason: &str, rows: &[RawDemandRow]) {
    println!("\n⚠️  Optimizasyon yapilamadi: {}", reason);
    let mut table = Table::new();
    table.load_preset(ASCII_FULL);
    table.add_row(vec![
        Cell::new("Profil").add_attribute(Attribute::Bold),
        Cell::new("Isim"),
        Cell::new("Kesim Olcusu"),
        Cell::new("Kesim Adedi"),
    ]);
    for r in rows {
        table.add_row(vec![
            Cell::new(&r.profil_id),
            Cell::new(&r.profil_isim),
            Cell::new(fmt_mm(r.kesim_olcusu)),
            Cell::new(r.kesim_adedi),
        ]);
    }
    right_align(&mut table, 2..=3);
    println!("{}", table);
}

#[derive(Serialize)]
struct PlanCsvRow<'a> {
    profil_id: &'a str,
    profil_isim: &'a str,
    boy_no: usize,
    kesimler: String,
    adet: usize,
    fire_mm: String,
}

pub fn write_plan_csv<P: AsRef<Path>>(plans: &[ProfilePlan], path: P) -> CpResult<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for p in plans {
        for bar in &p.bars {
            let cuts: Vec<String> = bar.cuts.iter().map(|c| fmt_mm(*c)).collect();
            wtr.serialize(PlanCsvRow {
                profil_id: &p.profile_id,
                profil_isim: &p.profile_name,
                boy_no: bar.index,
                kesimler: cuts.join("+"),
                adet: bar.cuts.len(),
                fire_mm: fmt_mm(bar.waste_mm),
            })?;
        }
    }
    wtr.flush()?;
    Ok(())
}
