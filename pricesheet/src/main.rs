//! Local glue around `pricesheet-core`: read a JSON record file,
//! resolve fonts, render the sheet, write a PNG.

use anyhow::{Context, Result};
use clap::Parser;
use pricesheet_core::{PriceRecord, Theme, group_records, retain_priced};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Render a weekly price sheet image from a JSON record file.
#[derive(Parser)]
#[command(name = "pricesheet")]
#[command(author, version, about = "Weekly price-sheet image generator", long_about = None)]
struct Cli {
    /// Record file: a JSON array of {item_name, spec, note?, price_text}
    #[arg(value_name = "RECORDS")]
    records: PathBuf,

    /// Date label; defaults to today as YYYY/MM/DD
    #[arg(short, long)]
    date: Option<String>,

    /// Output PNG path; defaults to menu_<YYYYMMDD>.png
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Font file(s) to load; system fonts are used as fallback
    #[arg(long = "font", value_name = "PATH")]
    fonts: Vec<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .init();
    }

    let date_label = cli
        .date
        .clone()
        .unwrap_or_else(|| chrono::Local::now().format("%Y/%m/%d").to_string());
    let out = cli
        .out
        .clone()
        .unwrap_or_else(|| PathBuf::from(format!("menu_{}.png", date_label.replace('/', ""))));

    let txt = std::fs::read_to_string(&cli.records)
        .with_context(|| format!("reading {}", cli.records.display()))?;
    let records: Vec<PriceRecord> =
        serde_json::from_str(&txt).with_context(|| format!("parsing {}", cli.records.display()))?;

    // Callers filter unpriced records before rendering; the CLI is
    // the caller here.
    let mut groups = group_records(&records);
    retain_priced(&mut groups);
    tracing::info!(
        records = records.len(),
        groups = groups.len(),
        "loaded record file"
    );
    let sold_out = groups
        .iter()
        .flat_map(|g| &g.records)
        .filter(|r| !pricesheet_core::price::has_amount(&r.price_text))
        .count();
    let top_amount = groups
        .iter()
        .flat_map(|g| &g.records)
        .map(|r| pricesheet_core::price::parse(&r.price_text))
        .fold(0.0_f64, f64::max);
    tracing::debug!(sold_out, top_amount, "price summary");

    let fontdb = load_fonts(&cli.fonts)?;
    let theme = Theme::default();
    let pixmap = pricesheet_core::render(&groups, &date_label, &theme, fontdb)?;
    let bytes = pricesheet_core::encode_png(&pixmap)?;
    std::fs::write(&out, &bytes).with_context(|| format!("writing {}", out.display()))?;
    tracing::info!(out = %out.display(), width = pixmap.width(), height = pixmap.height(), "wrote sheet");
    println!("{}", out.display());
    Ok(())
}

/// Load the given font files plus system fonts, then map the first
/// loaded family to 'sans-serif' so the sheet's generic family
/// resolves to it.
fn load_fonts(paths: &[PathBuf]) -> Result<Arc<usvg::fontdb::Database>> {
    let mut fontdb = usvg::fontdb::Database::new();
    for p in paths {
        fontdb
            .load_font_file(p)
            .with_context(|| format!("loading font {}", p.display()))?;
    }
    fontdb.load_system_fonts();
    let family_name = {
        let mut it = fontdb.faces();
        if let Some(face) = it.next() {
            face.families.first().map(|(n, _)| n.clone())
        } else {
            None
        }
    };
    if let Some(name) = family_name {
        fontdb.set_sans_serif_family(name);
    } else {
        tracing::warn!("no fonts available; text will not be drawn");
    }
    Ok(Arc::new(fontdb))
}
