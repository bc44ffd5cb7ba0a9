use serde::Serialize;

use crate::model::Offer;
use crate::summary::Totals;
use crate::utils;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" | "txt" => Some(Self::Text),
            "json" => Some(Self::Json),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }
}

pub fn infer_format_from_path(path: &str) -> Option<OutputFormat> {
    let lower = path.trim().to_lowercase();
    if lower.ends_with(".json") {
        return Some(OutputFormat::Json);
    }
    if lower.ends_with(".csv") {
        return Some(OutputFormat::Csv);
    }
    if lower.ends_with(".txt") {
        return Some(OutputFormat::Text);
    }
    None
}

#[derive(Clone, Debug, Serialize)]
pub struct OfferRow {
    pub id: i64,
    pub date: Option<String>,
    pub title: Option<String>,
    pub vertical: Option<String>,
    pub settle: Option<String>,
    pub rate: Option<f64>,
    pub volume: Option<i64>,
    pub insurance: bool,
}

pub fn build_rows(offers: &[Offer]) -> Vec<OfferRow> {
    offers
        .iter()
        .map(|o| OfferRow {
            id: o.id,
            date: o.date.map(|d| d.to_string()),
            title: o.title.clone(),
            vertical: o.vertical.clone(),
            settle: o.settle.clone(),
            rate: o.rate,
            volume: o.volume,
            insurance: o.insurance,
        })
        .collect()
}

const HEADERS: [&str; 8] = [
    "ID", "DATE", "TITLE", "VERTICAL", "SETTLE", "RATE", "VOLUME", "INSURED",
];

// right-aligned columns: id, rate, volume
const RIGHT_ALIGNED: [bool; 8] = [true, false, false, false, false, true, true, false];

fn row_cells(row: &OfferRow) -> [String; 8] {
    [
        row.id.to_string(),
        utils::format_opt_text(row.date.as_deref()),
        utils::format_opt_text(row.title.as_deref()),
        utils::format_opt_text(row.vertical.as_deref()),
        utils::format_opt_text(row.settle.as_deref()),
        utils::format_opt_rate(row.rate),
        utils::format_opt_volume(row.volume),
        utils::yes_no(row.insurance).to_string(),
    ]
}

/// Aligned plain-text table, one line per offer.
pub fn render_table(rows: &[OfferRow]) -> String {
    if rows.is_empty() {
        return "no offers match the current filters\n".to_string();
    }

    let cells: Vec<[String; 8]> = rows.iter().map(row_cells).collect();
    let mut widths: [usize; 8] = [0; 8];
    for (i, h) in HEADERS.iter().enumerate() {
        widths[i] = h.len();
    }
    for row in &cells {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let mut render_line = |cols: &[String; 8]| {
        let mut line = String::new();
        for (i, cell) in cols.iter().enumerate() {
            if i != 0 {
                line.push_str("  ");
            }
            let pad = widths[i].saturating_sub(cell.chars().count());
            if RIGHT_ALIGNED[i] {
                line.push_str(&" ".repeat(pad));
                line.push_str(cell);
            } else {
                line.push_str(cell);
                line.push_str(&" ".repeat(pad));
            }
        }
        out.push_str(line.trim_end());
        out.push('\n');
    };

    let header: [String; 8] = HEADERS.map(|h| h.to_string());
    render_line(&header);
    for row in &cells {
        render_line(row);
    }
    out
}

/// Summary figures line rendered under the table.
pub fn totals_line(totals: &Totals) -> String {
    format!(
        "found={} total_volume={} avg_rate={:.2}",
        totals.total,
        utils::group_digits(totals.total_volume),
        totals.avg_rate
    )
}

pub fn render_text(rows: &[OfferRow]) -> Vec<u8> {
    render_table(rows).into_bytes()
}

pub fn render_json(rows: &[OfferRow]) -> Vec<u8> {
    serde_json::to_vec_pretty(rows).unwrap_or_else(|_| b"[]\n".to_vec())
}

fn escape_csv(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

pub fn render_csv(rows: &[OfferRow]) -> Vec<u8> {
    let mut out = String::new();
    out.push_str("id,date,title,vertical,settle,rate,volume,insurance\n");
    for r in rows {
        let fields = [
            r.id.to_string(),
            r.date.clone().unwrap_or_default(),
            r.title.clone().unwrap_or_default(),
            r.vertical.clone().unwrap_or_default(),
            r.settle.clone().unwrap_or_default(),
            r.rate.map(|v| v.to_string()).unwrap_or_default(),
            r.volume.map(|v| v.to_string()).unwrap_or_default(),
            utils::yes_no(r.insurance).to_string(),
        ];
        let line: Vec<String> = fields.iter().map(|f| escape_csv(f)).collect();
        out.push_str(&line.join(","));
        out.push('\n');
    }
    out.into_bytes()
}
