//! Parse command - map a single receipt file to a record.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Context;
use chrono::Utc;
use clap::Args;
use console::style;
use serde::Serialize;
use tracing::{debug, info, warn};

use recibo_core::models::config::OutputConfig;
use recibo_core::{
    FreeTextParser, LoadRow, MappedRecord, ParsedTicket, TicketParser, UpstreamPayload,
};

/// Arguments for the parse command.
#[derive(Args)]
pub struct ParseArgs {
    /// Input file (`.json` extraction response, anything else is OCR text)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Report validation issues on stderr
    #[arg(long)]
    validate: bool,

    /// Emit the load row submitted by this user instead of the record
    #[arg(long, value_name = "EMAIL")]
    loaded_by: Option<String>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    /// File extension for outputs in this format.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Text => "txt",
        }
    }
}

/// Table columns, in load order.
const CSV_COLUMNS: [&str; 17] = [
    "id_caja",
    "canal",
    "codigo_tienda",
    "tienda_nombre",
    "fecha",
    "hora",
    "ticket_electronico",
    "id_boleta",
    "id_check",
    "monto_op_gravada",
    "importe_total",
    "recargo_consumo",
    "monto_tarifario",
    "mes",
    "anio",
    "momento",
    "a_c",
];

/// JSON output: the record columns plus, optionally, the source text.
#[derive(Serialize)]
struct RecordOutput<'a> {
    #[serde(flatten)]
    record: &'a MappedRecord,

    #[serde(skip_serializing_if = "Option::is_none")]
    raw_extracted_text: Option<&'a str>,
}

pub async fn run(args: ParseArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = super::config::load(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let parser = FreeTextParser::new().with_config(config.extraction.clone());
    let ticket = read_ticket(&args.input, &parser).await?;

    if args.validate {
        let issues = ticket.record.validate();
        if !issues.is_empty() {
            eprintln!("{}", style("Validation issues:").yellow());
            for issue in &issues {
                eprintln!("  - {}", issue);
            }
        }
    }

    let row = match args.loaded_by.as_deref() {
        Some(user) => Some(
            ticket
                .record
                .to_load_row(Utc::now(), user)
                .context("Record cannot be loaded")?,
        ),
        None => None,
    };

    let output = format_ticket(&ticket, row.as_ref(), args.format, &config.output)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Read a receipt file and map it.
///
/// `.json` files are treated as extraction responses and routed by shape.
/// Any other file is OCR text.
pub async fn read_ticket(path: &Path, parser: &FreeTextParser) -> anyhow::Result<ParsedTicket> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));

    if is_json {
        let value: serde_json::Value = serde_json::from_str(&content)
            .with_context(|| format!("{} is not valid JSON", path.display()))?;
        let payload = UpstreamPayload::detect(&value)?;
        debug!("{} holds a {} payload", path.display(), payload.shape());
        return Ok(payload.into_parsed_with(parser));
    }

    if content.trim().is_empty() {
        warn!("{} contains no text", path.display());
    }

    Ok(ParsedTicket {
        record: parser.parse(&content),
        raw_text: content,
    })
}

/// Render a mapped ticket, or its load row when one was built.
pub fn format_ticket(
    ticket: &ParsedTicket,
    row: Option<&LoadRow>,
    format: OutputFormat,
    output: &OutputConfig,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => format_json(ticket, row, output),
        OutputFormat::Csv => format_csv(row.map_or(&ticket.record, |r| &r.record), row),
        OutputFormat::Text => Ok(format_text(row.map_or(&ticket.record, |r| &r.record), row)),
    }
}

fn format_json(
    ticket: &ParsedTicket,
    row: Option<&LoadRow>,
    output: &OutputConfig,
) -> anyhow::Result<String> {
    let value = match row {
        Some(row) => serde_json::to_value(row)?,
        None => serde_json::to_value(RecordOutput {
            record: &ticket.record,
            raw_extracted_text: output
                .include_raw_text
                .then_some(ticket.raw_text.as_str()),
        })?,
    };

    if output.pretty_json {
        Ok(serde_json::to_string_pretty(&value)?)
    } else {
        Ok(serde_json::to_string(&value)?)
    }
}

fn format_csv(record: &MappedRecord, row: Option<&LoadRow>) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    let mut header: Vec<&str> = CSV_COLUMNS.to_vec();
    let mut fields = csv_fields(record);

    if let Some(row) = row {
        header.extend(["fecha_carga", "usuario_carga"]);
        fields.push(row.loaded_at.to_rfc3339());
        fields.push(row.loaded_by.clone());
    }

    wtr.write_record(&header)?;
    wtr.write_record(&fields)?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

/// Column values of a record, in `CSV_COLUMNS` order.
fn csv_fields(record: &MappedRecord) -> Vec<String> {
    fn opt<T: ToString>(value: &Option<T>) -> String {
        value.as_ref().map(ToString::to_string).unwrap_or_default()
    }

    vec![
        opt(&record.register_id),
        opt(&record.channel),
        opt(&record.store_code),
        opt(&record.store_name),
        opt(&record.date),
        opt(&record.time),
        opt(&record.electronic_ticket),
        opt(&record.receipt_id),
        record.record_id.to_string(),
        format!("{:.2}", record.taxable_amount),
        format!("{:.2}", record.total_amount),
        format!("{:.2}", record.consumption_surcharge),
        format!("{:.2}", record.tariff_amount),
        opt(&record.month),
        opt(&record.year),
        record
            .timestamp
            .map(|ts| ts.format("%Y-%m-%dT%H:%M:%S").to_string())
            .unwrap_or_default(),
        opt(&record.category_code),
    ]
}

fn format_text(record: &MappedRecord, row: Option<&LoadRow>) -> String {
    fn or_dash(value: &Option<String>) -> &str {
        value.as_deref().unwrap_or("-")
    }

    let mut output = String::new();

    output.push_str(&format!("Receipt: {}\n", record.record_id));
    output.push_str(&format!(
        "Store: {} {}\n",
        or_dash(&record.store_code),
        or_dash(&record.store_name)
    ));
    output.push_str(&format!("Register: {}\n", or_dash(&record.register_id)));

    match record.date {
        Some(date) => {
            let time = record.time.map(|t| t.to_string()).unwrap_or_default();
            let day_part = record
                .day_part()
                .map(|p| format!(" ({})", p.as_str()))
                .unwrap_or_default();
            output.push_str(&format!("Date: {} {}{}\n", date, time, day_part));
        }
        None => output.push_str("Date: -\n"),
    }

    output.push_str(&format!(
        "Electronic ticket: {}\n",
        or_dash(&record.electronic_ticket)
    ));
    output.push_str(&format!("Receipt number: {}\n", or_dash(&record.receipt_id)));
    output.push_str(&format!("Category: {}\n", or_dash(&record.category_code)));
    output.push('\n');

    output.push_str("Amounts:\n");
    output.push_str(&format!("  Taxable:   {:.2}\n", record.taxable_amount));
    output.push_str(&format!("  Total:     {:.2}\n", record.total_amount));
    output.push_str(&format!("  Surcharge: {:.2}\n", record.consumption_surcharge));
    output.push_str(&format!("  Tariff:    {:.2}\n", record.tariff_amount));

    if let Some(row) = row {
        output.push_str(&format!(
            "\nLoaded by {} at {}\n",
            row.loaded_by,
            row.loaded_at.to_rfc3339()
        ));
    }

    output
}
