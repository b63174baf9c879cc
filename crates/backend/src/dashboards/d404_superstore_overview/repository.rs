use chrono::{NaiveDate, NaiveDateTime};
use contracts::dashboards::d404_superstore_overview::SalesRecord;
use once_cell::sync::Lazy;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::SystemTime;
use thiserror::Error;

use super::derive::{derive_all, RawSalesRow};

/// Dataset could not be loaded; nothing can be rendered.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("required column missing: {0}")]
    MissingColumn(String),

    #[error("line {line}: invalid date in column {column}: {value:?}")]
    InvalidDate {
        line: u64,
        column: &'static str,
        value: String,
    },
}

/// The loaded transaction table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub path: Option<PathBuf>,
    pub records: Vec<SalesRecord>,
    /// Malformed rows dropped during parsing.
    pub skipped_rows: usize,
}

impl Dataset {
    pub fn from_records(records: Vec<SalesRecord>) -> Self {
        Self {
            path: None,
            records,
            skipped_rows: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Columns
// ---------------------------------------------------------------------------

const COL_ORDER_ID: &str = "Order ID";
const COL_ORDER_DATE: &str = "Order Date";
const COL_SHIP_DATE: &str = "Ship Date";
const COL_CATEGORY: &str = "Category";
const COL_SUB_CATEGORY: &str = "Sub-Category";
const COL_SEGMENT: &str = "Segment";
const COL_STATE: &str = "State";
const COL_SALES: &str = "Sales";
const COL_PROFIT: &str = "Profit";
const COL_QUANTITY: &str = "Quantity";
const COL_DISCOUNT: &str = "Discount";

/// Header positions resolved once per file.
struct Columns {
    order_id: usize,
    order_date: usize,
    ship_date: usize,
    category: usize,
    sub_category: usize,
    segment: usize,
    state: usize,
    sales: usize,
    profit: usize,
    quantity: usize,
    discount: usize,
    region: Option<usize>,
    city: Option<usize>,
    customer_name: Option<usize>,
    product_name: Option<usize>,
    ship_mode: Option<usize>,
}

impl Columns {
    fn resolve(headers: &[String]) -> Result<Self, LoadError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        let require = |name: &str| find(name).ok_or_else(|| LoadError::MissingColumn(name.to_string()));

        Ok(Self {
            order_id: require(COL_ORDER_ID)?,
            order_date: require(COL_ORDER_DATE)?,
            ship_date: require(COL_SHIP_DATE)?,
            category: require(COL_CATEGORY)?,
            sub_category: require(COL_SUB_CATEGORY)?,
            segment: require(COL_SEGMENT)?,
            state: require(COL_STATE)?,
            sales: require(COL_SALES)?,
            profit: require(COL_PROFIT)?,
            quantity: require(COL_QUANTITY)?,
            discount: require(COL_DISCOUNT)?,
            region: find("Region"),
            city: find("City"),
            customer_name: find("Customer Name"),
            product_name: find("Product Name"),
            ship_mode: find("Ship Mode"),
        })
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// UTF-8 when valid, otherwise ISO-8859-1 (every byte is a code point).
fn decode_field(bytes: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(bytes) {
        Ok(s) => Cow::Borrowed(s),
        Err(_) => Cow::Owned(bytes.iter().map(|&b| b as char).collect()),
    }
}

const DATE_FORMATS: &[&str] = &["%m/%d/%Y", "%Y-%m-%d", "%m-%d-%Y", "%d.%m.%Y", "%Y/%m/%d"];
const DATETIME_FORMATS: &[&str] = &[
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
];

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
                .map(|dt| dt.date())
        })
}

fn parse_decimal(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Why a single row was dropped.
enum RowIssue {
    Skip(String),
    Fatal(LoadError),
}

fn parse_row(record: &csv::ByteRecord, cols: &Columns, line: u64) -> Result<RawSalesRow, RowIssue> {
    let text = |idx: usize| -> String {
        record
            .get(idx)
            .map(|b| decode_field(b).trim().to_string())
            .unwrap_or_default()
    };
    let optional = |idx: Option<usize>| idx.map(&text).filter(|v| !v.is_empty());

    let date = |idx: usize, column: &'static str| -> Result<NaiveDate, RowIssue> {
        let value = text(idx);
        if value.is_empty() {
            return Err(RowIssue::Skip(format!("empty {}", column)));
        }
        parse_date(&value).ok_or(RowIssue::Fatal(LoadError::InvalidDate {
            line,
            column,
            value,
        }))
    };
    let number = |idx: usize, column: &str| -> Result<f64, RowIssue> {
        let value = text(idx);
        parse_decimal(&value).ok_or_else(|| RowIssue::Skip(format!("bad {} {:?}", column, value)))
    };

    let order_id = text(cols.order_id);
    if order_id.is_empty() {
        return Err(RowIssue::Skip("empty Order ID".to_string()));
    }

    let quantity_raw = text(cols.quantity);
    let quantity = quantity_raw
        .parse::<i64>()
        .ok()
        .filter(|q| *q >= 0)
        .ok_or_else(|| RowIssue::Skip(format!("bad Quantity {:?}", quantity_raw)))?;

    Ok(RawSalesRow {
        order_id,
        order_date: date(cols.order_date, COL_ORDER_DATE)?,
        ship_date: date(cols.ship_date, COL_SHIP_DATE)?,
        category: text(cols.category),
        sub_category: text(cols.sub_category),
        segment: text(cols.segment),
        state: text(cols.state),
        sales: number(cols.sales, COL_SALES)?,
        profit: number(cols.profit, COL_PROFIT)?,
        quantity,
        discount: number(cols.discount, COL_DISCOUNT)?,
        region: optional(cols.region),
        city: optional(cols.city),
        customer_name: optional(cols.customer_name),
        product_name: optional(cols.product_name),
        ship_mode: optional(cols.ship_mode),
    })
}

/// Parse a Super Store CSV stream.
///
/// Rows with the wrong number of fields, an unparseable number or an empty
/// key field are skipped. A non-empty date that matches no known format
/// aborts the whole load.
pub fn parse_dataset<R: Read>(reader: R) -> Result<Dataset, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .byte_headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| {
            let h = decode_field(h);
            // Strip UTF-8 BOM if present
            if i == 0 {
                h.trim_start_matches('\u{FEFF}').to_string()
            } else {
                h.into_owned()
            }
        })
        .collect();
    let cols = Columns::resolve(&headers)?;

    let mut rows = Vec::new();
    let mut skipped = 0usize;

    for result in reader.byte_records() {
        let record = match result {
            Ok(r) => r,
            Err(e) if e.is_io_error() => return Err(LoadError::Csv(e)),
            Err(e) => {
                tracing::warn!("Skipping malformed CSV record: {}", e);
                skipped += 1;
                continue;
            }
        };
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        if record.len() != headers.len() {
            tracing::warn!(
                "Skipping line {}: expected {} fields, found {}",
                line,
                headers.len(),
                record.len()
            );
            skipped += 1;
            continue;
        }

        match parse_row(&record, &cols, line) {
            Ok(row) => rows.push(row),
            Err(RowIssue::Skip(reason)) => {
                tracing::warn!("Skipping line {}: {}", line, reason);
                skipped += 1;
            }
            Err(RowIssue::Fatal(e)) => return Err(e),
        }
    }

    Ok(Dataset {
        path: None,
        records: derive_all(rows),
        skipped_rows: skipped,
    })
}

/// Read and parse the dataset file, bypassing the cache.
pub fn load_dataset(path: &Path) -> Result<Dataset, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut dataset = parse_dataset(BufReader::new(file))?;
    dataset.path = Some(path.to_path_buf());

    tracing::info!(
        "Loaded {} rows from {} ({} skipped)",
        dataset.records.len(),
        path.display(),
        dataset.skipped_rows
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// Load cache
// ---------------------------------------------------------------------------

struct CacheEntry {
    modified: Option<SystemTime>,
    dataset: Arc<Dataset>,
}

static DATASET_CACHE: Lazy<Mutex<HashMap<PathBuf, CacheEntry>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

fn cache_key(path: &Path) -> Result<PathBuf, LoadError> {
    path.canonicalize().map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn modified_time(path: &Path) -> Result<Option<SystemTime>, LoadError> {
    let meta = std::fs::metadata(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(meta.modified().ok())
}

/// Load the dataset at most once per file version.
///
/// Entries are keyed by canonical path; a changed modification time on disk
/// triggers a reload.
pub fn load_cached(path: &Path) -> Result<Arc<Dataset>, LoadError> {
    let key = cache_key(path)?;
    let modified = modified_time(&key)?;

    let mut cache = DATASET_CACHE.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(entry) = cache.get(&key) {
        if entry.modified == modified {
            tracing::debug!("Dataset cache hit: {}", key.display());
            return Ok(Arc::clone(&entry.dataset));
        }
        tracing::info!("Dataset changed on disk, reloading: {}", key.display());
    }

    let dataset = Arc::new(load_dataset(&key)?);
    cache.insert(
        key,
        CacheEntry {
            modified,
            dataset: Arc::clone(&dataset),
        },
    );
    Ok(dataset)
}

/// Drop the cached copy of `path`. Returns whether an entry existed.
pub fn invalidate(path: &Path) -> bool {
    let key = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    DATASET_CACHE
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .remove(&key)
        .is_some()
}
