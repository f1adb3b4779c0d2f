// src/extractors/attributes.rs

// --- Imports ---
use crate::extractors::tagger::{PosTag, PosTagger};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

// --- Constants ---
/// Column order of the rendered table and the exported spreadsheet.
pub const SUMMARY_COLUMNS: [&str; 6] = ["Brand", "Processor", "RAM", "Storage", "Price", "Raw Line"];

// --- Regex Patterns for Attribute Matching (Lazy Static) ---
// Each matcher reports only its leftmost match on a line.

// Processor tier: i3 / i5 / i7 / i9 as a whole word. Case-sensitive, "I5" is not a match.
static PROCESSOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bi[3579]\b").expect("Failed to compile PROCESSOR_RE")
});

// RAM: one or two digits directly followed by "GB RAM", whole word
static RAM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b\d{1,2}GB RAM\b").expect("Failed to compile RAM_RE")
});

// Storage: no word boundaries, alternatives tried in this order at each position
static STORAGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\d+GB SSD|\d+TB HDD|\d+GB HDD").expect("Failed to compile STORAGE_RE")
});

// Price: dollar sign and digits only; "$12.99" yields "$12"
static PRICE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\d+").expect("Failed to compile PRICE_RE")
});

// --- Data Structures ---

/// Attributes found on a single source line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractedRecord {
    #[serde(rename = "Brand")]
    pub brand: String,
    #[serde(rename = "Processor")]
    pub processor: String,
    #[serde(rename = "RAM")]
    pub ram: String,
    #[serde(rename = "Storage")]
    pub storage: String,
    #[serde(rename = "Price")]
    pub price: String,
    #[serde(rename = "Raw Line")]
    pub raw_line: String, // The untouched source line
}

impl ExtractedRecord {
    /// Cell values in `SUMMARY_COLUMNS` order.
    pub fn cells(&self) -> [&str; 6] {
        [
            self.brand.as_str(),
            self.processor.as_str(),
            self.ram.as_str(),
            self.storage.as_str(),
            self.price.as_str(),
            self.raw_line.as_str(),
        ]
    }

    /// True when at least one attribute (not counting the raw line) was found.
    pub fn has_attributes(&self) -> bool {
        !(self.brand.is_empty()
            && self.processor.is_empty()
            && self.ram.is_empty()
            && self.storage.is_empty()
            && self.price.is_empty())
    }
}

/// Splits document text into lines on '\n' only. Blank lines are kept and a
/// trailing '\r' stays part of its line.
pub fn split_lines(text: &str) -> std::str::Split<'_, char> {
    text.split('\n')
}

fn first_match(re: &Regex, line: &str) -> String {
    re.find(line).map(|m| m.as_str().to_string()).unwrap_or_default()
}

// --- Main Extractor Structure ---

/// Rule-based extractor turning document text into one record per matching line.
pub struct AttributeExtractor {
    tagger: Box<dyn PosTagger>,
}

impl AttributeExtractor {
    /// Creates an extractor around an already-initialized tagger.
    pub fn new(tagger: Box<dyn PosTagger>) -> Self {
        Self { tagger }
    }

    pub fn tagger_name(&self) -> &str {
        self.tagger.name()
    }

    /// Extracts records from every line of `text`, in line order.
    /// Lines with no attribute at all are dropped.
    pub fn extract(&self, text: &str) -> Vec<ExtractedRecord> {
        let mut records = Vec::new();
        let mut scanned = 0usize;

        for line in split_lines(text) {
            scanned += 1;
            match self.extract_line(line) {
                Some(record) => records.push(record),
                None => tracing::trace!("Line {} has no attributes, skipping", scanned),
            }
        }

        tracing::debug!("Scanned {} lines, {} produced records", scanned, records.len());
        records
    }

    /// Applies the brand heuristic and all matchers to a single line.
    pub fn extract_line(&self, line: &str) -> Option<ExtractedRecord> {
        let brand = self
            .tagger
            .tag(line)
            .into_iter()
            .find(|token| token.tag == PosTag::Propn)
            .map(|token| token.text)
            .unwrap_or_default();

        let record = ExtractedRecord {
            brand,
            processor: first_match(&PROCESSOR_RE, line),
            ram: first_match(&RAM_RE, line),
            storage: first_match(&STORAGE_RE, line),
            price: first_match(&PRICE_RE, line),
            raw_line: line.to_string(),
        };

        if record.has_attributes() {
            tracing::trace!("Extracted {:?}", record);
            Some(record)
        } else {
            None
        }
    }
}
