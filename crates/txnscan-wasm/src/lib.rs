//! WASM bindings for wallet and bank statement parsing.
//!
//! This crate provides WebAssembly bindings so browser front ends run the
//! same parser as the CLI. Text extraction stays in JavaScript (e.g. pdf.js);
//! the extracted text is handed to these bindings.

use wasm_bindgen::prelude::*;

use txnscan_core::{
    StatementParser, TransactionRecord, TransactionsResponse, TxnscanConfig, Validation,
};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn to_js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn records_to_js(records: Vec<TransactionRecord>) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(&TransactionsResponse::from(records)).map_err(to_js_error)
}

/// Parse statement text with the default template.
///
/// Returns `{ transactions: [...] }`; throws if the text is not a statement.
#[wasm_bindgen]
pub fn parse_statement(text: &str) -> Result<JsValue, JsValue> {
    let records = StatementParser::new()
        .parse(text)
        .into_result()
        .map_err(to_js_error)?;
    records_to_js(records)
}

/// Check statement markers only. Returns the marker found, or `undefined`.
#[wasm_bindgen]
pub fn validate_statement(text: &str) -> Option<String> {
    match StatementParser::new().validate(text) {
        Validation::Valid { marker } => Some(marker),
        Validation::Invalid(_) => None,
    }
}

/// Normalize an amount token ("1,234.5") to its two-decimal form ("1234.50").
#[wasm_bindgen]
pub fn normalize_amount(amount: &str) -> String {
    txnscan_core::normalize_amount_str(amount)
}

/// Statement parser class for browser use, optionally configured from JSON.
#[wasm_bindgen]
pub struct StatementParserJs {
    parser: StatementParser,
}

#[wasm_bindgen]
impl StatementParserJs {
    /// Create a parser with the default template.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            parser: StatementParser::new(),
        }
    }

    /// Create a parser from a JSON configuration (same format as the CLI's
    /// config file).
    #[wasm_bindgen(js_name = fromConfig)]
    pub fn from_config(config_json: &str) -> Result<StatementParserJs, JsValue> {
        let config: TxnscanConfig = serde_json::from_str(config_json).map_err(to_js_error)?;
        let parser = StatementParser::from_config(&config).map_err(to_js_error)?;
        Ok(Self { parser })
    }

    /// Parse statement text into `{ transactions: [...] }`.
    #[wasm_bindgen]
    pub fn parse(&self, text: &str) -> Result<JsValue, JsValue> {
        let records = self.parser.parse(text).into_result().map_err(to_js_error)?;
        records_to_js(records)
    }

    /// Parse with counters and timing.
    #[wasm_bindgen]
    pub fn parse_report(&self, text: &str) -> Result<JsValue, JsValue> {
        let report = self.parser.parse_report(text).map_err(to_js_error)?;
        serde_wasm_bindgen::to_value(&report).map_err(to_js_error)
    }

    /// Parse and render the pretty-printed JSON export document.
    #[wasm_bindgen]
    pub fn export_json(&self, text: &str) -> Result<String, JsValue> {
        let records = self.parser.parse(text).into_result().map_err(to_js_error)?;
        serde_json::to_string_pretty(&TransactionsResponse::from(records)).map_err(to_js_error)
    }
}

impl Default for StatementParserJs {
    fn default() -> Self {
        Self::new()
    }
}

/// Collects text items from a JavaScript PDF renderer, one item per line.
#[wasm_bindgen]
pub struct StatementTextJs {
    pages: Vec<Vec<String>>,
}

#[wasm_bindgen]
impl StatementTextJs {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self { pages: Vec::new() }
    }

    /// Start a new page.
    #[wasm_bindgen]
    pub fn begin_page(&mut self) {
        self.pages.push(Vec::new());
    }

    /// Add one text item to the current page.
    #[wasm_bindgen]
    pub fn add_item(&mut self, text: &str) {
        if self.pages.is_empty() {
            self.pages.push(Vec::new());
        }
        if let Some(page) = self.pages.last_mut() {
            page.push(text.to_string());
        }
    }

    /// Number of pages collected.
    #[wasm_bindgen]
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// All items joined with line breaks, pages in order.
    #[wasm_bindgen]
    pub fn get_text(&self) -> String {
        self.pages
            .iter()
            .map(|page| page.join("\n"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Parse the collected text with the default template.
    #[wasm_bindgen]
    pub fn parse(&self) -> Result<JsValue, JsValue> {
        parse_statement(&self.get_text())
    }
}

impl Default for StatementTextJs {
    fn default() -> Self {
        Self::new()
    }
}
