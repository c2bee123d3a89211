// ============================================================
// LEAD WORKFLOW USE CASE
// ============================================================
// Search → validate → export, and CSV import → validate → export.
//
// The workflow holds no row state. Callers pass the current row set in
// and get a new one back; a failed call leaves their row set as it was.
// Callers must not run two operations against the same row set at once.

use std::sync::Arc;

use tracing::{info, warn};

use crate::application::use_cases::reconcile::{build_outcomes, matched_rows, reconcile};
use crate::domain::error::{AppError, Result};
use crate::domain::lead::{LeadRow, RowSet};
use crate::domain::phone::PhoneNormalizer;
use crate::domain::search::{BackendStatus, SearchRequest};
use crate::domain::workflow_config::WorkflowConfig;
use crate::infrastructure::csv::{decode_upload, CsvImport, LeadCsvParser, LeadCsvWriter};
use crate::infrastructure::leads_api::LeadsBackend;

/// Rows and export produced by the search pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOutcome {
    pub rows: RowSet,
    /// Lead count reported by the backend.
    pub total: usize,
    pub csv: String,
    /// Whether client-side validation was applied to `rows`.
    pub validated: bool,
}

/// Rows and export produced by the CSV import pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportOutcome {
    pub rows: RowSet,
    /// `None` when the upload could not be imported.
    pub csv: Option<String>,
    /// Soft import failure shown to the uploader.
    pub problem: Option<AppError>,
}

struct SearchResult {
    rows: RowSet,
    total: usize,
    server_csv: Option<String>,
}

pub struct LeadWorkflow {
    config: WorkflowConfig,
    normalizer: PhoneNormalizer,
    backend: Arc<dyn LeadsBackend + Send + Sync>,
    parser: LeadCsvParser,
    writer: LeadCsvWriter,
}

impl LeadWorkflow {
    pub fn new(config: WorkflowConfig, backend: Arc<dyn LeadsBackend + Send + Sync>) -> Self {
        let normalizer = PhoneNormalizer::new(&config.default_country_code);
        Self {
            parser: LeadCsvParser::new(normalizer.clone()),
            writer: LeadCsvWriter::new(),
            config,
            normalizer,
            backend,
        }
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    pub fn normalizer(&self) -> &PhoneNormalizer {
        &self.normalizer
    }

    /// Requested lead count from free-form input. Leading digits are read
    /// and the rest ignored, so `"20 leads"` asks for 20. Empty, non-numeric
    /// and zero values fall back to the configured default.
    pub fn parse_total(&self, input: &str) -> u32 {
        let trimmed = input.trim_start();
        let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
        let end = unsigned
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(unsigned.len());
        match unsigned[..end].parse::<u32>() {
            Ok(total) if total > 0 => total,
            _ => self.config.default_total,
        }
    }

    pub async fn backend_status(&self) -> Result<BackendStatus> {
        self.backend.status().await
    }

    /// Search for leads. Every returned row starts `unvalidated`.
    pub async fn run_search(&self, city: &str, segment: &str, total: Option<u32>) -> Result<RowSet> {
        Ok(self.search(city, segment, total).await?.rows)
    }

    async fn search(&self, city: &str, segment: &str, total: Option<u32>) -> Result<SearchResult> {
        let total = total.filter(|t| *t > 0).unwrap_or(self.config.default_total);
        let request = SearchRequest::new(city, segment, total)?;
        info!(city = %request.city, segment = %request.segment, total, "Searching leads");

        let page = self.backend.search(&request).await.map_err(|e| {
            warn!(error = %e, "Lead search failed");
            e
        })?;

        let rows: RowSet = page
            .rows
            .into_iter()
            .map(|lead| {
                LeadRow::new(lead.name, lead.phone, &self.normalizer)
                    .with_address(lead.address)
                    .with_source(lead.source)
            })
            .collect();
        info!(rows = rows.len(), reported = page.total, "Search finished");

        Ok(SearchResult {
            rows,
            total: page.total,
            server_csv: page.csv,
        })
    }

    /// Validate every keyed row and merge the answers back in.
    ///
    /// Each distinct key is sent once. Rows without a key pass through
    /// unchanged, and when no row has a key the provider is not called.
    pub async fn run_validate(&self, rows: &RowSet) -> Result<RowSet> {
        let numbers: Vec<String> = rows.phone_keys().iter().map(|k| k.to_string()).collect();
        if numbers.is_empty() {
            info!(rows = rows.len(), "No phone keys to validate");
            return Ok(rows.clone());
        }

        info!(numbers = numbers.len(), "Validating phone numbers");
        let answers = self.backend.validate(&numbers).await.map_err(|e| {
            warn!(error = %e, "Validation failed, row set left unchanged");
            e
        })?;

        let outcomes = build_outcomes(&answers, &self.normalizer);
        let merged = reconcile(rows, &outcomes);
        info!(
            answers = answers.len(),
            matched = matched_rows(rows, &outcomes),
            "Validation merged"
        );
        Ok(merged)
    }

    pub fn import_csv(&self, text: &str) -> CsvImport {
        let import = self.parser.parse_content(text);
        match &import.problem {
            None => info!(rows = import.rows.len(), "CSV imported"),
            Some(problem) => warn!(error = %problem, "CSV import rejected"),
        }
        import
    }

    /// Import raw uploaded bytes (UTF-8 or Windows-1252).
    pub fn import_upload(&self, bytes: &[u8]) -> CsvImport {
        self.import_csv(&decode_upload(bytes))
    }

    pub fn export_csv(&self, rows: &RowSet) -> Result<String> {
        self.writer.write_rows(rows)
    }

    /// Search, validate when `auto_validate` is set, then export.
    ///
    /// The server-rendered CSV is used only when the rows were not
    /// validated locally; otherwise it would not reflect the merged
    /// statuses, so the export is rebuilt from the rows.
    pub async fn run_search_pipeline(
        &self,
        city: &str,
        segment: &str,
        total: Option<u32>,
    ) -> Result<SearchOutcome> {
        let searched = self.search(city, segment, total).await?;

        let (rows, validated) = if self.config.auto_validate {
            (self.run_validate(&searched.rows).await?, true)
        } else {
            (searched.rows, false)
        };

        let csv = match searched.server_csv {
            Some(csv) if !validated => csv,
            _ => self.export_csv(&rows)?,
        };

        Ok(SearchOutcome {
            rows,
            total: searched.total,
            csv,
            validated,
        })
    }

    /// Import an upload, validate it, then export.
    ///
    /// An upload that cannot be imported yields an empty row set and its
    /// problem, without calling the provider.
    pub async fn run_import_pipeline(&self, bytes: &[u8]) -> Result<ImportOutcome> {
        let import = self.import_upload(bytes);
        if import.problem.is_some() {
            return Ok(ImportOutcome {
                rows: import.rows,
                csv: None,
                problem: import.problem,
            });
        }

        let rows = self.run_validate(&import.rows).await?;
        let csv = self.export_csv(&rows)?;
        Ok(ImportOutcome {
            rows,
            csv: Some(csv),
            problem: None,
        })
    }
}
