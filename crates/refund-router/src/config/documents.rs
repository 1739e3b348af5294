//! On-disk routing documents: processors, compatibility rules, transactions.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::domain::{CompatibilityRule, Processor, Transaction};

/// Everything the routing engine needs, loaded and validated.
#[derive(Debug, Clone, Default)]
pub struct RouterDocuments {
    pub processors: Vec<Processor>,
    pub rules: Vec<CompatibilityRule>,
    pub transactions: Vec<Transaction>,
}

/// Structural problems in a document. Fatal for the host.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("reading {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing {}: {}", .path.display(), .source)]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("processor at index {index} has an empty id")]
    EmptyProcessorId { index: usize },
    #[error("processor '{id}' has an empty name")]
    EmptyProcessorName { id: String },
    #[error("processor '{id}' supports no countries")]
    NoSupportedCountries { id: String },
    #[error("processor '{id}' has no refund fees")]
    NoRefundFees { id: String },
}

/// Load processors and rules, validating both.
pub fn load(
    processors_path: impl AsRef<Path>,
    rules_path: impl AsRef<Path>,
) -> Result<RouterDocuments, DocumentError> {
    let processors: Vec<Processor> = read_document(processors_path.as_ref())?;
    let rules: Vec<CompatibilityRule> = read_document(rules_path.as_ref())?;

    validate_processors(&processors)?;

    Ok(RouterDocuments {
        processors,
        rules,
        transactions: Vec::new(),
    })
}

/// Load processors, rules, and the transaction history in one go.
pub fn load_with_transactions(
    processors_path: impl AsRef<Path>,
    rules_path: impl AsRef<Path>,
    transactions_path: impl AsRef<Path>,
) -> Result<RouterDocuments, DocumentError> {
    let mut documents = load(processors_path, rules_path)?;
    documents.transactions = read_document(transactions_path.as_ref())?;
    Ok(documents)
}

fn read_document<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, DocumentError> {
    let raw = fs::read_to_string(path).map_err(|source| DocumentError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| DocumentError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Reject structurally broken processors; warn (without failing) when a
/// supported country's canonical currency has no fee coverage.
pub fn validate_processors(processors: &[Processor]) -> Result<(), DocumentError> {
    for (index, proc) in processors.iter().enumerate() {
        if proc.id.is_empty() {
            return Err(DocumentError::EmptyProcessorId { index });
        }
        if proc.name.is_empty() {
            return Err(DocumentError::EmptyProcessorName {
                id: proc.id.clone(),
            });
        }
        if proc.supported_countries.is_empty() {
            return Err(DocumentError::NoSupportedCountries {
                id: proc.id.clone(),
            });
        }
        if proc.refund_fees.is_empty() {
            return Err(DocumentError::NoRefundFees {
                id: proc.id.clone(),
            });
        }

        for &country in &proc.supported_countries {
            let currency = country.canonical_currency();
            let covered = proc
                .refund_fees
                .iter()
                .any(|fee| fee.currency.is_none() || fee.currency == Some(currency));
            if !covered {
                warn!(
                    processor = %proc.id,
                    %country,
                    %currency,
                    "processor supports country but has no fees for its currency"
                );
            }
        }
    }

    Ok(())
}
