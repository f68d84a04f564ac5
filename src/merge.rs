use std::collections::HashSet;
use serde_json::Value;
use crate::errors::ParseError;
use crate::sources::Source;
use crate::vectors::{self, NAME_KEY, PROTOCOL_NAME_KEY};

/// How the deduplication key of a record is determined.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum NameRule {
    /// Use the record's `protocol_name` as is.
    #[default]
    ProtocolName,
    /// Rebuild `protocol_name` from `name`, dropping PSK handshakes.
    DeriveFromName,
}

impl std::fmt::Display for NameRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NameRule::ProtocolName => write!(f, "protocol-name"),
            NameRule::DeriveFromName => write!(f, "derive-from-name")
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct MergeSummary {
    pub total: usize,
    pub unique_names: usize,
    pub unique_records: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome {
    pub records: Vec<Value>,
    pub summary: MergeSummary,
}

/// Accumulates records from consecutive sources, keeping the first record
/// seen for every protocol name. The seen set spans all sources.
#[derive(Debug, Default)]
pub struct VectorMerger {
    seen: HashSet<String>,
    records: Vec<Value>,
    total: usize,
}

impl VectorMerger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the records of one source. Returns the number of records kept.
    pub fn absorb(&mut self,
                  records: Vec<Value>,
                  rule: NameRule,
                  origin: &str) -> Result<usize, ParseError>
    {
        self.total += records.len();
        let before = self.records.len();
        for (index, mut record) in records.into_iter().enumerate() {
            let Some(key) = dedup_key(&mut record, rule, origin, index)? else {
                continue;
            };
            if self.seen.insert(key) {
                self.records.push(record);
            }
        }
        Ok(self.records.len() - before)
    }

    pub fn summary(&self) -> MergeSummary {
        MergeSummary {
            total: self.total,
            unique_names: self.seen.len(),
            unique_records: self.records.len(),
        }
    }

    pub fn finish(self) -> MergeOutcome {
        let summary = self.summary();
        MergeOutcome { records: self.records, summary }
    }
}

/// `None` means the record is skipped without taking part in deduplication.
fn dedup_key(record: &mut Value,
             rule: NameRule,
             origin: &str,
             index: usize) -> Result<Option<String>, ParseError>
{
    match rule {
        NameRule::ProtocolName => {
            match record.get(PROTOCOL_NAME_KEY) {
                Some(Value::String(protocol_name)) => Ok(Some(protocol_name.clone())),
                Some(other) => Err(ParseError::InvalidProtocolName{
                    path: origin.to_string(), index, value: other.to_string()
                }),
                None => Err(ParseError::MissingProtocolName{path: origin.to_string(), index})
            }
        }
        NameRule::DeriveFromName => {
            let name = match record.get(NAME_KEY) {
                Some(Value::String(name)) => name.clone(),
                Some(other) => return Err(ParseError::InvalidName{
                    path: origin.to_string(), index, value: other.to_string()
                }),
                None => return Err(ParseError::MissingName{path: origin.to_string(), index})
            };
            let pattern = name.split('_').next().unwrap_or_default();
            if pattern.ends_with("PSK") {
                return Ok(None);
            }
            if let Some(fields) = record.as_object_mut() {
                fields.insert(PROTOCOL_NAME_KEY.to_string(), Value::String(name.clone()));
            }
            Ok(Some(name))
        }
    }
}

/// Load every source in order and merge their records.
pub fn dedupe_and_merge(sources: &[Source]) -> Result<MergeOutcome, ParseError> {
    let mut merger = VectorMerger::new();
    for source in sources {
        log::debug!("Loading {} ({}, rule {})", source.name, source.path.display(), source.rule);
        let records = vectors::load(&source.path)?;
        log::info!("{} {}", source.name, records.len());
        let kept = merger.absorb(records, source.rule, &source.path.display().to_string())?;
        log::debug!("Kept {} new records from {}", kept, source.name);
    }
    Ok(merger.finish())
}
