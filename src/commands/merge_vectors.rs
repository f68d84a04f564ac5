use std::path::{Path, PathBuf};
use crate::errors::MergeError;
use crate::merge::{dedupe_and_merge, MergeSummary};
use crate::sources::Source;
use crate::vectors;

pub fn merge_vectors(sources: Vec<Source>, output: PathBuf) -> anyhow::Result<()> {
    log::debug!("Merging {} source(s) into {}", sources.len(), output.display());
    let summary = merge_into(&sources, &output)?;
    log::info!(
        "total: {} unique names: {} unique records: {}",
        summary.total, summary.unique_names, summary.unique_records
    );
    log::info!("finished!");
    Ok(())
}

/// Nothing is written unless every source loads and merges cleanly.
pub(crate) fn merge_into(sources: &[Source], output: &Path) -> Result<MergeSummary, MergeError> {
    let outcome = dedupe_and_merge(sources)?;
    vectors::write(output, &outcome.records)?;
    Ok(outcome.summary)
}

#[cfg(test)]
mod tests {
    use crate::merge::NameRule;
    use super::*;

    fn snow(dir: &Path, content: &str) -> Vec<Source> {
        let path = dir.join("snow.txt");
        std::fs::write(&path, content).unwrap();
        vec![Source { name: "snow".to_string(), path, rule: NameRule::ProtocolName }]
    }

    #[test]
    fn writes_deduplicated_vectors() {
        let dir = tempfile::tempdir().unwrap();
        let sources = snow(
            dir.path(),
            r#"{"vectors":[{"protocol_name":"A","x":1},{"protocol_name":"A","x":2},{"protocol_name":"B","x":3}]}"#
        );
        let output = dir.path().join("vectors.txt");
        let summary = merge_into(&sources, &output).unwrap();
        assert_eq!(summary, MergeSummary { total: 3, unique_names: 2, unique_records: 2 });
        let expected = concat!(
            "{\n",
            "    \"vectors\": [\n",
            "        {\n",
            "            \"protocol_name\": \"A\",\n",
            "            \"x\": 1\n",
            "        },\n",
            "        {\n",
            "            \"protocol_name\": \"B\",\n",
            "            \"x\": 3\n",
            "        }\n",
            "    ]\n",
            "}"
        );
        assert_eq!(std::fs::read_to_string(&output).unwrap(), expected);
    }

    #[test]
    fn repeated_runs_are_byte_identical() {
        let dir = tempfile::tempdir().unwrap();
        let sources = snow(
            dir.path(),
            r#"{"vectors":[{"protocol_name":"B","fail":false,"messages":[]},{"protocol_name":"A","hybrid":"448"}]}"#
        );
        let output = dir.path().join("vectors.txt");
        merge_into(&sources, &output).unwrap();
        let first = std::fs::read(&output).unwrap();
        merge_into(&sources, &output).unwrap();
        assert_eq!(first, std::fs::read(&output).unwrap());
    }

    #[test]
    fn parse_failure_leaves_output_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let sources = snow(dir.path(), r#"{"tests":[]}"#);
        let output = dir.path().join("vectors.txt");
        std::fs::write(&output, "previous").unwrap();
        let result = merge_into(&sources, &output);
        assert!(matches!(result, Err(MergeError::MissingVectors{..})));
        assert_eq!(std::fs::read_to_string(&output).unwrap(), "previous");
    }

    #[test]
    fn parse_failure_creates_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let sources = snow(dir.path(), "not json");
        let output = dir.path().join("vectors.txt");
        assert!(merge_into(&sources, &output).is_err());
        assert!(!output.exists());
    }

    #[test]
    fn unwritable_output_is_a_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let sources = snow(dir.path(), r#"{"vectors":[]}"#);
        let output = dir.path().join("missing").join("vectors.txt");
        assert!(matches!(merge_into(&sources, &output), Err(MergeError::Io{..})));
    }
}
