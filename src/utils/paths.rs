use std::path::{Path, PathBuf};

const OUTPUT_FILE: &str = "vectors.txt";

/// Name under which a vector file is reported: its file stem.
pub fn source_name(file: &Path) -> anyhow::Result<String> {
    let stem = file.file_stem()
        .ok_or_else(|| anyhow::anyhow!("Cannot name source without a file name ({})", file.display()))?;
    stem.to_str()
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("Source file name is not valid UTF-8 ({})", file.display()))
}

/// Merged vectors land one directory above the inputs.
pub fn default_output(data_directory: &Path) -> PathBuf {
    data_directory.join("..").join(OUTPUT_FILE)
}
