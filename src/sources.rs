use std::collections::HashSet;
use std::path::{Path, PathBuf};
use crate::merge::NameRule;
use crate::utils::paths::source_name;

/// One input file taking part in a merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub name: String,
    pub path: PathBuf,
    pub rule: NameRule,
}

struct CatalogEntry {
    name: &'static str,
    file: &'static str,
    rule: NameRule,
    enabled: bool,
}

/// Vector files produced by the reference implementations, in merge order.
const REFERENCE_CATALOG: [CatalogEntry; 3] = [
    CatalogEntry { name: "snow", file: "snow.txt", rule: NameRule::ProtocolName, enabled: true },
    CatalogEntry { name: "cacophony", file: "cacophony.txt", rule: NameRule::ProtocolName, enabled: false },
    CatalogEntry { name: "noise-c-basic", file: "noise-c-basic.txt", rule: NameRule::DeriveFromName, enabled: false },
];

pub fn reference_sources(data_directory: &Path, include_disabled: bool) -> Vec<Source> {
    REFERENCE_CATALOG.iter()
        .filter(|entry| entry.enabled || include_disabled)
        .map(|entry| Source {
            name: entry.name.to_string(),
            path: data_directory.join(entry.file),
            rule: entry.rule,
        })
        .collect()
}

/// Command line form of a source: `[NAME=]FILE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSpec {
    name: Option<String>,
    file: PathBuf,
}

impl SourceSpec {
    pub fn resolve(&self, data_directory: &Path) -> anyhow::Result<Source> {
        let name = match &self.name {
            Some(name) => name.clone(),
            None => source_name(&self.file)?
        };
        Ok(Source { name, path: data_directory.join(&self.file), rule: NameRule::ProtocolName })
    }
}

impl std::str::FromStr for SourceSpec {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        let (name, file) = match s.split_once('=') {
            Some((name, file)) => {
                if name.is_empty() {
                    return Err(anyhow::anyhow!("Empty source name: {}", s));
                }
                (Some(name.to_string()), file)
            }
            None => (None, s)
        };
        if file.is_empty() {
            return Err(anyhow::anyhow!("Empty source file: {}", s));
        }
        Ok(SourceSpec { name, file: PathBuf::from(file) })
    }
}

/// Switch the named sources over to [`NameRule::DeriveFromName`].
pub fn apply_name_derivation(sources: &mut [Source], names: &[String]) -> anyhow::Result<()> {
    let known = sources.iter().map(|s| s.name.as_str()).collect::<HashSet<_>>();
    if let Some(unknown) = names.iter().find(|name| !known.contains(name.as_str())) {
        return Err(anyhow::anyhow!("Unknown source for name derivation: {}", unknown));
    }
    for source in sources.iter_mut() {
        if names.contains(&source.name) {
            source.rule = NameRule::DeriveFromName;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_snow_is_active_by_default() {
        let sources = reference_sources(Path::new("data"), false);
        assert_eq!(sources, vec![Source {
            name: "snow".to_string(),
            path: PathBuf::from("data/snow.txt"),
            rule: NameRule::ProtocolName,
        }]);
    }

    #[test]
    fn full_catalog_keeps_order_and_rules() {
        let sources = reference_sources(Path::new("."), true);
        let summary = sources.iter()
            .map(|s| (s.name.as_str(), s.rule))
            .collect::<Vec<_>>();
        assert_eq!(summary, vec![
            ("snow", NameRule::ProtocolName),
            ("cacophony", NameRule::ProtocolName),
            ("noise-c-basic", NameRule::DeriveFromName),
        ]);
    }

    #[test]
    fn spec_without_name_uses_file_stem() {
        let spec: SourceSpec = "vectors/cacophony.txt".parse().unwrap();
        let source = spec.resolve(Path::new("data")).unwrap();
        assert_eq!(source.name, "cacophony");
        assert_eq!(source.path, PathBuf::from("data/vectors/cacophony.txt"));
    }

    #[test]
    fn spec_with_name() {
        let spec: SourceSpec = "snow=snow-v2.json".parse().unwrap();
        let source = spec.resolve(Path::new(".")).unwrap();
        assert_eq!(source.name, "snow");
        assert_eq!(source.path, PathBuf::from("./snow-v2.json"));
    }

    #[test]
    fn malformed_specs_are_rejected() {
        assert!("".parse::<SourceSpec>().is_err());
        assert!("=snow.txt".parse::<SourceSpec>().is_err());
        assert!("snow=".parse::<SourceSpec>().is_err());
    }

    #[test]
    fn name_derivation_targets_named_sources() {
        let mut sources = reference_sources(Path::new("."), true);
        apply_name_derivation(&mut sources, &["cacophony".to_string()]).unwrap();
        assert_eq!(sources[0].rule, NameRule::ProtocolName);
        assert_eq!(sources[1].rule, NameRule::DeriveFromName);
        assert!(apply_name_derivation(&mut sources, &["missing".to_string()]).is_err());
    }
}
