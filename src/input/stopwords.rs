use anyhow::Context as _;
use std::collections::HashSet;
use std::io::BufRead;
use std::path::Path;

/// Read the stopword list, one word per line.
pub fn read_stopwords(path: &Path) -> anyhow::Result<HashSet<String>> {
    log::info!("{:<32}{:<32}", "reading stopwords", path.display().to_string());
    let file = std::fs::File::open(path)
        .with_context(|| format!("open stopwords {}", path.display()))?;
    let mut stopwords = HashSet::new();
    for line in std::io::BufReader::new(file).lines() {
        let line = line?;
        let word = line.trim();
        if !word.is_empty() {
            stopwords.insert(word.to_owned());
        }
    }
    log::info!("{:<32}{:<32}", "stopwords", stopwords.len().to_string());
    Ok(stopwords)
}
