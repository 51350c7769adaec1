use crate::config::EvalFormat;
use crate::corpus::ArticleTable;
use crate::eval::GeogWord;
use crate::geo::Coord;
use anyhow::Context as _;
use std::io::BufRead;
use std::path::Path;
use std::path::PathBuf;

/// Expand a path into the files to evaluate: the file itself, or
/// every file inside a directory.
pub fn directory_files(path: &Path) -> anyhow::Result<Vec<PathBuf>> {
    if path.is_dir() {
        let mut files = Vec::new();
        for entry in std::fs::read_dir(path)
            .with_context(|| format!("read eval directory {}", path.display()))?
        {
            files.push(entry?.path());
        }
        files.sort();
        Ok(files)
    } else {
        Ok(vec![path.to_path_buf()])
    }
}

/// Read evaluation documents from a file or directory in the given
/// format.
pub fn read_documents(
    path: &Path,
    format: EvalFormat,
    table: &ArticleTable,
) -> anyhow::Result<Vec<Vec<GeogWord>>> {
    let mut documents = Vec::new();
    for file in directory_files(path)? {
        log::info!("{:<32}{:<32}", "processing evaluation file", file.display().to_string());
        match format {
            EvalFormat::TrConll => documents.extend(read_tr_conll(&file)?),
            EvalFormat::Wiki => documents.extend(read_wiki(&file, table)?),
            EvalFormat::RawText => anyhow::bail!("raw-text evaluation input is not supported"),
        }
    }
    Ok(documents)
}

/// Read a TR-CONLL `.tr` file: one token per line with tab-separated
/// tags, `LOC`-tagged tokens opening a block of candidate lines. The
/// `>`-marked candidate row carries the ground-truth coordinate and
/// the full toponym path. The whole file is one document.
fn read_tr_conll(path: &Path) -> anyhow::Result<Vec<Vec<GeogWord>>> {
    let file =
        std::fs::File::open(path).with_context(|| format!("open eval file {}", path.display()))?;
    let document = path.display().to_string();
    let mut words = Vec::new();
    let mut pending: Option<GeogWord> = None;
    for line in std::io::BufReader::new(file).lines() {
        let line = line?;
        if line.is_empty() {
            continue;
        }
        let Some((token, tags)) = line.split_once('\t') else {
            log::warn!("bad line: {}", line);
            continue;
        };
        if !token.is_empty() {
            if let Some(done) = pending.take() {
                words.push(done);
            }
            let mut word = GeogWord::new(token.to_owned());
            word.document = Some(document.clone());
            if tags.starts_with("LOC") {
                word.is_toponym = true;
                pending = Some(word);
            } else {
                words.push(word);
            }
        } else if let Some(toponym) = pending.as_mut() {
            if tags.starts_with('>') {
                // >c<n>  gazetteer  lat  long  toponym path
                let cells = tags.splitn(5, '\t').collect::<Vec<_>>();
                let parsed = match cells[..] {
                    [_, _, lat, long, topo] => match (lat.parse(), long.parse()) {
                        (Ok(lat), Ok(long)) => Some((Coord::new(lat, long), topo)),
                        _ => None,
                    },
                    _ => None,
                };
                match parsed {
                    Some((coord, topo)) => {
                        toponym.coord = Some(coord);
                        toponym.location = Some(topo.to_owned());
                    }
                    None => log::warn!("bad line: {}", line),
                }
            }
        }
    }
    if let Some(done) = pending.take() {
        words.push(done);
    }
    Ok(vec![words])
}

/// Read an encyclopedia-format evaluation file: `Article title:`
/// lines open a new document, `Link: target|surface` lines mark
/// toponyms whose ground truth is the linked article's coordinate,
/// anything else is a plain word.
fn read_wiki(path: &Path, table: &ArticleTable) -> anyhow::Result<Vec<Vec<GeogWord>>> {
    let file =
        std::fs::File::open(path).with_context(|| format!("open eval file {}", path.display()))?;
    let mut documents = Vec::new();
    let mut words = Vec::<GeogWord>::new();
    let mut title: Option<String> = None;
    for line in std::io::BufReader::new(file).lines() {
        let line = line?;
        if let Some(t) = line.strip_prefix("Article title: ") {
            if !words.is_empty() {
                documents.push(std::mem::take(&mut words));
            }
            title = Some(t.to_owned());
        } else if let Some(link) = line.strip_prefix("Link: ") {
            let (target, surface) = link.split_once('|').unwrap_or((link, link));
            let mut word = GeogWord::new(surface.to_owned());
            word.is_toponym = true;
            word.location = Some(target.to_owned());
            word.document = title.clone();
            word.coord = table.lookup(target).and_then(|id| table.article(id).coord);
            words.push(word);
        } else {
            let mut word = GeogWord::new(line);
            word.document = title.clone();
            words.push(word);
        }
    }
    if !words.is_empty() {
        documents.push(words);
    }
    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Article;
    use crate::corpus::Split;

    fn write(name: &str, data: &str) -> PathBuf {
        let dir = std::env::temp_dir().join("geotagger-geowords");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::write(&path, data).unwrap();
        path
    }

    #[test]
    fn tr_conll_blocks_parse() {
        let path = write(
            "khartoum.tr",
            "if\tO\tI-SBAR\tIN\n\
             Khartoum\tLOC\n\
             \t>c1\tNGA\t15.5833333\t32.5333333\tKhartoum > Al Khartum > Sudan\n\
             \tc2\tNGA\t-17.8833333\t30.1166667\tKhartoum > Zimbabwe\n\
             does\tO\tI-VP\tVBZ\n",
        );
        let documents = read_tr_conll(&path).unwrap();
        assert_eq!(documents.len(), 1);
        let words = &documents[0];
        assert_eq!(words.len(), 3);
        let toponym = &words[1];
        assert!(toponym.is_toponym);
        let coord = toponym.coord.unwrap();
        assert!((coord.lat - 15.5833333).abs() < 1e-9);
        assert_eq!(
            toponym.location.as_deref(),
            Some("Khartoum > Al Khartum > Sudan")
        );
        // the unmarked candidate row does not overwrite the truth
        assert!((coord.long - 32.5333333).abs() < 1e-9);
    }

    #[test]
    fn wiki_documents_group_by_title() {
        let mut table = ArticleTable::default();
        let mut art = Article::new(0, "Sudan".to_owned());
        art.split = Split::Training;
        art.coord = Some(Coord::new(15.0, 30.0));
        table.insert(art);
        let path = write(
            "eval.wiki",
            "Article title: First\n\
             some\n\
             Link: Sudan|Sudanese\n\
             Article title: Second\n\
             other\n",
        );
        let documents = read_wiki(&path, &table).unwrap();
        assert_eq!(documents.len(), 2);
        let link = &documents[0][1];
        assert!(link.is_toponym);
        assert_eq!(link.word, "Sudanese");
        assert_eq!(link.location.as_deref(), Some("Sudan"));
        assert!(link.coord.is_some());
        assert_eq!(documents[1][0].document.as_deref(), Some("Second"));
    }
}
