use super::StageBudget;
use crate::context::Context;
use crate::corpus::Article;
use crate::corpus::Split;
use crate::geo::Coord;
use anyhow::Context as _;
use std::io::BufRead;
use std::path::Path;

/// Read the article-data file: a tab-separated header line naming the
/// fields, then one record per line. Articles outside the Main
/// namespace are ignored; records without a coordinate are skipped;
/// redirects are collected and flattened onto their targets after the
/// main pass. Malformed lines are logged and skipped.
pub fn read_article_data(path: &Path, ctx: &mut Context) -> anyhow::Result<()> {
    log::info!("{:<32}{:<32}", "reading article data", path.display().to_string());
    let file = std::fs::File::open(path)
        .with_context(|| format!("open article data {}", path.display()))?;
    let mut lines = std::io::BufReader::new(file).lines();
    let header = lines
        .next()
        .ok_or_else(|| anyhow::anyhow!("empty article data file"))??;
    let fields = header.split('\t').collect::<Vec<_>>();
    let column = |name: &str| fields.iter().position(|f| *f == name);
    let title_at = column("title")
        .ok_or_else(|| anyhow::anyhow!("article data header missing title field"))?;
    let id_at = column("id");
    let split_at = column("split");
    let redir_at = column("redir");
    let namespace_at = column("namespace");
    let coord_at = column("coord");
    let links_at = column("incoming_links");

    let budget = StageBudget::new(ctx.opts.max_time_per_stage);
    let mut redirects = Vec::<(String, String)>::new();
    let mut recorded = 0;
    for line in lines {
        if budget.exhausted() {
            log::warn!("article data stage budget exhausted, stopping early");
            break;
        }
        let line = line?;
        let cells = line.split('\t').collect::<Vec<_>>();
        let cell = |at: Option<usize>| at.and_then(|i| cells.get(i)).copied().unwrap_or("");
        let Some(title) = cells.get(title_at).filter(|t| !t.is_empty()) else {
            log::warn!("malformed article data line: {}", line);
            continue;
        };
        let namespace = match cell(namespace_at) {
            "" => "Main",
            other => other,
        };
        if namespace != "Main" {
            continue;
        }
        let redirect = cell(redir_at);
        if !redirect.is_empty() {
            redirects.push((title.to_string(), redirect.to_owned()));
            continue;
        }
        let Some(coord) = parse_coord(cell(coord_at)) else {
            continue;
        };
        let mut article = Article::new(cell(id_at).parse().unwrap_or(0), title.to_string());
        article.namespace = namespace.to_owned();
        article.split = match Split::try_from(cell(split_at)) {
            Ok(split) => split,
            Err(_) => {
                log::warn!("malformed article data line: {}", line);
                continue;
            }
        };
        article.coord = Some(coord);
        article.incoming_links = cell(links_at).parse().ok();
        let split = article.split;
        let id = ctx.table.insert(article);
        if split == Split::Training {
            ctx.grid.add_training_article(id, coord);
        }
        recorded += 1;
    }

    let mut flattened = 0;
    for (title, target) in redirects {
        if let Some(id) = ctx.table.lookup(&target) {
            ctx.table.record(&title, id, true);
            flattened += 1;
        }
    }
    log::info!(
        "{:<32}{:<32}",
        "article data",
        format!("{} articles, {} redirects flattened", recorded, flattened)
    );
    Ok(())
}

fn parse_coord(cell: &str) -> Option<Coord> {
    let (lat, long) = cell.split_once(',')?;
    match (lat.trim().parse(), long.trim().parse()) {
        (Ok(lat), Ok(long)) => Some(Coord::new(lat, long)),
        _ => {
            log::warn!("malformed coordinate: {}", cell);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Opts;

    fn load(data: &str) -> Context {
        let dir = std::env::temp_dir().join(format!("geotagger-articles-{:p}", data));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("articles.tsv");
        std::fs::write(&path, data).unwrap();
        let mut ctx = Context::new(Opts::default());
        read_article_data(&path, &mut ctx).unwrap();
        ctx
    }

    #[test]
    fn records_articles_and_flattens_redirects() {
        let ctx = load(
            "id\ttitle\tsplit\tredir\tnamespace\tcoord\tincoming_links\n\
             1\tParis\ttraining\t\tMain\t48.86,2.35\t500\n\
             2\tLutetia\t\tParis\tMain\t\t\n\
             3\tTalk page\t\t\tTalk\t0,0\t1\n\
             4\tNowhere\ttraining\t\tMain\t\t2\n",
        );
        assert_eq!(ctx.table.len(), 1);
        let paris = ctx.table.lookup("Paris").unwrap();
        // the redirect title resolves to the target record
        assert_eq!(ctx.table.lookup("Lutetia"), Some(paris));
        // no split enumeration contains a redirect record
        assert_eq!(ctx.table.by_split(Split::Training), &[paris]);
        assert!(ctx.table.article(paris).redirect.is_none());
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let ctx = load(
            "id\ttitle\tsplit\tredir\tnamespace\tcoord\tincoming_links\n\
             1\tGood\ttraining\t\tMain\t10.0,20.0\t5\n\
             2\t\ttraining\t\tMain\t10.0,20.0\t5\n\
             3\tBadCoord\ttraining\t\tMain\tnot-a-coord\t5\n",
        );
        assert_eq!(ctx.table.len(), 1);
        assert!(ctx.table.lookup("Good").is_some());
    }
}
