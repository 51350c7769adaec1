use super::StageBudget;
use crate::context::Context;
use crate::gazetteer::find_match_for_division;
use crate::gazetteer::match_locality_by_ring;
use crate::gazetteer::Locality;
use crate::gazetteer::Location;
use crate::geo::Coord;
use anyhow::Context as _;
use std::io::BufRead;
use std::path::Path;

/// Read a world-format gazetteer and match each entry against the
/// article table. Records are eleven tab-separated fields:
/// id, name, altnames, original-script name, type, population, lat,
/// long, div1, div2, div3, with latitude and longitude encoded as
/// integers times one hundred. Entries without coordinates are
/// skipped. After the entries, every division computes its boundary
/// and looks for a containing-article match.
pub fn read_world_gazetteer(path: &Path, ctx: &mut Context) -> anyhow::Result<()> {
    log::info!("{:<32}{:<32}", "matching gazetteer", path.display().to_string());
    let file = std::fs::File::open(path)
        .with_context(|| format!("open gazetteer {}", path.display()))?;
    let budget = StageBudget::new(ctx.opts.max_time_per_stage);
    for line in std::io::BufReader::new(file).lines() {
        if budget.exhausted() {
            log::warn!("gazetteer stage budget exhausted, stopping early");
            break;
        }
        match_entry(ctx, &line?);
    }
    log::info!(
        "{:<32}{:<32}",
        "gazetteer",
        format!(
            "{} localities, {} divisions",
            ctx.gazetteer.n_localities(),
            ctx.gazetteer.n_divisions()
        )
    );

    ctx.gazetteer.compute_boundaries(ctx.opts.max_dist_for_outliers);
    let mut matched = 0;
    for div in ctx.gazetteer.division_ids().collect::<Vec<_>>() {
        if let Some(art) = find_match_for_division(&ctx.table, &ctx.gazetteer, div) {
            ctx.gazetteer.division_mut(div).matched = Some(art);
            ctx.table.article_mut(art).location = Some(Location::Division(div));
            matched += 1;
        }
    }
    log::info!(
        "{:<32}{:<32}",
        "division matches",
        format!("{} of {}", matched, ctx.gazetteer.n_divisions())
    );
    Ok(())
}

fn match_entry(ctx: &mut Context, line: &str) {
    let mut cells = line.split('\t').map(str::trim).collect::<Vec<_>>();
    cells.resize(11, "");
    let (name, altnames, kind) = (cells[1], cells[2], cells[4]);
    let (lat, long) = (cells[6], cells[7]);
    if lat.is_empty() || long.is_empty() {
        log::debug!("skipping location {} without coordinates", name);
        return;
    }
    let (Ok(lat), Ok(long)) = (lat.parse::<i64>(), long.parse::<i64>()) else {
        log::warn!("malformed gazetteer line: {}", line);
        return;
    };
    let coord = Coord::new(lat as f64 / 100., long as f64 / 100.);
    let mut locality = Locality::new(name.to_owned(), coord);
    locality.kind = kind.to_owned();
    if !altnames.is_empty() {
        locality.altnames = altnames.split(", ").map(str::to_owned).collect();
    }
    let id = ctx.gazetteer.add_locality(locality);
    let path = cells[8..11]
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>();
    let div = ctx.gazetteer.note_division(id, &path);
    ctx.gazetteer.locality_mut(id).div = div;

    let matched = match_locality_by_ring(
        &ctx.table,
        &ctx.gazetteer,
        id,
        ctx.opts.max_dist_for_close_match,
    );
    if let Some(art) = matched {
        ctx.gazetteer.locality_mut(id).matched = Some(art);
        ctx.table.article_mut(art).location = Some(Location::Locality(id));
    } else {
        log::debug!("unmatched name {}", ctx.gazetteer.locality(id).name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Opts;
    use crate::corpus::Article;
    use crate::corpus::Split;

    fn context() -> Context {
        let mut ctx = Context::new(Opts::default());
        for (title, lat, long, links) in [
            ("Trenton", 40.05, -73.95, 10),
            ("Austin", 30.27, -97.74, 800),
        ] {
            let mut art = Article::new(0, title.to_owned());
            art.split = Split::Training;
            art.coord = Some(Coord::new(lat, long));
            art.incoming_links = Some(links);
            ctx.table.insert(art);
        }
        ctx
    }

    fn gazetteer(ctx: &mut Context, data: &str) {
        let dir = std::env::temp_dir().join(format!("geotagger-gaz-{:p}", data));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("gazetteer.txt");
        std::fs::write(&path, data).unwrap();
        read_world_gazetteer(&path, ctx).unwrap();
    }

    #[test]
    fn entries_parse_match_and_link_back() {
        let mut ctx = context();
        gazetteer(
            &mut ctx,
            "1\tTrenton\t\t\tlocality\t85000\t4000\t-7400\tUnited States\tNew Jersey\t\n\
             2\tAustin\tWaterloo\t\tlocality\t960000\t3027\t-9774\tUnited States\tTexas\tTravis\n\
             3\tNowhere\t\t\tlocality\t0\t\t\tUnited States\t\t\n",
        );
        // the coordless entry is skipped
        assert_eq!(ctx.gazetteer.n_localities(), 2);
        let trenton = ctx.gazetteer.localities_named("trenton")[0];
        let matched = ctx.gazetteer.locality(trenton).matched.unwrap();
        assert_eq!(ctx.table.article(matched).title, "Trenton");
        assert_eq!(
            ctx.table.article(matched).location,
            Some(Location::Locality(trenton))
        );
        // divisions got created at every level
        assert!(!ctx.gazetteer.divisions_named("texas").is_empty());
        assert!(!ctx.gazetteer.divisions_named("united states").is_empty());
        // altnames index the locality too
        assert_eq!(ctx.gazetteer.localities_named("waterloo").len(), 1);
    }
}
