use super::gazetteer::Gazetteer;
use super::location::DivisionId;
use super::location::LocalityId;
use crate::corpus::Article;
use crate::corpus::ArticleId;
use crate::corpus::ArticleTable;
use crate::geo::sphere_dist;
use crate::Miles;

/// Find an article carrying the given (lowercased) name that passes
/// `check`. Candidate lists are tried in order: articles with exactly
/// this name; articles named "<name>, <division>" for each enclosing
/// division; articles whose short form is this name. The first two
/// lists return the first passing candidate; the short-form list
/// collects all passing candidates and breaks ties with `prefer`.
fn find_one_match(
    table: &ArticleTable,
    name: &str,
    divisions: Option<&[String]>,
    check: &impl Fn(&Article) -> bool,
    prefer: &impl Fn(&Article, &Article) -> bool,
) -> Option<ArticleId> {
    for id in table.by_lower_name(name) {
        if check(table.article(*id)) {
            return Some(*id);
        }
    }
    if let Some(path) = divisions {
        for division in path {
            for id in table.by_lower_name_div(name, &division.to_lowercase()) {
                if check(table.article(*id)) {
                    return Some(*id);
                }
            }
        }
    }
    let good = table
        .by_short_lower_name(name)
        .iter()
        .copied()
        .filter(|id| check(table.article(*id)))
        .collect::<Vec<_>>();
    if good.len() > 1 {
        log::debug!("{} short-form candidates for {}", good.len(), name);
    }
    good.into_iter().reduce(|best, next| {
        if prefer(table.article(next), table.article(best)) {
            next
        } else {
            best
        }
    })
}

/// Try every name of a location in order: canonical first, then each
/// alternate.
fn find_match<'n>(
    table: &ArticleTable,
    names: impl Iterator<Item = &'n str>,
    divisions: Option<&[String]>,
    check: &impl Fn(&Article) -> bool,
    prefer: &impl Fn(&Article, &Article) -> bool,
) -> Option<ArticleId> {
    for name in names {
        let name = name.to_lowercase();
        if let Some(id) = find_one_match(table, &name, divisions, check, prefer) {
            return Some(id);
        }
    }
    None
}

/// Match a locality to an article at most `maxdist` miles away,
/// preferring the nearest among short-form candidates.
pub fn find_match_for_locality(
    table: &ArticleTable,
    gazetteer: &Gazetteer,
    id: LocalityId,
    maxdist: Miles,
) -> Option<ArticleId> {
    let locality = gazetteer.locality(id);
    let divisions = locality.div.map(|d| gazetteer.division(d).path.as_slice());
    let check = |art: &Article| {
        art.coord
            .map(|c| sphere_dist(locality.coord, c) <= maxdist)
            .unwrap_or(false)
    };
    let prefer = |a: &Article, b: &Article| {
        let da = a.coord.map(|c| sphere_dist(locality.coord, c));
        let db = b.coord.map(|c| sphere_dist(locality.coord, c));
        match (da, db) {
            (Some(da), Some(db)) => da < db,
            _ => false,
        }
    };
    find_match(table, locality.names(), divisions, &check, &prefer)
}

/// Match a locality by expanding a distance ring: 5 miles, doubling
/// until the configured maximum is exceeded. The first hit wins.
pub fn match_locality_by_ring(
    table: &ArticleTable,
    gazetteer: &Gazetteer,
    id: LocalityId,
    max_dist_for_close_match: Miles,
) -> Option<ArticleId> {
    let mut maxdist = 5.;
    while maxdist <= max_dist_for_close_match {
        if let Some(art) = find_match_for_locality(table, gazetteer, id, maxdist) {
            return Some(art);
        }
        maxdist *= 2.;
    }
    None
}

/// Match a division to an article whose coordinate lies inside the
/// division's bounding box, preferring higher incoming-link counts.
pub fn find_match_for_division(
    table: &ArticleTable,
    gazetteer: &Gazetteer,
    id: DivisionId,
) -> Option<ArticleId> {
    let division = gazetteer.division(id);
    let check = |art: &Article| art.coord.map(|c| division.contains(c)).unwrap_or(false);
    let prefer = |a: &Article, b: &Article| match (a.incoming_links, b.incoming_links) {
        (Some(la), Some(lb)) => la > lb,
        _ => false,
    };
    find_match(
        table,
        std::iter::once(division.name()),
        None,
        &check,
        &prefer,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Split;
    use crate::gazetteer::Locality;
    use crate::geo::Coord;

    fn article(title: &str, lat: f64, long: f64, links: u32) -> Article {
        let mut art = Article::new(0, title.to_owned());
        art.split = Split::Training;
        art.coord = Some(Coord::new(lat, long));
        art.incoming_links = Some(links);
        art
    }

    #[test]
    fn ring_expansion_finds_the_close_article() {
        let mut table = ArticleTable::default();
        let near = table.insert(article("Trenton", 40.05, -73.95, 10));
        let far = table.insert(article("Trenton, New Jersey", 40.7, -74.2, 500));
        let mut gaz = Gazetteer::default();
        let loc = gaz.add_locality(Locality::new("Trenton".into(), Coord::new(40.0, -74.0)));
        let matched = match_locality_by_ring(&table, &gaz, loc, 80.);
        // the ~4 mile candidate hits at the first ring; the ~50 mile
        // candidate is never considered
        assert_eq!(matched, Some(near));
        assert_ne!(matched, Some(far));
    }

    #[test]
    fn out_of_range_localities_stay_unmatched() {
        let mut table = ArticleTable::default();
        table.insert(article("Springfield", 45.0, -100.0, 10));
        let mut gaz = Gazetteer::default();
        let loc = gaz.add_locality(Locality::new("Springfield".into(), Coord::new(40.0, -74.0)));
        assert_eq!(match_locality_by_ring(&table, &gaz, loc, 80.), None);
    }

    #[test]
    fn division_qualified_names_match() {
        let mut table = ArticleTable::default();
        let ohio = table.insert(article("Springfield, Ohio", 39.92, -83.81, 40));
        let mut gaz = Gazetteer::default();
        let loc = gaz.add_locality(Locality::new("Springfield".into(), Coord::new(39.93, -83.80)));
        let div = gaz.note_division(loc, &["United States".into(), "Ohio".into()]);
        gaz.locality_mut(loc).div = div;
        let matched = find_match_for_locality(&table, &gaz, loc, 10.);
        assert_eq!(matched, Some(ohio));
    }

    #[test]
    fn divisions_prefer_better_linked_articles() {
        let mut table = ArticleTable::default();
        // both named Georgia via short form, both inside the box
        let country = table.insert(article("Georgia (country)", 41.65, 43.5, 900));
        let state = table.insert(article("Georgia (U.S. state)", 41.68, 43.4, 300));
        let mut gaz = Gazetteer::default();
        for (name, lat, long) in [("Tbilisi", 41.7, 44.8), ("Batumi", 41.6, 41.6)] {
            let loc = gaz.add_locality(Locality::new(name.into(), Coord::new(lat, long)));
            gaz.note_division(loc, &["Georgia".into()]);
        }
        gaz.compute_boundaries(200.);
        let div = gaz.divisions_named("georgia")[0];
        let matched = find_match_for_division(&table, &gaz, div);
        assert_eq!(matched, Some(country));
        assert_ne!(matched, Some(state));
    }
}
