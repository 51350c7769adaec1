use crate::config::BaselineStrategyKind;
use crate::config::NaiveBayesKind;
use crate::config::NaiveBayesWeighting;
use crate::config::Opts;
use crate::config::ToponymStrategyKind;
use crate::corpus::Article;
use crate::corpus::ArticleId;
use crate::corpus::ArticleTable;
use crate::eval::GeogWord;
use crate::gazetteer::Gazetteer;
use crate::gazetteer::Location;
use crate::grid::Grid;
use crate::worddist::GlobalDist;
use crate::worddist::Lexicon;
use crate::worddist::WordDist;
use crate::worddist::MIN_WORD_PROB;
use crate::Probability;

/// Incoming-link count adjusted for the log domain: unknown and zero
/// counts become 0.01 so the logarithm stays finite.
pub fn adjusted_incoming_links(article: &Article) -> Probability {
    match article.incoming_links {
        Some(links) if links > 0 => links as Probability,
        _ => 0.01,
    }
}

/// A toponym-disambiguation strategy: score a candidate article for an
/// ambiguous toponym in context. The highest score wins; ties go to
/// the first candidate encountered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToponymStrategy {
    LinkBaseline,
    NaiveBayes { use_baseline: bool },
}

impl ToponymStrategy {
    pub fn from_opts(opts: &Opts) -> anyhow::Result<Self> {
        match opts.toponym_strategy {
            ToponymStrategyKind::Baseline => match opts.baseline_strategy {
                BaselineStrategyKind::InternalLink => Ok(Self::LinkBaseline),
                other => Err(anyhow::anyhow!(
                    "baseline strategy {:?} is not usable for toponyms",
                    other
                )),
            },
            ToponymStrategyKind::NaiveBayesNoBaseline => {
                Ok(Self::NaiveBayes { use_baseline: false })
            }
            ToponymStrategyKind::NaiveBayesWithBaseline => {
                Ok(Self::NaiveBayes { use_baseline: true })
            }
        }
    }

    /// Whether evaluation needs to prepare context windows around each
    /// toponym before scoring.
    pub fn needs_context(&self) -> bool {
        matches!(self, Self::NaiveBayes { .. })
    }

    #[allow(clippy::too_many_arguments)]
    pub fn score(
        &self,
        opts: &Opts,
        word: &GeogWord,
        candidate: ArticleId,
        table: &ArticleTable,
        grid: &mut Grid,
        gazetteer: &mut Gazetteer,
        global: &GlobalDist,
        lexicon: &Lexicon,
    ) -> Probability {
        let article = table.article(candidate);
        match self {
            Self::LinkBaseline => adjusted_incoming_links(article).ln(),
            Self::NaiveBayes { use_baseline } => {
                let links = adjusted_incoming_links(article);
                let (word_weight, baseline_weight) = if !use_baseline {
                    (1., 0.)
                } else if opts.naive_bayes_weighting == NaiveBayesWeighting::Equal {
                    (1., 1.)
                } else {
                    (1. - opts.baseline_weight, opts.baseline_weight)
                };
                let context = word.context.as_deref().unwrap_or(&[]);
                let (mut log_prob, total_weight) =
                    match (opts.naive_bayes_kind, article.dist.as_ref()) {
                        (NaiveBayesKind::Article, Some(dist)) => {
                            context_log_prob(context, dist, opts, global, lexicon)
                        }
                        _ => {
                            let dist =
                                region_word_dist(candidate, table, grid, gazetteer, global);
                            context_log_prob(context, dist, opts, global, lexicon)
                        }
                    };
                if total_weight > 0. {
                    log_prob /= total_weight;
                }
                log_prob * word_weight + baseline_weight * links.ln()
            }
        }
    }
}

/// Log-likelihood of the context under a distribution, with per-word
/// weights: 1 under equal weighting, 1/(1+offset) under
/// distance weighting. Returns the weighted sum and the total weight.
fn context_log_prob(
    context: &[(i32, String)],
    dist: &WordDist,
    opts: &Opts,
    global: &GlobalDist,
    lexicon: &Lexicon,
) -> (Probability, Probability) {
    let mut log_prob = 0.;
    let mut total_weight = 0.;
    for (offset, word) in context {
        let word = if opts.preserve_case_words {
            word.clone()
        } else {
            word.to_lowercase()
        };
        let prob = match lexicon.get(&word) {
            Some(id) => dist.lookup_word(id, global),
            None => MIN_WORD_PROB,
        };
        let weight = match opts.naive_bayes_weighting {
            NaiveBayesWeighting::DistanceWeighted => 1. / (1. + offset.abs() as Probability),
            _ => 1.,
        };
        total_weight += weight;
        log_prob += weight * prob.ln();
    }
    (log_prob, total_weight)
}

/// The region word distribution backing a candidate article: the
/// matched division's distribution when the article resolves to a
/// division, otherwise the distribution of the article's statistical
/// region. Either may be built lazily on first request; the resolved
/// region is memoized on the article.
fn region_word_dist<'a>(
    candidate: ArticleId,
    table: &ArticleTable,
    grid: &'a mut Grid,
    gazetteer: &'a mut Gazetteer,
    global: &GlobalDist,
) -> &'a WordDist {
    let article = table.article(candidate);
    match article.location {
        Some(Location::Division(div)) => {
            &gazetteer.division_worddist(div, table, global).dist
        }
        _ => {
            let region = match article.stat_region.get() {
                Some(region) => region,
                None => {
                    let coord = article.coord.expect("recorded articles have coordinates");
                    let region = grid.region_for_coord(table, global, coord);
                    article.stat_region.set(Some(region));
                    region
                }
            };
            &grid.region(region).worddist.dist
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Split;
    use crate::geo::Coord;
    use crate::geo::Tiling;

    fn springfield(links: u32) -> Article {
        let mut art = Article::new(0, format!("Springfield {}", links));
        art.split = Split::Training;
        art.coord = Some(Coord::new(39.9, -83.8));
        art.incoming_links = Some(links);
        art
    }

    #[test]
    fn link_baseline_prefers_the_better_linked_candidate() {
        let opts = Opts::default();
        let mut table = ArticleTable::default();
        let popular = table.insert(springfield(120));
        let obscure = table.insert(springfield(30));
        let mut grid = Grid::new(Tiling::new(1.0, 1));
        let mut gaz = Gazetteer::default();
        let global = {
            let mut g = GlobalDist::default();
            g.finish();
            g
        };
        let lex = Lexicon::default();
        let word = GeogWord::new("Springfield".into());
        let strategy = ToponymStrategy::LinkBaseline;
        let a = strategy.score(&opts, &word, popular, &table, &mut grid, &mut gaz, &global, &lex);
        let b = strategy.score(&opts, &word, obscure, &table, &mut grid, &mut gaz, &global, &lex);
        assert!(a > b);
    }

    #[test]
    fn region_scoring_memoizes_the_stat_region() {
        let opts = Opts::default();
        let mut lex = Lexicon::default();
        let mut global = GlobalDist::default();
        let mut table = ArticleTable::default();
        let mut art = springfield(50);
        let mut dist = WordDist::new();
        dist.add_word(lex.intern("ohio"), 4);
        global.note(&dist);
        art.dist = Some(dist);
        let id = table.insert(art);
        global.finish();
        table.finish_distributions(&global);
        let tiling = Tiling::new(1.0, 1);
        let mut grid = Grid::new(tiling);
        grid.add_training_article(id, Coord::new(39.9, -83.8));
        let mut gaz = Gazetteer::default();
        let mut word = GeogWord::new("Springfield".into());
        word.context = Some(vec![(1, "ohio".into())]);
        let strategy = ToponymStrategy::NaiveBayes { use_baseline: false };
        assert!(table.article(id).stat_region.get().is_none());
        let first = strategy.score(&opts, &word, id, &table, &mut grid, &mut gaz, &global, &lex);
        let region = table
            .article(id)
            .stat_region
            .get()
            .expect("memoized after scoring");
        assert_eq!(grid.region(region).tile, tiling.stat_region(Coord::new(39.9, -83.8)));
        let again = strategy.score(&opts, &word, id, &table, &mut grid, &mut gaz, &global, &lex);
        assert_eq!(first, again);
    }

    #[test]
    fn naive_bayes_follows_the_context() {
        let mut opts = Opts::default();
        opts.naive_bayes_kind = NaiveBayesKind::Article;
        let mut lex = Lexicon::default();
        let mut global = GlobalDist::default();
        let mut table = ArticleTable::default();
        let mut ids = Vec::new();
        for (title, words) in [
            ("Springfield, Ohio", &["ohio", "clark"][..]),
            ("Springfield, Illinois", &["illinois", "lincoln"][..]),
        ] {
            let mut art = springfield(50);
            art.title = title.to_owned();
            let mut dist = WordDist::new();
            for w in words {
                dist.add_word(lex.intern(w), 5);
            }
            global.note(&dist);
            art.dist = Some(dist);
            ids.push(table.insert(art));
        }
        global.finish();
        table.finish_distributions(&global);
        let mut grid = Grid::new(Tiling::new(1.0, 1));
        let mut gaz = Gazetteer::default();
        let mut word = GeogWord::new("Springfield".into());
        word.context = Some(vec![(1, "lincoln".into()), (2, "illinois".into())]);
        let strategy = ToponymStrategy::NaiveBayes { use_baseline: false };
        let ohio = strategy.score(&opts, &word, ids[0], &table, &mut grid, &mut gaz, &global, &lex);
        let illinois =
            strategy.score(&opts, &word, ids[1], &table, &mut grid, &mut gaz, &global, &lex);
        assert!(illinois > ohio);
    }
}
