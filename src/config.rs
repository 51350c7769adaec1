use crate::corpus::Split;
use crate::geo::Tiling;
use crate::Degrees;
use crate::Miles;
use crate::MILES_PER_DEGREE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    GeotagDocuments,
    GeotagToponyms,
    MatchOnly,
}

impl TryFrom<&str> for Mode {
    type Error = anyhow::Error;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "geotag-documents" => Ok(Self::GeotagDocuments),
            "geotag-toponyms" => Ok(Self::GeotagToponyms),
            "match-only" => Ok(Self::MatchOnly),
            other => Err(anyhow::anyhow!("unrecognized mode {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GazetteerKind {
    World,
    Db,
}

impl TryFrom<&str> for GazetteerKind {
    type Error = anyhow::Error;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "world" => Ok(Self::World),
            "db" => Ok(Self::Db),
            other => Err(anyhow::anyhow!("unrecognized gazetteer type {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalFormat {
    TrConll,
    Wiki,
    RawText,
}

impl TryFrom<&str> for EvalFormat {
    type Error = anyhow::Error;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "tr-conll" => Ok(Self::TrConll),
            "wiki" => Ok(Self::Wiki),
            "raw-text" => Ok(Self::RawText),
            other => Err(anyhow::anyhow!("unrecognized eval format {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentStrategyKind {
    Baseline,
    KlDivergence,
    PartialKlDivergence,
    PerWordRegionDistributions,
}

impl TryFrom<&str> for DocumentStrategyKind {
    type Error = anyhow::Error;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "baseline" => Ok(Self::Baseline),
            "kl-divergence" => Ok(Self::KlDivergence),
            "partial-kl-divergence" => Ok(Self::PartialKlDivergence),
            "per-word-region-distributions" => Ok(Self::PerWordRegionDistributions),
            other => Err(anyhow::anyhow!("unrecognized document strategy {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToponymStrategyKind {
    Baseline,
    NaiveBayesWithBaseline,
    NaiveBayesNoBaseline,
}

impl TryFrom<&str> for ToponymStrategyKind {
    type Error = anyhow::Error;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "baseline" => Ok(Self::Baseline),
            "naive-bayes-with-baseline" => Ok(Self::NaiveBayesWithBaseline),
            "naive-bayes-no-baseline" => Ok(Self::NaiveBayesNoBaseline),
            other => Err(anyhow::anyhow!("unrecognized toponym strategy {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaselineStrategyKind {
    InternalLink,
    Random,
    NumArticles,
    LinkMostCommonToponym,
    RegdistMostCommonToponym,
}

impl TryFrom<&str> for BaselineStrategyKind {
    type Error = anyhow::Error;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "internal-link" => Ok(Self::InternalLink),
            "random" => Ok(Self::Random),
            "num-articles" => Ok(Self::NumArticles),
            "link-most-common-toponym" => Ok(Self::LinkMostCommonToponym),
            "regdist-most-common-toponym" => Ok(Self::RegdistMostCommonToponym),
            other => Err(anyhow::anyhow!("unrecognized baseline strategy {}", other)),
        }
    }
}

/// Which distribution object backs Naive-Bayes toponym scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NaiveBayesKind {
    Article,
    RoundRegion,
    SquareRegion,
}

impl TryFrom<&str> for NaiveBayesKind {
    type Error = anyhow::Error;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "article" => Ok(Self::Article),
            "round-region" => Ok(Self::RoundRegion),
            "square-region" => Ok(Self::SquareRegion),
            other => Err(anyhow::anyhow!("unrecognized naive bayes type {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NaiveBayesWeighting {
    Equal,
    EqualWords,
    DistanceWeighted,
}

impl TryFrom<&str> for NaiveBayesWeighting {
    type Error = anyhow::Error;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "equal" => Ok(Self::Equal),
            "equal-words" => Ok(Self::EqualWords),
            "distance-weighted" => Ok(Self::DistanceWeighted),
            other => Err(anyhow::anyhow!("unrecognized weighting {}", other)),
        }
    }
}

/// Every recognized option with its default. The tiling parameters are
/// derived rather than stored: tile size defaults to the mile-based
/// setting converted through miles-per-degree.
#[derive(Debug, Clone)]
pub struct Opts {
    pub mode: Mode,
    pub gazetteer_kind: GazetteerKind,
    pub eval_format: EvalFormat,
    pub eval_split: Split,
    pub document_strategy: DocumentStrategyKind,
    pub toponym_strategy: ToponymStrategyKind,
    pub baseline_strategy: BaselineStrategyKind,
    pub baseline_weight: f64,
    pub naive_bayes_kind: NaiveBayesKind,
    pub naive_bayes_weighting: NaiveBayesWeighting,
    pub naive_bayes_context_len: usize,
    pub miles_per_region: Miles,
    pub degrees_per_region: Option<Degrees>,
    pub width_of_stat_region: usize,
    pub max_dist_for_close_match: Miles,
    pub max_dist_for_outliers: Miles,
    pub preserve_case_words: bool,
    pub ignore_stopwords_in_article_dists: bool,
    pub max_time_per_stage: Option<u64>,
    pub lru: usize,
    pub skip_initial: usize,
    pub skip_n: usize,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            mode: Mode::MatchOnly,
            gazetteer_kind: GazetteerKind::World,
            eval_format: EvalFormat::Wiki,
            eval_split: Split::Dev,
            document_strategy: DocumentStrategyKind::PartialKlDivergence,
            toponym_strategy: ToponymStrategyKind::Baseline,
            baseline_strategy: BaselineStrategyKind::InternalLink,
            baseline_weight: 0.5,
            naive_bayes_kind: NaiveBayesKind::SquareRegion,
            naive_bayes_weighting: NaiveBayesWeighting::Equal,
            naive_bayes_context_len: 10,
            miles_per_region: 100.0,
            degrees_per_region: None,
            width_of_stat_region: 1,
            max_dist_for_close_match: 80.0,
            max_dist_for_outliers: 200.0,
            preserve_case_words: false,
            ignore_stopwords_in_article_dists: false,
            max_time_per_stage: None,
            lru: 10_000,
            skip_initial: 0,
            skip_n: 0,
        }
    }
}

impl Opts {
    /// Tile size in degrees: the explicit setting, or the mile-based
    /// one converted at the equator.
    pub fn degrees_per_tile(&self) -> Degrees {
        self.degrees_per_region
            .unwrap_or(self.miles_per_region / MILES_PER_DEGREE)
    }

    pub fn tiling(&self) -> Tiling {
        Tiling::new(self.degrees_per_tile(), self.width_of_stat_region)
    }

    /// Reject configurations the run cannot proceed under. Fatal at
    /// start-up; nothing is loaded first.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.gazetteer_kind != GazetteerKind::World {
            anyhow::bail!("only world-type gazetteers are supported");
        }
        if self.miles_per_region <= 0. {
            anyhow::bail!("miles per region must be positive");
        }
        if let Some(degrees) = self.degrees_per_region {
            if degrees <= 0. {
                anyhow::bail!("degrees per region must be positive");
            }
        }
        if self.width_of_stat_region == 0 {
            anyhow::bail!("width of statistical region must be positive");
        }
        if !(0. ..=1.).contains(&self.baseline_weight) {
            anyhow::bail!("baseline weight must lie in [0, 1]");
        }
        if self.eval_format == EvalFormat::RawText {
            anyhow::bail!("raw-text evaluation input is not supported");
        }
        if self.mode == Mode::GeotagDocuments && self.eval_format != EvalFormat::Wiki {
            anyhow::bail!("documents can only be geotagged from wiki-format input");
        }
        if self.lru == 0 {
            anyhow::bail!("cache capacity must be positive");
        }
        Ok(())
    }
}
