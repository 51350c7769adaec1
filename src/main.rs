//! Experiment driver: load the corpus, match the gazetteer, then
//! geotag documents or toponyms per the selected mode and strategy.

use clap::Parser;
use geotagger::config::Mode;
use geotagger::config::Opts;
use geotagger::context::Context;
use geotagger::corpus::Split;
use geotagger::input;
use geotagger::strategy::DocumentStrategy;
use geotagger::strategy::ToponymStrategy;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about = "geographic document and toponym resolution")]
struct Args {
    /// Action to perform: geotag-documents, geotag-toponyms, or match-only
    #[arg(short, long, default_value = "match-only")]
    mode: String,
    /// File containing list of stopwords
    #[arg(short, long)]
    stopwords_file: Option<PathBuf>,
    /// File containing info about encyclopedia articles
    #[arg(short, long)]
    article_data_file: PathBuf,
    /// File containing gazetteer entries to match
    #[arg(short, long)]
    gazetteer_file: PathBuf,
    /// File listing per-article word counts
    #[arg(short, long)]
    counts_file: Option<PathBuf>,
    /// File or directory of evaluation files
    #[arg(short, long)]
    eval_file: Option<PathBuf>,
    /// Format of the evaluation files: tr-conll or wiki
    #[arg(short = 'f', long, default_value = "wiki")]
    eval_format: String,
    /// Which split to evaluate documents from: dev or test
    #[arg(long, default_value = "dev")]
    eval_split: String,
    /// Type of gazetteer file: only world is supported
    #[arg(short = 't', long, default_value = "world")]
    gazetteer_type: String,
    /// Document strategy: baseline, kl-divergence, partial-kl-divergence,
    /// or per-word-region-distributions
    #[arg(long, default_value = "partial-kl-divergence")]
    geotag_document_strategy: String,
    /// Toponym strategy: baseline, naive-bayes-with-baseline, or
    /// naive-bayes-no-baseline
    #[arg(long, default_value = "baseline")]
    geotag_toponym_strategy: String,
    /// Baseline scoring: internal-link, random, num-articles,
    /// link-most-common-toponym, or regdist-most-common-toponym
    #[arg(long, default_value = "internal-link")]
    baseline_strategy: String,
    /// Relative weight of the baseline prior in weighted Naive Bayes
    #[arg(long, default_value_t = 0.5)]
    baseline_weight: f64,
    /// Distribution backing Naive Bayes: article, round-region, or
    /// square-region
    #[arg(long, default_value = "square-region")]
    naive_bayes_type: String,
    /// Word weighting: equal, equal-words, or distance-weighted
    #[arg(long, default_value = "equal")]
    naive_bayes_weighting: String,
    /// Words on either side of a toponym used as context
    #[arg(long, default_value_t = 10)]
    naive_bayes_context_len: usize,
    /// Size of tiling regions in miles
    #[arg(short = 'r', long, default_value_t = 100.0)]
    miles_per_region: f64,
    /// Size of tiling regions in degrees; overrides the mile setting
    #[arg(long)]
    degrees_per_region: Option<f64>,
    /// Tiles per side of a statistical region
    #[arg(long, default_value_t = 1)]
    width_of_stat_region: usize,
    /// Maximum miles between a gazetteer entry and a matching article
    #[arg(long, default_value_t = 80.0)]
    max_dist_for_close_match: f64,
    /// Maximum miles between a division point and its nearest neighbor
    #[arg(long, default_value_t = 200.0)]
    max_dist_for_outliers: f64,
    /// Keep word case when building distributions
    #[arg(long)]
    preserve_case_words: bool,
    /// Drop stopwords from article distributions
    #[arg(long)]
    ignore_stopwords_in_article_dists: bool,
    /// Seconds allowed per loading stage
    #[arg(long)]
    max_time_per_stage: Option<u64>,
    /// Capacity of the per-word region distribution cache
    #[arg(long, default_value_t = 10_000)]
    lru: usize,
    /// Skip this many evaluation documents before starting
    #[arg(long, default_value_t = 0)]
    skip_initial: usize,
    /// Evaluate only every nth document after the initial skip
    #[arg(long, default_value_t = 0)]
    skip_n: usize,
}

impl Args {
    fn opts(&self) -> anyhow::Result<Opts> {
        Ok(Opts {
            mode: self.mode.as_str().try_into()?,
            gazetteer_kind: self.gazetteer_type.as_str().try_into()?,
            eval_format: self.eval_format.as_str().try_into()?,
            eval_split: self.eval_split.as_str().try_into()?,
            document_strategy: self.geotag_document_strategy.as_str().try_into()?,
            toponym_strategy: self.geotag_toponym_strategy.as_str().try_into()?,
            baseline_strategy: self.baseline_strategy.as_str().try_into()?,
            baseline_weight: self.baseline_weight,
            naive_bayes_kind: self.naive_bayes_type.as_str().try_into()?,
            naive_bayes_weighting: self.naive_bayes_weighting.as_str().try_into()?,
            naive_bayes_context_len: self.naive_bayes_context_len,
            miles_per_region: self.miles_per_region,
            degrees_per_region: self.degrees_per_region,
            width_of_stat_region: self.width_of_stat_region,
            max_dist_for_close_match: self.max_dist_for_close_match,
            max_dist_for_outliers: self.max_dist_for_outliers,
            preserve_case_words: self.preserve_case_words,
            ignore_stopwords_in_article_dists: self.ignore_stopwords_in_article_dists,
            max_time_per_stage: self.max_time_per_stage,
            lru: self.lru,
            skip_initial: self.skip_initial,
            skip_n: self.skip_n,
        })
    }
}

fn main() -> anyhow::Result<()> {
    geotagger::init();
    let args = Args::parse();
    let opts = args.opts()?;
    opts.validate()?;
    if opts.eval_split == Split::Training || opts.eval_split == Split::None {
        anyhow::bail!("documents can only be evaluated from the dev or test split");
    }
    let mode = opts.mode;
    let mut ctx = Context::new(opts);

    if let Some(path) = args.stopwords_file.as_deref() {
        ctx.stopwords = input::read_stopwords(path)?;
    }
    input::read_article_data(&args.article_data_file, &mut ctx)?;
    match args.counts_file.as_deref() {
        Some(path) => input::read_word_counts(path, &mut ctx)?,
        None => {
            if mode == Mode::GeotagDocuments {
                anyhow::bail!("geotagging documents requires a counts file");
            }
            ctx.global.finish();
        }
    }
    input::read_world_gazetteer(&args.gazetteer_file, &mut ctx)?;

    match mode {
        Mode::MatchOnly => {}
        Mode::GeotagDocuments => {
            let strategy = DocumentStrategy::from_opts(&ctx.opts);
            geotagger::eval::evaluate_documents(&mut ctx, &strategy);
        }
        Mode::GeotagToponyms => {
            let strategy = ToponymStrategy::from_opts(&ctx.opts)?;
            let path = args
                .eval_file
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("geotagging toponyms requires an eval file"))?;
            let documents = input::read_documents(path, ctx.opts.eval_format, &ctx.table)?;
            geotagger::eval::evaluate_toponyms(&mut ctx, &strategy, documents);
        }
    }
    Ok(())
}
