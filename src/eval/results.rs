use super::accum::CandidateAccum;
use super::accum::RangeTable;
use super::accum::RankAccum;
use super::accum::Reason;
use crate::corpus::short_form;
use crate::geo::degree_dist;
use crate::geo::sphere_dist;
use crate::geo::Coord;
use crate::geo::Tile;
use crate::geo::Tiling;
use crate::Degrees;
use crate::Miles;
use std::collections::BTreeMap;

/// Distance-to-true-center results are bucketed in fractions of a
/// region of this size.
const DIST_FRACTION_INCREMENT: f64 = 0.25;

/// Buckets for distance between the document and the predicted
/// region's center, in fractions of a region.
const DIST_FRACTIONS: &[f64] = &[
    0.25, 0.5, 0.75, 1., 1.5, 2., 3., 4., 6., 8., 12., 16., 24., 32., 48., 64., 96., 128., 192.,
    256., 384., 512., 768., 1024., 1536., 2048.,
];

/// Buckets for the number of training articles in the true region.
const NAITR_BOUNDS: &[f64] = &[2., 10., 25., 100.];

/// Accumulated document-geotagging results: the overall rank
/// distribution plus breakdowns by training-article density of the
/// true region, by how central the document sits in its true region,
/// and by the prediction's error distance in miles and degrees.
pub struct DocumentResults {
    pub all: RankAccum,
    by_naitr: RangeTable<RankAccum>,
    by_true_dist_to_true: BTreeMap<u64, RankAccum>,
    by_degree_dist_to_true: BTreeMap<u64, RankAccum>,
    by_true_dist_to_pred: RangeTable<RankAccum>,
    by_degree_dist_to_pred: RangeTable<RankAccum>,
    miles_per_region: Miles,
    degrees_per_region: Degrees,
}

impl DocumentResults {
    pub fn new(miles_per_region: Miles, degrees_per_region: Degrees) -> Self {
        Self {
            all: RankAccum::default(),
            by_naitr: RangeTable::new(NAITR_BOUNDS),
            by_true_dist_to_true: BTreeMap::default(),
            by_degree_dist_to_true: BTreeMap::default(),
            by_true_dist_to_pred: RangeTable::new(DIST_FRACTIONS),
            by_degree_dist_to_pred: RangeTable::new(DIST_FRACTIONS),
            miles_per_region,
            degrees_per_region,
        }
    }

    /// Record one evaluated document: the rank the true region
    /// appeared at, the document's true coordinate, the predicted
    /// region, and how many training articles the true region held.
    /// Distances are normalized to region-size fractions.
    pub fn record(&mut self, rank: usize, coord: Coord, pred: Tile, naitr: usize, tiling: &Tiling) {
        let pred_center = tiling.region_center(pred);
        let pred_truedist = sphere_dist(coord, pred_center) / self.miles_per_region;
        let pred_degdist = degree_dist(coord, pred_center) / self.degrees_per_region;

        self.all.record(rank, pred_truedist, pred_degdist);
        self.by_naitr
            .collector_mut(naitr as f64)
            .record(rank, pred_truedist, pred_degdist);

        let true_center = tiling.region_center(tiling.stat_region(coord));
        let true_truedist = sphere_dist(coord, true_center) / self.miles_per_region;
        let true_degdist = degree_dist(coord, true_center) / self.degrees_per_region;
        self.by_true_dist_to_true
            .entry(Self::bucket(true_truedist))
            .or_default()
            .record(rank, pred_truedist, pred_degdist);
        self.by_degree_dist_to_true
            .entry(Self::bucket(true_degdist))
            .or_default()
            .record(rank, pred_truedist, pred_degdist);

        self.by_true_dist_to_pred
            .collector_mut(pred_truedist)
            .record(rank, pred_truedist, pred_degdist);
        self.by_degree_dist_to_pred
            .collector_mut(pred_degdist)
            .record(rank, pred_truedist, pred_degdist);
    }

    pub fn record_other(&mut self, label: &str) {
        self.all.accum.record_other(label);
    }

    fn bucket(dist: f64) -> u64 {
        (dist.max(0.) / DIST_FRACTION_INCREMENT).floor() as u64
    }

    pub fn output(&self, stratified: bool) {
        log::info!("results for all documents:");
        self.all.output();
        if !stratified {
            return;
        }
        for (lower, upper, accum) in self.by_naitr.ranges() {
            if accum.accum.total == 0 {
                continue;
            }
            log::info!(
                "results for documents with articles in true region in [{},{}):",
                lower.map(|b| b.to_string()).unwrap_or_else(|| "0".into()),
                upper.map(|b| b.to_string()).unwrap_or_else(|| "inf".into()),
            );
            accum.output();
        }
        for (bucket, accum) in self.by_true_dist_to_true.iter() {
            let low = *bucket as f64 * DIST_FRACTION_INCREMENT * self.miles_per_region;
            let high = (*bucket + 1) as f64 * DIST_FRACTION_INCREMENT * self.miles_per_region;
            log::info!(
                "results for documents with distance to center of true region in miles in [{:.2},{:.2}):",
                low,
                high
            );
            accum.output();
        }
        for (bucket, accum) in self.by_degree_dist_to_true.iter() {
            let low = *bucket as f64 * DIST_FRACTION_INCREMENT * self.degrees_per_region;
            let high = (*bucket + 1) as f64 * DIST_FRACTION_INCREMENT * self.degrees_per_region;
            log::info!(
                "results for documents with distance to center of true region in degrees in [{:.2},{:.2}):",
                low,
                high
            );
            accum.output();
        }
        for (lower, upper, accum) in self.by_true_dist_to_pred.ranges() {
            if accum.accum.total == 0 {
                continue;
            }
            log::info!(
                "results for documents with predicted-center error (region fractions, miles basis) in [{},{}):",
                lower.map(|b| b.to_string()).unwrap_or_else(|| "0".into()),
                upper.map(|b| b.to_string()).unwrap_or_else(|| "inf".into()),
            );
            accum.output();
        }
        for (lower, upper, accum) in self.by_degree_dist_to_pred.ranges() {
            if accum.accum.total == 0 {
                continue;
            }
            log::info!(
                "results for documents with predicted-center error (region fractions, degrees basis) in [{},{}):",
                lower.map(|b| b.to_string()).unwrap_or_else(|| "0".into()),
                upper.map(|b| b.to_string()).unwrap_or_else(|| "inf".into()),
            );
            accum.output();
        }
    }
}

/// Accumulated toponym-disambiguation results: overall, restricted to
/// toponyms that differ from the true location's name, and further
/// restricted to those that differ from its short form too.
#[derive(Debug, Default)]
pub struct ToponymResults {
    all: CandidateAccum,
    diff_surface: CandidateAccum,
    diff_short: CandidateAccum,
}

impl ToponymResults {
    pub fn record(
        &mut self,
        correct: bool,
        toponym: &str,
        true_location: Option<&str>,
        reason: Option<Reason>,
        candidates: usize,
    ) {
        self.all.record(correct, reason, candidates);
        let differs = true_location.map(|t| t != toponym).unwrap_or(true);
        if differs {
            self.diff_surface.record(correct, reason, candidates);
            let short_differs = true_location
                .map(|t| short_form(t).0 != toponym)
                .unwrap_or(true);
            if short_differs {
                self.diff_short.record(correct, reason, candidates);
            }
        }
    }

    pub fn total(&self) -> usize {
        self.all.accum.total
    }

    pub fn correct(&self) -> usize {
        self.all.accum.correct
    }

    pub fn output(&self) {
        log::info!("results for all toponyms:");
        self.all.output();
        log::info!("results for toponyms when different from true location name:");
        self.diff_surface.output();
        log::info!("results for toponyms when different from either name or short form:");
        self.diff_short.output();
    }
}
