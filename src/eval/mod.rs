pub mod accum;
pub mod document;
pub mod geogword;
pub mod results;
pub mod toponym;

pub use accum::Accum;
pub use accum::CandidateAccum;
pub use accum::RangeTable;
pub use accum::RankAccum;
pub use accum::Reason;
pub use document::evaluate_documents;
pub use geogword::GeogWord;
pub use results::DocumentResults;
pub use results::ToponymResults;
pub use toponym::evaluate_toponyms;

/// mean of a sample; zero when empty
pub fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        0.
    } else {
        xs.iter().sum::<f64>() / xs.len() as f64
    }
}

/// median of a sorted sample; zero when empty
pub fn median(sorted: &[f64]) -> f64 {
    match sorted.len() {
        0 => 0.,
        n if n % 2 == 1 => sorted[n / 2],
        n => (sorted[n / 2 - 1] + sorted[n / 2]) / 2.,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn central_tendencies() {
        assert_eq!(mean(&[]), 0.);
        assert_eq!(mean(&[1., 2., 3.]), 2.);
        assert_eq!(median(&[1., 2., 3.]), 2.);
        assert_eq!(median(&[1., 2., 3., 10.]), 2.5);
    }
}
