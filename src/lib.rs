pub mod config;
pub mod context;
pub mod corpus;
pub mod eval;
pub mod gazetteer;
pub mod geo;
pub mod grid;
pub mod input;
pub mod regiondist;
pub mod strategy;
pub mod worddist;

/// dimensional analysis types
pub type Miles = f64;
pub type Degrees = f64;
pub type Tokens = u32;
pub type Probability = f64;

/// radius of the earth, used for great-circle distances
/// and for converting between miles and degrees of latitude
pub const EARTH_RADIUS_MILES: Miles = 3963.191;
pub const MILES_PER_DEGREE: Miles = std::f64::consts::PI * 2. * EARTH_RADIUS_MILES / 360.;

/// latitude does not wrap, so the poles are clamped just inside their
/// tiles rather than given degenerate tiles of their own
pub const MIN_LATITUDE: Degrees = -90.0;
pub const MAX_LATITUDE: Degrees = 89.999999;
pub const MIN_LONGITUDE: Degrees = -180.0;
pub const MAX_LONGITUDE: Degrees = 179.999999;

/// distance reported when a spherical distance cannot be computed
pub const UNKNOWN_DISTANCE: Miles = 1e6;

/// progress bar for whole-earth scans, counting tiles or regions
/// processed with an arrival estimate
pub fn progress(n: usize, task: &str) -> indicatif::ProgressBar {
    let style = "{msg:<24} {elapsed:>4} {wide_bar:.green} {pos}/{len} ~{eta}";
    let style = indicatif::ProgressStyle::with_template(style).unwrap();
    let progress = indicatif::ProgressBar::new(n as u64);
    progress.set_style(style);
    progress.set_message(task.to_owned());
    progress.enable_steady_tick(std::time::Duration::from_secs(1));
    progress
}

/// initialize logging: results and per-document progress print to
/// stderr, and a debug transcript of the whole run is kept under
/// logs/. GEOTAGGER_LOG overrides the stderr level.
pub fn init() {
    let level = std::env::var("GEOTAGGER_LOG")
        .ok()
        .and_then(|level| level.parse().ok())
        .unwrap_or(log::LevelFilter::Info);
    let config = simplelog::ConfigBuilder::new()
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let logs = std::path::Path::new("logs");
    std::fs::create_dir_all(logs).expect("create log directory");
    let stamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time moves forward")
        .as_secs();
    let transcript = logs.join(format!("geotag-{}.log", stamp));
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(&transcript).expect("create transcript file"),
    );
    let term = simplelog::TermLogger::new(
        level,
        config,
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).expect("initialize logger");
}
