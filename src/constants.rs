// Constants module - centralized default values for configuration
//
// Defaults used by the configuration layer, the route grammar and the
// transformation pipeline live here so the numbers have a single home.

// =============================================================================
// Server defaults
// =============================================================================

/// Default listen address
pub const DEFAULT_LISTEN_ADDRESS: &str = "0.0.0.0";

/// Default listen port
pub const DEFAULT_PORT: u16 = 3000;

/// Default number of worker threads
pub const DEFAULT_THREADS: usize = 4;

/// Default address of the Prometheus listener
pub const DEFAULT_METRICS_ADDRESS: &str = "0.0.0.0:9090";

/// Default tracing filter when neither config nor RUST_LOG sets one
pub const DEFAULT_LOG_LEVEL: &str = "info";

// =============================================================================
// Storage defaults
// =============================================================================

/// Placeholder replaced by the requested filename in the key pattern
pub const FILENAME_PLACEHOLDER: &str = ":filename";

/// Default object key pattern (the filename is the key)
pub const DEFAULT_KEY_PATTERN: &str = FILENAME_PLACEHOLDER;

/// Default S3 region
pub const DEFAULT_REGION: &str = "us-east-1";

/// Default S3 operation timeout in seconds
pub const DEFAULT_S3_TIMEOUT_SECS: u64 = 20;

// =============================================================================
// Response defaults
// =============================================================================

/// Cache-Control sent with every transformed image (one year, immutable)
pub const CACHE_CONTROL_IMMUTABLE: &str = "max-age=31556926, immutable";

// =============================================================================
// Geometry defaults
// =============================================================================

/// CSS reference pixel density used when rasterizing vector sources
pub const DEFAULT_DENSITY: f64 = 96.0;

/// Upper bound for the vector rasterization density
pub const MAX_DENSITY: f64 = 2400.0;

/// Default decode budget in pixels (about 100 megapixels)
pub const DEFAULT_MAX_PIXELS: u64 = 100_000_000;

// =============================================================================
// Encoding defaults
// =============================================================================

/// Default JPEG/WebP quality when none is requested
pub const DEFAULT_QUALITY: u8 = 80;

/// Default WebP alpha channel quality
pub const DEFAULT_ALPHA_QUALITY: u8 = 100;

/// Sigma used for `blur` without an explicit value
pub const DEFAULT_AUTO_BLUR_SIGMA: f32 = 1.0;

/// Smallest explicit blur sigma accepted by the parameter grammar
pub const MIN_BLUR_SIGMA: f32 = 0.3;

/// Largest explicit blur sigma accepted by the parameter grammar
pub const MAX_BLUR_SIGMA: f32 = 1000.0;
