use paths::PathContext;
use std::marker::PhantomData;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Application infrastructure context.
///
/// Contains path management, version info, and logging infrastructure.
/// Every binary in the workspace holds one of these for its whole lifetime.
pub struct AppContext {
    pub path_context: PathContext,
    pub version: &'static str,
    /// The log guard must be kept alive for the duration of the application
    /// to ensure log messages are properly flushed.
    _log_guard: tracing_appender::non_blocking::WorkerGuard,
}

impl AppContext {
    pub fn app_id(&self) -> &str {
        self.path_context.app_id()
    }

    pub fn version(&self) -> &'static str {
        self.version
    }

    pub fn path_context(&self) -> &PathContext {
        &self.path_context
    }
}

/// Application metadata trait.
///
/// Define your application's identity by implementing this trait.
/// This is a pure marker trait - no logic, just constants.
pub trait Application: Sized + 'static {
    const APP_ID: &'static str;
    const STUDIO: &'static str = "flowhouse";
    const PROJECT_ID: &'static str = "fork_or_flow";
    /// Environment variable holding an `EnvFilter` directive for this app.
    const LOG_ENV: Option<&'static str> = None;
}

/// Knobs for `AppBuilder::with_options`.
#[derive(Debug, Clone, Default)]
pub struct AppOptions {
    /// Overrides the detected base path (tests, portable installs).
    pub base_path: Option<PathBuf>,
    /// Also log to stdout. Keep this off while a TUI owns the terminal.
    pub console: bool,
}

/// Default filter level for the current build profile.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) { "info" } else { "warn" }
}

/// Pick the filter directive: a non-blank env value wins, otherwise the profile default.
pub fn filter_directive(env_value: Option<&str>) -> String {
    match env_value.map(str::trim) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => default_log_level().to_string(),
    }
}

fn build_filter(directive: &str) -> EnvFilter {
    EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(default_log_level()))
}

/// Builder for creating applications with proper initialization.
pub struct AppBuilder<A: Application> {
    context: AppContext,
    _marker: PhantomData<A>,
}

impl<A: Application> AppBuilder<A> {
    /// Create a new application builder.
    ///
    /// This performs all the common initialization:
    /// - Sets up path context (platform-specific directories)
    /// - Initializes file logging
    /// - Ensures all directories exist
    pub fn new(version: &'static str) -> Result<Self, BoxError> {
        Self::with_options(version, AppOptions::default())
    }

    pub fn with_options(version: &'static str, options: AppOptions) -> Result<Self, BoxError> {
        let path_context = Self::path_context(options.base_path);

        // Ensure all directories exist
        path_context.ensure_directories()?;

        // Get log file path and split into directory + filename
        let log_file_path = path_context.log_file_now();
        let log_dir = log_file_path
            .parent()
            .ok_or("log file path has no parent directory")?;
        let log_filename = log_file_path
            .file_name()
            .ok_or("log file path has no file name")?;

        let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        let env_value = A::LOG_ENV.and_then(|var| std::env::var(var).ok());
        let directive = filter_directive(env_value.as_deref());

        let file_layer = fmt::Layer::default()
            .with_target(true)
            .with_ansi(false)
            .with_writer(non_blocking)
            .with_filter(build_filter(&directive));

        let console_layer = options.console.then(|| {
            fmt::Layer::default()
                .with_target(false)
                .with_filter(build_filter(&directive))
        });

        tracing_subscriber::registry()
            .with(file_layer)
            .with(console_layer)
            .with(tracing_error::ErrorLayer::default())
            .try_init()?;

        tracing::info!(
            app = A::APP_ID,
            version,
            log_file = %log_file_path.display(),
            "logging initialized"
        );

        Ok(Self {
            context: AppContext {
                path_context,
                version,
                _log_guard: guard,
            },
            _marker: PhantomData,
        })
    }

    /// Finish initialization and hand out the context.
    pub fn build(self) -> AppContext {
        self.context
    }

    fn path_context(base_path: Option<PathBuf>) -> PathContext {
        if let Some(base) = base_path {
            return PathContext::with_base_path(base, A::STUDIO, A::PROJECT_ID, A::APP_ID);
        }

        // Development builds keep their data next to the workspace
        #[cfg(debug_assertions)]
        let path_context = PathContext::with_base_path(
            PathBuf::from(env!("CARGO_MANIFEST_DIR"))
                .join("..")
                .join("..")
                .join(".out"),
            A::STUDIO,
            A::PROJECT_ID,
            A::APP_ID,
        );
        #[cfg(not(debug_assertions))]
        let path_context = PathContext::new(A::STUDIO, A::PROJECT_ID, A::APP_ID);

        path_context
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_directive_wins_when_present() {
        assert_eq!(filter_directive(Some("debug")), "debug");
        assert_eq!(
            filter_directive(Some("  fork_or_flow=trace ")),
            "fork_or_flow=trace"
        );
    }

    #[test]
    fn blank_or_missing_env_falls_back_to_profile_default() {
        assert_eq!(filter_directive(None), default_log_level());
        assert_eq!(filter_directive(Some("   ")), default_log_level());
    }

    #[test]
    fn invalid_directive_does_not_panic() {
        let _ = build_filter("this is not [a valid] directive===");
    }
}
