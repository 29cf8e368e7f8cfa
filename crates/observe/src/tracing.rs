use {
    std::{panic::PanicHookInfo, sync::Once},
    time::macros::format_description,
    tracing::{Level, level_filters::LevelFilter},
    tracing_subscriber::{
        EnvFilter,
        Layer,
        fmt::{time::UtcTime, writer::MakeWriterExt as _},
        prelude::*,
        util::SubscriberInitExt,
    },
};

/// Installs the process wide subscriber filtered by `env_filter` (an
/// `EnvFilter` directive such as `warn,harness=debug`) and routes panics into
/// the log. Events at or above `stderr_threshold` go to stderr, the rest to
/// stdout. Only the first call in a process has an effect, so every forked
/// test may call it.
pub fn initialize_reentrant(env_filter: &str, stderr_threshold: LevelFilter) {
    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        install_subscriber(env_filter, stderr_threshold);
        std::panic::set_hook(Box::new(log_panic));
    });
}

fn install_subscriber(env_filter: &str, stderr_threshold: LevelFilter) {
    let stderr_from = stderr_threshold.into_level().unwrap_or(Level::ERROR);
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(
            std::io::stderr
                .with_max_level(stderr_from)
                .or_else(std::io::stdout),
        )
        .with_timer(UtcTime::new(format_description!(
            "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
        )))
        .with_ansi(atty::is(atty::Stream::Stdout))
        .with_filter(EnvFilter::new(env_filter));

    if tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        tracing::debug!("another subscriber is already installed");
        return;
    }
    tracing::debug!(filter = env_filter, "logging initialized");
}

fn log_panic(panic: &PanicHookInfo) {
    let thread = std::thread::current();
    let backtrace = std::backtrace::Backtrace::force_capture();
    tracing::error!(
        thread = thread.name().unwrap_or("<unnamed>"),
        "{panic}\n{backtrace}"
    );
}
