mod tracer_engine;

pub use tracer_engine::{TracerEngine, TracerOptions};

/// Should be called at the start of each binary.
/// The calling crate must depend on `tracing`.
#[macro_export]
macro_rules! init_tracer {
    ($options:expr) => {{
        let tracer = $crate::tracer::TracerEngine::new($options, env!("CARGO_BIN_NAME"));
        // This is called here (in the macro) rather than as part of `TracerEngine::new`
        // to ensure the event is emitted in the correct module.
        tracing::debug!(
            "Tracer initialised for {} at level {}",
            tracer.service_name(),
            tracer.default_level()
        );
        tracer
    }};
}
