use tracing::Level;
use tracing_forest::Processor;
use tracing_forest::tree::Tree;
use tracing_subscriber::prelude::*;

const CRATE_PREFIX: &str = "alpaca_observatory::";

/// Module, tree icon and most verbose level captured for it.
const MODULES: &[(&str, char, Level)] = &[
    ("discovery", '🔍', Level::DEBUG),
    ("server", '🏭', Level::DEBUG),
    ("sim", '🔭', Level::INFO),
    ("test_utils", '🧪', Level::TRACE),
];

/// Drops request spans that didn't log anything.
struct SkipSilentSpans<P>(P);

fn has_events(tree: &Tree) -> bool {
    match tree {
        Tree::Span(span) => span.nodes().iter().any(has_events),
        Tree::Event(_) => true,
    }
}

impl<P: Processor> Processor for SkipSilentSpans<P> {
    fn process(&self, tree: Tree) -> tracing_forest::processor::Result {
        if has_events(&tree) {
            self.0.process(tree)
        } else {
            Ok(())
        }
    }
}

fn module_of(target: &str) -> Option<&(&'static str, char, Level)> {
    let mut parts = target.split("::");
    let first = parts.next()?;
    // `server::discovery` belongs to discovery rather than the HTTP server.
    let module = match parts.next() {
        Some("discovery") => "discovery",
        _ => first,
    };
    MODULES.iter().find(|(name, ..)| *name == module)
}

fn target_tag(event: &tracing::Event<'_>) -> Option<tracing_forest::Tag> {
    let metadata = event.metadata();
    let target = metadata.target().strip_prefix(CRATE_PREFIX)?;

    let builder = tracing_forest::Tag::builder()
        .prefix(target)
        .level(*metadata.level());

    Some(match module_of(target) {
        Some(&(_, icon, _)) => builder.icon(icon).build(),
        None => builder.build(),
    })
}

#[ctor::ctor]
fn prepare_test_env() {
    unsafe {
        std::env::set_var("RUST_BACKTRACE", "full");
    }

    let targets = MODULES.iter().fold(
        tracing_subscriber::filter::Targets::new().with_target("alpaca_observatory", Level::INFO),
        |targets, &(module, _, level)| {
            targets.with_target(format!("{CRATE_PREFIX}{module}"), level)
        },
    );

    tracing_subscriber::registry()
        .with(targets)
        .with(tracing_forest::ForestLayer::new(
            SkipSilentSpans(tracing_forest::printer::TestCapturePrinter::new()),
            target_tag,
        ))
        .with(tracing_error::ErrorLayer::default())
        .init();

    color_eyre::config::HookBuilder::default()
        .add_frame_filter(Box::new(|frames| {
            // Backtraces only show frames from this crate.
            frames.retain(|frame| {
                frame
                    .filename
                    .as_ref()
                    .is_some_and(|filename| filename.starts_with(env!("CARGO_MANIFEST_DIR")))
            });
        }))
        .install()
        .expect("Failed to install color_eyre");
}
