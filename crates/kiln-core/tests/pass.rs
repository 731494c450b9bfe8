//! A whole pass: progress while plugins run, slow-plugin warnings, summary at the end.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use chrono::Duration as Millis;
use kiln_config::ReporterConfig;
use kiln_core::{
    Asset, BoxError, CallbackPlugin, Completion, GeneratedFile, ManualScheduler, MemorySink, PassReporter,
    PipelineFile, Plugin, Severity, SourceFile, TransformOutput,
};
use parking_lot::Mutex;

#[derive(Clone, Default)]
struct Coffee {
    pending: Arc<Mutex<Option<Completion>>>,
}

impl CallbackPlugin for Coffee {
    fn name(&self) -> &str {
        "coffee-script"
    }

    fn supports(&self, method: &str) -> bool {
        method == "compile"
    }

    fn call(&self, _method: &str, data: &str, _path: &Path, done: Completion) -> Result<(), BoxError> {
        if data.is_empty() {
            done.ok(TransformOutput::new(""));
        } else {
            *self.pending.lock() = Some(done);
        }
        Ok(())
    }
}

#[tokio::test]
async fn pass_logs_progress_warnings_and_summary_in_order() {
    let config = ReporterConfig {
        watchdog_interval_ms: 1_000,
        progress_interval_ms: 400,
        ..ReporterConfig::default()
    };
    let scheduler = Arc::new(ManualScheduler::new());
    let sink = MemorySink::new();
    let mut reporter = PassReporter::new(&config, scheduler.clone(), Arc::new(sink.clone()));
    let invoker = reporter.invoker();

    let pass = reporter.begin();
    let plugin = Coffee::default();
    let registered = Plugin::callback(plugin.clone());
    let file = PipelineFile::new("app/main.coffee", "x = 1");

    let mut invocation = Box::pin(invoker.invoke(&registered, "compile", &file));
    assert!(futures::poll!(&mut invocation).is_pending());

    scheduler.advance(Duration::from_millis(1_000));
    let pending = plugin.pending.lock().take().unwrap();
    pending.ok(TransformOutput::new("var x = 1;"));
    assert_eq!(invocation.await.unwrap().data, "var x = 1;");

    let mut snapshot = pass.snapshot();
    snapshot.generated_files.push(GeneratedFile {
        path: "public/app.js".into(),
        source_files: vec![SourceFile {
            path: "app/main.coffee".into(),
            compilation_time: pass.start_time() + Millis::milliseconds(990),
        }],
    });
    snapshot.assets.push(Asset {
        path: "app/assets/index.html".into(),
        copy_time: pass.start_time() + Millis::milliseconds(3),
    });
    let line = reporter.finish_at(&snapshot, pass.start_time() + Millis::milliseconds(1_010));

    assert_eq!(line, "compiled main.coffee into app.js, copied index.html in 1.0 sec");

    let lines = sink.lines();
    // Ticks are due just under 400 ms and 800 ms; the watchdog at 1000 ms.
    assert_eq!(
        lines,
        vec![
            (Severity::Info, "compiling".to_string()),
            (Severity::Info, "compiling.".to_string()),
            (
                Severity::Warn,
                "coffee-script is taking too long to compile @ app/main.coffee".to_string()
            ),
            (Severity::Info, line.clone()),
        ]
    );

    scheduler.advance(Duration::from_secs(10));
    assert_eq!(sink.lines().len(), 4);
    assert_eq!(scheduler.live_timers(), 0);
}

#[tokio::test]
async fn fast_plugin_produces_no_warnings() {
    let scheduler = Arc::new(ManualScheduler::new());
    let sink = MemorySink::new();
    let mut reporter = PassReporter::new(
        &ReporterConfig {
            progress: false,
            ..ReporterConfig::default()
        },
        scheduler.clone(),
        Arc::new(sink.clone()),
    );

    let pass = reporter.begin();
    let output = reporter
        .invoker()
        .invoke(&Plugin::callback(Coffee::default()), "compile", &PipelineFile::new("a.coffee", ""))
        .await
        .unwrap();
    assert_eq!(output.data, "");

    scheduler.advance(Duration::from_secs(60));
    reporter.finish_at(&pass.snapshot(), pass.start_time() + Millis::milliseconds(12));

    assert!(sink.warnings().is_empty());
    assert_eq!(sink.infos(), vec!["compiled in 12 ms"]);
}
