//! End-to-end project analysis, sequential against parallel

use archmap::pipeline::{AnalysisServices, PipelineOptions, ProjectAnalyzer};
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use tempfile::TempDir;

fn create_project(files: usize) -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let pkg = dir.path().join("pkg");
    std::fs::create_dir_all(&pkg).expect("Failed to create package dir");
    std::fs::write(pkg.join("__init__.py"), "").expect("Failed to write __init__.py");
    for i in 0..files {
        let code = format!(
            "from . import m{next}\n\nclass Service{i}:\n    def handle(self, request):\n        if request and request.ok:\n            return m{next}.process(request)\n        return None\n",
            next = (i + 1) % files
        );
        std::fs::write(pkg.join(format!("m{i}.py")), code).expect("Failed to write module");
    }
    dir
}

fn bench_run(c: &mut Criterion) {
    let project = create_project(60);
    let mut group = c.benchmark_group("project_analysis");
    group.sample_size(10);

    for parallel in [false, true] {
        let analyzer = ProjectAnalyzer::new(
            AnalysisServices::default(),
            PipelineOptions {
                parallel,
                ..PipelineOptions::default()
            },
        );
        let name = if parallel { "parallel" } else { "sequential" };
        group.bench_function(name, |b| {
            b.iter(|| black_box(analyzer.run(project.path()).expect("analysis failed")));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_run);
criterion_main!(benches);
