//! Performance benchmarks for rewire
//!
//! These benchmarks measure the performance of key operations:
//! - File walking with extension and directory filters
//! - Rule table application on different content sizes
//! - Full migration runs, sequential and parallel
//!
//! ## Running Benchmarks
//!
//! ```bash
//! cargo bench
//! cargo bench rule_application
//! ```
//!
//! Migration benchmarks run in dry-run mode so every iteration sees the
//! same unmigrated tree.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rewire::TraversalFilter;
use rewire::engine::{FileWalker, WriteBackCoordinator, migrate};
use rewire::rules::{GLOBAL_TABLE, RuleDefinition, RuleSet, RuleTable};
use std::fs;
use tempfile::TempDir;

// ============================================================================
// Helper Functions
// ============================================================================

/// Create a temporary tree of Dart files, some under an excluded directory
fn create_test_files(count: usize, calls_per_file: usize) -> TempDir {
    let temp_dir = TempDir::new().unwrap();

    for i in 0..count {
        let dir = if i % 10 == 0 {
            temp_dir.path().join("build")
        } else {
            temp_dir.path().join(format!("screens{}", i % 8))
        };
        fs::create_dir_all(&dir).unwrap();

        let content = format!(
            "import '../services/api_service.dart';\n\nclass Screen{} {{\n{}}}\n",
            i,
            "  final r = ApiService.login(user, pass);\n".repeat(calls_per_file)
        );
        fs::write(dir.join(format!("screen{}.dart", i)), content).unwrap();
    }

    temp_dir
}

fn migration_rules() -> Vec<RuleDefinition> {
    vec![
        RuleDefinition::regex(r"ApiService\.login\(", "AuthRoutes.login("),
        RuleDefinition::regex(r"ApiService\.getProperties\(", "PropertyRoutes.getProperties("),
        RuleDefinition::literal(
            "import '../services/api_service.dart';",
            "import '../providers/api_routes/auth_routes.dart';",
        ),
    ]
}

fn rule_set() -> RuleSet {
    RuleSet::new(RuleTable::new(GLOBAL_TABLE, &migration_rules()).unwrap())
}

fn dart_filter() -> TraversalFilter {
    TraversalFilter::new()
        .include_extension("dart")
        .exclude_dir("build")
}

// ============================================================================
// File Walking Benchmarks
// ============================================================================

fn bench_file_walking(c: &mut Criterion) {
    let mut group = c.benchmark_group("file_walking");

    for file_count in [10, 100, 500].iter() {
        let temp_dir = create_test_files(*file_count, 5);
        group.throughput(Throughput::Elements(*file_count as u64));

        group.bench_with_input(
            BenchmarkId::new("unfiltered", file_count),
            file_count,
            |b, _| {
                b.iter(|| {
                    let walker = FileWalker::new(temp_dir.path(), TraversalFilter::new()).unwrap();
                    let files: Vec<_> = walker.walk().collect();
                    black_box(files)
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("extension_and_prune", file_count),
            file_count,
            |b, _| {
                b.iter(|| {
                    let walker = FileWalker::new(temp_dir.path(), dart_filter()).unwrap();
                    let files: Vec<_> = walker.walk().collect();
                    black_box(files)
                });
            },
        );
    }

    group.finish();
}

// ============================================================================
// Rule Application Benchmarks
// ============================================================================

fn bench_rule_application(c: &mut Criterion) {
    let mut group = c.benchmark_group("rule_application");
    let table = RuleTable::new(GLOBAL_TABLE, &migration_rules()).unwrap();

    for calls in [10, 100, 1_000].iter() {
        let matching = "  final r = ApiService.login(user, pass);\n".repeat(*calls);
        let clean = "  final r = AuthRoutes.login(user, pass);\n".repeat(*calls);

        group.throughput(Throughput::Bytes(matching.len() as u64));

        group.bench_with_input(BenchmarkId::new("matching", calls), &matching, |b, content| {
            b.iter(|| black_box(table.apply(black_box(content))));
        });

        group.bench_with_input(BenchmarkId::new("already_migrated", calls), &clean, |b, content| {
            b.iter(|| black_box(table.apply(black_box(content))));
        });
    }

    group.finish();
}

// ============================================================================
// Full Migration Benchmarks
// ============================================================================

fn bench_full_migration(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_migration");
    group.sample_size(10);

    let temp_dir = create_test_files(200, 50);
    let coordinator = WriteBackCoordinator::new(rule_set()).dry_run(true);
    group.throughput(Throughput::Elements(200));

    for parallel in [false, true] {
        let name = if parallel { "parallel" } else { "sequential" };
        group.bench_function(name, |b| {
            b.iter(|| {
                let report = migrate(temp_dir.path(), dart_filter(), &coordinator, parallel).unwrap();
                black_box(report)
            });
        });
    }

    group.finish();
}

// ============================================================================
// Benchmark Registration
// ============================================================================

criterion_group!(file_benches, bench_file_walking,);

criterion_group!(rule_benches, bench_rule_application,);

criterion_group!(workflow_benches, bench_full_migration,);

criterion_main!(file_benches, rule_benches, workflow_benches);
