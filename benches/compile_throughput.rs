//! Benchmarks for model compilation and registry bootstrap
//!
//! Run with: cargo bench --bench compile_throughput

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use schemabridge::client::LocalStorageClient;
use schemabridge::compiler::SchemaCompiler;
use schemabridge::config::RegistryConfig;
use schemabridge::model::{Column, DeclaredType, DownSampling, Model};
use schemabridge::registry::MetadataRegistry;

fn create_stream_model(num_columns: usize) -> Model {
    let mut columns = vec![
        Column::new("service_id", DeclaredType::Text).sharding_key(0),
        Column::new("trace_id", DeclaredType::Text).global_indexing(true),
        Column::new("data_binary", DeclaredType::Bytes).storage_only(true),
    ];
    for i in 0..num_columns {
        columns.push(Column::new(format!("tag_{}", i), DeclaredType::Text));
    }
    Model::record("segment", columns)
}

fn create_measure_model(name: &str) -> Model {
    Model::aggregate(
        name,
        vec![
            Column::new("entity_id", DeclaredType::Text),
            Column::new("service_id", DeclaredType::Text),
            Column::new("value", DeclaredType::Long),
        ],
        DownSampling::Minute,
    )
    .with_value_column("value")
}

fn benchmark_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile");
    let compiler = SchemaCompiler::new(RegistryConfig::from_env());

    for num_columns in [10, 100, 1000] {
        let model = create_stream_model(num_columns);
        group.throughput(Throughput::Elements(model.columns.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("stream_columns", num_columns),
            &model,
            |b, model| {
                b.iter(|| black_box(compiler.compile(model).unwrap()));
            },
        );
    }

    let measure = create_measure_model("service_cpm");
    group.throughput(Throughput::Elements(1));
    group.bench_function("measure", |b| {
        b.iter(|| black_box(compiler.compile(&measure).unwrap()));
    });

    group.finish();
}

fn benchmark_bootstrap(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    let mut group = c.benchmark_group("bootstrap");
    let models: Vec<Model> = (0..100)
        .map(|i| create_measure_model(&format!("metric_{}", i)))
        .collect();
    group.throughput(Throughput::Elements(models.len() as u64));

    group.bench_function("fresh_engine", |b| {
        b.to_async(&rt).iter_batched(
            || (MetadataRegistry::default(), LocalStorageClient::new()),
            |(registry, client)| {
                let models = &models;
                async move {
                    let definitions = registry.bootstrap_all(models, &client).await.unwrap();
                    black_box(definitions);
                }
            },
            criterion::BatchSize::SmallInput,
        );
    });

    // every schema already exists remotely
    let client = LocalStorageClient::new();
    rt.block_on(async {
        MetadataRegistry::default()
            .bootstrap_all(&models, &client)
            .await
            .unwrap();
    });
    group.bench_function("existing_schemas", |b| {
        b.to_async(&rt).iter(|| async {
            let registry = MetadataRegistry::default();
            let definitions = registry.bootstrap_all(&models, &client).await.unwrap();
            black_box(definitions);
        });
    });

    group.finish();
}

fn benchmark_lookup(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    let mut group = c.benchmark_group("lookup");
    group.throughput(Throughput::Elements(1));

    let registry = MetadataRegistry::default();
    rt.block_on(async {
        for i in 0..1000 {
            registry
                .register(&create_measure_model(&format!("metric_{}", i)))
                .await
                .unwrap();
        }
    });

    group.bench_function("hit", |b| {
        b.iter(|| black_box(registry.lookup("metric_500")));
    });
    group.bench_function("miss", |b| {
        b.iter(|| black_box(registry.lookup("unknown_metric")));
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_compile,
    benchmark_bootstrap,
    benchmark_lookup,
);

criterion_main!(benches);
