// ABOUTME: Criterion benchmarks for the training intelligence analyzers and pipeline
// ABOUTME: Measures context aggregation, risk detection, progression and plateau analysis
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 IronCoach Contributors

//! Criterion benchmarks for the analyzers.
//!
//! Measures the hot progression path against the on-demand plateau path over
//! one block, one season and one year of history.

#![allow(clippy::missing_docs_in_private_items, missing_docs)]

mod common;

use common::fixtures::{athlete, exercise, generate_log, reference_date, HistorySize};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use ironcoach::intelligence::config::IntelligenceConfig;
use ironcoach::intelligence::fatigue_detection::OvertrainingDetector;
use ironcoach::intelligence::periodization::PeriodizationEngine;
use ironcoach::intelligence::plateau_analyzer::{PlateauAnalyzer, PlateauInput};
use ironcoach::intelligence::progression_engine::{ProgressionEngine, ProgressionInput};
use ironcoach::intelligence::training_context::TrainingContextAggregator;
use ironcoach::models::{AnalysisWindow, TrainingLog};
use ironcoach::{InMemoryStore, IntelligencePipeline};

const SIZES: [HistorySize; 3] = [HistorySize::Block, HistorySize::Season, HistorySize::Year];

fn datasets() -> Vec<(i64, TrainingLog)> {
    SIZES
        .iter()
        .map(|size| (size.weeks(), generate_log(*size)))
        .collect()
}

/// Benchmark context aggregation with varying history lengths
fn bench_training_context(c: &mut Criterion) {
    let mut group = c.benchmark_group("training_context");
    let config = IntelligenceConfig::default();

    for (weeks, log) in datasets() {
        group.throughput(Throughput::Elements(log.sets.len() as u64));
        group.bench_with_input(BenchmarkId::new("summarize", weeks), &log, |b, log| {
            b.iter(|| {
                TrainingContextAggregator::summarize(
                    athlete(),
                    AnalysisWindow::new(reference_date(), config.context.window_weeks),
                    black_box(log),
                    &config.context,
                )
            });
        });
    }

    group.finish();
}

/// Benchmark the detector and phase engine on one block
fn bench_risk_and_phase(c: &mut Criterion) {
    let mut group = c.benchmark_group("risk_and_phase");
    let config = IntelligenceConfig::default();
    let log = generate_log(HistorySize::Block);
    let summary = TrainingContextAggregator::summarize(
        athlete(),
        AnalysisWindow::new(reference_date(), config.context.window_weeks),
        &log,
        &config.context,
    );

    group.bench_function("overtraining_assessment", |b| {
        b.iter(|| OvertrainingDetector::assess(black_box(&summary), &config.fatigue));
    });

    let assessment = OvertrainingDetector::assess(&summary, &config.fatigue);
    group.bench_function("periodization_assessment", |b| {
        b.iter(|| {
            PeriodizationEngine::assess(
                black_box(&summary),
                Some(&assessment),
                None,
                &config.periodization,
            )
        });
    });

    group.finish();
}

/// Benchmark the hot progression path for one exercise
fn bench_progression(c: &mut Criterion) {
    let mut group = c.benchmark_group("progression");
    let config = IntelligenceConfig::default();
    let squat = exercise(0);

    for (weeks, log) in datasets() {
        let summary = TrainingContextAggregator::summarize(
            athlete(),
            AnalysisWindow::new(reference_date(), config.context.window_weeks),
            &log,
            &config.context,
        );
        let assessment = OvertrainingDetector::assess(&summary, &config.fatigue);
        let periodization =
            PeriodizationEngine::assess(&summary, Some(&assessment), None, &config.periodization);

        group.bench_with_input(BenchmarkId::new("recommend", weeks), &log, |b, log| {
            b.iter(|| {
                let input = ProgressionInput {
                    exercise_id: &squat,
                    as_of: reference_date(),
                    log: black_box(log),
                    profile: None,
                    weekly_frequency: Some(4.0),
                    context: Some(&summary),
                    assessment: Some(&assessment),
                    periodization: Some(&periodization),
                    plateau: None,
                };
                ProgressionEngine::recommend(&input, &config.progression)
            });
        });
    }

    group.finish();
}

/// Benchmark plateau analysis sequentially and in parallel across exercises
fn bench_plateau_analysis(c: &mut Criterion) {
    let mut group = c.benchmark_group("plateau_analysis");
    group.sample_size(50);
    let config = IntelligenceConfig::default();
    let log = generate_log(HistorySize::Year);
    let exercises: Vec<_> = (0..6).map(exercise).collect();
    let inputs: Vec<PlateauInput<'_>> = exercises
        .iter()
        .map(|exercise_id| PlateauInput {
            exercise_id,
            exercise: None,
            as_of: reference_date(),
            log: &log,
            profile: None,
            periodization: None,
        })
        .collect();

    group.throughput(Throughput::Elements(inputs.len() as u64));
    group.bench_function("sequential_6_exercises", |b| {
        b.iter(|| {
            inputs
                .iter()
                .map(|input| PlateauAnalyzer::analyze(black_box(input), &config.plateau))
                .collect::<Vec<_>>()
        });
    });
    group.bench_function("parallel_6_exercises", |b| {
        b.iter(|| PlateauAnalyzer::analyze_many(black_box(&inputs), &config.plateau));
    });

    group.finish();
}

/// Benchmark the full report over the in-memory store
fn bench_report(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    group.sample_size(30);
    let config = IntelligenceConfig::default();
    let log = generate_log(HistorySize::Year);

    let Ok(runtime) = tokio::runtime::Runtime::new() else {
        return;
    };
    let store = InMemoryStore::new();
    runtime.block_on(async {
        for session in log.sessions.clone() {
            store.insert_session(session).await;
        }
        store.insert_sets(log.sets.clone()).await;
    });

    group.bench_function("full_report_one_year", |b| {
        b.to_async(&runtime).iter(|| async {
            let pipeline = IntelligencePipeline::new(&store, &store, &store, &config);
            pipeline.report(athlete(), reference_date(), None).await.ok()
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_training_context,
    bench_risk_and_phase,
    bench_progression,
    bench_plateau_analysis,
    bench_report,
);
criterion_main!(benches);
