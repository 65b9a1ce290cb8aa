use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use medicore_desk::assistant::classify;

/// Generate synthetic chat messages spread across the intent categories
fn generate_messages(num_messages: usize) -> Vec<String> {
    let templates = [
        "find resources about {}",
        "explain {} to me like I'm new to this",
        "can you summarize the chapter on {}",
        "what should I study next after {}",
        "search the library for {} textbooks",
        "what does {} mean",
        "give me an overview of {}",
        "I have a question about {}",
    ];
    let subjects = [
        "cardiology",
        "renal physiology",
        "pharmacokinetics",
        "sepsis",
        "the nephron",
        "beta blockers",
        "acid-base balance",
    ];

    (0..num_messages)
        .map(|i| {
            let template = templates[i % templates.len()];
            let subject = subjects[i % subjects.len()];
            template.replace("{}", subject)
        })
        .collect()
}

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("intent_classification");

    for size in [100, 1_000, 10_000].iter() {
        let messages = generate_messages(*size);

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| {
                for message in &messages {
                    black_box(classify(black_box(message)));
                }
            })
        });
    }

    group.finish();
}

fn bench_classify_single(c: &mut Criterion) {
    // Worst case: no rule matches, every rule table entry is scanned
    c.bench_function("classify_no_match", |b| {
        b.iter(|| classify(black_box("good morning, how are you today")))
    });

    c.bench_function("classify_first_rule", |b| {
        b.iter(|| classify(black_box("search for anatomy atlases")))
    });
}

criterion_group!(benches, bench_classify, bench_classify_single);
criterion_main!(benches);
