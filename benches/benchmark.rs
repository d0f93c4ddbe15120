use criterion::{criterion_group, criterion_main, Criterion};
use word_tally::{WordStore, AGGREGATE_GROUP};

const WORDS: &[&str] = &[
    "the", "project", "gutenberg", "ebook", "of", "war", "and", "peace", "by", "leo", "tolstoy",
    "hello,", "world!", "(maybe)", "rust", "is", "fast", "https://example.com/page", "<:pog:42>",
];

fn synthetic_messages(n: usize) -> Vec<(String, String)> {
    (0..n)
        .map(|i| {
            let text: Vec<&str> = (0..12).map(|j| WORDS[(i * 7 + j * 3) % WORDS.len()]).collect();
            (text.join(" "), format!("user{}", i % 50))
        })
        .collect()
}

fn build_and_rank_benchmark(c: &mut Criterion) {
    let messages = synthetic_messages(20_000);

    c.bench_function("build", |b| {
        b.iter(|| {
            let mut store = WordStore::new();
            for (text, author) in &messages {
                store.build(text, author, true);
            }
            store
        });
    });

    let mut store = WordStore::new();
    for (text, author) in &messages {
        store.build(text, author, true);
    }

    c.bench_function("top_words", |b| {
        b.iter(|| store.top_words(AGGREGATE_GROUP, 5));
    });

    c.bench_function("rank_groups_by_word", |b| {
        b.iter(|| store.rank_groups_by_word("rust", 5));
    });
}

criterion_group!(benches, build_and_rank_benchmark);
criterion_main!(benches);
