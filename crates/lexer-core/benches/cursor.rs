use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use lexer_core::{Document, Encoding, LexAccessor, StyleContext, WordList};

fn large_text(line_count: usize) -> String {
    let mut out = String::with_capacity(line_count * 64);
    for i in 0..line_count {
        out.push_str(&format!(
            "{i:06} the quick brown fox jumps over the lazy dog (lexer-core benchmark line)\n"
        ));
    }
    out.pop();
    out
}

fn bench_cursor_walk(c: &mut Criterion) {
    let text = large_text(20_000);
    for (name, encoding) in [("single_byte", Encoding::SingleByte), ("utf8", Encoding::Utf8)] {
        let mut doc = Document::new(&text).with_encoding(encoding);
        let len = text.len();
        c.bench_function(&format!("cursor_walk/{name}/20k_lines"), |b| {
            b.iter(|| {
                let mut sc = StyleContext::new(0, len, 0, LexAccessor::new(&mut doc));
                let mut lines = 0usize;
                while sc.more() {
                    if sc.at_line_end {
                        lines += 1;
                    }
                    sc.forward();
                }
                sc.complete();
                black_box(lines);
            })
        });
    }
}

fn bench_word_list_lookup(c: &mut Criterion) {
    let words: Vec<String> = (0..2_000).map(|i| format!("kw{i:04}")).collect();
    let list = WordList::from_words(&words.join(" "));
    c.bench_function("word_list/in_list/2k_words", |b| {
        b.iter(|| {
            let hits = ["kw0000", "kw1999", "missing", "kw1000"]
                .iter()
                .filter(|w| list.in_list(black_box(w)))
                .count();
            black_box(hits);
        })
    });
}

fn bench_document_edit(c: &mut Criterion) {
    let text = large_text(20_000);
    c.bench_function("document/insert_newlines/10", |b| {
        b.iter_batched(
            || Document::new(&text),
            |mut doc| {
                let mut pos = doc.text().len() / 2;
                for _ in 0..10 {
                    doc.insert(pos, b"x\n");
                    pos += 2;
                }
                black_box(doc.end_styled());
            },
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(
    benches,
    bench_cursor_walk,
    bench_word_list_lookup,
    bench_document_edit
);
criterion_main!(benches);
