//! Anchoring benchmarks
//!
//! Capture, resolution and replacement over a synthetic annotated document.
//!
//! Run with: `cargo bench --bench anchoring`

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use glossmark::markup::parse_document;
use glossmark::tree::DocTree;
use glossmark::{capture, replace, resolve, Range, StepPathCodec, TextQuoteSelector};

/// A document with many paragraphs and a sprinkling of markers.
fn synthetic_document(paragraphs: usize) -> DocTree {
    let mut markup = String::from("<body>");
    for i in 0..paragraphs {
        markup.push_str(&format!(
            concat!(
                "<p>Paragraph {i} leads in with filler text before ",
                r#"<span about="_:m{i}" property="is-occurrence-of" resource="t{i}">term {i}</span>"#,
                " and trails off with more filler after it.</p>"
            ),
            i = i
        ));
    }
    markup.push_str("</body>");
    parse_document(&markup).expect("synthetic document parses")
}

fn bench_capture(c: &mut Criterion) {
    let tree = synthetic_document(100);
    let p = tree.children(tree.root())[50];
    let text = tree.children(p)[0];

    c.bench_function("capture_mid_document", |b| {
        b.iter(|| {
            let range = Range::new(text, 10, text, 30);
            capture(
                black_box(&tree),
                tree.root(),
                black_box(&range),
                &StepPathCodec,
            )
            .unwrap()
        })
    });
}

fn bench_resolve(c: &mut Criterion) {
    let tree = synthetic_document(100);

    c.bench_function("resolve_exact", |b| {
        let selector = TextQuoteSelector::exact("term 73");
        b.iter(|| resolve(black_box(&tree), tree.root(), black_box(&selector)).unwrap())
    });

    c.bench_function("resolve_loose_fallback", |b| {
        let selector = TextQuoteSelector::exact("term  73");
        b.iter(|| resolve(black_box(&tree), tree.root(), black_box(&selector)).unwrap())
    });
}

fn bench_replace(c: &mut Criterion) {
    let tree = synthetic_document(100);
    let p = tree.children(tree.root())[50];
    let text = tree.children(p)[0];
    let range = Range::new(text, 10, text, 30);
    let selector = capture(&tree, tree.root(), &range, &StepPathCodec).unwrap();
    let markup = format!(
        r#"<span about="_:new" property="is-definition-of" resource="t50">{}</span>"#,
        selector.exact_match
    );

    c.bench_function("replace_stored_selector", |b| {
        b.iter(|| {
            replace(
                black_box(&tree),
                tree.root(),
                black_box(&selector),
                &markup,
                &StepPathCodec,
            )
            .unwrap()
        })
    });
}

criterion_group!(benches, bench_capture, bench_resolve, bench_replace);
criterion_main!(benches);
