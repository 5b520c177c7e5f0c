use divan::{Bencher, black_box};
use shelving::{DiffConfig, EqualityStrategy, Section, Snapshot};

fn main() {
    divan::main();
}

const SECTIONS: usize = 50;

/// `sections` sections of `items` items each, keyed by position.
fn build(sections: usize, items: usize) -> Snapshot<String, u64> {
    (0..sections)
        .map(|s| {
            (0..items).fold(Section::new(format!("section-{s}")), |section, i| {
                section.with_item(format!("item-{s}-{i}"), (s * items + i) as u64)
            })
        })
        .collect()
}

/// Touch every tenth payload and drop the first item of every section.
fn modify(snapshot: &Snapshot<String, u64>) -> Snapshot<String, u64> {
    snapshot
        .sections()
        .iter()
        .map(|section| {
            let mut section = section.clone();
            if !section.items.is_empty() {
                section.items.remove(0);
            }
            for item in section.items.iter_mut().step_by(10) {
                item.payload += 1;
            }
            section
        })
        .collect()
}

#[divan::bench(args = [10, 100, 1000])]
fn diff_identical(bencher: Bencher, items: usize) {
    let old = build(SECTIONS, items);
    let new = old.clone();
    let config = DiffConfig::new(EqualityStrategy::payload_eq());
    bencher.bench_local(|| {
        let script = shelving::diff_with_config(black_box(&old), black_box(&new), &config);
        black_box(script);
    });
}

#[divan::bench(args = [10, 100, 1000])]
fn diff_modified(bencher: Bencher, items: usize) {
    let old = build(SECTIONS, items);
    let new = modify(&old);
    let config = DiffConfig::new(EqualityStrategy::payload_eq());
    bencher.bench_local(|| {
        let script = shelving::diff_with_config(black_box(&old), black_box(&new), &config);
        black_box(script);
    });
}

#[divan::bench(args = [10, 100, 1000])]
fn diff_sections_shifted(bencher: Bencher, sections: usize) {
    let old = build(sections, 10);
    let mut shifted = vec![Section::new("prepended".to_string())];
    shifted.extend(old.sections().iter().cloned());
    let new = Snapshot::new(shifted);
    bencher.bench_local(|| {
        let script = shelving::diff(black_box(&old), black_box(&new));
        black_box(script);
    });
}
