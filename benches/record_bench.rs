use criterion::{Criterion, criterion_group, criterion_main};
use resizable_record::{FieldDescriptor, RecordLayout, ResizableRecord};
use std::hint::black_box;

// ─── Test Data ──────────────────────────────────────────────────────────────

/// Schema with three arrays between fixed fields:
/// {
///   "id": u64, "flags": u32, "version": u16,
///   "samples": [f32], "tags": [u8], "links": [u64], "weights": [f64]
/// }
fn make_layout() -> RecordLayout {
    RecordLayout::auto([
        FieldDescriptor::of::<u64>("id"),
        FieldDescriptor::array_of::<f32>("samples"),
        FieldDescriptor::of::<u32>("flags"),
        FieldDescriptor::array_of::<u8>("tags"),
        FieldDescriptor::of::<u16>("version"),
        FieldDescriptor::array_of::<u64>("links"),
        FieldDescriptor::array_of::<f64>("weights"),
    ])
    .unwrap()
}

fn make_record(layout: &RecordLayout) -> ResizableRecord<'_> {
    let lengths = layout
        .lengths_from([("samples", 64), ("tags", 16), ("links", 8), ("weights", 32)])
        .unwrap();
    let mut rec = ResizableRecord::new(layout, lengths).unwrap();
    rec.set("id", 42u64).unwrap();
    rec.set("flags", 7u32).unwrap();
    rec.set("version", 1u16).unwrap();
    rec
}

// ═══════════════════════════════════════════════════════════════════════════
// Group 1: Layout arithmetic
// ═══════════════════════════════════════════════════════════════════════════

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");
    let layout = make_layout();
    let lengths = layout
        .lengths_from([("samples", 64), ("tags", 16), ("links", 8), ("weights", 32)])
        .unwrap();

    group.bench_function("calc_size", |b| {
        b.iter(|| black_box(layout.calc_size(black_box(&lengths))))
    });

    group.bench_function("offset_of (last field)", |b| {
        b.iter(|| black_box(layout.offset_of(black_box(&lengths), black_box("tags"))))
    });

    group.bench_function("spans (all fields)", |b| {
        b.iter(|| black_box(layout.spans(black_box(&lengths))))
    });

    group.finish();
}

// ═══════════════════════════════════════════════════════════════════════════
// Group 2: Field access
// ═══════════════════════════════════════════════════════════════════════════

fn bench_access(c: &mut Criterion) {
    let mut group = c.benchmark_group("access");
    let layout = make_layout();
    let mut rec = make_record(&layout);

    group.bench_function("get::<u64>", |b| {
        b.iter(|| black_box(rec.get::<u64>(black_box("id")).copied()))
    });

    group.bench_function("get_slice::<f64>", |b| {
        b.iter(|| black_box(rec.get_slice::<f64>(black_box("weights")).map(|s| s.len())))
    });

    group.bench_function("set::<u32>", |b| {
        b.iter(|| black_box(rec.set(black_box("flags"), black_box(9u32))))
    });

    group.finish();
}

// ═══════════════════════════════════════════════════════════════════════════
// Group 3: Resize
// ═══════════════════════════════════════════════════════════════════════════

fn bench_resize(c: &mut Criterion) {
    let mut group = c.benchmark_group("resize");
    let layout = make_layout();

    group.bench_function("resize (no-op)", |b| {
        let mut rec = make_record(&layout);
        let same = rec.lengths().clone();
        b.iter(|| black_box(rec.resize(black_box(same.clone()))))
    });

    group.bench_function("resize (grow/shrink samples)", |b| {
        let mut rec = make_record(&layout);
        let small = rec.lengths().clone();
        let mut big = small.clone();
        big.set(&layout, "samples", 256).unwrap();
        let mut grow = true;
        b.iter(|| {
            let next = if grow { big.clone() } else { small.clone() };
            grow = !grow;
            black_box(rec.resize(next))
        })
    });

    group.finish();
}

// ─── Criterion Main ─────────────────────────────────────────────────────────

criterion_group!(benches, bench_layout, bench_access, bench_resize);
criterion_main!(benches);
