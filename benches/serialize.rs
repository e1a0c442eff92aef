use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use metskit::*;

fn create_package(pages: usize) -> Mets {
    let mut mets =
        Mets::new(MetsProfile::CulturalHeritage, "bench", "urn:uuid:bench", "Archive").unwrap();

    let agent = Metadata::try_from(DigitalProvenanceAgentMetadata::new(
        "local",
        "scanner",
        "scanner",
        AgentType::Hardware,
    ))
    .unwrap();
    let mut event = Metadata::try_from(DigitalProvenanceEventMetadata::new(
        "digitization",
        "Scanning",
        EventOutcome::Success,
        "Scanned",
    ))
    .unwrap();
    event.link_agent_metadata(&agent, "executing hardware").unwrap();

    let mut root = StructuralMapDiv::new("book");
    let mut divs = Vec::with_capacity(pages);
    for i in 0..pages {
        let mut object = DigitalObject::new(format!("data/page-{:04}.tif", i)).unwrap();
        object
            .add_metadata([
                Metadata::try_from(TechnicalObjectMetadata::file(
                    "image/tiff",
                    "6.0",
                    ChecksumAlgorithm::Md5,
                    format!("{:032x}", i),
                ))
                .unwrap(),
                Metadata::try_from(TechnicalImageMetadata::new(
                    "Uncompressed", "srgb", "2480", "3508", "8", "integer", "3",
                ))
                .unwrap(),
            ])
            .unwrap();

        let mut div = StructuralMapDiv::new("page").with_order(i as u32 + 1);
        div.add_digital_objects([object.into_handle()]).unwrap();
        div.add_metadata([event.clone(), agent.clone()]);
        divs.push(div);
    }
    root.add_divs(divs).unwrap();
    root.add_metadata([Metadata::try_from(
        DescriptiveMetadata::new().with_element("title", "Benchmark volume"),
    )
    .unwrap()]);

    mets.add_structural_maps([StructuralMap::new(root)]);
    mets.generate_file_references().unwrap();
    mets
}

fn bench_serialize_small(c: &mut Criterion) {
    let mets = create_package(10);
    c.bench_function("serialize_10_pages", |b| {
        b.iter(|| {
            let _xml = black_box(&mets).serialize().unwrap();
        });
    });
}

fn bench_serialize_large(c: &mut Criterion) {
    let mets = create_package(500);
    c.bench_function("serialize_500_pages", |b| {
        b.iter(|| {
            let _xml = black_box(&mets).serialize().unwrap();
        });
    });
}

fn bench_serialize_compact(c: &mut Criterion) {
    let mets = create_package(100);
    let options = SerializerOptions::default().compact();
    c.bench_function("serialize_compact", |b| {
        b.iter(|| {
            let _xml = black_box(&mets).serialize_with(black_box(&options)).unwrap();
        });
    });
}

criterion_group!(
    benches,
    bench_serialize_small,
    bench_serialize_large,
    bench_serialize_compact
);
criterion_main!(benches);
