use criterion::{BatchSize, Criterion, criterion_group, criterion_main};

use exonkit::annotation::{AnnotationGraph, ChromosomeKey, MatchType, Status};
use exonkit::locate::locate_exons;
use exonkit::source::MemorySequence;
use exonkit::strand::Strand;

const CHROMOSOME_LEN: usize = 1_000_000;
const EXONS: u64 = 200;
const SHIFT: usize = 1_234;

/// Deterministic pseudo-random bases.
fn synthetic_chromosome(len: usize) -> Vec<u8> {
    let mut state: u64 = 0x2545_F491_4F6C_DD1D;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            b"ACGT"[(state % 4) as usize]
        })
        .collect()
}

fn graph_with_exons() -> (AnnotationGraph, ChromosomeKey) {
    let mut graph = AnnotationGraph::new();
    let chr = graph.get_or_insert_chromosome("1");
    let gene = graph.get_or_insert_gene(chr, "1", "SYN", Strand::Positive);
    let acc = graph.get_or_insert_accession(gene, "NC_1");
    let (cds, _) =
        graph.get_or_insert_coding_sequence(acc, "CCDS1.1", Status::Public, MatchType::Identical);
    let stride = (CHROMOSOME_LEN as u64 - 1_000) / EXONS;
    for i in 0..EXONS {
        let from = i * stride;
        graph.get_or_insert_exon(cds, from, from + 149).unwrap();
    }
    (graph, chr)
}

fn bench_locate(c: &mut Criterion) {
    let reference_bases = synthetic_chromosome(CHROMOSOME_LEN);
    let mut target = synthetic_chromosome(SHIFT);
    target.extend_from_slice(&reference_bases);

    c.bench_function("locate 200 exons in 1 Mb", |b| {
        b.iter_batched(
            graph_with_exons,
            |(mut graph, chr)| {
                let mut reference = MemorySequence::new("ref", reference_bases.clone());
                let report = locate_exons(&mut graph, chr, &mut reference, &target).unwrap();
                assert_eq!(report.located as u64, EXONS);
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_locate);
criterion_main!(benches);
