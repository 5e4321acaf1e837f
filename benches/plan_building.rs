//! Benchmarks for remux planning
//!
//! Measures ffprobe JSON parsing and metadata plan construction for files
//! with a growing number of streams.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::path::Path;
use streamtag_av::build_metadata_plan;
use streamtag_av::probe::parse_streams;
use streamtag_core::{CodecType, LanguageMap, StreamDescriptor};

const FFPROBE_TYPICAL: &str = r#"{
    "streams": [
        {"index": 0, "codec_type": "video", "codec_name": "hevc"},
        {"index": 1, "codec_type": "audio", "codec_name": "truehd", "tags": {"language": "eng"}},
        {"index": 2, "codec_type": "audio", "codec_name": "ac3", "tags": {"language": "jpn"}},
        {"index": 3, "codec_type": "subtitle", "codec_name": "subrip", "tags": {"language": "eng"}},
        {"index": 4, "codec_type": "subtitle", "codec_name": "webvtt", "tags": {"language": "fre"}},
        {"index": 5, "codec_type": "attachment", "codec_name": "ttf"}
    ]
}"#;

/// A file with one video stream followed by alternating audio and subtitle
/// streams, every third subtitle in an unsupported codec.
fn synthetic_streams(count: u32) -> Vec<StreamDescriptor> {
    (0..count)
        .map(|index| match index {
            0 => StreamDescriptor::new(0, CodecType::Video).with_codec("h264"),
            i if i % 2 == 1 => StreamDescriptor::new(i, CodecType::Audio)
                .with_codec("aac")
                .with_language("eng"),
            i if i % 3 == 0 => StreamDescriptor::new(i, CodecType::Subtitle).with_codec("webvtt"),
            i => StreamDescriptor::new(i, CodecType::Subtitle)
                .with_codec("ass")
                .with_language("spa"),
        })
        .collect()
}

fn bench_parse(c: &mut Criterion) {
    c.bench_function("parse_streams_typical", |b| {
        b.iter(|| parse_streams(black_box(FFPROBE_TYPICAL)))
    });
}

fn bench_metadata_plan(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_metadata_plan");
    let input = Path::new("/media/show/episode.mkv");
    let output = Path::new("/media/show/episode.mkv.temp.mkv");

    for count in [4u32, 16, 64] {
        let streams = synthetic_streams(count);
        let languages = LanguageMap::from_streams(&streams);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &streams, |b, streams| {
            b.iter(|| {
                build_metadata_plan(
                    black_box(input),
                    black_box(output),
                    black_box(streams),
                    &languages,
                    "Release Group",
                )
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse, bench_metadata_plan);
criterion_main!(benches);
