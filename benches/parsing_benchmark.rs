use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::io::Write;
use tempfile::TempDir;
use weather_pipeline::readers::ObservationReader;

// Create a synthetic station file with the given number of daily lines
fn create_station_file(dir: &TempDir, lines: usize) -> std::path::PathBuf {
    let path = dir.path().join(format!("BENCH{}.txt", lines));
    let mut file = std::fs::File::create(&path).unwrap();

    let base_date = chrono::NaiveDate::from_ymd_opt(1985, 1, 1).unwrap();
    for i in 0..lines {
        let date = base_date + chrono::Duration::days(i as i64);
        let max_temp = 200 + (i % 150) as i32;
        let min_temp = max_temp - 100;
        // Every 20th precipitation reading is the missing sentinel
        let precipitation = if i % 20 == 0 { -9999 } else { (i % 300) as i32 };
        writeln!(
            file,
            "{}\t{}\t{}\t{}",
            date.format("%Y%m%d"),
            max_temp,
            min_temp,
            precipitation
        )
        .unwrap();
    }

    path
}

fn benchmark_file_parsing(c: &mut Criterion) {
    let dir = TempDir::new().unwrap();
    let mut group = c.benchmark_group("observation_parsing");

    for &lines in &[1_000usize, 10_000] {
        let path = create_station_file(&dir, lines);
        group.bench_with_input(BenchmarkId::new("read_observations", lines), &path, |b, path| {
            let reader = ObservationReader::new();
            b.iter(|| {
                let records = reader.read_observations(black_box(path)).unwrap();
                black_box(records)
            });
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_file_parsing);
criterion_main!(benches);
