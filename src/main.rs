//! Kemas demo - encode sample record lalu benchmark get/set
//!
//! Usage:
//!   cargo run --release -- [--endian big] [--iterations N] [--schema PATH]

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use kemas::{Decode, Endian, FieldLayout, FieldType, Layout, Record, Value};

const SAMPLE_SCHEMA: &str = "\
# sample telemetry record
id        u32
flag      bool
name      u8   8
seq       u64
temp      f32
deltas    i16  4
ratio     f64
";

/// Demo configuration
#[derive(Parser, Debug)]
#[command(version, about = "Encode a sample packed record and benchmark field access")]
struct Args {
    /// Byte order: little | big
    #[arg(short, long, default_value = "little")]
    endian: Endian,

    /// Iterations per benchmark
    #[arg(short, long, default_value_t = 1_000_000)]
    iterations: usize,

    /// Text schema file (`name type [count]` per line)
    #[arg(short, long)]
    schema: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("❌ Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    println!("📦 Kemas Record Codec - Demo");
    println!("============================\n");

    let layout = match &args.schema {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading schema {}", path.display()))?;
            Layout::parse(&text).with_context(|| format!("parsing schema {}", path.display()))?
        }
        None => Layout::parse(SAMPLE_SCHEMA)?,
    };

    let mut record = Record::new(layout, args.endian);
    fill_sample(&mut record)?;
    print_record(&record);

    benchmark_access(&mut record, args.iterations)?;
    benchmark_buffer(&mut record, args.iterations)?;

    println!("\n✅ Done!");
    Ok(())
}

/// Sample value untuk sebuah field, berdasarkan tipe dan posisinya
fn sample_value(index: usize, field: &FieldLayout) -> Value {
    let scalar = |i: usize| match field.ty {
        FieldType::Bool => Value::Bool(i % 2 == 0),
        FieldType::F32 | FieldType::F64 => Value::Float(i as f64 + 0.5),
        ty if ty.is_signed() => Value::Int(-(i as i64)),
        _ => Value::UInt(i as u64),
    };

    match field.decode {
        Decode::Scalar => scalar(index + 1),
        Decode::OpaqueBytes => Value::Bytes(
            (0..field.count)
                .map(|i| b'a' + (i % 26) as u8)
                .collect(),
        ),
        Decode::ScalarArray => Value::List((0..field.count).map(|i| scalar(index + i)).collect()),
    }
}

fn fill_sample(record: &mut Record) -> Result<()> {
    let layout = record.layout().clone();
    for (index, (name, field)) in layout.iter().enumerate() {
        record
            .set(name, sample_value(index, field))
            .with_context(|| format!("setting field `{}`", name))?;
    }
    Ok(())
}

fn print_record(record: &Record) {
    println!(
        "📊 Record ({:?} endian, {} bytes, {} fields)",
        record.endian(),
        record.size(),
        record.layout().len()
    );
    println!("-------------------------------------------");

    for (name, field) in record.layout().iter() {
        let value = record
            .get(name)
            .map(|v| v.to_string())
            .unwrap_or_else(|e| e.to_string());
        println!(
            "  {:<10} @{:<4} {:>4}x{:<3} = {}",
            name, field.offset, field.ty.name(), field.count, value
        );
    }

    let hex: Vec<String> = record.as_bytes().iter().map(|b| format!("{:02x}", b)).collect();
    println!("  bytes: {}\n", hex.join(" "));
}

fn benchmark_access(record: &mut Record, iterations: usize) -> Result<()> {
    println!("📊 Field Access Benchmark");
    println!("-------------------------");

    let names: Vec<String> = record.layout().names().map(str::to_string).collect();
    if names.is_empty() || iterations == 0 {
        println!("  (nothing to benchmark)\n");
        return Ok(());
    }
    let values: Vec<Value> = names
        .iter()
        .map(|n| record.get(n))
        .collect::<kemas::Result<_>>()?;

    // Benchmark set
    let start = Instant::now();
    for i in 0..iterations {
        let idx = i % names.len();
        record.set(&names[idx], values[idx].clone())?;
    }
    let set_duration = start.elapsed();

    // Benchmark get
    let start = Instant::now();
    for i in 0..iterations {
        std::hint::black_box(record.get(&names[i % names.len()])?);
    }
    let get_duration = start.elapsed();

    let set_ns = set_duration.as_nanos() as f64 / iterations as f64;
    let get_ns = get_duration.as_nanos() as f64 / iterations as f64;

    println!("  Operations: {}", iterations);
    println!("  Set latency: {:.2} ns/op ({:.3} μs/op)", set_ns, set_ns / 1000.0);
    println!("  Get latency: {:.2} ns/op ({:.3} μs/op)", get_ns, get_ns / 1000.0);
    println!(
        "  Throughput:  {:.2} M sets/sec\n",
        iterations as f64 / set_duration.as_secs_f64() / 1_000_000.0
    );
    Ok(())
}

fn benchmark_buffer(record: &mut Record, iterations: usize) -> Result<()> {
    println!("📊 Buffer Benchmark (load/snapshot)");
    println!("-----------------------------------");

    if iterations == 0 {
        println!("  (nothing to benchmark)");
        return Ok(());
    }

    let snapshot = record.to_bytes();

    let start = Instant::now();
    for _ in 0..iterations {
        record.load_buffer(&snapshot)?;
    }
    let load_duration = start.elapsed();

    let start = Instant::now();
    for _ in 0..iterations {
        std::hint::black_box(record.to_bytes());
    }
    let snap_duration = start.elapsed();

    let load_ns = load_duration.as_nanos() as f64 / iterations as f64;
    let snap_ns = snap_duration.as_nanos() as f64 / iterations as f64;

    println!("  Record size: {} bytes", record.size());
    println!("  Load latency:     {:.2} ns/op", load_ns);
    println!("  Snapshot latency: {:.2} ns/op", snap_ns);
    println!(
        "  Load throughput:  {:.2} MB/sec",
        (iterations * record.size()) as f64 / load_duration.as_secs_f64() / 1_000_000.0
    );

    // load(to_bytes()) tidak mengubah isi
    if record.as_bytes() != snapshot.as_slice() {
        anyhow::bail!("buffer changed after reload");
    }
    Ok(())
}
