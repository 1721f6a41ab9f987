use std::fs;
use std::io::Write;
use std::path::Path;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Completion timestamps for a run: one cumulative time per operation.
fn write_completed_times(path: &Path, rng: &mut SimpleRng, ops: usize, pace: f64) {
    let mut file = fs::File::create(path).expect("Failed to create timing file");
    let mut elapsed = 0.0;
    for _ in 0..ops {
        elapsed += rng.gauss(pace, pace * 0.2).max(0.0);
        writeln!(file, "{elapsed:.6}").expect("Failed to write timing file");
    }
}

/// Per-block validation summary: `operation_index,seconds` pairs.
fn write_block_validated(path: &Path, rng: &mut SimpleRng, blocks: usize, ops_per_block: usize) {
    let mut file = fs::File::create(path).expect("Failed to create block file");
    for block in 0..blocks {
        let seconds = rng.gauss(7.5, 1.2).max(0.1);
        writeln!(file, "{},{seconds:.4}", block * ops_per_block)
            .expect("Failed to write block file");
    }
}

/// Graph-walk trace: `time_us,depth` pairs following a bounded random walk.
fn write_visit_level(path: &Path, rng: &mut SimpleRng, rows: usize) {
    let mut file = fs::File::create(path).expect("Failed to create visit file");
    let mut time_us = 0u64;
    let mut depth: i64 = 5;
    for _ in 0..rows {
        time_us += (rng.next_f64() * 900.0) as u64 + 100;
        depth = (depth + if rng.next_f64() < 0.5 { -1 } else { 1 }).clamp(0, 20);
        writeln!(file, "{time_us},{depth}").expect("Failed to write visit file");
    }
}

/// Node log interleaving per-commit object counts with validation chatter.
/// Roughly every 20th commit is a freeze that creates zero objects.
fn write_node_log(path: &Path, rng: &mut SimpleRng, commits: usize) {
    let mut file = fs::File::create(path).expect("Failed to create node log");
    for commit in 1..=commits {
        let objects = if commit % 20 == 0 {
            0
        } else {
            rng.gauss(120.0, 30.0).max(1.0) as i64
        };
        let elapsed = rng.gauss(0.35, 0.08).max(0.01);
        writeln!(
            file,
            "[t+{:.3}s] validator: block {commit} validated in {elapsed:.3}s",
            commit as f64 * elapsed
        )
        .expect("Failed to write node log");
        writeln!(
            file,
            "[t+{:.3}s] store.pack: created by commit: {objects} objects",
            commit as f64 * elapsed
        )
        .expect("Failed to write node log");
    }
}

fn main() {
    let mut rng = SimpleRng::new(42);

    let out_dir = Path::new("sample_data");
    fs::create_dir_all(out_dir).expect("Failed to create sample_data directory");

    write_completed_times(&out_dir.join("completed_times_master"), &mut rng, 2000, 0.050);
    write_completed_times(&out_dir.join("completed_times_patch"), &mut rng, 2000, 0.041);
    write_block_validated(&out_dir.join("block_validated"), &mut rng, 12, 150);
    write_visit_level(&out_dir.join("visit_level"), &mut rng, 1500);
    write_node_log(&out_dir.join("node.log"), &mut rng, 400);

    println!(
        "Wrote sample benchmark logs to {}: \
         completed_times_master, completed_times_patch, block_validated, visit_level, node.log",
        out_dir.display()
    );
}
