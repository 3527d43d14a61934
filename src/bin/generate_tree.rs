//! Tree generation utility
//!
//! Grows a tree from a parameter set and reports mesh and leaf statistics.
//!
//! Usage:
//!     generate_tree [OPTIONS]
//!
//! Options:
//!     --seed <SEED>           Tree seed (default: from parameters)
//!     --params <FILE>         JSON file with tree parameters
//!     --config <FILE>         JSON file with generator configuration
//!     --random                Randomize every parameter within the configured ranges
//!     -n, --count <N>         Regenerate N times with fresh random seeds (default: 1)
//!     -h, --help              Show this help message

use std::env;
use std::path::PathBuf;
use std::time::Instant;

use arbor::config::GeneratorConfig;
use arbor::core::logging;
use arbor::material::{MaterialLibrary, SurfaceMaterials};
use arbor::mesh::{LeafQuad, LeafRecord, TreeMesh};
use arbor::procgen::{RandomStream, Regeneration, Tree, TreeParameters};
use arbor::sink::MeshSink;

fn print_help() {
    eprintln!("generate_tree - Procedural tree generation utility");
    eprintln!();
    eprintln!("Usage: generate_tree [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("    --seed <SEED>           Tree seed (default: from parameters)");
    eprintln!("    --params <FILE>         JSON file with tree parameters");
    eprintln!("    --config <FILE>         JSON file with generator configuration");
    eprintln!("    --random                Randomize every parameter within the configured ranges");
    eprintln!("    -n, --count <N>         Regenerate N times with fresh random seeds (default: 1)");
    eprintln!("    -h, --help              Show this help message");
    eprintln!();
    eprintln!("Example:");
    eprintln!("    generate_tree --seed 42");
    eprintln!("    generate_tree --random -n 5");
}

#[derive(Debug)]
struct Args {
    seed: Option<u32>,
    params_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
    random: bool,
    count: u32,
}

fn parse_args() -> Result<Args, String> {
    let args: Vec<String> = env::args().skip(1).collect();

    let mut parsed = Args {
        seed: None,
        params_path: None,
        config_path: None,
        random: false,
        count: 1,
    };

    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "--seed" => {
                i += 1;
                let value = args.get(i).ok_or("Missing value for --seed")?;
                parsed.seed = Some(value.parse().map_err(|_| format!("Invalid seed: {}", value))?);
            }
            "--params" => {
                i += 1;
                let value = args.get(i).ok_or("Missing value for --params")?;
                parsed.params_path = Some(PathBuf::from(value));
            }
            "--config" => {
                i += 1;
                let value = args.get(i).ok_or("Missing value for --config")?;
                parsed.config_path = Some(PathBuf::from(value));
            }
            "--random" => parsed.random = true,
            "-n" | "--count" => {
                i += 1;
                let value = args.get(i).ok_or("Missing value for --count")?;
                parsed.count = value.parse().map_err(|_| format!("Invalid count: {}", value))?;
                if parsed.count == 0 {
                    return Err("Count must be at least 1".to_string());
                }
            }
            other => return Err(format!("Unknown option: {}", other)),
        }
        i += 1;
    }

    Ok(parsed)
}

/// Sink that only reports what it would upload
struct SummarySink;

impl MeshSink for SummarySink {
    fn upload_tree(&mut self, mesh: &TreeMesh) {
        let size = mesh.bounds.size();
        println!(
            "  Mesh: {} vertices, {} triangles, bounds {:.2} x {:.2} x {:.2}",
            mesh.vertex_count(),
            mesh.triangle_count(),
            size.x,
            size.y,
            size.z
        );
    }

    fn upload_leaves(&mut self, _quad: &LeafQuad, leaves: &[LeafRecord]) {
        let material = leaves
            .first()
            .and_then(|leaf| MaterialLibrary::decode(leaf.material))
            .map(|(category, index)| MaterialLibrary::variant_name(category, index))
            .unwrap_or_else(|| "none".to_string());
        println!("  Leaves: {} active, material {}", leaves.len(), material);
    }
}

fn run(args: Args) -> arbor::core::Result<()> {
    let config = match &args.config_path {
        Some(path) => GeneratorConfig::load(path)?,
        None => GeneratorConfig::default(),
    };
    let mut params = match &args.params_path {
        Some(path) => TreeParameters::from_json(&std::fs::read_to_string(path)?)?,
        None => TreeParameters::default(),
    };

    // Stream used for randomizing parameters; generation borrows it per pass
    let mut rng = RandomStream::new(u64::from(args.seed.unwrap_or(params.seed)));
    if args.random {
        params = config.ranges.random_parameters(&mut rng);
        let surfaces = SurfaceMaterials::random(&mut rng, &config.materials);
        for (label, handle) in [("Bark", surfaces.bark), ("Platform", surfaces.platform)] {
            if let Some((category, index)) = MaterialLibrary::decode(handle) {
                println!("{} material: {}", label, MaterialLibrary::variant_name(category, index));
            }
        }
    }
    if let Some(seed) = args.seed {
        params.seed = seed;
    }

    let mut tree = Tree::new(&config);
    let mut sink = SummarySink;

    for pass in 0..args.count {
        if pass > 0 {
            params = params.with_seed(config.ranges.random_seed(&mut rng));
        }
        println!("Pass {} (seed {})", pass + 1, params.seed);

        let start = Instant::now();
        match tree.regenerate(&params, &mut rng, &config.materials)? {
            Regeneration::Unchanged => println!("  Parameters unchanged, mesh kept"),
            Regeneration::Generated(stats) => println!(
                "  Grew {} rings, {} forks, {} tips in {:.2}ms",
                stats.growth.rings,
                stats.growth.forks,
                stats.growth.tips,
                start.elapsed().as_secs_f64() * 1000.0
            ),
        }
        tree.submit(&mut sink);
        println!("  Leaf pool size: {}", tree.leaves().len());
    }

    Ok(())
}

fn main() {
    logging::init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!();
            print_help();
            std::process::exit(1);
        }
    };

    if let Err(e) = run(args) {
        log::error!("Tree generation failed: {}", e);
        std::process::exit(1);
    }
}
