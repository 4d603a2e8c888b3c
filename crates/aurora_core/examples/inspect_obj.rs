//! Example: Load and inspect an OBJ file.
//!
//! Run with: cargo run --example inspect_obj -- path/to/mesh.obj

use std::env;

use aurora_core::read_obj;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        println!("Usage: inspect_obj <path-to-obj-file>");
        return;
    }

    let path = &args[1];
    println!("Loading OBJ file: {}", path);

    match read_obj(path) {
        Ok(mesh) => {
            println!("\n=== Mesh ===");
            println!("Vertices: {}", mesh.vertex_count());
            println!("Triangles: {}", mesh.triangle_count());
            println!("Has normals: {}", mesh.has_normals());
            println!("Has UVs: {}", mesh.has_uvs());

            if let Some(first) = mesh.positions.first() {
                let (min, max) = mesh
                    .positions
                    .iter()
                    .fold((*first, *first), |(lo, hi), p| (lo.min(*p), hi.max(*p)));
                println!(
                    "Bounds: ({:.2}, {:.2}, {:.2}) to ({:.2}, {:.2}, {:.2})",
                    min.x, min.y, min.z, max.x, max.y, max.z
                );
            }
        }
        Err(e) => {
            eprintln!("Error loading OBJ: {}", e);
            std::process::exit(1);
        }
    }
}
