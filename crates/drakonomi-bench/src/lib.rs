//! Shared helpers for the benchmark harnesses.

use drakonomi_core::{Dragon, DragonId};

/// A synthetic catalog with overlapping tag sets, sized to stress the
/// O(n²) pairwise comparison at the documented scaling limit (low
/// hundreds of records).
pub fn synthetic_dragons(count: usize) -> Vec<Dragon> {
    let pool = [
        "fire", "ice", "water", "storm", "serpent", "guardian", "ancient", "legendary", "nordic",
        "greek", "asian", "european",
    ];

    (0..count)
        .map(|i| {
            // Deterministic, varied tag picks with plenty of collisions.
            let tags: Vec<String> = (0..3)
                .map(|k| pool[(i * 7 + k * 5) % pool.len()].to_string())
                .collect();
            Dragon {
                id: DragonId(i as u64 + 1),
                name: format!("Synthetic {i}"),
                origin: "Benchmark Realm".to_string(),
                common_names: Vec::new(),
                description: String::new(),
                tags,
                image_url: None,
            }
        })
        .collect()
}
