//! Generates the synthetic product catalog and interaction log.
//!
//! Writes `products.csv` and `user_behavior.csv` into the output directory.
//! Each profile gets a preferred category and 80% of its views fall inside
//! it, so the collaborative-filtering tiers have real structure to find.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use magpie_api::models::{CsvInteraction, CsvProduct};

#[derive(Debug, Parser)]
#[command(
    name = "gen-fixtures",
    about = "Generate synthetic catalog and interaction-log fixtures"
)]
struct Args {
    /// Directory the CSV files are written to
    #[arg(long, default_value = "data")]
    out_dir: PathBuf,

    /// Maximum number of products to generate
    #[arg(long, default_value_t = 200)]
    products: u32,

    /// Number of synthetic profiles
    #[arg(long, default_value_t = 50)]
    profiles: u32,

    /// First profile id in the pool
    #[arg(long, default_value_t = 101)]
    profile_id_start: u32,

    /// Number of view events to draw before de-duplication
    #[arg(long, default_value_t = 1200)]
    interactions: u32,

    /// Seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,
}

struct CategoryConfig {
    name: &'static str,
    adjectives: &'static [&'static str],
    nouns: &'static [&'static str],
    platforms: &'static [&'static str],
}

const CATEGORIES: &[CategoryConfig] = &[
    CategoryConfig {
        name: "Electronics",
        adjectives: &["Wireless", "Smart", "4K", "Portable", "Gaming", "Ultra-Slim"],
        nouns: &["Headphones", "Speaker", "Monitor", "Charger", "Mouse", "Keyboard"],
        platforms: &["Amazon", "Best Buy", "Newegg"],
    },
    CategoryConfig {
        name: "Home Goods",
        adjectives: &["Ergonomic", "Handmade", "Minimalist", "Electric", "Non-Stick"],
        nouns: &["Coffee Maker", "Blender", "Desk Chair", "Air Fryer", "Cookware Set"],
        platforms: &["Amazon", "Target", "Wayfair"],
    },
    CategoryConfig {
        name: "Apparel",
        adjectives: &["Vintage", "Athletic", "Denim", "Waterproof", "Organic Cotton"],
        nouns: &["Jacket", "T-Shirt", "Running Shoes", "Jeans", "Backpack"],
        platforms: &["Nike", "ASOS", "Amazon"],
    },
    CategoryConfig {
        name: "Books",
        adjectives: &["Bestselling", "Classic", "Sci-Fi", "Fantasy", "Historical"],
        nouns: &["Novel", "Biography", "Cookbook", "Anthology", "Graphic Novel"],
        platforms: &["Amazon", "Barnes & Noble", "Audible"],
    },
    CategoryConfig {
        name: "Sports & Outdoors",
        adjectives: &["Durable", "Lightweight", "Insulated", "All-Weather", "Professional"],
        nouns: &["Yoga Mat", "Dumbbell Set", "Tent", "Water Bottle", "Basketball"],
        platforms: &["Amazon", "REI", "Dick's Sporting Goods"],
    },
];

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("Failed to create {}", args.out_dir.display()))?;

    let products = generate_products(args.products, &mut rng);
    let products_path = args.out_dir.join("products.csv");
    write_csv(&products_path, &products)?;
    println!(
        "Generated {} unique products in {}",
        products.len(),
        products_path.display()
    );

    let interactions = generate_interactions(
        &products,
        args.profiles,
        args.profile_id_start,
        args.interactions,
        &mut rng,
    );
    let interactions_path = args.out_dir.join("user_behavior.csv");
    write_csv(&interactions_path, &interactions)?;
    println!(
        "Generated {} unique interactions in {}",
        interactions.len(),
        interactions_path.display()
    );

    Ok(())
}

fn generate_products(max_products: u32, rng: &mut StdRng) -> Vec<CsvProduct> {
    let mut products = Vec::new();
    let mut names = HashSet::new();
    let mut next_id = 1u32;

    for category in CATEGORIES {
        let mut combinations: Vec<(&str, &str)> = category
            .adjectives
            .iter()
            .flat_map(|adj| category.nouns.iter().map(move |noun| (*adj, *noun)))
            .collect();
        combinations.shuffle(rng);

        for (adjective, noun) in combinations {
            if next_id > max_products {
                break;
            }

            let name = format!("{adjective} {noun}");
            if !names.insert(name.clone()) {
                continue;
            }

            products.push(CsvProduct {
                product_id: next_id,
                product_name: name.clone(),
                category: category.name.to_string(),
                image_url: format!(
                    "https://placehold.co/600x400/0c1021/e0e0e0?text={}",
                    name.replace(' ', "+")
                ),
                platforms: category.platforms.join("|"),
            });
            next_id += 1;
        }
    }

    products
}

fn generate_interactions(
    products: &[CsvProduct],
    profiles: u32,
    profile_id_start: u32,
    draws: u32,
    rng: &mut StdRng,
) -> Vec<CsvInteraction> {
    if products.is_empty() || profiles == 0 {
        return Vec::new();
    }

    // Every profile prefers one category
    let preferences: Vec<&str> = (0..profiles)
        .map(|_| CATEGORIES.choose(rng).map(|c| c.name).unwrap_or("Electronics"))
        .collect();

    let mut seen = HashSet::new();
    let mut interactions = Vec::new();

    for _ in 0..draws {
        let profile_index = rng.gen_range(0..profiles);
        let profile_id = profile_id_start + profile_index;

        // 80% of views come from the preferred category
        let preferred: Vec<&CsvProduct> = products
            .iter()
            .filter(|p| p.category == preferences[profile_index as usize])
            .collect();
        let viewed = if rng.gen_bool(0.8) && !preferred.is_empty() {
            preferred.choose(rng).copied()
        } else {
            products.choose(rng)
        };

        if let Some(product) = viewed {
            if seen.insert((profile_id, product.product_id)) {
                interactions.push(CsvInteraction {
                    user_id: profile_id,
                    viewed_product_id: product.product_id,
                });
            }
        }
    }

    interactions
}

fn write_csv<T: serde::Serialize>(path: &Path, rows: &[T]) -> anyhow::Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to open {} for writing", path.display()))?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
