use serde::{Deserialize, Serialize};

/// A catalog product
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Unique identifier within the catalog
    pub id: u32,
    /// Display name, unique within the catalog
    pub name: String,
    /// One of a small fixed set of category labels
    pub category: String,
    /// Image reference shown by the frontend
    pub image_url: String,
    /// Shops carrying the product, in display order
    pub platforms: Vec<String>,
}

/// A single view event from the interaction log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interaction {
    pub profile_id: u32,
    pub product_id: u32,
}

// ============================================================================
// CSV record types
// ============================================================================

/// Raw catalog row as stored on disk
///
/// Platforms are a single `|`-joined column in the CSV; the domain type
/// carries them as a list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsvProduct {
    pub product_id: u32,
    pub product_name: String,
    pub category: String,
    pub image_url: String,
    pub platforms: String,
}

impl From<CsvProduct> for Product {
    fn from(row: CsvProduct) -> Self {
        let platforms = row
            .platforms
            .split('|')
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();

        Product {
            id: row.product_id,
            name: row.product_name,
            category: row.category,
            image_url: row.image_url,
            platforms,
        }
    }
}

/// Raw interaction row as stored on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsvInteraction {
    pub user_id: u32,
    pub viewed_product_id: u32,
}

impl From<CsvInteraction> for Interaction {
    fn from(row: CsvInteraction) -> Self {
        Interaction {
            profile_id: row.user_id,
            product_id: row.viewed_product_id,
        }
    }
}

// ============================================================================
// Response types
// ============================================================================

/// One recommended product as returned to the client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendedProduct {
    pub product_name: String,
    pub category: String,
    pub image_url: String,
    pub platforms: Vec<String>,
    pub explanation: String,
}

impl RecommendedProduct {
    /// Pairs a catalog product with its explanation text
    pub fn new(product: &Product, explanation: String) -> Self {
        Self {
            product_name: product.name.clone(),
            category: product.category.clone(),
            image_url: product.image_url.clone(),
            platforms: product.platforms.clone(),
            explanation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_product_splits_platforms() {
        let row = CsvProduct {
            product_id: 7,
            product_name: "Wireless Headphones".to_string(),
            category: "Electronics".to_string(),
            image_url: "https://img.example/7.png".to_string(),
            platforms: "Amazon|Best Buy|Newegg".to_string(),
        };

        let product: Product = row.into();
        assert_eq!(product.id, 7);
        assert_eq!(product.name, "Wireless Headphones");
        assert_eq!(
            product.platforms,
            vec!["Amazon".to_string(), "Best Buy".to_string(), "Newegg".to_string()]
        );
    }

    #[test]
    fn test_csv_product_empty_platforms() {
        let row = CsvProduct {
            product_id: 1,
            product_name: "Classic Novel".to_string(),
            category: "Books".to_string(),
            image_url: "https://img.example/1.png".to_string(),
            platforms: String::new(),
        };

        let product: Product = row.into();
        assert!(product.platforms.is_empty());
    }

    #[test]
    fn test_csv_interaction_conversion() {
        let row = CsvInteraction {
            user_id: 104,
            viewed_product_id: 33,
        };

        let interaction: Interaction = row.into();
        assert_eq!(interaction.profile_id, 104);
        assert_eq!(interaction.product_id, 33);
    }

    #[test]
    fn test_recommended_product_serialization() {
        let product = Product {
            id: 3,
            name: "Smart Speaker".to_string(),
            category: "Electronics".to_string(),
            image_url: "https://img.example/3.png".to_string(),
            platforms: vec!["Amazon".to_string()],
        };

        let recommended =
            RecommendedProduct::new(&product, "Because you liked gadgets, this sings.".to_string());
        let json = serde_json::to_value(&recommended).unwrap();

        assert_eq!(json["product_name"], "Smart Speaker");
        assert_eq!(json["category"], "Electronics");
        assert_eq!(json["image_url"], "https://img.example/3.png");
        assert_eq!(json["platforms"][0], "Amazon");
        assert_eq!(json["explanation"], "Because you liked gadgets, this sings.");
    }
}
