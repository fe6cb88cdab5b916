//! Sample catalogue for the development backend.

use crate::api::models::{Product, ProductCategory};

const CATEGORIES: &[(i64, &str, &str)] = &[
    (1, "Dog Food", "dog"),
    (2, "Cat Supplies", "cat"),
    (3, "Grooming", "scissors"),
    (4, "Health", "cross.case"),
    (5, "Toys", "tennisball"),
];

// id, name, category, brand, price, original price, stock, sales
#[allow(clippy::type_complexity)]
const PRODUCTS: &[(i64, &str, i64, &str, f64, Option<f64>, u32, u32)] = &[
    (1, "Premium Adult Dog Food 2.5kg", 1, "Royal", 89.0, Some(129.0), 100, 256),
    (2, "Puppy Starter Kibble 1.5kg", 1, "Royal", 59.0, None, 80, 143),
    (3, "Grain-Free Salmon Dog Food 5kg", 1, "Wild Coast", 168.0, Some(199.0), 25, 61),
    (4, "Interactive Cat Toy Ball", 2, "PetLove", 25.0, None, 50, 89),
    (5, "Clumping Cat Litter 10L", 2, "CleanPaw", 45.0, Some(52.0), 200, 512),
    (6, "Cat Scratching Post", 2, "PetLove", 79.0, None, 12, 37),
    (7, "Pet Grooming Kit", 3, "Clean", 68.0, Some(88.0), 30, 145),
    (8, "Gentle Pet Shampoo 500ml", 3, "Clean", 32.0, None, 3, 201),
    (9, "Deshedding Brush", 3, "FurAway", 39.0, Some(49.0), 60, 77),
    (10, "Immune Support Nutrition Paste", 4, "Healthy", 45.0, None, 80, 67),
    (11, "Joint Care Chews", 4, "Healthy", 99.0, Some(119.0), 40, 58),
    (12, "Squeaky Plush Bone", 5, "PetLove", 15.0, None, 150, 322),
    (13, "Rope Tug Toy", 5, "ChewCo", 19.0, Some(25.0), 90, 188),
    (14, "Feather Teaser Wand", 5, "PetLove", 12.0, None, 0, 96),
];

pub fn categories() -> Vec<ProductCategory> {
    CATEGORIES
        .iter()
        .enumerate()
        .map(|(sort, (id, name, icon))| ProductCategory {
            id: *id,
            name: (*name).to_string(),
            parent_id: None,
            level: Some(1),
            sort: Some(sort as i32 + 1),
            icon: Some((*icon).to_string()),
            status: Some(1),
        })
        .collect()
}

pub fn products() -> Vec<Product> {
    PRODUCTS
        .iter()
        .map(
            |(id, name, category_id, brand, price, original_price, stock, sales)| Product {
                id: *id,
                name: (*name).to_string(),
                category_id: *category_id,
                brand: Some((*brand).to_string()),
                price: *price,
                original_price: *original_price,
                stock: Some(*stock),
                sales: Some(*sales),
                main_image: Some(format!("https://picsum.photos/200/200?random={id}")),
                album: None,
                description: None,
                detail: None,
                status: Some(1),
                create_time: None,
                update_time: None,
            },
        )
        .collect()
}
