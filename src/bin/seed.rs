use catalog_api::{
    config::AppConfig,
    db::{DbPool, close_pool, create_pool, run_migrations},
};

struct SeedProduct {
    name: &'static str,
    category: &'static str,
    description: &'static str,
    ingredients: &'static [&'static str],
    base_price: f64,
    preparation_time: &'static str,
    images: &'static [&'static str],
    flavors: &'static [&'static str],
    sizes: &'static [(&'static str, f64)],
}

const CATEGORIES: [&str; 3] = ["Cakes", "Cupcakes", "Cookies"];
const FLAVORS: [&str; 4] = ["Chocolate", "Vanilla", "Strawberry", "Lemon"];
const SIZES: [(&str, &str); 3] = [
    ("Small", "Serves 4-6"),
    ("Medium", "Serves 8-10"),
    ("Large", "Serves 12-16"),
];

const PRODUCTS: [SeedProduct; 4] = [
    SeedProduct {
        name: "Red Velvet Cake",
        category: "Cakes",
        description: "Layered red velvet sponge with cream cheese frosting",
        ingredients: &["flour", "sugar", "cocoa", "buttermilk", "cream cheese"],
        base_price: 45.0,
        preparation_time: "48 hours",
        images: &["/images/red-velvet-1.jpg", "/images/red-velvet-2.jpg"],
        flavors: &["Vanilla"],
        sizes: &[("Small", 0.0), ("Medium", 15.0), ("Large", 30.0)],
    },
    SeedProduct {
        name: "Chocolate Truffle Cake",
        category: "Cakes",
        description: "Dark chocolate sponge with ganache",
        ingredients: &["flour", "sugar", "dark chocolate", "cream"],
        base_price: 52.5,
        preparation_time: "48 hours",
        images: &["/images/chocolate-truffle.jpg"],
        flavors: &["Chocolate"],
        sizes: &[("Medium", 0.0), ("Large", 20.0)],
    },
    SeedProduct {
        name: "Lemon Cupcakes",
        category: "Cupcakes",
        description: "Box of six lemon cupcakes",
        ingredients: &["flour", "sugar", "lemon", "butter"],
        base_price: 18.0,
        preparation_time: "24 hours",
        images: &["/images/lemon-cupcakes.jpg"],
        flavors: &["Lemon", "Vanilla"],
        sizes: &[("Small", 0.0)],
    },
    SeedProduct {
        name: "Strawberry Cookies",
        category: "Cookies",
        description: "Soft cookies with strawberry bits",
        ingredients: &["flour", "sugar", "strawberry", "butter", "egg"],
        base_price: 9.9,
        preparation_time: "12 hours",
        images: &[],
        flavors: &["Strawberry"],
        sizes: &[],
    },
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url, 2).await?;
    run_migrations(&pool).await?;

    let account_id = ensure_account(&pool, config.default_account_id, "Love Cakes").await?;
    for category in CATEGORIES {
        ensure_named(&pool, "categories", account_id, category, None).await?;
    }
    for flavor in FLAVORS {
        ensure_named(&pool, "flavors", account_id, flavor, None).await?;
    }
    for (size, description) in SIZES {
        ensure_named(&pool, "sizes", account_id, size, Some(description)).await?;
    }
    for product in &PRODUCTS {
        seed_product(&pool, account_id, product).await?;
    }

    println!("Seed completed for account {account_id}");
    close_pool(pool).await;
    Ok(())
}

async fn ensure_account(pool: &DbPool, id_account: i64, name: &str) -> anyhow::Result<i64> {
    sqlx::query(
        r#"
        INSERT INTO accounts (id_account, name)
        VALUES ($1, $2)
        ON CONFLICT (id_account) DO NOTHING
        "#,
    )
    .bind(id_account)
    .bind(name)
    .execute(pool)
    .await?;

    // Keep the sequence ahead of explicitly inserted ids.
    sqlx::query(
        "SELECT setval(pg_get_serial_sequence('accounts', 'id_account'), (SELECT MAX(id_account) FROM accounts))",
    )
    .execute(pool)
    .await?;

    println!("Ensured account {id_account}");
    Ok(id_account)
}

async fn ensure_named(
    pool: &DbPool,
    table: &'static str,
    id_account: i64,
    name: &str,
    description: Option<&str>,
) -> anyhow::Result<i64> {
    let id_column = match table {
        "categories" => "id_category",
        "flavors" => "id_flavor",
        "sizes" => "id_size",
        other => anyhow::bail!("no seed support for table {other}"),
    };

    let insert = if table == "sizes" {
        "INSERT INTO sizes (id_account, name, description) VALUES ($1, $2, $3) \
         ON CONFLICT (id_account, name) DO NOTHING"
            .to_string()
    } else {
        format!(
            "INSERT INTO {table} (id_account, name) VALUES ($1, $2) \
             ON CONFLICT (id_account, name) DO NOTHING"
        )
    };
    let mut query = sqlx::query(&insert).bind(id_account).bind(name);
    if table == "sizes" {
        query = query.bind(description);
    }
    query.execute(pool).await?;

    let select = format!("SELECT {id_column} FROM {table} WHERE id_account = $1 AND name = $2");
    let (id,): (i64,) = sqlx::query_as(&select)
        .bind(id_account)
        .bind(name)
        .fetch_one(pool)
        .await?;
    Ok(id)
}

async fn seed_product(pool: &DbPool, id_account: i64, product: &SeedProduct) -> anyhow::Result<()> {
    let id_category = ensure_named(pool, "categories", id_account, product.category, None).await?;
    let ingredients = serde_json::to_string(product.ingredients)?;

    let (id_product,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO products
            (id_account, id_category, name, description, ingredients_json, base_price, preparation_time)
        VALUES ($1, $2, $3, $4, $5, $6::float8::numeric, $7)
        ON CONFLICT (id_account, name) DO UPDATE
            SET description = EXCLUDED.description,
                ingredients_json = EXCLUDED.ingredients_json,
                base_price = EXCLUDED.base_price,
                preparation_time = EXCLUDED.preparation_time
        RETURNING id_product
        "#,
    )
    .bind(id_account)
    .bind(id_category)
    .bind(product.name)
    .bind(product.description)
    .bind(ingredients)
    .bind(product.base_price)
    .bind(product.preparation_time)
    .fetch_one(pool)
    .await?;

    for (index, url) in product.images.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO product_images (id_product, image_url, is_primary, sort_order)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id_product, image_url) DO NOTHING
            "#,
        )
        .bind(id_product)
        .bind(*url)
        .bind(index == 0)
        .bind(index as i32)
        .execute(pool)
        .await?;
    }

    for flavor in product.flavors {
        let id_flavor = ensure_named(pool, "flavors", id_account, flavor, None).await?;
        sqlx::query(
            "INSERT INTO product_flavors (id_product, id_flavor) VALUES ($1, $2) ON CONFLICT DO NOTHING",
        )
        .bind(id_product)
        .bind(id_flavor)
        .execute(pool)
        .await?;
    }

    for (size, modifier) in product.sizes {
        let id_size = ensure_named(pool, "sizes", id_account, size, None).await?;
        sqlx::query(
            r#"
            INSERT INTO product_sizes (id_product, id_size, price_modifier)
            VALUES ($1, $2, $3::float8::numeric)
            ON CONFLICT (id_product, id_size) DO UPDATE SET price_modifier = EXCLUDED.price_modifier
            "#,
        )
        .bind(id_product)
        .bind(id_size)
        .bind(*modifier)
        .execute(pool)
        .await?;
    }

    println!("Seeded product {}", product.name);
    Ok(())
}
