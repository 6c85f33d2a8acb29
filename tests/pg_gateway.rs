use catalog_api::{
    db::{create_pool, run_migrations},
    gateway::{Expect, PgGateway, RoutineParams},
    services::product_service::{PRODUCT_GET_RESULT_SETS, PRODUCT_GET_ROUTINE, PRODUCT_LIST_ROUTINE},
};
use serde_json::json;
use sqlx::{Postgres, Transaction};

// Allow skipping when no DB is configured in the environment.
async fn connect() -> anyhow::Result<Option<PgGateway>> {
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!("Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run gateway tests.");
            return Ok(None);
        }
    };

    let pool = create_pool(&database_url, 2).await?;
    run_migrations(&pool).await?;
    Ok(Some(PgGateway::new(pool)))
}

async fn insert_account(tx: &mut Transaction<'static, Postgres>, name: &str) -> anyhow::Result<i64> {
    let (id_account,): (i64,) =
        sqlx::query_as("INSERT INTO accounts (name) VALUES ($1) RETURNING id_account")
            .bind(name)
            .fetch_one(&mut **tx)
            .await?;
    Ok(id_account)
}

async fn insert_product(
    tx: &mut Transaction<'static, Postgres>,
    id_account: i64,
    name: &str,
) -> anyhow::Result<i64> {
    let (id_category,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO categories (id_account, name) VALUES ($1, 'Misc')
        ON CONFLICT (id_account, name) DO UPDATE SET name = EXCLUDED.name
        RETURNING id_category
        "#,
    )
    .bind(id_account)
    .fetch_one(&mut **tx)
    .await?;
    let (id_product,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO products (id_account, id_category, name, description, base_price, preparation_time)
        VALUES ($1, $2, $3, '', 10, '1 hour')
        RETURNING id_product
        "#,
    )
    .bind(id_account)
    .bind(id_category)
    .bind(name)
    .fetch_one(&mut **tx)
    .await?;
    Ok(id_product)
}

fn listing(id_account: i64, page: i64, search: Option<&str>) -> RoutineParams {
    RoutineParams::new()
        .with("id_account", id_account)
        .with("page_number", page)
        .with("page_size", 36_i64)
        .with("sort", "relevance")
        .with("search_term", search.map(str::to_string))
        .with("category_ids", None::<Vec<i64>>)
        .with("flavor_ids", None::<Vec<i64>>)
        .with("size_ids", None::<Vec<i64>>)
        .with("min_price", None::<f64>)
        .with("max_price", None::<f64>)
}

// Runs the real routines inside a transaction that is rolled back at the end.
#[tokio::test]
async fn routines_return_their_result_sets() -> anyhow::Result<()> {
    let Some(gateway) = connect().await? else {
        return Ok(());
    };
    let mut tx = gateway.begin().await?;

    let (id_account,): (i64,) =
        sqlx::query_as("INSERT INTO accounts (name) VALUES ('gateway-test') RETURNING id_account")
            .fetch_one(&mut *tx)
            .await?;
    let (id_category,): (i64,) = sqlx::query_as(
        "INSERT INTO categories (id_account, name) VALUES ($1, 'Cakes') RETURNING id_category",
    )
    .bind(id_account)
    .fetch_one(&mut *tx)
    .await?;
    let (id_product,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO products
            (id_account, id_category, name, description, ingredients_json, base_price, preparation_time)
        VALUES ($1, $2, 'Lemon Tart', 'Tangy', '["flour","lemon"]', 21.50, '24 hours')
        RETURNING id_product
        "#,
    )
    .bind(id_account)
    .bind(id_category)
    .fetch_one(&mut *tx)
    .await?;
    sqlx::query(
        "INSERT INTO product_images (id_product, image_url, is_primary) VALUES ($1, '/tart.jpg', TRUE)",
    )
    .bind(id_product)
    .execute(&mut *tx)
    .await?;

    let list_params = RoutineParams::new()
        .with("id_account", id_account)
        .with("page_number", 1_i64)
        .with("page_size", 12_i64)
        .with("sort", "relevance")
        .with("search_term", Some("lemon".to_string()))
        .with("category_ids", Some(vec![id_category]))
        .with("flavor_ids", None::<Vec<i64>>)
        .with("size_ids", None::<Vec<i64>>)
        .with("min_price", Some(10.0))
        .with("max_price", None::<f64>);
    let sets = gateway
        .execute_in(&mut tx, PRODUCT_LIST_ROUTINE, &list_params, Expect::Multi)
        .await?
        .into_multi()?;

    assert_eq!(sets.len(), 2);
    assert_eq!(sets[0].len(), 1);
    assert_eq!(sets[0][0]["name"], json!("Lemon Tart"));
    assert_eq!(sets[0][0]["basePrice"], json!(21.5));
    assert_eq!(sets[0][0]["primaryImageUrl"], json!("/tart.jpg"));
    assert_eq!(sets[1][0]["total"], json!(1));

    let get_params = RoutineParams::new()
        .with("id_account", id_account)
        .with("id_product", id_product);
    let mut named = gateway
        .execute_in(
            &mut tx,
            PRODUCT_GET_ROUTINE,
            &get_params,
            Expect::Named(PRODUCT_GET_RESULT_SETS),
        )
        .await?
        .into_named()?;

    let details = named.take("product_details")?;
    assert_eq!(details[0]["ingredientsJson"], json!(r#"["flour","lemon"]"#));
    assert_eq!(details[0]["categoryName"], json!("Cakes"));
    let images = named.take("images")?;
    assert_eq!(images[0]["isPrimary"], json!(true));
    assert!(named.take("flavors")?.is_empty());
    assert!(named.take("sizes")?.is_empty());

    let single = gateway
        .execute_in(&mut tx, PRODUCT_GET_ROUTINE, &get_params, Expect::Single)
        .await?
        .into_single()?;
    assert_eq!(single.map(|row| row["idProduct"].clone()), Some(json!(id_product)));

    tx.rollback().await?;
    Ok(())
}

#[tokio::test]
async fn page_far_past_the_end_is_empty() -> anyhow::Result<()> {
    let Some(gateway) = connect().await? else {
        return Ok(());
    };
    let mut tx = gateway.begin().await?;
    let id_account = insert_account(&mut tx, "gateway-test-paging").await?;
    insert_product(&mut tx, id_account, "Only Cake").await?;

    let sets = gateway
        .execute_in(
            &mut tx,
            PRODUCT_LIST_ROUTINE,
            &listing(id_account, 9_000_000_000_000_000_000, None),
            Expect::Multi,
        )
        .await?
        .into_multi()?;

    assert!(sets[0].is_empty());
    assert_eq!(sets[1][0]["total"], json!(1));

    tx.rollback().await?;
    Ok(())
}

#[tokio::test]
async fn relevance_treats_wildcards_in_search_literally() -> anyhow::Result<()> {
    let Some(gateway) = connect().await? else {
        return Ok(());
    };
    let mut tx = gateway.begin().await?;
    let id_account = insert_account(&mut tx, "gateway-test-wildcards").await?;
    // Both contain "5%", only the second starts with it.
    insert_product(&mut tx, id_account, "50 Tart at 5% off").await?;
    insert_product(&mut tx, id_account, "5% Cake").await?;

    let sets = gateway
        .execute_in(
            &mut tx,
            PRODUCT_LIST_ROUTINE,
            &listing(id_account, 1, Some("5%")),
            Expect::Multi,
        )
        .await?
        .into_multi()?;

    let names: Vec<_> = sets[0].iter().map(|row| row["name"].clone()).collect();
    assert_eq!(names, vec![json!("5% Cake"), json!("50 Tart at 5% off")]);
    assert_eq!(sets[1][0]["total"], json!(2));

    tx.rollback().await?;
    Ok(())
}
