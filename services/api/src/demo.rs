use crate::infra::parse_sort_key;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use storefront::config::AppConfig;
use storefront::error::AppError;
use storefront::shop::{
    CartSummary, CredentialCheck, FilterUpdate, InMemorySessionStore, MenuCatalog, Order,
    Restaurant, RestaurantQuery, SharedCatalog, SortKey, StorefrontService, ALL_CATEGORIES,
    ALL_PRICES,
};

#[derive(Args, Debug, Default)]
pub(crate) struct ListingArgs {
    /// Case-insensitive substring matched against restaurant names
    #[arg(long)]
    pub(crate) search: Option<String>,
    /// Category tag to keep (defaults to all categories)
    #[arg(long)]
    pub(crate) category: Option<String>,
    /// Price tier symbol to keep, e.g. "€€"
    #[arg(long)]
    pub(crate) price: Option<String>,
    /// recommended, delivery_time, rating or delivery_fee
    #[arg(long, value_parser = parse_sort_key)]
    pub(crate) sort: Option<SortKey>,
    /// Restaurant CSV to read instead of the configured catalog
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Restaurant CSV to read instead of the configured catalog
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
    /// Delivery address used at checkout
    #[arg(long, default_value = "1 Demo Street")]
    pub(crate) address: String,
}

pub(crate) fn run_listing(args: ListingArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let ListingArgs {
        search,
        category,
        price,
        sort,
        catalog,
    } = args;

    let path = catalog.unwrap_or(config.catalog.path);
    let snapshot = SharedCatalog::new(path, config.catalog.seed).snapshot();
    if let Some(err) = &snapshot.error {
        println!("Warning: {err}");
    }
    let catalog = snapshot.catalog;

    let query = RestaurantQuery {
        search,
        category: category.unwrap_or_else(|| ALL_CATEGORIES.to_string()),
        price_tier: price.unwrap_or_else(|| ALL_PRICES.to_string()),
        sort: sort.unwrap_or_default(),
    };
    let restaurants = query.apply(&catalog);

    println!(
        "{} of {} restaurants ({})",
        restaurants.len(),
        catalog.len(),
        query.sort.label()
    );
    for restaurant in &restaurants {
        print_restaurant(restaurant);
    }
    Ok(())
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let DemoArgs { catalog, address } = args;
    let path = catalog.unwrap_or(config.catalog.path);

    let service = StorefrontService::new(
        Arc::new(SharedCatalog::new(path, config.catalog.seed)),
        Arc::new(MenuCatalog::default()),
        Arc::new(InMemorySessionStore::default()),
        CredentialCheck::new(config.auth.clone()),
    );

    println!("Storefront demo");
    let outcome = service.login(&config.auth.username, &config.auth.password)?;
    let session = outcome.session_id;
    println!("- Logged in as {} ({})", outcome.summary.username, session);

    let listing = service.update_filters(
        &session,
        FilterUpdate {
            sort: Some(SortKey::Rating),
            ..FilterUpdate::default()
        },
    )?;
    if let Some(warning) = &listing.warning {
        println!("  Warning: {warning}");
    }
    println!("- {} restaurants, top rated first:", listing.total);
    for restaurant in listing.restaurants.iter().take(3) {
        print_restaurant(restaurant);
    }

    let Some(choice) = listing.restaurants.first() else {
        println!("  Nothing to order from; load a catalog and try again.");
        service.logout(&session)?;
        return Ok(());
    };

    let view = service.select_restaurant(&session, choice.id)?;
    println!(
        "\nOrdering from {} (ready in about {})",
        view.restaurant.name, view.estimated_time
    );
    let picks: Vec<(String, String)> = view
        .menu
        .sections
        .iter()
        .filter_map(|section| section.items.first())
        .take(2)
        .map(|item| (item.category.clone(), item.name.clone()))
        .collect();
    let mut cart = None;
    for (category, name) in &picks {
        cart = Some(service.add_item(&session, category, name)?);
    }
    if let Some(cart) = &cart {
        print_cart(cart);
    }

    service.set_delivery(&session, Some(address), None)?;
    let order = service.checkout(&session)?;
    print_order(&order);

    service.logout(&session)?;
    Ok(())
}

fn print_restaurant(restaurant: &Restaurant) {
    println!(
        "  - [{}] {} | {:.1}★ | {} | {} | {} min | fee €{} | min €{}",
        restaurant.id,
        restaurant.name,
        restaurant.rating,
        restaurant.price,
        restaurant.categories.join(", "),
        restaurant.delivery_time,
        restaurant.delivery_fee,
        restaurant.min_order
    );
}

fn print_cart(cart: &CartSummary) {
    println!("Cart:");
    for line in &cart.entries {
        println!("  {}. {} €{}", line.position, line.item.name, line.item.price);
    }
    println!("  Subtotal €{}", cart.subtotal);
    println!("  Delivery €{}", cart.delivery_fee);
    println!("  Total    €{}", cart.total);
}

fn print_order(order: &Order) {
    println!(
        "\nOrder {} placed at {} -> {}",
        order.id.0,
        order.created_at_label(),
        order.status.label()
    );
    println!(
        "  {} item(s), total €{}, delivering to {} in about {}",
        order.items.len(),
        order.total,
        order.delivery_address,
        order.estimated_delivery
    );
}
